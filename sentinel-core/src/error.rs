/// Errors produced by the `sentinel-core` crate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CoreError {
    /// A root index whose inclusive range `[0, index]` has no representable length.
    #[error("root index {index} spans more entries than can be counted")]
    IndexRangeOverflow { index: u64 },

    /// A root digest was present but carried no bytes.
    #[error("root digest must not be empty")]
    EmptyDigest,
}
