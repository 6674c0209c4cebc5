//! Fuzz target: root response decoding.
//!
//! Arbitrary bytes from the ledger must decode to a root or a `Decode`
//! error, never a panic. A decoded non-empty root always carries digest bytes.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sentinel_checker::wire::decode_root;

fuzz_target!(|data: &[u8]| {
    if let Ok(root) = decode_root(data) {
        if let Some(digest) = &root.digest {
            assert!(!digest.as_bytes().is_empty(), "non-empty root must carry digest bytes");
        }
    }
});
