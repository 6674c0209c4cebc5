//! JSON shapes served by the ledger HTTP API.
//!
//! Byte fields (`digest`, `value`) travel as standard base64.

use base64::Engine as _;
use serde::Deserialize;

use sentinel_core::{Digest, Root, VerifiedItem};

use crate::LedgerError;

/// Path of the root endpoint, relative to the ledger base URL.
pub const ROOT_PATH: &str = "/v1/root";

/// Path of the verified-item endpoint for `index`, relative to the base URL.
#[must_use]
pub fn item_path(index: u64) -> String {
    format!("/v1/items/{index}/verified")
}

#[derive(Debug, Deserialize)]
struct RootBody {
    index: u64,
    #[serde(default)]
    digest: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ItemBody {
    index: u64,
    #[serde(default)]
    value: String,
    verified: bool,
}

/// Decode a root response body.
///
/// A missing, `null`, or empty `digest` means the ledger is empty.
///
/// # Errors
/// Returns [`LedgerError::Decode`] on malformed JSON or base64.
pub fn decode_root(body: &[u8]) -> Result<Root, LedgerError> {
    let parsed: RootBody = serde_json::from_slice(body).map_err(|e| decode_error(ROOT_PATH, e))?;
    match parsed.digest.filter(|d| !d.is_empty()) {
        None => Ok(Root::empty()),
        Some(encoded) => {
            let bytes = decode_base64(ROOT_PATH, &encoded)?;
            let digest = Digest::new(bytes).map_err(|e| decode_error(ROOT_PATH, e))?;
            Ok(Root::new(parsed.index, digest))
        }
    }
}

/// Decode a verified-item response body.
///
/// # Errors
/// Returns [`LedgerError::Decode`] on malformed JSON or base64.
pub fn decode_item(index: u64, body: &[u8]) -> Result<VerifiedItem, LedgerError> {
    let path = item_path(index);
    let parsed: ItemBody = serde_json::from_slice(body).map_err(|e| decode_error(&path, e))?;
    let value = decode_base64(&path, &parsed.value)?;
    Ok(VerifiedItem::new(parsed.index, value, parsed.verified))
}

fn decode_base64(path: &str, encoded: &str) -> Result<Vec<u8>, LedgerError> {
    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| decode_error(path, e))
}

fn decode_error(path: &str, reason: impl std::fmt::Display) -> LedgerError {
    LedgerError::Decode { path: path.to_owned(), reason: reason.to_string() }
}
