//! Fuzz target: verified-item response decoding.
//!
//! Errors are expected; panics are not.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sentinel_checker::wire::decode_item;

fuzz_target!(|data: &[u8]| {
    let _ = decode_item(0, data);
});
