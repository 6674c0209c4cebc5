//! Fuzz target: scan order generation.
//!
//! The first 32 bytes are the seed, the next two the range length. Every
//! output must contain each index in `[0, n)` exactly once.
#![no_main]

use libfuzzer_sys::fuzz_target;
use sentinel_checker::permutation;

fuzz_target!(|data: &[u8]| {
    if data.len() < 34 {
        return;
    }
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&data[..32]);
    let n = u64::from(u16::from_le_bytes([data[32], data[33]]));

    let order = permutation(n, seed).expect("u16 range always fits in memory");
    assert_eq!(order.len() as u64, n);

    let mut seen = vec![false; order.len()];
    for index in order {
        let slot = &mut seen[index as usize];
        assert!(!*slot, "index {index} scheduled twice");
        *slot = true;
    }
});
