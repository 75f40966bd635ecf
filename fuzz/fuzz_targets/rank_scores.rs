//! Fuzz target for ranking arbitrary score buffers.
//!
//! The first byte selects top-k; the rest is split into scores and label
//! text. Mismatched lengths must fail cleanly, never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use quantclass::rank::fuzz_rank;

fuzz_target!(|data: &[u8]| {
    let Some((&top_k, rest)) = data.split_first() else {
        return;
    };

    let split = rest.len() / 2;
    let (scores, label_bytes) = rest.split_at(split);
    let label_text = String::from_utf8_lossy(label_bytes);

    fuzz_rank(scores, &label_text, usize::from(top_k));
});
