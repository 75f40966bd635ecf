//! Fuzz target for label file parsing.
//!
//! Feeds arbitrary UTF-8 text to the label parser and checks that the label
//! count matches the number of line terminators.

#![no_main]

use libfuzzer_sys::fuzz_target;
use quantclass::LabelList;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let labels = LabelList::parse(text);
    let lines = text.strip_suffix('\n').unwrap_or(text);
    if !lines.is_empty() && lines != "\r" {
        assert_eq!(labels.len(), lines.matches('\n').count() + 1);
    }
});
