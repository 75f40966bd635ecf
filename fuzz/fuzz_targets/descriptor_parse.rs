//! Fuzz target for model descriptor parsing.
//!
//! Feeds arbitrary UTF-8 input to both the JSON and YAML descriptor parsers,
//! checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use quantclass::ModelDescriptor;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let _ = ModelDescriptor::from_json_str(text);
    let _ = ModelDescriptor::from_yaml_str(text);
});
