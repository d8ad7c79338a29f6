#![no_main]

use libfuzzer_sys::fuzz_target;
use s4key::{DecoderConfig, KeyObject};

fuzz_target!(|data: &str| {
    // Decoding arbitrary input must fail cleanly, never panic
    let _ = KeyObject::deserialize(data);
    let _ = KeyObject::deserialize_with(data, &DecoderConfig { max_depth: 2 });
});
