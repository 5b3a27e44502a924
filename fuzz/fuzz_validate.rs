//! Fuzz target for template validation.
//!
//! Run with: cargo +nightly fuzz run fuzz_validate
//!
//! `validate_template` must return diagnostics for arbitrary input without
//! ever panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use promptloom_engine::validate_template;

fuzz_target!(|data: &[u8]| {
    if let Ok(template) = std::str::from_utf8(data) {
        let _ = validate_template(template);
    }
});
