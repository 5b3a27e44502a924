//! Fuzz target for template rendering.
//!
//! Run with: cargo +nightly fuzz run fuzz_render
//!
//! Rendering is contractually total: every string is a valid template and
//! must produce some output string. This exercises the scanner, parser,
//! and evaluator with arbitrary byte sequences to find panics or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use promptloom_engine::{Context, TemplateEngine};

fuzz_target!(|data: &[u8]| {
    if let Ok(template) = std::str::from_utf8(data) {
        let engine = TemplateEngine::new();
        let ctx = Context::new()
            .with_variable("name", "fuzz")
            .with_variable("flag", true);
        let _ = engine.render(template, &ctx);
    }
});
