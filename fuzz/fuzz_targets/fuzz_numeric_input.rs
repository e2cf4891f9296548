//! Fuzz target: `parse_number`
//!
//! Feeds arbitrary text into the lenient operator number parser and
//! asserts it never panics and never produces a non-finite value.
//!
//! cargo fuzz run fuzz_numeric_input

#![no_main]

use libfuzzer_sys::fuzz_target;
use scalecal::app::input::parse_number;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let parsed = parse_number(&text);

    assert!(parsed.value.is_finite(), "parser produced {}", parsed.value);
    if parsed.coerced {
        assert_eq!(parsed.value, 0.0, "coerced value must be the zero fallback");
    }

    // Manual overrides truncate into an i32 factor; that must not panic.
    let _ = parsed.value as i32;
});
