#![no_main]
use cdx_combine::parsers::parse_bom_str;
use libfuzzer_sys::fuzz_target;

const MAX_WRAPPED_INPUT_LEN: usize = 10_000;

/// Fuzz the CycloneDX JSON reader.
///
/// Also wraps the input in a minimal CycloneDX envelope so mutations reach
/// component parsing instead of stopping at the header checks.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = parse_bom_str(s);

        if s.len() < MAX_WRAPPED_INPUT_LEN {
            let wrapped = format!(
                r#"{{"bomFormat":"CycloneDX","specVersion":"1.5","components":[{s}]}}"#,
            );
            let _ = parse_bom_str(&wrapped);
        }
    }
});
