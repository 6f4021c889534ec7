#![no_main]
use cdx_combine::parsers::parse_bom_str;
use cdx_combine::{MergeEngine, OutputOptions, RootComponent};
use libfuzzer_sys::fuzz_target;

/// Fuzz the merge engine with any document the reader accepts.
///
/// The input is merged twice so that collisions between identical documents
/// are exercised, then rendered.
fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(bom) = parse_bom_str(s) else {
        return;
    };
    let Ok(root) = RootComponent::new("fuzz", "0") else {
        return;
    };

    let merged = MergeEngine::new().merge_boms(&root, &[bom.clone(), bom]);
    let _ = merged.to_bom(&OutputOptions::default());
});
