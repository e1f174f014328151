#![no_main]
use bson_core::Document;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: &str| {
    if let Ok(doc) = Document::from_extjson_str(input) {
        let canonical = doc.to_canonical_extjson_string();
        let reparsed = Document::from_extjson_str(&canonical)
            .expect("canonical output must parse");
        assert_eq!(reparsed, doc);
        let _ = doc.to_relaxed_extjson_string();
    }
});
