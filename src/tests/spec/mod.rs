mod corpus;

use crate::{Document, deserialize_from_slice, serialize_to_vec};
use pretty_assertions::assert_eq;

/// One valid entry of the BSON corpus: the canonical bytes and both Extended JSON renderings.
pub(crate) struct Valid {
    pub(crate) description: &'static str,
    pub(crate) canonical_bson: &'static str,
    pub(crate) canonical_extjson: &'static str,
    pub(crate) relaxed_extjson: Option<&'static str>,
}

/// Normalizes JSON text so that expected and produced strings compare independently of
/// whitespace.
fn compact(json: &str) -> String {
    let value: serde_json::Value = serde_json::from_str(json)
        .unwrap_or_else(|e| panic!("invalid expectation {}: {}", json, e));
    value.to_string()
}

pub(crate) fn run_valid(case: &Valid) {
    let description = case.description;
    let canonical_bson = hex::decode(case.canonical_bson).unwrap();

    // native_to_bson(bson_to_native(cB)) = cB
    let doc = Document::from_bytes(canonical_bson.clone())
        .unwrap_or_else(|e| panic!("{}: failed to parse canonical bson: {}", description, e));
    assert_eq!(doc.as_bytes(), canonical_bson.as_slice(), "{}", description);

    // native_to_canonical_extended_json(bson_to_native(cB)) = cEJ
    assert_eq!(
        doc.to_canonical_extjson_string(),
        compact(case.canonical_extjson),
        "{}",
        description
    );

    // native_to_bson(json_to_native(cEJ)) = cB
    let from_canonical = Document::from_extjson_str(case.canonical_extjson)
        .unwrap_or_else(|e| panic!("{}: failed to parse canonical extjson: {}", description, e));
    assert_eq!(
        hex::encode_upper(from_canonical.as_bytes()),
        case.canonical_bson,
        "{}",
        description
    );

    if let Some(relaxed) = case.relaxed_extjson {
        // native_to_relaxed_extended_json(bson_to_native(cB)) = rEJ
        assert_eq!(doc.to_relaxed_extjson_string(), compact(relaxed), "{}", description);

        // native_to_relaxed_extended_json(json_to_native(rEJ)) = rEJ
        let from_relaxed = Document::from_extjson_str(relaxed)
            .unwrap_or_else(|e| panic!("{}: failed to parse relaxed extjson: {}", description, e));
        assert_eq!(
            from_relaxed.to_relaxed_extjson_string(),
            compact(relaxed),
            "{}",
            description
        );
    }

    // the serde path reproduces the same bytes
    let through_serde: Document = deserialize_from_slice(&canonical_bson)
        .unwrap_or_else(|e| panic!("{}: serde decode failed: {}", description, e));
    let bytes = serialize_to_vec(&through_serde)
        .unwrap_or_else(|e| panic!("{}: serde encode failed: {}", description, e));
    assert_eq!(hex::encode_upper(bytes), case.canonical_bson, "{}", description);
}

pub(crate) fn run_decode_error(description: &str, bson: &str) {
    let bytes = hex::decode(bson).unwrap();
    let err = Document::from_bytes(bytes.clone())
        .expect_err(description);
    assert!(err.is_malformed_bytes(), "{}: {:?}", description, err);
    assert!(
        deserialize_from_slice::<Document>(&bytes).is_err(),
        "{}",
        description
    );
}

pub(crate) fn run_parse_error(description: &str, extjson: &str) {
    let err = Document::from_extjson_str(extjson).expect_err(description);
    assert!(err.is_extended_json(), "{}: {:?}", description, err);
}
