use bson_core::{Binary, Bson, Document, doc, spec::BinarySubtype};
use pretty_assertions::assert_eq;

#[test]
fn single_int32_document() {
    let doc = doc! { "i": 1 };
    assert_eq!(hex::encode_upper(doc.as_bytes()), "0C0000001069000100000000");
    assert_eq!(doc.to_canonical_extjson_string(), r#"{"i":{"$numberInt":"1"}}"#);
    assert_eq!(doc.to_relaxed_extjson_string(), r#"{"i":1}"#);

    let parsed = Document::from_bytes(hex::decode("0C0000001069000100000000").unwrap()).unwrap();
    assert_eq!(parsed, doc);
}

#[test]
fn truncated_and_unterminated_buffers() {
    let bytes = hex::decode("0C0000001069000100000000").unwrap();

    for len in 0..bytes.len() {
        let err = Document::from_bytes(&bytes[..len]).unwrap_err();
        assert!(err.is_malformed_bytes(), "prefix of {} bytes: {:?}", len, err);
    }

    let mut unterminated = bytes.clone();
    *unterminated.last_mut().unwrap() = 1;
    assert!(Document::from_bytes(unterminated).unwrap_err().is_malformed_bytes());

    let mut trailing = bytes;
    trailing.push(0);
    assert!(Document::from_bytes(trailing).unwrap_err().is_malformed_bytes());
}

#[test]
fn uuid_binary_needs_sixteen_bytes() {
    let err = Binary::new(BinarySubtype::Uuid, vec![0; 15]).unwrap_err();
    assert!(err.is_invalid_argument());

    let binary = Binary::new(BinarySubtype::Uuid, vec![0; 16]).unwrap();
    let doc = doc! { "u": binary.clone() };
    assert_eq!(doc.get("u"), Some(Bson::Binary(binary)));
}

#[test]
fn reader_rejects_short_streams() {
    let doc = doc! { "a": "value" };
    let bytes = doc.to_vec();
    assert_eq!(Document::from_reader(bytes.as_slice()).unwrap(), doc);
    assert!(Document::from_reader(&bytes[..bytes.len() - 1]).is_err());
}
