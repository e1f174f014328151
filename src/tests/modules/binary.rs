use crate::{Binary, Bson, doc, spec::BinarySubtype};

#[test]
fn binary_from_base64() {
    let produced = Binary::from_base64("aGVsbG8=", None).unwrap();
    assert_eq!(produced, Binary::generic(b"hello".to_vec()));

    let produced = Binary::from_base64("", BinarySubtype::Md5).unwrap();
    assert_eq!(produced, Binary::new(BinarySubtype::Md5, Vec::new()).unwrap());

    // an empty payload is no UUID
    assert!(Binary::from_base64("", BinarySubtype::Uuid).is_err());
}

#[test]
fn old_binary_wire_format() {
    let bin = Binary::new(BinarySubtype::BinaryOld, vec![0xff, 0xff]).unwrap();
    let doc = doc! { "x": bin.clone() };
    assert_eq!(
        hex::encode_upper(doc.as_bytes()),
        "13000000057800060000000202000000FFFF00"
    );
    // the inner length is not part of the payload
    assert_eq!(doc.get("x"), Some(Bson::Binary(bin)));
}

#[test]
fn uuid_binary_of_wrong_length_is_rejected_on_decode() {
    // subtype 4 with 15 bytes of payload
    let mut bytes = vec![0x1c, 0, 0, 0, 0x05, b'x', 0, 15, 0, 0, 0, 0x04];
    bytes.extend_from_slice(&[0xab; 15]);
    bytes.push(0);
    let err = crate::Document::from_bytes(bytes).unwrap_err();
    assert!(err.is_malformed_bytes());
    assert_eq!(err.key.as_deref(), Some("x"));
}
