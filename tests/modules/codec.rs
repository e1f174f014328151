use bson_core::{
    DateTime,
    Decoder,
    Encoder,
    Uuid,
    de::{BytesDecodingStrategy, DateDecodingStrategy, DecoderOptions, UuidDecodingStrategy},
    doc,
    ser::{BytesEncodingStrategy, DateEncodingStrategy, EncoderOptions, UuidEncodingStrategy},
};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Record {
    id: Uuid,
    created: DateTime,
    payload: ByteBuf,
    count: u32,
}

fn record() -> Record {
    Record {
        id: Uuid::parse_str("73ffd264-44b3-4c69-90e8-e7d1dfc035d4").unwrap(),
        created: DateTime::from_millis(1_356_351_330_501),
        payload: ByteBuf::from(vec![1, 2, 3]),
        count: 7,
    }
}

fn round_trip(encode: EncoderOptions, decode: DecoderOptions) -> bson_core::Document {
    let encoder = Encoder::with_options(encode);
    let decoder = Decoder::with_options(decode);

    let doc = encoder.encode(&record()).unwrap();
    let back: Record = decoder.decode(doc.clone()).unwrap();
    assert_eq!(back, record());

    let bytes = encoder.encode_to_vec(&record()).unwrap();
    assert_eq!(bytes, doc.to_vec());
    assert_eq!(decoder.decode_from_slice::<Record>(&bytes).unwrap(), record());
    doc
}

#[test]
fn default_options() {
    let doc = round_trip(EncoderOptions::default(), DecoderOptions::default());
    assert_eq!(doc.get_datetime("created").unwrap(), record().created);
    assert_eq!(doc.get_binary("id").unwrap().bytes().len(), 16);
    assert_eq!(doc.get_binary_generic("payload").unwrap(), &[1, 2, 3]);
}

#[test]
fn text_friendly_options() {
    let doc = round_trip(
        EncoderOptions::builder()
            .date(DateEncodingStrategy::Iso8601)
            .bytes(BytesEncodingStrategy::Base64)
            .uuid(UuidEncodingStrategy::String)
            .build(),
        DecoderOptions::builder()
            .date(DateDecodingStrategy::Iso8601)
            .bytes(BytesDecodingStrategy::Base64)
            .uuid(UuidDecodingStrategy::String)
            .build(),
    );
    assert_eq!(
        doc,
        doc! {
            "id": "73ffd264-44b3-4c69-90e8-e7d1dfc035d4",
            "created": "2012-12-24T12:15:30.501Z",
            "payload": "AQID",
            "count": 7,
        }
    );
}

#[test]
fn numeric_dates() {
    let doc = round_trip(
        EncoderOptions::builder()
            .date(DateEncodingStrategy::SecondsSinceEpoch)
            .build(),
        DecoderOptions::builder()
            .date(DateDecodingStrategy::SecondsSinceEpoch)
            .build(),
    );
    assert_eq!(doc.get_f64("created").unwrap(), 1_356_351_330.501);

    let doc = round_trip(
        EncoderOptions::builder()
            .date(DateEncodingStrategy::MillisecondsSinceEpoch)
            .build(),
        DecoderOptions::builder()
            .date(DateDecodingStrategy::MillisecondsSinceEpoch)
            .build(),
    );
    assert_eq!(doc.get_i64("created").unwrap(), 1_356_351_330_501);
}

#[test]
fn mismatched_strategies_fail_with_location() {
    let doc = Encoder::with_options(
        EncoderOptions::builder()
            .date(DateEncodingStrategy::Iso8601)
            .build(),
    )
    .encode(&record())
    .unwrap();

    let err = Decoder::new().decode::<Record>(doc).unwrap_err();
    assert!(err.is_type_mismatch());
    assert_eq!(err.key.as_deref(), Some("created"));
}

#[test]
fn out_of_range_numbers_are_rejected() {
    let mut doc = Encoder::new().encode(&record()).unwrap();
    doc.insert("count", -1);

    let err = Decoder::new().decode::<Record>(doc).unwrap_err();
    assert!(err.is_type_mismatch());
    assert_eq!(err.key.as_deref(), Some("count"));
}
