use super::{Valid, run_decode_error, run_parse_error, run_valid};

fn valid(
    description: &'static str,
    canonical_bson: &'static str,
    canonical_extjson: &'static str,
    relaxed_extjson: Option<&'static str>,
) -> Valid {
    Valid {
        description,
        canonical_bson,
        canonical_extjson,
        relaxed_extjson,
    }
}

#[test]
fn int32() {
    run_valid(&valid(
        "Int32: 1",
        "0C0000001069000100000000",
        r#"{"i": {"$numberInt": "1"}}"#,
        Some(r#"{"i": 1}"#),
    ));
    run_valid(&valid(
        "Int32: MinValue",
        "0C0000001069000000008000",
        r#"{"i": {"$numberInt": "-2147483648"}}"#,
        Some(r#"{"i": -2147483648}"#),
    ));
    run_decode_error("Int32: truncated", "090000001061000500");
}

#[test]
fn int64() {
    run_valid(&valid(
        "Int64: 1",
        "10000000126100010000000000000000",
        r#"{"a": {"$numberLong": "1"}}"#,
        Some(r#"{"a": 1}"#),
    ));
    run_valid(&valid(
        "Int64: MaxValue",
        "10000000126100FFFFFFFFFFFFFF7F00",
        r#"{"a": {"$numberLong": "9223372036854775807"}}"#,
        Some(r#"{"a": 9223372036854775807}"#),
    ));
}

#[test]
fn double() {
    run_valid(&valid(
        "Double: 1.0",
        "10000000016400000000000000F03F00",
        r#"{"d": {"$numberDouble": "1.0"}}"#,
        Some(r#"{"d": 1.0}"#),
    ));
    run_valid(&valid(
        "Double: -1.0001220703125",
        "10000000016400000000008000F0BF00",
        r#"{"d": {"$numberDouble": "-1.0001220703125"}}"#,
        Some(r#"{"d": -1.0001220703125}"#),
    ));
    run_valid(&valid(
        "Double: -0.0",
        "10000000016400000000000000008000",
        r#"{"d": {"$numberDouble": "-0.0"}}"#,
        Some(r#"{"d": -0.0}"#),
    ));
    run_valid(&valid(
        "Double: NaN",
        "10000000016400000000000000F87F00",
        r#"{"d": {"$numberDouble": "NaN"}}"#,
        Some(r#"{"d": {"$numberDouble": "NaN"}}"#),
    ));
    run_valid(&valid(
        "Double: Infinity",
        "10000000016400000000000000F07F00",
        r#"{"d": {"$numberDouble": "Infinity"}}"#,
        Some(r#"{"d": {"$numberDouble": "Infinity"}}"#),
    ));
    run_parse_error("Double: bad text", r#"{"d": {"$numberDouble": "one"}}"#);
}

#[test]
fn string() {
    run_valid(&valid(
        "String: one character",
        "0E00000002610002000000620000",
        r#"{"a": "b"}"#,
        None,
    ));
    run_valid(&valid(
        "String: two byte UTF-8",
        "0F00000002610003000000C3A90000",
        r#"{"a": "é"}"#,
        None,
    ));
    run_decode_error("String: invalid UTF-8", "0E00000002610002000000E90000");
}

#[test]
fn boolean_and_null() {
    run_valid(&valid("Boolean: true", "090000000862000100", r#"{"b": true}"#, None));
    run_valid(&valid("Null", "080000000A610000", r#"{"a": null}"#, None));
    run_decode_error("Boolean: invalid value", "090000000862000200");
}

#[test]
fn object_id() {
    run_valid(&valid(
        "ObjectId",
        "1400000007610056E1FC72E0C917E9C471416100",
        r#"{"a": {"$oid": "56e1fc72e0c917e9c4714161"}}"#,
        None,
    ));
    run_parse_error("ObjectId: short", r#"{"a": {"$oid": "56e1fc72e0c917e9c471"}}"#);
}

#[test]
fn datetime() {
    run_valid(&valid(
        "DateTime: epoch",
        "10000000096100000000000000000000",
        r#"{"a": {"$date": {"$numberLong": "0"}}}"#,
        Some(r#"{"a": {"$date": "1970-01-01T00:00:00Z"}}"#),
    ));
    run_valid(&valid(
        "DateTime: positive with milliseconds",
        "10000000096100C5D8D6CC3B01000000",
        r#"{"a": {"$date": {"$numberLong": "1356351330501"}}}"#,
        Some(r#"{"a": {"$date": "2012-12-24T12:15:30.501Z"}}"#),
    ));
    run_valid(&valid(
        "DateTime: negative",
        "10000000096100C33CE7B9BDFFFFFF00",
        r#"{"a": {"$date": {"$numberLong": "-284643869501"}}}"#,
        Some(r#"{"a": {"$date": {"$numberLong": "-284643869501"}}}"#),
    ));
}

#[test]
fn binary() {
    run_valid(&valid(
        "Binary: generic",
        "0F0000000578000200000000FFFF00",
        r#"{"x": {"$binary": {"base64": "//8=", "subType": "00"}}}"#,
        None,
    ));
    run_valid(&valid(
        "Binary: UUID",
        "1D000000057800100000000473FFD26444B34C6990E8E7D1DFC035D400",
        r#"{"x": {"$binary": {"base64": "c//SZESzTGmQ6OfR38A11A==", "subType": "04"}}}"#,
        None,
    ));
    run_valid(&valid(
        "Binary: old",
        "13000000057800060000000202000000FFFF00",
        r#"{"x": {"$binary": {"base64": "//8=", "subType": "02"}}}"#,
        None,
    ));
    run_valid(&valid(
        "Binary: user defined",
        "0F0000000578000200000080FFFF00",
        r#"{"x": {"$binary": {"base64": "//8=", "subType": "80"}}}"#,
        None,
    ));
    run_parse_error(
        "Binary: subtype too long",
        r#"{"x": {"$binary": {"base64": "//8=", "subType": "0400"}}}"#,
    );
    run_parse_error(
        "Binary: UUID with a bad string",
        r#"{"x": {"$uuid": "73ffd264-44b3-4c69-90e8-e7d1dfc035"}}"#,
    );
}

#[test]
fn regex_and_timestamp() {
    run_valid(&valid(
        "Regex",
        "0F0000000B610061626300696D0000",
        r#"{"a": {"$regularExpression": {"pattern": "abc", "options": "im"}}}"#,
        None,
    ));
    run_valid(&valid(
        "Timestamp",
        "100000001161002A00000015CD5B0700",
        r#"{"a": {"$timestamp": {"t": 123456789, "i": 42}}}"#,
        None,
    ));
}

#[test]
fn keys() {
    run_valid(&valid("MinKey", "08000000FF610000", r#"{"a": {"$minKey": 1}}"#, None));
    run_valid(&valid("MaxKey", "080000007F610000", r#"{"a": {"$maxKey": 1}}"#, None));
    run_parse_error("MinKey: not one", r#"{"a": {"$minKey": 0}}"#);
}

#[test]
fn array_and_document() {
    run_valid(&valid(
        "Array: two elements",
        "1B0000000461001300000010300001000000103100020000000000",
        r#"{"a": [{"$numberInt": "1"}, {"$numberInt": "2"}]}"#,
        Some(r#"{"a": [1, 2]}"#),
    ));
    run_valid(&valid(
        "Document: empty key",
        "150000000378000D00000002000200000062000000",
        r#"{"x": {"": "b"}}"#,
        None,
    ));
}

#[test]
fn decimal128() {
    run_valid(&valid(
        "Decimal128: 1",
        "180000001364000100000000000000000000000000403000",
        r#"{"d": {"$numberDecimal": "1"}}"#,
        None,
    ));
    run_parse_error("Decimal128: garbage", r#"{"d": {"$numberDecimal": "E02"}}"#);
}

#[test]
fn deprecated_types() {
    run_valid(&valid(
        "Symbol",
        "100000000E6100040000006162630000",
        r#"{"a": {"$symbol": "abc"}}"#,
        None,
    ));
    run_valid(&valid(
        "Code",
        "100000000D6100040000006162630000",
        r#"{"a": {"$code": "abc"}}"#,
        None,
    ));
    run_valid(&valid(
        "Code with scope",
        "210000000F6100190000000500000061626364000C000000107800010000000000",
        r#"{"a": {"$code": "abcd", "$scope": {"x": {"$numberInt": "1"}}}}"#,
        Some(r#"{"a": {"$code": "abcd", "$scope": {"x": 1}}}"#),
    ));
    run_valid(&valid(
        "DBPointer",
        "1A0000000C610002000000620056E1FC72E0C917E9C471416100",
        r#"{"a": {"$dbPointer": {"$ref": "b", "$id": {"$oid": "56e1fc72e0c917e9c4714161"}}}}"#,
        None,
    ));
    run_valid(&valid(
        "Undefined",
        "0800000006610000",
        r#"{"a": {"$undefined": true}}"#,
        None,
    ));
}
