//! Producing [MongoDB Extended JSON v2](https://www.mongodb.com/docs/manual/reference/mongodb-extended-json/)
//!
//! [`Bson::into_canonical_extjson`] keeps the exact type of every value, so parsing its output
//! always yields an equal value. [`Bson::into_relaxed_extjson`] writes numbers as plain JSON
//! numbers and in-range dates as RFC 3339 strings, which is easier to read but may change the
//! integer width on the way back.
//!
//! ```rust
//! use bson_core::doc;
//!
//! let doc = doc! { "i": 1 };
//! assert_eq!(doc.to_canonical_extjson_string(), r#"{"i":{"$numberInt":"1"}}"#);
//! assert_eq!(doc.to_relaxed_extjson_string(), r#"{"i":1}"#);
//! ```

use serde_json::{Value, json};

use crate::{
    Binary,
    Bson,
    Document,
    bson::{DbPointer, JavaScriptCodeWithScope, Regex, Timestamp, sort_options},
};

/// This will create the [relaxed Extended JSON v2](https://www.mongodb.com/docs/manual/reference/mongodb-extended-json/) representation of the provided [`Bson`].
impl From<Bson> for Value {
    fn from(bson: Bson) -> Self {
        bson.into_relaxed_extjson()
    }
}

/// This will create the [relaxed Extended JSON v2](https://www.mongodb.com/docs/manual/reference/mongodb-extended-json/) representation of the provided [`Document`].
impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Bson::Document(doc).into_relaxed_extjson()
    }
}

/// The `$numberDouble` text for a double. Integral values keep a trailing `.0` so they read back
/// as doubles.
fn canonical_double(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        if f.is_sign_negative() {
            "-Infinity".to_string()
        } else {
            "Infinity".to_string()
        }
    } else if f == 0.0 {
        if f.is_sign_negative() {
            "-0.0".to_string()
        } else {
            "0.0".to_string()
        }
    } else {
        let mut s = f.to_string();
        if f.fract() == 0.0 {
            s.push_str(".0");
        }
        s
    }
}

fn binary_json(binary: &Binary) -> Value {
    json!({
        "$binary": {
            "base64": binary.to_base64(),
            "subType": hex::encode([u8::from(binary.subtype())]),
        }
    })
}

impl Bson {
    /// Converts the Bson value into its [relaxed extended JSON representation](https://www.mongodb.com/docs/manual/reference/mongodb-extended-json/).
    pub fn into_relaxed_extjson(self) -> Value {
        match self {
            Bson::Double(v) if !v.is_finite() => json!({ "$numberDouble": canonical_double(v) }),
            Bson::Double(v) => json!(v),
            Bson::String(v) => json!(v),
            Bson::Array(v) => Value::Array(v.into_iter().map(Bson::into_relaxed_extjson).collect()),
            Bson::Document(v) => Value::Object(
                v.into_iter()
                    .map(|(k, v)| (k, v.into_relaxed_extjson()))
                    .collect(),
            ),
            Bson::Boolean(v) => json!(v),
            Bson::Null => Value::Null,
            Bson::RegularExpression(Regex { pattern, options }) => json!({
                "$regularExpression": {
                    "pattern": pattern,
                    "options": sort_options(&options),
                }
            }),
            Bson::JavaScriptCode(code) => json!({ "$code": code }),
            Bson::JavaScriptCodeWithScope(JavaScriptCodeWithScope { code, scope }) => json!({
                "$code": code,
                "$scope": Bson::Document(scope).into_relaxed_extjson(),
            }),
            Bson::Int32(v) => v.into(),
            Bson::Int64(v) => v.into(),
            Bson::Timestamp(Timestamp { time, increment }) => json!({
                "$timestamp": {
                    "t": time,
                    "i": increment,
                }
            }),
            Bson::Binary(ref binary) => binary_json(binary),
            Bson::ObjectId(v) => json!({ "$oid": v.to_hex() }),
            Bson::DateTime(v) if v.is_relaxed_extjson_range() => match v.try_to_rfc3339_string() {
                Ok(formatted) => json!({ "$date": formatted }),
                Err(_) => json!({ "$date": { "$numberLong": v.timestamp_millis().to_string() } }),
            },
            Bson::DateTime(v) => json!({
                "$date": { "$numberLong": v.timestamp_millis().to_string() },
            }),
            Bson::Symbol(v) => json!({ "$symbol": v }),
            Bson::Decimal128(v) => json!({ "$numberDecimal": v.to_string() }),
            Bson::Undefined => json!({ "$undefined": true }),
            Bson::MinKey => json!({ "$minKey": 1 }),
            Bson::MaxKey => json!({ "$maxKey": 1 }),
            Bson::DbPointer(DbPointer { namespace, id }) => json!({
                "$dbPointer": {
                    "$ref": namespace,
                    "$id": {
                        "$oid": id.to_hex()
                    }
                }
            }),
        }
    }

    /// Converts the Bson value into its [canonical extended JSON representation](https://www.mongodb.com/docs/manual/reference/mongodb-extended-json/).
    pub fn into_canonical_extjson(self) -> Value {
        match self {
            Bson::Int32(i) => json!({ "$numberInt": i.to_string() }),
            Bson::Int64(i) => json!({ "$numberLong": i.to_string() }),
            Bson::Double(f) => json!({ "$numberDouble": canonical_double(f) }),
            Bson::DateTime(date) => {
                json!({ "$date": { "$numberLong": date.timestamp_millis().to_string() } })
            }
            Bson::Array(arr) => {
                Value::Array(arr.into_iter().map(Bson::into_canonical_extjson).collect())
            }
            Bson::Document(doc) => Value::Object(
                doc.into_iter()
                    .map(|(k, v)| (k, v.into_canonical_extjson()))
                    .collect(),
            ),
            Bson::JavaScriptCodeWithScope(JavaScriptCodeWithScope { code, scope }) => json!({
                "$code": code,
                "$scope": Bson::Document(scope).into_canonical_extjson(),
            }),

            other => other.into_relaxed_extjson(),
        }
    }

    /// The `$`-keyed wrapper document standing in for this value in the serde data model, or
    /// `None` for the types serde can carry natively.
    pub(crate) fn to_extended_document(&self) -> Option<Document> {
        let mut doc = Document::new();
        match self {
            Bson::Double(_)
            | Bson::String(_)
            | Bson::Array(_)
            | Bson::Document(_)
            | Bson::Boolean(_)
            | Bson::Null
            | Bson::Int32(_)
            | Bson::Int64(_) => return None,
            Bson::RegularExpression(Regex { pattern, options }) => {
                let mut body = Document::new();
                body.insert("pattern", pattern.as_str());
                body.insert("options", sort_options(options));
                doc.insert("$regularExpression", body);
            }
            Bson::JavaScriptCode(code) => {
                doc.insert("$code", code.as_str());
            }
            Bson::JavaScriptCodeWithScope(JavaScriptCodeWithScope { code, scope }) => {
                doc.insert("$code", code.as_str());
                doc.insert("$scope", scope.clone());
            }
            Bson::Timestamp(Timestamp { time, increment }) => {
                let mut body = Document::new();
                body.insert("t", Bson::Int64((*time).into()));
                body.insert("i", Bson::Int64((*increment).into()));
                doc.insert("$timestamp", body);
            }
            Bson::Binary(binary) => {
                let mut body = Document::new();
                body.insert("base64", binary.to_base64());
                body.insert("subType", hex::encode([u8::from(binary.subtype())]));
                doc.insert("$binary", body);
            }
            Bson::ObjectId(id) => {
                doc.insert("$oid", id.to_hex());
            }
            Bson::DateTime(dt) => {
                let mut body = Document::new();
                body.insert("$numberLong", dt.timestamp_millis().to_string());
                doc.insert("$date", body);
            }
            Bson::Symbol(symbol) => {
                doc.insert("$symbol", symbol.as_str());
            }
            Bson::Decimal128(d) => {
                doc.insert("$numberDecimal", d.to_string());
            }
            Bson::Undefined => {
                doc.insert("$undefined", true);
            }
            Bson::MinKey => {
                doc.insert("$minKey", 1);
            }
            Bson::MaxKey => {
                doc.insert("$maxKey", 1);
            }
            Bson::DbPointer(DbPointer { namespace, id }) => {
                let mut oid = Document::new();
                oid.insert("$oid", id.to_hex());
                let mut body = Document::new();
                body.insert("$ref", namespace.as_str());
                body.insert("$id", oid);
                doc.insert("$dbPointer", body);
            }
        }
        Some(doc)
    }
}

impl Document {
    /// Renders the document as canonical Extended JSON text.
    pub fn to_canonical_extjson_string(&self) -> String {
        Bson::Document(self.clone())
            .into_canonical_extjson()
            .to_string()
    }

    /// Renders the document as relaxed Extended JSON text.
    pub fn to_relaxed_extjson_string(&self) -> String {
        Bson::Document(self.clone()).into_relaxed_extjson().to_string()
    }
}
