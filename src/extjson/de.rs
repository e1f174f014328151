//! Deserializing [MongoDB Extended JSON v2](https://www.mongodb.com/docs/manual/reference/mongodb-extended-json/)
//!
//! ## Usage
//!
//! Extended JSON can be deserialized using [`Bson`]'s `TryFrom<serde_json::Value>`
//! implementation. This implementation accepts both canonical and relaxed extJSON, and the two
//! modes can even be mixed within a single representation.
//!
//! e.g.
//! ```rust
//! # use bson_core::Bson;
//! # use serde_json::json;
//! let json_doc = json!({ "x": 5i32, "y": { "$numberInt": "5" }, "z": { "subdoc": "hello" } });
//! let bson: Bson = json_doc.try_into().unwrap(); // Bson::Document(...)
//!
//! let json_date = json!({ "$date": { "$numberLong": "1590972160292" } });
//! let bson_date: Bson = json_date.try_into().unwrap(); // Bson::DateTime(...)
//!
//! let invalid_ext_json = json!({ "$numberLong": 5 });
//! Bson::try_from(invalid_ext_json).expect_err("5 should be a string");
//! ```
//!
//! Bare JSON numbers take the narrowest BSON type that holds them exactly: integers become
//! `Int32` or `Int64`, and anything written with a fraction or exponent becomes a `Double`.

use crate::{
    Binary,
    Bson,
    DateTime,
    Decimal128,
    Document,
    bson::{DbPointer, JavaScriptCodeWithScope, Regex, Timestamp},
    error::{Error, Result},
    extjson::models,
    oid::ObjectId,
    raw::RawBsonRef,
    spec::BinarySubtype,
};

/// This converts from the input JSON object as if it were [MongoDB Extended JSON v2](https://www.mongodb.com/docs/manual/reference/mongodb-extended-json/).
impl TryFrom<serde_json::Map<String, serde_json::Value>> for Bson {
    type Error = Error;

    fn try_from(obj: serde_json::Map<String, serde_json::Value>) -> Result<Self> {
        if obj.contains_key("$oid") {
            let oid: models::ObjectId = serde_json::from_value(obj.into())?;
            return Ok(Bson::ObjectId(oid.parse()?));
        }

        if obj.contains_key("$symbol") {
            let symbol: models::Symbol = serde_json::from_value(obj.into())?;
            return Ok(Bson::Symbol(symbol.value));
        }

        if obj.contains_key("$regularExpression") {
            let regex: models::Regex = serde_json::from_value(obj.into())?;
            return Ok(regex.parse().into());
        }

        // `$regex` is also a query operator, so only the two-string legacy shape is special.
        if obj.contains_key("$regex") && obj.contains_key("$options") && obj.len() == 2 {
            if let Ok(regex) = serde_json::from_value::<models::LegacyRegex>(obj.clone().into()) {
                return Ok(regex.parse().into());
            }
        }

        if obj.contains_key("$numberInt") {
            let int: models::Int32 = serde_json::from_value(obj.into())?;
            return Ok(Bson::Int32(int.parse()?));
        }

        if obj.contains_key("$numberLong") {
            let int: models::Int64 = serde_json::from_value(obj.into())?;
            return Ok(Bson::Int64(int.parse()?));
        }

        if obj.contains_key("$numberDouble") {
            let double: models::Double = serde_json::from_value(obj.into())?;
            return Ok(Bson::Double(double.parse()?));
        }

        if obj.contains_key("$numberDecimal") {
            let decimal: models::Decimal128 = serde_json::from_value(obj.into())?;
            return Ok(Bson::Decimal128(decimal.parse()?));
        }

        if obj.contains_key("$binary") {
            let binary: models::Binary = serde_json::from_value(obj.into())?;
            return Ok(Bson::Binary(binary.parse()?));
        }

        if obj.contains_key("$uuid") {
            let uuid: models::Uuid = serde_json::from_value(obj.into())?;
            return Ok(Bson::Binary(uuid.parse()?));
        }

        if obj.contains_key("$code") {
            let code_w_scope: models::JavaScriptCodeWithScope =
                serde_json::from_value(obj.into())?;
            return match code_w_scope.scope {
                Some(scope) => Ok(JavaScriptCodeWithScope {
                    code: code_w_scope.code,
                    scope: scope.try_into()?,
                }
                .into()),
                None => Ok(Bson::JavaScriptCode(code_w_scope.code)),
            };
        }

        if obj.contains_key("$timestamp") {
            let ts: models::Timestamp = serde_json::from_value(obj.into())?;
            return Ok(ts.parse().into());
        }

        if obj.contains_key("$date") {
            let extjson_datetime: models::DateTime = serde_json::from_value(obj.into())?;
            return Ok(Bson::DateTime(extjson_datetime.parse()?));
        }

        if obj.contains_key("$minKey") {
            let min_key: models::MinKey = serde_json::from_value(obj.into())?;
            return min_key.parse();
        }

        if obj.contains_key("$maxKey") {
            let max_key: models::MaxKey = serde_json::from_value(obj.into())?;
            return max_key.parse();
        }

        if obj.contains_key("$dbPointer") {
            let db_ptr: models::DbPointer = serde_json::from_value(obj.into())?;
            return Ok(db_ptr.parse()?.into());
        }

        if obj.contains_key("$undefined") {
            let undefined: models::Undefined = serde_json::from_value(obj.into())?;
            return undefined.parse();
        }

        Ok(Bson::Document(obj.try_into()?))
    }
}

/// This converts from the input JSON as if it were [MongoDB Extended JSON v2](https://www.mongodb.com/docs/manual/reference/mongodb-extended-json/).
impl TryFrom<serde_json::Value> for Bson {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Number(x) => {
                if let Some(i) = x.as_i64() {
                    Ok(Bson::from_i64_fitted(i))
                } else if let Some(u) = x.as_u64() {
                    Bson::from_u64_fitted(u)
                        .map_err(|_| Error::extended_json(format!("number {} is out of range", x)))
                } else {
                    x.as_f64().map(Bson::Double).ok_or_else(|| {
                        Error::extended_json(format!(
                            "{} is not a number that fits in i32, i64 or f64",
                            x
                        ))
                    })
                }
            }
            serde_json::Value::String(x) => Ok(x.into()),
            serde_json::Value::Bool(x) => Ok(x.into()),
            serde_json::Value::Array(x) => Ok(Bson::Array(
                x.into_iter()
                    .enumerate()
                    .map(|(index, v)| Bson::try_from(v).map_err(|e| e.with_index(index)))
                    .collect::<Result<Vec<Bson>>>()?,
            )),
            serde_json::Value::Null => Ok(Bson::Null),
            serde_json::Value::Object(map) => map.try_into(),
        }
    }
}

/// This converts from the input JSON object as if it were [MongoDB Extended JSON v2](https://www.mongodb.com/docs/manual/reference/mongodb-extended-json/).
impl TryFrom<serde_json::Map<String, serde_json::Value>> for Document {
    type Error = Error;

    fn try_from(obj: serde_json::Map<String, serde_json::Value>) -> Result<Self> {
        let mut doc = Document::new();
        for (key, value) in obj {
            let value = Bson::try_from(value).map_err(|e| {
                if e.key.is_none() {
                    e.with_key(key.as_str())
                } else {
                    e
                }
            })?;
            doc.try_insert(key, value)?;
        }
        Ok(doc)
    }
}

/// This converts from the input JSON as if it were [MongoDB Extended JSON v2](https://www.mongodb.com/docs/manual/reference/mongodb-extended-json/).
/// The top level value must be an object.
impl TryFrom<serde_json::Value> for Document {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        match Bson::try_from(value)? {
            Bson::Document(doc) => Ok(doc),
            other => Err(Error::extended_json(format!(
                "expected a JSON object for a document, got {:?}",
                other.element_type()
            ))),
        }
    }
}

impl Document {
    /// Parses Extended JSON text, canonical, relaxed or a mix of both, into a document.
    ///
    /// ```
    /// use bson_core::{doc, Document};
    ///
    /// let doc = Document::from_extjson_str(r#"{"i": {"$numberInt": "1"}, "d": 2.5}"#)?;
    /// assert_eq!(doc, doc! { "i": 1, "d": 2.5 });
    /// # Ok::<(), bson_core::error::Error>(())
    /// ```
    pub fn from_extjson_str(input: impl AsRef<str>) -> Result<Document> {
        let parsed = serde_json::from_str::<serde_json::Value>(input.as_ref())
            .map_err(Error::from)
            .and_then(Document::try_from);
        if let Err(ref error) = parsed {
            tracing::debug!(%error, "rejected Extended JSON input");
        }
        parsed
    }
}

impl Bson {
    /// Recovers the BSON value for a document holding one of the Extended JSON wrappers, as
    /// produced when a BSON-specific type goes through the serde data model. Documents that
    /// don't match a wrapper exactly are returned unchanged.
    pub(crate) fn from_extended_document(doc: Document) -> Bson {
        if doc.len() > 2 {
            return Bson::Document(doc);
        }

        let mut keys: Vec<_> = doc.keys().collect();
        keys.sort_unstable();

        let parsed = match keys.as_slice() {
            ["$oid"] => doc
                .get_str("$oid")
                .ok()
                .and_then(|s| ObjectId::parse_str(s).ok())
                .map(Bson::ObjectId),
            ["$symbol"] => doc.get_str("$symbol").ok().map(|s| Bson::Symbol(s.into())),
            ["$numberInt"] => doc
                .get_str("$numberInt")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Bson::Int32),
            ["$numberLong"] => doc
                .get_str("$numberLong")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Bson::Int64),
            ["$numberDouble"] => doc
                .get_str("$numberDouble")
                .ok()
                .and_then(|s| models::parse_double(s).ok())
                .map(Bson::Double),
            ["$numberDecimal"] => doc
                .get_str("$numberDecimal")
                .ok()
                .and_then(|s| s.parse::<Decimal128>().ok())
                .map(Bson::Decimal128),
            ["$binary"] => doc.get_document("$binary").ok().and_then(|binary| {
                let bytes = binary.get_str("base64").ok()?;
                let subtype = hex::decode(binary.get_str("subType").ok()?).ok()?;
                match subtype.as_slice() {
                    [subtype] => Binary::from_base64(bytes, BinarySubtype::from(*subtype)).ok(),
                    _ => None,
                }
            })
            .map(Bson::Binary),
            ["$uuid"] => doc
                .get_str("$uuid")
                .ok()
                .and_then(|s| crate::uuid::Uuid::parse_str(s).ok())
                .map(Bson::from),
            ["$code"] => doc
                .get_str("$code")
                .ok()
                .map(|code| Bson::JavaScriptCode(code.into())),
            ["$code", "$scope"] => match (doc.get_str("$code"), doc.get_document("$scope")) {
                (Ok(code), Ok(scope)) => Some(Bson::JavaScriptCodeWithScope(
                    JavaScriptCodeWithScope {
                        code: code.into(),
                        scope,
                    },
                )),
                _ => None,
            },
            ["$timestamp"] => doc.get_document("$timestamp").ok().and_then(|ts| {
                let time = ts.get("t")?.to_i64().and_then(|t| u32::try_from(t).ok())?;
                let increment = ts.get("i")?.to_i64().and_then(|i| u32::try_from(i).ok())?;
                Some(Bson::Timestamp(Timestamp { time, increment }))
            }),
            ["$regularExpression"] => doc.get_document("$regularExpression").ok().and_then(|re| {
                let pattern = re.get_str("pattern").ok()?;
                let options = re.get_str("options").ok()?;
                Some(Bson::RegularExpression(Regex::new(pattern, options)))
            }),
            ["$dbPointer"] => doc.get_document("$dbPointer").ok().and_then(|ptr| {
                let namespace = ptr.get_str("$ref").ok()?.to_string();
                let id = match ptr.get("$id")? {
                    Bson::ObjectId(id) => id,
                    Bson::Document(id) => Bson::from_extended_document(id).as_object_id()?,
                    _ => return None,
                };
                Some(Bson::DbPointer(DbPointer { namespace, id }))
            }),
            ["$date"] => match doc.get_raw("$date") {
                Some(RawBsonRef::DateTime(dt)) => Some(Bson::DateTime(dt)),
                Some(RawBsonRef::Int64(ms)) => Some(Bson::DateTime(DateTime::from_millis(ms))),
                Some(RawBsonRef::Int32(ms)) => {
                    Some(Bson::DateTime(DateTime::from_millis(ms.into())))
                }
                Some(RawBsonRef::String(s)) => DateTime::parse_rfc3339_str(s).ok().map(Bson::from),
                Some(RawBsonRef::Document(_)) => doc
                    .get_document("$date")
                    .ok()
                    .and_then(|inner| match Bson::from_extended_document(inner) {
                        Bson::Int64(ms) => Some(Bson::DateTime(DateTime::from_millis(ms))),
                        _ => None,
                    }),
                _ => None,
            },
            ["$minKey"] => doc
                .get("$minKey")
                .filter(|v| v.to_i64() == Some(1))
                .map(|_| Bson::MinKey),
            ["$maxKey"] => doc
                .get("$maxKey")
                .filter(|v| v.to_i64() == Some(1))
                .map(|_| Bson::MaxKey),
            ["$undefined"] => doc
                .get_bool("$undefined")
                .ok()
                .filter(|b| *b)
                .map(|_| Bson::Undefined),
            _ => None,
        };

        parsed.unwrap_or(Bson::Document(doc))
    }
}
