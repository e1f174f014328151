//! Serde models for the Extended JSON wrappers of the various BSON types.

use serde::Deserialize;

use crate::{
    Bson,
    bson::sort_options,
    error::{Error, Result},
    oid,
    spec::BinarySubtype,
};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Int32 {
    #[serde(rename = "$numberInt")]
    value: String,
}

impl Int32 {
    pub(crate) fn parse(self) -> Result<i32> {
        self.value.parse().map_err(|_| {
            Error::extended_json(format!("expected i32 as a string, got {:?}", self.value))
        })
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Int64 {
    #[serde(rename = "$numberLong")]
    value: String,
}

impl Int64 {
    pub(crate) fn parse(self) -> Result<i64> {
        self.value.parse().map_err(|_| {
            Error::extended_json(format!("expected i64 as a string, got {:?}", self.value))
        })
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Double {
    #[serde(rename = "$numberDouble")]
    value: String,
}

impl Double {
    pub(crate) fn parse(self) -> Result<f64> {
        parse_double(&self.value)
    }
}

pub(crate) fn parse_double(value: &str) -> Result<f64> {
    match value {
        "Infinity" => Ok(f64::INFINITY),
        "-Infinity" => Ok(f64::NEG_INFINITY),
        "NaN" => Ok(f64::NAN),
        other => other.parse().map_err(|_| {
            Error::extended_json(format!("expected bson double as string, got {:?}", other))
        }),
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Decimal128 {
    #[serde(rename = "$numberDecimal")]
    value: String,
}

impl Decimal128 {
    pub(crate) fn parse(self) -> Result<crate::Decimal128> {
        self.value.parse().map_err(|e: Error| {
            Error::extended_json(format!("invalid $numberDecimal {:?}: {}", self.value, e))
        })
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ObjectId {
    #[serde(rename = "$oid")]
    oid: String,
}

impl ObjectId {
    pub(crate) fn parse(self) -> Result<oid::ObjectId> {
        oid::ObjectId::parse_str(self.oid.as_str())
            .map_err(|e| Error::extended_json(format!("invalid $oid: {}", e)))
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Symbol {
    #[serde(rename = "$symbol")]
    pub(crate) value: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Regex {
    #[serde(rename = "$regularExpression")]
    body: RegexBody,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RegexBody {
    pattern: String,
    options: String,
}

impl Regex {
    pub(crate) fn parse(self) -> crate::bson::Regex {
        crate::bson::Regex {
            pattern: self.body.pattern,
            options: sort_options(&self.body.options),
        }
    }
}

/// The pre-v2 `{"$regex": ..., "$options": ...}` form.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LegacyRegex {
    #[serde(rename = "$regex")]
    pattern: String,
    #[serde(rename = "$options")]
    options: String,
}

impl LegacyRegex {
    pub(crate) fn parse(self) -> crate::bson::Regex {
        crate::bson::Regex::new(self.pattern, self.options)
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Binary {
    #[serde(rename = "$binary")]
    body: BinaryBody,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct BinaryBody {
    base64: String,
    #[serde(rename = "subType")]
    subtype: String,
}

impl Binary {
    pub(crate) fn parse(self) -> Result<crate::Binary> {
        let subtype = hex::decode(self.body.subtype.as_str()).map_err(|_| {
            Error::extended_json(format!(
                "expected hexadecimal subtype, got {:?}",
                self.body.subtype
            ))
        })?;

        match subtype.as_slice() {
            [subtype] => {
                crate::Binary::from_base64(&self.body.base64, BinarySubtype::from(*subtype))
                    .map_err(|e| Error::extended_json(format!("invalid $binary: {}", e)))
            }
            _ => Err(Error::extended_json(format!(
                "expected a one byte subtype, got {:?}",
                self.body.subtype
            ))),
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Uuid {
    #[serde(rename = "$uuid")]
    value: String,
}

impl Uuid {
    pub(crate) fn parse(self) -> Result<crate::Binary> {
        // Only the canonical hyphenated form is accepted here.
        if self.value.len() != 36 {
            return Err(Error::extended_json(format!(
                "$uuid value {:?} is not in hyphenated RFC 4122 form",
                self.value
            )));
        }
        let uuid = crate::uuid::Uuid::parse_str(&self.value)
            .map_err(|e| Error::extended_json(format!("invalid $uuid: {}", e)))?;
        Ok(crate::Binary::from_uuid(uuid))
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct JavaScriptCodeWithScope {
    #[serde(rename = "$code")]
    pub(crate) code: String,

    #[serde(rename = "$scope")]
    #[serde(default)]
    pub(crate) scope: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Timestamp {
    #[serde(rename = "$timestamp")]
    body: TimestampBody,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TimestampBody {
    t: u32,
    i: u32,
}

impl Timestamp {
    pub(crate) fn parse(self) -> crate::bson::Timestamp {
        crate::bson::Timestamp {
            time: self.body.t,
            increment: self.body.i,
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct DateTime {
    #[serde(rename = "$date")]
    body: DateTimeBody,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DateTimeBody {
    Canonical(Int64),
    Relaxed(String),
    Legacy(i64),
}

impl DateTime {
    pub(crate) fn parse(self) -> Result<crate::DateTime> {
        match self.body {
            DateTimeBody::Canonical(date) => Ok(crate::DateTime::from_millis(date.parse()?)),
            DateTimeBody::Relaxed(date) => crate::DateTime::parse_rfc3339_str(&date)
                .map_err(|_| {
                    Error::extended_json(format!(
                        "expected an RFC 3339 formatted datetime, got {:?}",
                        date
                    ))
                }),
            DateTimeBody::Legacy(millis) => Ok(crate::DateTime::from_millis(millis)),
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct MinKey {
    #[serde(rename = "$minKey")]
    value: u8,
}

impl MinKey {
    pub(crate) fn parse(self) -> Result<Bson> {
        if self.value == 1 {
            Ok(Bson::MinKey)
        } else {
            Err(Error::extended_json(format!(
                "value of $minKey should always be 1, got {}",
                self.value
            )))
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct MaxKey {
    #[serde(rename = "$maxKey")]
    value: u8,
}

impl MaxKey {
    pub(crate) fn parse(self) -> Result<Bson> {
        if self.value == 1 {
            Ok(Bson::MaxKey)
        } else {
            Err(Error::extended_json(format!(
                "value of $maxKey should always be 1, got {}",
                self.value
            )))
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct DbPointer {
    #[serde(rename = "$dbPointer")]
    body: DbPointerBody,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DbPointerBody {
    #[serde(rename = "$ref")]
    ref_ns: String,

    #[serde(rename = "$id")]
    id: ObjectId,
}

impl DbPointer {
    pub(crate) fn parse(self) -> Result<crate::bson::DbPointer> {
        Ok(crate::bson::DbPointer {
            namespace: self.body.ref_ns,
            id: self.body.id.parse()?,
        })
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Undefined {
    #[serde(rename = "$undefined")]
    value: bool,
}

impl Undefined {
    pub(crate) fn parse(self) -> Result<Bson> {
        if self.value {
            Ok(Bson::Undefined)
        } else {
            Err(Error::extended_json("$undefined should always be true"))
        }
    }
}
