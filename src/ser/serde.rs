use base64::{Engine, engine::general_purpose::STANDARD};
use serde::ser::{
    self,
    Error as _,
    Serialize,
    SerializeMap,
    SerializeSeq,
    SerializeStruct,
    SerializeStructVariant,
    SerializeTuple,
    SerializeTupleStruct,
    SerializeTupleVariant,
};

use crate::{
    Binary,
    DateTime,
    Decimal128,
    bson::{Array, Bson, DbPointer, Document, JavaScriptCodeWithScope, Regex, Timestamp},
    datetime::DATETIME_NEWTYPE_NAME,
    error::{Error, Result},
    oid::ObjectId,
    uuid::{UUID_NEWTYPE_NAME, Uuid},
};

use super::{
    BytesEncodingStrategy,
    DateEncodingStrategy,
    Encoder,
    EncoderOptions,
    UuidEncodingStrategy,
};

/// Newtype name [`Bson::Int64`] serializes through so the encoder keeps its width.
pub(crate) const INT64_NEWTYPE_NAME: &str = "$__bson_core_private_int64";

impl Serialize for ObjectId {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        let mut ser = serializer.serialize_map(Some(1))?;
        ser.serialize_entry("$oid", &self.to_hex())?;
        ser.end()
    }
}

impl Serialize for Document {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        let mut state = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self {
            state.serialize_entry(k, &v)?;
        }
        state.end()
    }
}

impl Serialize for Bson {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        match self {
            Bson::Double(v) => serializer.serialize_f64(*v),
            Bson::String(v) => serializer.serialize_str(v),
            Bson::Array(v) => v.serialize(serializer),
            Bson::Document(v) => v.serialize(serializer),
            Bson::Boolean(v) => serializer.serialize_bool(*v),
            Bson::Null => serializer.serialize_unit(),
            Bson::Int32(v) => serializer.serialize_i32(*v),
            Bson::Int64(v) => serializer.serialize_newtype_struct(INT64_NEWTYPE_NAME, v),
            other => match other.to_extended_document() {
                Some(doc) => doc.serialize(serializer),
                None => Err(S::Error::custom(format!(
                    "no extended document for {:?}",
                    other.element_type()
                ))),
            },
        }
    }
}

fn keyed(error: Error, key: &str) -> Error {
    if error.key.is_none() && error.index.is_none() {
        error.with_key(key)
    } else {
        error
    }
}

fn indexed(error: Error, index: usize) -> Error {
    if error.key.is_none() && error.index.is_none() {
        error.with_index(index)
    } else {
        error
    }
}

/// Picks an exact BSON number for a 128-bit integer, falling back to a double only when the
/// double holds the value exactly.
fn fit_i128(value: i128) -> Result<Bson> {
    if let Ok(v) = i64::try_from(value) {
        return Ok(Bson::from_i64_fitted(v));
    }
    if let Ok(v) = u64::try_from(value) {
        return Bson::from_u64_fitted(v);
    }
    let f = value as f64;
    if f.is_finite() && f >= -(2f64.powi(127)) && f < 2f64.powi(127) && f as i128 == value {
        Ok(Bson::Double(f))
    } else {
        Err(Error::invalid_value(format!(
            "{} cannot be represented exactly by any BSON number",
            value
        )))
    }
}

impl Encoder {
    fn encode_date(&self, dt: DateTime) -> Result<Bson> {
        match &self.options.date {
            DateEncodingStrategy::BsonDateTime => Ok(Bson::DateTime(dt)),
            DateEncodingStrategy::SecondsSinceEpoch => {
                Ok(Bson::Double(dt.timestamp_millis() as f64 / 1000.0))
            }
            DateEncodingStrategy::MillisecondsSinceEpoch => {
                Ok(Bson::Int64(dt.timestamp_millis()))
            }
            DateEncodingStrategy::Iso8601 => Ok(Bson::String(dt.try_to_rfc3339_string()?)),
            DateEncodingStrategy::Formatted(format) => {
                let time = dt.to_time().ok_or_else(|| {
                    Error::invalid_value(format!(
                        "{} ms is outside the formattable range",
                        dt.timestamp_millis()
                    ))
                })?;
                time.format(format)
                    .map(Bson::String)
                    .map_err(Error::invalid_value)
            }
            DateEncodingStrategy::Custom(f) => f(dt),
        }
    }

    fn encode_bytes(&self, bytes: &[u8]) -> Result<Bson> {
        match &self.options.bytes {
            BytesEncodingStrategy::Binary(subtype) => {
                Ok(Bson::Binary(Binary::new(*subtype, bytes)?))
            }
            BytesEncodingStrategy::Base64 => Ok(Bson::String(STANDARD.encode(bytes))),
            BytesEncodingStrategy::DeferredToNative => Ok(Bson::Array(
                bytes.iter().map(|b| Bson::Int32((*b).into())).collect(),
            )),
            BytesEncodingStrategy::Custom(f) => f(bytes),
        }
    }

    fn encode_uuid<T>(self, value: &T) -> Result<Bson>
    where
        T: Serialize + ?Sized,
    {
        let strategy = self.options.uuid;
        if strategy == UuidEncodingStrategy::DeferredToNative {
            return value.serialize(self);
        }

        // A human readable encoder gets the hyphenated text from `uuid::Uuid`.
        let text = value.serialize(Encoder::with_options(
            EncoderOptions::builder().human_readable(true).build(),
        ))?;
        let uuid = match text {
            Bson::String(ref s) => Uuid::parse_str(s)?,
            other => {
                return Err(Error::serialization(format!(
                    "expected a UUID string, got {:?}",
                    other.element_type()
                )));
            }
        };

        match strategy {
            UuidEncodingStrategy::String => Ok(text),
            _ => Ok(Bson::Binary(Binary::from_uuid(uuid))),
        }
    }
}

impl ser::Serializer for Encoder {
    type Ok = Bson;
    type Error = Error;

    type SerializeSeq = ArraySerializer;
    type SerializeTuple = ArraySerializer;
    type SerializeTupleStruct = ArraySerializer;
    type SerializeTupleVariant = TupleVariantSerializer;
    type SerializeMap = MapSerializer;
    type SerializeStruct = StructSerializer;
    type SerializeStructVariant = StructVariantSerializer;

    #[inline]
    fn serialize_bool(self, value: bool) -> Result<Bson> {
        Ok(Bson::Boolean(value))
    }

    #[inline]
    fn serialize_i8(self, value: i8) -> Result<Bson> {
        self.serialize_i32(value.into())
    }

    #[inline]
    fn serialize_u8(self, value: u8) -> Result<Bson> {
        self.serialize_i32(value.into())
    }

    #[inline]
    fn serialize_i16(self, value: i16) -> Result<Bson> {
        self.serialize_i32(value.into())
    }

    #[inline]
    fn serialize_u16(self, value: u16) -> Result<Bson> {
        self.serialize_i32(value.into())
    }

    #[inline]
    fn serialize_i32(self, value: i32) -> Result<Bson> {
        Ok(Bson::Int32(value))
    }

    #[inline]
    fn serialize_u32(self, value: u32) -> Result<Bson> {
        Ok(Bson::from_i64_fitted(value.into()))
    }

    #[inline]
    fn serialize_i64(self, value: i64) -> Result<Bson> {
        Ok(Bson::from_i64_fitted(value))
    }

    #[inline]
    fn serialize_u64(self, value: u64) -> Result<Bson> {
        Bson::from_u64_fitted(value)
    }

    fn serialize_i128(self, value: i128) -> Result<Bson> {
        fit_i128(value)
    }

    fn serialize_u128(self, value: u128) -> Result<Bson> {
        match i128::try_from(value) {
            Ok(v) => fit_i128(v),
            Err(_) => {
                let f = value as f64;
                if f < 2f64.powi(128) && f as u128 == value {
                    Ok(Bson::Double(f))
                } else {
                    Err(Error::invalid_value(format!(
                        "{} cannot be represented exactly by any BSON number",
                        value
                    )))
                }
            }
        }
    }

    #[inline]
    fn serialize_f32(self, value: f32) -> Result<Bson> {
        self.serialize_f64(value.into())
    }

    #[inline]
    fn serialize_f64(self, value: f64) -> Result<Bson> {
        Ok(Bson::Double(value))
    }

    #[inline]
    fn serialize_char(self, value: char) -> Result<Bson> {
        Ok(Bson::String(value.to_string()))
    }

    #[inline]
    fn serialize_str(self, value: &str) -> Result<Bson> {
        Ok(Bson::String(value.to_string()))
    }

    fn serialize_bytes(self, value: &[u8]) -> Result<Bson> {
        self.encode_bytes(value)
    }

    #[inline]
    fn serialize_none(self) -> Result<Bson> {
        self.serialize_unit()
    }

    #[inline]
    fn serialize_some<V>(self, value: &V) -> Result<Bson>
    where
        V: Serialize + ?Sized,
    {
        value.serialize(self)
    }

    #[inline]
    fn serialize_unit(self) -> Result<Bson> {
        Ok(Bson::Null)
    }

    #[inline]
    fn serialize_unit_struct(self, _name: &'static str) -> Result<Bson> {
        self.serialize_unit()
    }

    #[inline]
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Bson> {
        Ok(Bson::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Bson>
    where
        T: Serialize + ?Sized,
    {
        match name {
            DATETIME_NEWTYPE_NAME => match value.serialize(self.clone())? {
                Bson::DateTime(dt) => self.encode_date(dt),
                other => Ok(other),
            },
            UUID_NEWTYPE_NAME => self.encode_uuid(value),
            INT64_NEWTYPE_NAME => match value.serialize(self)? {
                Bson::Int32(v) => Ok(Bson::Int64(v.into())),
                other => Ok(other),
            },
            _ => value.serialize(self),
        }
    }

    #[inline]
    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Bson>
    where
        T: Serialize + ?Sized,
    {
        let value = value.serialize(self).map_err(|e| keyed(e, variant))?;
        let mut newtype_variant = Document::new();
        newtype_variant.push(variant, &value)?;
        Ok(newtype_variant.into())
    }

    #[inline]
    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(ArraySerializer {
            inner: Array::with_capacity(len.unwrap_or(0)),
            encoder: self,
        })
    }

    #[inline]
    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        self.serialize_seq(Some(len))
    }

    #[inline]
    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.serialize_seq(Some(len))
    }

    #[inline]
    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Ok(TupleVariantSerializer {
            inner: ArraySerializer {
                inner: Array::with_capacity(len),
                encoder: self,
            },
            name: variant,
        })
    }

    #[inline]
    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(MapSerializer {
            inner: Document::new(),
            next_key: None,
            encoder: self,
        })
    }

    #[inline]
    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Ok(StructSerializer {
            inner: Document::new(),
            encoder: self,
        })
    }

    #[inline]
    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Ok(StructVariantSerializer {
            name: variant,
            inner: StructSerializer {
                inner: Document::new(),
                encoder: self,
            },
        })
    }

    fn is_human_readable(&self) -> bool {
        self.options.human_readable
    }
}

#[doc(hidden)]
pub struct ArraySerializer {
    inner: Array,
    encoder: Encoder,
}

impl ArraySerializer {
    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let index = self.inner.len();
        let value = value
            .serialize(self.encoder.clone())
            .map_err(|e| indexed(e, index))?;
        self.inner.push(value);
        Ok(())
    }
}

impl SerializeSeq for ArraySerializer {
    type Ok = Bson;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Bson> {
        Ok(Bson::Array(self.inner))
    }
}

impl SerializeTuple for ArraySerializer {
    type Ok = Bson;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Bson> {
        Ok(Bson::Array(self.inner))
    }
}

impl SerializeTupleStruct for ArraySerializer {
    type Ok = Bson;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Bson> {
        Ok(Bson::Array(self.inner))
    }
}

#[doc(hidden)]
pub struct TupleVariantSerializer {
    inner: ArraySerializer,
    name: &'static str,
}

impl SerializeTupleVariant for TupleVariantSerializer {
    type Ok = Bson;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.inner.push(value)
    }

    fn end(self) -> Result<Bson> {
        let mut tuple_variant = Document::new();
        tuple_variant.push(self.name, &Bson::Array(self.inner.inner))?;
        Ok(tuple_variant.into())
    }
}

#[doc(hidden)]
pub struct MapSerializer {
    inner: Document,
    next_key: Option<String>,
    encoder: Encoder,
}

impl SerializeMap for MapSerializer {
    type Ok = Bson;
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        self.next_key = match key.serialize(self.encoder.clone())? {
            Bson::String(s) => Some(s),
            other => {
                return Err(Error::serialization(format!(
                    "map keys must serialize as strings, got {:?}",
                    other.element_type()
                )));
            }
        };
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let key = self.next_key.take().unwrap_or_default();
        let value = value
            .serialize(self.encoder.clone())
            .map_err(|e| keyed(e, &key))?;
        self.inner.try_insert(key, value)?;
        Ok(())
    }

    fn end(self) -> Result<Bson> {
        Ok(Bson::from_extended_document(self.inner))
    }
}

#[doc(hidden)]
pub struct StructSerializer {
    inner: Document,
    encoder: Encoder,
}

impl SerializeStruct for StructSerializer {
    type Ok = Bson;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        let value = value
            .serialize(self.encoder.clone())
            .map_err(|e| keyed(e, key))?;
        self.inner.push(key, &value)
    }

    fn end(self) -> Result<Bson> {
        Ok(Bson::from_extended_document(self.inner))
    }
}

#[doc(hidden)]
pub struct StructVariantSerializer {
    inner: StructSerializer,
    name: &'static str,
}

impl SerializeStructVariant for StructVariantSerializer {
    type Ok = Bson;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        SerializeStruct::serialize_field(&mut self.inner, key, value)
    }

    fn end(self) -> Result<Bson> {
        let var = Bson::from_extended_document(self.inner.inner);

        let mut struct_variant = Document::new();
        struct_variant.push(self.name, &var)?;

        Ok(Bson::Document(struct_variant))
    }
}

impl Serialize for Timestamp {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        Bson::Timestamp(*self).serialize(serializer)
    }
}

impl Serialize for Regex {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        Bson::RegularExpression(self.clone()).serialize(serializer)
    }
}

impl Serialize for JavaScriptCodeWithScope {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        Bson::JavaScriptCodeWithScope(self.clone()).serialize(serializer)
    }
}

impl Serialize for Binary {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        Bson::Binary(self.clone()).serialize(serializer)
    }
}

impl Serialize for Decimal128 {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        Bson::Decimal128(*self).serialize(serializer)
    }
}

impl Serialize for DateTime {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_newtype_struct(DATETIME_NEWTYPE_NAME, &Bson::DateTime(*self))
    }
}

impl Serialize for DbPointer {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        Bson::DbPointer(self.clone()).serialize(serializer)
    }
}
