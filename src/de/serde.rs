use std::{fmt, sync::Arc, vec};

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{
    de::{
        self,
        Deserialize,
        DeserializeSeed,
        EnumAccess,
        Error as _,
        MapAccess,
        SeqAccess,
        Unexpected,
        VariantAccess,
        Visitor,
    },
    forward_to_deserialize_any,
};

use crate::{
    Binary,
    DateTime,
    Decimal128,
    bson::{Bson, DbPointer, Document, JavaScriptCodeWithScope, Regex, Timestamp},
    datetime::DATETIME_NEWTYPE_NAME,
    document::IntoIter,
    error::{Error, Result},
    oid::ObjectId,
    spec::BinarySubtype,
    uuid::UUID_NEWTYPE_NAME,
};

use super::{BytesDecodingStrategy, DateDecodingStrategy, DecoderOptions, UuidDecodingStrategy};

pub(crate) struct BsonVisitor;

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer
            .deserialize_any(BsonVisitor)
            .and_then(|bson| match bson {
                Bson::String(oid) => ObjectId::parse_str(&oid).map_err(de::Error::custom),
                Bson::ObjectId(oid) => Ok(oid),
                other => Err(de::Error::invalid_type(
                    other.as_unexpected(),
                    &"an ObjectId or a hex string",
                )),
            })
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_map(BsonVisitor).and_then(|bson| {
            if let Bson::Document(doc) = bson {
                Ok(doc)
            } else {
                let err = format!("expected document, found extended JSON data type: {}", bson);
                Err(de::Error::invalid_type(Unexpected::Map, &&err[..]))
            }
        })
    }
}

impl<'de> Deserialize<'de> for Bson {
    #[inline]
    fn deserialize<D>(deserializer: D) -> std::result::Result<Bson, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(BsonVisitor)
    }
}

impl<'de> Visitor<'de> for BsonVisitor {
    type Value = Bson;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a Bson")
    }

    #[inline]
    fn visit_bool<E>(self, value: bool) -> std::result::Result<Bson, E>
    where
        E: de::Error,
    {
        Ok(Bson::Boolean(value))
    }

    #[inline]
    fn visit_i8<E>(self, value: i8) -> std::result::Result<Bson, E>
    where
        E: de::Error,
    {
        Ok(Bson::Int32(value.into()))
    }

    #[inline]
    fn visit_u8<E>(self, value: u8) -> std::result::Result<Bson, E>
    where
        E: de::Error,
    {
        Ok(Bson::Int32(value.into()))
    }

    #[inline]
    fn visit_i16<E>(self, value: i16) -> std::result::Result<Bson, E>
    where
        E: de::Error,
    {
        Ok(Bson::Int32(value.into()))
    }

    #[inline]
    fn visit_u16<E>(self, value: u16) -> std::result::Result<Bson, E>
    where
        E: de::Error,
    {
        Ok(Bson::Int32(value.into()))
    }

    #[inline]
    fn visit_i32<E>(self, value: i32) -> std::result::Result<Bson, E>
    where
        E: de::Error,
    {
        Ok(Bson::Int32(value))
    }

    #[inline]
    fn visit_u32<E>(self, value: u32) -> std::result::Result<Bson, E>
    where
        E: de::Error,
    {
        Ok(Bson::from_i64_fitted(value.into()))
    }

    #[inline]
    fn visit_i64<E>(self, value: i64) -> std::result::Result<Bson, E>
    where
        E: de::Error,
    {
        Ok(Bson::Int64(value))
    }

    #[inline]
    fn visit_u64<E>(self, value: u64) -> std::result::Result<Bson, E>
    where
        E: de::Error,
    {
        Bson::from_u64_fitted(value).map_err(E::custom)
    }

    #[inline]
    fn visit_f64<E>(self, value: f64) -> std::result::Result<Bson, E> {
        Ok(Bson::Double(value))
    }

    #[inline]
    fn visit_str<E>(self, value: &str) -> std::result::Result<Bson, E>
    where
        E: de::Error,
    {
        self.visit_string(String::from(value))
    }

    #[inline]
    fn visit_string<E>(self, value: String) -> std::result::Result<Bson, E> {
        Ok(Bson::String(value))
    }

    #[inline]
    fn visit_none<E>(self) -> std::result::Result<Bson, E> {
        Ok(Bson::Null)
    }

    #[inline]
    fn visit_some<D>(self, deserializer: D) -> std::result::Result<Bson, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    #[inline]
    fn visit_unit<E>(self) -> std::result::Result<Bson, E> {
        Ok(Bson::Null)
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> std::result::Result<Bson, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    #[inline]
    fn visit_seq<V>(self, mut visitor: V) -> std::result::Result<Bson, V::Error>
    where
        V: SeqAccess<'de>,
    {
        let mut values = Vec::new();

        while let Some(elem) = visitor.next_element()? {
            values.push(elem);
        }

        Ok(Bson::Array(values))
    }

    fn visit_map<V>(self, mut visitor: V) -> std::result::Result<Bson, V::Error>
    where
        V: MapAccess<'de>,
    {
        let mut doc = Document::new();
        while let Some((key, value)) = visitor.next_entry::<String, Bson>()? {
            doc.try_insert(key, value).map_err(V::Error::custom)?;
        }
        Ok(Bson::from_extended_document(doc))
    }

    #[inline]
    fn visit_bytes<E>(self, v: &[u8]) -> std::result::Result<Bson, E>
    where
        E: de::Error,
    {
        Ok(Bson::Binary(Binary::generic(v)))
    }

    #[inline]
    fn visit_byte_buf<E>(self, v: Vec<u8>) -> std::result::Result<Bson, E>
    where
        E: de::Error,
    {
        Ok(Bson::Binary(Binary::generic(v)))
    }
}

fn end_of_stream() -> Error {
    Error::deserialization("end of stream")
}

fn mismatch(value: &Bson, expected: &str) -> Error {
    Error::type_mismatch(format!(
        "{:?} value {} cannot be represented exactly as {}",
        value.element_type(),
        value,
        expected
    ))
}

fn keyed(error: Error, key: &str) -> Error {
    if error.key.is_none() && error.index.is_none() {
        error.with_key(key)
    } else {
        error
    }
}

const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

fn to_u64_exact(value: &Bson) -> Option<u64> {
    match value {
        Bson::Double(d) if d.fract() == 0.0 && *d >= TWO_POW_63 && *d < 2.0 * TWO_POW_63 => {
            Some(*d as u64)
        }
        other => other.to_i64().and_then(|i| u64::try_from(i).ok()),
    }
}

fn to_i128_exact(value: &Bson) -> Option<i128> {
    match value {
        Bson::Double(d) if d.is_finite() && d.fract() == 0.0 && d.abs() < 2f64.powi(127) => {
            Some(*d as i128)
        }
        other => other.to_i64().map(i128::from),
    }
}

/// Serde Deserializer over an owned [`Bson`] value.
pub struct Deserializer {
    value: Option<Bson>,
    options: Arc<DecoderOptions>,
}

impl Deserializer {
    /// Construct a deserializer for `value` with the default options.
    pub fn new(value: Bson) -> Deserializer {
        Deserializer::with_options(value, DecoderOptions::default())
    }

    /// Construct a deserializer for `value` with the given options.
    pub fn with_options(value: Bson, options: DecoderOptions) -> Deserializer {
        Deserializer {
            value: Some(value),
            options: Arc::new(options),
        }
    }

    pub(crate) fn with_shared_options(value: Bson, options: Arc<DecoderOptions>) -> Deserializer {
        Deserializer {
            value: Some(value),
            options,
        }
    }

    fn child(&self, value: Bson) -> Deserializer {
        Deserializer::with_shared_options(value, self.options.clone())
    }

    fn take(&mut self) -> Result<Bson> {
        self.value.take().ok_or_else(end_of_stream)
    }

    fn decode_date(&self, value: Bson) -> Result<DateTime> {
        match &self.options.date {
            DateDecodingStrategy::BsonDateTime => match value {
                Bson::DateTime(dt) => Ok(dt),
                other => Err(mismatch(&other, "a BSON datetime")),
            },
            DateDecodingStrategy::SecondsSinceEpoch => {
                if let Some(millis) = value.to_i64().and_then(|s| s.checked_mul(1000)) {
                    return Ok(DateTime::from_millis(millis));
                }
                match value.to_f64().map(|s| (s * 1000.0).round()) {
                    Some(millis) if millis.is_finite() && millis.abs() < TWO_POW_63 => {
                        Ok(DateTime::from_millis(millis as i64))
                    }
                    _ => Err(mismatch(&value, "seconds since the epoch")),
                }
            }
            DateDecodingStrategy::MillisecondsSinceEpoch => {
                if let Some(millis) = value.to_i64() {
                    return Ok(DateTime::from_millis(millis));
                }
                match value.to_f64().map(f64::round) {
                    Some(millis) if millis.is_finite() && millis.abs() < TWO_POW_63 => {
                        Ok(DateTime::from_millis(millis as i64))
                    }
                    _ => Err(mismatch(&value, "milliseconds since the epoch")),
                }
            }
            DateDecodingStrategy::Iso8601 => match value {
                Bson::String(ref s) => DateTime::parse_rfc3339_str(s)
                    .map_err(|e| Error::type_mismatch(e.to_string())),
                other => Err(mismatch(&other, "an RFC 3339 string")),
            },
            DateDecodingStrategy::Formatted(format) => match value {
                Bson::String(ref s) => time::OffsetDateTime::parse(s, format)
                    .or_else(|_| {
                        time::PrimitiveDateTime::parse(s, format).map(|p| p.assume_utc())
                    })
                    .map(DateTime::from_time)
                    .map_err(|e| Error::type_mismatch(format!("{:?}: {}", s, e))),
                other => Err(mismatch(&other, "a formatted date string")),
            },
            DateDecodingStrategy::Custom(f) => f(value),
        }
    }
}

impl<'de> de::Deserializer<'de> for Deserializer {
    type Error = Error;

    #[inline]
    fn deserialize_any<V>(mut self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let value = self.take()?;

        match value {
            Bson::Double(v) => visitor.visit_f64(v),
            Bson::String(v) => visitor.visit_string(v),
            Bson::Array(v) => {
                let len = v.len();
                visitor.visit_seq(SeqDeserializer {
                    iter: v.into_iter(),
                    len,
                    index: 0,
                    options: self.options,
                })
            }
            Bson::Document(v) => {
                let len = v.len();
                visitor.visit_map(MapDeserializer {
                    iter: v.into_iter(),
                    value: None,
                    key: None,
                    len,
                    options: self.options,
                })
            }
            Bson::Boolean(v) => visitor.visit_bool(v),
            Bson::Null => visitor.visit_unit(),
            Bson::Int32(v) => visitor.visit_i32(v),
            Bson::Int64(v) => visitor.visit_i64(v),
            other => {
                let doc = other.to_extended_document().ok_or_else(|| {
                    Error::deserialization(format!(
                        "no extended document for {:?}",
                        other.element_type()
                    ))
                })?;
                let len = doc.len();
                visitor.visit_map(MapDeserializer {
                    iter: doc.into_iter(),
                    value: None,
                    key: None,
                    len,
                    options: self.options,
                })
            }
        }
    }

    fn deserialize_bool<V>(mut self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.take()? {
            Bson::Boolean(b) => visitor.visit_bool(b),
            other => Err(mismatch(&other, "bool")),
        }
    }

    fn deserialize_i8<V>(mut self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let value = self.take()?;
        match value.to_i64().and_then(|n| i8::try_from(n).ok()) {
            Some(n) => visitor.visit_i8(n),
            None => Err(mismatch(&value, "i8")),
        }
    }

    fn deserialize_i16<V>(mut self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let value = self.take()?;
        match value.to_i64().and_then(|n| i16::try_from(n).ok()) {
            Some(n) => visitor.visit_i16(n),
            None => Err(mismatch(&value, "i16")),
        }
    }

    fn deserialize_i32<V>(mut self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let value = self.take()?;
        match value.to_i32() {
            Some(n) => visitor.visit_i32(n),
            None => Err(mismatch(&value, "i32")),
        }
    }

    fn deserialize_i64<V>(mut self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let value = self.take()?;
        match value.to_i64() {
            Some(n) => visitor.visit_i64(n),
            None => Err(mismatch(&value, "i64")),
        }
    }

    fn deserialize_i128<V>(mut self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let value = self.take()?;
        match to_i128_exact(&value).or_else(|| to_u64_exact(&value).map(i128::from)) {
            Some(n) => visitor.visit_i128(n),
            None => Err(mismatch(&value, "i128")),
        }
    }

    fn deserialize_u8<V>(mut self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let value = self.take()?;
        match value.to_i64().and_then(|n| u8::try_from(n).ok()) {
            Some(n) => visitor.visit_u8(n),
            None => Err(mismatch(&value, "u8")),
        }
    }

    fn deserialize_u16<V>(mut self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let value = self.take()?;
        match value.to_i64().and_then(|n| u16::try_from(n).ok()) {
            Some(n) => visitor.visit_u16(n),
            None => Err(mismatch(&value, "u16")),
        }
    }

    fn deserialize_u32<V>(mut self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let value = self.take()?;
        match value.to_i64().and_then(|n| u32::try_from(n).ok()) {
            Some(n) => visitor.visit_u32(n),
            None => Err(mismatch(&value, "u32")),
        }
    }

    fn deserialize_u64<V>(mut self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let value = self.take()?;
        match to_u64_exact(&value) {
            Some(n) => visitor.visit_u64(n),
            None => Err(mismatch(&value, "u64")),
        }
    }

    fn deserialize_u128<V>(mut self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let value = self.take()?;
        let exact = match value {
            Bson::Double(d) if d.fract() == 0.0 && d >= 0.0 && d < 2f64.powi(128) => {
                Some(d as u128)
            }
            ref other => to_u64_exact(other).map(u128::from),
        };
        match exact {
            Some(n) => visitor.visit_u128(n),
            None => Err(mismatch(&value, "u128")),
        }
    }

    fn deserialize_f32<V>(mut self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let value = self.take()?;
        match value.to_f64() {
            Some(f) if f.is_nan() || f64::from(f as f32) == f => visitor.visit_f32(f as f32),
            _ => Err(mismatch(&value, "f32")),
        }
    }

    fn deserialize_f64<V>(mut self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let value = self.take()?;
        match value.to_f64() {
            Some(f) => visitor.visit_f64(f),
            None => Err(mismatch(&value, "f64")),
        }
    }

    fn deserialize_bytes<V>(mut self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let value = self.take()?;
        let strategy = self.options.bytes.clone();
        match (strategy, value) {
            (BytesDecodingStrategy::Custom(f), value) => visitor.visit_byte_buf(f(value)?),
            (_, Bson::Binary(binary)) => visitor.visit_byte_buf(binary.into_bytes()),
            (BytesDecodingStrategy::Base64, Bson::String(s)) => {
                let bytes = STANDARD
                    .decode(s.as_bytes())
                    .map_err(|e| Error::type_mismatch(format!("invalid base64: {}", e)))?;
                visitor.visit_byte_buf(bytes)
            }
            (_, value) => self.child(value).deserialize_any(visitor),
        }
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    #[inline]
    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(Bson::Null) => visitor.visit_none(),
            Some(_) => visitor.visit_some(self),
            None => Err(end_of_stream()),
        }
    }

    #[inline]
    fn deserialize_enum<V>(
        mut self,
        _name: &str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let value = match self.take()? {
            Bson::Document(value) => value,
            Bson::String(variant) => {
                return visitor.visit_enum(EnumDeserializer {
                    val: Bson::String(variant),
                    deserializer: VariantDeserializer {
                        val: None,
                        options: self.options,
                    },
                });
            }
            other => {
                return Err(Error::invalid_type(other.as_unexpected(), &"an enum"));
            }
        };

        let mut iter = value.into_iter();

        let (variant, value) = match iter.next() {
            Some(v) => v,
            None => {
                return Err(de::Error::invalid_value(
                    Unexpected::Other("empty document"),
                    &"variant name",
                ));
            }
        };

        // enums are encoded as maps with a single key:value pair
        match iter.next() {
            Some((k, _)) => Err(de::Error::invalid_value(
                Unexpected::Map,
                &format!("expected map with a single key, got extra key \"{}\"", k).as_str(),
            )),
            None => visitor.visit_enum(EnumDeserializer {
                val: Bson::String(variant),
                deserializer: VariantDeserializer {
                    val: Some(value),
                    options: self.options,
                },
            }),
        }
    }

    fn deserialize_newtype_struct<V>(mut self, name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match name {
            DATETIME_NEWTYPE_NAME => {
                let value = self.take()?;
                let dt = self.decode_date(value)?;
                visitor.visit_newtype_struct(self.child(Bson::DateTime(dt)))
            }
            UUID_NEWTYPE_NAME => {
                let value = self.take()?;
                let accepted = match self.options.uuid {
                    UuidDecodingStrategy::Binary => matches!(
                        value,
                        Bson::Binary(ref b) if b.subtype() == BinarySubtype::Uuid
                    ),
                    UuidDecodingStrategy::String => matches!(value, Bson::String(_)),
                    UuidDecodingStrategy::DeferredToNative => true,
                };
                if !accepted {
                    return Err(mismatch(&value, "a UUID"));
                }
                visitor.visit_newtype_struct(self.child(value))
            }
            _ => visitor.visit_newtype_struct(self),
        }
    }

    fn is_human_readable(&self) -> bool {
        self.options.human_readable
    }

    forward_to_deserialize_any! {
        char str string unit seq map unit_struct tuple_struct struct tuple identifier
        ignored_any
    }
}

struct EnumDeserializer {
    val: Bson,
    deserializer: VariantDeserializer,
}

impl<'de> EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: DeserializeSeed<'de>,
    {
        let dec = Deserializer::with_shared_options(self.val, self.deserializer.options.clone());
        let value = seed.deserialize(dec)?;
        Ok((value, self.deserializer))
    }
}

struct VariantDeserializer {
    val: Option<Bson>,
    options: Arc<DecoderOptions>,
}

impl<'de> VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(mut self) -> Result<()> {
        match self.val.take() {
            None => Ok(()),
            Some(val) => {
                Bson::deserialize(Deserializer::with_shared_options(val, self.options)).map(|_| ())
            }
        }
    }

    fn newtype_variant_seed<T>(mut self, seed: T) -> Result<T::Value>
    where
        T: DeserializeSeed<'de>,
    {
        let val = self.val.take().ok_or_else(end_of_stream)?;
        seed.deserialize(Deserializer::with_shared_options(val, self.options))
    }

    fn tuple_variant<V>(mut self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.val.take().ok_or_else(end_of_stream)? {
            Bson::Array(fields) => visitor.visit_seq(SeqDeserializer {
                len: fields.len(),
                iter: fields.into_iter(),
                index: 0,
                options: self.options,
            }),
            other => Err(Error::invalid_type(other.as_unexpected(), &"a tuple")),
        }
    }

    fn struct_variant<V>(
        mut self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.val.take().ok_or_else(end_of_stream)? {
            Bson::Document(fields) => visitor.visit_map(MapDeserializer {
                len: fields.len(),
                iter: fields.into_iter(),
                value: None,
                key: None,
                options: self.options,
            }),
            ref other => Err(Error::invalid_type(other.as_unexpected(), &"a struct")),
        }
    }
}

struct SeqDeserializer {
    iter: vec::IntoIter<Bson>,
    len: usize,
    index: usize,
    options: Arc<DecoderOptions>,
}

impl<'de> SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        match self.iter.next() {
            None => Ok(None),
            Some(value) => {
                self.len -= 1;
                let index = self.index;
                self.index += 1;
                let de = Deserializer::with_shared_options(value, self.options.clone());
                seed.deserialize(de).map(Some).map_err(|e| {
                    if e.key.is_none() && e.index.is_none() {
                        e.with_index(index)
                    } else {
                        e
                    }
                })
            }
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.len)
    }
}

struct MapDeserializer {
    iter: IntoIter,
    value: Option<Bson>,
    key: Option<String>,
    len: usize,
    options: Arc<DecoderOptions>,
}

impl<'de> MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.len -= 1;
                self.value = Some(value);
                self.key = Some(key.clone());

                let de = Deserializer::with_shared_options(Bson::String(key), self.options.clone());
                seed.deserialize(de).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        let value = self.value.take().ok_or_else(end_of_stream)?;
        let de = Deserializer::with_shared_options(value, self.options.clone());
        let key = self.key.take().unwrap_or_default();
        seed.deserialize(de).map_err(|e| keyed(e, &key))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.len)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        match Bson::deserialize(deserializer)? {
            Bson::Timestamp(timestamp) => Ok(timestamp),
            other => Err(D::Error::invalid_type(other.as_unexpected(), &"a Timestamp")),
        }
    }
}

impl<'de> Deserialize<'de> for Regex {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        match Bson::deserialize(deserializer)? {
            Bson::RegularExpression(regex) => Ok(regex),
            other => Err(D::Error::invalid_type(other.as_unexpected(), &"a Regex")),
        }
    }
}

impl<'de> Deserialize<'de> for JavaScriptCodeWithScope {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        match Bson::deserialize(deserializer)? {
            Bson::JavaScriptCodeWithScope(code_with_scope) => Ok(code_with_scope),
            other => Err(D::Error::invalid_type(
                other.as_unexpected(),
                &"a JavaScriptCodeWithScope",
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Binary {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        match Bson::deserialize(deserializer)? {
            Bson::Binary(binary) => Ok(binary),
            other => Err(D::Error::invalid_type(other.as_unexpected(), &"a Binary")),
        }
    }
}

impl<'de> Deserialize<'de> for Decimal128 {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        match Bson::deserialize(deserializer)? {
            Bson::Decimal128(d128) => Ok(d128),
            other => Err(D::Error::invalid_type(other.as_unexpected(), &"a Decimal128")),
        }
    }
}

impl<'de> Deserialize<'de> for DateTime {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        match deserializer.deserialize_newtype_struct(DATETIME_NEWTYPE_NAME, BsonVisitor)? {
            Bson::DateTime(dt) => Ok(dt),
            Bson::String(s) => DateTime::parse_rfc3339_str(&s).map_err(D::Error::custom),
            other => Err(D::Error::invalid_type(other.as_unexpected(), &"a DateTime")),
        }
    }
}

impl<'de> Deserialize<'de> for DbPointer {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        match Bson::deserialize(deserializer)? {
            Bson::DbPointer(db_pointer) => Ok(db_pointer),
            other => Err(D::Error::invalid_type(other.as_unexpected(), &"a DbPointer")),
        }
    }
}
