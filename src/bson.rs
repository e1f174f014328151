// The MIT License (MIT)

// Copyright (c) 2015 Y. T. Chung <zonyitoo@gmail.com>

// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:

// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! BSON definition

use std::{
    fmt::{self, Debug, Display},
    hash::{Hash, Hasher},
};

use serde::de::Unexpected;

pub use crate::document::Document;
use crate::{
    Binary,
    Decimal128,
    error::{Error, Result},
    oid::{self, ObjectId},
    spec::ElementType,
};

/// Possible BSON value types.
///
/// Equality is exact within a variant, with one exception: `Int32`, `Int64` and `Double` compare
/// by mathematical value, so `Bson::Int32(5) == Bson::Double(5.0)`. `Decimal128` only equals
/// another `Decimal128` with the same bytes. Two NaN doubles compare equal so that `Bson` can be
/// used as a hash map key; the [`Hash`] impl agrees with this equality.
#[derive(Clone, Debug, Default)]
pub enum Bson {
    /// 64-bit binary floating point
    Double(f64),
    /// UTF-8 string
    String(String),
    /// Array
    Array(Array),
    /// Embedded document
    Document(Document),
    /// Boolean value
    Boolean(bool),
    /// Null value
    #[default]
    Null,
    /// Regular expression
    RegularExpression(Regex),
    /// JavaScript code
    JavaScriptCode(String),
    /// JavaScript code w/ scope
    JavaScriptCodeWithScope(JavaScriptCodeWithScope),
    /// 32-bit signed integer
    Int32(i32),
    /// 64-bit signed integer
    Int64(i64),
    /// Timestamp
    Timestamp(Timestamp),
    /// Binary data
    Binary(Binary),
    /// [ObjectId](http://dochub.mongodb.org/core/objectids)
    ObjectId(oid::ObjectId),
    /// UTC datetime
    DateTime(crate::DateTime),
    /// Symbol (Deprecated)
    Symbol(String),
    /// [128-bit decimal floating point](https://github.com/mongodb/specifications/blob/master/source/bson-decimal128/decimal128.md)
    Decimal128(Decimal128),
    /// Undefined value (Deprecated)
    Undefined,
    /// Max key
    MaxKey,
    /// Min key
    MinKey,
    /// DBPointer (Deprecated)
    DbPointer(DbPointer),
}

/// Alias for `Vec<Bson>`.
pub type Array = Vec<Bson>;

/// A numeric view used for cross-width equality and hashing.
#[derive(Clone, Copy)]
enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    /// The value as an `i64` if it is integral and in range.
    fn as_integral(self) -> Option<i64> {
        match self {
            Numeric::Int(i) => Some(i),
            Numeric::Float(f) => f64_to_i64_exact(f),
        }
    }
}

fn f64_to_i64_exact(f: f64) -> Option<i64> {
    // 2^63 is exactly representable; i64::MAX is not.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f) {
        Some(f as i64)
    } else {
        None
    }
}

fn i64_to_f64_exact(i: i64) -> Option<f64> {
    let f = i as f64;
    (f as i128 == i as i128).then_some(f)
}

impl PartialEq for Bson {
    fn eq(&self, other: &Self) -> bool {
        if let (Some(a), Some(b)) = (self.numeric(), other.numeric()) {
            return match (a, b) {
                (Numeric::Int(a), Numeric::Int(b)) => a == b,
                (Numeric::Float(a), Numeric::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
                (Numeric::Int(i), Numeric::Float(f)) | (Numeric::Float(f), Numeric::Int(i)) => {
                    f64_to_i64_exact(f) == Some(i)
                }
            };
        }

        match (self, other) {
            (Bson::String(a), Bson::String(b)) => a == b,
            (Bson::Array(a), Bson::Array(b)) => a == b,
            (Bson::Document(a), Bson::Document(b)) => a == b,
            (Bson::Boolean(a), Bson::Boolean(b)) => a == b,
            (Bson::Null, Bson::Null) => true,
            (Bson::RegularExpression(a), Bson::RegularExpression(b)) => a == b,
            (Bson::JavaScriptCode(a), Bson::JavaScriptCode(b)) => a == b,
            (Bson::JavaScriptCodeWithScope(a), Bson::JavaScriptCodeWithScope(b)) => a == b,
            (Bson::Timestamp(a), Bson::Timestamp(b)) => a == b,
            (Bson::Binary(a), Bson::Binary(b)) => a == b,
            (Bson::ObjectId(a), Bson::ObjectId(b)) => a == b,
            (Bson::DateTime(a), Bson::DateTime(b)) => a == b,
            (Bson::Symbol(a), Bson::Symbol(b)) => a == b,
            (Bson::Decimal128(a), Bson::Decimal128(b)) => a == b,
            (Bson::Undefined, Bson::Undefined) => true,
            (Bson::MaxKey, Bson::MaxKey) => true,
            (Bson::MinKey, Bson::MinKey) => true,
            (Bson::DbPointer(a), Bson::DbPointer(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Bson {}

impl Hash for Bson {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if let Some(n) = self.numeric() {
            // All numeric widths share one hash space so equal values collide.
            state.write_u8(0xFE);
            match (n.as_integral(), n) {
                (Some(i), _) | (None, Numeric::Int(i)) => {
                    state.write_u8(0);
                    i.hash(state);
                }
                (None, Numeric::Float(f)) if f.is_nan() => state.write_u8(1),
                (None, Numeric::Float(f)) => {
                    state.write_u8(2);
                    f.to_bits().hash(state);
                }
            }
            return;
        }

        (self.element_type() as u8).hash(state);
        match self {
            Bson::String(s) | Bson::JavaScriptCode(s) | Bson::Symbol(s) => s.hash(state),
            Bson::Array(a) => a.hash(state),
            Bson::Document(d) => d.hash(state),
            Bson::Boolean(b) => b.hash(state),
            Bson::RegularExpression(r) => r.hash(state),
            Bson::JavaScriptCodeWithScope(c) => c.hash(state),
            Bson::Timestamp(t) => t.hash(state),
            Bson::Binary(b) => b.hash(state),
            Bson::ObjectId(o) => o.hash(state),
            Bson::DateTime(d) => d.hash(state),
            Bson::Decimal128(d) => d.hash(state),
            Bson::DbPointer(p) => p.hash(state),
            Bson::Null | Bson::Undefined | Bson::MaxKey | Bson::MinKey => {}
            Bson::Double(_) | Bson::Int32(_) | Bson::Int64(_) => {}
        }
    }
}

impl Display for Bson {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Bson::Double(f) => write!(fmt, "{}", f),
            Bson::String(ref s) => write!(fmt, "\"{}\"", s),
            Bson::Array(ref vec) => {
                fmt.write_str("[")?;

                let mut first = true;
                for bson in vec {
                    if !first {
                        fmt.write_str(", ")?;
                    }

                    write!(fmt, "{}", bson)?;
                    first = false;
                }

                fmt.write_str("]")
            }
            Bson::Document(ref doc) => write!(fmt, "{}", doc),
            Bson::Boolean(b) => write!(fmt, "{}", b),
            Bson::Null => write!(fmt, "null"),
            Bson::RegularExpression(ref regex) => write!(fmt, "{}", regex),
            Bson::JavaScriptCode(ref code)
            | Bson::JavaScriptCodeWithScope(JavaScriptCodeWithScope { ref code, .. }) => {
                fmt.write_str(code)
            }
            Bson::Int32(i) => write!(fmt, "{}", i),
            Bson::Int64(i) => write!(fmt, "{}", i),
            Bson::Timestamp(ref ts) => write!(fmt, "{}", ts),
            Bson::Binary(ref bin) => write!(fmt, "{}", bin),
            Bson::ObjectId(ref id) => write!(fmt, "ObjectId(\"{}\")", id),
            Bson::DateTime(date_time) => write!(fmt, "DateTime(\"{}\")", date_time),
            Bson::Symbol(ref sym) => write!(fmt, "Symbol(\"{}\")", sym),
            Bson::Decimal128(ref d) => write!(fmt, "{}", d),
            Bson::Undefined => write!(fmt, "undefined"),
            Bson::MinKey => write!(fmt, "MinKey"),
            Bson::MaxKey => write!(fmt, "MaxKey"),
            Bson::DbPointer(DbPointer {
                ref namespace,
                ref id,
            }) => write!(fmt, "DbPointer({}, {})", namespace, id),
        }
    }
}

impl From<f32> for Bson {
    fn from(a: f32) -> Bson {
        Bson::Double(a.into())
    }
}

impl From<f64> for Bson {
    fn from(a: f64) -> Bson {
        Bson::Double(a)
    }
}

impl From<&str> for Bson {
    fn from(s: &str) -> Bson {
        Bson::String(s.to_owned())
    }
}

impl From<String> for Bson {
    fn from(a: String) -> Bson {
        Bson::String(a)
    }
}

impl From<Document> for Bson {
    fn from(a: Document) -> Bson {
        Bson::Document(a)
    }
}

impl From<bool> for Bson {
    fn from(a: bool) -> Bson {
        Bson::Boolean(a)
    }
}

impl From<Regex> for Bson {
    fn from(regex: Regex) -> Bson {
        Bson::RegularExpression(regex)
    }
}

impl From<JavaScriptCodeWithScope> for Bson {
    fn from(code_with_scope: JavaScriptCodeWithScope) -> Bson {
        Bson::JavaScriptCodeWithScope(code_with_scope)
    }
}

impl From<Binary> for Bson {
    fn from(binary: Binary) -> Bson {
        Bson::Binary(binary)
    }
}

impl From<Timestamp> for Bson {
    fn from(ts: Timestamp) -> Bson {
        Bson::Timestamp(ts)
    }
}

impl<T> From<&T> for Bson
where
    T: Clone + Into<Bson>,
{
    fn from(t: &T) -> Bson {
        t.clone().into()
    }
}

impl<T> From<Vec<T>> for Bson
where
    T: Into<Bson>,
{
    fn from(v: Vec<T>) -> Bson {
        Bson::Array(v.into_iter().map(|val| val.into()).collect())
    }
}

impl<T> From<&[T]> for Bson
where
    T: Clone + Into<Bson>,
{
    fn from(s: &[T]) -> Bson {
        Bson::Array(s.iter().cloned().map(|val| val.into()).collect())
    }
}

impl<T: Into<Bson>> ::std::iter::FromIterator<T> for Bson {
    /// # Examples
    ///
    /// ```
    /// use bson_core::Bson;
    ///
    /// let x: Bson = vec!["lorem", "ipsum", "dolor"].into_iter().collect();
    /// assert_eq!(x.as_array().map(|a| a.len()), Some(3));
    /// ```
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Bson::Array(iter.into_iter().map(Into::into).collect())
    }
}

impl From<i8> for Bson {
    fn from(a: i8) -> Bson {
        Bson::Int32(a.into())
    }
}

impl From<i16> for Bson {
    fn from(a: i16) -> Bson {
        Bson::Int32(a.into())
    }
}

impl From<i32> for Bson {
    fn from(a: i32) -> Bson {
        Bson::Int32(a)
    }
}

impl From<i64> for Bson {
    fn from(a: i64) -> Bson {
        Bson::Int64(a)
    }
}

/// The platform integer takes the narrowest BSON integer that holds the value.
impl From<isize> for Bson {
    fn from(a: isize) -> Bson {
        Bson::from_i64_fitted(a as i64)
    }
}

impl From<u8> for Bson {
    fn from(a: u8) -> Bson {
        Bson::Int32(a.into())
    }
}

impl From<u16> for Bson {
    fn from(a: u16) -> Bson {
        Bson::Int32(a.into())
    }
}

impl From<u32> for Bson {
    fn from(a: u32) -> Bson {
        Bson::from_i64_fitted(a.into())
    }
}

impl TryFrom<u64> for Bson {
    type Error = Error;

    fn try_from(a: u64) -> Result<Bson> {
        Bson::from_u64_fitted(a)
    }
}

impl TryFrom<usize> for Bson {
    type Error = Error;

    fn try_from(a: usize) -> Result<Bson> {
        Bson::from_u64_fitted(a as u64)
    }
}

impl From<[u8; 12]> for Bson {
    fn from(a: [u8; 12]) -> Bson {
        Bson::ObjectId(oid::ObjectId::from_bytes(a))
    }
}

impl From<oid::ObjectId> for Bson {
    fn from(a: oid::ObjectId) -> Bson {
        Bson::ObjectId(a)
    }
}

impl From<crate::DateTime> for Bson {
    fn from(a: crate::DateTime) -> Bson {
        Bson::DateTime(a)
    }
}

#[cfg(feature = "chrono-0_4")]
impl<T: chrono::TimeZone> From<chrono::DateTime<T>> for Bson {
    fn from(a: chrono::DateTime<T>) -> Bson {
        Bson::DateTime(crate::DateTime::from(a))
    }
}

impl From<DbPointer> for Bson {
    fn from(a: DbPointer) -> Bson {
        Bson::DbPointer(a)
    }
}

impl From<Decimal128> for Bson {
    fn from(d: Decimal128) -> Self {
        Bson::Decimal128(d)
    }
}

impl<T> From<Option<T>> for Bson
where
    T: Into<Bson>,
{
    fn from(a: Option<T>) -> Bson {
        match a {
            None => Bson::Null,
            Some(t) => t.into(),
        }
    }
}

impl Bson {
    /// Picks `Int32` when the value fits in 32 bits and `Int64` otherwise.
    pub(crate) fn from_i64_fitted(value: i64) -> Bson {
        match i32::try_from(value) {
            Ok(i) => Bson::Int32(i),
            Err(_) => Bson::Int64(value),
        }
    }

    /// Picks `Int32`, then `Int64`, then an exactly representable `Double`, failing with
    /// [`ErrorKind::InvalidValue`](crate::error::ErrorKind::InvalidValue) when none of them can
    /// hold the value.
    pub(crate) fn from_u64_fitted(value: u64) -> Result<Bson> {
        if let Ok(i) = i64::try_from(value) {
            return Ok(Bson::from_i64_fitted(i));
        }
        let f = value as f64;
        if f as u128 == value as u128 {
            Ok(Bson::Double(f))
        } else {
            Err(Error::invalid_value(format!(
                "{} cannot be represented exactly by any BSON numeric type",
                value
            )))
        }
    }

    /// Get the [`ElementType`] of this value.
    pub fn element_type(&self) -> ElementType {
        match *self {
            Bson::Double(..) => ElementType::Double,
            Bson::String(..) => ElementType::String,
            Bson::Array(..) => ElementType::Array,
            Bson::Document(..) => ElementType::EmbeddedDocument,
            Bson::Boolean(..) => ElementType::Boolean,
            Bson::Null => ElementType::Null,
            Bson::RegularExpression(..) => ElementType::RegularExpression,
            Bson::JavaScriptCode(..) => ElementType::JavaScriptCode,
            Bson::JavaScriptCodeWithScope(..) => ElementType::JavaScriptCodeWithScope,
            Bson::Int32(..) => ElementType::Int32,
            Bson::Int64(..) => ElementType::Int64,
            Bson::Timestamp(..) => ElementType::Timestamp,
            Bson::Binary(..) => ElementType::Binary,
            Bson::ObjectId(..) => ElementType::ObjectId,
            Bson::DateTime(..) => ElementType::DateTime,
            Bson::Symbol(..) => ElementType::Symbol,
            Bson::Decimal128(..) => ElementType::Decimal128,
            Bson::Undefined => ElementType::Undefined,
            Bson::MaxKey => ElementType::MaxKey,
            Bson::MinKey => ElementType::MinKey,
            Bson::DbPointer(..) => ElementType::DbPointer,
        }
    }

    fn numeric(&self) -> Option<Numeric> {
        match *self {
            Bson::Int32(i) => Some(Numeric::Int(i.into())),
            Bson::Int64(i) => Some(Numeric::Int(i)),
            Bson::Double(f) => Some(Numeric::Float(f)),
            _ => None,
        }
    }

    pub(crate) fn as_unexpected(&self) -> Unexpected<'_> {
        match self {
            Bson::Array(_) => Unexpected::Seq,
            Bson::Binary(b) => Unexpected::Bytes(b.bytes()),
            Bson::Boolean(b) => Unexpected::Bool(*b),
            Bson::DbPointer(_) => Unexpected::Other("dbpointer"),
            Bson::Document(_) => Unexpected::Map,
            Bson::Double(f) => Unexpected::Float(*f),
            Bson::Int32(i) => Unexpected::Signed(*i as i64),
            Bson::Int64(i) => Unexpected::Signed(*i),
            Bson::JavaScriptCode(_) => Unexpected::Other("javascript code"),
            Bson::JavaScriptCodeWithScope(_) => Unexpected::Other("javascript code with scope"),
            Bson::MaxKey => Unexpected::Other("maxkey"),
            Bson::MinKey => Unexpected::Other("minkey"),
            Bson::Null => Unexpected::Unit,
            Bson::Undefined => Unexpected::Other("undefined"),
            Bson::ObjectId(_) => Unexpected::Other("objectid"),
            Bson::RegularExpression(_) => Unexpected::Other("regex"),
            Bson::String(s) => Unexpected::Str(s.as_str()),
            Bson::Symbol(_) => Unexpected::Other("symbol"),
            Bson::Timestamp(_) => Unexpected::Other("timestamp"),
            Bson::DateTime(_) => Unexpected::Other("datetime"),
            Bson::Decimal128(_) => Unexpected::Other("decimal128"),
        }
    }
}

/// Lossless numeric conversions.
///
/// Unlike the `as_*` accessors these look across the numeric variants, but they only succeed
/// when the conversion loses nothing: `Bson::Double(5.0).to_i32()` is `Some(5)` while
/// `Bson::Double(5.5).to_i32()` is `None`. Doubles and decimals convert into each other when the
/// round trip through the target type yields the same number, so `0.1` converts in both
/// directions.
impl Bson {
    /// The value as an `i32`, if it is numeric, integral and in range.
    pub fn to_i32(&self) -> Option<i32> {
        self.to_i64().and_then(|i| i32::try_from(i).ok())
    }

    /// The value as an `i64`, if it is numeric, integral and in range.
    pub fn to_i64(&self) -> Option<i64> {
        match *self {
            Bson::Int32(i) => Some(i.into()),
            Bson::Int64(i) => Some(i),
            Bson::Double(f) => f64_to_i64_exact(f),
            Bson::Decimal128(d) => d.to_i64_exact(),
            _ => None,
        }
    }

    /// The value as an `f64`, if it is numeric and representable without loss.
    pub fn to_f64(&self) -> Option<f64> {
        match *self {
            Bson::Int32(i) => Some(i.into()),
            Bson::Int64(i) => i64_to_f64_exact(i),
            Bson::Double(f) => Some(f),
            Bson::Decimal128(d) => d.to_f64_exact(),
            _ => None,
        }
    }

    /// The value as a [`Decimal128`], if it is numeric.
    pub fn to_decimal128(&self) -> Option<Decimal128> {
        match *self {
            Bson::Int32(i) => Some(i.into()),
            Bson::Int64(i) => Some(i.into()),
            Bson::Double(f) => Decimal128::from_f64_shortest(f),
            Bson::Decimal128(d) => Some(d),
            _ => None,
        }
    }
}

/// Value helpers
impl Bson {
    /// If `self` is [`Double`](Bson::Double), return its value as an `f64`. Returns [`None`]
    /// otherwise.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Bson::Double(v) => Some(v),
            _ => None,
        }
    }

    /// If `self` is [`String`](Bson::String), return its value as a `&str`. Returns [`None`]
    /// otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match *self {
            Bson::String(ref s) => Some(s),
            _ => None,
        }
    }

    /// If `self` is [`String`](Bson::String), return a mutable reference to its value as a
    /// [`str`]. Returns [`None`] otherwise.
    pub fn as_str_mut(&mut self) -> Option<&mut str> {
        match *self {
            Bson::String(ref mut s) => Some(s),
            _ => None,
        }
    }

    /// If `self` is [`Array`](Bson::Array), return its value. Returns [`None`] otherwise.
    pub fn as_array(&self) -> Option<&Array> {
        match *self {
            Bson::Array(ref v) => Some(v),
            _ => None,
        }
    }

    /// If `self` is [`Array`](Bson::Array), return a mutable reference to its value. Returns
    /// [`None`] otherwise.
    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match *self {
            Bson::Array(ref mut v) => Some(v),
            _ => None,
        }
    }

    /// If `self` is [`Document`](Bson::Document), return its value. Returns [`None`] otherwise.
    pub fn as_document(&self) -> Option<&Document> {
        match *self {
            Bson::Document(ref v) => Some(v),
            _ => None,
        }
    }

    /// If `self` is [`Document`](Bson::Document), return a mutable reference to its value.
    /// Returns [`None`] otherwise.
    pub fn as_document_mut(&mut self) -> Option<&mut Document> {
        match *self {
            Bson::Document(ref mut v) => Some(v),
            _ => None,
        }
    }

    /// If `self` is [`Boolean`](Bson::Boolean), return its value. Returns [`None`] otherwise.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Bson::Boolean(v) => Some(v),
            _ => None,
        }
    }

    /// If `self` is [`Int32`](Bson::Int32), return its value. Returns [`None`] otherwise.
    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            Bson::Int32(v) => Some(v),
            _ => None,
        }
    }

    /// If `self` is [`Int64`](Bson::Int64), return its value. Returns [`None`] otherwise.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Bson::Int64(v) => Some(v),
            _ => None,
        }
    }

    /// If `self` is [`ObjectId`](Bson::ObjectId), return its value. Returns [`None`] otherwise.
    pub fn as_object_id(&self) -> Option<oid::ObjectId> {
        match *self {
            Bson::ObjectId(v) => Some(v),
            _ => None,
        }
    }

    /// If `self` is [`DateTime`](Bson::DateTime), return its value. Returns [`None`] otherwise.
    pub fn as_datetime(&self) -> Option<&crate::DateTime> {
        match *self {
            Bson::DateTime(ref v) => Some(v),
            _ => None,
        }
    }

    /// If `self` is [`Symbol`](Bson::Symbol), return its value. Returns [`None`] otherwise.
    pub fn as_symbol(&self) -> Option<&str> {
        match *self {
            Bson::Symbol(ref v) => Some(v),
            _ => None,
        }
    }

    /// If `self` is [`Timestamp`](Bson::Timestamp), return its value. Returns [`None`]
    /// otherwise.
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match *self {
            Bson::Timestamp(timestamp) => Some(timestamp),
            _ => None,
        }
    }

    /// If `self` is [`Binary`](Bson::Binary), return its value. Returns [`None`] otherwise.
    pub fn as_binary(&self) -> Option<&Binary> {
        match *self {
            Bson::Binary(ref b) => Some(b),
            _ => None,
        }
    }

    /// If `self` is [`RegularExpression`](Bson::RegularExpression), return its value. Returns
    /// [`None`] otherwise.
    pub fn as_regex(&self) -> Option<&Regex> {
        match *self {
            Bson::RegularExpression(ref r) => Some(r),
            _ => None,
        }
    }

    /// If `self` is [`Decimal128`](Bson::Decimal128), return its value. Returns [`None`]
    /// otherwise.
    pub fn as_decimal128(&self) -> Option<Decimal128> {
        match *self {
            Bson::Decimal128(d) => Some(d),
            _ => None,
        }
    }

    /// If `self` is [`Null`](Bson::Null), return `()`. Returns [`None`] otherwise.
    pub fn as_null(&self) -> Option<()> {
        match *self {
            Bson::Null => Some(()),
            _ => None,
        }
    }

    /// If `self` is [`DbPointer`](Bson::DbPointer), return its value. Returns [`None`]
    /// otherwise.
    pub fn as_db_pointer(&self) -> Option<&DbPointer> {
        match self {
            Bson::DbPointer(db_pointer) => Some(db_pointer),
            _ => None,
        }
    }
}

/// Represents a BSON timestamp value.
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash)]
pub struct Timestamp {
    /// The number of seconds since the Unix epoch.
    pub time: u32,

    /// An incrementing value to order timestamps with the same number of seconds in the `time`
    /// field.
    pub increment: u32,
}

impl Display for Timestamp {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "Timestamp({}, {})", self.time, self.increment)
    }
}

/// Represents a BSON regular expression value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Regex {
    /// The regex pattern to match.
    pub pattern: String,

    /// The options for the regex.
    ///
    /// Options are identified by characters, which must be stored in
    /// alphabetical order. Valid options are 'i' for case insensitive matching, 'm' for
    /// multiline matching, 'x' for verbose mode, 'l' to make \w, \W, etc. locale dependent,
    /// 's' for dotall mode ('.' matches everything), and 'u' to make \w, \W, etc. match
    /// unicode.
    pub options: String,
}

impl Regex {
    /// Creates a new `Regex`, sorting the option characters.
    pub fn new(pattern: impl AsRef<str>, options: impl AsRef<str>) -> Self {
        Self {
            pattern: pattern.as_ref().to_string(),
            options: sort_options(options.as_ref()),
        }
    }
}

pub(crate) fn sort_options(options: &str) -> String {
    let mut chars: Vec<_> = options.chars().collect();
    chars.sort_unstable();
    chars.into_iter().collect()
}

impl Display for Regex {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "/{}/{}", self.pattern, self.options)
    }
}

/// Represents a BSON code with scope value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JavaScriptCodeWithScope {
    /// The JavaScript code.
    pub code: String,

    /// The scope document containing variable bindings.
    pub scope: Document,
}

impl Display for JavaScriptCodeWithScope {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(&self.code)
    }
}

/// Represents a DBPointer. (Deprecated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DbPointer {
    /// The namespace the pointer refers into.
    pub namespace: String,

    /// The id of the referenced document.
    pub id: ObjectId,
}
