//! Byte-level access to BSON documents.
//!
//! A [`RawDocument`] is a borrowed view over encoded BSON bytes. Iterating it yields
//! [`RawElement`]s whose values are [`RawBsonRef`]s borrowing from the underlying buffer, so
//! strings, binaries and nested documents are never copied until converted to owned [`Bson`].
//!
//! ```
//! use bson_core::raw::{RawBsonRef, RawDocument};
//!
//! let bytes = b"\x0c\x00\x00\x00\x10i\x00\x01\x00\x00\x00\x00";
//! let doc = RawDocument::from_bytes(bytes)?;
//! let (key, value) = doc.iter().next().unwrap()?.into_parts();
//! assert_eq!(key, "i");
//! assert_eq!(value, RawBsonRef::Int32(1));
//! # Ok::<(), bson_core::error::Error>(())
//! ```

mod iter;
mod writer;


pub use iter::{RawElement, RawIter};
pub(crate) use writer::{RawWriter, write_element, write_length, write_value};

use crate::{
    Binary,
    Bson,
    DateTime,
    Decimal128,
    Document,
    bson::{DbPointer, JavaScriptCodeWithScope, Regex, Timestamp},
    error::{Error, ErrorKind, Result},
    oid::ObjectId,
    spec::{BinarySubtype, ElementType},
};

/// The smallest possible BSON document: a length prefix and the terminating null byte.
pub(crate) const MIN_BSON_DOCUMENT_SIZE: usize = 5;

/// Total length, string length, one null byte and an empty scope document.
pub(crate) const MIN_CODE_WITH_SCOPE_SIZE: usize = 4 + 4 + 1 + MIN_BSON_DOCUMENT_SIZE;

/// Documents nested deeper than this are rejected during validation and when inserted.
pub(crate) const MAX_NESTING_DEPTH: usize = 200;

/// Fails when `value`, stored as an element of a top-level document, would nest documents
/// deeper than validation accepts.
pub(crate) fn check_nesting(value: &Bson) -> Result<()> {
    if bson_nesting_exceeds(value, MAX_NESTING_DEPTH)? {
        return Err(Error::invalid_value(format!(
            "document nesting exceeds the maximum depth of {}",
            MAX_NESTING_DEPTH
        )));
    }
    Ok(())
}

fn bson_nesting_exceeds(value: &Bson, budget: usize) -> Result<bool> {
    match value {
        Bson::Document(doc) => doc.raw().nesting_exceeds(budget),
        Bson::JavaScriptCodeWithScope(JavaScriptCodeWithScope { scope, .. }) => {
            scope.raw().nesting_exceeds(budget)
        }
        Bson::Array(values) => {
            if budget == 0 {
                return Ok(true);
            }
            for value in values {
                if bson_nesting_exceeds(value, budget - 1)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        _ => Ok(false),
    }
}

/// The bytes of an empty document.
pub(crate) const EMPTY_DOCUMENT: [u8; 5] = [5, 0, 0, 0, 0];

/// A borrowed BSON document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawDocument<'a> {
    data: &'a [u8],
}

impl<'a> RawDocument<'a> {
    /// Constructs a new [`RawDocument`], validating _only_ the following invariants:
    ///   * `data` is at least five bytes long
    ///   * the initial four bytes of `data` accurately represent its length
    ///   * the last byte of `data` is a 0
    ///
    /// The elements themselves are checked as they are iterated, or all at once with
    /// [`RawDocument::validate`].
    pub fn from_bytes<D: AsRef<[u8]> + ?Sized>(data: &'a D) -> Result<Self> {
        let data = data.as_ref();

        if data.len() < MIN_BSON_DOCUMENT_SIZE {
            return Err(Error::malformed_bytes(format!(
                "document too short: {} bytes",
                data.len()
            )));
        }

        let length = i32_from_slice(data, 0)?;
        if length < 0 || length as usize != data.len() {
            return Err(Error::malformed_bytes(format!(
                "document length incorrect: declared {}, actual {}",
                length,
                data.len()
            )));
        }

        if data[data.len() - 1] != 0 {
            return Err(Error::malformed_bytes("document not null-terminated"));
        }

        Ok(Self { data })
    }

    pub(crate) fn new_unchecked(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// The encoded bytes of this document.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Gets an iterator over the elements in the document.
    pub fn iter(&self) -> RawIter<'a> {
        RawIter::new(*self)
    }

    /// Gets the value stored at the first occurrence of `key`.
    pub fn get(&self, key: impl AsRef<str>) -> Result<Option<RawBsonRef<'a>>> {
        let key = key.as_ref();
        for element in self.iter() {
            let element = element?;
            if element.key() == key {
                return Ok(Some(element.value()));
            }
        }
        Ok(None)
    }

    /// Walks every element, descending into embedded documents, arrays and code-with-scope
    /// scopes, and fails on the first malformed byte.
    pub fn validate(&self) -> Result<()> {
        self.validate_at_depth(0).map(|_| ())
    }

    /// Validates the document and returns its number of top-level elements.
    pub(crate) fn validate_and_count(&self) -> Result<usize> {
        self.validate_at_depth(0)
    }

    /// Reports whether embedding this document would nest containers more than `budget`
    /// levels below the point where it is stored.
    fn nesting_exceeds(&self, budget: usize) -> Result<bool> {
        if budget == 0 {
            return Ok(true);
        }
        for element in self.iter() {
            let exceeds = match element?.value() {
                RawBsonRef::Document(doc) | RawBsonRef::Array(doc) => {
                    doc.nesting_exceeds(budget - 1)?
                }
                RawBsonRef::JavaScriptCodeWithScope { scope, .. } => {
                    scope.nesting_exceeds(budget - 1)?
                }
                _ => false,
            };
            if exceeds {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn validate_at_depth(&self, depth: usize) -> Result<usize> {
        if depth > MAX_NESTING_DEPTH {
            return Err(Error::malformed_bytes(format!(
                "document nesting exceeds the maximum depth of {}",
                MAX_NESTING_DEPTH
            )));
        }

        let mut count = 0;
        for element in self.iter() {
            match element?.value() {
                RawBsonRef::Document(doc) | RawBsonRef::Array(doc) => {
                    doc.validate_at_depth(depth + 1)?;
                }
                RawBsonRef::JavaScriptCodeWithScope { scope, .. } => {
                    scope.validate_at_depth(depth + 1)?;
                }
                _ => {}
            }
            count += 1;
        }
        Ok(count)
    }

    /// Converts the document into an owned [`Document`], validating it fully.
    pub fn to_document(&self) -> Result<Document> {
        Document::from_bytes(self.data.to_vec())
    }
}

/// A BSON value borrowed from an encoded document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RawBsonRef<'a> {
    /// 64-bit binary floating point
    Double(f64),
    /// UTF-8 string
    String(&'a str),
    /// Array, stored as a document keyed by index
    Array(RawDocument<'a>),
    /// Embedded document
    Document(RawDocument<'a>),
    /// Boolean value
    Boolean(bool),
    /// Null value
    Null,
    /// Regular expression
    RegularExpression {
        /// The pattern.
        pattern: &'a str,
        /// The options, as stored.
        options: &'a str,
    },
    /// JavaScript code
    JavaScriptCode(&'a str),
    /// JavaScript code w/ scope
    JavaScriptCodeWithScope {
        /// The code.
        code: &'a str,
        /// The scope document.
        scope: RawDocument<'a>,
    },
    /// 32-bit signed integer
    Int32(i32),
    /// 64-bit signed integer
    Int64(i64),
    /// Timestamp
    Timestamp(Timestamp),
    /// Binary data
    Binary {
        /// The subtype.
        subtype: BinarySubtype,
        /// The payload, without the inner length prefix of the old binary subtype.
        bytes: &'a [u8],
    },
    /// ObjectId
    ObjectId(ObjectId),
    /// UTC datetime
    DateTime(DateTime),
    /// Symbol (Deprecated)
    Symbol(&'a str),
    /// 128-bit decimal floating point
    Decimal128(Decimal128),
    /// Undefined value (Deprecated)
    Undefined,
    /// Max key
    MaxKey,
    /// Min key
    MinKey,
    /// DBPointer (Deprecated)
    DbPointer {
        /// The namespace.
        namespace: &'a str,
        /// The referenced id.
        id: ObjectId,
    },
}

impl<'a> RawBsonRef<'a> {
    /// Get the [`ElementType`] of this value.
    pub fn element_type(&self) -> ElementType {
        match *self {
            RawBsonRef::Double(..) => ElementType::Double,
            RawBsonRef::String(..) => ElementType::String,
            RawBsonRef::Array(..) => ElementType::Array,
            RawBsonRef::Document(..) => ElementType::EmbeddedDocument,
            RawBsonRef::Boolean(..) => ElementType::Boolean,
            RawBsonRef::Null => ElementType::Null,
            RawBsonRef::RegularExpression { .. } => ElementType::RegularExpression,
            RawBsonRef::JavaScriptCode(..) => ElementType::JavaScriptCode,
            RawBsonRef::JavaScriptCodeWithScope { .. } => ElementType::JavaScriptCodeWithScope,
            RawBsonRef::Int32(..) => ElementType::Int32,
            RawBsonRef::Int64(..) => ElementType::Int64,
            RawBsonRef::Timestamp(..) => ElementType::Timestamp,
            RawBsonRef::Binary { .. } => ElementType::Binary,
            RawBsonRef::ObjectId(..) => ElementType::ObjectId,
            RawBsonRef::DateTime(..) => ElementType::DateTime,
            RawBsonRef::Symbol(..) => ElementType::Symbol,
            RawBsonRef::Decimal128(..) => ElementType::Decimal128,
            RawBsonRef::Undefined => ElementType::Undefined,
            RawBsonRef::MaxKey => ElementType::MaxKey,
            RawBsonRef::MinKey => ElementType::MinKey,
            RawBsonRef::DbPointer { .. } => ElementType::DbPointer,
        }
    }

    /// Converts the value into an owned [`Bson`]. Nested documents and arrays are validated
    /// before they are copied.
    pub fn to_bson(self) -> Result<Bson> {
        self.convert(false)
    }

    /// Like [`RawBsonRef::to_bson`], for values read out of a buffer that was already validated
    /// in full.
    pub(crate) fn to_bson_trusted(self) -> Result<Bson> {
        self.convert(true)
    }

    fn convert(self, trusted: bool) -> Result<Bson> {
        let document = |doc: RawDocument<'_>| -> Result<Document> {
            if trusted {
                Ok(Document::from_validated_bytes(doc.as_bytes().to_vec()))
            } else {
                doc.to_document()
            }
        };

        Ok(match self {
            RawBsonRef::Double(f) => Bson::Double(f),
            RawBsonRef::String(s) => Bson::String(s.to_string()),
            RawBsonRef::Array(doc) => {
                if !trusted {
                    doc.validate()?;
                }
                let mut values = Vec::new();
                for (index, element) in doc.iter().enumerate() {
                    let value = element
                        .and_then(|e| e.value().convert(true))
                        .map_err(|e| e.with_index(index))?;
                    values.push(value);
                }
                Bson::Array(values)
            }
            RawBsonRef::Document(doc) => Bson::Document(document(doc)?),
            RawBsonRef::Boolean(b) => Bson::Boolean(b),
            RawBsonRef::Null => Bson::Null,
            RawBsonRef::RegularExpression { pattern, options } => {
                Bson::RegularExpression(Regex {
                    pattern: pattern.to_string(),
                    options: options.to_string(),
                })
            }
            RawBsonRef::JavaScriptCode(code) => Bson::JavaScriptCode(code.to_string()),
            RawBsonRef::JavaScriptCodeWithScope { code, scope } => {
                Bson::JavaScriptCodeWithScope(JavaScriptCodeWithScope {
                    code: code.to_string(),
                    scope: document(scope)?,
                })
            }
            RawBsonRef::Int32(i) => Bson::Int32(i),
            RawBsonRef::Int64(i) => Bson::Int64(i),
            RawBsonRef::Timestamp(ts) => Bson::Timestamp(ts),
            RawBsonRef::Binary { subtype, bytes } => {
                Bson::Binary(Binary::from_parts_unchecked(subtype, bytes.to_vec()))
            }
            RawBsonRef::ObjectId(oid) => Bson::ObjectId(oid),
            RawBsonRef::DateTime(dt) => Bson::DateTime(dt),
            RawBsonRef::Symbol(s) => Bson::Symbol(s.to_string()),
            RawBsonRef::Decimal128(d) => Bson::Decimal128(d),
            RawBsonRef::Undefined => Bson::Undefined,
            RawBsonRef::MaxKey => Bson::MaxKey,
            RawBsonRef::MinKey => Bson::MinKey,
            RawBsonRef::DbPointer { namespace, id } => Bson::DbPointer(DbPointer {
                namespace: namespace.to_string(),
                id,
            }),
        })
    }
}

fn checked_add(lhs: usize, rhs: usize) -> Result<usize> {
    lhs.checked_add(rhs)
        .ok_or_else(|| Error::malformed_bytes("attempted to add with overflow"))
}

/// Borrows `len` bytes of `data` starting at `start`.
pub(crate) fn slice_at(data: &[u8], start: usize, len: usize) -> Result<&[u8]> {
    let end = checked_add(start, len)?;
    data.get(start..end).ok_or_else(|| {
        Error::malformed_bytes(format!(
            "length exceeds remaining length of buffer: {} vs {}",
            len,
            data.len().saturating_sub(start)
        ))
    })
}

fn array_at<const N: usize>(data: &[u8], start: usize) -> Result<[u8; N]> {
    let mut out = [0u8; N];
    out.copy_from_slice(slice_at(data, start, N)?);
    Ok(out)
}

pub(crate) fn i32_from_slice(data: &[u8], start: usize) -> Result<i32> {
    Ok(i32::from_le_bytes(array_at(data, start)?))
}

pub(crate) fn u32_from_slice(data: &[u8], start: usize) -> Result<u32> {
    Ok(u32::from_le_bytes(array_at(data, start)?))
}

pub(crate) fn i64_from_slice(data: &[u8], start: usize) -> Result<i64> {
    Ok(i64::from_le_bytes(array_at(data, start)?))
}

pub(crate) fn f64_from_slice(data: &[u8], start: usize) -> Result<f64> {
    Ok(f64::from_le_bytes(array_at(data, start)?))
}

pub(crate) fn oid_from_slice(data: &[u8], start: usize) -> Result<ObjectId> {
    Ok(ObjectId::from_bytes(array_at(data, start)?))
}

pub(crate) fn decimal128_from_slice(data: &[u8], start: usize) -> Result<Decimal128> {
    Ok(Decimal128::from_bytes(array_at(data, start)?))
}

/// Reads a null-terminated string starting at `start`.
pub(crate) fn read_nullterminated(data: &[u8], start: usize) -> Result<&str> {
    let rest = data
        .get(start..)
        .ok_or_else(|| Error::malformed_bytes("cstring starts past the end of the buffer"))?;
    match rest.iter().position(|b| *b == 0) {
        Some(end) => try_to_str(&rest[..end]),
        None => Err(Error::malformed_bytes("expected null terminator")),
    }
}

/// Reads a length-prefixed string starting at `start`, returning it along with the number of
/// bytes it occupied.
pub(crate) fn read_lenencoded(data: &[u8], start: usize) -> Result<(&str, usize)> {
    let length = i32_from_slice(data, start)?;
    if length < 1 {
        return Err(Error::malformed_bytes(format!(
            "invalid string length: {}",
            length
        )));
    }
    let length = length as usize;
    let bytes = slice_at(data, checked_add(start, 4)?, length)?;
    if bytes[length - 1] != 0 {
        return Err(Error::malformed_bytes("string not null-terminated"));
    }
    Ok((try_to_str(&bytes[..length - 1])?, 4 + length))
}

/// Reads a length-prefixed embedded document starting at `start`.
pub(crate) fn read_document(data: &[u8], start: usize) -> Result<RawDocument<'_>> {
    let size = i32_from_slice(data, start)?;
    if size < MIN_BSON_DOCUMENT_SIZE as i32 {
        return Err(Error::malformed_bytes(format!(
            "document too small: {} bytes",
            size
        )));
    }
    RawDocument::from_bytes(slice_at(data, start, size as usize)?)
}

fn try_to_str(data: &[u8]) -> Result<&str> {
    simdutf8::basic::from_utf8(data).map_err(|_| Error::from(ErrorKind::Utf8Encoding))
}
