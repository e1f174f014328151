use std::ops::Range;

use crate::{
    DateTime,
    binary::MAX_BINARY_SIZE,
    bson::Timestamp,
    error::{Error, Result},
    spec::{BinarySubtype, ElementType},
};

use super::{
    MIN_CODE_WITH_SCOPE_SIZE,
    RawBsonRef,
    RawDocument,
    decimal128_from_slice,
    f64_from_slice,
    i32_from_slice,
    i64_from_slice,
    oid_from_slice,
    read_document,
    read_lenencoded,
    read_nullterminated,
    slice_at,
    u32_from_slice,
};

/// An iterator over the elements of a [`RawDocument`].
///
/// Each element is checked as it is reached. After the first error the iterator is exhausted.
pub struct RawIter<'a> {
    doc: RawDocument<'a>,
    offset: usize,

    /// Whether the underlying doc is assumed to be valid or if an error has been encountered.
    valid: bool,
}

/// A single element of a document: its key, its value and where it lives in the buffer.
#[derive(Clone, Copy, Debug)]
pub struct RawElement<'a> {
    key: &'a str,
    value: RawBsonRef<'a>,
    start: usize,
    value_start: usize,
    end: usize,
}

impl<'a> RawElement<'a> {
    /// The element's key.
    pub fn key(&self) -> &'a str {
        self.key
    }

    /// The element's value.
    pub fn value(&self) -> RawBsonRef<'a> {
        self.value
    }

    /// The type of the element's value.
    pub fn element_type(&self) -> ElementType {
        self.value.element_type()
    }

    /// Splits the element into its key and value.
    pub fn into_parts(self) -> (&'a str, RawBsonRef<'a>) {
        (self.key, self.value)
    }

    /// The byte range of the whole element, type tag included.
    pub(crate) fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The byte range of the element's payload.
    pub(crate) fn value_range(&self) -> Range<usize> {
        self.value_start..self.end
    }
}

impl<'a> RawIter<'a> {
    pub(crate) fn new(doc: RawDocument<'a>) -> Self {
        Self {
            doc,
            offset: 4,
            valid: true,
        }
    }

    fn next_element(&self) -> Result<RawElement<'a>> {
        let data = self.doc.as_bytes();
        // Values may not run into the document's own terminator.
        let body = &data[..data.len() - 1];

        let tag = data[self.offset];
        let key = read_nullterminated(body, self.offset + 1)?;
        let value_start = self.offset + 1 + key.len() + 1;

        let element_type = ElementType::from(tag).ok_or_else(|| {
            Error::malformed_bytes(format!("invalid element type tag: {:#04x}", tag)).with_key(key)
        })?;

        let (value, size) =
            read_value(body, value_start, element_type).map_err(|e| e.with_key(key))?;

        Ok(RawElement {
            key,
            value,
            start: self.offset,
            value_start,
            end: value_start + size,
        })
    }
}

impl<'a> Iterator for RawIter<'a> {
    type Item = Result<RawElement<'a>>;

    fn next(&mut self) -> Option<Result<RawElement<'a>>> {
        let data = self.doc.as_bytes();
        if !self.valid {
            return None;
        } else if self.offset == data.len() - 1 {
            if data[self.offset] == 0 {
                // end of document marker
                return None;
            } else {
                self.valid = false;
                return Some(Err(Error::malformed_bytes("document not null terminated")));
            }
        } else if self.offset >= data.len() {
            self.valid = false;
            return Some(Err(Error::malformed_bytes("iteration overflowed document")));
        }

        match self.next_element() {
            Ok(element) => {
                self.offset = element.end;
                Some(Ok(element))
            }
            Err(error) => {
                self.valid = false;
                Some(Err(error))
            }
        }
    }
}

/// Reads the payload of an element of type `element_type` at `start`, returning the value and
/// the number of bytes it occupies.
fn read_value(
    data: &[u8],
    start: usize,
    element_type: ElementType,
) -> Result<(RawBsonRef<'_>, usize)> {
    Ok(match element_type {
        ElementType::Int32 => (RawBsonRef::Int32(i32_from_slice(data, start)?), 4),
        ElementType::Int64 => (RawBsonRef::Int64(i64_from_slice(data, start)?), 8),
        ElementType::Double => (RawBsonRef::Double(f64_from_slice(data, start)?), 8),
        ElementType::String => {
            let (s, size) = read_lenencoded(data, start)?;
            (RawBsonRef::String(s), size)
        }
        ElementType::JavaScriptCode => {
            let (s, size) = read_lenencoded(data, start)?;
            (RawBsonRef::JavaScriptCode(s), size)
        }
        ElementType::Symbol => {
            let (s, size) = read_lenencoded(data, start)?;
            (RawBsonRef::Symbol(s), size)
        }
        ElementType::EmbeddedDocument => {
            let doc = read_document(data, start)?;
            (RawBsonRef::Document(doc), doc.as_bytes().len())
        }
        ElementType::Array => {
            let doc = read_document(data, start)?;
            (RawBsonRef::Array(doc), doc.as_bytes().len())
        }
        ElementType::Binary => read_binary(data, start)?,
        ElementType::ObjectId => (RawBsonRef::ObjectId(oid_from_slice(data, start)?), 12),
        ElementType::Boolean => {
            let byte = slice_at(data, start, 1)?[0];
            let b = match byte {
                0 => false,
                1 => true,
                other => {
                    return Err(Error::malformed_bytes(format!(
                        "boolean must be stored as 0 or 1, got {}",
                        other
                    )));
                }
            };
            (RawBsonRef::Boolean(b), 1)
        }
        ElementType::DateTime => (
            RawBsonRef::DateTime(DateTime::from_millis(i64_from_slice(data, start)?)),
            8,
        ),
        ElementType::Null => (RawBsonRef::Null, 0),
        ElementType::Undefined => (RawBsonRef::Undefined, 0),
        ElementType::MinKey => (RawBsonRef::MinKey, 0),
        ElementType::MaxKey => (RawBsonRef::MaxKey, 0),
        ElementType::RegularExpression => {
            let pattern = read_nullterminated(data, start)?;
            let options = read_nullterminated(data, start + pattern.len() + 1)?;
            (
                RawBsonRef::RegularExpression { pattern, options },
                pattern.len() + 1 + options.len() + 1,
            )
        }
        ElementType::DbPointer => {
            let (namespace, size) = read_lenencoded(data, start)?;
            let id = oid_from_slice(data, start + size)?;
            (RawBsonRef::DbPointer { namespace, id }, size + 12)
        }
        ElementType::JavaScriptCodeWithScope => read_code_with_scope(data, start)?,
        ElementType::Timestamp => {
            let increment = u32_from_slice(data, start)?;
            let time = u32_from_slice(data, start + 4)?;
            (RawBsonRef::Timestamp(Timestamp { time, increment }), 8)
        }
        ElementType::Decimal128 => (
            RawBsonRef::Decimal128(decimal128_from_slice(data, start)?),
            16,
        ),
    })
}

fn read_binary(data: &[u8], start: usize) -> Result<(RawBsonRef<'_>, usize)> {
    let len = i32_from_slice(data, start)?;
    if len < 0 {
        return Err(Error::malformed_bytes(format!(
            "negative binary length: {}",
            len
        )));
    }
    let len = len as usize;
    if len > MAX_BINARY_SIZE {
        return Err(Error::malformed_bytes(format!(
            "binary length {} exceeds maximum of {}",
            len, MAX_BINARY_SIZE
        )));
    }

    let subtype = BinarySubtype::from(slice_at(data, start + 4, 1)?[0]);
    let mut bytes = slice_at(data, start + 5, len)?;

    if subtype == BinarySubtype::BinaryOld {
        if len < 4 {
            return Err(Error::malformed_bytes(
                "old binary subtype has no inner declared length",
            ));
        }
        let inner = i32_from_slice(bytes, 0)?;
        if inner < 0 || inner as usize + 4 != len {
            return Err(Error::malformed_bytes(
                "old binary subtype has wrong inner declared length",
            ));
        }
        bytes = &bytes[4..];
    }

    if subtype.is_uuid() && bytes.len() != 16 {
        return Err(Error::malformed_bytes(format!(
            "UUID binary must be 16 bytes, got {}",
            bytes.len()
        )));
    }

    Ok((RawBsonRef::Binary { subtype, bytes }, 4 + 1 + len))
}

fn read_code_with_scope(data: &[u8], start: usize) -> Result<(RawBsonRef<'_>, usize)> {
    let total = i32_from_slice(data, start)?;
    if total < MIN_CODE_WITH_SCOPE_SIZE as i32 {
        return Err(Error::malformed_bytes(format!(
            "code with scope length too small: {}",
            total
        )));
    }
    let total = total as usize;
    let slice = slice_at(data, start, total)?;

    let (code, code_size) = read_lenencoded(slice, 4)?;
    let scope = read_document(slice, 4 + code_size)?;
    if 4 + code_size + scope.as_bytes().len() != total {
        return Err(Error::malformed_bytes(
            "code with scope length does not match its contents",
        ));
    }

    Ok((RawBsonRef::JavaScriptCodeWithScope { code, scope }, total))
}
