//! A BSON document backed by its encoded bytes.

use std::{
    fmt::{self, Debug, Display, Formatter},
    hash::{Hash, Hasher},
    io::{Read, Write},
    iter::FromIterator,
    ops::{Bound, Range, RangeBounds},
    sync::Arc,
};

use ahash::RandomState;
use indexmap::IndexMap;

use crate::{
    Binary,
    Decimal128,
    bson::{Array, Bson, Timestamp},
    error::{Error, Result},
    oid::ObjectId,
    raw::{
        EMPTY_DOCUMENT,
        MIN_BSON_DOCUMENT_SIZE,
        RawBsonRef,
        RawDocument,
        RawElement,
        RawIter,
        RawWriter,
        check_nesting,
        write_element,
        write_length,
        write_value,
    },
    spec::{BinarySubtype, ElementType},
};

/// The result of one of the typed getters on [`Document`].
pub type ValueAccessResult<T> = Result<T>;

/// An ordered BSON document.
///
/// The document always holds its own encoded bytes, so encoding is free and reads parse lazily
/// from the buffer. Clones share the buffer; a mutation on a shared document copies the buffer
/// first, leaving every other clone untouched.
///
/// ```
/// use bson_core::{doc, Bson};
///
/// let mut doc = doc! { "i": 1 };
/// assert_eq!(doc.as_bytes(), &[0x0c, 0, 0, 0, 0x10, b'i', 0, 1, 0, 0, 0, 0]);
///
/// let snapshot = doc.clone();
/// doc.insert("i", 2);
/// assert_eq!(snapshot.get("i"), Some(Bson::Int32(1)));
/// assert_eq!(doc.get("i"), Some(Bson::Int32(2)));
/// ```
#[derive(Clone)]
pub struct Document {
    buf: Arc<Vec<u8>>,
    len: usize,
}

impl Default for Document {
    fn default() -> Self {
        Document::new()
    }
}

impl Display for Document {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        fmt.write_str("{")?;

        let mut first = true;
        for (k, v) in self {
            if first {
                first = false;
                fmt.write_str(" ")?;
            } else {
                fmt.write_str(", ")?;
            }

            write!(fmt, "\"{}\": {}", k, v)?;
        }

        write!(fmt, "{}}}", if !first { " " } else { "" })
    }
}

impl Debug for Document {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        write!(fmt, "Document(")?;
        fmt.debug_map().entries(self.iter()).finish()?;
        write!(fmt, ")")
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.buf, &other.buf) || self.buf == other.buf {
            return true;
        }
        self.len == other.len
            && self
                .iter()
                .zip(other.iter())
                .all(|((k1, v1), (k2, v2))| k1 == k2 && v1 == v2)
    }
}

impl Eq for Document {}

impl Hash for Document {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl AsRef<[u8]> for Document {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// An iterator over the entries of a [`Document`], in insertion order.
pub struct Iter<'a> {
    inner: RawIter<'a>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, Bson);

    fn next(&mut self) -> Option<(&'a str, Bson)> {
        let (key, value) = self.inner.next()?.ok()?.into_parts();
        Some((key, value.to_bson_trusted().ok()?))
    }
}

/// An iterator over a [`Document`]'s keys.
pub struct Keys<'a> {
    inner: RawIter<'a>,
}

impl<'a> Iterator for Keys<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        Some(self.inner.next()?.ok()?.key())
    }
}

/// An iterator over a [`Document`]'s values.
pub struct Values<'a> {
    inner: Iter<'a>,
}

impl Iterator for Values<'_> {
    type Item = Bson;

    fn next(&mut self) -> Option<Bson> {
        self.inner.next().map(|(_, v)| v)
    }
}

/// An owning iterator over a [`Document`]'s entries.
pub struct IntoIter {
    inner: std::vec::IntoIter<(String, Bson)>,
}

impl Iterator for IntoIter {
    type Item = (String, Bson);

    fn next(&mut self) -> Option<(String, Bson)> {
        self.inner.next()
    }
}

impl IntoIterator for Document {
    type Item = (String, Bson);
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        let entries: Vec<_> = self.iter().map(|(k, v)| (k.to_string(), v)).collect();
        IntoIter {
            inner: entries.into_iter(),
        }
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a str, Bson);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: AsRef<str>, V: Into<Bson>> FromIterator<(K, V)> for Document {
    /// Builds a document from key-value pairs; a repeated key overwrites the earlier value in
    /// place.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`Document::insert`].
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut doc = Document::new();
        doc.extend(iter);
        doc
    }
}

impl<K: AsRef<str>, V: Into<Bson>> Extend<(K, V)> for Document {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl Document {
    /// Creates a new empty Document.
    pub fn new() -> Document {
        Document {
            buf: Arc::new(EMPTY_DOCUMENT.to_vec()),
            len: 0,
        }
    }

    /// Parses and fully validates encoded BSON bytes, nested documents included.
    ///
    /// ```
    /// use bson_core::Document;
    ///
    /// let doc = Document::from_bytes(vec![0x0c, 0, 0, 0, 0x10, b'i', 0, 1, 0, 0, 0, 0])?;
    /// assert_eq!(doc.get_i32("i")?, 1);
    ///
    /// // missing the trailing null byte
    /// assert!(Document::from_bytes(vec![0x0b, 0, 0, 0, 0x10, b'i', 0, 1, 0, 0, 0]).is_err());
    /// # Ok::<(), bson_core::error::Error>(())
    /// ```
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Document> {
        let bytes = bytes.into();
        let validated = RawDocument::from_bytes(&bytes).and_then(|raw| raw.validate_and_count());
        match validated {
            Ok(len) => Ok(Document {
                buf: Arc::new(bytes),
                len,
            }),
            Err(error) => {
                tracing::debug!(%error, length = bytes.len(), "rejected malformed BSON document");
                Err(error)
            }
        }
    }

    /// Wraps bytes that are already known to hold a valid document.
    pub(crate) fn from_validated_bytes(bytes: Vec<u8>) -> Document {
        let len = RawDocument::new_unchecked(&bytes).iter().count();
        Document {
            buf: Arc::new(bytes),
            len,
        }
    }

    /// Reads one document from `reader`: a four-byte length prefix followed by the rest of the
    /// document.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Document> {
        let mut prefix = [0u8; 4];
        reader.read_exact(&mut prefix)?;
        let length = i32::from_le_bytes(prefix);
        if length < MIN_BSON_DOCUMENT_SIZE as i32 {
            return Err(Error::malformed_bytes(format!(
                "invalid document length: {}",
                length
            )));
        }

        let mut bytes = prefix.to_vec();
        reader
            .take(length as u64 - 4)
            .read_to_end(&mut bytes)?;
        if bytes.len() != length as usize {
            return Err(Error::malformed_bytes(format!(
                "document truncated: expected {} bytes, read {}",
                length,
                bytes.len()
            )));
        }
        Document::from_bytes(bytes)
    }

    /// Writes the encoded document to `writer`.
    pub fn to_writer<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.buf)?;
        Ok(())
    }

    /// The encoded bytes of this document.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Copies the encoded bytes out of this document.
    pub fn to_vec(&self) -> Vec<u8> {
        self.buf.as_ref().clone()
    }

    /// Consumes the document, returning its encoded bytes. Copies only if the buffer is shared.
    pub fn into_bytes(self) -> Vec<u8> {
        Arc::try_unwrap(self.buf).unwrap_or_else(|shared| shared.as_ref().clone())
    }

    /// A borrowed raw view of this document.
    pub fn raw(&self) -> RawDocument<'_> {
        RawDocument::new_unchecked(&self.buf)
    }

    fn elements(&self) -> impl Iterator<Item = RawElement<'_>> {
        self.raw().iter().map_while(|e| e.ok())
    }

    fn find(&self, key: &str) -> Option<RawElement<'_>> {
        self.elements().find(|e| e.key() == key)
    }

    /// Gets an iterator over the entries of the document, in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.raw().iter(),
        }
    }

    /// Gets an iterator over the keys of the document.
    pub fn keys(&self) -> Keys<'_> {
        Keys {
            inner: self.raw().iter(),
        }
    }

    /// Gets an iterator over the values of the document.
    pub fn values(&self) -> Values<'_> {
        Values { inner: self.iter() }
    }

    /// Returns the number of elements in the document.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the document contains no elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a copy of the value stored at `key`, or [`None`] if the key is absent. When the
    /// buffer holds the key more than once the first occurrence wins.
    pub fn get(&self, key: impl AsRef<str>) -> Option<Bson> {
        self.find(key.as_ref())?.value().to_bson_trusted().ok()
    }

    /// Returns a borrowed view of the value stored at `key`.
    pub fn get_raw(&self, key: impl AsRef<str>) -> Option<RawBsonRef<'_>> {
        Some(self.find(key.as_ref())?.value())
    }

    /// Returns whether the document contains `key`.
    pub fn contains_key(&self, key: impl AsRef<str>) -> bool {
        self.find(key.as_ref()).is_some()
    }

    /// Returns the entry at position `index`.
    pub fn get_index(&self, index: usize) -> Option<(&str, Bson)> {
        self.iter().nth(index)
    }

    /// Returns the first entry.
    pub fn first(&self) -> Option<(&str, Bson)> {
        self.get_index(0)
    }

    /// Returns the last entry.
    pub fn last(&self) -> Option<(&str, Bson)> {
        self.get_index(self.len.checked_sub(1)?)
    }

    /// Sets the value at `key`, returning the previous value if the key was present.
    ///
    /// An existing key keeps its position. A new key is appended. Replacing a fixed-width
    /// value (a double, integer, boolean, datetime, timestamp, decimal or ObjectId) with another
    /// of the same type patches the bytes in place; anything else re-encodes the element.
    ///
    /// Storing [`Bson::Null`] keeps the key. Use [`Document::remove`] to drop it.
    ///
    /// # Panics
    ///
    /// Panics if the key contains a null byte, the document would exceed the maximum size of a
    /// BSON document, or the value nests documents more than 200 levels deep. Use
    /// [`Document::try_insert`] to handle those cases.
    pub fn insert<K: AsRef<str>, V: Into<Bson>>(&mut self, key: K, value: V) -> Option<Bson> {
        match self.try_insert(key, value) {
            Ok(previous) => previous,
            Err(e) => panic!("{}", e),
        }
    }

    /// Like [`Document::insert`], but fails instead of panicking when the key or value cannot
    /// be encoded.
    pub fn try_insert<K: AsRef<str>, V: Into<Bson>>(
        &mut self,
        key: K,
        value: V,
    ) -> Result<Option<Bson>> {
        let key = key.as_ref();
        let value = value.into();
        check_nesting(&value)?;

        let existing = self.find(key).map(|e| {
            (
                e.range(),
                e.value_range(),
                e.element_type(),
                e.value().to_bson_trusted().ok(),
            )
        });

        match existing {
            Some((_, value_range, element_type, previous))
                if element_type == value.element_type() && element_type.fixed_size().is_some() =>
            {
                let mut payload = Vec::with_capacity(value_range.len());
                write_value(&mut payload, &value)?;
                Arc::make_mut(&mut self.buf)[value_range].copy_from_slice(&payload);
                Ok(previous)
            }
            Some((range, _, _, previous)) => {
                let mut element = Vec::new();
                write_element(&mut element, key, &value)?;
                self.replace_range(range, &element)?;
                Ok(previous)
            }
            None => {
                RawWriter::new(Arc::make_mut(&mut self.buf)).append(key, &value)?;
                self.len += 1;
                Ok(None)
            }
        }
    }

    /// Appends an element without looking for an existing one with the same key.
    pub(crate) fn push(&mut self, key: &str, value: &Bson) -> Result<()> {
        check_nesting(value)?;
        RawWriter::new(Arc::make_mut(&mut self.buf)).append(key, value)?;
        self.len += 1;
        Ok(())
    }

    /// Removes `key` from the document, returning its value if it was present.
    pub fn remove(&mut self, key: impl AsRef<str>) -> Option<Bson> {
        let (range, previous) = self
            .find(key.as_ref())
            .map(|e| (e.range(), e.value().to_bson_trusted().ok()))?;
        self.remove_range(range);
        self.len -= 1;
        previous
    }

    /// Keeps only the entries for which `f` returns true.
    pub fn retain<F: FnMut(&str, &Bson) -> bool>(&mut self, mut f: F) {
        let mut len = 0;
        let mut buf = vec![0u8; 4];
        for element in self.elements() {
            let Ok(value) = element.value().to_bson_trusted() else {
                continue;
            };
            if f(element.key(), &value) {
                buf.extend_from_slice(&self.buf[element.range()]);
                len += 1;
            }
        }
        self.buf = Arc::new(finish(buf));
        self.len = len;
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.buf = Arc::new(EMPTY_DOCUMENT.to_vec());
        self.len = 0;
    }

    /// Merges `other` into this document. Keys already present take the value from `other` but
    /// keep their position; new keys are appended in `other`'s order.
    ///
    /// ```
    /// use bson_core::doc;
    ///
    /// let mut a = doc! { "a": 1, "b": 2 };
    /// a.merge(&doc! { "b": 3, "c": 4 })?;
    /// assert_eq!(a, doc! { "a": 1, "b": 3, "c": 4 });
    /// assert_eq!(a.keys().collect::<Vec<_>>(), ["a", "b", "c"]);
    /// # Ok::<(), bson_core::error::Error>(())
    /// ```
    ///
    /// Duplicate keys in either document collapse to a single entry.
    pub fn merge(&mut self, other: &Document) -> Result<()> {
        let mut merged: IndexMap<&str, Bson, RandomState> =
            IndexMap::with_capacity_and_hasher(self.len + other.len, RandomState::new());
        for (key, value) in self.iter() {
            merged.entry(key).or_insert(value);
        }
        for (key, value) in other.iter() {
            merged.insert(key, value);
        }

        let mut buf = vec![0u8; 4];
        for (key, value) in &merged {
            write_element(&mut buf, key, value)?;
        }
        buf.push(0);
        write_length(&mut buf, 0)?;

        let len = merged.len();
        drop(merged);
        self.buf = Arc::new(buf);
        self.len = len;
        Ok(())
    }

    /// Returns a document holding the first `n` entries.
    pub fn prefix(&self, n: usize) -> Document {
        self.slice(..n)
    }

    /// Returns a document holding the last `n` entries.
    pub fn suffix(&self, n: usize) -> Document {
        self.slice(self.len.saturating_sub(n)..)
    }

    /// Returns a document holding the entries whose positions fall in `range`. Out-of-range
    /// bounds are clamped to the document's length.
    ///
    /// ```
    /// use bson_core::doc;
    ///
    /// let doc = doc! { "a": 1, "b": 2, "c": 3 };
    /// assert_eq!(doc.slice(1..), doc! { "b": 2, "c": 3 });
    /// assert_eq!(doc.slice(..=0), doc! { "a": 1 });
    /// ```
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Document {
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => self.len,
        }
        .min(self.len);
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(end);

        let mut buf = vec![0u8; 4];
        for element in self.elements().skip(start).take(end - start) {
            buf.extend_from_slice(&self.buf[element.range()]);
        }
        Document {
            buf: Arc::new(finish(buf)),
            len: end - start,
        }
    }

    fn replace_range(&mut self, range: Range<usize>, replacement: &[u8]) -> Result<()> {
        let new_len = self.buf.len() - range.len() + replacement.len();
        let declared = i32::try_from(new_len).map_err(|_| {
            Error::invalid_value(format!(
                "document of {} bytes exceeds the maximum BSON size",
                new_len
            ))
        })?;
        let buf = Arc::make_mut(&mut self.buf);
        buf.splice(range, replacement.iter().copied());
        buf[..4].copy_from_slice(&declared.to_le_bytes());
        Ok(())
    }

    fn remove_range(&mut self, range: Range<usize>) {
        let buf = Arc::make_mut(&mut self.buf);
        buf.drain(range);
        // shrinking a valid document cannot overflow its length prefix
        let declared = buf.len() as i32;
        buf[..4].copy_from_slice(&declared.to_le_bytes());
    }
}

/// Terminates an element list that starts with a four-byte placeholder and fills in its length.
/// The list must come from an existing document, so it already fits.
fn finish(mut buf: Vec<u8>) -> Vec<u8> {
    buf.push(0);
    let declared = buf.len() as i32;
    buf[..4].copy_from_slice(&declared.to_le_bytes());
    buf
}

/// Typed getters
impl Document {
    fn get_typed<'a, T>(
        &'a self,
        key: &str,
        expected: ElementType,
        f: impl FnOnce(RawBsonRef<'a>) -> Option<T>,
    ) -> ValueAccessResult<T> {
        let value = self
            .get_raw(key)
            .ok_or_else(|| Error::value_access_not_present(key))?;
        let actual = value.element_type();
        f(value).ok_or_else(|| Error::value_access_unexpected_type(key, actual, expected))
    }

    /// Get a floating point value for this key if it exists and has the correct type.
    pub fn get_f64(&self, key: impl AsRef<str>) -> ValueAccessResult<f64> {
        self.get_typed(key.as_ref(), ElementType::Double, |v| match v {
            RawBsonRef::Double(f) => Some(f),
            _ => None,
        })
    }

    /// Get a [`Decimal128`] value for key, if it exists.
    pub fn get_decimal128(&self, key: impl AsRef<str>) -> ValueAccessResult<Decimal128> {
        self.get_typed(key.as_ref(), ElementType::Decimal128, |v| match v {
            RawBsonRef::Decimal128(d) => Some(d),
            _ => None,
        })
    }

    /// Get a string slice this key if it exists and has the correct type.
    pub fn get_str(&self, key: impl AsRef<str>) -> ValueAccessResult<&str> {
        self.get_typed(key.as_ref(), ElementType::String, |v| match v {
            RawBsonRef::String(s) => Some(s),
            _ => None,
        })
    }

    /// Get a copy of the array for this key if it exists and has the correct type.
    pub fn get_array(&self, key: impl AsRef<str>) -> ValueAccessResult<Array> {
        let key = key.as_ref();
        self.get_typed(key, ElementType::Array, |v| match v {
            RawBsonRef::Array(_) => match v.to_bson_trusted() {
                Ok(Bson::Array(array)) => Some(array),
                _ => None,
            },
            _ => None,
        })
    }

    /// Get a copy of the embedded document for this key if it exists and has the correct type.
    pub fn get_document(&self, key: impl AsRef<str>) -> ValueAccessResult<Document> {
        self.get_typed(key.as_ref(), ElementType::EmbeddedDocument, |v| match v {
            RawBsonRef::Document(doc) => {
                Some(Document::from_validated_bytes(doc.as_bytes().to_vec()))
            }
            _ => None,
        })
    }

    /// Get a bool value for this key if it exists and has the correct type.
    pub fn get_bool(&self, key: impl AsRef<str>) -> ValueAccessResult<bool> {
        self.get_typed(key.as_ref(), ElementType::Boolean, |v| match v {
            RawBsonRef::Boolean(b) => Some(b),
            _ => None,
        })
    }

    /// Returns whether this key has a null value
    pub fn is_null(&self, key: impl AsRef<str>) -> bool {
        matches!(self.get_raw(key), Some(RawBsonRef::Null))
    }

    /// Get an i32 value for this key if it exists and has the correct type.
    pub fn get_i32(&self, key: impl AsRef<str>) -> ValueAccessResult<i32> {
        self.get_typed(key.as_ref(), ElementType::Int32, |v| match v {
            RawBsonRef::Int32(i) => Some(i),
            _ => None,
        })
    }

    /// Get an i64 value for this key if it exists and has the correct type.
    pub fn get_i64(&self, key: impl AsRef<str>) -> ValueAccessResult<i64> {
        self.get_typed(key.as_ref(), ElementType::Int64, |v| match v {
            RawBsonRef::Int64(i) => Some(i),
            _ => None,
        })
    }

    /// Get a time stamp value for this key if it exists and has the correct type.
    pub fn get_timestamp(&self, key: impl AsRef<str>) -> ValueAccessResult<Timestamp> {
        self.get_typed(key.as_ref(), ElementType::Timestamp, |v| match v {
            RawBsonRef::Timestamp(ts) => Some(ts),
            _ => None,
        })
    }

    /// Get the bytes of a generic binary value for this key if it exists and has the correct
    /// type.
    pub fn get_binary_generic(&self, key: impl AsRef<str>) -> ValueAccessResult<&[u8]> {
        self.get_typed(key.as_ref(), ElementType::Binary, |v| match v {
            RawBsonRef::Binary {
                subtype: BinarySubtype::Generic,
                bytes,
            } => Some(bytes),
            _ => None,
        })
    }

    /// Get a copy of any binary value for this key if it exists and has the correct type.
    pub fn get_binary(&self, key: impl AsRef<str>) -> ValueAccessResult<Binary> {
        self.get_typed(key.as_ref(), ElementType::Binary, |v| match v {
            RawBsonRef::Binary { subtype, bytes } => {
                Some(Binary::from_parts_unchecked(subtype, bytes.to_vec()))
            }
            _ => None,
        })
    }

    /// Get an object id value for this key if it exists and has the correct type.
    pub fn get_object_id(&self, key: impl AsRef<str>) -> ValueAccessResult<ObjectId> {
        self.get_typed(key.as_ref(), ElementType::ObjectId, |v| match v {
            RawBsonRef::ObjectId(oid) => Some(oid),
            _ => None,
        })
    }

    /// Get a UTC datetime value for this key if it exists and has the correct type.
    pub fn get_datetime(&self, key: impl AsRef<str>) -> ValueAccessResult<crate::DateTime> {
        self.get_typed(key.as_ref(), ElementType::DateTime, |v| match v {
            RawBsonRef::DateTime(dt) => Some(dt),
            _ => None,
        })
    }
}
