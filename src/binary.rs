//! Module containing functionality related to BSON binary values.

use std::fmt::{self, Display};

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::{
    error::{BinaryErrorKind, Error, Result},
    spec::BinarySubtype,
};

/// The largest binary payload that will be constructed or decoded: 16 MiB, the maximum size of a
/// BSON document.
pub const MAX_BINARY_SIZE: usize = 16 * 1024 * 1024;

/// Represents a BSON binary value.
///
/// The fields are only reachable through accessors so a UUID subtype can never hold anything but
/// 16 bytes.
///
/// ```rust
/// use bson_core::{Binary, spec::BinarySubtype};
///
/// assert!(Binary::new(BinarySubtype::Uuid, vec![0; 15]).is_err());
/// assert!(Binary::new(BinarySubtype::Uuid, vec![0; 16]).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binary {
    subtype: BinarySubtype,
    bytes: Vec<u8>,
}

impl Display for Binary {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(
            fmt,
            "Binary({:#x}, {})",
            u8::from(self.subtype),
            self.to_base64()
        )
    }
}

impl Binary {
    /// Creates a [`Binary`] after checking the payload against the subtype. UUID subtypes (3 and
    /// 4) require exactly 16 bytes.
    pub fn new(subtype: BinarySubtype, bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if subtype.is_uuid() && bytes.len() != 16 {
            return Err(Error::binary_invalid_uuid_length(subtype, bytes.len()));
        }
        if bytes.len() > MAX_BINARY_SIZE {
            return Err(Error::binary(BinaryErrorKind::TooLarge {
                length: bytes.len(),
                max: MAX_BINARY_SIZE,
            }));
        }
        Ok(Self { subtype, bytes })
    }

    /// Creates a [`Binary`] with the generic subtype, which accepts any payload.
    pub fn generic(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            subtype: BinarySubtype::Generic,
            bytes: bytes.into(),
        }
    }

    /// Builds a value whose payload is already known to fit the subtype.
    pub(crate) fn from_parts_unchecked(subtype: BinarySubtype, bytes: Vec<u8>) -> Self {
        Self { subtype, bytes }
    }

    /// Creates a [`Binary`] from a base64 string and optional [`BinarySubtype`]. If the
    /// `subtype` argument is [`None`], the [`Binary`] constructed will default to
    /// [`BinarySubtype::Generic`].
    ///
    /// ```rust
    /// # use bson_core::Binary;
    /// # fn example() -> bson_core::error::Result<()> {
    /// let binary = Binary::from_base64("aGVsbG8=", None)?;
    /// assert_eq!(binary.bytes(), b"hello");
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_base64(
        input: impl AsRef<str>,
        subtype: impl Into<Option<BinarySubtype>>,
    ) -> Result<Self> {
        let bytes = STANDARD.decode(input.as_ref()).map_err(|e| {
            Error::binary(BinaryErrorKind::InvalidBase64 {
                message: e.to_string(),
            })
        })?;
        let subtype = subtype.into().unwrap_or(BinarySubtype::Generic);
        Self::new(subtype, bytes)
    }

    /// The subtype of the bytes.
    pub fn subtype(&self) -> BinarySubtype {
        self.subtype
    }

    /// The binary bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the value, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The payload encoded as standard padded base64.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}
