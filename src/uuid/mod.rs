//! UUID support for BSON.
//!
//! The BSON format stores UUIDs as binary values with the UUID subtype (4). The [`Uuid`] type in
//! this module wraps [`uuid::Uuid`] so that it converts to and from such binary values, and so
//! that an [`Encoder`](crate::Encoder) or [`Decoder`](crate::Decoder) can apply its configured
//! [`UuidEncodingStrategy`](crate::ser::UuidEncodingStrategy) to `Uuid` fields.
//!
//! ```rust
//! use bson_core::{doc, uuid::Uuid, Bson};
//!
//! let uuid = Uuid::parse_str("00112233-4455-6677-8899-aabbccddeeff").unwrap();
//! let doc = doc! { "id": uuid };
//! assert!(matches!(doc.get("id"), Some(Bson::Binary(_))));
//! ```
//!
//! With other serde formats such as JSON, [`Uuid`] behaves exactly like [`uuid::Uuid`] and
//! produces a hyphenated string.
//!
//! ## Legacy representations
//!
//! Older drivers wrote UUIDs with the deprecated subtype 3 and a driver-specific byte order. The
//! [`UuidRepresentation`] enum selects one of those layouts when converting between [`Uuid`] and
//! [`Binary`].

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use crate::{
    Binary,
    Bson,
    error::{Error, Result},
    spec::BinarySubtype,
};

/// Newtype name [`Uuid`]'s serde impls use. The crate's encoder and decoder recognise it and
/// apply their UUID strategy; other formats ignore it.
pub(crate) const UUID_NEWTYPE_NAME: &str = "$__bson_core_private_uuid";

/// A struct modeling a BSON UUID value (i.e. a Binary value with subtype 4).
#[derive(Clone, Copy, PartialEq, Hash, Eq, PartialOrd, Ord)]
pub struct Uuid {
    uuid: uuid::Uuid,
}

impl Uuid {
    /// Creates a random (version 4) UUID.
    pub fn new() -> Self {
        Self {
            uuid: uuid::Uuid::new_v4(),
        }
    }

    /// Creates a [`Uuid`] using the supplied big-endian bytes.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self::from_external_uuid(uuid::Uuid::from_bytes(bytes))
    }

    /// Creates a [`Uuid`] from a slice, failing unless it is exactly 16 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; 16] = bytes
            .try_into()
            .map_err(|_| Error::invalid_uuid_length(bytes.len()))?;
        Ok(Self::from_bytes(bytes))
    }

    /// Creates a [`Uuid`] from the provided hex string, with or without hyphens.
    pub fn parse_str(input: impl AsRef<str>) -> Result<Self> {
        let uuid = uuid::Uuid::parse_str(input.as_ref()).map_err(Error::invalid_uuid_string)?;
        Ok(Self::from_external_uuid(uuid))
    }

    pub(crate) const fn from_external_uuid(uuid: uuid::Uuid) -> Self {
        Self { uuid }
    }

    /// Returns an array of 16 bytes containing the [`Uuid`]'s data.
    pub const fn bytes(self) -> [u8; 16] {
        *self.uuid.as_bytes()
    }

    /// Convert this value into the `uuid` crate's type.
    pub fn to_uuid_1(self) -> uuid::Uuid {
        self.uuid
    }
}

impl Default for Uuid {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for Uuid {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl serde::Serialize for Uuid {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_newtype_struct(UUID_NEWTYPE_NAME, &self.uuid)
    }
}

impl<'de> serde::Deserialize<'de> for Uuid {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match deserializer.deserialize_newtype_struct(UUID_NEWTYPE_NAME, crate::de::BsonVisitor)? {
            // Non-BSON formats have no subtype to carry, so accept generic 16-byte binaries.
            Bson::Binary(b)
                if matches!(b.subtype(), BinarySubtype::Uuid | BinarySubtype::Generic) =>
            {
                Uuid::from_slice(b.bytes()).map_err(serde::de::Error::custom)
            }
            Bson::Binary(b) if b.subtype() == BinarySubtype::UuidOld => {
                Err(serde::de::Error::custom(
                    "received legacy UUID (subtype 3) but expected regular UUID (subtype 4)",
                ))
            }
            Bson::String(s) => Uuid::parse_str(&s).map_err(serde::de::Error::custom),
            b => Err(serde::de::Error::invalid_type(b.as_unexpected(), &"a UUID")),
        }
    }
}

impl Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.uuid.fmt(f)
    }
}

impl fmt::Debug for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.uuid, f)
    }
}

impl From<Uuid> for Binary {
    fn from(uuid: Uuid) -> Self {
        Binary::from_uuid(uuid)
    }
}

impl From<Uuid> for Bson {
    fn from(u: Uuid) -> Self {
        Bson::Binary(u.into())
    }
}

impl From<uuid::Uuid> for Uuid {
    fn from(u: uuid::Uuid) -> Self {
        Self::from_external_uuid(u)
    }
}

impl From<Uuid> for uuid::Uuid {
    fn from(s: Uuid) -> Self {
        s.to_uuid_1()
    }
}

impl From<uuid::Uuid> for Bson {
    fn from(u: uuid::Uuid) -> Self {
        Uuid::from(u).into()
    }
}

/// The byte layouts a UUID may have been written with.
///
/// Drivers once disagreed on how to store UUIDs under the deprecated binary subtype 3. A value
/// written with a given representation must be read back with the same one.
///
/// ```
/// use bson_core::{Binary, uuid::{Uuid, UuidRepresentation}};
///
/// let uuid = Uuid::parse_str("00112233445566778899AABBCCDDEEFF")?;
/// let bin = Binary::from_uuid_with_representation(uuid, UuidRepresentation::PythonLegacy);
///
/// // The binary holds a PythonLegacy UUID, so the standard conversion refuses it.
/// assert!(bin.to_uuid().is_err());
///
/// let new_uuid = bin.to_uuid_with_representation(UuidRepresentation::PythonLegacy)?;
/// assert_eq!(new_uuid, uuid);
///
/// # Ok::<(), Box::<dyn std::error::Error>>(())
/// ```
#[non_exhaustive]
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum UuidRepresentation {
    /// Binary subtype 4 with the bytes in network order.
    Standard,
    /// Subtype 3, with the first three groups little-endian (C# driver).
    CSharpLegacy,
    /// Subtype 3, with each 8-byte half reversed (Java driver).
    JavaLegacy,
    /// Subtype 3, bytes in network order (Python driver).
    PythonLegacy,
}

impl UuidRepresentation {
    fn subtype(self) -> BinarySubtype {
        match self {
            UuidRepresentation::Standard => BinarySubtype::Uuid,
            _ => BinarySubtype::UuidOld,
        }
    }

    /// Reorders 16 UUID bytes between network order and this representation. The transform is
    /// its own inverse.
    fn reorder(self, mut bytes: [u8; 16]) -> [u8; 16] {
        match self {
            UuidRepresentation::Standard | UuidRepresentation::PythonLegacy => {}
            UuidRepresentation::CSharpLegacy => {
                bytes[0..4].reverse();
                bytes[4..6].reverse();
                bytes[6..8].reverse();
            }
            UuidRepresentation::JavaLegacy => {
                bytes[0..8].reverse();
                bytes[8..16].reverse();
            }
        }
        bytes
    }
}

impl Binary {
    /// Builds a subtype 4 [`Binary`] from a [`Uuid`].
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self::from_uuid_with_representation(uuid, UuidRepresentation::Standard)
    }

    /// Builds a [`Binary`] from a [`Uuid`] using the given representation.
    pub fn from_uuid_with_representation(uuid: Uuid, rep: UuidRepresentation) -> Self {
        Binary::from_parts_unchecked(rep.subtype(), rep.reorder(uuid.bytes()).to_vec())
    }

    /// Reads a [`Uuid`] out of this value using the given representation. The subtype must
    /// match the representation.
    pub fn to_uuid_with_representation(&self, rep: UuidRepresentation) -> Result<Uuid> {
        let expected = rep.subtype();
        if self.subtype() != expected {
            return Err(Error::uuid_representation_mismatch(
                rep,
                self.subtype(),
                expected,
            ));
        }
        let uuid = Uuid::from_slice(self.bytes())?;
        Ok(Uuid::from_bytes(rep.reorder(uuid.bytes())))
    }

    /// Reads a [`Uuid`] out of a subtype 4 value.
    pub fn to_uuid(&self) -> Result<Uuid> {
        self.to_uuid_with_representation(UuidRepresentation::Standard)
    }
}
