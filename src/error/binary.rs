use thiserror::Error as ThisError;

use crate::{
    error::{Error, ErrorKind},
    spec::BinarySubtype,
};

/// The kinds of errors that can occur when constructing a [`Binary`](crate::Binary) value.
#[derive(Clone, Debug, ThisError)]
#[non_exhaustive]
pub enum BinaryErrorKind {
    /// A UUID subtype was given a payload whose length is not 16 bytes.
    #[error("binary subtype {subtype:?} requires 16 bytes, got {length}")]
    #[non_exhaustive]
    InvalidUuidLength {
        /// The subtype that was requested.
        subtype: BinarySubtype,

        /// The length of the supplied payload.
        length: usize,
    },

    /// The payload exceeds the largest binary value this crate will build or decode.
    #[error("binary payload of {length} bytes exceeds the maximum of {max}")]
    #[non_exhaustive]
    TooLarge {
        /// The length of the payload.
        length: usize,

        /// The maximum accepted length.
        max: usize,
    },

    /// Base64 input could not be decoded.
    #[error("invalid base64: {message}")]
    #[non_exhaustive]
    InvalidBase64 {
        /// A message describing the error.
        message: String,
    },
}

impl Error {
    pub(crate) fn binary(kind: BinaryErrorKind) -> Self {
        ErrorKind::Binary { kind }.into()
    }

    pub(crate) fn binary_invalid_uuid_length(subtype: BinarySubtype, length: usize) -> Self {
        Self::binary(BinaryErrorKind::InvalidUuidLength { subtype, length })
    }
}
