use hex::FromHexError;
use thiserror::Error as ThisError;

use crate::error::{Error, ErrorKind};

/// The kinds of errors that can occur when parsing an [`ObjectId`](crate::oid::ObjectId).
#[derive(Clone, Debug, ThisError)]
#[non_exhaustive]
pub enum ObjectIdErrorKind {
    /// A character outside `0-9`, `a-f` and `A-F` was found in the hex string.
    #[error("invalid character '{c}' encountered at index {index}")]
    #[non_exhaustive]
    InvalidHexStringCharacter {
        /// The invalid character.
        c: char,

        /// The index at which the invalid character was encountered.
        index: usize,
    },

    /// The hex string was not exactly 24 characters long.
    #[error("invalid hex string length {length}")]
    #[non_exhaustive]
    InvalidHexStringLength {
        /// The length of the invalid hex string.
        length: usize,
    },

    /// A byte slice that is not 12 bytes long was used to build an `ObjectId`.
    #[error("expected 12 bytes, got {length}")]
    #[non_exhaustive]
    InvalidByteLength {
        /// The length of the slice.
        length: usize,
    },
}

impl Error {
    // Not a From impl, to keep hex out of the public API.
    pub(crate) fn from_hex_error(error: FromHexError, length: usize) -> Self {
        let kind = match error {
            FromHexError::InvalidHexCharacter { c, index } => {
                ObjectIdErrorKind::InvalidHexStringCharacter { c, index }
            }
            FromHexError::InvalidStringLength | FromHexError::OddLength => {
                ObjectIdErrorKind::InvalidHexStringLength { length }
            }
        };
        ErrorKind::ObjectId { kind }.into()
    }

    pub(crate) fn oid_invalid_length(length: usize) -> Self {
        ErrorKind::ObjectId {
            kind: ObjectIdErrorKind::InvalidHexStringLength { length },
        }
        .into()
    }

    pub(crate) fn oid_invalid_byte_length(length: usize) -> Self {
        ErrorKind::ObjectId {
            kind: ObjectIdErrorKind::InvalidByteLength { length },
        }
        .into()
    }
}
