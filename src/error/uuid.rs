use thiserror::Error as ThisError;

use crate::{
    error::{Error, ErrorKind},
    spec::BinarySubtype,
    uuid::UuidRepresentation,
};

/// The kinds of errors that can occur when working with the [`Uuid`](crate::uuid::Uuid) type.
#[derive(Clone, Debug, ThisError)]
#[non_exhaustive]
pub enum UuidErrorKind {
    /// The string is not a valid hyphenated or simple UUID.
    #[error("invalid UUID string")]
    #[non_exhaustive]
    InvalidString {},

    /// The binary subtype does not agree with the requested representation.
    #[error(
        "expected binary subtype {expected_binary_subtype:?} for representation \
         {requested_representation:?}, got {actual_binary_subtype:?}"
    )]
    #[non_exhaustive]
    RepresentationMismatch {
        /// The subtype the representation requires.
        expected_binary_subtype: BinarySubtype,

        /// The subtype found on the binary value.
        actual_binary_subtype: BinarySubtype,

        /// The requested representation.
        requested_representation: UuidRepresentation,
    },

    /// The payload was not 16 bytes.
    #[error("expected length of 16 bytes, got {length}")]
    #[non_exhaustive]
    InvalidLength {
        /// The actual length of the data.
        length: usize,
    },
}

impl Error {
    pub(crate) fn invalid_uuid_string(message: impl ToString) -> Self {
        Self::from(ErrorKind::Uuid {
            kind: UuidErrorKind::InvalidString {},
        })
        .with_message(message)
    }

    pub(crate) fn uuid_representation_mismatch(
        requested_representation: UuidRepresentation,
        actual_binary_subtype: BinarySubtype,
        expected_binary_subtype: BinarySubtype,
    ) -> Self {
        ErrorKind::Uuid {
            kind: UuidErrorKind::RepresentationMismatch {
                expected_binary_subtype,
                actual_binary_subtype,
                requested_representation,
            },
        }
        .into()
    }

    pub(crate) fn invalid_uuid_length(length: usize) -> Self {
        ErrorKind::Uuid {
            kind: UuidErrorKind::InvalidLength { length },
        }
        .into()
    }
}
