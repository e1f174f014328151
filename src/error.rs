//! Contains the error-related types for the `bson_core` crate.

mod binary;
mod datetime;
mod decimal128;
mod oid;
mod uuid;
mod value_access;

use thiserror::Error;

pub use binary::BinaryErrorKind;
pub use datetime::DateTimeErrorKind;
pub use decimal128::Decimal128ErrorKind;
pub use oid::ObjectIdErrorKind;
pub use uuid::UuidErrorKind;
pub use value_access::ValueAccessErrorKind;

/// The result type for all methods that can return an error in the `bson_core` crate.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur in the `bson_core` crate.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,

    /// An optional message describing the error.
    pub message: Option<String>,

    /// The document key associated with the error, if any.
    pub key: Option<String>,

    /// The array index associated with the error, if any.
    pub index: Option<usize>,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BSON error")?;

        if let Some(key) = self.key.as_deref() {
            write!(f, " at key \"{key}\"")?;
        } else if let Some(index) = self.index {
            write!(f, " at array index {index}")?;
        }

        write!(f, ". Kind: {}", self.kind)?;
        if let Some(ref message) = self.message {
            write!(f, ". Message: {message}")?;
        }
        write!(f, ".")
    }
}

/// The types of errors that can occur in the `bson_core` crate.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An error related to the [`Binary`](crate::Binary) type occurred.
    #[error("A Binary-related error occurred: {kind}")]
    #[non_exhaustive]
    Binary {
        /// The kind of Binary-related error that occurred.
        kind: BinaryErrorKind,
    },

    /// An error related to the [`DateTime`](crate::DateTime) type occurred.
    #[error("A DateTime-related error occurred: {kind}")]
    #[non_exhaustive]
    DateTime {
        /// The kind of DateTime-related error that occurred.
        kind: DateTimeErrorKind,
    },

    /// An error related to the [`Decimal128`](crate::Decimal128) type occurred.
    #[error("A Decimal128-related error occurred: {kind}")]
    #[non_exhaustive]
    Decimal128 {
        /// The kind of Decimal128-related error that occurred.
        kind: Decimal128ErrorKind,
    },

    /// Malformed BSON bytes were encountered.
    #[error("Malformed BSON bytes")]
    #[non_exhaustive]
    MalformedBytes {},

    /// Invalid UTF-8 bytes were encountered.
    #[error("Invalid UTF-8")]
    Utf8Encoding,

    /// Malformed Extended JSON text, or a `$`-prefixed wrapper with the wrong shape, was
    /// encountered.
    #[error("Invalid extended JSON")]
    #[non_exhaustive]
    ExtendedJson {},

    /// An error related to the [`ObjectId`](crate::oid::ObjectId) type occurred.
    #[error("An ObjectId-related error occurred: {kind}")]
    #[non_exhaustive]
    ObjectId {
        /// The kind of ObjectId-related error that occurred.
        kind: ObjectIdErrorKind,
    },

    /// An error related to the [`Uuid`](crate::uuid::Uuid) type occurred.
    #[error("A UUID-related error occurred: {kind}")]
    #[non_exhaustive]
    Uuid {
        /// The kind of UUID-related error that occurred.
        kind: UuidErrorKind,
    },

    /// An error occurred when attempting to access a value in a document.
    #[error("An error occurred when attempting to access a document value: {kind}")]
    #[non_exhaustive]
    ValueAccess {
        /// The kind of error that occurred.
        kind: ValueAccessErrorKind,
    },

    /// A value could not be represented by any BSON type.
    #[error("The value cannot be represented in BSON")]
    #[non_exhaustive]
    InvalidValue {},

    /// A general error occurred during serialization.
    #[error("An error occurred during serialization")]
    #[non_exhaustive]
    Serialization {},

    /// A stored BSON value could not satisfy the requested Rust type exactly.
    #[error("The stored value does not match the requested type")]
    #[non_exhaustive]
    TypeMismatch {},

    /// A general error occurred during deserialization.
    #[error("An error occurred during deserialization")]
    #[non_exhaustive]
    Deserialization {},

    /// An I/O error occurred.
    #[error("An I/O error occurred")]
    Io {},
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind,
            key: None,
            index: None,
            message: None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::from(ErrorKind::Io {}).with_message(value)
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::extended_json(value)
    }
}

impl serde::ser::Error for Error {
    fn custom<T>(message: T) -> Self
    where
        T: std::fmt::Display,
    {
        Self::serialization(message)
    }
}

impl serde::de::Error for Error {
    fn custom<T>(message: T) -> Self
    where
        T: std::fmt::Display,
    {
        Self::deserialization(message)
    }
}

impl Error {
    pub(crate) fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub(crate) fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub(crate) fn with_message(mut self, message: impl ToString) -> Self {
        self.message = Some(message.to_string());
        self
    }

    pub(crate) fn malformed_bytes(message: impl ToString) -> Self {
        Self::from(ErrorKind::MalformedBytes {}).with_message(message)
    }

    pub(crate) fn extended_json(message: impl ToString) -> Self {
        Self::from(ErrorKind::ExtendedJson {}).with_message(message)
    }

    pub(crate) fn invalid_value(message: impl ToString) -> Self {
        Self::from(ErrorKind::InvalidValue {}).with_message(message)
    }

    pub(crate) fn serialization(message: impl ToString) -> Self {
        Self::from(ErrorKind::Serialization {}).with_message(message)
    }

    pub(crate) fn type_mismatch(message: impl ToString) -> Self {
        Self::from(ErrorKind::TypeMismatch {}).with_message(message)
    }

    pub(crate) fn deserialization(message: impl ToString) -> Self {
        Self::from(ErrorKind::Deserialization {}).with_message(message)
    }

    /// Whether this error was caused by malformed BSON bytes or invalid UTF-8 inside them.
    pub fn is_malformed_bytes(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::MalformedBytes { .. } | ErrorKind::Utf8Encoding
        )
    }

    /// Whether this error was caused by invalid Extended JSON.
    pub fn is_extended_json(&self) -> bool {
        matches!(self.kind, ErrorKind::ExtendedJson { .. })
    }

    /// Whether a caller-supplied argument was outside the valid domain of a BSON type.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Binary { .. }
                | ErrorKind::DateTime { .. }
                | ErrorKind::Decimal128 { .. }
                | ErrorKind::ObjectId { .. }
                | ErrorKind::Uuid { .. }
        )
    }

    /// Whether a stored value could not populate the requested type exactly.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.kind, ErrorKind::TypeMismatch { .. })
    }

    /// Whether a value could not be represented in any BSON type.
    pub fn is_invalid_value(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidValue { .. })
    }
}
