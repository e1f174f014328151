use thiserror::Error as ThisError;

use crate::{
    error::{Error, ErrorKind},
    spec::ElementType,
};

/// The ways a typed getter on a [`Document`](crate::Document) can fail.
#[derive(Clone, Debug, ThisError)]
#[non_exhaustive]
pub enum ValueAccessErrorKind {
    /// No value for the specified key was present in the document.
    #[error("the key was not present in the document")]
    NotPresent,

    /// The stored value has a different BSON type than the getter returns.
    #[error("expected type {expected:?}, got type {actual:?}")]
    #[non_exhaustive]
    UnexpectedType {
        /// The actual type of the value.
        actual: ElementType,

        /// The expected type of the value.
        expected: ElementType,
    },
}

impl Error {
    pub(crate) fn value_access_not_present(key: &str) -> Self {
        Error::from(ErrorKind::ValueAccess {
            kind: ValueAccessErrorKind::NotPresent,
        })
        .with_key(key)
    }

    pub(crate) fn value_access_unexpected_type(
        key: &str,
        actual: ElementType,
        expected: ElementType,
    ) -> Self {
        Error::from(ErrorKind::ValueAccess {
            kind: ValueAccessErrorKind::UnexpectedType { actual, expected },
        })
        .with_key(key)
    }

    /// Whether this error came from a typed getter on a missing key.
    pub fn is_value_access_not_present(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::ValueAccess {
                kind: ValueAccessErrorKind::NotPresent,
                ..
            }
        )
    }

    /// Whether this error came from a typed getter on a value of another type.
    pub fn is_value_access_unexpected_type(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::ValueAccess {
                kind: ValueAccessErrorKind::UnexpectedType { .. },
                ..
            }
        )
    }
}
