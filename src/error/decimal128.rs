use thiserror::Error as ThisError;

use crate::error::{Error, ErrorKind};

/// The ways a string can fail to parse into a [`Decimal128`](crate::Decimal128).
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[non_exhaustive]
pub enum Decimal128ErrorKind {
    /// An exponent marker with no digits after it.
    #[error("empty exponent")]
    EmptyExponent,

    /// The exponent is not a decimal integer.
    #[error("invalid exponent: {message}")]
    #[non_exhaustive]
    InvalidExponent {
        /// A message describing the error.
        message: String,
    },

    /// The coefficient is empty or contains something other than digits and one point.
    #[error("invalid coefficient: {message}")]
    #[non_exhaustive]
    InvalidCoefficient {
        /// A message describing the error.
        message: String,
    },

    /// The value is too large to be represented without discarding non-zero digits.
    #[error("overflow")]
    Overflow,

    /// The value is too small to be represented without discarding non-zero digits.
    #[error("underflow")]
    Underflow,

    /// The coefficient has more than 34 significant digits.
    #[error("inexact rounding")]
    InexactRounding,

    /// The input is not a number at all.
    #[error("unparseable")]
    Unparseable,
}

impl Error {
    pub(crate) fn decimal128(kind: Decimal128ErrorKind) -> Self {
        ErrorKind::Decimal128 { kind }.into()
    }

    #[cfg(test)]
    pub(crate) fn decimal128_kind(&self) -> Option<&Decimal128ErrorKind> {
        match &self.kind {
            ErrorKind::Decimal128 { kind } => Some(kind),
            _ => None,
        }
    }
}
