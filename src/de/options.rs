use std::{fmt, sync::Arc};

use time::format_description::OwnedFormatItem;

use crate::{Bson, DateTime, error::Result};

/// How a [`Decoder`](super::Decoder) reads [`DateTime`] fields. Pick the strategy matching the
/// [`DateEncodingStrategy`](crate::ser::DateEncodingStrategy) the data was written with.
#[derive(Clone, Default)]
#[non_exhaustive]
pub enum DateDecodingStrategy {
    /// A BSON datetime. This is the default.
    #[default]
    BsonDateTime,

    /// Any BSON number holding seconds since the Unix epoch. Fractions are rounded to the
    /// nearest millisecond.
    SecondsSinceEpoch,

    /// Any BSON number holding milliseconds since the Unix epoch.
    MillisecondsSinceEpoch,

    /// An RFC 3339 (ISO-8601) string.
    Iso8601,

    /// A string in the given [`time`] format description. Formats without an offset are read
    /// as UTC.
    Formatted(OwnedFormatItem),

    /// Whatever the callback makes of the stored value.
    Custom(Arc<dyn Fn(Bson) -> Result<DateTime> + Send + Sync>),
}

impl fmt::Debug for DateDecodingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BsonDateTime => f.write_str("BsonDateTime"),
            Self::SecondsSinceEpoch => f.write_str("SecondsSinceEpoch"),
            Self::MillisecondsSinceEpoch => f.write_str("MillisecondsSinceEpoch"),
            Self::Iso8601 => f.write_str("Iso8601"),
            Self::Formatted(item) => f.debug_tuple("Formatted").field(item).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// How a [`Decoder`](super::Decoder) reads byte buffers requested through `deserialize_bytes`.
/// A BSON binary is accepted by every strategy except [`Custom`](Self::Custom).
#[derive(Clone, Default)]
#[non_exhaustive]
pub enum BytesDecodingStrategy {
    /// A BSON binary of any subtype. This is the default.
    #[default]
    Binary,

    /// A base64 string.
    Base64,

    /// An array of integers, one per byte.
    DeferredToNative,

    /// Whatever the callback makes of the stored value.
    Custom(Arc<dyn Fn(Bson) -> Result<Vec<u8>> + Send + Sync>),
}

impl fmt::Debug for BytesDecodingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => f.write_str("Binary"),
            Self::Base64 => f.write_str("Base64"),
            Self::DeferredToNative => f.write_str("DeferredToNative"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// How a [`Decoder`](super::Decoder) reads [`Uuid`](crate::uuid::Uuid) fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum UuidDecodingStrategy {
    /// A BSON binary with the UUID subtype (4). This is the default.
    #[default]
    Binary,

    /// A hyphenated string.
    String,

    /// Whatever [`uuid::Uuid`]'s own serde impl accepts.
    DeferredToNative,
}

/// Options used to configure a [`Decoder`](super::Decoder).
#[derive(Clone, Debug, Default)]
#[non_exhaustive]
pub struct DecoderOptions {
    /// How [`DateTime`] fields are read.
    pub date: DateDecodingStrategy,

    /// How byte buffers are read.
    pub bytes: BytesDecodingStrategy,

    /// How [`Uuid`](crate::uuid::Uuid) fields are read.
    pub uuid: UuidDecodingStrategy,

    /// Whether the decoder reports itself as human readable to serde. Defaults to false.
    pub human_readable: bool,
}

impl DecoderOptions {
    /// Create a builder used to construct a new [`DecoderOptions`].
    pub fn builder() -> DecoderOptionsBuilder {
        DecoderOptionsBuilder {
            options: Default::default(),
        }
    }
}

/// A builder used to construct new [`DecoderOptions`] structs.
#[derive(Clone, Debug)]
pub struct DecoderOptionsBuilder {
    options: DecoderOptions,
}

impl DecoderOptionsBuilder {
    /// Set the value for [`DecoderOptions::date`].
    pub fn date(mut self, strategy: DateDecodingStrategy) -> DecoderOptionsBuilder {
        self.options.date = strategy;
        self
    }

    /// Set the value for [`DecoderOptions::bytes`].
    pub fn bytes(mut self, strategy: BytesDecodingStrategy) -> DecoderOptionsBuilder {
        self.options.bytes = strategy;
        self
    }

    /// Set the value for [`DecoderOptions::uuid`].
    pub fn uuid(mut self, strategy: UuidDecodingStrategy) -> DecoderOptionsBuilder {
        self.options.uuid = strategy;
        self
    }

    /// Set the value for [`DecoderOptions::human_readable`].
    pub fn human_readable(mut self, value: bool) -> DecoderOptionsBuilder {
        self.options.human_readable = value;
        self
    }

    /// Consume this builder and produce a [`DecoderOptions`].
    pub fn build(self) -> DecoderOptions {
        self.options
    }
}
