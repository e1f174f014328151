use std::{fmt, sync::Arc};

use time::format_description::OwnedFormatItem;

use crate::{Bson, DateTime, error::Result, spec::BinarySubtype};

/// How an [`Encoder`](super::Encoder) writes [`DateTime`] fields.
#[derive(Clone, Default)]
#[non_exhaustive]
pub enum DateEncodingStrategy {
    /// A BSON datetime. This is the default.
    #[default]
    BsonDateTime,

    /// A double holding the seconds since the Unix epoch.
    SecondsSinceEpoch,

    /// An int64 holding the milliseconds since the Unix epoch.
    MillisecondsSinceEpoch,

    /// An RFC 3339 (ISO-8601) string.
    Iso8601,

    /// A string produced by the given [`time`] format description.
    Formatted(OwnedFormatItem),

    /// Whatever the callback returns.
    Custom(Arc<dyn Fn(DateTime) -> Result<Bson> + Send + Sync>),
}

impl fmt::Debug for DateEncodingStrategy {
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

/// How an [`Encoder`](super::Encoder) writes byte buffers, i.e. anything that reaches
/// `serialize_bytes` such as a `serde_bytes::ByteBuf`. Plain `Vec<u8>` fields serialize as
/// sequences and are not affected.
#[derive(Clone)]
#[non_exhaustive]
pub enum BytesEncodingStrategy {
    /// A BSON binary with the given subtype. The default uses [`BinarySubtype::Generic`].
    Binary(BinarySubtype),

    /// A base64 string.
    Base64,

    /// An array of int32 values, one per byte.
    DeferredToNative,

    /// Whatever the callback returns.
    Custom(Arc<dyn Fn(&[u8]) -> Result<Bson> + Send + Sync>),
}

impl Default for BytesEncodingStrategy {
    fn default() -> Self {
        Self::Binary(BinarySubtype::Generic)
    }
}

impl fmt::Debug for BytesEncodingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary(subtype) => f.debug_tuple("Binary").field(subtype).finish(),
            Self::Base64 => f.write_str("Base64"),
            Self::DeferredToNative => f.write_str("DeferredToNative"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// How an [`Encoder`](super::Encoder) writes [`Uuid`](crate::uuid::Uuid) fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum UuidEncodingStrategy {
    /// A BSON binary with the UUID subtype (4). This is the default.
    #[default]
    Binary,

    /// A hyphenated string.
    String,

    /// Whatever [`uuid::Uuid`]'s own serde impl produces: a string when the encoder is human
    /// readable, otherwise bytes (which then go through the [`BytesEncodingStrategy`]).
    DeferredToNative,
}

/// Options used to configure an [`Encoder`](super::Encoder). The options live on the encoder
/// and apply to every value it encodes.
#[derive(Clone, Debug, Default)]
#[non_exhaustive]
pub struct EncoderOptions {
    /// How [`DateTime`] fields are written.
    pub date: DateEncodingStrategy,

    /// How byte buffers are written.
    pub bytes: BytesEncodingStrategy,

    /// How [`Uuid`](crate::uuid::Uuid) fields are written.
    pub uuid: UuidEncodingStrategy,

    /// Whether the encoder reports itself as human readable to serde. Defaults to false.
    pub human_readable: bool,
}

impl EncoderOptions {
    /// Create a builder used to construct a new [`EncoderOptions`].
    pub fn builder() -> EncoderOptionsBuilder {
        EncoderOptionsBuilder {
            options: Default::default(),
        }
    }
}

/// A builder used to construct new [`EncoderOptions`] structs.
#[derive(Clone, Debug)]
pub struct EncoderOptionsBuilder {
    options: EncoderOptions,
}

impl EncoderOptionsBuilder {
    /// Set the value for [`EncoderOptions::date`].
    pub fn date(mut self, strategy: DateEncodingStrategy) -> EncoderOptionsBuilder {
        self.options.date = strategy;
        self
    }

    /// Set the value for [`EncoderOptions::bytes`].
    pub fn bytes(mut self, strategy: BytesEncodingStrategy) -> EncoderOptionsBuilder {
        self.options.bytes = strategy;
        self
    }

    /// Set the value for [`EncoderOptions::uuid`].
    pub fn uuid(mut self, strategy: UuidEncodingStrategy) -> EncoderOptionsBuilder {
        self.options.uuid = strategy;
        self
    }

    /// Set the value for [`EncoderOptions::human_readable`].
    pub fn human_readable(mut self, value: bool) -> EncoderOptionsBuilder {
        self.options.human_readable = value;
        self
    }

    /// Consume this builder and produce an [`EncoderOptions`].
    pub fn build(self) -> EncoderOptions {
        self.options
    }
}
