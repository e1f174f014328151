// The MIT License (MIT)

// Copyright (c) 2015 Y. T. Chung <zonyitoo@gmail.com>

// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:

// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Decoder
//!
//! A [`Decoder`] turns [`Bson`] back into any [`serde::Deserialize`] type. Numbers are
//! converted between BSON widths freely as long as the value is exactly representable in the
//! requested Rust type: an `Int64(7)` fills an `i8` field, a `Double(2.0)` fills a `u32`, but a
//! `Double(2.5)` or an `Int64(300)` requested as `u8` fails with a type-mismatch error instead
//! of being truncated.
//!
//! ```rust
//! use bson_core::{doc, de::Decoder};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Reading {
//!     sensor: String,
//!     value: u8,
//! }
//!
//! let decoder = Decoder::new();
//! let reading: Reading = decoder.decode(doc! { "sensor": "a1", "value": 7_i64 })?;
//! assert_eq!(reading, Reading { sensor: "a1".into(), value: 7 });
//!
//! let err = decoder.decode::<Reading>(doc! { "sensor": "a1", "value": 2.5 }).unwrap_err();
//! assert!(err.is_type_mismatch());
//! assert_eq!(err.key.as_deref(), Some("value"));
//! # Ok::<(), bson_core::error::Error>(())
//! ```

mod options;
mod serde;

pub use self::{
    options::{
        BytesDecodingStrategy,
        DateDecodingStrategy,
        DecoderOptions,
        DecoderOptionsBuilder,
        UuidDecodingStrategy,
    },
    serde::Deserializer,
};

pub(crate) use self::serde::BsonVisitor;

use std::sync::Arc;

use ::serde::de::DeserializeOwned;

use crate::{
    bson::{Bson, Document},
    error::Result,
};

/// Decodes [`Bson`] into serde values using a fixed set of [`DecoderOptions`].
///
/// The options belong to the decoder, so every value it decodes uses the same strategies.
/// Cloning a decoder is cheap.
#[derive(Clone, Debug, Default)]
pub struct Decoder {
    options: Arc<DecoderOptions>,
}

impl Decoder {
    /// Construct a decoder with the default options.
    pub fn new() -> Decoder {
        Decoder::default()
    }

    /// Construct a decoder with the given options.
    pub fn with_options(options: DecoderOptions) -> Decoder {
        Decoder {
            options: Arc::new(options),
        }
    }

    /// The options this decoder applies.
    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Decode a `T` from a [`Bson`] value.
    pub fn decode_from_bson<T>(&self, bson: Bson) -> Result<T>
    where
        T: DeserializeOwned,
    {
        T::deserialize(Deserializer::with_shared_options(bson, self.options.clone()))
    }

    /// Decode a `T` from a [`Document`].
    pub fn decode<T>(&self, doc: Document) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.decode_from_bson(Bson::Document(doc))
    }

    /// Decode a `T` from the bytes of a BSON document. The bytes are fully validated first.
    pub fn decode_from_slice<T>(&self, bytes: &[u8]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.decode(Document::from_bytes(bytes)?)
    }
}

/// Deserialize a `T` from the provided [`Bson`] value with the default options.
pub fn deserialize_from_bson<T>(bson: Bson) -> Result<T>
where
    T: DeserializeOwned,
{
    Decoder::new().decode_from_bson(bson)
}

/// Deserialize a `T` from the provided [`Document`] with the default options.
pub fn deserialize_from_document<T>(doc: Document) -> Result<T>
where
    T: DeserializeOwned,
{
    Decoder::new().decode(doc)
}

/// Deserialize an instance of type `T` from a slice of BSON bytes with the default options.
pub fn deserialize_from_slice<T>(bytes: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    Decoder::new().decode_from_slice(bytes)
}
