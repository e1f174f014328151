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

//! Encoder
//!
//! An [`Encoder`] turns any [`serde::Serialize`] value into [`Bson`]. Integers take the
//! narrowest BSON type that holds them exactly: `Int32`, then `Int64`, then (for large
//! unsigned values) an exact `Double`. A value none of those can hold fails with an
//! invalid-value error rather than being truncated.
//!
//! ```rust
//! use bson_core::{doc, ser::{DateEncodingStrategy, Encoder, EncoderOptions}, DateTime};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Event {
//!     name: String,
//!     at: DateTime,
//!     count: u64,
//! }
//!
//! let event = Event { name: "boot".into(), at: DateTime::from_millis(1_500), count: 3 };
//!
//! let encoder = Encoder::with_options(
//!     EncoderOptions::builder()
//!         .date(DateEncodingStrategy::MillisecondsSinceEpoch)
//!         .build(),
//! );
//! let doc = encoder.encode(&event)?;
//! assert_eq!(doc, doc! { "name": "boot", "at": 1_500_i64, "count": 3 });
//! # Ok::<(), bson_core::error::Error>(())
//! ```

mod options;
mod serde;

pub use self::options::{
    BytesEncodingStrategy,
    DateEncodingStrategy,
    EncoderOptions,
    EncoderOptionsBuilder,
    UuidEncodingStrategy,
};

use std::sync::Arc;

use ::serde::Serialize;

use crate::{
    bson::{Bson, Document},
    error::{Error, Result},
};

/// Encodes serde values into [`Bson`] using a fixed set of [`EncoderOptions`].
///
/// The options belong to the encoder, so every value it encodes uses the same strategies.
/// Cloning an encoder is cheap.
#[derive(Clone, Debug, Default)]
pub struct Encoder {
    pub(crate) options: Arc<EncoderOptions>,
}

impl Encoder {
    /// Construct an encoder with the default options.
    pub fn new() -> Encoder {
        Encoder::default()
    }

    /// Construct an encoder with the given options.
    pub fn with_options(options: EncoderOptions) -> Encoder {
        Encoder {
            options: Arc::new(options),
        }
    }

    /// The options this encoder applies.
    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Encode a `T` Serializable into a [`Bson`] value.
    pub fn encode_to_bson<T>(&self, value: &T) -> Result<Bson>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(self.clone())
    }

    /// Encode a `T` Serializable into a BSON [`Document`]. Values that don't serialize as a map
    /// or struct are rejected.
    pub fn encode<T>(&self, value: &T) -> Result<Document>
    where
        T: Serialize + ?Sized,
    {
        match self.encode_to_bson(value)? {
            Bson::Document(doc) => Ok(doc),
            bson => Err(Error::serialization(format!(
                "Could not be serialized to Document, got {:?} instead",
                bson.element_type()
            ))),
        }
    }

    /// Encode a `T` Serializable into the bytes of a BSON document.
    pub fn encode_to_vec<T>(&self, value: &T) -> Result<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        Ok(self.encode(value)?.into_bytes())
    }
}

/// Encode a `T` Serializable into a [`Bson`] value with the default options.
pub fn serialize_to_bson<T>(value: &T) -> Result<Bson>
where
    T: Serialize + ?Sized,
{
    Encoder::new().encode_to_bson(value)
}

/// Serialize a `T` Serializable into a BSON [`Document`] with the default options.
///
/// ```rust
/// use serde::Serialize;
/// use bson_core::doc;
///
/// #[derive(Serialize)]
/// struct Cat {
///     name: String,
///     age: i32
/// }
///
/// let cat = Cat { name: "Garfield".to_string(), age: 43 };
/// let doc = bson_core::serialize_to_document(&cat)?;
/// assert_eq!(doc, doc! { "name": "Garfield", "age": 43 });
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn serialize_to_document<T>(value: &T) -> Result<Document>
where
    T: Serialize + ?Sized,
{
    Encoder::new().encode(value)
}

/// Serialize the given `T` as a BSON byte vector with the default options.
#[inline]
pub fn serialize_to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: Serialize + ?Sized,
{
    Encoder::new().encode_to_vec(value)
}
