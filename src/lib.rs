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

//! BSON is a binary format in which zero or more key/value pairs are stored as a single entity.
//! We call this entity a document.
//!
//! This library supports version 1.1 of the [BSON standard](http://bsonspec.org/spec.html).
//!
//! ## Basic usage
//!
//! A [`Document`] always holds its encoded bytes. Building one with [`doc!`] produces the wire
//! format directly, and [`Document::from_bytes`] validates a buffer before wrapping it.
//!
//! ```rust
//! use bson_core::{doc, Bson, Document};
//!
//! let doc = doc! { "hello": "world", "n": 1 };
//!
//! let bytes = doc.to_vec();
//! let parsed = Document::from_bytes(bytes)?;
//! assert_eq!(parsed.get("hello"), Some(Bson::String("world".into())));
//! # Ok::<(), bson_core::error::Error>(())
//! ```
//!
//! ## Extended JSON
//!
//! Documents convert to and from [MongoDB Extended JSON](https://www.mongodb.com/docs/manual/reference/mongodb-extended-json/)
//! in both the canonical and relaxed forms. See the [`extjson`] module.
//!
//! ## Serde
//!
//! Any [`serde::Serialize`] type encodes into a [`Document`] through an [`Encoder`], and any
//! [`serde::Deserialize`] type decodes back out through a [`Decoder`]. Both carry options that
//! control how dates, byte buffers and UUIDs are represented.
//!
//! ```rust
//! use bson_core::{deserialize_from_document, serialize_to_document};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Person {
//!     name: String,
//!     age: i32,
//! }
//!
//! let person = Person { name: "Ada".into(), age: 36 };
//! let doc = serialize_to_document(&person)?;
//! let back: Person = deserialize_from_document(doc)?;
//! assert_eq!(back, person);
//! # Ok::<(), bson_core::error::Error>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

#[doc(inline)]
pub use self::{
    binary::Binary,
    bson::{Array, Bson, DbPointer, JavaScriptCodeWithScope, Regex, Timestamp},
    datetime::DateTime,
    de::{Decoder, deserialize_from_bson, deserialize_from_document, deserialize_from_slice},
    decimal128::Decimal128,
    document::Document,
    oid::ObjectId,
    ser::{Encoder, serialize_to_bson, serialize_to_document, serialize_to_vec},
    uuid::{Uuid, UuidRepresentation},
};

#[macro_use]
mod macros;
pub mod binary;
mod bson;
pub mod datetime;
pub mod de;
pub mod decimal128;
pub mod document;
pub mod error;
pub mod extjson;
pub mod oid;
pub mod raw;
pub mod ser;
pub mod spec;
pub mod uuid;

#[cfg(test)]
mod tests;
