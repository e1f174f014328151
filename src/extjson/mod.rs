//! Deserialization and serialization of [MongoDB Extended JSON v2](https://www.mongodb.com/docs/manual/reference/mongodb-extended-json/)
//!
//! ## Overview of Extended JSON
//!
//! MongoDB Extended JSON (abbreviated extJSON) is a format of JSON that carries BSON type
//! information. Plain JSON cannot represent every BSON type without loss, so extJSON wraps the
//! types JSON lacks in single-key objects whose key starts with `$`.
//!
//! For example, a BSON binary is represented by the following format:
//! ```text
//! {
//!    "$binary": {
//!        "base64": <base64 encoded payload as a string>,
//!        "subType": <subtype as a one or two character hex string>,
//!    }
//! }
//! ```
//!
//! ### Canonical and Relaxed Modes
//!
//! There are two modes of extJSON: "Canonical" and "Relaxed". They are the same except for the
//! following differences:
//!   - In relaxed mode, finite BSON numbers are represented by the JSON number type rather than
//!     the object notation.
//!   - In relaxed mode, dates between the years 1970 and 9999 are written as RFC 3339 strings.
//!
//! ```rust
//! # use bson_core::{bson, DateTime};
//! let doc = bson!({ "x": 5, "d": DateTime::from_millis(0) });
//!
//! assert_eq!(
//!     doc.clone().into_relaxed_extjson().to_string(),
//!     r#"{"x":5,"d":{"$date":"1970-01-01T00:00:00Z"}}"#,
//! );
//! assert_eq!(
//!     doc.into_canonical_extjson().to_string(),
//!     r#"{"x":{"$numberInt":"5"},"d":{"$date":{"$numberLong":"0"}}}"#,
//! );
//! ```
//!
//! Canonical mode keeps every value's exact type. Relaxed mode reads better in logs but an `Int64`
//! that fits in 32 bits comes back as an `Int32` (the two still compare equal).
//!
//! Parsing is lenient: either mode, a mix of both, and a few legacy forms (`{"$date": <millis>}`,
//! `{"$regex": .., "$options": ..}`, `{"$uuid": ..}`) are accepted. See [`de`] for details.

pub mod de;
pub(crate) mod models;
pub mod ser;
