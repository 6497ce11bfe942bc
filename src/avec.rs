//! Serde front-end for common encoding and decoding.
//!
//! The functions in this module encode any [`Serialize`](serde::Serialize)
//! value and decode any [`Deserialize`](serde::Deserialize) value. Field
//! names are never written: a struct is the concatenation of its fields in
//! declaration order, so both sides must agree on the type.
//!
//! | Serde type | Layout |
//! |---|---|
//! | `bool` | 1 byte, `0x00` or `0x01` (any non-zero byte decodes as `true`) |
//! | integers | exactly their width, in the configured byte order |
//! | `f32`, `f64` | IEEE-754 bit pattern as `u32` / `u64` |
//! | `char` | Unicode scalar value as `u32` |
//! | `str` | terminated by `0x00`, unterminated, or length-tagged |
//! | bytes, sequences, maps | length-tagged or untagged |
//! | tuples, arrays, structs | elements back to back |
//! | newtype structs | the inner value |
//! | `()`, unit structs | nothing |
//! | `Option`, enums | rejected |
//!
//! # Example
//!
//! ```
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Reading {
//!     sensor: u16,
//!     celsius: f32,
//!     label: String,
//! }
//!
//! let config = Configuration::default();
//! let reading = Reading { sensor: 7, celsius: 21.5, label: "attic".into() };
//!
//! let bytes = sprocket::avec::encode(&reading, &config)?;
//! let decoded: Reading = sprocket::avec::decode(&bytes, &config)?;
//! assert_eq!(reading, decoded);
//! ```
//!
//! `Option` fields are rejected in both directions, whether or not a value is
//! present, since the format has no way to record absence. Enumerations are
//! rejected for the same reason; encode a C-like enumeration through its
//! discriminant instead, for example with `#[serde(into = "u8", try_from =
//! "u8")]`.

pub mod de;
#[cfg(feature = "std")]
pub mod io;
pub mod ser;

pub use de::{Decoder, decode, decode_partial};
#[cfg(feature = "std")]
pub use io::{decode as decode_reader, encode as encode_writer};
pub use ser::{Encoder, encode};
