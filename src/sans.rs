//! Internal state machines for implementing coders.
//!
//! This module is intended for applications that need fine control over how
//! primitive values are laid out, without going through serde. See
//! [`crate::avec`] for the serde front-end covering common use.
//!
//! # Architecture
//!
//! A coding call owns exactly one state: an [`EncodeState`] appending to a
//! growing buffer, or a [`DecodeState`] consuming a slice from the front. Both
//! borrow the same immutable [`Configuration`]. Each primitive operation reads
//! or writes exactly one value and never backtracks; the first error aborts
//! the call.
//!
//! The format carries no type information and no framing beyond what the
//! configuration asks for. Fixed-width values are delimited by their size, and
//! strings, sequences and byte buffers are delimited by a terminator, a 2-byte
//! length tag, or the end of the input. A value delimited by the end of the
//! input must be the last thing written, which [`EncodeState`] enforces under
//! [`VariableSizedTypeStrategy::UntaggedAndAmbiguous`].
//!
//! Some properties are not represented in the states and must be upheld by the
//! caller:
//!
//! - Writing and reading values in the same order.
//!
//! - Never writing a possibly-absent value. [`EncodeState::encode_nil`] writes
//! nothing, and [`DecodeState::decode_nil`] cannot tell that anything was
//! skipped.
//!
//! - Discarding the output of a failed encode.
//!
//! [`EncodeState`]: encode::EncodeState
//! [`EncodeState::encode_nil`]: encode::EncodeState::encode_nil
//! [`DecodeState`]: decode::DecodeState
//! [`DecodeState::decode_nil`]: decode::DecodeState::decode_nil
//! [`Configuration`]: config::Configuration
//! [`VariableSizedTypeStrategy::UntaggedAndAmbiguous`]: config::VariableSizedTypeStrategy::UntaggedAndAmbiguous

pub mod config;
pub mod decode;
pub mod encode;
pub mod path;
pub mod primitive;
