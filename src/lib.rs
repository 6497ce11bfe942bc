#![no_std]

//! A configurable, schema-less binary serializer for serde data structures.
//!
//! Sprocket converts values to and from a flat byte buffer under a small set
//! of explicit layout policies: byte order, string termination, and whether
//! variable-sized values carry a length tag. There is no schema, no type
//! information and no framing beyond what these policies ask for, so the same
//! type and [`Configuration`](sans::config::Configuration) must be used on
//! both sides.
//!
//! Most users should begin with the functions in the [`avec`] module. If these
//! prove insufficient, the underlying encode and decode states are exposed in
//! the [`sans`] module.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `derive`: re-export serde's derive macros (default).
//! - `std`: enable reader- and writer-based coding (default).

extern crate alloc;

pub mod avec;
pub mod sans;

#[cfg(feature = "derive")]
pub use serde::{Deserialize, Serialize};
