//! Reader- and writer-based coding.
//!
//! _Requires Cargo feature `std`._

use std::{io::Read, io::Write, vec::Vec};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::sans::config::Configuration;

use super::{de, ser};

extern crate std;

/// Errors occurring while coding through a reader or writer.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the supplied reader or writer.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The value could not be encoded.
    #[error(transparent)]
    Encode(#[from] ser::Error),
    /// The input could not be decoded.
    #[error(transparent)]
    Decode(#[from] de::Error),
}

/// Encode a value and write it to a writer.
///
/// This method is also re-exported as `sprocket::avec::encode_writer`.
///
/// Nothing is written if encoding fails.
///
/// _Requires Cargo feature `std`._
pub fn encode<T: Serialize + ?Sized>(
    value: &T,
    config: &Configuration,
    w: &mut impl Write,
) -> Result<(), Error> {
    let bytes = ser::encode(value, config)?;
    w.write_all(&bytes)?;

    Ok(())
}

/// Read a reader to its end and decode a value from the bytes read.
///
/// This method is also re-exported as `sprocket::avec::decode_reader`.
///
/// The whole input is read up front: an untagged value extends to the end of
/// the input, which a partial read cannot locate.
///
/// _Requires Cargo feature `std`._
pub fn decode<T: DeserializeOwned>(r: &mut impl Read, config: &Configuration) -> Result<T, Error> {
    let mut buf = Vec::new();
    r.read_to_end(&mut buf)?;

    Ok(de::decode(&buf, config)?)
}
