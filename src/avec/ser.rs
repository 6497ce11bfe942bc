//! Serializer front-end over [`EncodeState`].

use core::fmt::Display;

use alloc::{
    string::{String, ToString},
    vec::Vec,
};

use serde::{
    Serialize,
    ser::{self, Impossible},
};
use thiserror::Error;

use crate::sans::{
    config::Configuration,
    encode::{self, EncodeState, Frame},
    path::{Path, Segment},
};

/// The reason an encode call failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ErrorKind {
    /// A primitive value could not be written.
    #[error(transparent)]
    State(#[from] encode::Error),
    /// Found an `Option`, whose absence this format cannot represent.
    #[error("Optional values are not supported.")]
    OptionalTypeDisallowed,
    /// Found an enumeration, whose variant this format cannot represent.
    #[error("Enumerations are not supported.")]
    EnumTypeDisallowed,
    /// An untagged sequence element wrote nothing and would be lost on
    /// decoding.
    #[error("Elements of an untagged sequence must not be zero-sized.")]
    ZeroSizedElement,
    /// An error raised by a `Serialize` implementation.
    #[error("{0}")]
    Custom(String),
}

/// Errors occurring while encoding a value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind} (at {path})")]
pub struct Error {
    kind: ErrorKind,
    path: Path,
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The location of the value that failed to encode.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn at(self, path: Path) -> Self {
        Self { path, ..self }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind,
            path: Path::root(),
        }
    }
}

impl From<encode::Error> for Error {
    fn from(err: encode::Error) -> Self {
        ErrorKind::State(err).into()
    }
}

impl ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        ErrorKind::Custom(msg.to_string()).into()
    }
}

/// Encode a value into a new buffer.
///
/// This method is also re-exported as `sprocket::avec::encode`.
///
/// On failure, no partial output is returned.
pub fn encode<T: Serialize + ?Sized>(value: &T, config: &Configuration) -> Result<Vec<u8>, Error> {
    log::trace!("encoding {} with {config:?}", core::any::type_name::<T>());

    let mut encoder = Encoder::new(config);

    match value.serialize(&mut encoder) {
        Ok(()) => {
            let bytes = encoder.into_bytes();
            log::trace!("encoded {} bytes", bytes.len());
            Ok(bytes)
        }
        Err(err) => {
            let err = err.at(encoder.path);
            log::debug!("encoding {} failed: {err}", core::any::type_name::<T>());
            Err(err)
        }
    }
}

/// Root serializer binding the traversal to an [`EncodeState`].
///
/// Nested containers opened through this serializer all append to the same
/// buffer, in call order.
#[derive(Debug)]
pub struct Encoder<'c> {
    state: EncodeState<'c>,
    path: Path,
}

impl<'c> Encoder<'c> {
    pub fn new(config: &'c Configuration) -> Self {
        Self {
            state: EncodeState::new(config),
            path: Path::root(),
        }
    }

    pub fn state(&self) -> &EncodeState<'c> {
        &self.state
    }

    /// The location of the value being encoded.
    ///
    /// After a failure, this is the location of the value that failed.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.state.into_bytes()
    }

    fn nested<T: Serialize + ?Sized>(&mut self, segment: Segment, value: &T) -> Result<(), Error> {
        self.path.push(segment);
        value.serialize(&mut *self)?;
        self.path.pop();
        Ok(())
    }
}

macro_rules! serialize_integers {
    ($($method:ident: $t:ty),* $(,)?) => {
        $(
            fn $method(self, v: $t) -> Result<(), Error> {
                Ok(self.state.encode_integer(v)?)
            }
        )*
    };
}

impl<'a, 'c> ser::Serializer for &'a mut Encoder<'c> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = SequenceEncoder<'a, 'c>;
    type SerializeTuple = SequenceEncoder<'a, 'c>;
    type SerializeTupleStruct = SequenceEncoder<'a, 'c>;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = SequenceEncoder<'a, 'c>;
    type SerializeStruct = KeyedEncoder<'a, 'c>;
    type SerializeStructVariant = Impossible<(), Error>;

    fn serialize_bool(self, v: bool) -> Result<(), Error> {
        Ok(self.state.encode_bool(v)?)
    }

    serialize_integers! {
        serialize_i8: i8,
        serialize_i16: i16,
        serialize_i32: i32,
        serialize_i64: i64,
        serialize_i128: i128,
        serialize_u8: u8,
        serialize_u16: u16,
        serialize_u32: u32,
        serialize_u64: u64,
        serialize_u128: u128,
    }

    fn serialize_f32(self, v: f32) -> Result<(), Error> {
        Ok(self.state.encode_f32(v)?)
    }

    fn serialize_f64(self, v: f64) -> Result<(), Error> {
        Ok(self.state.encode_f64(v)?)
    }

    fn serialize_char(self, v: char) -> Result<(), Error> {
        Ok(self.state.encode_char(v)?)
    }

    fn serialize_str(self, v: &str) -> Result<(), Error> {
        Ok(self.state.encode_str(v)?)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<(), Error> {
        Ok(self.state.encode_bytes(v)?)
    }

    // Rejected whether or not a value is present: both would be ambiguous
    // with the bytes of the next field.
    fn serialize_none(self) -> Result<(), Error> {
        Err(ErrorKind::OptionalTypeDisallowed.into())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, _value: &T) -> Result<(), Error> {
        Err(ErrorKind::OptionalTypeDisallowed.into())
    }

    fn serialize_unit(self) -> Result<(), Error> {
        self.state.encode_nil();
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<(), Error> {
        ser::Serializer::serialize_unit(self)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<(), Error> {
        Err(ErrorKind::EnumTypeDisallowed.into())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<(), Error> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<(), Error> {
        Err(ErrorKind::EnumTypeDisallowed.into())
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SequenceEncoder<'a, 'c>, Error> {
        let frame = self.state.begin_sequence(len)?;
        Ok(SequenceEncoder::new(self, frame))
    }

    fn serialize_tuple(self, _len: usize) -> Result<SequenceEncoder<'a, 'c>, Error> {
        Ok(SequenceEncoder::new(self, Frame::Fixed))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<SequenceEncoder<'a, 'c>, Error> {
        Ok(SequenceEncoder::new(self, Frame::Fixed))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Impossible<(), Error>, Error> {
        Err(ErrorKind::EnumTypeDisallowed.into())
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SequenceEncoder<'a, 'c>, Error> {
        ser::Serializer::serialize_seq(self, len)
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<KeyedEncoder<'a, 'c>, Error> {
        Ok(KeyedEncoder { encoder: self })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Impossible<(), Error>, Error> {
        Err(ErrorKind::EnumTypeDisallowed.into())
    }

    fn is_human_readable(&self) -> bool {
        false
    }
}

/// Container for struct fields.
///
/// Field names are never written; declaration order is the only framing.
#[derive(Debug)]
pub struct KeyedEncoder<'a, 'c> {
    encoder: &'a mut Encoder<'c>,
}

impl ser::SerializeStruct for KeyedEncoder<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Error> {
        self.encoder.nested(Segment::Field(key), value)
    }

    fn end(self) -> Result<(), Error> {
        Ok(())
    }
}

/// Container for positional elements of sequences, tuples and maps.
#[derive(Debug)]
pub struct SequenceEncoder<'a, 'c> {
    encoder: &'a mut Encoder<'c>,
    frame: Frame,
    count: usize,
    // Output length before the key of the current map entry.
    entry_start: Option<usize>,
}

impl<'a, 'c> SequenceEncoder<'a, 'c> {
    fn new(encoder: &'a mut Encoder<'c>, frame: Frame) -> Self {
        Self {
            encoder,
            frame,
            count: 0,
            entry_start: None,
        }
    }

    /// Number of elements (or map entries) encoded so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Encode the last part of an element, rejecting zero-sized elements when
    /// the sequence is only bounded by the end of output.
    fn element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        let start = self
            .entry_start
            .take()
            .unwrap_or_else(|| self.encoder.state.bytes().len());

        self.encoder.nested(Segment::Index(self.count), value)?;

        if self.frame == Frame::Untagged && self.encoder.state.bytes().len() == start {
            self.encoder.path.push(Segment::Index(self.count));
            return Err(ErrorKind::ZeroSizedElement.into());
        }

        self.count += 1;

        Ok(())
    }

    fn finish(self) -> Result<(), Error> {
        Ok(self.encoder.state.end_sequence(self.frame, self.count)?)
    }
}

impl ser::SerializeSeq for SequenceEncoder<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        self.element(value)
    }

    fn end(self) -> Result<(), Error> {
        self.finish()
    }
}

impl ser::SerializeTuple for SequenceEncoder<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        self.element(value)
    }

    fn end(self) -> Result<(), Error> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for SequenceEncoder<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        self.element(value)
    }

    fn end(self) -> Result<(), Error> {
        self.finish()
    }
}

// Each entry counts as one element: the key, then its value, at one index.
impl ser::SerializeMap for SequenceEncoder<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), Error> {
        self.entry_start = Some(self.encoder.state.bytes().len());
        self.encoder.nested(Segment::Index(self.count), key)
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        self.element(value)
    }

    fn end(self) -> Result<(), Error> {
        self.finish()
    }
}
