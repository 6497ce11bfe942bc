//! Deserializer front-end over [`DecodeState`].

use core::fmt::Display;

use alloc::{
    borrow::Cow,
    string::{String, ToString},
};

use serde::de::{self, Deserialize, DeserializeSeed, Visitor};
use thiserror::Error;

use crate::sans::{
    config::Configuration,
    decode::{self, DecodeState},
    path::{Path, Segment},
};

/// The reason a decode call failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ErrorKind {
    /// A primitive value could not be read.
    #[error(transparent)]
    State(#[from] decode::Error),
    /// Found an `Option`, whose absence this format cannot represent.
    #[error("Optional values are not supported.")]
    OptionalTypeDisallowed,
    /// Found an enumeration, whose variant this format cannot represent.
    #[error("Enumerations are not supported.")]
    EnumTypeDisallowed,
    /// The target type asked for type information the input does not carry.
    #[error("The input is not self-describing.")]
    NotSelfDescribing,
    /// An untagged sequence element consumed no input and would repeat
    /// forever.
    #[error("Elements of an untagged sequence must not be zero-sized.")]
    ZeroSizedElement,
    /// An error raised by a `Deserialize` implementation.
    #[error("{0}")]
    Custom(String),
}

/// Errors occurring while decoding a value.
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

    /// The location of the value that failed to decode.
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

impl From<decode::Error> for Error {
    fn from(err: decode::Error) -> Self {
        ErrorKind::State(err).into()
    }
}

impl de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        ErrorKind::Custom(msg.to_string()).into()
    }
}

/// Decode a value from the front of a slice.
///
/// This method is also re-exported as `sprocket::avec::decode`.
///
/// Bytes remaining after the value are ignored; see [`decode_partial`] to
/// retrieve them.
pub fn decode<'de, T: Deserialize<'de>>(r: &'de [u8], config: &Configuration) -> Result<T, Error> {
    decode_partial(r, config).map(|(value, _)| value)
}

/// Decode a value from the front of a slice, returning it with the
/// unconsumed remainder.
pub fn decode_partial<'de, T: Deserialize<'de>>(
    r: &'de [u8],
    config: &Configuration,
) -> Result<(T, &'de [u8]), Error> {
    log::trace!(
        "decoding {} from {} bytes with {config:?}",
        core::any::type_name::<T>(),
        r.len()
    );

    let mut decoder = Decoder::new(config, r);

    match T::deserialize(&mut decoder) {
        Ok(value) => {
            let rest = decoder.remaining();
            log::trace!("decoded with {} bytes remaining", rest.len());
            Ok((value, rest))
        }
        Err(err) => {
            let err = err.at(decoder.path);
            log::debug!("decoding {} failed: {err}", core::any::type_name::<T>());
            Err(err)
        }
    }
}

/// Root deserializer binding the traversal to a [`DecodeState`].
#[derive(Debug)]
pub struct Decoder<'c, 'de> {
    state: DecodeState<'c, 'de>,
    path: Path,
}

impl<'c, 'de> Decoder<'c, 'de> {
    pub fn new(config: &'c Configuration, r: &'de [u8]) -> Self {
        Self {
            state: DecodeState::new(config, r),
            path: Path::root(),
        }
    }

    pub fn state(&self) -> &DecodeState<'c, 'de> {
        &self.state
    }

    /// The bytes not yet consumed.
    pub fn remaining(&self) -> &'de [u8] {
        self.state.remaining()
    }

    /// The location of the value being decoded.
    ///
    /// After a failure, this is the location of the value that failed.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn nested<T: DeserializeSeed<'de>>(
        &mut self,
        segment: Segment,
        seed: T,
    ) -> Result<T::Value, Error> {
        self.path.push(segment);
        let value = seed.deserialize(&mut *self)?;
        self.path.pop();
        Ok(value)
    }
}

macro_rules! deserialize_integers {
    ($($method:ident => $visit:ident),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
                visitor.$visit(self.state.decode_integer()?)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for &mut Decoder<'_, 'de> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, Error> {
        Err(ErrorKind::NotSelfDescribing.into())
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_bool(self.state.decode_bool()?)
    }

    deserialize_integers! {
        deserialize_i8 => visit_i8,
        deserialize_i16 => visit_i16,
        deserialize_i32 => visit_i32,
        deserialize_i64 => visit_i64,
        deserialize_i128 => visit_i128,
        deserialize_u8 => visit_u8,
        deserialize_u16 => visit_u16,
        deserialize_u32 => visit_u32,
        deserialize_u64 => visit_u64,
        deserialize_u128 => visit_u128,
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_f32(self.state.decode_f32()?)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_f64(self.state.decode_f64()?)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_char(self.state.decode_char()?)
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.state.decode_str()? {
            Cow::Borrowed(s) => visitor.visit_borrowed_str(s),
            Cow::Owned(s) => visitor.visit_string(s),
        }
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        de::Deserializer::deserialize_str(self, visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_borrowed_bytes(self.state.decode_bytes()?)
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        de::Deserializer::deserialize_bytes(self, visitor)
    }

    // The input never records presence, so there is nothing to inspect.
    fn deserialize_option<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, Error> {
        Err(ErrorKind::OptionalTypeDisallowed.into())
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        let remaining = self.state.decode_sequence_len()?;
        visitor.visit_seq(SequenceDecoder::new(self, remaining))
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_seq(SequenceDecoder::new(self, Some(len)))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_seq(SequenceDecoder::new(self, Some(len)))
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        let remaining = self.state.decode_sequence_len()?;
        visitor.visit_map(SequenceDecoder::new(self, remaining))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_seq(KeyedDecoder {
            decoder: self,
            fields,
            index: 0,
        })
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, Error> {
        Err(ErrorKind::EnumTypeDisallowed.into())
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, Error> {
        Err(ErrorKind::NotSelfDescribing.into())
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, Error> {
        Err(ErrorKind::NotSelfDescribing.into())
    }

    fn is_human_readable(&self) -> bool {
        false
    }
}

/// Accessor for struct fields, in declaration order.
struct KeyedDecoder<'a, 'c, 'de> {
    decoder: &'a mut Decoder<'c, 'de>,
    fields: &'static [&'static str],
    index: usize,
}

impl<'de> de::SeqAccess<'de> for KeyedDecoder<'_, '_, 'de> {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, Error> {
        let Some(&field) = self.fields.get(self.index) else {
            return Ok(None);
        };

        let value = self.decoder.nested(Segment::Field(field), seed)?;
        self.index += 1;

        Ok(Some(value))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len() - self.index)
    }
}

/// Accessor for positional elements of sequences, tuples and maps.
struct SequenceDecoder<'a, 'c, 'de> {
    decoder: &'a mut Decoder<'c, 'de>,
    // `None` if the elements extend to the end of the input.
    remaining: Option<usize>,
    index: usize,
    // Input length at the start of the current element.
    start: usize,
}

impl<'a, 'c, 'de> SequenceDecoder<'a, 'c, 'de> {
    fn new(decoder: &'a mut Decoder<'c, 'de>, remaining: Option<usize>) -> Self {
        Self {
            decoder,
            remaining,
            index: 0,
            start: 0,
        }
    }

    /// Whether another element follows, consuming it from the count.
    fn advance(&mut self) -> bool {
        self.start = self.decoder.remaining().len();

        match &mut self.remaining {
            Some(0) => false,
            Some(n) => {
                *n -= 1;
                true
            }
            None => !self.decoder.state.is_exhausted(),
        }
    }

    /// Decode the last part of an element, rejecting zero-sized elements when
    /// the sequence is only bounded by the end of input.
    fn finish_element<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<T::Value, Error> {
        let value = self.decoder.nested(Segment::Index(self.index), seed)?;

        if self.remaining.is_none() && self.decoder.remaining().len() == self.start {
            self.decoder.path.push(Segment::Index(self.index));
            return Err(ErrorKind::ZeroSizedElement.into());
        }

        self.index += 1;

        Ok(value)
    }
}

impl<'de> de::SeqAccess<'de> for SequenceDecoder<'_, '_, 'de> {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, Error> {
        if !self.advance() {
            return Ok(None);
        }

        self.finish_element(seed).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        self.remaining
    }
}

// Each entry counts as one element: the key, then its value, at one index.
impl<'de> de::MapAccess<'de> for SequenceDecoder<'_, '_, 'de> {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, Error> {
        if !self.advance() {
            return Ok(None);
        }

        self.decoder.nested(Segment::Index(self.index), seed).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, Error> {
        self.finish_element(seed)
    }

    fn size_hint(&self) -> Option<usize> {
        self.remaining
    }
}
