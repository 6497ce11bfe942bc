//! State appending primitive values to a growing output buffer.

use alloc::{string::String, vec::Vec};

use thiserror::Error;
use zerocopy::IntoBytes;

use super::{
    config::{Configuration, StringTypeStrategy, VariableSizedTypeStrategy},
    primitive::FixedWidth,
};

/// An error encoding a primitive value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// A value follows one whose extent is only known by reaching the end of
    /// the input.
    #[error("Found a value after an untagged variable-sized value.")]
    ValueAfterVariableSizedTypeDisallowed,
    /// A length-tagged value has more items than its 2-byte tag can count.
    #[error("Variable-sized value of length {len} does not fit a 2-byte length tag.")]
    VariableSizedTypeTooBig { len: usize },
    /// A string contains characters outside the configured encoding.
    #[error("String {0:?} is not representable in the configured encoding.")]
    StringNotEncodable(String),
    /// A null-terminated string contains the terminator itself.
    #[error("Null-terminated string contains a null byte.")]
    StringContainsTerminator,
}

/// Framing of a sequence in progress, returned by
/// [`EncodeState::begin_sequence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// Element count known to both sides (tuples, arrays); no framing.
    Fixed,
    /// A 2-byte count at this output offset, written when the sequence ends.
    Tagged { at: usize },
    /// No framing; the sequence extends to the end of the output.
    Untagged,
}

/// The accumulated output of a single encode call.
#[derive(Debug)]
pub struct EncodeState<'c> {
    config: &'c Configuration,
    output: Vec<u8>,
    // Set once an untagged variable-sized value has been written; from then on
    // no further bytes may be written anywhere.
    has_written_unbounded_value: bool,
}

impl<'c> EncodeState<'c> {
    pub fn new(config: &'c Configuration) -> Self {
        Self {
            config,
            output: Vec::new(),
            has_written_unbounded_value: false,
        }
    }

    pub fn config(&self) -> &'c Configuration {
        self.config
    }

    /// The bytes written so far.
    pub fn bytes(&self) -> &[u8] {
        &self.output
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.output
    }

    pub fn has_written_unbounded_value(&self) -> bool {
        self.has_written_unbounded_value
    }

    /// Write nothing.
    ///
    /// Used for zero-sized values. Never route a possibly-absent value here:
    /// the reader cannot tell it was skipped.
    pub fn encode_nil(&mut self) {}

    pub fn encode_bool(&mut self, value: bool) -> Result<(), Error> {
        self.encode_integer(u8::from(value))
    }

    /// Encode an integer as exactly `size_of::<T>()` bytes.
    pub fn encode_integer<T: FixedWidth>(&mut self, value: T) -> Result<(), Error> {
        self.check_bounded()?;
        self.put(value);
        Ok(())
    }

    pub fn encode_f32(&mut self, value: f32) -> Result<(), Error> {
        self.encode_integer(value.to_bits())
    }

    pub fn encode_f64(&mut self, value: f64) -> Result<(), Error> {
        self.encode_integer(value.to_bits())
    }

    pub fn encode_char(&mut self, value: char) -> Result<(), Error> {
        self.encode_integer(u32::from(value))
    }

    /// Encode a string framed according to the string strategy.
    pub fn encode_str(&mut self, value: &str) -> Result<(), Error> {
        self.check_bounded()?;

        let r = self
            .config
            .string_encoding
            .encode(value)
            .ok_or_else(|| Error::StringNotEncodable(value.into()))?;

        match self.config.string_type_strategy {
            StringTypeStrategy::LengthTagged => {
                self.put_length(r.len())?;
                self.output.extend_from_slice(&r);
            }
            StringTypeStrategy::NullTerminated if self.config.strings_are_unbounded() => {
                self.output.extend_from_slice(&r);
                if self.config.is_ambiguous() {
                    self.mark_unbounded();
                }
            }
            StringTypeStrategy::NullTerminated => {
                if r.contains(&0) {
                    return Err(Error::StringContainsTerminator);
                }
                self.output.extend_from_slice(&r);
                self.output.push(0);
            }
        }

        Ok(())
    }

    /// Encode a byte buffer framed according to the variable-sized strategy.
    pub fn encode_bytes(&mut self, value: &[u8]) -> Result<(), Error> {
        self.check_bounded()?;

        match self.config.variable_sized_type_strategy {
            VariableSizedTypeStrategy::LengthTaggedArrays => {
                self.put_length(value.len())?;
                self.output.extend_from_slice(value);
            }
            VariableSizedTypeStrategy::UntaggedAndAmbiguous => {
                self.output.extend_from_slice(value);
                self.mark_unbounded();
            }
        }

        Ok(())
    }

    /// Open a sequence of variable length.
    ///
    /// When `len` is unknown and the sequence is length-tagged, a placeholder
    /// tag is written and patched by [`EncodeState::end_sequence`].
    pub fn begin_sequence(&mut self, len: Option<usize>) -> Result<Frame, Error> {
        self.check_bounded()?;

        match self.config.variable_sized_type_strategy {
            VariableSizedTypeStrategy::LengthTaggedArrays => {
                let at = self.output.len();
                self.put_length(len.unwrap_or(0))?;
                Ok(Frame::Tagged { at })
            }
            VariableSizedTypeStrategy::UntaggedAndAmbiguous => Ok(Frame::Untagged),
        }
    }

    /// Close a sequence after `count` elements were encoded.
    pub fn end_sequence(&mut self, frame: Frame, count: usize) -> Result<(), Error> {
        match frame {
            Frame::Fixed => {}
            Frame::Tagged { at } => {
                let tag = u16::try_from(count)
                    .map_err(|_| Error::VariableSizedTypeTooBig { len: count })?;
                let tag = self.config.endianness.apply(tag);
                self.output[at..at + size_of::<u16>()].copy_from_slice(tag.as_bytes());
            }
            Frame::Untagged => self.mark_unbounded(),
        }

        Ok(())
    }

    fn check_bounded(&self) -> Result<(), Error> {
        if self.has_written_unbounded_value && self.config.is_ambiguous() {
            Err(Error::ValueAfterVariableSizedTypeDisallowed)
        } else {
            Ok(())
        }
    }

    fn mark_unbounded(&mut self) {
        if !self.has_written_unbounded_value {
            log::trace!("untagged variable-sized value ends at byte {}", self.output.len());
        }
        self.has_written_unbounded_value = true;
    }

    fn put<T: FixedWidth>(&mut self, value: T) {
        let value = self.config.endianness.apply(value);
        self.output.extend_from_slice(value.as_bytes());
    }

    fn put_length(&mut self, len: usize) -> Result<(), Error> {
        let tag = u16::try_from(len).map_err(|_| Error::VariableSizedTypeTooBig { len })?;
        self.put(tag);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::sans::config::{Endianness, StringEncoding};

    #[test]
    fn integers_follow_endianness() {
        let big = Configuration::default();
        let mut state = EncodeState::new(&big);
        state.encode_integer(4u32).unwrap();
        state.encode_integer(-2i16).unwrap();
        assert_eq!(state.into_bytes(), [0, 0, 0, 4, 0xff, 0xfe]);

        let little = Configuration::default().with_endianness(Endianness::Little);
        let mut state = EncodeState::new(&little);
        state.encode_integer(4u32).unwrap();
        state.encode_f32(1.0).unwrap();
        assert_eq!(state.into_bytes(), [4, 0, 0, 0, 0, 0, 0x80, 0x3f]);
    }

    #[test]
    fn nil_writes_nothing() {
        let config = Configuration::default();
        let mut state = EncodeState::new(&config);
        state.encode_nil();
        state.encode_bool(true).unwrap();
        state.encode_nil();
        assert_eq!(state.bytes(), [1]);
    }

    #[test]
    fn terminated_strings() {
        let config = Configuration::default();
        let mut state = EncodeState::new(&config);
        state.encode_str("abc").unwrap();
        state.encode_str("").unwrap();
        assert_eq!(state.bytes(), [97, 98, 99, 0, 0]);
        assert!(!state.has_written_unbounded_value());

        assert_eq!(state.encode_str("a\0b"), Err(Error::StringContainsTerminator));
    }

    #[test]
    fn unterminated_string_must_come_last() {
        let config = Configuration::default().with_null_terminate_strings(false);
        let mut state = EncodeState::new(&config);
        state.encode_str("abc").unwrap();
        assert_eq!(state.bytes(), [97, 98, 99]);
        assert!(state.has_written_unbounded_value());
        assert_eq!(state.encode_bool(false), Err(Error::ValueAfterVariableSizedTypeDisallowed));
    }

    #[test]
    fn unterminated_string_is_unchecked_when_arrays_are_tagged() {
        let config = Configuration::default()
            .with_null_terminate_strings(false)
            .with_variable_sized_type_strategy(VariableSizedTypeStrategy::LengthTaggedArrays);
        let mut state = EncodeState::new(&config);
        state.encode_str("abc").unwrap();
        state.encode_bool(false).unwrap();
        assert_eq!(state.bytes(), [97, 98, 99, 0]);
    }

    #[test]
    fn strings_outside_encoding() {
        let config = Configuration::default().with_string_encoding(StringEncoding::Latin1);
        let mut state = EncodeState::new(&config);
        state.encode_str("c\u{e9}").unwrap();
        assert_eq!(state.bytes(), [b'c', 0xe9, 0]);
        assert_eq!(
            state.encode_str("\u{20ac}"),
            Err(Error::StringNotEncodable("\u{20ac}".into()))
        );
    }

    #[test]
    fn length_tags_are_patched() {
        let config = Configuration::length_tagged();
        let mut state = EncodeState::new(&config);
        let frame = state.begin_sequence(None).unwrap();
        assert_eq!(frame, Frame::Tagged { at: 0 });
        state.encode_integer(7u8).unwrap();
        state.encode_integer(8u8).unwrap();
        state.end_sequence(frame, 2).unwrap();
        state.encode_integer(9u8).unwrap();
        assert_eq!(state.into_bytes(), [0, 2, 7, 8, 9]);
    }

    #[test]
    fn oversized_values() {
        let config = Configuration::length_tagged();
        let mut state = EncodeState::new(&config);
        let big = vec![1u8; 65536];
        assert_eq!(
            state.encode_bytes(&big),
            Err(Error::VariableSizedTypeTooBig { len: 65536 })
        );
        assert_eq!(
            state.begin_sequence(Some(70000)),
            Err(Error::VariableSizedTypeTooBig { len: 70000 })
        );
        state.encode_bytes(&big[..65535]).unwrap();
        assert_eq!(state.bytes().len(), 65537);
    }

    #[test]
    fn untagged_sequences_end_the_output() {
        let config = Configuration::default();
        let mut state = EncodeState::new(&config);
        let frame = state.begin_sequence(Some(0)).unwrap();
        state.end_sequence(frame, 0).unwrap();
        assert!(state.has_written_unbounded_value());
        assert_eq!(
            state.begin_sequence(Some(0)),
            Err(Error::ValueAfterVariableSizedTypeDisallowed)
        );
    }
}
