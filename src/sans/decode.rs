//! State consuming primitive values from the front of an input slice.

use alloc::{borrow::Cow, vec::Vec};

use thiserror::Error;

use super::{
    config::{Configuration, StringTypeStrategy, VariableSizedTypeStrategy},
    primitive::FixedWidth,
};

/// An error decoding a primitive value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// Fewer bytes remain than the value requires.
    #[error("Unexpectedly reached the end of the input.")]
    EndOfInputTooEarly,
    /// String bytes are not valid under the configured encoding.
    #[error("String bytes {0:02x?} are not valid under the configured encoding.")]
    StringNotDecodable(Vec<u8>),
    /// A decoded `u32` is not a Unicode scalar value.
    #[error("Value {0:#x} is not a Unicode scalar value.")]
    CharNotDecodable(u32),
}

/// The remaining input of a single decode call.
///
/// Every read removes bytes from the front; there is no backtracking.
#[derive(Debug)]
pub struct DecodeState<'c, 'de> {
    config: &'c Configuration,
    input: &'de [u8],
}

impl<'c, 'de> DecodeState<'c, 'de> {
    pub fn new(config: &'c Configuration, input: &'de [u8]) -> Self {
        Self { config, input }
    }

    pub fn config(&self) -> &'c Configuration {
        self.config
    }

    /// The bytes not yet consumed.
    pub fn remaining(&self) -> &'de [u8] {
        self.input
    }

    pub fn is_exhausted(&self) -> bool {
        self.input.is_empty()
    }

    /// Always `false`: absence has no representation in this format.
    ///
    /// Never use this to detect a missing value.
    pub fn decode_nil(&self) -> bool {
        false
    }

    pub fn decode_bool(&mut self) -> Result<bool, Error> {
        Ok(self.take(1)?[0] != 0)
    }

    /// Decode an integer of exactly `size_of::<T>()` bytes.
    pub fn decode_integer<T: FixedWidth>(&mut self) -> Result<T, Error> {
        let (raw, rest) = T::read_from_prefix(self.input).map_err(|_| Error::EndOfInputTooEarly)?;
        self.input = rest;

        Ok(self.config.endianness.apply(raw))
    }

    pub fn decode_f32(&mut self) -> Result<f32, Error> {
        Ok(f32::from_bits(self.decode_integer()?))
    }

    pub fn decode_f64(&mut self) -> Result<f64, Error> {
        Ok(f64::from_bits(self.decode_integer()?))
    }

    pub fn decode_char(&mut self) -> Result<char, Error> {
        let scalar = self.decode_integer()?;
        char::from_u32(scalar).ok_or(Error::CharNotDecodable(scalar))
    }

    /// Decode a string framed according to the string strategy.
    ///
    /// The result borrows from the input unless the configured encoding
    /// requires a conversion.
    pub fn decode_str(&mut self) -> Result<Cow<'de, str>, Error> {
        let r = match self.config.string_type_strategy {
            StringTypeStrategy::LengthTagged => {
                let len = self.decode_length()?;
                self.take(len)?
            }
            StringTypeStrategy::NullTerminated if self.config.strings_are_unbounded() => {
                self.take_rest()
            }
            StringTypeStrategy::NullTerminated => {
                let end = self
                    .input
                    .iter()
                    .position(|&b| b == 0)
                    .ok_or(Error::EndOfInputTooEarly)?;
                let r = self.take(end)?;
                self.take(1)?;
                r
            }
        };

        self.config
            .string_encoding
            .decode(r)
            .ok_or_else(|| Error::StringNotDecodable(r.to_vec()))
    }

    /// Decode a byte buffer framed according to the variable-sized strategy.
    pub fn decode_bytes(&mut self) -> Result<&'de [u8], Error> {
        match self.decode_sequence_len()? {
            Some(len) => self.take(len),
            None => Ok(self.take_rest()),
        }
    }

    /// Decode the framing of a sequence.
    ///
    /// Returns the element count if the sequence is length-tagged, or `None`
    /// if it extends to the end of the input.
    pub fn decode_sequence_len(&mut self) -> Result<Option<usize>, Error> {
        match self.config.variable_sized_type_strategy {
            VariableSizedTypeStrategy::LengthTaggedArrays => self.decode_length().map(Some),
            VariableSizedTypeStrategy::UntaggedAndAmbiguous => Ok(None),
        }
    }

    /// Take an exact number of bytes from the front of the input.
    pub fn take(&mut self, n: usize) -> Result<&'de [u8], Error> {
        if self.input.len() < n {
            return Err(Error::EndOfInputTooEarly);
        }

        let (r, rest) = self.input.split_at(n);
        self.input = rest;

        Ok(r)
    }

    fn take_rest(&mut self) -> &'de [u8] {
        core::mem::take(&mut self.input)
    }

    fn decode_length(&mut self) -> Result<usize, Error> {
        Ok(usize::from(self.decode_integer::<u16>()?))
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
        let mut state = DecodeState::new(&big, &[0, 0, 0, 4, 0xff, 0xfe]);
        assert_eq!(state.decode_integer::<u32>(), Ok(4));
        assert_eq!(state.decode_integer::<i16>(), Ok(-2));
        assert!(state.is_exhausted());

        let little = Configuration::default().with_endianness(Endianness::Little);
        let mut state = DecodeState::new(&little, &[4, 0, 0, 0]);
        assert_eq!(state.decode_integer::<u32>(), Ok(4));
    }

    #[test]
    fn short_integer_leaves_input_untouched() {
        let config = Configuration::default();
        let mut state = DecodeState::new(&config, &[1, 2, 3]);
        assert_eq!(state.decode_integer::<u32>(), Err(Error::EndOfInputTooEarly));
        assert_eq!(state.remaining(), &[1, 2, 3]);
    }

    #[test]
    fn bools_and_nil() {
        let config = Configuration::default();
        let mut state = DecodeState::new(&config, &[0, 7]);
        assert!(!state.decode_nil());
        assert_eq!(state.decode_bool(), Ok(false));
        assert_eq!(state.decode_bool(), Ok(true));
        assert_eq!(state.decode_bool(), Err(Error::EndOfInputTooEarly));
    }

    #[test]
    fn floats_are_bit_patterns() {
        let config = Configuration::default();
        let mut state = DecodeState::new(&config, &[0x3f, 0x80, 0, 0]);
        assert_eq!(state.decode_f32(), Ok(1.0));

        let mut state = DecodeState::new(&config, &[0x40, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(state.decode_f64(), Ok(2.0));
    }

    #[test]
    fn terminated_strings() {
        let config = Configuration::default();
        let mut state = DecodeState::new(&config, b"ab\0c\0");
        assert_eq!(state.decode_str().as_deref(), Ok("ab"));
        assert_eq!(state.decode_str().as_deref(), Ok("c"));

        let mut state = DecodeState::new(&config, b"abc");
        assert_eq!(state.decode_str(), Err(Error::EndOfInputTooEarly));

        let mut state = DecodeState::new(&config, &[0xff, 0]);
        assert_eq!(state.decode_str(), Err(Error::StringNotDecodable(vec![0xff])));
    }

    #[test]
    fn unterminated_string_takes_everything() {
        let config = Configuration::default().with_null_terminate_strings(false);
        let mut state = DecodeState::new(&config, b"ab\0c");
        assert_eq!(state.decode_str().as_deref(), Ok("ab\0c"));
        assert!(state.is_exhausted());
    }

    #[test]
    fn latin1_strings_are_converted() {
        let config = Configuration::default().with_string_encoding(StringEncoding::Latin1);
        let mut state = DecodeState::new(&config, &[b'c', 0xe9, 0]);
        assert_eq!(state.decode_str().as_deref(), Ok("c\u{e9}"));

        let config = Configuration::default().with_string_encoding(StringEncoding::Ascii);
        let mut state = DecodeState::new(&config, &[b'c', 0xe9, 0]);
        assert_eq!(state.decode_str(), Err(Error::StringNotDecodable(vec![b'c', 0xe9])));
    }

    #[test]
    fn length_tagged_values() {
        let config = Configuration::length_tagged();
        let mut state = DecodeState::new(&config, &[0, 2, b'h', b'i', 0, 3, 1, 2, 3, 9]);
        assert_eq!(state.decode_str().as_deref(), Ok("hi"));
        assert_eq!(state.decode_bytes(), Ok(&[1, 2, 3][..]));
        assert_eq!(state.remaining(), &[9]);

        let mut state = DecodeState::new(&config, &[0, 4, 1]);
        assert_eq!(state.decode_bytes(), Err(Error::EndOfInputTooEarly));
    }

    #[test]
    fn invalid_chars() {
        let config = Configuration::default();
        let mut state = DecodeState::new(&config, &[0, 0, 0, b'a', 0, 0, 0xd8, 0]);
        assert_eq!(state.decode_char(), Ok('a'));
        assert_eq!(state.decode_char(), Err(Error::CharNotDecodable(0xd800)));
    }
}
