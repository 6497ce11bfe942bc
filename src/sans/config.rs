//! Layout policies shared by both coding directions.

use crate::sans::primitive::FixedWidth;

/// Byte order of multi-byte integers and of floating-point bit patterns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Endianness {
    /// Most significant byte first (network order).
    #[default]
    Big,
    /// Least significant byte first.
    Little,
}

impl Endianness {
    /// Byte order of the compilation target.
    #[cfg(target_endian = "big")]
    pub const NATIVE: Self = Self::Big;
    /// Byte order of the compilation target.
    #[cfg(target_endian = "little")]
    pub const NATIVE: Self = Self::Little;

    /// Whether this is the byte order of the compilation target.
    pub const fn is_native(self) -> bool {
        matches!(
            (self, Self::NATIVE),
            (Self::Big, Self::Big) | (Self::Little, Self::Little)
        )
    }

    /// Convert a value between native order and this order.
    ///
    /// The conversion is its own inverse, so the same call serves encoding and
    /// decoding.
    pub fn apply<T: FixedWidth>(self, value: T) -> T {
        if self.is_native() {
            value
        } else {
            value.swap_bytes()
        }
    }
}

/// Text codec used to produce and interpret string bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StringEncoding {
    /// UTF-8, borrowed from the input on decoding.
    #[default]
    Utf8,
    /// 7-bit ASCII. Any byte above `0x7F` is rejected.
    Ascii,
    /// ISO-8859-1, mapping each byte to the code point of the same value.
    Latin1,
}

/// How the end of a string is found.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StringTypeStrategy {
    /// Strings end at a `0x00` byte, or at the end of input when
    /// [`Configuration::null_terminate_strings`] is disabled.
    #[default]
    NullTerminated,
    /// Strings are preceded by a 2-byte byte count.
    LengthTagged,
}

/// How sequences, maps and byte buffers are framed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VariableSizedTypeStrategy {
    /// Values are preceded by a 2-byte element count.
    LengthTaggedArrays,
    /// Values carry no framing and extend to the end of input, so they may
    /// only be the very last thing written.
    #[default]
    UntaggedAndAmbiguous,
}

/// Immutable policy bundle consumed by both coding directions.
///
/// Start from [`Configuration::default`] (or [`Configuration::length_tagged`])
/// and adjust with the `with_*` setters:
///
/// ```
/// let config = Configuration::default()
///     .with_endianness(Endianness::Little)
///     .with_null_terminate_strings(false);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Configuration {
    pub endianness: Endianness,
    pub string_encoding: StringEncoding,
    /// Only consulted under [`StringTypeStrategy::NullTerminated`]. When
    /// disabled, a string consumes the rest of the input and must come last.
    pub null_terminate_strings: bool,
    pub string_type_strategy: StringTypeStrategy,
    pub variable_sized_type_strategy: VariableSizedTypeStrategy,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            endianness: Endianness::Big,
            string_encoding: StringEncoding::Utf8,
            null_terminate_strings: true,
            string_type_strategy: StringTypeStrategy::NullTerminated,
            variable_sized_type_strategy: VariableSizedTypeStrategy::UntaggedAndAmbiguous,
        }
    }
}

impl Configuration {
    /// Big-endian UTF-8 with length tags on every variable-sized value.
    ///
    /// Under this preset no value is ambiguous, so fields may appear in any
    /// order.
    pub const fn length_tagged() -> Self {
        Self {
            endianness: Endianness::Big,
            string_encoding: StringEncoding::Utf8,
            null_terminate_strings: true,
            string_type_strategy: StringTypeStrategy::LengthTagged,
            variable_sized_type_strategy: VariableSizedTypeStrategy::LengthTaggedArrays,
        }
    }

    pub const fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }

    pub const fn with_string_encoding(mut self, encoding: StringEncoding) -> Self {
        self.string_encoding = encoding;
        self
    }

    pub const fn with_null_terminate_strings(mut self, enabled: bool) -> Self {
        self.null_terminate_strings = enabled;
        self
    }

    pub const fn with_string_type_strategy(mut self, strategy: StringTypeStrategy) -> Self {
        self.string_type_strategy = strategy;
        self
    }

    pub const fn with_variable_sized_type_strategy(
        mut self,
        strategy: VariableSizedTypeStrategy,
    ) -> Self {
        self.variable_sized_type_strategy = strategy;
        self
    }

    /// Whether a string runs until the end of input.
    pub(crate) const fn strings_are_unbounded(&self) -> bool {
        matches!(self.string_type_strategy, StringTypeStrategy::NullTerminated)
            && !self.null_terminate_strings
    }

    pub(crate) const fn is_ambiguous(&self) -> bool {
        matches!(
            self.variable_sized_type_strategy,
            VariableSizedTypeStrategy::UntaggedAndAmbiguous
        )
    }
}
