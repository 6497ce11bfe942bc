//! Fixed-width integers and text codecs.

use alloc::{borrow::Cow, string::String, vec::Vec};

use zerocopy::{FromBytes, Immutable, IntoBytes};

use super::config::StringEncoding;

/// An integer occupying exactly `size_of::<Self>()` bytes on the wire.
///
/// Floating-point values travel as the [`FixedWidth`] integer of the same
/// width holding their IEEE-754 bit pattern.
pub trait FixedWidth: FromBytes + IntoBytes + Immutable + Copy {
    /// Reverse the byte order of the value.
    fn swap_bytes(self) -> Self;
}

macro_rules! fixed_width {
    ($($t:ident),*) => {
        $(
            impl FixedWidth for $t {
                fn swap_bytes(self) -> Self {
                    $t::swap_bytes(self)
                }
            }
        )*
    };
}

fixed_width!(u8, u16, u32, u64, u128);
fixed_width!(i8, i16, i32, i64, i128);

impl StringEncoding {
    /// Produce the bytes of a string, if every character is representable.
    pub fn encode(self, s: &str) -> Option<Cow<'_, [u8]>> {
        if s.is_ascii() {
            return Some(Cow::Borrowed(s.as_bytes()));
        }

        match self {
            Self::Utf8 => Some(Cow::Borrowed(s.as_bytes())),
            Self::Ascii => None,
            Self::Latin1 => s
                .chars()
                .map(|c| u8::try_from(u32::from(c)).ok())
                .collect::<Option<Vec<u8>>>()
                .map(Cow::Owned),
        }
    }

    /// Interpret bytes as a string, borrowing from the input where possible.
    pub fn decode(self, r: &[u8]) -> Option<Cow<'_, str>> {
        match self {
            Self::Utf8 => core::str::from_utf8(r).ok().map(Cow::Borrowed),
            // ASCII is a subset of UTF-8, so both remaining codecs can borrow it.
            Self::Ascii | Self::Latin1 if r.is_ascii() => {
                core::str::from_utf8(r).ok().map(Cow::Borrowed)
            }
            Self::Ascii => None,
            Self::Latin1 => Some(Cow::Owned(r.iter().map(|&b| char::from(b)).collect::<String>())),
        }
    }
}
