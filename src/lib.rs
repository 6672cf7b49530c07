pub mod dx7;

use std::fmt;

use crate::dx7::sysex::HeaderCheck;

/// Error type for validating and decoding a DX7 bulk dump.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum ParseError {
    SizeMismatch(usize, usize),  // actual, expected
    MalformedHeader(HeaderCheck),
    ChecksumMismatch(u8, u8),  // stored, expected
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::SizeMismatch(actual, expected) =>
                write!(f, "Got {} bytes of data, expected {} bytes.", actual, expected),
            ParseError::MalformedHeader(check) =>
                write!(f, "{}", check),
            ParseError::ChecksumMismatch(stored, expected) =>
                write!(f, "Checksum failed: found 0x{:02X}, should have been 0x{:02X}.", stored, expected),
        }
    }
}

impl std::error::Error for ParseError {}

// Associated consts in a trait without values,
// so that each implementor supplies its own range.
pub trait Ranged: Sized {
    const FIRST: u8;
    const LAST: u8;

    fn value(&self) -> u8;

    fn contains(value: u8) -> bool {
        value >= Self::FIRST && value <= Self::LAST
    }
}

// The `ranged_impl` macro generates an implementation of the `Ranged` trait
// for a newtype over `u8`, along with a checked `TryFrom<u8>` conversion
// (type name, first, last).
#[macro_export]
macro_rules! ranged_impl {
    ($typ:ident, $first:expr, $last:expr) => {
        impl $crate::Ranged for $typ {
            const FIRST: u8 = $first;
            const LAST: u8 = $last;

            fn value(&self) -> u8 { self.0 }
        }

        impl ::std::convert::TryFrom<u8> for $typ {
            type Error = &'static str;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                if <$typ as $crate::Ranged>::contains(value) {
                    Ok($typ(value))
                }
                else {
                    Err(concat!("value out of range for ", stringify!($typ)))
                }
            }
        }
    }
}
