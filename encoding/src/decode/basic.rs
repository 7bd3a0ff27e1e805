//! This module provides the decoders of primitive data values.
//!
//! All of the reading logic is provided by the [`BasicDecode`] trait;
//! the types defined here only carry the byte order to decode in.
//! The fixed-endianness decoders are zero sized, for composition into a
//! concrete header decoder, while [`BasicDecoder`] holds its byte order
//! as a value, for when the transfer syntax is only known at run time.
//!
//! [`BasicDecode`]: ../trait.BasicDecode.html
//! [`BasicDecoder`]: struct.BasicDecoder.html

use super::BasicDecode;
use byteordered::Endianness;

/// A basic decoder of DICOM primitive values in little endian.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub struct LittleEndianBasicDecoder;

impl BasicDecode for LittleEndianBasicDecoder {
    fn endianness(&self) -> Endianness {
        Endianness::Little
    }
}

/// A basic decoder of DICOM primitive values in big endian.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub struct BigEndianBasicDecoder;

impl BasicDecode for BigEndianBasicDecoder {
    fn endianness(&self) -> Endianness {
        Endianness::Big
    }
}

/// A basic decoder with its byte order decided at run time,
/// as dictated by a transfer syntax.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub struct BasicDecoder(Endianness);

impl BasicDecoder {
    /// Create a basic decoder for the given byte order.
    pub fn new(endianness: Endianness) -> Self {
        BasicDecoder(endianness)
    }
}

impl From<Endianness> for BasicDecoder {
    fn from(endianness: Endianness) -> Self {
        BasicDecoder::new(endianness)
    }
}

impl BasicDecode for BasicDecoder {
    fn endianness(&self) -> Endianness {
        self.0
    }
}
