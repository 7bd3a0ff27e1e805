//! This module contains all DICOM data element header decoding logic.

use byteordered::{ByteOrdered, Endianness};
use dcmpix_core::header::DataElementHeader;
use dcmpix_core::Tag;
use snafu::{Backtrace, Snafu};
use std::io::{self, Read};

pub mod basic;
pub mod explicit_be;
pub mod explicit_le;
pub mod implicit_le;

/// Module-level error type:
/// for errors which may occur while decoding element headers.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// Failed to read the tag which starts an element header.
    /// This is the usual way in which the end of a data set manifests.
    #[snafu(display("Failed to read the header's tag field: {}", source))]
    ReadHeaderTag {
        backtrace: Backtrace,
        source: io::Error,
    },
    /// Failed to read a standalone tag.
    #[snafu(display("Failed to read the tag: {}", source))]
    ReadTag {
        backtrace: Backtrace,
        source: io::Error,
    },
    /// Failed to read the two value representation bytes.
    #[snafu(display("Failed to read the header's value representation: {}", source))]
    ReadVr {
        backtrace: Backtrace,
        source: io::Error,
    },
    /// Failed to read the two reserved bytes of a long form header.
    #[snafu(display("Failed to read the header's reserved bytes: {}", source))]
    ReadReserved {
        backtrace: Backtrace,
        source: io::Error,
    },
    /// Failed to read the header's length field.
    #[snafu(display("Failed to read the header's element length field: {}", source))]
    ReadLength {
        backtrace: Backtrace,
        source: io::Error,
    },
    /// The two value representation bytes match none of the
    /// recognized codes, so the element cannot be framed.
    #[snafu(display("Unknown VR found: {:#04X} {:#04X}", bytes[0], bytes[1]))]
    UnknownVr {
        bytes: [u8; 2],
        backtrace: Backtrace,
    },
}

impl Error {
    /// Whether this error stems from a failed or short read on the byte
    /// source rather than from malformed content. Reaching the end of
    /// the stream while reading a header is reported this way.
    pub fn is_stream_interruption(&self) -> bool {
        matches!(
            self,
            Error::ReadHeaderTag { .. }
                | Error::ReadTag { .. }
                | Error::ReadVr { .. }
                | Error::ReadReserved { .. }
                | Error::ReadLength { .. }
        )
    }
}

/// Decoding result type.
pub type Result<T> = std::result::Result<T, Error>;

/** Type trait for reading and decoding basic data values from a data source.
 *
 * An implementation only states the byte order it decodes in; every read
 * is provided on top of that, going through [`ByteOrdered`] so that the
 * right conversion is applied no matter the host architecture. Reads of
 * floating point numbers reverse the raw bytes of the value where needed,
 * never converting through an integer of the same width.
 *
 * [`ByteOrdered`]: ../../byteordered/struct.ByteOrdered.html
 */
pub trait BasicDecode {
    /// Retrieve the source's endianness, as expected by this decoder.
    fn endianness(&self) -> Endianness;

    /// Decode an unsigned short value from the given source.
    fn decode_us<S>(&self, source: S) -> io::Result<u16>
    where
        S: Read,
    {
        ByteOrdered::runtime(source, self.endianness()).read_u16()
    }

    /// Decode a sequence of unsigned short values from the given source.
    fn decode_us_into<S>(&self, source: S, target: &mut [u16]) -> io::Result<()>
    where
        S: Read,
    {
        ByteOrdered::runtime(source, self.endianness()).read_u16_into(target)
    }

    /// Decode an unsigned long value from the given source.
    fn decode_ul<S>(&self, source: S) -> io::Result<u32>
    where
        S: Read,
    {
        ByteOrdered::runtime(source, self.endianness()).read_u32()
    }

    /// Decode a sequence of unsigned long values from the given source.
    fn decode_ul_into<S>(&self, source: S, target: &mut [u32]) -> io::Result<()>
    where
        S: Read,
    {
        ByteOrdered::runtime(source, self.endianness()).read_u32_into(target)
    }

    /// Decode a signed short value from the given source.
    fn decode_ss<S>(&self, source: S) -> io::Result<i16>
    where
        S: Read,
    {
        ByteOrdered::runtime(source, self.endianness()).read_i16()
    }

    /// Decode a sequence of signed short values from the given source.
    fn decode_ss_into<S>(&self, source: S, target: &mut [i16]) -> io::Result<()>
    where
        S: Read,
    {
        ByteOrdered::runtime(source, self.endianness()).read_i16_into(target)
    }

    /// Decode a signed long value from the given source.
    fn decode_sl<S>(&self, source: S) -> io::Result<i32>
    where
        S: Read,
    {
        ByteOrdered::runtime(source, self.endianness()).read_i32()
    }

    /// Decode a sequence of signed long values from the given source.
    fn decode_sl_into<S>(&self, source: S, target: &mut [i32]) -> io::Result<()>
    where
        S: Read,
    {
        ByteOrdered::runtime(source, self.endianness()).read_i32_into(target)
    }

    /// Decode a single precision float value from the given source.
    fn decode_fl<S>(&self, source: S) -> io::Result<f32>
    where
        S: Read,
    {
        ByteOrdered::runtime(source, self.endianness()).read_f32()
    }

    /// Decode a sequence of single precision float values from the given source.
    fn decode_fl_into<S>(&self, source: S, target: &mut [f32]) -> io::Result<()>
    where
        S: Read,
    {
        ByteOrdered::runtime(source, self.endianness()).read_f32_into(target)
    }

    /// Decode a double precision float value from the given source.
    fn decode_fd<S>(&self, source: S) -> io::Result<f64>
    where
        S: Read,
    {
        ByteOrdered::runtime(source, self.endianness()).read_f64()
    }

    /// Decode a sequence of double precision float values from the given source.
    fn decode_fd_into<S>(&self, source: S, target: &mut [f64]) -> io::Result<()>
    where
        S: Read,
    {
        ByteOrdered::runtime(source, self.endianness()).read_f64_into(target)
    }

    /// Decode a DICOM attribute tag from the given source.
    /// The group and element parts are swapped independently.
    fn decode_tag<S>(&self, mut source: S) -> io::Result<Tag>
    where
        S: Read,
    {
        let g = self.decode_us(&mut source)?;
        let e = self.decode_us(source)?;
        Ok(Tag(g, e))
    }
}

/** Type trait for decoding data element headers.
 *
 * The decoder knows the transfer syntax specifics (byte order,
 * explicit or implicit VR), but is otherwise stateless: value payload
 * reading is the caller's responsibility.
 */
pub trait Decode {
    /// Fetch and decode the next data element header from the given source.
    /// The value is not decoded, under the assumption that the caller will
    /// fetch or skip it manually.
    ///
    /// Returns the header and the exact number of bytes read from the source.
    fn decode_header<S>(&self, source: &mut S) -> Result<(DataElementHeader, usize)>
    where
        S: ?Sized + Read;

    /// Fetch and decode the next data element tag from the given source,
    /// without reading the rest of the header.
    fn decode_tag<S>(&self, source: &mut S) -> Result<Tag>
    where
        S: ?Sized + Read;
}

/** Type trait for decoding data element headers from a specific source
 * reader type. Unlike `Decode`, this trait is object safe,
 * which enables choosing the decoder from the transfer syntax at run-time.
 */
pub trait DecodeFrom<S: ?Sized + Read> {
    /// Fetch and decode the next data element header from the given source.
    ///
    /// Returns the header and the exact number of bytes read from the source.
    fn decode_header(&self, source: &mut S) -> Result<(DataElementHeader, usize)>;

    /// Fetch and decode the next data element tag from the given source.
    fn decode_tag(&self, source: &mut S) -> Result<Tag>;
}

impl<T: ?Sized, S: ?Sized> DecodeFrom<S> for Box<T>
where
    T: DecodeFrom<S>,
    S: Read,
{
    fn decode_header(&self, source: &mut S) -> Result<(DataElementHeader, usize)> {
        (**self).decode_header(source)
    }

    fn decode_tag(&self, source: &mut S) -> Result<Tag> {
        (**self).decode_tag(source)
    }
}

/** Obtain a data element decoder for reading the data elements in a DICOM
 * file's meta information group. According to the standard, these are always
 * encoded in Explicit VR Little Endian.
 */
pub fn file_header_decoder() -> explicit_le::ExplicitVRLittleEndianDecoder {
    explicit_le::ExplicitVRLittleEndianDecoder::default()
}
