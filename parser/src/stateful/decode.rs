//! Module holding a stateful DICOM data decoding abstraction.
//!
//! The decoder wraps a byte source and an element header decoder for the
//! active transfer syntax. It reads one element at a time: first the
//! header, then the value, dispatched on the value representation so that
//! the output is already in its final in-memory type and byte order.

use dcmpix_core::header::DataElementHeader;
use dcmpix_core::value::{PrimitiveValue, C};
use dcmpix_core::{Tag, VR};
use dcmpix_encoding::decode::basic::{BasicDecoder, LittleEndianBasicDecoder};
use dcmpix_encoding::decode::explicit_le::ExplicitVRLittleEndianDecoder;
use dcmpix_encoding::decode::{BasicDecode, DecodeFrom};
use smallvec::smallvec;
use snafu::{Backtrace, ResultExt, Snafu};
use std::io::{Read, Seek, SeekFrom};

/// The module-level error type:
/// for failures occurring while reading element headers and values.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// Could not decode the data element header.
    #[snafu(display("Could not decode element header at position {}", position))]
    DecodeElementHeader {
        position: u64,
        #[snafu(backtrace)]
        source: dcmpix_encoding::decode::Error,
    },

    /// Could not read the data element value.
    #[snafu(display("Could not read value from source at position {}", position))]
    ReadValueData {
        position: u64,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// Could not reposition the byte source.
    #[snafu(display(
        "Could not move source cursor from position {} to {}",
        position,
        new_position
    ))]
    SeekReader {
        position: u64,
        new_position: u64,
        source: std::io::Error,
        backtrace: Backtrace,
    },
}

impl Error {
    /// Whether this error stems from a failed or short read on the byte
    /// source, as opposed to malformed element content. The end of the
    /// stream manifests this way, so a data set reading loop uses this
    /// predicate to finish cleanly.
    pub fn is_stream_interruption(&self) -> bool {
        match self {
            Error::DecodeElementHeader { source, .. } => source.is_stream_interruption(),
            Error::ReadValueData { .. } => true,
            Error::SeekReader { .. } => true,
        }
    }
}

/// Decoding result type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The sequence delimitation item with zero length, which terminates
/// a value of undefined length.
const SEQUENCE_DELIMITER: [u8; 8] = [0xFF, 0xFE, 0xE0, 0xDD, 0x00, 0x00, 0x00, 0x00];

/// An item tag at the very beginning of an undefined length value,
/// which is stripped from the retained data.
const ITEM_TAG_PREFIX: [u8; 4] = [0xFE, 0xFF, 0xE0, 0x00];

/// A stateful abstraction for the data element reading process.
/// `S` is the type of the byte source,
/// `D` is the header decoder for the active transfer syntax,
/// and `BD` is the basic decoder for the syntax' byte order.
#[derive(Debug)]
pub struct StatefulDecoder<D, S, BD = BasicDecoder> {
    from: S,
    decoder: D,
    basic: BD,
    /// the assumed position of the reader source
    position: u64,
}

/// Type alias for the stateful decoder of a file's meta group,
/// which is always read in Explicit VR Little Endian.
pub type FileHeaderDecoder<S> =
    StatefulDecoder<ExplicitVRLittleEndianDecoder, S, LittleEndianBasicDecoder>;

impl<S> FileHeaderDecoder<S>
where
    S: Read,
{
    /// Create a stateful decoder for reading the file meta group,
    /// assuming the given base position of the byte source.
    pub fn file_header_decoder(from: S, position: u64) -> Self {
        StatefulDecoder {
            from,
            decoder: dcmpix_encoding::decode::file_header_decoder(),
            basic: LittleEndianBasicDecoder,
            position,
        }
    }
}

impl<D, S, BD> StatefulDecoder<D, S, BD> {
    /// Create a new stateful decoder from its parts.
    #[inline]
    pub fn new(from: S, decoder: D, basic: BD) -> Self {
        Self::new_with_position(from, decoder, basic, 0)
    }

    /// Create a new stateful decoder from its parts,
    /// while assuming a base reading position.
    ///
    /// `position` should be calculated with care:
    /// decoding errors may be misreported
    /// if it does not match the real position of the reader.
    #[inline]
    pub fn new_with_position(from: S, decoder: D, basic: BD, position: u64) -> Self {
        StatefulDecoder {
            from,
            decoder,
            basic,
            position,
        }
    }

    /// Retrieve the known position of the inner reader source.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Recover the byte source, discarding the decoder state.
    /// Use this to resume reading under another transfer syntax.
    pub fn into_parts(self) -> (S, u64) {
        (self.from, self.position)
    }
}

impl<D, S, BD> StatefulDecoder<D, S, BD>
where
    D: DecodeFrom<S>,
    S: Read,
    BD: BasicDecode,
{
    /// Decode the next data element header.
    pub fn decode_header(&mut self) -> Result<DataElementHeader> {
        let (header, bytes_read) = self
            .decoder
            .decode_header(&mut self.from)
            .context(DecodeElementHeaderSnafu {
                position: self.position,
            })?;
        self.position += bytes_read as u64;
        Ok(header)
    }

    /// Decode the next data element tag,
    /// without reading the rest of the header.
    pub fn decode_tag(&mut self) -> Result<Tag> {
        let tag = self
            .decoder
            .decode_tag(&mut self.from)
            .context(DecodeElementHeaderSnafu {
                position: self.position,
            })?;
        self.position += 4;
        Ok(tag)
    }

    /// Eagerly read the following data in the source as the value of the
    /// given element header. The payload is decoded and byte-swapped
    /// according to the value representation:
    /// textual VRs become a string, fixed width numeric VRs become a
    /// number or a sequence of numbers, and OB/UN data is kept as raw
    /// bytes. A value of undefined length is scanned byte by byte until
    /// the sequence delimitation item.
    pub fn read_value(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        let len = match header.len.get() {
            None => return self.read_value_undefined_length(),
            Some(len) => len as usize,
        };

        match header.vr {
            VR::CS
            | VR::DA
            | VR::DS
            | VR::DT
            | VR::IS
            | VR::LO
            | VR::LT
            | VR::PN
            | VR::SH
            | VR::ST
            | VR::TM
            | VR::UI
            | VR::UT => self.read_value_str(len),
            // defined length SQ values are kept as raw bytes as well
            VR::OB | VR::UN | VR::SQ => self.read_value_ob(len),
            VR::SS => self.read_value_ss(len),
            VR::SL => self.read_value_sl(len),
            VR::US | VR::AT | VR::OW => self.read_value_us(len),
            VR::UL => self.read_value_ul(len),
            VR::FL | VR::OF => self.read_value_fl(len),
            VR::FD => self.read_value_fd(len),
        }
    }

    // ---------------- private methods ---------------------

    fn read_value_str(&mut self, len: usize) -> Result<PrimitiveValue> {
        // a single string, kept with its trailing padding
        let mut buf = vec![0u8; len];
        self.from.read_exact(&mut buf).context(ReadValueDataSnafu {
            position: self.position,
        })?;
        self.position += len as u64;
        Ok(PrimitiveValue::Str(
            String::from_utf8_lossy(&buf).into_owned(),
        ))
    }

    fn read_value_ob(&mut self, len: usize) -> Result<PrimitiveValue> {
        // sequence of 8-bit integers (or arbitrary byte data)
        let mut buf: C<u8> = smallvec![0u8; len];
        self.from.read_exact(&mut buf).context(ReadValueDataSnafu {
            position: self.position,
        })?;
        self.position += len as u64;
        Ok(PrimitiveValue::U8(buf))
    }

    fn read_value_ss(&mut self, len: usize) -> Result<PrimitiveValue> {
        // sequence of 16-bit signed integers
        let n = len >> 1;
        let mut vec: C<i16> = smallvec![0; n];
        self.basic
            .decode_ss_into(&mut self.from, &mut vec[..])
            .context(ReadValueDataSnafu {
                position: self.position,
            })?;
        self.position += (n << 1) as u64;
        self.skip_remainder(len - (n << 1))?;
        Ok(PrimitiveValue::I16(vec))
    }

    fn read_value_sl(&mut self, len: usize) -> Result<PrimitiveValue> {
        // sequence of 32-bit signed integers
        let n = len >> 2;
        let mut vec: C<i32> = smallvec![0; n];
        self.basic
            .decode_sl_into(&mut self.from, &mut vec[..])
            .context(ReadValueDataSnafu {
                position: self.position,
            })?;
        self.position += (n << 2) as u64;
        self.skip_remainder(len - (n << 2))?;
        Ok(PrimitiveValue::I32(vec))
    }

    fn read_value_us(&mut self, len: usize) -> Result<PrimitiveValue> {
        // sequence of 16-bit unsigned integers
        let n = len >> 1;
        let mut vec: C<u16> = smallvec![0; n];
        self.basic
            .decode_us_into(&mut self.from, &mut vec[..])
            .context(ReadValueDataSnafu {
                position: self.position,
            })?;
        self.position += (n << 1) as u64;
        self.skip_remainder(len - (n << 1))?;
        Ok(PrimitiveValue::U16(vec))
    }

    fn read_value_ul(&mut self, len: usize) -> Result<PrimitiveValue> {
        // sequence of 32-bit unsigned integers
        let n = len >> 2;
        let mut vec: C<u32> = smallvec![0; n];
        self.basic
            .decode_ul_into(&mut self.from, &mut vec[..])
            .context(ReadValueDataSnafu {
                position: self.position,
            })?;
        self.position += (n << 2) as u64;
        self.skip_remainder(len - (n << 2))?;
        Ok(PrimitiveValue::U32(vec))
    }

    fn read_value_fl(&mut self, len: usize) -> Result<PrimitiveValue> {
        // sequence of 32-bit floats
        let n = len >> 2;
        let mut vec: C<f32> = smallvec![0.; n];
        self.basic
            .decode_fl_into(&mut self.from, &mut vec[..])
            .context(ReadValueDataSnafu {
                position: self.position,
            })?;
        self.position += (n << 2) as u64;
        self.skip_remainder(len - (n << 2))?;
        Ok(PrimitiveValue::F32(vec))
    }

    fn read_value_fd(&mut self, len: usize) -> Result<PrimitiveValue> {
        // sequence of 64-bit floats
        let n = len >> 3;
        let mut vec: C<f64> = smallvec![0.; n];
        self.basic
            .decode_fd_into(&mut self.from, &mut vec[..])
            .context(ReadValueDataSnafu {
                position: self.position,
            })?;
        self.position += (n << 3) as u64;
        self.skip_remainder(len - (n << 3))?;
        Ok(PrimitiveValue::F64(vec))
    }

    /// Stream bytes one at a time, keeping an 8-byte trailing window,
    /// until the window holds the sequence delimitation item. The
    /// delimiter is dropped from the retained data, and so is a leading
    /// item tag when present.
    fn read_value_undefined_length(&mut self) -> Result<PrimitiveValue> {
        let mut data = Vec::new();
        let mut window = [0u8; 8];
        let mut byte = [0u8; 1];
        loop {
            self.from
                .read_exact(&mut byte)
                .context(ReadValueDataSnafu {
                    position: self.position,
                })?;
            self.position += 1;
            data.push(byte[0]);

            window.copy_within(1.., 0);
            window[7] = byte[0];
            if window == SEQUENCE_DELIMITER {
                break;
            }
        }

        // the window can only match after 8 reads
        let end = data.len() - 8;
        data.truncate(end);

        if data.len() >= 4 && data[..4] == ITEM_TAG_PREFIX {
            data.drain(..4);
        }

        Ok(PrimitiveValue::U8(C::from_vec(data)))
    }

    /// Consume leftover bytes of a payload whose length is not a whole
    /// multiple of the element size, so that the source stays aligned
    /// with the start of the next element.
    fn skip_remainder(&mut self, remainder: usize) -> Result<()> {
        if remainder > 0 {
            tracing::trace!(
                "payload length not a multiple of the element size, skipping {} byte(s)",
                remainder
            );
            let mut buf = [0u8; 8];
            self.from
                .read_exact(&mut buf[..remainder])
                .context(ReadValueDataSnafu {
                    position: self.position,
                })?;
            self.position += remainder as u64;
        }
        Ok(())
    }
}

impl<D, S, BD> StatefulDecoder<D, S, BD>
where
    S: Seek,
{
    /// Rewind the source by the width of a data element tag,
    /// so that the tag just read can be decoded again.
    pub fn rewind_tag(&mut self) -> Result<()> {
        let new_position = self.position.saturating_sub(4);
        self.from
            .seek(SeekFrom::Current(-4))
            .context(SeekReaderSnafu {
                position: self.position,
                new_position,
            })?;
        self.position = new_position;
        Ok(())
    }
}
