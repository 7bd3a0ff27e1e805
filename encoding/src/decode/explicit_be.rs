//! Explicit VR Big Endian syntax transfer implementation

use crate::decode::basic::BigEndianBasicDecoder;
use crate::decode::{
    BasicDecode, Decode, DecodeFrom, ReadHeaderTagSnafu, ReadLengthSnafu, ReadReservedSnafu,
    ReadTagSnafu, ReadVrSnafu, Result, UnknownVrSnafu,
};
use byteordered::byteorder::{ByteOrder, BigEndian};
use dcmpix_core::header::{DataElementHeader, Length};
use dcmpix_core::{Tag, VR};
use snafu::{OptionExt, ResultExt};
use std::io::Read;

/// A data element header decoder for the Explicit VR Big Endian
/// transfer syntax. Note that the VR characters do not swap:
/// only the tag halves and the length fields do.
#[derive(Debug, Default, Clone)]
pub struct ExplicitVRBigEndianDecoder {
    basic: BigEndianBasicDecoder,
}

impl Decode for ExplicitVRBigEndianDecoder {
    fn decode_header<S>(&self, mut source: &mut S) -> Result<(DataElementHeader, usize)>
    where
        S: ?Sized + Read,
    {
        // retrieve tag
        let tag = self
            .basic
            .decode_tag(&mut source)
            .context(ReadHeaderTagSnafu)?;

        // retrieve explicit VR
        let mut buf = [0u8; 4];
        source.read_exact(&mut buf[0..2]).context(ReadVrSnafu)?;
        let vr = VR::from_binary([buf[0], buf[1]]).context(UnknownVrSnafu {
            bytes: [buf[0], buf[1]],
        })?;
        let bytes_read;

        // retrieve data length
        let len = match vr {
            VR::OB | VR::OW | VR::OF | VR::SQ | VR::UT | VR::UN => {
                // skip 2 reserved bytes, then read 4 bytes for data length
                source.read_exact(&mut buf[0..2]).context(ReadReservedSnafu)?;
                source.read_exact(&mut buf).context(ReadLengthSnafu)?;
                bytes_read = 12;
                BigEndian::read_u32(&buf)
            }
            _ => {
                // read 2 bytes for the data length
                source.read_exact(&mut buf[0..2]).context(ReadLengthSnafu)?;
                bytes_read = 8;
                u32::from(BigEndian::read_u16(&buf[0..2]))
            }
        };

        Ok((DataElementHeader::new(tag, vr, Length(len)), bytes_read))
    }

    fn decode_tag<S>(&self, source: &mut S) -> Result<Tag>
    where
        S: ?Sized + Read,
    {
        let mut buf = [0u8; 4];
        source.read_exact(&mut buf).context(ReadTagSnafu)?;
        Ok(Tag(
            BigEndian::read_u16(&buf[0..2]),
            BigEndian::read_u16(&buf[2..4]),
        ))
    }
}

impl<S: ?Sized> DecodeFrom<S> for ExplicitVRBigEndianDecoder
where
    S: Read,
{
    #[inline]
    fn decode_header(&self, source: &mut S) -> Result<(DataElementHeader, usize)> {
        Decode::decode_header(self, source)
    }

    #[inline]
    fn decode_tag(&self, source: &mut S) -> Result<Tag> {
        Decode::decode_tag(self, source)
    }
}
