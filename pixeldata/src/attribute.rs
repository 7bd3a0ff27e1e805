//! Utility module for fetching key attributes from a DICOM object.
//!
//! Required attributes distinguish between absence and a bad value;
//! informational attributes (pixel spacing, image position, the rescale
//! pair) fall back to `None` instead of failing.
//!
//! Files in Implicit VR Little Endian keep their values as opaque bytes,
//! so every getter also accepts the raw byte form of its attribute,
//! reinterpreted in the byte order of the object's transfer syntax.

use byteordered::byteorder::{BigEndian, ByteOrder, LittleEndian};
use byteordered::Endianness;
use dcmpix_core::header::DataElement;
use dcmpix_core::value::PrimitiveValue;
use dcmpix_core::{tags, Tag};
use dcmpix_object::FileDicomObject;
use snafu::{Backtrace, ResultExt, Snafu};
use std::borrow::Cow;

/// An error occurring when fetching an attribute from a DICOM object.
#[derive(Debug, Snafu)]
pub enum GetAttributeError {
    /// The attribute is required but missing from the object.
    #[snafu(display("Missing required attribute `{}`", name))]
    MissingRequiredField {
        name: &'static str,
        #[snafu(backtrace)]
        source: dcmpix_object::Error,
    },

    /// The attribute exists, with a value of an unusable type.
    #[snafu(display("Could not get attribute `{}`", name))]
    CastValue {
        name: &'static str,
        source: dcmpix_core::CastValueError,
        backtrace: Backtrace,
    },
}

/// Attribute fetching result type.
pub type Result<T, E = GetAttributeError> = std::result::Result<T, E>;

/// Get the Rows from the DICOM object.
pub fn rows(obj: &FileDicomObject) -> Result<u16> {
    retrieve_required_u16(obj, tags::ROWS, "Rows")
}

/// Get the Columns from the DICOM object.
pub fn cols(obj: &FileDicomObject) -> Result<u16> {
    retrieve_required_u16(obj, tags::COLUMNS, "Columns")
}

/// Get the BitsAllocated from the DICOM object.
pub fn bits_allocated(obj: &FileDicomObject) -> Result<u16> {
    retrieve_required_u16(obj, tags::BITS_ALLOCATED, "BitsAllocated")
}

/// Get the BitsStored from the DICOM object.
pub fn bits_stored(obj: &FileDicomObject) -> Result<u16> {
    retrieve_required_u16(obj, tags::BITS_STORED, "BitsStored")
}

/// Get the HighBit from the DICOM object.
pub fn high_bit(obj: &FileDicomObject) -> Result<u16> {
    retrieve_required_u16(obj, tags::HIGH_BIT, "HighBit")
}

/// Get the PhotometricInterpretation from the DICOM object,
/// with trailing padding removed.
pub fn photometric_interpretation(obj: &FileDicomObject) -> Result<String> {
    let elem = obj
        .element(tags::PHOTOMETRIC_INTERPRETATION)
        .context(MissingRequiredFieldSnafu {
            name: "PhotometricInterpretation",
        })?;
    Ok(element_text(elem).trim().to_string())
}

/// An interpreted representation of the DICOM _Pixel Representation_
/// attribute.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub enum PixelRepresentation {
    /// unsigned pixel data sample values
    Unsigned,
    /// signed (2's complement) pixel data sample values
    Signed,
}

/// Get the PixelRepresentation from the DICOM object.
/// Any non-zero value means signed samples.
pub fn pixel_representation(obj: &FileDicomObject) -> Result<PixelRepresentation> {
    let p = retrieve_required_u16(obj, tags::PIXEL_REPRESENTATION, "PixelRepresentation")?;
    if p == 0 {
        Ok(PixelRepresentation::Unsigned)
    } else {
        Ok(PixelRepresentation::Signed)
    }
}

/// Get the PixelData element from the DICOM object.
pub fn pixel_data(obj: &FileDicomObject) -> Result<&DataElement> {
    obj.element(tags::PIXEL_DATA)
        .context(MissingRequiredFieldSnafu { name: "PixelData" })
}

/// Get the RescaleSlope from the DICOM object, if the element exists.
/// A value which fails to parse counts as the neutral slope of 1.
pub fn rescale_slope(obj: &FileDicomObject) -> Option<f32> {
    let elem = obj.get(tags::RESCALE_SLOPE)?;
    Some(parse_float(elem).unwrap_or(1.0))
}

/// Get the RescaleIntercept from the DICOM object, if the element exists.
/// A value which fails to parse counts as the neutral intercept of 0.
pub fn rescale_intercept(obj: &FileDicomObject) -> Option<f32> {
    let elem = obj.get(tags::RESCALE_INTERCEPT)?;
    Some(parse_float(elem).unwrap_or(0.0))
}

/// Get the two PixelSpacing components from the DICOM object.
/// This attribute is informational: absence, fewer than two components
/// or a leading component which fails to parse yield `None`.
pub fn pixel_spacing(obj: &FileDicomObject) -> Option<(f32, f32)> {
    let elem = obj.get(tags::PIXEL_SPACING)?;
    let text = element_text(elem);
    let mut parts = text.trim().split('\\');
    let row: f32 = parts.next()?.trim().parse().ok()?;
    let col: f32 = parts.next()?.trim().parse().ok()?;
    Some((row, col))
}

/// Get the three ImagePositionPatient components from the DICOM object.
/// This attribute is informational: absence, fewer than three components
/// or a leading component which fails to parse yield `None`.
pub fn image_position(obj: &FileDicomObject) -> Option<(f32, f32, f32)> {
    let elem = obj.get(tags::IMAGE_POSITION_PATIENT)?;
    let text = element_text(elem);
    let mut parts = text.trim().split('\\');
    let x: f32 = parts.next()?.trim().parse().ok()?;
    let y: f32 = parts.next()?.trim().parse().ok()?;
    let z: f32 = parts.next()?.trim().parse().ok()?;
    Some((x, y, z))
}

/// Fetch the text of an element's value,
/// decoding raw bytes where necessary.
fn element_text(elem: &DataElement) -> Cow<'_, str> {
    elem.value().to_str().unwrap_or(Cow::Borrowed(""))
}

/// Parse a trimmed decimal string attribute.
fn parse_float(elem: &DataElement) -> Option<f32> {
    element_text(elem).trim().parse::<f32>().ok()
}

#[inline]
fn retrieve_required_u16(
    obj: &FileDicomObject,
    tag: Tag,
    name: &'static str,
) -> Result<u16> {
    let elem = obj
        .element(tag)
        .context(MissingRequiredFieldSnafu { name })?;
    match elem.value() {
        // opaque form, as read from an Implicit VR data set
        PrimitiveValue::U8(bytes) if bytes.len() == 2 => {
            if obj.transfer_syntax().endianness() == Endianness::Little {
                Ok(LittleEndian::read_u16(bytes))
            } else {
                Ok(BigEndian::read_u16(bytes))
            }
        }
        _ => elem.uint16().context(CastValueSnafu { name }),
    }
}
