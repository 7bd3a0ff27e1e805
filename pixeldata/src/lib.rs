//! This crate interprets the parsed data elements of a DICOM object
//! to rebuild the image it carries as a 2-D pixel matrix.
//!
//! The reconstruction reads the image attributes for the sample type
//! (storage width and signedness), reshapes the raw frame payload to
//! `rows` × `columns`, right-aligns the stored sample bits when the
//! storage width exceeds them, and optionally applies the modality
//! rescale (`pixel * slope + intercept`), which promotes the matrix
//! to floating point.
//!
//! Only single channel `MONOCHROME2` images are supported.
//!
//! # Examples
//!
//! ```no_run
//! # use std::error::Error;
//! use dcmpix_object::open_file;
//! use dcmpix_pixeldata::PixelDecoder;
//!
//! # fn main() -> Result<(), Box<dyn Error>> {
//! let obj = open_file("dicom.dcm")?;
//! let decoded = obj.decode_pixel_data()?;
//! let image = decoded.to_matrix(true);
//! println!("{} x {}", decoded.info().rows, decoded.info().cols);
//! #   Ok(())
//! # }
//! ```

use byteordered::byteorder::{BigEndian, ByteOrder, LittleEndian};
use byteordered::Endianness;
use dcmpix_core::value::PrimitiveValue;
use dcmpix_object::FileDicomObject;
use ndarray::Array2;
use num_traits::NumCast;
use snafu::{OptionExt, ResultExt, Snafu};

pub mod attribute;

use crate::attribute::PixelRepresentation;

/// The crate's error type for failures in rebuilding an image
/// from a DICOM object.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// An attribute required for the reconstruction
    /// is missing or unreadable.
    #[snafu(display("Could not retrieve attribute: {}", source))]
    RetrieveAttribute {
        #[snafu(backtrace)]
        source: attribute::GetAttributeError,
    },

    /// The image is not in a photometric interpretation
    /// this library can reconstruct.
    #[snafu(display("Unsupported photometric interpretation `{}`", pi))]
    UnsupportedPhotometricInterpretation {
        pi: String,
        backtrace: snafu::Backtrace,
    },

    /// The sample storage width is not one of the supported widths.
    #[snafu(display("Unsupported bits allocated {}", bits))]
    UnsupportedBitsAllocated {
        bits: u16,
        backtrace: snafu::Backtrace,
    },

    /// The pixel data value cannot be reinterpreted
    /// in the declared sample type.
    #[snafu(display("Invalid pixel data for the declared sample type"))]
    InvalidPixelData { backtrace: snafu::Backtrace },

    /// The pixel data payload does not fill a matrix
    /// of the declared dimensions.
    #[snafu(display("Invalid shape for image matrix"))]
    BuildMatrix {
        source: ndarray::ShapeError,
        backtrace: snafu::Backtrace,
    },

    /// A pixel sample is not representable in the requested type.
    #[snafu(display("Invalid data type for image matrix"))]
    InvalidDataType { backtrace: snafu::Backtrace },
}

/// The crate's result type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Summary information about the image of a DICOM object,
/// gathered from the data set without touching the pixel data.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    /// Number of matrix rows.
    pub rows: u16,
    /// Number of matrix columns.
    pub cols: u16,
    /// Storage width of each sample, in bits.
    pub bits_allocated: u16,
    /// Number of channels. Always 1 for the supported
    /// photometric interpretation.
    pub channels: u16,
    /// Whether samples are signed (2's complement).
    pub is_signed: bool,
    /// Physical distance between rows, in mm. 0 when not announced.
    pub px_spacing_row: f32,
    /// Physical distance between columns, in mm. 0 when not announced.
    pub px_spacing_col: f32,
    /// The x coordinate of the upper left voxel. NaN when not announced.
    pub image_pos_x: f32,
    /// The y coordinate of the upper left voxel. NaN when not announced.
    pub image_pos_y: f32,
    /// The z coordinate of the upper left voxel. NaN when not announced.
    pub image_pos_z: f32,
}

impl ImageInfo {
    /// Gather the image summary from a parsed DICOM object.
    ///
    /// The photometric interpretation, pixel representation, bits
    /// allocated, rows and columns attributes are required; each missing
    /// one is reported distinctly. An interpretation other than
    /// `MONOCHROME2` is refused. Pixel spacing and image position are
    /// informational and keep their defaults when absent or malformed.
    pub fn from_object(obj: &FileDicomObject) -> Result<Self> {
        let pi = attribute::photometric_interpretation(obj).context(RetrieveAttributeSnafu)?;
        if !pi.contains("MONOCHROME2") {
            return UnsupportedPhotometricInterpretationSnafu { pi }.fail();
        }

        let rep = attribute::pixel_representation(obj).context(RetrieveAttributeSnafu)?;
        let bits_allocated = attribute::bits_allocated(obj).context(RetrieveAttributeSnafu)?;
        let rows = attribute::rows(obj).context(RetrieveAttributeSnafu)?;
        let cols = attribute::cols(obj).context(RetrieveAttributeSnafu)?;

        let (px_spacing_row, px_spacing_col) =
            attribute::pixel_spacing(obj).unwrap_or((0.0, 0.0));
        let (image_pos_x, image_pos_y, image_pos_z) = attribute::image_position(obj)
            .unwrap_or((f32::NAN, f32::NAN, f32::NAN));

        Ok(ImageInfo {
            rows,
            cols,
            bits_allocated,
            channels: 1,
            is_signed: rep == PixelRepresentation::Signed,
            px_spacing_row,
            px_spacing_col,
            image_pos_x,
            image_pos_y,
            image_pos_z,
        })
    }
}

/// A decoded 2-D single channel pixel matrix.
///
/// The integer variant in use follows from the image's bits allocated
/// and pixel representation; the floating point variant appears after
/// rescaling.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelMatrix {
    /// 8-bit unsigned samples.
    U8(Array2<u8>),
    /// 8-bit signed samples.
    I8(Array2<i8>),
    /// 16-bit unsigned samples.
    U16(Array2<u16>),
    /// 16-bit signed samples.
    I16(Array2<i16>),
    /// Floating point samples, after rescaling.
    F32(Array2<f32>),
}

impl PixelMatrix {
    /// The matrix dimensions as `(rows, cols)`.
    pub fn dim(&self) -> (usize, usize) {
        match self {
            PixelMatrix::U8(m) => m.dim(),
            PixelMatrix::I8(m) => m.dim(),
            PixelMatrix::U16(m) => m.dim(),
            PixelMatrix::I16(m) => m.dim(),
            PixelMatrix::F32(m) => m.dim(),
        }
    }

    /// Convert the pixel matrix into a newly allocated `ndarray` matrix
    /// of the requested numeric type.
    ///
    /// Returns an error if any sample is not representable
    /// in the requested type.
    pub fn to_ndarray<T>(&self) -> Result<Array2<T>>
    where
        T: NumCast + Copy,
    {
        let data: Option<Vec<T>> = match self {
            PixelMatrix::U8(m) => m.iter().map(|&v| T::from(v)).collect(),
            PixelMatrix::I8(m) => m.iter().map(|&v| T::from(v)).collect(),
            PixelMatrix::U16(m) => m.iter().map(|&v| T::from(v)).collect(),
            PixelMatrix::I16(m) => m.iter().map(|&v| T::from(v)).collect(),
            PixelMatrix::F32(m) => m.iter().map(|&v| T::from(v)).collect(),
        };
        let data = data.context(InvalidDataTypeSnafu)?;
        Array2::from_shape_vec(self.dim(), data).context(BuildMatrixSnafu)
    }
}

/// The decoded pixel data of a DICOM object: the sample matrix with the
/// stored bits already right-aligned, plus the information which directs
/// its final interpretation.
#[derive(Debug, Clone)]
pub struct DecodedPixelData {
    info: ImageInfo,
    matrix: PixelMatrix,
    rescale: Option<(f32, f32)>,
}

impl DecodedPixelData {
    /// The image summary information.
    pub fn info(&self) -> &ImageInfo {
        &self.info
    }

    /// The raw sample matrix, unpadded but not rescaled.
    pub fn matrix(&self) -> &PixelMatrix {
        &self.matrix
    }

    /// The modality rescale pair `(slope, intercept)`,
    /// present when both elements exist in the data set.
    pub fn rescale(&self) -> Option<(f32, f32)> {
        self.rescale
    }

    /// Produce the final pixel matrix.
    ///
    /// When `rescale` is requested and the data set carries both rescale
    /// elements, every sample becomes `sample * slope + intercept` and
    /// the matrix is promoted to floating point; an identity rescale
    /// keeps the integer samples as they are.
    pub fn to_matrix(&self, rescale: bool) -> PixelMatrix {
        match self.rescale {
            Some((slope, intercept)) if rescale && (slope != 1.0 || intercept != 0.0) => {
                PixelMatrix::F32(rescale_matrix(&self.matrix, slope, intercept))
            }
            _ => self.matrix.clone(),
        }
    }
}

/// Trait for objects which can have their pixel data decoded
/// into a pixel matrix.
pub trait PixelDecoder {
    /// Decode the pixel data of this object.
    ///
    /// The returned value holds the sample matrix with the stored bits
    /// right-aligned, ready for rescaling on demand.
    fn decode_pixel_data(&self) -> Result<DecodedPixelData>;
}

impl PixelDecoder for FileDicomObject {
    fn decode_pixel_data(&self) -> Result<DecodedPixelData> {
        let info = ImageInfo::from_object(self)?;
        let pixel_data = attribute::pixel_data(self).context(RetrieveAttributeSnafu)?;
        let bits_stored = attribute::bits_stored(self).context(RetrieveAttributeSnafu)?;
        let high_bit = attribute::high_bit(self).context(RetrieveAttributeSnafu)?;

        let endianness = self.transfer_syntax().endianness();
        let matrix = build_matrix(pixel_data.value(), &info, endianness)?;
        let matrix = unpad(matrix, info.bits_allocated, bits_stored, high_bit);

        let rescale = match (
            attribute::rescale_slope(self),
            attribute::rescale_intercept(self),
        ) {
            (Some(slope), Some(intercept)) => Some((slope, intercept)),
            _ => None,
        };

        Ok(DecodedPixelData {
            info,
            matrix,
            rescale,
        })
    }
}

/// Reinterpret the decoded pixel data value as a flat sample buffer of
/// the type selected by bits allocated and signedness, and shape it to
/// the announced matrix dimensions.
///
/// The value may already be in the matching typed form (from an OW
/// element), or in raw byte form (from an OB element or an Implicit VR
/// data set), in which case the samples follow the byte order of the
/// transfer syntax.
fn build_matrix(
    value: &PrimitiveValue,
    info: &ImageInfo,
    endianness: Endianness,
) -> Result<PixelMatrix> {
    let shape = (info.rows as usize, info.cols as usize);
    match (info.bits_allocated, info.is_signed) {
        (8, false) => {
            let data = match value {
                PrimitiveValue::U8(b) => b.to_vec(),
                // 8-bit samples sent as OW words: flatten back to bytes
                PrimitiveValue::U16(v) => words_to_bytes(v, endianness),
                _ => return InvalidPixelDataSnafu.fail(),
            };
            Array2::from_shape_vec(shape, data)
                .context(BuildMatrixSnafu)
                .map(PixelMatrix::U8)
        }
        (8, true) => {
            let data = match value {
                PrimitiveValue::U8(b) => b.to_vec(),
                PrimitiveValue::U16(v) => words_to_bytes(v, endianness),
                _ => return InvalidPixelDataSnafu.fail(),
            };
            let data = data.into_iter().map(|b| b as i8).collect();
            Array2::from_shape_vec(shape, data)
                .context(BuildMatrixSnafu)
                .map(PixelMatrix::I8)
        }
        (16, false) => {
            let data = match value {
                PrimitiveValue::U16(v) => v.to_vec(),
                PrimitiveValue::U8(b) if b.len() % 2 == 0 => {
                    let mut out = vec![0u16; b.len() / 2];
                    if endianness == Endianness::Little {
                        LittleEndian::read_u16_into(b, &mut out);
                    } else {
                        BigEndian::read_u16_into(b, &mut out);
                    }
                    out
                }
                _ => return InvalidPixelDataSnafu.fail(),
            };
            Array2::from_shape_vec(shape, data)
                .context(BuildMatrixSnafu)
                .map(PixelMatrix::U16)
        }
        (16, true) => {
            let data = match value {
                PrimitiveValue::I16(v) => v.to_vec(),
                PrimitiveValue::U16(v) => v.iter().map(|&v| v as i16).collect(),
                PrimitiveValue::U8(b) if b.len() % 2 == 0 => {
                    let mut out = vec![0i16; b.len() / 2];
                    if endianness == Endianness::Little {
                        LittleEndian::read_i16_into(b, &mut out);
                    } else {
                        BigEndian::read_i16_into(b, &mut out);
                    }
                    out
                }
                _ => return InvalidPixelDataSnafu.fail(),
            };
            Array2::from_shape_vec(shape, data)
                .context(BuildMatrixSnafu)
                .map(PixelMatrix::I16)
        }
        (bits, _) => UnsupportedBitsAllocatedSnafu { bits }.fail(),
    }
}

/// Flatten 16-bit words back into the byte stream they were read from,
/// following the byte order of the transfer syntax.
fn words_to_bytes(words: &[u16], endianness: Endianness) -> Vec<u8> {
    let mut out = vec![0u8; words.len() * 2];
    if endianness == Endianness::Little {
        LittleEndian::write_u16_into(words, &mut out);
    } else {
        BigEndian::write_u16_into(words, &mut out);
    }
    out
}

/// Right-align the stored sample bits.
///
/// When the storage width exceeds the stored width, every sample moves
/// down by `high_bit - bits_stored + 1` bit positions. The shift is
/// arithmetic for signed samples and logical for unsigned ones.
fn unpad(matrix: PixelMatrix, bits_allocated: u16, bits_stored: u16, high_bit: u16) -> PixelMatrix {
    if bits_allocated == bits_stored {
        return matrix;
    }
    let d = <i32 as From<u16>>::from(high_bit) - <i32 as From<u16>>::from(bits_stored) + 1;
    if d <= 0 {
        return matrix;
    }
    let d = d as u32;
    tracing::trace!("Unpadding samples by {} bit(s)", d);
    match matrix {
        PixelMatrix::U8(m) => PixelMatrix::U8(m.mapv(|v| v >> d)),
        PixelMatrix::I8(m) => PixelMatrix::I8(m.mapv(|v| v >> d)),
        PixelMatrix::U16(m) => PixelMatrix::U16(m.mapv(|v| v >> d)),
        PixelMatrix::I16(m) => PixelMatrix::I16(m.mapv(|v| v >> d)),
        matrix => matrix,
    }
}

/// Apply the modality rescale elementwise, promoting to floating point.
fn rescale_matrix(matrix: &PixelMatrix, slope: f32, intercept: f32) -> Array2<f32> {
    match matrix {
        PixelMatrix::U8(m) => m.mapv(|v| <f32 as From<u8>>::from(v) * slope + intercept),
        PixelMatrix::I8(m) => m.mapv(|v| <f32 as From<i8>>::from(v) * slope + intercept),
        PixelMatrix::U16(m) => m.mapv(|v| <f32 as From<u16>>::from(v) * slope + intercept),
        PixelMatrix::I16(m) => m.mapv(|v| <f32 as From<i16>>::from(v) * slope + intercept),
        PixelMatrix::F32(m) => m.mapv(|v| v * slope + intercept),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmpix_core::header::{DataElement, DataElementHeader, Length};
    use dcmpix_core::{tags, PrimitiveValue, Tag, VR};
    use dcmpix_encoding::transfer_syntax::TransferSyntax;
    use dcmpix_object::InMemDicomObject;
    use ndarray::arr2;
    use smallvec::{smallvec, SmallVec};

    fn us_element(tag: Tag, value: u16) -> DataElement {
        DataElement::new(
            DataElementHeader::new(tag, VR::US, Length(2)),
            PrimitiveValue::U16(smallvec![value]),
        )
    }

    fn str_element(tag: Tag, vr: VR, text: &str) -> DataElement {
        DataElement::new(
            DataElementHeader::new(tag, vr, Length(text.len() as u32)),
            PrimitiveValue::from(text),
        )
    }

    /// A 2x2 object with 16-bit samples stored as OW words.
    fn base_object(extra: Vec<DataElement>) -> FileDicomObject {
        let mut elements = vec![
            str_element(tags::PHOTOMETRIC_INTERPRETATION, VR::CS, "MONOCHROME2 "),
            us_element(tags::PIXEL_REPRESENTATION, 0),
            us_element(tags::BITS_ALLOCATED, 16),
            us_element(tags::BITS_STORED, 16),
            us_element(tags::HIGH_BIT, 15),
            us_element(tags::ROWS, 2),
            us_element(tags::COLUMNS, 2),
            DataElement::new(
                DataElementHeader::new(tags::PIXEL_DATA, VR::OW, Length(8)),
                PrimitiveValue::U16(smallvec![10, 20, 30, 40]),
            ),
        ];
        elements.extend(extra);
        FileDicomObject::new(
            TransferSyntax::ExplicitVRLittleEndian,
            InMemDicomObject::from_element_iter(elements),
        )
    }

    #[test]
    fn summary_of_plain_object() {
        let obj = base_object(vec![]);
        let info = ImageInfo::from_object(&obj).unwrap();
        assert_eq!(info.rows, 2);
        assert_eq!(info.cols, 2);
        assert_eq!(info.bits_allocated, 16);
        assert_eq!(info.channels, 1);
        assert!(!info.is_signed);
        assert_eq!(info.px_spacing_row, 0.0);
        assert_eq!(info.px_spacing_col, 0.0);
        assert!(info.image_pos_x.is_nan());
        assert!(info.image_pos_y.is_nan());
        assert!(info.image_pos_z.is_nan());
    }

    #[test]
    fn summary_reads_soft_attributes() {
        let obj = base_object(vec![
            str_element(tags::PIXEL_SPACING, VR::DS, "0.5\\0.25"),
            str_element(tags::IMAGE_POSITION_PATIENT, VR::DS, "1.0\\2.0\\3.0"),
        ]);
        let info = ImageInfo::from_object(&obj).unwrap();
        assert_eq!(info.px_spacing_row, 0.5);
        assert_eq!(info.px_spacing_col, 0.25);
        assert_eq!(
            (info.image_pos_x, info.image_pos_y, info.image_pos_z),
            (1.0, 2.0, 3.0)
        );
    }

    #[test]
    fn summary_requires_monochrome2() {
        let mut obj = base_object(vec![]).into_inner();
        obj.put(str_element(tags::PHOTOMETRIC_INTERPRETATION, VR::CS, "RGB "));
        let obj = FileDicomObject::new(TransferSyntax::ExplicitVRLittleEndian, obj);
        assert!(matches!(
            ImageInfo::from_object(&obj).unwrap_err(),
            Error::UnsupportedPhotometricInterpretation { .. }
        ));
    }

    #[test]
    fn summary_reports_each_missing_attribute() {
        let obj = FileDicomObject::new(
            TransferSyntax::ExplicitVRLittleEndian,
            InMemDicomObject::from_element_iter(vec![str_element(
                tags::PHOTOMETRIC_INTERPRETATION,
                VR::CS,
                "MONOCHROME2",
            )]),
        );
        let err = ImageInfo::from_object(&obj).unwrap_err();
        assert!(err.to_string().contains("PixelRepresentation"));
    }

    #[test]
    fn decode_16_bit_unsigned_matrix() {
        let obj = base_object(vec![]);
        let decoded = obj.decode_pixel_data().unwrap();
        let matrix = decoded.to_matrix(true);
        assert_eq!(
            matrix,
            PixelMatrix::U16(arr2(&[[10, 20], [30, 40]]))
        );
    }

    #[test]
    fn decode_signed_matrix_from_words() {
        let mut obj = base_object(vec![]).into_inner();
        obj.put(us_element(tags::PIXEL_REPRESENTATION, 1));
        obj.put(DataElement::new(
            DataElementHeader::new(tags::PIXEL_DATA, VR::OW, Length(8)),
            PrimitiveValue::U16(smallvec![0xFFFF, 1, 2, 3]),
        ));
        let obj = FileDicomObject::new(TransferSyntax::ExplicitVRLittleEndian, obj);
        let decoded = obj.decode_pixel_data().unwrap();
        assert_eq!(
            decoded.to_matrix(false),
            PixelMatrix::I16(arr2(&[[-1, 1], [2, 3]]))
        );
    }

    #[test]
    fn decode_8_bit_matrix_from_bytes() {
        let mut obj = base_object(vec![]).into_inner();
        obj.put(us_element(tags::BITS_ALLOCATED, 8));
        obj.put(us_element(tags::BITS_STORED, 8));
        obj.put(us_element(tags::HIGH_BIT, 7));
        obj.put(DataElement::new(
            DataElementHeader::new(tags::PIXEL_DATA, VR::OB, Length(4)),
            PrimitiveValue::U8(smallvec![0, 1, 2, 3]),
        ));
        let obj = FileDicomObject::new(TransferSyntax::ExplicitVRLittleEndian, obj);
        let decoded = obj.decode_pixel_data().unwrap();
        assert_eq!(
            decoded.to_matrix(true),
            PixelMatrix::U8(arr2(&[[0, 1], [2, 3]]))
        );
    }

    #[test]
    fn decode_16_bit_matrix_from_raw_bytes() {
        // byte form of [10, 20, 30, 40] in little endian
        let mut bytes: SmallVec<[u8; 2]> = SmallVec::new();
        for v in [10u16, 20, 30, 40].iter() {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let mut obj = base_object(vec![]).into_inner();
        obj.put(DataElement::new(
            DataElementHeader::new(tags::PIXEL_DATA, VR::OB, Length(8)),
            PrimitiveValue::U8(bytes),
        ));
        let obj = FileDicomObject::new(TransferSyntax::ExplicitVRLittleEndian, obj);
        let decoded = obj.decode_pixel_data().unwrap();
        assert_eq!(
            decoded.to_matrix(true),
            PixelMatrix::U16(arr2(&[[10, 20], [30, 40]]))
        );
    }

    #[test]
    fn unsupported_bits_allocated() {
        let mut obj = base_object(vec![]).into_inner();
        obj.put(us_element(tags::BITS_ALLOCATED, 32));
        let obj = FileDicomObject::new(TransferSyntax::ExplicitVRLittleEndian, obj);
        assert!(matches!(
            obj.decode_pixel_data().unwrap_err(),
            Error::UnsupportedBitsAllocated { bits: 32, .. }
        ));
    }

    #[test]
    fn missing_pixel_data_is_reported() {
        let mut obj = base_object(vec![]).into_inner();
        let pixel_data_tag = tags::PIXEL_DATA;
        let without: InMemDicomObject = obj
            .iter()
            .filter(|e| e.tag() != pixel_data_tag)
            .cloned()
            .collect();
        drop(obj);
        let obj = FileDicomObject::new(TransferSyntax::ExplicitVRLittleEndian, without);
        let err = obj.decode_pixel_data().unwrap_err();
        assert!(err.to_string().contains("attribute"));
    }

    #[test]
    fn unpadding_shifts_stored_bits() {
        // 16 bits allocated, 8 stored, high bit 15: shift by 15 - 8 + 1 = 8
        let mut obj = base_object(vec![]).into_inner();
        obj.put(us_element(tags::BITS_STORED, 8));
        obj.put(us_element(tags::HIGH_BIT, 15));
        obj.put(DataElement::new(
            DataElementHeader::new(tags::PIXEL_DATA, VR::OW, Length(8)),
            PrimitiveValue::U16(smallvec![0xFFFF, 0x0100, 0x0200, 0x1234]),
        ));
        let obj = FileDicomObject::new(TransferSyntax::ExplicitVRLittleEndian, obj);
        let decoded = obj.decode_pixel_data().unwrap();
        assert_eq!(
            decoded.to_matrix(false),
            PixelMatrix::U16(arr2(&[[0x00FF, 0x0001], [0x0002, 0x0012]]))
        );
    }

    #[test]
    fn no_unpadding_when_widths_match() {
        // 16 bits allocated and stored: no shift even with high bit 11
        let mut obj = base_object(vec![]).into_inner();
        obj.put(us_element(tags::HIGH_BIT, 11));
        obj.put(DataElement::new(
            DataElementHeader::new(tags::PIXEL_DATA, VR::OW, Length(8)),
            PrimitiveValue::U16(smallvec![0x0FFF, 0, 0, 0]),
        ));
        let obj = FileDicomObject::new(TransferSyntax::ExplicitVRLittleEndian, obj);
        let decoded = obj.decode_pixel_data().unwrap();
        assert_eq!(
            decoded.to_matrix(false),
            PixelMatrix::U16(arr2(&[[0x0FFF, 0], [0, 0]]))
        );
    }

    #[test]
    fn rescale_promotes_to_float() {
        let obj = base_object(vec![
            str_element(tags::RESCALE_SLOPE, VR::DS, "2.0 "),
            str_element(tags::RESCALE_INTERCEPT, VR::DS, "-1.5 "),
        ]);
        let decoded = obj.decode_pixel_data().unwrap();
        assert_eq!(decoded.rescale(), Some((2.0, -1.5)));
        assert_eq!(
            decoded.to_matrix(true),
            PixelMatrix::F32(arr2(&[[18.5, 38.5], [58.5, 78.5]]))
        );
        // without the rescale request, samples stay integer
        assert_eq!(
            decoded.to_matrix(false),
            PixelMatrix::U16(arr2(&[[10, 20], [30, 40]]))
        );
    }

    #[test]
    fn identity_rescale_keeps_integer_samples() {
        let obj = base_object(vec![
            str_element(tags::RESCALE_SLOPE, VR::DS, "1.0"),
            str_element(tags::RESCALE_INTERCEPT, VR::DS, "0.0"),
        ]);
        let decoded = obj.decode_pixel_data().unwrap();
        assert_eq!(
            decoded.to_matrix(true),
            PixelMatrix::U16(arr2(&[[10, 20], [30, 40]]))
        );
    }

    #[test]
    fn wrong_payload_length_is_a_shape_error() {
        let mut obj = base_object(vec![]).into_inner();
        obj.put(DataElement::new(
            DataElementHeader::new(tags::PIXEL_DATA, VR::OW, Length(6)),
            PrimitiveValue::U16(smallvec![10, 20, 30]),
        ));
        let obj = FileDicomObject::new(TransferSyntax::ExplicitVRLittleEndian, obj);
        assert!(matches!(
            obj.decode_pixel_data().unwrap_err(),
            Error::BuildMatrix { .. }
        ));
    }

    #[test]
    fn matrix_to_ndarray_conversion() {
        let matrix = PixelMatrix::U16(arr2(&[[10, 20], [30, 40]]));
        let as_f64 = matrix.to_ndarray::<f64>().unwrap();
        assert_eq!(as_f64, arr2(&[[10.0, 20.0], [30.0, 40.0]]));
        let as_u8 = matrix.to_ndarray::<u8>().unwrap();
        assert_eq!(as_u8, arr2(&[[10, 20], [30, 40]]));

        // 300 does not fit in u8
        let matrix = PixelMatrix::U16(arr2(&[[300]]));
        assert!(matches!(
            matrix.to_ndarray::<u8>().unwrap_err(),
            Error::InvalidDataType { .. }
        ));
    }
}
