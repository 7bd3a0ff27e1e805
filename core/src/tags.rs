//! Attribute tag constants for the data elements
//! which this library gives a meaning to.

use crate::header::Tag;

/// Group number of the file meta information group.
/// Elements in this group are always encoded
/// in Explicit VR Little Endian.
pub const META_GROUP: u16 = 0x0002;

/// Transfer Syntax UID
pub const TRANSFER_SYNTAX_UID: Tag = Tag(0x0002, 0x0010);
/// Image Position (Patient)
pub const IMAGE_POSITION_PATIENT: Tag = Tag(0x0020, 0x0032);
/// Photometric Interpretation
pub const PHOTOMETRIC_INTERPRETATION: Tag = Tag(0x0028, 0x0004);
/// Rows
pub const ROWS: Tag = Tag(0x0028, 0x0010);
/// Columns
pub const COLUMNS: Tag = Tag(0x0028, 0x0011);
/// Pixel Spacing
pub const PIXEL_SPACING: Tag = Tag(0x0028, 0x0030);
/// Bits Allocated
pub const BITS_ALLOCATED: Tag = Tag(0x0028, 0x0100);
/// Bits Stored
pub const BITS_STORED: Tag = Tag(0x0028, 0x0101);
/// High Bit
pub const HIGH_BIT: Tag = Tag(0x0028, 0x0102);
/// Pixel Representation
pub const PIXEL_REPRESENTATION: Tag = Tag(0x0028, 0x0103);
/// Rescale Intercept
pub const RESCALE_INTERCEPT: Tag = Tag(0x0028, 0x1052);
/// Rescale Slope
pub const RESCALE_SLOPE: Tag = Tag(0x0028, 0x1053);
/// Pixel Data
pub const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);
