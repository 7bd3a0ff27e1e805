//! This crate serves as a parent for the library crates of the dcmpix
//! project, a reader of DICOM image files.
//!
//! For reading a file into a keyed element store, see
//! [`object`](../dcmpix_object), and for rebuilding the pixel matrix
//! out of a parsed object, see [`pixeldata`](../dcmpix_pixeldata).

pub use dcmpix_core as core;
pub use dcmpix_encoding as encoding;
pub use dcmpix_object as object;
pub use dcmpix_parser as parser;
pub use dcmpix_pixeldata as pixeldata;

pub use dcmpix_core::{tags, Tag, VR};
pub use dcmpix_object::{from_reader, open_file, FileDicomObject};
pub use dcmpix_pixeldata::{ImageInfo, PixelDecoder, PixelMatrix};
