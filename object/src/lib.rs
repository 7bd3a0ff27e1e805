//! This crate contains a high-level abstraction for reading DICOM content:
//! at this level, an object is a dictionary of data elements indexed by
//! their attribute tags, obtained by parsing a DICOM Part 10 file.
//!
//! Reading is a single pass over a seekable byte source:
//! the 128-byte preamble is skipped, the `DICM` magic code is checked,
//! the meta group is read in Explicit VR Little Endian, and the rest of
//! the data set is read in the transfer syntax announced by the meta
//! group. Every recognized element lands in the returned object.
//!
//! # Examples
//!
//! ```no_run
//! use dcmpix_object::open_file;
//! # use dcmpix_object::Result;
//! use dcmpix_core::tags;
//! # fn main() -> Result<()> {
//! let obj = open_file("0001.dcm")?;
//! let rows = obj.element(tags::ROWS)?.uint16();
//! # Ok(())
//! # }
//! ```

use dcmpix_core::Tag;
use snafu::{Backtrace, Snafu};
use std::path::PathBuf;

pub mod file;
pub mod mem;

pub use crate::file::{from_reader, open_file};
pub use crate::mem::{FileDicomObject, InMemDicomObject};
pub use dcmpix_encoding::transfer_syntax::TransferSyntax;

/// The crate's main error type:
/// for everything which can go wrong while building a DICOM object.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// Could not open the file for reading.
    #[snafu(display("Could not open file '{}'", filename.display()))]
    OpenFile {
        filename: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// The content does not start with a DICOM preamble and magic code.
    #[snafu(display("not DICOM format"))]
    NotDicomFormat { backtrace: Backtrace },

    /// A meta group element could not be parsed.
    #[snafu(display("Could not parse meta group element at position {}", position))]
    ParseMetaElement {
        position: u64,
        #[snafu(backtrace)]
        source: dcmpix_parser::Error,
    },

    /// A data set element could not be parsed.
    #[snafu(display("Could not parse data set element at position {}", position))]
    ParseElement {
        position: u64,
        #[snafu(backtrace)]
        source: dcmpix_parser::Error,
    },

    /// An element with a zero tag was found in the data set.
    #[snafu(display("No tag id found at position {}", position))]
    NoTagId { position: u64, backtrace: Backtrace },

    /// The file declares a transfer syntax
    /// which this library cannot decode.
    #[snafu(display("Unsupported transfer syntax `{}`", uid))]
    UnsupportedTransferSyntax {
        uid: String,
        backtrace: Backtrace,
    },

    /// An element lookup by tag found nothing.
    #[snafu(display("No such data element {}", tag))]
    NoSuchDataElement { tag: Tag, backtrace: Backtrace },
}

/// The crate's result type.
pub type Result<T, E = Error> = std::result::Result<T, E>;
