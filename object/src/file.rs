//! Convenience functions for reading DICOM objects from files
//! and other seekable byte sources.

use crate::mem::FileDicomObject;
use crate::{OpenFileSnafu, Result};
use snafu::ResultExt;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

/// Create a DICOM object by reading from a file at the given path.
///
/// The file is expected to use the standard Part 10 encoding structure:
/// 128-byte preamble, magic code, file meta group,
/// and the main data set.
pub fn open_file<P>(path: P) -> Result<FileDicomObject>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).context(OpenFileSnafu { filename: path })?;
    FileDicomObject::from_reader(file)
}

/// Create a DICOM object by reading from a seekable byte source,
/// such as an open file or an in-memory buffer.
pub fn from_reader<S>(src: S) -> Result<FileDicomObject>
where
    S: Read + Seek,
{
    FileDicomObject::from_reader(src)
}
