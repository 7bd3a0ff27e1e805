//! This crate contains the essential data types for reading DICOM content:
//! the attribute tag, the value representation code, value lengths,
//! data element headers and the primitive value sum type.
//!
//! It carries no I/O logic of its own.
//! Decoding from a byte source is implemented by
//! the `dcmpix-encoding` and `dcmpix-parser` crates.
#![deny(trivial_casts, trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(missing_docs)]

pub mod header;
pub mod tags;
pub mod value;

pub use crate::header::{DataElement, DataElementHeader, Length, Tag, VR};
pub use crate::value::{CastValueError, PrimitiveValue, ValueType, C};
