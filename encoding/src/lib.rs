//! This crate contains the low-level decoding machinery for DICOM data
//! element streams: basic decoders of primitive numbers in either byte
//! order, data element header decoders for each recognized transfer
//! syntax, and the transfer syntax registry proper.
//!
//! Value payload decoding, which requires state across elements,
//! lives in the `dcmpix-parser` crate.

pub mod decode;
pub mod transfer_syntax;

pub use crate::decode::{BasicDecode, Decode, DecodeFrom};
pub use crate::transfer_syntax::TransferSyntax;
