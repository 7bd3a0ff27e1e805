//! Module containing the transfer syntaxes recognized by this library
//! and the means of obtaining the right decoder for each of them.
//!
//! Only the native (uncompressed) syntaxes are decodable. The Deflated
//! Explicit VR Little Endian syntax is recognized, so that it can be
//! reported distinctly from an unknown UID, but no decoder is provided
//! for it.

use crate::decode::basic::BasicDecoder;
use crate::decode::explicit_be::ExplicitVRBigEndianDecoder;
use crate::decode::explicit_le::ExplicitVRLittleEndianDecoder;
use crate::decode::implicit_le::ImplicitVRLittleEndianDecoder;
use crate::decode::DecodeFrom;
use byteordered::Endianness;
use std::io::Read;

/// A data element header decoder with its type erased,
/// as resolved from a transfer syntax at run-time.
pub type DynDecoder<S> = Box<dyn DecodeFrom<S>>;

/// An enumeration of the transfer syntaxes recognized by this library.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub enum TransferSyntax {
    /// _Implicit VR Little Endian_, the default transfer syntax.
    ImplicitVRLittleEndian,
    /// _Explicit VR Little Endian_.
    ExplicitVRLittleEndian,
    /// _Deflated Explicit VR Little Endian_. Recognized but not decodable.
    DeflatedExplicitVRLittleEndian,
    /// _Explicit VR Big Endian_, retired from the standard
    /// but still found in archived files.
    ExplicitVRBigEndian,
}

impl TransferSyntax {
    /// Look up a transfer syntax by its unique identifier.
    ///
    /// The UID is compared for full equality after stripping trailing
    /// NUL and space padding. An exact match keeps the prefix-sharing
    /// UIDs (`1.2.840.10008.1.2`, `.1`, `.1.99`, `.2`) from shadowing
    /// one another, with no reliance on lookup order.
    /// `None` means the UID is not recognized at all.
    pub fn from_uid(uid: &str) -> Option<Self> {
        match uid.trim_end_matches(|c| c == '\0' || c == ' ') {
            "1.2.840.10008.1.2" => Some(TransferSyntax::ImplicitVRLittleEndian),
            "1.2.840.10008.1.2.1" => Some(TransferSyntax::ExplicitVRLittleEndian),
            "1.2.840.10008.1.2.1.99" => Some(TransferSyntax::DeflatedExplicitVRLittleEndian),
            "1.2.840.10008.1.2.2" => Some(TransferSyntax::ExplicitVRBigEndian),
            _ => None,
        }
    }

    /// Obtain this transfer syntax' unique identifier.
    pub fn uid(self) -> &'static str {
        match self {
            TransferSyntax::ImplicitVRLittleEndian => "1.2.840.10008.1.2",
            TransferSyntax::ExplicitVRLittleEndian => "1.2.840.10008.1.2.1",
            TransferSyntax::DeflatedExplicitVRLittleEndian => "1.2.840.10008.1.2.1.99",
            TransferSyntax::ExplicitVRBigEndian => "1.2.840.10008.1.2.2",
        }
    }

    /// Obtain the transfer syntax' name, as given by the standard.
    pub fn name(self) -> &'static str {
        match self {
            TransferSyntax::ImplicitVRLittleEndian => "Implicit VR Little Endian",
            TransferSyntax::ExplicitVRLittleEndian => "Explicit VR Little Endian",
            TransferSyntax::DeflatedExplicitVRLittleEndian => {
                "Deflated Explicit VR Little Endian"
            }
            TransferSyntax::ExplicitVRBigEndian => "Explicit VR Big Endian",
        }
    }

    /// Obtain the byte order of the data sets in this transfer syntax.
    pub fn endianness(self) -> Endianness {
        match self {
            TransferSyntax::ExplicitVRBigEndian => Endianness::Big,
            _ => Endianness::Little,
        }
    }

    /// Whether data element headers carry an explicit value representation.
    pub fn is_explicit_vr(self) -> bool {
        !matches!(self, TransferSyntax::ImplicitVRLittleEndian)
    }

    /// Whether the data set comes wrapped in a Deflate compression stream.
    pub fn is_deflated(self) -> bool {
        matches!(self, TransferSyntax::DeflatedExplicitVRLittleEndian)
    }

    /// Obtain a basic decoder matching this syntax' byte order.
    pub fn basic_decoder(self) -> BasicDecoder {
        BasicDecoder::new(self.endianness())
    }

    /// Obtain a data element header decoder for this transfer syntax.
    ///
    /// Returns `None` if the data cannot be read directly from the
    /// source, which is the case for the deflated syntax.
    pub fn decoder_for<S>(self) -> Option<DynDecoder<S>>
    where
        S: Read,
    {
        match self {
            TransferSyntax::ImplicitVRLittleEndian => {
                Some(Box::new(ImplicitVRLittleEndianDecoder::default()))
            }
            TransferSyntax::ExplicitVRLittleEndian => {
                Some(Box::new(ExplicitVRLittleEndianDecoder::default()))
            }
            TransferSyntax::ExplicitVRBigEndian => {
                Some(Box::new(ExplicitVRBigEndianDecoder::default()))
            }
            TransferSyntax::DeflatedExplicitVRLittleEndian => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TransferSyntax;
    use byteordered::Endianness;

    #[test]
    fn uid_round_trip() {
        for &ts in &[
            TransferSyntax::ImplicitVRLittleEndian,
            TransferSyntax::ExplicitVRLittleEndian,
            TransferSyntax::DeflatedExplicitVRLittleEndian,
            TransferSyntax::ExplicitVRBigEndian,
        ] {
            assert_eq!(TransferSyntax::from_uid(ts.uid()), Some(ts));
        }
    }

    #[test]
    fn prefix_sharing_uids_do_not_shadow() {
        assert_eq!(
            TransferSyntax::from_uid("1.2.840.10008.1.2"),
            Some(TransferSyntax::ImplicitVRLittleEndian)
        );
        assert_eq!(
            TransferSyntax::from_uid("1.2.840.10008.1.2.1"),
            Some(TransferSyntax::ExplicitVRLittleEndian)
        );
        assert_eq!(
            TransferSyntax::from_uid("1.2.840.10008.1.2.1.99"),
            Some(TransferSyntax::DeflatedExplicitVRLittleEndian)
        );
        assert_eq!(
            TransferSyntax::from_uid("1.2.840.10008.1.2.2"),
            Some(TransferSyntax::ExplicitVRBigEndian)
        );
    }

    #[test]
    fn padded_uids_are_accepted() {
        assert_eq!(
            TransferSyntax::from_uid("1.2.840.10008.1.2.1\0"),
            Some(TransferSyntax::ExplicitVRLittleEndian)
        );
        assert_eq!(
            TransferSyntax::from_uid("1.2.840.10008.1.2 "),
            Some(TransferSyntax::ImplicitVRLittleEndian)
        );
        // JPEG baseline, recognized by a full DICOM stack but not here
        assert_eq!(TransferSyntax::from_uid("1.2.840.10008.1.2.4.50"), None);
    }

    #[test]
    fn syntax_properties() {
        assert_eq!(
            TransferSyntax::ExplicitVRBigEndian.endianness(),
            Endianness::Big
        );
        assert!(!TransferSyntax::ImplicitVRLittleEndian.is_explicit_vr());
        assert!(TransferSyntax::ExplicitVRLittleEndian.is_explicit_vr());
        assert!(TransferSyntax::DeflatedExplicitVRLittleEndian.is_deflated());
        assert!(TransferSyntax::DeflatedExplicitVRLittleEndian
            .decoder_for::<&[u8]>()
            .is_none());
    }
}
