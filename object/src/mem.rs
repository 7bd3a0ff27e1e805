//! This module contains the implementation for an in-memory DICOM object,
//! and the reading process which fills it from a Part 10 byte source.

use crate::{
    NoSuchDataElementSnafu, NoTagIdSnafu, NotDicomFormatSnafu, ParseElementSnafu,
    ParseMetaElementSnafu, Result, UnsupportedTransferSyntaxSnafu,
};
use dcmpix_core::header::DataElement;
use dcmpix_core::{tags, Tag};
use dcmpix_encoding::transfer_syntax::TransferSyntax;
use dcmpix_parser::stateful::decode::{FileHeaderDecoder, StatefulDecoder};
use snafu::{ensure, OptionExt, ResultExt};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::iter::FromIterator;

const DICM_MAGIC_CODE: [u8; 4] = [b'D', b'I', b'C', b'M'];

/// The number of preamble bytes before the magic code.
/// Their content carries no meaning to the parser.
const PREAMBLE_LENGTH: u64 = 128;

/// A DICOM data set that is fully contained in memory:
/// a mapping from attribute tags to decoded data elements.
///
/// Lookups are by tag. Insertion of an element whose tag is already
/// present replaces the previous element, so a tag occurring twice in a
/// file resolves to its last occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct InMemDicomObject {
    /// the element map
    entries: BTreeMap<Tag, DataElement>,
}

impl InMemDicomObject {
    /// Create a new empty DICOM object.
    pub fn create_empty() -> Self {
        InMemDicomObject {
            entries: BTreeMap::new(),
        }
    }

    /// Construct a DICOM object from an iterator of data elements.
    pub fn from_element_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = DataElement>,
    {
        iter.into_iter().collect()
    }

    /// Retrieve a particular DICOM element by its tag.
    pub fn element<T>(&self, tag: T) -> Result<&DataElement>
    where
        T: Into<Tag>,
    {
        let tag = tag.into();
        self.entries
            .get(&tag)
            .context(NoSuchDataElementSnafu { tag })
    }

    /// Retrieve a particular DICOM element by its tag,
    /// if it is present.
    pub fn get<T>(&self, tag: T) -> Option<&DataElement>
    where
        T: Into<Tag>,
    {
        self.entries.get(&tag.into())
    }

    /// Check whether an element with the given tag exists in the object.
    pub fn has_element<T>(&self, tag: T) -> bool
    where
        T: Into<Tag>,
    {
        self.entries.contains_key(&tag.into())
    }

    /// Insert a data element into the object,
    /// replacing (and returning) any previous element of the same tag.
    pub fn put(&mut self, elem: DataElement) -> Option<DataElement> {
        self.entries.insert(elem.tag(), elem)
    }

    /// Retrieve the number of elements in the object.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the object holds no elements.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Obtain an iterator over the elements of this object,
    /// in ascending tag order.
    pub fn iter(&self) -> btree_map::Values<'_, Tag, DataElement> {
        self.entries.values()
    }
}

impl FromIterator<DataElement> for InMemDicomObject {
    fn from_iter<I: IntoIterator<Item = DataElement>>(iter: I) -> Self {
        InMemDicomObject {
            entries: iter
                .into_iter()
                .map(|e| (e.tag(), e))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a InMemDicomObject {
    type Item = &'a DataElement;
    type IntoIter = btree_map::Values<'a, Tag, DataElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A DICOM object read from a Part 10 file:
/// the main data set plus the transfer syntax it was encoded in.
///
/// It dereferences to the inner [`InMemDicomObject`],
/// so all element lookups apply directly.
///
/// [`InMemDicomObject`]: struct.InMemDicomObject.html
#[derive(Debug, Clone, PartialEq)]
pub struct FileDicomObject {
    ts: TransferSyntax,
    obj: InMemDicomObject,
}

impl ::std::ops::Deref for FileDicomObject {
    type Target = InMemDicomObject;

    fn deref(&self) -> &Self::Target {
        &self.obj
    }
}

impl FileDicomObject {
    /// Create a file DICOM object from an already built data set
    /// and the transfer syntax it is meant to be encoded in.
    pub fn new(ts: TransferSyntax, obj: InMemDicomObject) -> Self {
        FileDicomObject { ts, obj }
    }

    /// The transfer syntax in which the main data set was encoded.
    pub fn transfer_syntax(&self) -> TransferSyntax {
        self.ts
    }

    /// Discard the file level information and
    /// retrieve the data set proper.
    pub fn into_inner(self) -> InMemDicomObject {
        self.obj
    }

    /// Create a DICOM object by reading from a seekable byte source.
    ///
    /// This function assumes the standard file encoding structure:
    /// a 128-byte preamble, the magic code, the file meta group,
    /// and the rest of the data set in the transfer syntax declared by
    /// the meta group. A stream which ends in the middle of the last
    /// data element still produces an object,
    /// holding every element read up to that point.
    pub fn from_reader<S>(src: S) -> Result<Self>
    where
        S: Read + Seek,
    {
        let mut src = BufReader::new(src);

        // skip the preamble and check the magic code
        let mut buf = [0u8; 4];
        src.seek(SeekFrom::Start(PREAMBLE_LENGTH))
            .ok()
            .context(NotDicomFormatSnafu)?;
        src.read_exact(&mut buf).ok().context(NotDicomFormatSnafu)?;
        ensure!(buf == DICM_MAGIC_CODE, NotDicomFormatSnafu);

        // read the meta group, always in Explicit VR Little Endian
        let mut meta_decoder =
            FileHeaderDecoder::file_header_decoder(src, PREAMBLE_LENGTH + 4);
        let mut entries = BTreeMap::new();
        let mut reached_eof = false;
        loop {
            let position = meta_decoder.position();
            let tag = match meta_decoder.decode_tag() {
                Ok(tag) => tag,
                Err(e) if e.is_stream_interruption() => {
                    // the file holds nothing but its meta group
                    reached_eof = true;
                    break;
                }
                Err(e) => return Err(e).context(ParseMetaElementSnafu { position }),
            };
            meta_decoder
                .rewind_tag()
                .context(ParseMetaElementSnafu { position })?;
            if tag.group() != tags::META_GROUP {
                break;
            }
            let header = meta_decoder
                .decode_header()
                .context(ParseMetaElementSnafu { position })?;
            let value = meta_decoder
                .read_value(&header)
                .context(ParseMetaElementSnafu { position })?;
            entries.insert(header.tag, DataElement::new(header, value));
        }

        // determine the transfer syntax of the rest of the data set;
        // an absent or unrecognized UID leaves the meta group default
        let mut ts = TransferSyntax::ExplicitVRLittleEndian;
        if let Some(e) = entries.get(&tags::TRANSFER_SYNTAX_UID) {
            if let Some(uid) = e.value().to_str() {
                match TransferSyntax::from_uid(&uid) {
                    Some(syntax) => ts = syntax,
                    None => tracing::warn!(
                        "Unrecognized transfer syntax `{}`, assuming Explicit VR Little Endian",
                        uid.trim_end_matches(|c| c == '\0' || c == ' '),
                    ),
                }
            }
        }
        ensure!(
            !ts.is_deflated(),
            UnsupportedTransferSyntaxSnafu { uid: ts.uid() }
        );

        if reached_eof {
            return Ok(FileDicomObject {
                ts,
                obj: InMemDicomObject { entries },
            });
        }

        // hand the source over to the decoder dictated by the syntax
        let (src, position) = meta_decoder.into_parts();
        let decoder = ts
            .decoder_for::<BufReader<S>>()
            .context(UnsupportedTransferSyntaxSnafu { uid: ts.uid() })?;
        let mut dataset =
            StatefulDecoder::new_with_position(src, decoder, ts.basic_decoder(), position);

        // main loop: read elements until the stream runs out
        loop {
            let position = dataset.position();
            let header = match dataset.decode_header() {
                Ok(header) => header,
                Err(e) if e.is_stream_interruption() => {
                    tracing::trace!("End of data set at position {}", position);
                    break;
                }
                Err(e) => return Err(e).context(ParseElementSnafu { position }),
            };
            ensure!(header.tag != Tag(0x0000, 0x0000), NoTagIdSnafu { position });
            let value = match dataset.read_value(&header) {
                Ok(value) => value,
                Err(e) if e.is_stream_interruption() => {
                    // a truncated trailing element:
                    // keep everything read up to this point
                    tracing::warn!(
                        "Value of element {} cut off at position {}",
                        header.tag,
                        position
                    );
                    break;
                }
                Err(e) => return Err(e).context(ParseElementSnafu { position }),
            };
            entries.insert(header.tag, DataElement::new(header, value));
        }

        Ok(FileDicomObject {
            ts,
            obj: InMemDicomObject { entries },
        })
    }
}
