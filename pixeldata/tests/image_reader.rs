//! End-to-end tests reading whole synthetic Part 10 files
//! into pixel matrices.

use dcmpix_object::from_reader;
use dcmpix_pixeldata::{PixelDecoder, PixelMatrix};
use ndarray::arr2;
use std::io::Cursor;

const LEE_UID: &str = "1.2.840.10008.1.2.1\0";
const LEI_UID: &str = "1.2.840.10008.1.2\0";
const BEE_UID: &str = "1.2.840.10008.1.2.2\0";

fn part10(ts_uid: &str, body: &[u8]) -> Vec<u8> {
    let mut data = vec![0u8; 128];
    data.extend_from_slice(b"DICM");
    data.extend(element_short(
        true,
        0x0002,
        0x0010,
        b"UI",
        ts_uid.as_bytes(),
    ));
    data.extend_from_slice(body);
    data
}

fn element_short(le: bool, group: u16, element: u16, vr: &[u8; 2], value: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(8 + value.len());
    let len = value.len() as u16;
    if le {
        data.extend_from_slice(&group.to_le_bytes());
        data.extend_from_slice(&element.to_le_bytes());
        data.extend_from_slice(vr);
        data.extend_from_slice(&len.to_le_bytes());
    } else {
        data.extend_from_slice(&group.to_be_bytes());
        data.extend_from_slice(&element.to_be_bytes());
        data.extend_from_slice(vr);
        data.extend_from_slice(&len.to_be_bytes());
    }
    data.extend_from_slice(value);
    data
}

fn element_long(le: bool, group: u16, element: u16, vr: &[u8; 2], value: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(12 + value.len());
    let len = value.len() as u32;
    if le {
        data.extend_from_slice(&group.to_le_bytes());
        data.extend_from_slice(&element.to_le_bytes());
        data.extend_from_slice(vr);
        data.extend_from_slice(&[0, 0]);
        data.extend_from_slice(&len.to_le_bytes());
    } else {
        data.extend_from_slice(&group.to_be_bytes());
        data.extend_from_slice(&element.to_be_bytes());
        data.extend_from_slice(vr);
        data.extend_from_slice(&[0, 0]);
        data.extend_from_slice(&len.to_be_bytes());
    }
    data.extend_from_slice(value);
    data
}

fn element_implicit(group: u16, element: u16, value: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(8 + value.len());
    data.extend_from_slice(&group.to_le_bytes());
    data.extend_from_slice(&element.to_le_bytes());
    data.extend_from_slice(&(value.len() as u32).to_le_bytes());
    data.extend_from_slice(value);
    data
}

fn us(le: bool, value: u16) -> Vec<u8> {
    if le {
        value.to_le_bytes().to_vec()
    } else {
        value.to_be_bytes().to_vec()
    }
}

/// The image attributes of a 4x4, 8-bit unsigned MONOCHROME2 image
/// with pixel values 0 through 15, in explicit VR.
fn image_body_explicit(le: bool) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend(element_short(le, 0x0028, 0x0010, b"US", &us(le, 4)));
    body.extend(element_short(le, 0x0028, 0x0011, b"US", &us(le, 4)));
    body.extend(element_short(le, 0x0028, 0x0100, b"US", &us(le, 8)));
    body.extend(element_short(le, 0x0028, 0x0101, b"US", &us(le, 8)));
    body.extend(element_short(le, 0x0028, 0x0102, b"US", &us(le, 7)));
    body.extend(element_short(le, 0x0028, 0x0103, b"US", &us(le, 0)));
    body.extend(element_short(le, 0x0028, 0x0004, b"CS", b"MONOCHROME2 "));
    let pixels: Vec<u8> = (0..16).collect();
    body.extend(element_long(le, 0x7FE0, 0x0010, b"OW", &pixels));
    body
}

fn expected_4x4() -> PixelMatrix {
    PixelMatrix::U8(arr2(&[
        [0, 1, 2, 3],
        [4, 5, 6, 7],
        [8, 9, 10, 11],
        [12, 13, 14, 15],
    ]))
}

#[test]
fn minimal_little_endian_file() {
    let data = part10(LEE_UID, &image_body_explicit(true));
    let obj = from_reader(Cursor::new(data)).unwrap();
    let decoded = obj.decode_pixel_data().unwrap();

    let info = decoded.info();
    assert_eq!(info.rows, 4);
    assert_eq!(info.cols, 4);
    assert_eq!(info.bits_allocated, 8);
    assert_eq!(info.channels, 1);
    assert!(!info.is_signed);

    assert_eq!(decoded.to_matrix(true), expected_4x4());
}

#[test]
fn big_endian_variant_decodes_identically() {
    let le_data = part10(LEE_UID, &image_body_explicit(true));
    let be_data = part10(BEE_UID, &image_body_explicit(false));

    let le_obj = from_reader(Cursor::new(le_data)).unwrap();
    let be_obj = from_reader(Cursor::new(be_data)).unwrap();

    let le = le_obj.decode_pixel_data().unwrap();
    let be = be_obj.decode_pixel_data().unwrap();

    assert_eq!(le.info(), be.info());
    assert_eq!(le.to_matrix(true), be.to_matrix(true));
    assert_eq!(le.to_matrix(true), expected_4x4());
}

#[test]
fn implicit_vr_variant_decodes_identically() {
    let mut body = Vec::new();
    body.extend(element_implicit(0x0028, 0x0010, &us(true, 4)));
    body.extend(element_implicit(0x0028, 0x0011, &us(true, 4)));
    body.extend(element_implicit(0x0028, 0x0100, &us(true, 8)));
    body.extend(element_implicit(0x0028, 0x0101, &us(true, 8)));
    body.extend(element_implicit(0x0028, 0x0102, &us(true, 7)));
    body.extend(element_implicit(0x0028, 0x0103, &us(true, 0)));
    body.extend(element_implicit(0x0028, 0x0004, b"MONOCHROME2 "));
    let pixels: Vec<u8> = (0..16).collect();
    body.extend(element_implicit(0x7FE0, 0x0010, &pixels));

    let obj = from_reader(Cursor::new(part10(LEI_UID, &body))).unwrap();
    let decoded = obj.decode_pixel_data().unwrap();
    assert_eq!(decoded.info().rows, 4);
    assert_eq!(decoded.to_matrix(true), expected_4x4());
}

#[test]
fn rescale_without_unpadding() {
    // 16 bits allocated and 12 stored with high bit 11:
    // widths differ but the shift amount is zero
    let mut body = Vec::new();
    body.extend(element_short(true, 0x0028, 0x0010, b"US", &us(true, 1)));
    body.extend(element_short(true, 0x0028, 0x0011, b"US", &us(true, 1)));
    body.extend(element_short(true, 0x0028, 0x0100, b"US", &us(true, 16)));
    body.extend(element_short(true, 0x0028, 0x0101, b"US", &us(true, 12)));
    body.extend(element_short(true, 0x0028, 0x0102, b"US", &us(true, 11)));
    body.extend(element_short(true, 0x0028, 0x0103, b"US", &us(true, 0)));
    body.extend(element_short(true, 0x0028, 0x0004, b"CS", b"MONOCHROME2 "));
    body.extend(element_short(true, 0x0028, 0x1052, b"DS", b"-1.5 "));
    body.extend(element_short(true, 0x0028, 0x1053, b"DS", b"2.0 "));
    body.extend(element_long(true, 0x7FE0, 0x0010, b"OW", &0x0FFFu16.to_le_bytes()));

    let obj = from_reader(Cursor::new(part10(LEE_UID, &body))).unwrap();
    let decoded = obj.decode_pixel_data().unwrap();

    // no shift, then 2.0 * 4095 - 1.5
    assert_eq!(decoded.to_matrix(false), PixelMatrix::U16(arr2(&[[0x0FFF]])));
    assert_eq!(decoded.to_matrix(true), PixelMatrix::F32(arr2(&[[8188.5]])));
}

#[test]
fn rescale_with_unpadding() {
    // 16 bits allocated, 8 stored, high bit 15:
    // shift by 15 - 8 + 1 = 8 before rescale
    let mut body = Vec::new();
    body.extend(element_short(true, 0x0028, 0x0010, b"US", &us(true, 1)));
    body.extend(element_short(true, 0x0028, 0x0011, b"US", &us(true, 1)));
    body.extend(element_short(true, 0x0028, 0x0100, b"US", &us(true, 16)));
    body.extend(element_short(true, 0x0028, 0x0101, b"US", &us(true, 8)));
    body.extend(element_short(true, 0x0028, 0x0102, b"US", &us(true, 15)));
    body.extend(element_short(true, 0x0028, 0x0103, b"US", &us(true, 0)));
    body.extend(element_short(true, 0x0028, 0x0004, b"CS", b"MONOCHROME2 "));
    body.extend(element_short(true, 0x0028, 0x1052, b"DS", b"-1.5 "));
    body.extend(element_short(true, 0x0028, 0x1053, b"DS", b"2.0 "));
    body.extend(element_long(true, 0x7FE0, 0x0010, b"OW", &0xFFFFu16.to_le_bytes()));

    let obj = from_reader(Cursor::new(part10(LEE_UID, &body))).unwrap();
    let decoded = obj.decode_pixel_data().unwrap();

    // 0xFFFF >> 8 = 0x00FF, then 2.0 * 255 - 1.5
    assert_eq!(decoded.to_matrix(false), PixelMatrix::U16(arr2(&[[0x00FF]])));
    assert_eq!(decoded.to_matrix(true), PixelMatrix::F32(arr2(&[[508.5]])));
}

#[test]
fn decoding_is_idempotent() {
    let data = part10(LEE_UID, &image_body_explicit(true));
    let first = from_reader(Cursor::new(&data[..])).unwrap();
    let second = from_reader(Cursor::new(&data[..])).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.decode_pixel_data().unwrap().to_matrix(true),
        second.decode_pixel_data().unwrap().to_matrix(true)
    );
}
