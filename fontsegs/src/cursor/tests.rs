use super::*;
use hex_literal::hex;

#[test]
fn window_advance() {
    let data = hex!("00 01 02 03 04 05");
    let mut w = Window::new(Block::new(&data, 100));
    assert_eq!(6, w.remaining());
    assert_eq!(100, w.file_offset());
    assert_eq!(Some(&data[..2]), w.peek(2));
    assert_eq!(&data[..4], w.advance(4));
    assert_eq!(2, w.remaining());
    assert_eq!(4, w.consumed());
    assert_eq!(104, w.file_offset());
    assert_eq!(None, w.peek(3));
    assert_eq!(Some(&data[4..]), w.peek(2));
}

#[test]
fn field_reader_offsets() {
    let data = hex!("12 34 FF FE 00 00 02 58 41 42");
    let mut r = FieldReader::new(&data, 4);
    assert_eq!(4, r.offset());
    assert_eq!(0x1234, r.u16().unwrap());
    assert_eq!(6, r.offset());
    assert_eq!(-2, r.i16().unwrap());
    assert_eq!(600, r.u32().unwrap());
    assert_eq!(b"AB", r.bytes(2).unwrap());
    assert_eq!(14, r.offset());
    assert_eq!(0, r.remaining());
}

#[test]
fn field_reader_past_end() {
    let data = hex!("12");
    let mut r = FieldReader::new(&data, 0);
    assert!(matches!(r.u16(), Err(crate::Error::ParseError(_))));
    assert_eq!(&[0x12], r.bytes(1).unwrap());
}

#[test]
fn field_reader_u64() {
    let data = hex!("FF FF FF FF FF FF FF F8");
    let mut r = FieldReader::new(&data, 0);
    assert_eq!(0xFFFF_FFFF_FFFF_FFF8, r.u64().unwrap());
}
