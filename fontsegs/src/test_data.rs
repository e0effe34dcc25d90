//! Segment streams shared by the unit tests.

use hex_literal::hex;

pub const COPYRIGHT: &[u8] = b"Copyright (c) 2024 Example Type Foundry. All rights reserved.";

/// Narrow segment: tag, 16 bit size, body.
pub fn seg(tag: &[u8; 2], body: &[u8]) -> Vec<u8> {
    let mut r = tag.to_vec();
    r.extend((body.len() as u16).to_be_bytes());
    r.extend(body);
    r
}

/// Wide segment: tag, 32 bit size, body.
pub fn seg_wide(tag: &[u8; 2], body: &[u8]) -> Vec<u8> {
    let mut r = tag.to_vec();
    r.extend((body.len() as u32).to_be_bytes());
    r.extend(body);
    r
}

/// Global TrueType body with one 'cmap' table of 8 bytes following the
/// directory.
pub fn gt_body() -> Vec<u8> {
    let mut r = hex!("00010000 0001 0010 0000 0000").to_vec();
    r.extend(b"cmap");
    r.extend(hex!("00000000 0000001C 00000008"));
    r.extend(hex!("00 04 00 00 00 01 00 20"));
    r
}

fn sample_with(segment: fn(&[u8; 2], &[u8]) -> Vec<u8>, null: &[u8]) -> Vec<u8> {
    [
        segment(b"BR", &hex!("0258 0258")),
        segment(b"CC", &hex!("FFFFFFFF FFFFFFFE")),
        segment(b"PA", &hex!("02 0B 06 04 02 02 02 02 02 04")),
        segment(b"CP", COPYRIGHT),
        segment(b"GT", &gt_body()),
        segment(b"VT", &hex!("0001 0002 FFFF FFFF")),
        segment(b"VR", &hex!("0000 FF9C")),
        segment(b"AP", &hex!("01 02 03")),
        segment(b"VE", &hex!("0001 0020 007E")),
        segment(b"GC", &hex!("0000 0020 0001 0041 005A 002D")),
        segment(b"VI", b"Example vendor"),
        null.to_vec(),
    ]
    .concat()
}

/// One well-formed segment of most known types, terminated by a null segment.
pub fn sample_stream() -> Vec<u8> {
    sample_with(seg, &hex!("FFFF 0000"))
}

/// `sample_stream()` with wide headers.
pub fn sample_stream_wide() -> Vec<u8> {
    sample_with(seg_wide, &hex!("FFFF 0000 0000"))
}

/// BR, then a GT segment whose table passes the segment end, then VR.
pub fn invalid_stream() -> Vec<u8> {
    let mut body = gt_body();
    body[27] = 16;
    [
        seg(b"BR", &hex!("0258 0258")),
        seg(b"GT", &body),
        seg(b"VR", &hex!("0000 FF9C")),
    ]
    .concat()
}
