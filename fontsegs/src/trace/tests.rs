use super::*;
use test_case::test_case;

#[test_case(OffsetFormat::Decimal, 1234 => "1234")]
#[test_case(OffsetFormat::Hexadecimal, 1234 => "000004d2")]
fn offset_format(format: OffsetFormat, offset: u64) -> String {
    format.format(offset)
}

#[test]
fn emitter_offsets_and_levels() {
    let mut rows = vec![];
    let mut out = Emitter::new(&mut rows, 1);
    out.begin(100, "BR");
    out.segment(0, "Segment Type:", "BR");
    out.field(4, "X Resolution:", "600 dots per inch");
    out.note("Supports:", "more");
    assert_eq!(
        rows,
        vec![
            Row {
                kind: RowKind::Segment,
                offset: Some(100),
                level: 1,
                col1: "BR".to_owned(),
                col2: "Segment Type:".to_owned(),
                col3: "BR".to_owned(),
            },
            Row {
                kind: RowKind::Field,
                offset: Some(104),
                level: 2,
                col1: "BR".to_owned(),
                col2: "X Resolution:".to_owned(),
                col3: "600 dots per inch".to_owned(),
            },
            Row {
                kind: RowKind::Field,
                offset: None,
                level: 3,
                col1: "BR".to_owned(),
                col2: "Supports:".to_owned(),
                col3: "more".to_owned(),
            },
        ]
    );
}

#[test]
fn binary_rows() {
    let bytes: Vec<u8> = (0..20).collect();
    let mut rows = vec![];
    let mut out = Emitter::new(&mut rows, 0);
    out.begin(10, "");
    out.binary(2, &bytes);
    assert_eq!(2, rows.len());
    assert_eq!(Some(12), rows[0].offset);
    assert_eq!("00010203 04050607 08090A0B 0C0D0E0F", rows[0].col3);
    assert_eq!(Some(28), rows[1].offset);
    assert_eq!("10111213", rows[1].col3);
}

#[test_log::test]
fn warning_rows() {
    let mut rows = vec![];
    let mut out = Emitter::new(&mut rows, 0);
    out.begin(0, "GT");
    out.warning(6, &Diagnostic::new("first").line("second"));
    assert_eq!(2, rows.len());
    assert!(rows.iter().all(|r| r.kind == RowKind::Warning));
    assert_eq!(Some(6), rows[0].offset);
    assert_eq!(None, rows[1].offset);
    assert_eq!("second", rows[1].col3);
}

#[test]
fn row_display() {
    let row = Row {
        kind: RowKind::Field,
        offset: Some(255),
        level: 1,
        col1: "PA".to_owned(),
        col2: "PANOSE:".to_owned(),
        col3: "2-11-6-4".to_owned(),
    };
    let s = row.display(OffsetFormat::Hexadecimal).to_string();
    assert!(s.starts_with("  000000ff"));
    assert!(s.contains("Field"));
    assert!(s.ends_with("2-11-6-4"));
}
