use strata_core::{Cell, ColumnKind, StrataError, decode_delimited};

#[test]
fn headerless_columns_are_named_by_position() {
    let t = decode_delimited(b"2023-01-01 00:00,1.5,ok\n2023-01-01 00:01,2,bad\n", "a.csv", b',')
        .unwrap();
    assert_eq!(t.column_names().collect::<Vec<_>>(), ["0", "1", "2"]);
    assert_eq!(t.height(), 2);
    assert_eq!(t.column("0").unwrap().kind(), ColumnKind::Text);
    assert_eq!(t.column("1").unwrap().kind(), ColumnKind::Numeric);
    assert_eq!(t.cell(1, "1"), Some(Cell::Number(2.0)));
}

#[test]
fn empty_fields_and_short_rows_are_null() {
    let t = decode_delimited(b"a,1,x\nb,,y\nc\n", "b.csv", b',').unwrap();
    assert_eq!(t.cell(1, "1"), Some(Cell::Null));
    assert_eq!(t.cell(2, "1"), Some(Cell::Null));
    assert_eq!(t.cell(2, "2"), Some(Cell::Null));
    assert_eq!(t.column("1").unwrap().kind(), ColumnKind::Numeric);
}

#[test]
fn bom_and_custom_delimiter() {
    let t = decode_delimited("\u{feff}k;1\nj;2\n".as_bytes(), "c.csv", b';').unwrap();
    assert_eq!(t.cell(0, "0"), Some(Cell::Text("k".into())));
    assert_eq!(t.cell(1, "1"), Some(Cell::Number(2.0)));
}

#[test]
fn long_row_is_a_decode_error() {
    let err = decode_delimited(b"a,1\nb,2,3\n", "d.csv", b',').unwrap_err();
    assert!(matches!(err, StrataError::Decode { ref dataset, .. } if dataset == "d.csv"));
}

#[test]
fn invalid_utf8_is_a_decode_error() {
    let err = decode_delimited(&[0x61, 0x2c, 0xff, 0xfe, b'\n'], "e.csv", b',').unwrap_err();
    assert!(matches!(err, StrataError::Decode { .. }));
}

#[test]
fn empty_input_has_no_columns() {
    let t = decode_delimited(b"", "f.csv", b',').unwrap();
    assert_eq!(t.width(), 0);
    assert_eq!(t.height(), 0);
}
