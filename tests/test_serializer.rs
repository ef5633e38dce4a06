//! Integration tests for object serialization and the streaming writer.

use pdf_forge::object::{Dictionary, Object};
use pdf_forge::writer::object_serializer::{number, round_number};
use pdf_forge::writer::{ObjectSerializer, PdfWriter, Trailer};
use proptest::prelude::*;
use regex::Regex;

/// Undo the literal string escapes of a serialized ASCII string.
fn unescape(literal: &str) -> String {
    let inner = &literal[1..literal.len() - 1];
    let mut out = String::new();
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{08}'),
            Some('f') => out.push('\u{0C}'),
            Some(other) => out.push(other),
            None => {},
        }
    }
    out
}

/// Check every xref entry points at its `N 0 obj` line.
fn assert_offsets(bytes: &[u8]) {
    let text = String::from_utf8_lossy(bytes);
    let xref_at = text.rfind("\nxref\n").expect("xref section") + 1;
    let entries = Regex::new(r"(?m)^(\d{10}) (\d{5}) ([nf]) $").unwrap();
    let mut id = 0;
    for cap in entries.captures_iter(&text[xref_at..]) {
        if &cap[3] == "n" {
            let offset: usize = cap[1].parse().unwrap();
            let expected = format!("{} 0 obj", id);
            assert_eq!(&bytes[offset..offset + expected.len()], expected.as_bytes());
        }
        id += 1;
    }
    assert!(id > 1);
}

#[test]
fn test_literal_string_escapes() {
    let s = ObjectSerializer::new();
    let out = s
        .serialize_to_string(&Object::string("a(b)c\\d\n"))
        .unwrap();
    assert_eq!(out, "(a\\(b\\)c\\\\d\\n)");
}

#[test]
fn test_unicode_string_gets_bom() {
    let s = ObjectSerializer::new();
    let bytes = s.serialize(&Object::string("é")).unwrap();
    assert_eq!(bytes, b"(\xFE\xFF\x00\xE9)");
}

#[test]
fn test_numbers_out_of_range() {
    assert!(number(1e21).is_err());
    assert!(number(-1e21).is_err());
    assert!(number(f64::NAN).is_err());
    assert_eq!(number(-0.0).unwrap(), "0");
    assert_eq!(number(1.0000004).unwrap(), "1");
}

#[test]
fn test_writer_layout() {
    let mut writer = PdfWriter::new(Vec::new(), false);
    writer.write_header("1.3").unwrap();
    let mut catalog = Dictionary::new();
    catalog.insert("Type".into(), Object::name("Catalog"));
    let root = writer.alloc(catalog);
    let info = writer.alloc(Dictionary::new());
    writer.end(root).unwrap();
    writer.end(info).unwrap();
    writer
        .request_completion(Trailer {
            root,
            info,
            id: [7; 16],
        })
        .unwrap();
    let bytes = writer.into_inner().unwrap();
    let text = String::from_utf8_lossy(&bytes);

    assert!(bytes.starts_with(b"%PDF-1.3\n%\xFF\xFF\xFF\xFF\n"));
    assert!(text.contains("xref\n0 3\n0000000000 65535 f \n"));
    assert!(text.contains("/Size 3\n/Root 1 0 R\n/Info 2 0 R"));
    assert!(text.ends_with("%%EOF\n"));
    assert_offsets(&bytes);
}

#[test]
fn test_into_inner_before_completion() {
    let mut writer = PdfWriter::new(Vec::new(), false);
    let _open = writer.alloc(Dictionary::new());
    assert!(writer.into_inner().is_err());
}

proptest! {
    #[test]
    fn prop_number_round_trip(n in -1e15f64..1e15) {
        let text = number(n).unwrap();
        let parsed: f64 = text.parse().unwrap();
        prop_assert_eq!(parsed, round_number(n).unwrap());
    }

    #[test]
    fn prop_escapes_reverse(s in "[ -~\n\r\t\u{08}\u{0C}]{0,40}") {
        let out = ObjectSerializer::new()
            .serialize_to_string(&Object::string(s.clone()))
            .unwrap();
        prop_assert_eq!(unescape(&out), s);
    }

    #[test]
    fn prop_xref_waits_for_every_object(
        order in Just((0..12usize).collect::<Vec<_>>()).prop_shuffle()
    ) {
        let mut writer = PdfWriter::new(Vec::new(), true);
        writer.write_header("1.3").unwrap();
        let refs: Vec<_> = (0..12)
            .map(|i| {
                let mut d = Dictionary::new();
                d.insert("Index".into(), Object::Integer(i));
                writer.alloc(d)
            })
            .collect();
        writer
            .request_completion(Trailer { root: refs[0], info: refs[1], id: [0; 16] })
            .unwrap();
        for (n, &i) in order.iter().enumerate() {
            prop_assert!(!writer.is_finished());
            writer.write_line_to(refs[i], "0 0 m").unwrap();
            writer.end(refs[i]).unwrap();
            prop_assert_eq!(writer.pending(), 11 - n);
        }
        prop_assert!(writer.is_finished());
        let bytes = writer.into_inner().unwrap();
        assert_offsets(&bytes);
    }
}
