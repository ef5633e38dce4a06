//! Integration tests for whole documents.

use flate2::read::ZlibDecoder;
use pdf_forge::{
    Destination, DocumentInfo, DocumentOptions, Error, PageOptions, PageSize, PdfDocument,
    TextOptions,
};
use regex::Regex;
use std::io::Read;
use tempfile::tempdir;

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

/// Raw stream bytes of object `id`.
fn stream_of(bytes: &[u8], id: u32) -> Vec<u8> {
    let header = format!("\n{} 0 obj\n", id);
    let obj = find(bytes, header.as_bytes(), 0).expect("object present");
    let start = find(bytes, b"stream\n", obj).expect("stream keyword") + 7;
    let end = find(bytes, b"\nendstream", start).expect("endstream keyword");
    bytes[start..end].to_vec()
}

fn inflate(data: &[u8]) -> String {
    let mut out = String::new();
    ZlibDecoder::new(data).read_to_string(&mut out).unwrap();
    out
}

fn xref_offsets(bytes: &[u8]) -> Vec<usize> {
    let text = String::from_utf8_lossy(bytes);
    let xref_at = text.rfind("\nxref\n").expect("xref section");
    let entries = Regex::new(r"(?m)^(\d{10}) 00000 n $").unwrap();
    entries
        .captures_iter(&text[xref_at..])
        .map(|c| c[1].parse().unwrap())
        .collect()
}

fn hello() -> Vec<u8> {
    let mut doc = PdfDocument::new(DocumentOptions::default()).unwrap();
    doc.text("Hello", None, TextOptions::new()).unwrap();
    doc.finish().unwrap()
}

#[test]
fn test_hello_object_count() {
    let bytes = hello();
    let text = String::from_utf8_lossy(&bytes);
    let objects = Regex::new(r"(?m)^\d+ 0 obj$").unwrap();
    assert_eq!(objects.find_iter(&text).count(), 7);
    assert!(text.contains("xref\n0 8\n"));
    assert!(text.contains("/Size 8"));
    assert!(text.contains("/Root 2 0 R"));
    assert!(text.contains("/Info 7 0 R"));
}

#[test]
fn test_hello_content_is_compressed() {
    let bytes = hello();
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/Filter /FlateDecode"));
    let content = inflate(&stream_of(&bytes, 3));
    assert!(content.starts_with("1 0 0 -1 0 792 cm\n"));
    assert!(content.contains("/F1 12 Tf"));
    assert!(content.contains("[<48656C6C6F> 0] TJ"));
}

#[test]
fn test_hello_offsets() {
    let bytes = hello();
    let offsets = xref_offsets(&bytes);
    assert_eq!(offsets.len(), 7);
    for (i, offset) in offsets.iter().enumerate() {
        let expected = format!("{} 0 obj", i + 1);
        assert_eq!(&bytes[*offset..*offset + expected.len()], expected.as_bytes());
    }
    let text = String::from_utf8_lossy(&bytes);
    let startxref: usize = text
        .rsplit("startxref\n")
        .next()
        .and_then(|s| s.lines().next())
        .and_then(|s| s.parse().ok())
        .unwrap();
    assert_eq!(&bytes[startxref..startxref + 4], b"xref");
}

#[test]
fn test_info_and_standard_font() {
    let options = DocumentOptions::default()
        .with_compress(false)
        .with_info(DocumentInfo::new().title("Report").author("Ada"));
    let mut doc = PdfDocument::new(options).unwrap();
    doc.text("x", None, TextOptions::new()).unwrap();
    let text = String::from_utf8_lossy(&doc.finish().unwrap()).to_string();
    assert!(text.contains("/Title (Report)"));
    assert!(text.contains("/Author (Ada)"));
    assert!(text.contains("/Producer (pdf_forge)"));
    assert!(text.contains("/BaseFont /Helvetica\n/Subtype /Type1\n/Encoding /WinAnsiEncoding"));
    assert!(Regex::new(r"/CreationDate \(D:\d{14}Z\)").unwrap().is_match(&text));
}

#[test]
fn test_many_pages_and_page_sizes() {
    let mut doc = PdfDocument::new(DocumentOptions::default().with_compress(false)).unwrap();
    doc.add_page(Some(PageOptions::new().with_size(PageSize::A4)))
        .unwrap();
    doc.add_page(Some(
        PageOptions::new().with_size(PageSize::LETTER.landscape()),
    ))
    .unwrap();
    assert_eq!(doc.page_count(), 3);
    let text = String::from_utf8_lossy(&doc.finish().unwrap()).to_string();
    assert!(text.contains("/Count 3"));
    assert!(text.contains("/MediaBox [0 0 595.28 841.89]"));
    assert!(text.contains("/MediaBox [0 0 792 612]"));
}

#[test]
fn test_buffered_pages_accept_late_content() {
    let options = DocumentOptions::default()
        .with_compress(false)
        .with_buffer_pages(true);
    let mut doc = PdfDocument::new(options).unwrap();
    doc.add_page(None).unwrap().add_page(None).unwrap();
    let range = doc.buffered_page_range();
    assert_eq!((range.start, range.count), (0, 3));

    for i in 0..range.count {
        doc.switch_to_page(i).unwrap();
        doc.text(
            &(i + 1).to_string(),
            Some((72.0, 700.0)),
            TextOptions::new(),
        )
        .unwrap();
    }
    assert!(matches!(
        doc.switch_to_page(3),
        Err(Error::PageOutOfRange { index: 3, .. })
    ));
    let text = String::from_utf8_lossy(&doc.finish().unwrap()).to_string();
    assert!(text.contains("[<32> 0] TJ"));
    assert_eq!(text.matches("BT\n").count(), 3);
    assert_eq!(text.matches("/Type /Page\n").count(), 3);
}

#[test]
fn test_long_text_flows_to_new_pages() {
    let mut doc = PdfDocument::new(DocumentOptions::default()).unwrap();
    let paragraph = "All work and no play makes a dull document. ".repeat(300);
    doc.text(&paragraph, None, TextOptions::new().with_align(pdf_forge::Align::Justify))
        .unwrap();
    let pages = doc.page_count();
    assert!(pages >= 3);
    let bytes = doc.finish().unwrap();
    // Pages and Root, three objects per page, the font and the info dictionary
    assert_eq!(xref_offsets(&bytes).len(), 2 + 3 * pages + 2);
}

#[test]
fn test_box_sized_in_lines_holds_every_line() {
    for lines in 1..=12usize {
        let mut doc = PdfDocument::new(DocumentOptions::default().with_compress(false)).unwrap();
        let line_height = doc.current_line_height(true);
        // "a " is 10.008 wide at 12pt, so each word takes a line of its own
        doc.text(
            &"a ".repeat(40),
            None,
            TextOptions::new()
                .with_width(20.0)
                .with_height(line_height * lines as f64),
        )
        .unwrap();
        let text = String::from_utf8_lossy(&doc.finish().unwrap()).to_string();
        assert_eq!(text.matches("] TJ").count(), lines, "box {} lines tall", lines);
    }
}

#[test]
fn test_named_destination_and_internal_link() {
    let mut doc = PdfDocument::new(DocumentOptions::default().with_compress(false)).unwrap();
    doc.text(
        "Chapter 1",
        None,
        TextOptions::new().with_destination("chapter-1"),
    )
    .unwrap();
    doc.add_page(None).unwrap();
    doc.text("Back to chapter 1", None, TextOptions::new().with_link(0usize))
        .unwrap();
    doc.add_named_destination("end", Destination::Fit).unwrap();
    assert!(matches!(
        doc.link(0.0, 0.0, 1.0, 1.0, 9usize),
        Err(Error::NoSuchPage(9))
    ));
    let text = String::from_utf8_lossy(&doc.finish().unwrap()).to_string();
    assert!(text.contains("/Dests"));
    assert!(text.contains("(chapter-1) [5 0 R /XYZ 72 720 null]"));
    assert!(text.contains("/S /GoTo"));
}

#[test]
fn test_options_from_json() {
    let options = DocumentOptions::from_json(
        r#"{"compress": false, "pdfVersion": "1.7", "bufferPages": true}"#,
    )
    .unwrap();
    let doc = PdfDocument::new(options).unwrap();
    let bytes = doc.finish().unwrap();
    assert!(bytes.starts_with(b"%PDF-1.7\n"));
}

#[test]
fn test_write_to_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.pdf");
    let mut doc = PdfDocument::new(DocumentOptions::default()).unwrap();
    doc.text("saved", None, TextOptions::new()).unwrap();
    doc.write_to_file(&path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.3"));
    assert!(bytes.ends_with(b"%%EOF\n"));
}

#[test]
fn test_streaming_to_custom_sink() {
    let sink: Vec<u8> = Vec::with_capacity(4096);
    let mut doc = PdfDocument::with_writer(sink, DocumentOptions::default()).unwrap();
    doc.rect(10.0, 10.0, 20.0, 20.0).unwrap().stroke().unwrap();
    doc.end().unwrap();
    assert!(doc.end().is_err());
    let bytes = doc.into_inner().unwrap();
    assert_eq!(xref_offsets(&bytes).len(), 6);
}
