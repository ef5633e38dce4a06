//! Streaming PDF writer.
//!
//! Owns the output sink and the bookkeeping that ties indirect objects to
//! the cross-reference table: the running byte offset, the per-object
//! offsets, and the count of objects still open. Objects are written the
//! moment they end, in whatever order that happens. The xref table and
//! trailer follow once completion has been requested and nothing is pending.

use super::object_serializer::ObjectSerializer;
use super::reference::PdfReference;
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, ObjectRef};
use std::collections::HashMap;
use std::io::Write;

/// Values the trailer needs besides the xref size.
#[derive(Debug, Clone)]
pub struct Trailer {
    /// Document catalog
    pub root: ObjectRef,
    /// Info dictionary
    pub info: ObjectRef,
    /// File identifier, written twice
    pub id: [u8; 16],
}

/// Low-level writer for indirect objects and the file skeleton.
pub struct PdfWriter<W: Write> {
    sink: W,
    serializer: ObjectSerializer,
    compress: bool,
    /// Bytes emitted so far
    offset: usize,
    /// Byte offset per object id (index = id - 1), unset while the object is open
    offsets: Vec<Option<usize>>,
    open: HashMap<u32, PdfReference>,
    pending: usize,
    trailer: Option<Trailer>,
    finished: bool,
}

impl<W: Write> PdfWriter<W> {
    /// Create a writer over `sink`. `compress` is the default for new stream bodies.
    pub fn new(sink: W, compress: bool) -> Self {
        Self {
            sink,
            serializer: ObjectSerializer::new(),
            compress,
            offset: 0,
            offsets: Vec::new(),
            open: HashMap::new(),
            pending: 0,
            trailer: None,
            finished: false,
        }
    }

    /// Write the `%PDF-x.y` header followed by the binary marker comment.
    pub fn write_header(&mut self, version: &str) -> Result<()> {
        self.write_line(&format!("%PDF-{}", version))?;
        self.write_bytes(b"%\xFF\xFF\xFF\xFF\n")
    }

    /// Append raw bytes to the output, advancing the offset.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.sink.write_all(bytes)?;
        self.offset += bytes.len();
        Ok(())
    }

    /// Append a line of text to the output.
    pub fn write_line(&mut self, text: &str) -> Result<()> {
        self.write_bytes(text.as_bytes())?;
        self.write_bytes(b"\n")
    }

    /// Allocate a new indirect object with the given dictionary.
    pub fn alloc(&mut self, data: Dictionary) -> ObjectRef {
        self.alloc_with_compression(data, self.compress)
    }

    /// Allocate a new indirect object, overriding the compression default.
    pub fn alloc_with_compression(&mut self, data: Dictionary, compress: bool) -> ObjectRef {
        let id = self.offsets.len() as u32 + 1;
        self.offsets.push(None);
        self.pending += 1;
        let reference = PdfReference::new(id, data, compress);
        let handle = reference.object_ref();
        self.open.insert(id, reference);
        handle
    }

    /// Borrow an open object.
    pub fn get_mut(&mut self, r: ObjectRef) -> Result<&mut PdfReference> {
        self.open.get_mut(&r.id).ok_or(Error::UnknownReference(r.id))
    }

    /// Borrow an open object's dictionary.
    pub fn data_mut(&mut self, r: ObjectRef) -> Result<&mut Dictionary> {
        Ok(&mut self.get_mut(r)?.data)
    }

    /// Whether `r` has been allocated and not ended yet.
    pub fn is_open(&self, r: ObjectRef) -> bool {
        self.open.contains_key(&r.id)
    }

    /// Append raw bytes to an open object's stream body.
    pub fn write_to(&mut self, r: ObjectRef, chunk: &[u8]) -> Result<()> {
        self.get_mut(r)?.write(chunk)
    }

    /// Append a line to an open object's stream body.
    pub fn write_line_to(&mut self, r: ObjectRef, text: &str) -> Result<()> {
        self.get_mut(r)?.write_line(text)
    }

    /// End an object: write it to the output and record its offset.
    pub fn end(&mut self, r: ObjectRef) -> Result<()> {
        let reference = self.open.remove(&r.id).ok_or(Error::UnknownReference(r.id))?;
        let finished = reference.finish()?;

        let offset = self.offset;
        self.write_line(&format!("{} {} obj", r.id, r.gen))?;
        let dict = self
            .serializer
            .serialize(&Object::Dictionary(finished.data))?;
        self.write_bytes(&dict)?;
        self.write_bytes(b"\n")?;
        if let Some(stream) = finished.stream {
            self.write_line("stream")?;
            self.write_bytes(&stream)?;
            self.write_line("\nendstream")?;
        }
        self.write_line("endobj")?;
        log::debug!("finalized object {} at offset {}", r.id, offset);

        self.object_ended(r.id, offset)
    }

    /// End an object after writing one last line to it.
    pub fn end_with_line(&mut self, r: ObjectRef, text: &str) -> Result<()> {
        self.write_line_to(r, text)?;
        self.end(r)
    }

    fn object_ended(&mut self, id: u32, offset: usize) -> Result<()> {
        if let Some(slot) = self.offsets.get_mut(id as usize - 1) {
            *slot = Some(offset);
        }
        self.pending -= 1;
        if self.pending == 0 && self.trailer.is_some() && !self.finished {
            self.write_xref()?;
        }
        Ok(())
    }

    /// Ask for the xref table and trailer.
    ///
    /// They are written right away when no object is open, otherwise as
    /// soon as the last open object ends.
    pub fn request_completion(&mut self, trailer: Trailer) -> Result<()> {
        if self.trailer.is_some() {
            return Err(Error::AlreadyEnded);
        }
        self.trailer = Some(trailer);
        if self.pending == 0 {
            self.write_xref()?;
        } else {
            log::debug!("completion requested with {} pending objects", self.pending);
        }
        Ok(())
    }

    fn write_xref(&mut self) -> Result<()> {
        let trailer = match &self.trailer {
            Some(t) => t.clone(),
            None => return Ok(()),
        };
        let xref_offset = self.offset;
        let size = self.offsets.len() + 1;

        self.write_line("xref")?;
        self.write_line(&format!("0 {}", size))?;
        self.write_line("0000000000 65535 f ")?;
        let offsets = self.offsets.clone();
        for (index, offset) in offsets.iter().enumerate() {
            let offset = offset.unwrap_or_else(|| {
                log::warn!("object {} has no recorded offset", index + 1);
                0
            });
            self.write_line(&format!("{:010} 00000 n ", offset))?;
        }

        let id = Object::hex(trailer.id.to_vec());
        let dict = Object::dict(vec![
            ("Size", Object::from(size)),
            ("Root", Object::Reference(trailer.root)),
            ("Info", Object::Reference(trailer.info)),
            ("ID", Object::Array(vec![id.clone(), id])),
        ]);
        self.write_line("trailer")?;
        let bytes = self.serializer.serialize(&dict)?;
        self.write_bytes(&bytes)?;
        self.write_bytes(b"\n")?;
        self.write_line("startxref")?;
        self.write_line(&xref_offset.to_string())?;
        self.write_line("%%EOF")?;
        self.sink.flush()?;
        self.finished = true;
        log::debug!("wrote xref with {} entries at offset {}", size, xref_offset);
        Ok(())
    }

    /// Bytes written so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of allocated objects.
    pub fn object_count(&self) -> usize {
        self.offsets.len()
    }

    /// Number of objects allocated but not yet ended.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Whether the trailer and `%%EOF` have been written.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether completion has been requested.
    pub fn completion_requested(&self) -> bool {
        self.trailer.is_some()
    }

    /// Recover the sink once the file is complete.
    pub fn into_inner(self) -> Result<W> {
        if !self.finished {
            return Err(Error::PendingObjects(self.pending));
        }
        Ok(self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trailer(root: ObjectRef, info: ObjectRef) -> Trailer {
        Trailer {
            root,
            info,
            id: [0xAB; 16],
        }
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut w = PdfWriter::new(Vec::new(), false);
        assert_eq!(w.alloc(Dictionary::new()).id, 1);
        assert_eq!(w.alloc(Dictionary::new()).id, 2);
        assert_eq!(w.pending(), 2);
        assert_eq!(w.object_count(), 2);
    }

    #[test]
    fn test_header() {
        let mut w = PdfWriter::new(Vec::new(), false);
        w.write_header("1.3").unwrap();
        assert_eq!(w.offset(), 15);
        let root = w.alloc(Dictionary::new());
        w.end(root).unwrap();
        w.request_completion(trailer(root, root)).unwrap();
        let out = w.into_inner().unwrap();
        assert!(out.starts_with(b"%PDF-1.3\n%\xFF\xFF\xFF\xFF\n"));
    }

    #[test]
    fn test_object_layout_without_stream() {
        let mut w = PdfWriter::new(Vec::new(), false);
        let r = w.alloc(Object::dict(vec![("Type", Object::name("Catalog"))])
            .as_dict()
            .cloned()
            .unwrap());
        w.end(r).unwrap();
        w.request_completion(trailer(r, r)).unwrap();
        let out = String::from_utf8(w.into_inner().unwrap()).unwrap();
        assert!(out.starts_with("1 0 obj\n<<\n/Type /Catalog\n>>\nendobj\n"));
    }

    #[test]
    fn test_object_layout_with_stream() {
        let mut w = PdfWriter::new(Vec::new(), false);
        let r = w.alloc(Dictionary::new());
        w.write_line_to(r, "q").unwrap();
        w.end(r).unwrap();
        w.request_completion(trailer(r, r)).unwrap();
        let out = String::from_utf8(w.into_inner().unwrap()).unwrap();
        assert!(out.starts_with("1 0 obj\n<<\n/Length 2\n>>\nstream\nq\n\nendstream\nendobj\n"));
    }

    #[test]
    fn test_xref_waits_for_pending_objects() {
        let mut w = PdfWriter::new(Vec::new(), false);
        let a = w.alloc(Dictionary::new());
        let b = w.alloc(Dictionary::new());
        let c = w.alloc(Dictionary::new());
        w.end(b).unwrap();
        w.request_completion(trailer(a, c)).unwrap();
        assert!(!w.is_finished());
        w.end(c).unwrap();
        assert!(!w.is_finished());
        w.end(a).unwrap();
        assert!(w.is_finished());
    }

    #[test]
    fn test_into_inner_before_finish_fails() {
        let mut w = PdfWriter::new(Vec::new(), false);
        w.alloc(Dictionary::new());
        assert!(matches!(w.into_inner(), Err(Error::PendingObjects(1))));
    }

    #[test]
    fn test_double_completion_fails() {
        let mut w = PdfWriter::new(Vec::new(), false);
        let r = w.alloc(Dictionary::new());
        w.request_completion(trailer(r, r)).unwrap();
        assert!(matches!(
            w.request_completion(trailer(r, r)),
            Err(Error::AlreadyEnded)
        ));
    }

    #[test]
    fn test_unknown_reference() {
        let mut w = PdfWriter::new(Vec::new(), false);
        let r = w.alloc(Dictionary::new());
        w.end(r).unwrap();
        assert!(matches!(w.end(r), Err(Error::UnknownReference(1))));
        assert!(w.write_line_to(r, "x").is_err());
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let mut w = PdfWriter::new(Vec::new(), false);
        w.write_header("1.3").unwrap();
        let a = w.alloc(Dictionary::new());
        let b = w.alloc(Dictionary::new());
        w.end(b).unwrap();
        w.end(a).unwrap();
        w.request_completion(trailer(a, b)).unwrap();
        let out = w.into_inner().unwrap();
        let text = String::from_utf8_lossy(&out).to_string();

        let xref_pos = text.find("xref\n").unwrap();
        let entries: Vec<usize> = text[xref_pos..]
            .lines()
            .skip(3)
            .take(2)
            .map(|l| l[..10].parse().unwrap())
            .collect();
        assert!(out[entries[0]..].starts_with(b"1 0 obj"));
        assert!(out[entries[1]..].starts_with(b"2 0 obj"));
        assert!(entries[1] < entries[0]);

        let startxref: usize = text
            .lines()
            .skip_while(|l| *l != "startxref")
            .nth(1)
            .unwrap()
            .parse()
            .unwrap();
        assert!(out[startxref..].starts_with(b"xref"));
    }

    #[test]
    fn test_trailer_contents() {
        let mut w = PdfWriter::new(Vec::new(), false);
        let a = w.alloc(Dictionary::new());
        let b = w.alloc(Dictionary::new());
        w.end(a).unwrap();
        w.end(b).unwrap();
        w.request_completion(trailer(a, b)).unwrap();
        let text = String::from_utf8(w.into_inner().unwrap()).unwrap();
        assert!(text.contains("xref\n0 3\n0000000000 65535 f \n"));
        assert!(text.contains("/Size 3\n/Root 1 0 R\n/Info 2 0 R\n"));
        assert!(text.contains(&format!("/ID [<{0}> <{0}>]", "ab".repeat(16))));
        assert!(text.ends_with("%%EOF\n"));
    }
}
