//! Indirect objects under construction.
//!
//! A [`PdfReference`] holds an object's dictionary and, optionally, a stream
//! body. Body chunks are fed to a zlib encoder as they arrive when
//! compression is on, so large content streams are never buffered
//! uncompressed.

use crate::error::Result;
use crate::object::{Dictionary, Object, ObjectRef};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

/// Stream body storage.
enum StreamBody {
    Plain(Vec<u8>),
    Deflate(ZlibEncoder<Vec<u8>>),
}

impl StreamBody {
    fn encoded_len(&self) -> usize {
        match self {
            StreamBody::Plain(buf) => buf.len(),
            StreamBody::Deflate(encoder) => encoder.get_ref().len(),
        }
    }
}

/// An indirect object that has been allocated but not yet written out.
pub struct PdfReference {
    id: u32,
    gen: u16,
    /// Object dictionary; producers may keep adding entries until the object ends.
    pub data: Dictionary,
    body: StreamBody,
    compress: bool,
    uncompressed_length: usize,
}

impl std::fmt::Debug for PdfReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfReference")
            .field("id", &self.id)
            .field("gen", &self.gen)
            .field("data", &self.data)
            .field("compress", &self.compress)
            .field("uncompressed_length", &self.uncompressed_length)
            .finish()
    }
}

/// Serialized pieces of an ended object, ready for the output stream.
pub(crate) struct FinishedObject {
    pub data: Dictionary,
    pub stream: Option<Vec<u8>>,
}

impl PdfReference {
    /// Create a reference. Compression is skipped when the caller supplied a `Filter`.
    pub(crate) fn new(id: u32, data: Dictionary, compress: bool) -> Self {
        let compress = compress && !data.contains_key("Filter");
        let body = if compress {
            StreamBody::Deflate(ZlibEncoder::new(Vec::new(), Compression::default()))
        } else {
            StreamBody::Plain(Vec::new())
        };
        Self {
            id,
            gen: 0,
            data,
            body,
            compress,
            uncompressed_length: 0,
        }
    }

    /// Reference handle for use inside other objects.
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef::new(self.id, self.gen)
    }

    /// Whether the body is being deflated.
    pub fn is_compressed(&self) -> bool {
        self.compress
    }

    /// Bytes written to the body before compression.
    pub fn uncompressed_length(&self) -> usize {
        self.uncompressed_length
    }

    /// Append raw bytes to the stream body.
    pub fn write(&mut self, chunk: &[u8]) -> Result<()> {
        self.uncompressed_length += chunk.len();
        match &mut self.body {
            StreamBody::Plain(buf) => buf.extend_from_slice(chunk),
            StreamBody::Deflate(encoder) => encoder.write_all(chunk)?,
        }
        let length = self.body.encoded_len();
        self.data.insert("Length".to_string(), Object::from(length));
        if self.compress {
            self.data
                .insert("Filter".to_string(), Object::name("FlateDecode"));
        }
        log::trace!("object {}: wrote {} byte chunk", self.id, chunk.len());
        Ok(())
    }

    /// Append a line of text to the stream body.
    pub fn write_line(&mut self, text: &str) -> Result<()> {
        let mut chunk = Vec::with_capacity(text.len() + 1);
        chunk.extend_from_slice(text.as_bytes());
        chunk.push(b'\n');
        self.write(&chunk)
    }

    /// Drain the compressor and fix the final `Length`.
    pub(crate) fn finish(self) -> Result<FinishedObject> {
        let mut data = self.data;
        if self.uncompressed_length == 0 {
            return Ok(FinishedObject { data, stream: None });
        }
        let bytes = match self.body {
            StreamBody::Plain(buf) => buf,
            StreamBody::Deflate(encoder) => encoder.finish()?,
        };
        data.insert("Length".to_string(), Object::from(bytes.len()));
        Ok(FinishedObject {
            data,
            stream: Some(bytes),
        })
    }
}
