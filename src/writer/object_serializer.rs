//! PDF object serialization.
//!
//! Converts [`Object`] values into PDF syntax. Numbers are rounded to six
//! decimal places, text strings containing non-ASCII characters are written
//! as UTF-16BE with a byte order mark, and dictionaries keep insertion order.

use crate::error::{Error, Result};
use crate::object::{Dictionary, Object};
use std::io::Write;

/// Largest magnitude a number may have before it is rejected.
const NUMBER_LIMIT: f64 = 1e21;

/// Serializer for PDF objects.
///
/// Stateless; the struct exists so callers can hold a serializer the same
/// way they hold the other writer components.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectSerializer;

impl ObjectSerializer {
    /// Create a new object serializer.
    pub fn new() -> Self {
        Self
    }

    /// Serialize an object to bytes.
    ///
    /// Output is bytes rather than text because UTF-16 strings carry
    /// arbitrary byte values.
    pub fn serialize(&self, obj: &Object) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_object(&mut buf, obj)?;
        Ok(buf)
    }

    /// Serialize an object to a string (lossy for binary strings; for tests and logging).
    pub fn serialize_to_string(&self, obj: &Object) -> Result<String> {
        Ok(String::from_utf8_lossy(&self.serialize(obj)?).to_string())
    }

    /// Write an object to a buffer.
    pub fn write_object<W: Write>(&self, w: &mut W, obj: &Object) -> Result<()> {
        match obj {
            Object::Null => write!(w, "null")?,
            Object::Boolean(b) => write!(w, "{}", if *b { "true" } else { "false" })?,
            Object::Integer(i) => write!(w, "{}", i)?,
            Object::Real(r) => write!(w, "{}", number(*r)?)?,
            Object::String(s) => self.write_string(w, s)?,
            Object::HexString(data) => {
                write!(w, "<")?;
                for byte in data.iter() {
                    write!(w, "{:02x}", byte)?;
                }
                write!(w, ">")?;
            },
            Object::Name(n) => self.write_name(w, n)?,
            Object::Date(d) => write!(w, "(D:{}Z)", d.format("%Y%m%d%H%M%S"))?,
            Object::Array(arr) => self.write_array(w, arr)?,
            Object::Dictionary(dict) => self.write_dictionary(w, dict)?,
            Object::Reference(r) => write!(w, "{} {} R", r.id, r.gen)?,
            Object::Raw(raw) => w.write_all(raw.as_bytes())?,
        }
        Ok(())
    }

    /// Write a literal string.
    ///
    /// ASCII text is written as-is; anything else becomes UTF-16BE with a BOM.
    /// The escape table is applied to the encoded bytes.
    fn write_string<W: Write>(&self, w: &mut W, text: &str) -> Result<()> {
        let bytes = if text.is_ascii() {
            text.as_bytes().to_vec()
        } else {
            let mut le = Vec::with_capacity(text.len() * 2 + 2);
            for unit in std::iter::once(0xFEFF).chain(text.encode_utf16()) {
                le.extend_from_slice(&unit.to_le_bytes());
            }
            swap_bytes(&le)?
        };

        write!(w, "(")?;
        for &byte in &bytes {
            match byte {
                b'\n' => write!(w, "\\n")?,
                b'\r' => write!(w, "\\r")?,
                b'\t' => write!(w, "\\t")?,
                0x08 => write!(w, "\\b")?,
                0x0C => write!(w, "\\f")?,
                b'\\' => write!(w, "\\\\")?,
                b'(' => write!(w, "\\(")?,
                b')' => write!(w, "\\)")?,
                _ => w.write_all(&[byte])?,
            }
        }
        write!(w, ")")?;
        Ok(())
    }

    /// Write a PDF name.
    ///
    /// Names start with `/` and escape special characters with `#xx`.
    fn write_name<W: Write>(&self, w: &mut W, name: &str) -> Result<()> {
        write!(w, "/")?;
        for byte in name.bytes() {
            match byte {
                b'!'
                | b'"'
                | b'$'..=b'&'
                | b'\''..=b'.'
                | b'0'..=b'9'
                | b';'
                | b'?'
                | b'@'
                | b'A'..=b'Z'
                | b'^'..=b'z'
                | b'|'
                | b'~' => w.write_all(&[byte])?,
                _ => write!(w, "#{:02X}", byte)?,
            }
        }
        Ok(())
    }

    /// Write a PDF array with space-separated elements.
    fn write_array<W: Write>(&self, w: &mut W, arr: &[Object]) -> Result<()> {
        write!(w, "[")?;
        for (i, obj) in arr.iter().enumerate() {
            if i > 0 {
                write!(w, " ")?;
            }
            self.write_object(w, obj)?;
        }
        write!(w, "]")?;
        Ok(())
    }

    /// Write a PDF dictionary, one `/Key value` entry per line.
    fn write_dictionary<W: Write>(&self, w: &mut W, dict: &Dictionary) -> Result<()> {
        write!(w, "<<")?;
        for (key, value) in dict {
            writeln!(w)?;
            self.write_name(w, key)?;
            write!(w, " ")?;
            self.write_object(w, value)?;
        }
        write!(w, "\n>>")?;
        Ok(())
    }
}

/// Round a number to six decimal places.
///
/// Fails for NaN and for magnitudes of 1e21 or more, which PDF readers
/// cannot represent in plain decimal notation.
pub fn round_number(n: f64) -> Result<f64> {
    if n.is_nan() || n <= -NUMBER_LIMIT || n >= NUMBER_LIMIT {
        return Err(Error::UnsupportedValue(format!("unsupported number: {}", n)));
    }
    // Half-way cases round towards positive infinity.
    Ok((n * 1e6 + 0.5).floor() / 1e6 + 0.0)
}

/// Format a number for PDF output.
///
/// Whole values print without a decimal point and negative zero prints as `0`.
pub fn number(n: f64) -> Result<String> {
    let rounded = round_number(n)?;
    if rounded.fract() == 0.0 {
        Ok(format!("{:.0}", rounded))
    } else {
        Ok(format!("{}", rounded))
    }
}

/// Swap each pair of bytes, converting UTF-16LE to UTF-16BE.
pub fn swap_bytes(buf: &[u8]) -> Result<Vec<u8>> {
    if buf.len() % 2 != 0 {
        return Err(Error::OddLengthBuffer(buf.len()));
    }
    let mut out = Vec::with_capacity(buf.len());
    for pair in buf.chunks_exact(2) {
        out.push(pair[1]);
        out.push(pair[0]);
    }
    Ok(out)
}
