//! PDF object types.
//!
//! [`Object`] is the value model handed to the serializer. Dictionaries keep
//! insertion order so output is deterministic and matches the order in which
//! producers added their entries.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

/// Insertion-ordered PDF dictionary.
pub type Dictionary = IndexMap<String, Object>;

/// PDF object representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// Null object
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Real (floating-point) value
    Real(f64),
    /// Text string, written as a literal `( )` string
    String(String),
    /// Binary buffer, written as a hex `< >` string
    HexString(bytes::Bytes),
    /// Name (starting with /)
    Name(String),
    /// Date, written as `(D:YYYYMMDDHHmmssZ)` in UTC
    Date(DateTime<Utc>),
    /// Array of objects
    Array(Vec<Object>),
    /// Dictionary (key-value pairs)
    Dictionary(Dictionary),
    /// Indirect object reference
    Reference(ObjectRef),
    /// Pre-serialized PDF syntax, written verbatim
    Raw(String),
}

/// Build a dictionary from key-value pairs, keeping their order.
pub fn dictionary(entries: Vec<(&str, Object)>) -> Dictionary {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Reference to an indirect object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    /// Object number
    pub id: u32,
    /// Generation number
    pub gen: u16,
}

impl ObjectRef {
    /// Create a new object reference.
    pub fn new(id: u32, gen: u16) -> Self {
        Self { id, gen }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.id, self.gen)
    }
}

impl Object {
    /// Create a name object.
    pub fn name(name: impl Into<String>) -> Self {
        Object::Name(name.into())
    }

    /// Create a text string object.
    pub fn string(text: impl Into<String>) -> Self {
        Object::String(text.into())
    }

    /// Create a hex string object from raw bytes.
    pub fn hex(data: impl Into<bytes::Bytes>) -> Self {
        Object::HexString(data.into())
    }

    /// Create a dictionary object from key-value pairs, keeping their order.
    pub fn dict(entries: Vec<(&str, Object)>) -> Self {
        Object::Dictionary(dictionary(entries))
    }

    /// Create a rectangle array `[x1 y1 x2 y2]`.
    pub fn rect(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Object::Array(vec![
            Object::Real(x1),
            Object::Real(y1),
            Object::Real(x2),
            Object::Real(y2),
        ])
    }

    /// Try to cast to dictionary.
    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }
}

impl From<bool> for Object {
    fn from(v: bool) -> Self {
        Object::Boolean(v)
    }
}

impl From<i32> for Object {
    fn from(v: i32) -> Self {
        Object::Integer(v as i64)
    }
}

impl From<i64> for Object {
    fn from(v: i64) -> Self {
        Object::Integer(v)
    }
}

impl From<u32> for Object {
    fn from(v: u32) -> Self {
        Object::Integer(v as i64)
    }
}

impl From<usize> for Object {
    fn from(v: usize) -> Self {
        Object::Integer(v as i64)
    }
}

impl From<f32> for Object {
    fn from(v: f32) -> Self {
        Object::Real(v as f64)
    }
}

impl From<f64> for Object {
    fn from(v: f64) -> Self {
        Object::Real(v)
    }
}

impl From<ObjectRef> for Object {
    fn from(r: ObjectRef) -> Self {
        Object::Reference(r)
    }
}

impl From<DateTime<Utc>> for Object {
    fn from(d: DateTime<Utc>) -> Self {
        Object::Date(d)
    }
}

impl From<Vec<Object>> for Object {
    fn from(items: Vec<Object>) -> Self {
        Object::Array(items)
    }
}

impl From<Dictionary> for Object {
    fn from(d: Dictionary) -> Self {
        Object::Dictionary(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_ref_display() {
        assert_eq!(ObjectRef::new(12, 0).to_string(), "12 0 R");
    }

    #[test]
    fn test_dict_keeps_insertion_order() {
        let obj = Object::dict(vec![
            ("Type", Object::name("Page")),
            ("Parent", Object::Reference(ObjectRef::new(2, 0))),
            ("Contents", Object::Reference(ObjectRef::new(5, 0))),
        ]);
        let keys: Vec<&str> = obj
            .as_dict()
            .unwrap()
            .keys()
            .map(|k| k.as_str())
            .collect();
        assert_eq!(keys, vec!["Type", "Parent", "Contents"]);
    }
}
