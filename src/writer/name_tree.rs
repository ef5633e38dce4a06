//! Name and number trees.
//!
//! Both trees are written as a single flat node: an optional `/Limits`
//! pair followed by the sorted key/value array (`/Names` or `/Nums`).
//! Named destinations live in a [`NameTree`]; page-label style data
//! goes in a [`NumberTree`].

use super::object_serializer::ObjectSerializer;
use crate::error::Result;
use crate::object::Object;
use std::collections::BTreeMap;

/// Render a flat tree node in its fixed multi-line layout.
fn render(
    keys_name: &str,
    entries: Vec<(Object, &Object)>,
    limits: bool,
) -> Result<String> {
    let serializer = ObjectSerializer::new();
    let mut out = vec!["<<".to_string()];
    if limits && entries.len() > 1 {
        let first = entries[0].0.clone();
        let last = entries[entries.len() - 1].0.clone();
        let pair = serializer.serialize_to_string(&Object::Array(vec![first, last]))?;
        out.push(format!("  /Limits {}", pair));
    }
    out.push(format!("  /{} [", keys_name));
    for (key, value) in &entries {
        out.push(format!(
            "    {} {}",
            serializer.serialize_to_string(key)?,
            serializer.serialize_to_string(value)?
        ));
    }
    out.push("]".to_string());
    out.push(">>".to_string());
    Ok(out.join("\n"))
}

/// Tree keyed by strings, sorted lexicographically.
#[derive(Debug, Clone, Default)]
pub struct NameTree {
    items: BTreeMap<String, Object>,
    limits: bool,
}

impl NameTree {
    /// Create an empty tree that writes `/Limits`.
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
            limits: true,
        }
    }

    /// Create an empty tree without `/Limits`.
    pub fn without_limits() -> Self {
        Self {
            items: BTreeMap::new(),
            limits: false,
        }
    }

    /// Insert or replace an entry.
    pub fn add(&mut self, key: impl Into<String>, value: Object) {
        self.items.insert(key.into(), value);
    }

    /// Look up an entry.
    pub fn get(&self, key: &str) -> Option<&Object> {
        self.items.get(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Serialize to PDF syntax.
    pub fn to_pdf_string(&self) -> Result<String> {
        let entries = self
            .items
            .iter()
            .map(|(k, v)| (Object::string(k.clone()), v))
            .collect();
        render("Names", entries, self.limits)
    }

    /// Serialize into a verbatim object for embedding in a dictionary.
    pub fn to_object(&self) -> Result<Object> {
        Ok(Object::Raw(self.to_pdf_string()?))
    }
}

/// Tree keyed by integers, sorted numerically.
#[derive(Debug, Clone, Default)]
pub struct NumberTree {
    items: BTreeMap<i64, Object>,
    limits: bool,
}

impl NumberTree {
    /// Create an empty tree that writes `/Limits`.
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
            limits: true,
        }
    }

    /// Create an empty tree without `/Limits`.
    pub fn without_limits() -> Self {
        Self {
            items: BTreeMap::new(),
            limits: false,
        }
    }

    /// Insert or replace an entry.
    pub fn add(&mut self, key: i64, value: Object) {
        self.items.insert(key, value);
    }

    /// Look up an entry.
    pub fn get(&self, key: i64) -> Option<&Object> {
        self.items.get(&key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Serialize to PDF syntax.
    pub fn to_pdf_string(&self) -> Result<String> {
        let entries = self
            .items
            .iter()
            .map(|(k, v)| (Object::Integer(*k), v))
            .collect();
        render("Nums", entries, self.limits)
    }

    /// Serialize into a verbatim object for embedding in a dictionary.
    pub fn to_object(&self) -> Result<Object> {
        Ok(Object::Raw(self.to_pdf_string()?))
    }
}
