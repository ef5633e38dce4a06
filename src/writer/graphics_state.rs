//! Extended graphics state resources for opacity.
//!
//! Each distinct fill/stroke opacity pair is written once as an
//! `ExtGState` object and named `Gs1`, `Gs2`, ... in page resources.

use crate::object::{Dictionary, Object, ObjectRef};
use std::collections::HashMap;

/// Builder for `ExtGState` dictionaries.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExtGStateBuilder {
    /// Fill alpha (ca)
    fill_alpha: Option<f64>,
    /// Stroke alpha (CA)
    stroke_alpha: Option<f64>,
}

impl ExtGStateBuilder {
    /// Empty graphics state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opacity for fills, clamped to 0..=1.
    pub fn fill_alpha(mut self, alpha: f64) -> Self {
        self.fill_alpha = Some(alpha.clamp(0.0, 1.0));
        self
    }

    /// Opacity for strokes, clamped to 0..=1.
    pub fn stroke_alpha(mut self, alpha: f64) -> Self {
        self.stroke_alpha = Some(alpha.clamp(0.0, 1.0));
        self
    }

    /// Whether neither alpha is set.
    pub fn is_empty(&self) -> bool {
        self.fill_alpha.is_none() && self.stroke_alpha.is_none()
    }

    /// Registry key identifying this state.
    pub fn key(&self) -> String {
        let part = |v: Option<f64>| v.map(|a| a.to_string()).unwrap_or_default();
        format!("{}_{}", part(self.fill_alpha), part(self.stroke_alpha))
    }

    /// The `ExtGState` dictionary.
    pub fn build(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.insert("Type".into(), Object::name("ExtGState"));
        if let Some(alpha) = self.fill_alpha {
            dict.insert("ca".into(), Object::Real(alpha));
        }
        if let Some(alpha) = self.stroke_alpha {
            dict.insert("CA".into(), Object::Real(alpha));
        }
        dict
    }
}

/// Graphics states already written, by key.
#[derive(Debug, Default)]
pub struct ExtGStateRegistry {
    states: HashMap<String, (String, ObjectRef)>,
}

impl ExtGStateRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resource name and object for `state`, if already written.
    pub fn get(&self, state: &ExtGStateBuilder) -> Option<(String, ObjectRef)> {
        self.states.get(&state.key()).cloned()
    }

    /// Record a written state and return its new resource name.
    pub fn insert(&mut self, state: &ExtGStateBuilder, r: ObjectRef) -> String {
        let name = format!("Gs{}", self.states.len() + 1);
        self.states.insert(state.key(), (name.clone(), r));
        name
    }
}
