//! Link annotations and named destinations.

use super::PdfDocument;
use crate::error::{Error, Result};
use crate::object::{dictionary, Object};
use crate::text::LinkTarget;
use std::io::Write;

/// Where a named destination points on its page.
///
/// Coordinates are in the page's top-left-origin space and converted to
/// PDF space when the destination is stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Destination {
    /// Position and zoom; `None` keeps the viewer's current value
    Xyz {
        /// Left edge
        left: Option<f64>,
        /// Top edge
        top: Option<f64>,
        /// Zoom factor
        zoom: Option<f64>,
    },
    /// Fit the whole page
    Fit,
    /// Fit the page width, top edge at the given y
    FitH(Option<f64>),
    /// Fit the page height, left edge at the given x
    FitV(Option<f64>),
    /// Fit a rectangle: left, top, right, bottom
    FitR(f64, f64, f64, f64),
}

impl Default for Destination {
    fn default() -> Self {
        Destination::Xyz {
            left: None,
            top: None,
            zoom: None,
        }
    }
}

fn optional(v: Option<f64>) -> Object {
    v.map(Object::Real).unwrap_or(Object::Null)
}

impl Destination {
    /// Destination array entries after the page reference.
    fn to_objects(self, page_height: f64) -> Vec<Object> {
        let flip = |y: f64| page_height - y;
        match self {
            Destination::Xyz { left, top, zoom } => vec![
                Object::name("XYZ"),
                optional(left),
                optional(top.map(flip)),
                optional(zoom),
            ],
            Destination::Fit => vec![Object::name("Fit")],
            Destination::FitH(top) => vec![Object::name("FitH"), optional(top.map(flip))],
            Destination::FitV(left) => vec![Object::name("FitV"), optional(left)],
            Destination::FitR(left, top, right, bottom) => vec![
                Object::name("FitR"),
                Object::Real(left),
                Object::Real(flip(bottom)),
                Object::Real(right),
                Object::Real(flip(top)),
            ],
        }
    }
}

impl<W: Write> PdfDocument<W> {
    /// Name a location on the current page for links and outlines.
    pub fn add_named_destination(
        &mut self,
        name: &str,
        destination: Destination,
    ) -> Result<&mut Self> {
        let page = self.page_or_err()?;
        let mut array = vec![Object::Reference(page.dictionary())];
        array.extend(destination.to_objects(page.height()));
        self.names_dictionary()?;
        self.destinations.add(name, Object::Array(array));
        Ok(self)
    }

    /// Add a link over the rectangle at (`x`, `y`) with size `w` × `h`.
    ///
    /// Page targets must refer to a page that has already been added.
    pub fn link(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        target: impl Into<LinkTarget>,
    ) -> Result<&mut Self> {
        let ctm = self.page_or_err()?.ctm();
        let action = match target.into() {
            LinkTarget::Page(index) => {
                let page = *self.kids.get(index).ok_or(Error::NoSuchPage(index))?;
                dictionary(vec![
                    ("S", Object::name("GoTo")),
                    (
                        "D",
                        Object::Array(vec![
                            Object::Reference(page),
                            Object::name("XYZ"),
                            Object::Null,
                            Object::Null,
                            Object::Null,
                        ]),
                    ),
                ])
            },
            LinkTarget::Url(url) => dictionary(vec![
                ("S", Object::name("URI")),
                ("URI", Object::string(url)),
            ]),
        };
        let action = self.writer.alloc(action);
        self.writer.end(action)?;

        let (x1, y1) = ctm.apply(x, y + h);
        let (x2, y2) = ctm.apply(x + w, y);
        let annotation = self.writer.alloc(dictionary(vec![
            ("Type", Object::name("Annot")),
            ("Subtype", Object::name("Link")),
            ("Rect", Object::rect(x1, y1, x2, y2)),
            ("Border", Object::Array(vec![Object::Integer(0); 3])),
            ("F", Object::Integer(1 << 2)),
            ("A", Object::Reference(action)),
        ]));
        self.writer.end(annotation)?;
        self.page_mut()?.add_annotation(annotation);
        Ok(self)
    }
}
