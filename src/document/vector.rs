//! Vector graphics on the current page.
//!
//! Coordinates are in the page's top-left-origin space set up by
//! [`PdfDocument::add_page`]. Every `transform` is mirrored in the page's
//! tracked CTM so annotations can be placed in default user space.

use super::PdfDocument;
use crate::error::Result;
use crate::writer::color::Color;
use crate::writer::content_stream::{
    self, ContentStreamOp, FillRule, LineCap, LineJoin, Matrix,
};
use crate::writer::graphics_state::ExtGStateBuilder;
use std::io::Write;

impl<W: Write> PdfDocument<W> {
    fn op(&mut self, op: ContentStreamOp) -> Result<&mut Self> {
        let line = op.to_operator()?;
        self.add_content(&line)
    }

    fn ops(&mut self, ops: Vec<ContentStreamOp>) -> Result<&mut Self> {
        for op in ops {
            self.op(op)?;
        }
        Ok(self)
    }

    /// Save the graphics state (`q`).
    pub fn save(&mut self) -> Result<&mut Self> {
        self.page_mut()?.push_ctm();
        self.op(ContentStreamOp::SaveState)
    }

    /// Restore the graphics state (`Q`).
    pub fn restore(&mut self) -> Result<&mut Self> {
        self.page_mut()?.pop_ctm();
        self.op(ContentStreamOp::RestoreState)
    }

    /// Concatenate a matrix to the CTM. The identity matrix writes nothing.
    pub fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<&mut Self> {
        let m = Matrix([a, b, c, d, e, f]);
        if m.is_identity() {
            return Ok(self);
        }
        self.page_mut()?.concat_ctm(&m);
        self.op(ContentStreamOp::Transform(m.0))
    }

    /// Translate the coordinate system.
    pub fn translate(&mut self, x: f64, y: f64) -> Result<&mut Self> {
        let [a, b, c, d, e, f] = Matrix::translation(x, y).0;
        self.transform(a, b, c, d, e, f)
    }

    /// Rotate by `degrees` clockwise on the page, around `origin` (default 0,0).
    pub fn rotate(&mut self, degrees: f64, origin: Option<(f64, f64)>) -> Result<&mut Self> {
        let (ox, oy) = origin.unwrap_or((0.0, 0.0));
        let [a, b, c, d, e, f] = Matrix::rotation(degrees, ox, oy).0;
        self.transform(a, b, c, d, e, f)
    }

    /// Scale around `origin` (default 0,0).
    pub fn scale(&mut self, sx: f64, sy: f64, origin: Option<(f64, f64)>) -> Result<&mut Self> {
        let (ox, oy) = origin.unwrap_or((0.0, 0.0));
        let [a, b, c, d, e, f] = Matrix::scaling(sx, sy, ox, oy).0;
        self.transform(a, b, c, d, e, f)
    }

    /// Begin a new subpath.
    pub fn move_to(&mut self, x: f64, y: f64) -> Result<&mut Self> {
        self.op(ContentStreamOp::MoveTo(x, y))
    }

    /// Straight segment.
    pub fn line_to(&mut self, x: f64, y: f64) -> Result<&mut Self> {
        self.op(ContentStreamOp::LineTo(x, y))
    }

    /// Cubic Bézier segment.
    pub fn bezier_curve_to(
        &mut self,
        cp1x: f64,
        cp1y: f64,
        cp2x: f64,
        cp2y: f64,
        x: f64,
        y: f64,
    ) -> Result<&mut Self> {
        self.op(ContentStreamOp::CurveTo(cp1x, cp1y, cp2x, cp2y, x, y))
    }

    /// Quadratic segment, written with the `v` operator.
    pub fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) -> Result<&mut Self> {
        self.op(ContentStreamOp::CurveToV(cpx, cpy, x, y))
    }

    /// Rectangle.
    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<&mut Self> {
        self.op(ContentStreamOp::Rectangle(x, y, w, h))
    }

    /// Rectangle with rounded corners.
    pub fn rounded_rect(&mut self, x: f64, y: f64, w: f64, h: f64, r: f64) -> Result<&mut Self> {
        self.ops(content_stream::rounded_rect(x, y, w, h, r))
    }

    /// Ellipse centred on (`x`, `y`).
    pub fn ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64) -> Result<&mut Self> {
        self.ops(content_stream::ellipse(x, y, rx, ry))
    }

    /// Circle centred on (`x`, `y`).
    pub fn circle(&mut self, x: f64, y: f64, r: f64) -> Result<&mut Self> {
        self.ellipse(x, y, r, r)
    }

    /// Closed polygon.
    pub fn polygon(&mut self, points: &[(f64, f64)]) -> Result<&mut Self> {
        self.ops(content_stream::polygon(points))
    }

    /// Close the current subpath.
    pub fn close_path(&mut self) -> Result<&mut Self> {
        self.op(ContentStreamOp::ClosePath)
    }

    /// Fill the current path.
    pub fn fill(&mut self, rule: FillRule) -> Result<&mut Self> {
        self.op(ContentStreamOp::Fill(rule))
    }

    /// Stroke the current path.
    pub fn stroke(&mut self) -> Result<&mut Self> {
        self.op(ContentStreamOp::Stroke)
    }

    /// Fill then stroke the current path.
    pub fn fill_and_stroke(&mut self, rule: FillRule) -> Result<&mut Self> {
        self.op(ContentStreamOp::FillStroke(rule))
    }

    /// Clip to the current path.
    pub fn clip(&mut self, rule: FillRule) -> Result<&mut Self> {
        self.op(ContentStreamOp::Clip(rule))
    }

    /// Stroke width.
    pub fn line_width(&mut self, width: f64) -> Result<&mut Self> {
        self.op(ContentStreamOp::SetLineWidth(width))
    }

    /// Stroke end caps.
    pub fn line_cap(&mut self, cap: LineCap) -> Result<&mut Self> {
        self.op(ContentStreamOp::SetLineCap(cap))
    }

    /// Stroke joins.
    pub fn line_join(&mut self, join: LineJoin) -> Result<&mut Self> {
        self.op(ContentStreamOp::SetLineJoin(join))
    }

    /// Miter limit.
    pub fn miter_limit(&mut self, limit: f64) -> Result<&mut Self> {
        self.op(ContentStreamOp::SetMiterLimit(limit))
    }

    /// Dashed strokes; `space` defaults to `length`.
    pub fn dash(&mut self, length: f64, space: Option<f64>, phase: f64) -> Result<&mut Self> {
        let op = content_stream::dash(length, space, phase)?;
        self.op(op)
    }

    /// Solid strokes.
    pub fn undash(&mut self) -> Result<&mut Self> {
        self.op(ContentStreamOp::SetDashPattern(Vec::new(), 0.0))
    }

    /// Fill color, also used for text and its decorations.
    pub fn fill_color(&mut self, color: impl Into<Color>) -> Result<&mut Self> {
        let value = color.into().resolve()?;
        self.fill_color = Some(value);
        self.op(ContentStreamOp::SetFillColor(value))
    }

    /// Stroke color.
    pub fn stroke_color(&mut self, color: impl Into<Color>) -> Result<&mut Self> {
        let value = color.into().resolve()?;
        self.op(ContentStreamOp::SetStrokeColor(value))
    }

    /// Fill opacity in 0..=1.
    pub fn fill_opacity(&mut self, opacity: f64) -> Result<&mut Self> {
        self.apply_ext_gstate(ExtGStateBuilder::new().fill_alpha(opacity))
    }

    /// Stroke opacity in 0..=1.
    pub fn stroke_opacity(&mut self, opacity: f64) -> Result<&mut Self> {
        self.apply_ext_gstate(ExtGStateBuilder::new().stroke_alpha(opacity))
    }

    /// Fill and stroke opacity in 0..=1.
    pub fn opacity(&mut self, opacity: f64) -> Result<&mut Self> {
        self.apply_ext_gstate(
            ExtGStateBuilder::new()
                .fill_alpha(opacity)
                .stroke_alpha(opacity),
        )
    }

    fn apply_ext_gstate(&mut self, state: ExtGStateBuilder) -> Result<&mut Self> {
        self.page_or_err()?;
        let (name, r) = match self.ext_gstates.get(&state) {
            Some(existing) => existing,
            None => {
                let r = self.writer.alloc(state.build());
                self.writer.end(r)?;
                let name = self.ext_gstates.insert(&state, r);
                (name, r)
            },
        };
        self.page_mut()?.add_ext_gstate(&name, r);
        self.op(ContentStreamOp::SetExtGState(name))
    }
}

#[cfg(test)]
mod tests {
    use crate::document::DocumentOptions;
    use crate::error::Error;
    use crate::writer::content_stream::FillRule;
    use crate::PdfDocument;

    fn content(doc: PdfDocument) -> String {
        String::from_utf8_lossy(&doc.finish().unwrap()).to_string()
    }

    fn doc() -> PdfDocument {
        PdfDocument::new(DocumentOptions::default().with_compress(false)).unwrap()
    }

    #[test]
    fn test_page_starts_flipped() {
        let out = content(doc());
        assert!(out.contains("stream\n1 0 0 -1 0 792 cm\n"));
    }

    #[test]
    fn test_shapes_and_paint() {
        let mut d = doc();
        d.save()
            .unwrap()
            .rect(10.0, 10.0, 50.0, 20.0)
            .unwrap()
            .fill_color("#ff0000")
            .unwrap()
            .fill(FillRule::NonZero)
            .unwrap()
            .restore()
            .unwrap();
        let out = content(d);
        assert!(out.contains("q\n10 10 50 20 re\n1 0 0 rg\nf\nQ\n"));
    }

    #[test]
    fn test_identity_transform_is_skipped() {
        let mut d = doc();
        d.translate(0.0, 0.0).unwrap().translate(5.0, 6.0).unwrap();
        let out = content(d);
        assert!(!out.contains("1 0 0 1 0 0 cm"));
        assert!(out.contains("1 0 0 1 5 6 cm"));
    }

    #[test]
    fn test_opacity_reuses_ext_gstate() {
        let mut d = doc();
        d.fill_opacity(0.5).unwrap();
        d.fill_opacity(0.5).unwrap();
        d.stroke_opacity(0.25).unwrap();
        let out = content(d);
        assert_eq!(out.matches("/Type /ExtGState").count(), 2);
        assert_eq!(out.matches("/Gs1 gs").count(), 2);
        assert!(out.contains("/Gs2 gs"));
        assert!(out.contains("/ExtGState <<\n/Gs1 "));
    }

    #[test]
    fn test_invalid_inputs() {
        let mut d = doc();
        assert!(matches!(d.dash(0.0, None, 0.0), Err(Error::InvalidDashPattern(_))));
        assert!(matches!(d.fill_color("#12"), Err(Error::InvalidColor(_))));
    }

    #[test]
    fn test_drawing_without_page() {
        let mut d =
            PdfDocument::new(DocumentOptions::default().with_auto_first_page(false)).unwrap();
        assert!(matches!(d.rect(0.0, 0.0, 1.0, 1.0), Err(Error::NoCurrentPage)));
        assert!(matches!(d.fill_opacity(0.5), Err(Error::NoCurrentPage)));
    }
}
