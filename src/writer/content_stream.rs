//! Graphics operators for page content streams.
//!
//! Vector drawing on a page is expressed as [`ContentStreamOp`] values and
//! rendered to operator text with [`ContentStreamOp::to_operator`], so every
//! number goes through the same rounding as the object serializer. Shape
//! helpers expand rectangles, ellipses and polygons into path operators.

use super::color::ColorValue;
use super::object_serializer::number;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Control point distance for quarter-circle Bézier arcs.
pub const KAPPA: f64 = 4.0 * ((std::f64::consts::SQRT_2 - 1.0) / 3.0);

/// Line cap styles for path stroking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    /// Square butt cap
    #[default]
    Butt = 0,
    /// Round cap
    Round = 1,
    /// Projecting square cap
    Square = 2,
}

/// Line join styles for path stroking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    /// Miter join
    #[default]
    Miter = 0,
    /// Round join
    Round = 1,
    /// Bevel join
    Bevel = 2,
}

/// Winding rule for fills and clips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillRule {
    /// Nonzero winding number
    #[default]
    NonZero,
    /// Even-odd
    EvenOdd,
}

impl FillRule {
    fn suffix(self) -> &'static str {
        match self {
            FillRule::NonZero => "",
            FillRule::EvenOdd => "*",
        }
    }
}

/// Operations that can be added to a page's content stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentStreamOp {
    /// Save graphics state (q)
    SaveState,
    /// Restore graphics state (Q)
    RestoreState,
    /// Concatenate to the transformation matrix (cm)
    Transform([f64; 6]),
    /// Move to (m)
    MoveTo(f64, f64),
    /// Line to (l)
    LineTo(f64, f64),
    /// Cubic Bézier (c)
    CurveTo(f64, f64, f64, f64, f64, f64),
    /// Bézier with the first control point on the current point (v)
    CurveToV(f64, f64, f64, f64),
    /// Rectangle (re)
    Rectangle(f64, f64, f64, f64),
    /// Close path (h)
    ClosePath,
    /// Fill (f / f*)
    Fill(FillRule),
    /// Stroke (S)
    Stroke,
    /// Fill and stroke (B / B*)
    FillStroke(FillRule),
    /// Intersect the clip with the current path and end it (W n / W* n)
    Clip(FillRule),
    /// Set line width (w)
    SetLineWidth(f64),
    /// Set line cap style (J)
    SetLineCap(LineCap),
    /// Set line join style (j)
    SetLineJoin(LineJoin),
    /// Set miter limit (M)
    SetMiterLimit(f64),
    /// Set dash pattern (d); an empty array draws solid lines
    SetDashPattern(Vec<f64>, f64),
    /// Set fill color (g, rg or k)
    SetFillColor(ColorValue),
    /// Set stroke color (G, RG or K)
    SetStrokeColor(ColorValue),
    /// Apply an ExtGState resource (gs)
    SetExtGState(String),
}

fn numbers(values: &[f64]) -> Result<String> {
    let parts = values
        .iter()
        .map(|v| number(*v))
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join(" "))
}

impl ContentStreamOp {
    /// Operator text for this operation, without a trailing newline.
    pub fn to_operator(&self) -> Result<String> {
        Ok(match self {
            ContentStreamOp::SaveState => "q".to_string(),
            ContentStreamOp::RestoreState => "Q".to_string(),
            ContentStreamOp::Transform(m) => format!("{} cm", numbers(m)?),
            ContentStreamOp::MoveTo(x, y) => format!("{} m", numbers(&[*x, *y])?),
            ContentStreamOp::LineTo(x, y) => format!("{} l", numbers(&[*x, *y])?),
            ContentStreamOp::CurveTo(x1, y1, x2, y2, x3, y3) => {
                format!("{} c", numbers(&[*x1, *y1, *x2, *y2, *x3, *y3])?)
            },
            ContentStreamOp::CurveToV(x2, y2, x3, y3) => {
                format!("{} v", numbers(&[*x2, *y2, *x3, *y3])?)
            },
            ContentStreamOp::Rectangle(x, y, w, h) => {
                format!("{} re", numbers(&[*x, *y, *w, *h])?)
            },
            ContentStreamOp::ClosePath => "h".to_string(),
            ContentStreamOp::Fill(rule) => format!("f{}", rule.suffix()),
            ContentStreamOp::Stroke => "S".to_string(),
            ContentStreamOp::FillStroke(rule) => format!("B{}", rule.suffix()),
            ContentStreamOp::Clip(rule) => format!("W{} n", rule.suffix()),
            ContentStreamOp::SetLineWidth(w) => format!("{} w", number(*w)?),
            ContentStreamOp::SetLineCap(cap) => format!("{} J", *cap as u8),
            ContentStreamOp::SetLineJoin(join) => format!("{} j", *join as u8),
            ContentStreamOp::SetMiterLimit(m) => format!("{} M", number(*m)?),
            ContentStreamOp::SetDashPattern(lengths, phase) => {
                format!("[{}] {} d", numbers(lengths)?, number(*phase)?)
            },
            ContentStreamOp::SetFillColor(color) => color.operator(false)?,
            ContentStreamOp::SetStrokeColor(color) => color.operator(true)?,
            ContentStreamOp::SetExtGState(name) => format!("/{} gs", name),
        })
    }
}

/// Dash pattern operator. Every length must be finite and positive.
pub fn dash(length: f64, space: Option<f64>, phase: f64) -> Result<ContentStreamOp> {
    let space = space.unwrap_or(length);
    for v in [length, space] {
        if !v.is_finite() || v <= 0.0 {
            return Err(Error::InvalidDashPattern(v));
        }
    }
    Ok(ContentStreamOp::SetDashPattern(vec![length, space], phase))
}

/// Rectangle with corners rounded to `radius`, capped at half the shorter side.
pub fn rounded_rect(x: f64, y: f64, w: f64, h: f64, radius: f64) -> Vec<ContentStreamOp> {
    use ContentStreamOp::*;
    let r = radius.max(0.0).min(0.5 * w).min(0.5 * h);
    let c = r * (1.0 - KAPPA);
    vec![
        MoveTo(x + r, y),
        LineTo(x + w - r, y),
        CurveTo(x + w - c, y, x + w, y + c, x + w, y + r),
        LineTo(x + w, y + h - r),
        CurveTo(x + w, y + h - c, x + w - c, y + h, x + w - r, y + h),
        LineTo(x + r, y + h),
        CurveTo(x + c, y + h, x, y + h - c, x, y + h - r),
        LineTo(x, y + r),
        CurveTo(x, y + c, x + c, y, x + r, y),
        ClosePath,
    ]
}

/// Ellipse centred on (`cx`, `cy`) from four Bézier arcs.
pub fn ellipse(cx: f64, cy: f64, rx: f64, ry: f64) -> Vec<ContentStreamOp> {
    use ContentStreamOp::*;
    let x = cx - rx;
    let y = cy - ry;
    let ox = rx * KAPPA;
    let oy = ry * KAPPA;
    let xe = x + rx * 2.0;
    let ye = y + ry * 2.0;
    vec![
        MoveTo(x, cy),
        CurveTo(x, cy - oy, cx - ox, y, cx, y),
        CurveTo(cx + ox, y, xe, cy - oy, xe, cy),
        CurveTo(xe, cy + oy, cx + ox, ye, cx, ye),
        CurveTo(cx - ox, ye, x, cy + oy, x, cy),
        ClosePath,
    ]
}

/// Closed polygon through `points`. Empty input yields no operators.
pub fn polygon(points: &[(f64, f64)]) -> Vec<ContentStreamOp> {
    let mut ops = Vec::with_capacity(points.len() + 1);
    let mut iter = points.iter();
    if let Some(&(x, y)) = iter.next() {
        ops.push(ContentStreamOp::MoveTo(x, y));
        ops.extend(iter.map(|&(x, y)| ContentStreamOp::LineTo(x, y)));
        ops.push(ContentStreamOp::ClosePath);
    }
    ops
}

/// Affine transformation matrix `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix(pub [f64; 6]);

impl Default for Matrix {
    fn default() -> Self {
        Matrix::IDENTITY
    }
}

impl Matrix {
    /// The identity matrix.
    pub const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    /// Whether this is the identity matrix.
    pub fn is_identity(&self) -> bool {
        *self == Matrix::IDENTITY
    }

    /// `other` applied first, then `self`, as the `cm` operator does.
    pub fn concat(&self, other: &Matrix) -> Matrix {
        let [m0, m1, m2, m3, m4, m5] = self.0;
        let [a, b, c, d, e, f] = other.0;
        Matrix([
            m0 * a + m2 * b,
            m1 * a + m3 * b,
            m0 * c + m2 * d,
            m1 * c + m3 * d,
            m0 * e + m2 * f + m4,
            m1 * e + m3 * f + m5,
        ])
    }

    /// Map a point through the matrix.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let [a, b, c, d, e, f] = self.0;
        (a * x + c * y + e, b * x + d * y + f)
    }

    /// Rotation by `degrees` around (`ox`, `oy`).
    pub fn rotation(degrees: f64, ox: f64, oy: f64) -> Matrix {
        let rad = degrees.to_radians();
        let (sin, cos) = rad.sin_cos();
        let x1 = ox * cos - oy * sin;
        let y1 = ox * sin + oy * cos;
        Matrix([cos, sin, -sin, cos, ox - x1, oy - y1])
    }

    /// Scaling around (`ox`, `oy`).
    pub fn scaling(sx: f64, sy: f64, ox: f64, oy: f64) -> Matrix {
        Matrix([sx, 0.0, 0.0, sy, ox - sx * ox, oy - sy * oy])
    }

    /// Translation.
    pub fn translation(tx: f64, ty: f64) -> Matrix {
        Matrix([1.0, 0.0, 0.0, 1.0, tx, ty])
    }
}
