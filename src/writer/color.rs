//! Fill and stroke colors.

use super::object_serializer::number;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A color as given by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Red, green, blue in 0..=255
    Rgb(f64, f64, f64),
    /// Gray level in 0..=1
    Gray(f64),
    /// Cyan, magenta, yellow, black in 0..=100
    Cmyk(f64, f64, f64, f64),
    /// `#rgb` or `#rrggbb`
    Hex(String),
}

impl From<&str> for Color {
    fn from(hex: &str) -> Self {
        Color::Hex(hex.to_string())
    }
}

impl From<(f64, f64, f64)> for Color {
    fn from((r, g, b): (f64, f64, f64)) -> Self {
        Color::Rgb(r, g, b)
    }
}

/// A color normalized to operator components in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorValue {
    /// DeviceGray
    Gray(f64),
    /// DeviceRGB
    Rgb(f64, f64, f64),
    /// DeviceCMYK
    Cmyk(f64, f64, f64, f64),
}

impl Color {
    /// Normalize to device components.
    pub fn resolve(&self) -> Result<ColorValue> {
        Ok(match self {
            Color::Rgb(r, g, b) => ColorValue::Rgb(r / 255.0, g / 255.0, b / 255.0),
            Color::Gray(g) => ColorValue::Gray(*g),
            Color::Cmyk(c, m, y, k) => {
                ColorValue::Cmyk(c / 100.0, m / 100.0, y / 100.0, k / 100.0)
            },
            Color::Hex(hex) => parse_hex(hex)?,
        })
    }
}

fn parse_hex(hex: &str) -> Result<ColorValue> {
    let invalid = || Error::InvalidColor(hex.to_string());
    let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return Err(invalid()),
    };
    let value = u32::from_str_radix(&expanded, 16).map_err(|_| invalid())?;
    let r = (value >> 16) & 0xFF;
    let g = (value >> 8) & 0xFF;
    let b = value & 0xFF;
    Ok(ColorValue::Rgb(
        r as f64 / 255.0,
        g as f64 / 255.0,
        b as f64 / 255.0,
    ))
}

impl ColorValue {
    /// Color operator, upper case for stroking.
    pub fn operator(&self, stroke: bool) -> Result<String> {
        let (components, op) = match *self {
            ColorValue::Gray(g) => (vec![g], "g"),
            ColorValue::Rgb(r, g, b) => (vec![r, g, b], "rg"),
            ColorValue::Cmyk(c, m, y, k) => (vec![c, m, y, k], "k"),
        };
        let values = components
            .into_iter()
            .map(number)
            .collect::<Result<Vec<_>>>()?
            .join(" ");
        let op = if stroke {
            op.to_uppercase()
        } else {
            op.to_string()
        };
        Ok(format!("{} {}", values, op))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors() {
        assert_eq!(
            Color::from("#ff0000").resolve().unwrap(),
            ColorValue::Rgb(1.0, 0.0, 0.0)
        );
        assert_eq!(
            Color::from("#0f0").resolve().unwrap(),
            ColorValue::Rgb(0.0, 1.0, 0.0)
        );
    }

    #[test]
    fn test_invalid_hex() {
        for bad in ["ff0000", "#ff00", "#gg0000", "#"] {
            assert!(matches!(
                Color::from(bad).resolve(),
                Err(Error::InvalidColor(_))
            ));
        }
    }

    #[test]
    fn test_operators() {
        let red = Color::Rgb(255.0, 0.0, 0.0).resolve().unwrap();
        assert_eq!(red.operator(false).unwrap(), "1 0 0 rg");
        assert_eq!(red.operator(true).unwrap(), "1 0 0 RG");
        let gray = Color::Gray(0.5).resolve().unwrap();
        assert_eq!(gray.operator(true).unwrap(), "0.5 G");
        let cmyk = Color::Cmyk(0.0, 50.0, 100.0, 0.0).resolve().unwrap();
        assert_eq!(cmyk.operator(false).unwrap(), "0 0.5 1 0 k");
    }
}
