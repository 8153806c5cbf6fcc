//! Colors, line styles and colormaps shared by config, surfaces and the rasterizer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque sRGB color. Parsed from `#RRGGBB`, `#RGB` or a handful of names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color `{0}`: expected #RRGGBB, #RGB or a named color")]
pub struct ColorParseError(pub String);

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from unit-interval channels, clamping out-of-range values.
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgb(q(r), q(g), q(b))
    }

    fn named(name: &str) -> Option<Self> {
        let c = match name {
            "black" | "k" => Self::BLACK,
            "white" | "w" => Self::WHITE,
            "red" | "r" => Self::rgb(255, 0, 0),
            "green" | "g" => Self::rgb(0, 128, 0),
            "blue" | "b" => Self::rgb(0, 0, 255),
            "gray" | "grey" => Self::rgb(128, 128, 128),
            "orange" => Self::rgb(255, 165, 0),
            _ => return None,
        };
        Some(c)
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || ColorParseError(s.to_string());
        if let Some(hex) = trimmed.strip_prefix('#') {
            let channel = |src: &str| u8::from_str_radix(src, 16).map_err(|_| err());
            return match hex.len() {
                6 => Ok(Self::rgb(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                )),
                3 => {
                    let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                    Ok(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
                }
                _ => Err(err()),
            };
        }
        Self::named(&trimmed.to_ascii_lowercase()).ok_or_else(err)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Line dash style, spelled the matplotlib way in config files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineStyle {
    #[default]
    #[serde(rename = "-")]
    Solid,
    #[serde(rename = "--")]
    Dashed,
    #[serde(rename = ":")]
    Dotted,
    #[serde(rename = "-.")]
    DashDot,
}

impl LineStyle {
    /// On/off dash lengths in multiples of the line width. `None` for solid lines.
    pub fn dash_pattern(&self) -> Option<&'static [f64]> {
        match self {
            LineStyle::Solid => None,
            LineStyle::Dashed => Some(&[3.7, 1.6]),
            LineStyle::Dotted => Some(&[1.0, 1.65]),
            LineStyle::DashDot => Some(&[6.4, 1.6, 1.0, 1.6]),
        }
    }
}

/// Analytic colormaps for contour levels. `None` means "use the solid kde color".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    None,
    #[default]
    Copper,
    Gray,
    Cool,
    Winter,
    Hot,
}

impl Colormap {
    /// Sample the map at `t` in [0, 1]. Returns `None` for `Colormap::None`.
    pub fn sample(&self, t: f64) -> Option<Color> {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let c = match self {
            Colormap::None => return None,
            Colormap::Copper => Color::from_unit(1.25 * t, 0.7812 * t, 0.4975 * t),
            Colormap::Gray => Color::from_unit(t, t, t),
            Colormap::Cool => Color::from_unit(t, 1.0 - t, 1.0),
            Colormap::Winter => Color::from_unit(0.0, t, 1.0 - 0.5 * t),
            Colormap::Hot => Color::from_unit(
                t / 0.365,
                (t - 0.365) / 0.381,
                (t - 0.746) / 0.254,
            ),
        };
        Some(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_names() {
        assert_eq!("#5E81AC".parse::<Color>().unwrap(), Color::rgb(0x5E, 0x81, 0xAC));
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!("Black".parse::<Color>().unwrap(), Color::BLACK);
        assert!("#12345".parse::<Color>().is_err());
        assert!("chartreuse-ish".parse::<Color>().is_err());
    }

    #[test]
    fn display_round_trips() {
        let c = Color::rgb(0x2E, 0x34, 0x40);
        assert_eq!(c.to_string(), "#2E3440");
        assert_eq!(c.to_string().parse::<Color>().unwrap(), c);
    }

    #[test]
    fn copper_endpoints() {
        assert_eq!(Colormap::Copper.sample(0.0), Some(Color::BLACK));
        let top = Colormap::Copper.sample(1.0).unwrap();
        assert_eq!(top.r, 255);
        assert!(top.g > top.b);
        assert_eq!(Colormap::None.sample(0.5), None);
    }

    #[test]
    fn dash_patterns() {
        assert!(LineStyle::Solid.dash_pattern().is_none());
        assert_eq!(LineStyle::Dashed.dash_pattern().map(|p| p.len()), Some(2));
    }
}
