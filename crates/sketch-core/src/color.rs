//! Colors and fills.
//!
//! Colors are stored as 8-bit RGBA so they map 1:1 onto both the SVG
//! markup emitted by the exporter and the pixel formats used for raster
//! output. Hex strings from the palette or from the user are parsed with a
//! small `winnow` parser.

use serde::{Deserialize, Serialize};
use std::fmt;
use winnow::combinator::opt;
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take_while;

/// RGBA color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The leading `#` is optional and surrounding whitespace is ignored.
    pub fn from_hex(hex: &str) -> Option<Self> {
        parse_hex_color.parse(hex.trim()).ok()
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.is_opaque() {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Alpha as a 0.0..=1.0 opacity, for SVG `*-opacity` attributes.
    pub fn opacity(&self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

fn parse_hex_color(input: &mut &str) -> ModalResult<Color> {
    let _ = opt('#').parse_next(input)?;
    let digits: &str = take_while(3..=8, |c: char| c.is_ascii_hexdigit()).parse_next(input)?;
    color_from_digits(digits).ok_or_else(|| ErrMode::Backtrack(ContextError::new()))
}

fn color_from_digits(digits: &str) -> Option<Color> {
    let nibble = |i: usize| u8::from_str_radix(&digits[i..=i], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();

    match digits.len() {
        3 => Some(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Color::rgba(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

// ─── Fill ────────────────────────────────────────────────────────────────

/// Interior paint of a shape. `None` is the "no fill" sentinel offered
/// next to the fill palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fill {
    #[default]
    None,
    Solid(Color),
}

impl Fill {
    /// Parse `"none"` / `"transparent"` / empty as [`Fill::None`], anything
    /// else as a hex color.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "" | "none" | "transparent" => Some(Fill::None),
            hex => Color::from_hex(hex).map(Fill::Solid),
        }
    }

    pub fn color(&self) -> Option<Color> {
        match self {
            Fill::None => None,
            Fill::Solid(c) => Some(*c),
        }
    }
}
