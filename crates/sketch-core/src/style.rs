//! Drawing style applied to newly created entities, plus the fixed palettes
//! offered by the toolbar.

use crate::color::{Color, Fill};
use serde::{Deserialize, Serialize};

/// Stroke palette. Any other hex color is accepted too.
pub const STROKE_PALETTE: [Color; 10] = [
    Color::rgb(0x00, 0x00, 0x00),
    Color::rgb(0xFF, 0xFF, 0xFF),
    Color::rgb(0xEF, 0x44, 0x44),
    Color::rgb(0xF9, 0x73, 0x16),
    Color::rgb(0xEA, 0xB3, 0x08),
    Color::rgb(0x22, 0xC5, 0x5E),
    Color::rgb(0x3B, 0x82, 0xF6),
    Color::rgb(0x8B, 0x5C, 0xF6),
    Color::rgb(0xEC, 0x48, 0x99),
    Color::rgb(0x6B, 0x72, 0x80),
];

/// Fill palette, offered alongside [`Fill::None`].
pub const FILL_PALETTE: [Color; 8] = [
    Color::rgb(0xFF, 0xFF, 0xFF),
    Color::rgb(0xFE, 0xE2, 0xE2),
    Color::rgb(0xFE, 0xF3, 0xC7),
    Color::rgb(0xDC, 0xFC, 0xE7),
    Color::rgb(0xDB, 0xEA, 0xFE),
    Color::rgb(0xED, 0xE9, 0xFE),
    Color::rgb(0xFC, 0xE7, 0xF3),
    Color::rgb(0xF3, 0xF4, 0xF6),
];

/// Selectable stroke widths, in canvas units.
pub const STROKE_WIDTHS: [f64; 6] = [1.0, 2.0, 3.0, 5.0, 8.0, 12.0];

pub const DEFAULT_FONT_SIZE: f64 = 20.0;

/// Current stroke color, fill, stroke width and font size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub stroke: Color,
    pub fill: Fill,
    pub width: f64,
    pub font_size: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke: Color::BLACK,
            fill: Fill::None,
            width: 2.0,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl Style {
    /// Set the stroke width if it is one of [`STROKE_WIDTHS`].
    pub fn set_width(&mut self, width: f64) -> bool {
        if STROKE_WIDTHS.contains(&width) {
            self.width = width;
            true
        } else {
            false
        }
    }

    /// Set the font size. Non-finite or non-positive sizes are ignored.
    pub fn set_font_size(&mut self, size: f64) -> bool {
        if size.is_finite() && size > 0.0 {
            self.font_size = size;
            true
        } else {
            false
        }
    }
}
