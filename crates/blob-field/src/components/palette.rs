//! Blob colours and the built-in palettes.

use serde::{Deserialize, Serialize};

/// An opaque RGB colour (0-255 per channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const RED: Self = Self::new(255, 0, 0);
    pub const GREEN: Self = Self::new(0, 255, 0);
    pub const BLUE: Self = Self::new(0, 0, 255);
    pub const WHITE: Self = Self::new(255, 255, 255);
}

/// Warm yellows. The default palette.
pub const YELLOW: [Rgb; 5] = [
    Rgb::new(255, 236, 66), // bright yellow
    Rgb::new(255, 215, 0),  // gold
    Rgb::new(255, 191, 0),  // amber
    Rgb::new(255, 173, 51), // deep yellow
    Rgb::new(250, 250, 210),
];

pub const PURPLE: [Rgb; 5] = [
    Rgb::new(147, 51, 234),
    Rgb::new(168, 85, 247),
    Rgb::new(192, 132, 252),
    Rgb::new(216, 180, 254),
    Rgb::new(233, 213, 255),
];

pub const CMYK: [Rgb; 6] = [
    Rgb::new(255, 0, 255),
    Rgb::new(255, 255, 0),
    Rgb::new(0, 255, 255),
    Rgb::new(255, 0, 0),
    Rgb::new(0, 255, 0),
    Rgb::new(0, 0, 255),
];

/// Named built-in palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Yellow,
    Purple,
    Cmyk,
}

impl Palette {
    pub fn colors(self) -> &'static [Rgb] {
        match self {
            Palette::Yellow => &YELLOW,
            Palette::Purple => &PURPLE,
            Palette::Cmyk => &CMYK,
        }
    }

    /// Look up a palette by its lowercase name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "yellow" => Some(Palette::Yellow),
            "purple" => Some(Palette::Purple),
            "cmyk" => Some(Palette::Cmyk),
            _ => None,
        }
    }
}
