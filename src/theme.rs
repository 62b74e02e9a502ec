//! Colors and the adaptive highlight palette
//!
//! Highlight colors are stored as a [`ColorKey`]: either an index into the
//! fixed palette below, or a raw color chosen by the user. Palette entries
//! resolve differently on light and dark themes so the same profile stays
//! legible after a theme switch.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);

    /// Create a new color from RGB values (alpha defaults to 255)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a new color from RGBA values
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Return a new color with the specified alpha value
    pub const fn with_alpha(&self, a: u8) -> Self {
        Self {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    /// Return a new color whose alpha is `opacity` (clamped to 0.0..=1.0)
    pub fn with_opacity(&self, opacity: f32) -> Self {
        let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        self.with_alpha(alpha)
    }

    /// Parse from "#RRGGBB" or "#RRGGBBAA" hex string
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let s = s.trim_start_matches('#');
        if !s.is_ascii() {
            return Err(format!("Invalid color format: {}", s));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&s[range], 16).map_err(|e| e.to_string())
        };
        match s.len() {
            6 => Ok(Color {
                r: channel(0..2)?,
                g: channel(2..4)?,
                b: channel(4..6)?,
                a: 255,
            }),
            8 => Ok(Color {
                r: channel(0..2)?,
                g: channel(2..4)?,
                b: channel(4..6)?,
                a: channel(6..8)?,
            }),
            _ => Err(format!("Invalid color format: {}", s)),
        }
    }

    /// Format as "#RRGGBB", or "#RRGGBBAA" when not fully opaque
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// WCAG relative luminance of the opaque color
    pub fn relative_luminance(&self) -> f32 {
        fn linear(c: u8) -> f32 {
            let c = c as f32 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }

    /// Black or white, whichever reads better on top of this color
    pub fn contrast_foreground(&self) -> Color {
        let lum = self.relative_luminance();
        let with_black = (lum + 0.05) / 0.05;
        let with_white = 1.05 / (lum + 0.05);
        if with_black >= with_white {
            Color::BLACK
        } else {
            Color::WHITE
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Light or dark editor theme, as reported by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeKind {
    Light,
    #[default]
    Dark,
}

impl ThemeKind {
    pub fn from_is_light(is_light: bool) -> Self {
        if is_light {
            ThemeKind::Light
        } else {
            ThemeKind::Dark
        }
    }

    pub fn is_light(self) -> bool {
        self == ThemeKind::Light
    }
}

/// One palette slot with a variant per theme kind
#[derive(Debug, Clone, Copy)]
pub struct PaletteEntry {
    pub name: &'static str,
    pub light: Color,
    pub dark: Color,
    /// Precomputed legible text color on `light`
    pub light_foreground: Color,
    /// Precomputed legible text color on `dark`
    pub dark_foreground: Color,
}

impl PaletteEntry {
    pub fn color(&self, theme: ThemeKind) -> Color {
        match theme {
            ThemeKind::Light => self.light,
            ThemeKind::Dark => self.dark,
        }
    }

    pub fn foreground(&self, theme: ThemeKind) -> Color {
        match theme {
            ThemeKind::Light => self.light_foreground,
            ThemeKind::Dark => self.dark_foreground,
        }
    }
}

/// Fixed adaptive palette, cycled in order for new highlights
pub const PALETTE: &[PaletteEntry] = &[
    PaletteEntry {
        name: "yellow",
        light: Color::rgb(0xF5, 0xC5, 0x18),
        dark: Color::rgb(0xE5, 0xC0, 0x7B),
        light_foreground: Color::BLACK,
        dark_foreground: Color::BLACK,
    },
    PaletteEntry {
        name: "green",
        light: Color::rgb(0x2E, 0xA0, 0x43),
        dark: Color::rgb(0x98, 0xC3, 0x79),
        light_foreground: Color::BLACK,
        dark_foreground: Color::BLACK,
    },
    PaletteEntry {
        name: "blue",
        light: Color::rgb(0x1F, 0x6F, 0xEB),
        dark: Color::rgb(0x61, 0xAF, 0xEF),
        light_foreground: Color::WHITE,
        dark_foreground: Color::BLACK,
    },
    PaletteEntry {
        name: "orange",
        light: Color::rgb(0xE3, 0x6C, 0x09),
        dark: Color::rgb(0xD1, 0x9A, 0x66),
        light_foreground: Color::BLACK,
        dark_foreground: Color::BLACK,
    },
    PaletteEntry {
        name: "purple",
        light: Color::rgb(0x82, 0x50, 0xDF),
        dark: Color::rgb(0xC6, 0x78, 0xDD),
        light_foreground: Color::WHITE,
        dark_foreground: Color::BLACK,
    },
    PaletteEntry {
        name: "red",
        light: Color::rgb(0xCF, 0x22, 0x2E),
        dark: Color::rgb(0xE0, 0x6C, 0x75),
        light_foreground: Color::WHITE,
        dark_foreground: Color::BLACK,
    },
    PaletteEntry {
        name: "cyan",
        light: Color::rgb(0x1B, 0x9A, 0xAA),
        dark: Color::rgb(0x56, 0xB6, 0xC2),
        light_foreground: Color::BLACK,
        dark_foreground: Color::BLACK,
    },
    PaletteEntry {
        name: "pink",
        light: Color::rgb(0xBF, 0x39, 0x89),
        dark: Color::rgb(0xF4, 0x8F, 0xB1),
        light_foreground: Color::WHITE,
        dark_foreground: Color::BLACK,
    },
    PaletteEntry {
        name: "lime",
        light: Color::rgb(0x7C, 0xB3, 0x42),
        dark: Color::rgb(0xC5, 0xE1, 0xA5),
        light_foreground: Color::BLACK,
        dark_foreground: Color::BLACK,
    },
    PaletteEntry {
        name: "teal",
        light: Color::rgb(0x00, 0x79, 0x6B),
        dark: Color::rgb(0x4D, 0xB6, 0xAC),
        light_foreground: Color::WHITE,
        dark_foreground: Color::BLACK,
    },
    PaletteEntry {
        name: "brown",
        light: Color::rgb(0x8D, 0x6E, 0x63),
        dark: Color::rgb(0xBC, 0xAA, 0xA4),
        light_foreground: Color::WHITE,
        dark_foreground: Color::BLACK,
    },
    PaletteEntry {
        name: "gray",
        light: Color::rgb(0x6E, 0x77, 0x81),
        dark: Color::rgb(0xAB, 0xB2, 0xBF),
        light_foreground: Color::WHITE,
        dark_foreground: Color::BLACK,
    },
];

/// Look up a palette slot by its name
pub fn palette_index(name: &str) -> Option<usize> {
    PALETTE.iter().position(|entry| entry.name == name)
}

/// Color reference stored on a highlight entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorKey {
    /// Slot in [`PALETTE`], resolved against the current theme
    Palette(usize),
    /// User-picked color, identical on every theme
    Raw(Color),
}

impl ColorKey {
    /// Parse a palette name or a "#RRGGBB[AA]" value
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.starts_with('#') {
            return Color::from_hex(s).map(ColorKey::Raw);
        }
        palette_index(&s.to_ascii_lowercase())
            .map(ColorKey::Palette)
            .ok_or_else(|| format!("Unknown palette color: {}", s))
    }

    /// Resolve to a concrete color for the given theme
    pub fn resolve(&self, theme: ThemeKind) -> Color {
        match self {
            ColorKey::Palette(idx) => PALETTE[idx % PALETTE.len()].color(theme),
            ColorKey::Raw(color) => *color,
        }
    }

    /// Legible text color to draw on top of this highlight
    pub fn foreground(&self, theme: ThemeKind) -> Color {
        match self {
            ColorKey::Palette(idx) => PALETTE[idx % PALETTE.len()].foreground(theme),
            ColorKey::Raw(color) => color.contrast_foreground(),
        }
    }

    pub fn palette_slot(&self) -> Option<usize> {
        match self {
            ColorKey::Palette(idx) => Some(idx % PALETTE.len()),
            ColorKey::Raw(_) => None,
        }
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorKey::Palette(idx) => f.write_str(PALETTE[idx % PALETTE.len()].name),
            ColorKey::Raw(color) => write!(f, "{}", color),
        }
    }
}

impl Serialize for ColorKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ColorKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ColorKey::parse(&s).map_err(serde::de::Error::custom)
    }
}
