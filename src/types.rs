//! Core data types shared by the wheel model, renderer and animator.
//!
//! This module defines entries and their identifiers, the color type used for
//! fills and text, and the small enums describing ordering and spin phases.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{DEFAULT_WEIGHT, MAX_WEIGHT};

/// Unique identifier for wheel entries.
pub type EntryId = Uuid;

/// An RGBA color with 8 bits per channel (straight alpha).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel, 255 is opaque
    pub a: u8,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Creates a color from channels and a fractional alpha in `[0, 1]`.
    pub fn rgba(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self {
            r,
            g,
            b,
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
        }
    }

    /// Alpha as a fraction in `[0, 1]`.
    pub fn alpha(&self) -> f32 {
        self.a as f32 / 255.0
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#')?;
        let expanded: String = if digits.len() == 3 {
            digits.chars().flat_map(|c| [c, c]).collect()
        } else {
            digits.to_string()
        };
        let channel = |i: usize| u8::from_str_radix(expanded.get(i..i + 2)?, 16).ok();
        match expanded.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self {
                r: channel(0)?,
                g: channel(2)?,
                b: channel(4)?,
                a: channel(6)?,
            }),
            _ => None,
        }
    }

    /// Converts to the rasteriser's color type.
    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

/// A single line of the wheel's entry list.
///
/// Per-entry customisation (weight, color, image) lives on the entry itself and
/// the list stores entries by [`EntryId`], so reordering never reassigns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Stable identifier assigned at creation
    pub id: EntryId,
    /// Display text as typed; trimmed when drawn
    pub label: String,
    /// Whether the entry takes part in the wheel
    pub included: bool,
    /// Relative size of the entry's sector, in `[0, 200]`
    pub weight: u32,
    /// Optional fill color overriding the palette
    pub color: Option<Color>,
    /// Optional image source (path) used as sector fill
    pub image: Option<String>,
}

impl Entry {
    /// Creates an included entry with default weight and no customisation.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            included: true,
            weight: DEFAULT_WEIGHT,
            color: None,
            image: None,
        }
    }

    /// The label as drawn on the wheel.
    pub fn display_label(&self) -> &str {
        self.label.trim()
    }

    /// Whether this entry gets a sector on the wheel.
    pub fn is_drawable(&self) -> bool {
        self.included && !self.display_label().is_empty()
    }
}

/// Clamps a requested weight into the accepted range.
pub fn clamp_weight(weight: i64) -> u32 {
    weight.clamp(0, MAX_WEIGHT as i64) as u32
}

/// Orderings that can be applied to the entry list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameOrder {
    /// A to Z
    Ascending,
    /// Z to A
    Descending,
    /// Random permutation
    Shuffle,
}

/// Phases of the spin state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinPhase {
    /// No spin in progress
    Idle,
    /// Quadratic ease-in
    Accelerating,
    /// Constant peak speed
    Cruising,
    /// Cubic ease-out, possibly extended
    Decelerating,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = Entry::new("  Alice ");
        assert_eq!(entry.display_label(), "Alice");
        assert_eq!(entry.weight, 1);
        assert!(entry.included);
        assert!(entry.is_drawable());
        assert!(!entry.id.is_nil());
    }

    #[test]
    fn test_blank_or_excluded_entry_not_drawable() {
        let blank = Entry::new("   ");
        assert!(!blank.is_drawable());

        let mut excluded = Entry::new("Bob");
        excluded.included = false;
        assert!(!excluded.is_drawable());
    }

    #[test]
    fn test_clamp_weight() {
        assert_eq!(clamp_weight(-5), 0);
        assert_eq!(clamp_weight(42), 42);
        assert_eq!(clamp_weight(999), 200);
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!(Color::from_hex("#FF6B6B"), Some(Color::rgb(255, 107, 107)));
        assert_eq!(Color::from_hex("#fff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("#00000080").map(|c| c.a), Some(128));
        assert_eq!(Color::from_hex("FF6B6B"), None);
        assert_eq!(Color::from_hex("#12345"), None);
    }
}
