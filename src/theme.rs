//! Page-wide presentation theme derived from the background selection.
//!
//! Computing the theme is pure; the host applies it to its own widgets.

use serde::{Deserialize, Serialize};
use tiny_skia::Pixmap;

use crate::contrast::{contrast_of, contrast_of_image, Contrast};
use crate::types::Color;

/// What the user picked as page background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BackgroundSelection {
    /// Solid page color
    Color(Color),
    /// Image path, either a full-page background or a wheel fill
    Image(String),
    /// Back to defaults
    Reset,
}

/// Derived page presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct PageTheme {
    /// Solid page background, if one was chosen
    pub background: Option<Color>,
    /// Image path used as page background, if one was chosen
    pub background_image: Option<String>,
    /// Tone of the background; `None` for the default page
    pub contrast: Option<Contrast>,
}

impl Default for PageTheme {
    fn default() -> Self {
        Self::reset()
    }
}

impl PageTheme {
    /// Theme for the untouched default page.
    pub fn reset() -> Self {
        Self {
            background: None,
            background_image: None,
            contrast: None,
        }
    }

    /// Theme for a solid background color.
    pub fn from_color(color: Color) -> Self {
        Self {
            background: Some(color),
            background_image: None,
            contrast: Some(contrast_of(color)),
        }
    }

    /// Theme for a decoded page background image.
    pub fn from_image(source: impl Into<String>, image: &Pixmap) -> Self {
        Self {
            background: None,
            background_image: Some(source.into()),
            contrast: Some(contrast_of_image(image)),
        }
    }

    /// Whether a custom background is active.
    pub fn is_custom(&self) -> bool {
        self.contrast.is_some()
    }

    /// Page text color, softened slightly off pure black/white.
    pub fn text_color(&self) -> Option<Color> {
        self.contrast.map(|c| match c {
            Contrast::Dark => Color::rgba(255, 255, 255, 0.94),
            Contrast::Light => Color::rgba(0, 0, 0, 0.92),
        })
    }

    /// Outline behind page text so it stays readable over busy backgrounds.
    pub fn text_outline(&self) -> Option<Color> {
        self.contrast.map(|c| match c {
            Contrast::Dark => Color::rgba(0, 0, 0, 0.55),
            Contrast::Light => Color::rgba(255, 255, 255, 0.62),
        })
    }

    /// Border color for buttons on the themed page.
    pub fn button_border(&self) -> Option<Color> {
        self.contrast.map(|c| match c {
            Contrast::Dark => Color::rgba(0, 0, 0, 0.62),
            Contrast::Light => Color::rgba(255, 255, 255, 0.65),
        })
    }
}
