//! Light/dark contrast decisions for colors and images.
//!
//! A background is [`Contrast::Dark`] when its perceptual luminance is below
//! 128 (on a 0-255 scale) and [`Contrast::Light`] otherwise. Luminance of
//! exactly 128 is Light, so it gets dark text.

use std::collections::HashMap;
use std::hash::Hash;

use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::constants::{CONTRAST_PIXEL_STRIDE, CONTRAST_SAMPLE_SIZE, LUMINANCE_THRESHOLD};
use crate::types::Color;

/// Binary tone of a background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Contrast {
    /// Light background, wants dark text
    Light,
    /// Dark background, wants light text
    Dark,
}

impl Contrast {
    /// Decides the tone for a luminance value.
    pub fn from_luminance(luminance: f64) -> Self {
        if luminance < LUMINANCE_THRESHOLD {
            Contrast::Dark
        } else {
            Contrast::Light
        }
    }

    /// Text color that reads on this background.
    pub fn text_color(self) -> Color {
        match self {
            Contrast::Dark => Color::WHITE,
            Contrast::Light => Color::BLACK,
        }
    }

    /// Outline drawn around text sitting on an image of this tone.
    pub fn outline_color(self) -> Color {
        match self {
            Contrast::Dark => Color::rgba(0, 0, 0, 0.65),
            Contrast::Light => Color::rgba(255, 255, 255, 0.9),
        }
    }

    /// Soft shadow lifting text off an image of this tone.
    pub fn shadow_color(self) -> Color {
        match self {
            Contrast::Dark => Color::rgba(0, 0, 0, 0.25),
            Contrast::Light => Color::rgba(255, 255, 255, 0.18),
        }
    }
}

/// Perceptual luminance of an RGB triple, 0-255.
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    0.2126 * r as f64 + 0.7152 * g as f64 + 0.0722 * b as f64
}

/// Tone of a solid color. Alpha is ignored.
pub fn contrast_of(color: Color) -> Contrast {
    Contrast::from_luminance(luminance(color.r, color.g, color.b))
}

/// Tone of an image.
///
/// The image is scaled onto a 64x64 grid and the luminance of every fourth
/// pixel is averaged. Transparent pixels count as black, the same as reading
/// back an unfilled canvas.
pub fn contrast_of_image(image: &Pixmap) -> Contrast {
    Contrast::from_luminance(average_luminance(image))
}

fn average_luminance(image: &Pixmap) -> f64 {
    let size = CONTRAST_SAMPLE_SIZE;
    let Some(mut sample) = Pixmap::new(size, size) else {
        return 0.0;
    };
    let transform = Transform::from_scale(
        size as f32 / image.width() as f32,
        size as f32 / image.height() as f32,
    );
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    sample.draw_pixmap(0, 0, image.as_ref(), &paint, transform, None);

    let (total, count) = sample
        .pixels()
        .iter()
        .step_by(CONTRAST_PIXEL_STRIDE)
        .fold((0.0, 0usize), |(total, count), px| {
            let c = px.demultiply();
            (total + luminance(c.red(), c.green(), c.blue()), count + 1)
        });
    total / count.max(1) as f64
}

/// Memoised contrast decisions keyed by an owner (such as an entry id).
///
/// Each slot remembers the source it was computed from; asking again with a
/// different source recomputes and overwrites, which is how a changed image or
/// color invalidates the cached decision.
#[derive(Debug)]
pub struct ContrastCache<K, S> {
    slots: HashMap<K, (S, Contrast)>,
}

impl<K, S> Default for ContrastCache<K, S> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, S: PartialEq> ContrastCache<K, S> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached decision for `key` if it was computed from `source`,
    /// otherwise computes, stores and returns a fresh one.
    pub fn get_or_compute(
        &mut self,
        key: K,
        source: S,
        compute: impl FnOnce(&S) -> Contrast,
    ) -> Contrast {
        if let Some((cached_source, contrast)) = self.slots.get(&key) {
            if *cached_source == source {
                return *contrast;
            }
        }
        let contrast = compute(&source);
        self.slots.insert(key, (source, contrast));
        contrast
    }

    /// Cached decision regardless of source.
    pub fn get(&self, key: &K) -> Option<Contrast> {
        self.slots.get(key).map(|(_, contrast)| *contrast)
    }

    /// Drops the decision for `key`.
    pub fn invalidate(&mut self, key: &K) {
        self.slots.remove(key);
    }

    /// Drops everything.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Number of cached decisions.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
