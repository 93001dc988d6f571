//! Label sizing and truncation for wheel sectors.

use std::cell::RefCell;
use std::collections::HashMap;

use unicode_segmentation::UnicodeSegmentation;

use crate::constants::{
    ELLIPSIS, LABEL_CACHE_CAPACITY, LABEL_MAX_WIDTH_RATIO, MANY_ENTRIES, MIN_BASE_FONT_SIZE,
    MIN_LABEL_FONT_SIZE,
};

/// A label that fits its sector.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedLabel {
    /// Text to draw, possibly truncated with an ellipsis
    pub text: String,
    /// Font size in pixels
    pub size: f32,
}

/// Preferred font size for a sector label before fitting.
///
/// Starts from a base proportional to the wheel radius, grows with the
/// sector's angular width and never drops below a floor that is higher for
/// crowded wheels, so small slices stay legible.
pub fn preferred_font_size(radius: f32, sector_degrees: f32, entry_count: usize) -> f32 {
    let base = MIN_BASE_FONT_SIZE.max((radius / 20.0).round());
    let min_scale = if entry_count >= MANY_ENTRIES { 1.8 } else { 0.9 };
    let scale = (sector_degrees / 30.0).max(min_scale).min(2.5);
    (base * scale).round()
}

/// Widest a label may be on a wheel of `radius`.
pub fn max_label_width(radius: f32) -> f32 {
    radius * LABEL_MAX_WIDTH_RATIO
}

/// Shrinks and then truncates `label` until `measure(text, size)` fits in
/// `max_width`.
///
/// The font is first scaled down in proportion to the overflow (not below
/// 8px). If that is not enough, trailing graphemes are dropped and `"..."`
/// appended. When even the ellipsis alone is too wide the text is empty.
pub fn fit_label(
    label: &str,
    preferred_size: f32,
    max_width: f32,
    measure: impl Fn(&str, f32) -> f32,
) -> FittedLabel {
    let mut size = preferred_size;
    let width = measure(label, size);
    if width <= max_width {
        return FittedLabel {
            text: label.to_string(),
            size,
        };
    }

    size = (size * max_width / width).floor().max(MIN_LABEL_FONT_SIZE);
    if measure(label, size) <= max_width {
        return FittedLabel {
            text: label.to_string(),
            size,
        };
    }

    let mut graphemes: Vec<&str> = label.graphemes(true).collect();
    loop {
        let candidate = format!("{}{}", graphemes.concat(), ELLIPSIS);
        if measure(&candidate, size) <= max_width {
            return FittedLabel {
                text: candidate,
                size,
            };
        }
        if graphemes.pop().is_none() {
            return FittedLabel {
                text: String::new(),
                size,
            };
        }
    }
}

/// Fitted labels remembered across frames.
///
/// Keyed by text, preferred size and width limit, which pins down the sector
/// span and wheel radius. Results assume one font set per cache.
#[derive(Debug, Clone, Default)]
pub struct LabelCache {
    fitted: RefCell<HashMap<(String, u32, u32), FittedLabel>>,
}

impl LabelCache {
    /// [`fit_label`], measured only on the first request for a key.
    pub fn fit(
        &self,
        label: &str,
        preferred_size: f32,
        max_width: f32,
        measure: impl Fn(&str, f32) -> f32,
    ) -> FittedLabel {
        let key = (label.to_string(), preferred_size.to_bits(), max_width.to_bits());
        if let Some(hit) = self.fitted.borrow().get(&key) {
            return hit.clone();
        }
        let fitted = fit_label(label, preferred_size, max_width, measure);
        let mut cache = self.fitted.borrow_mut();
        if cache.len() >= LABEL_CACHE_CAPACITY {
            cache.clear();
        }
        cache.insert(key, fitted.clone());
        fitted
    }

    /// Number of remembered labels.
    pub fn len(&self) -> usize {
        self.fitted.borrow().len()
    }

    /// Whether nothing is remembered.
    pub fn is_empty(&self) -> bool {
        self.fitted.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every grapheme advances half the font size.
    fn fixed_advance(text: &str, size: f32) -> f32 {
        text.graphemes(true).count() as f32 * size * 0.5
    }

    #[test]
    fn test_preferred_size_scales_with_sector() {
        // base = max(12, 10) = 12
        assert_eq!(preferred_font_size(200.0, 90.0, 2), 30.0);
        assert_eq!(preferred_font_size(200.0, 10.0, 2), 11.0);
        assert_eq!(preferred_font_size(200.0, 10.0, 12), 22.0);
        assert_eq!(preferred_font_size(400.0, 360.0, 1), 50.0);
    }

    #[test]
    fn test_short_label_is_untouched() {
        let fit = fit_label("Bob", 20.0, 100.0, fixed_advance);
        assert_eq!(fit, FittedLabel { text: "Bob".into(), size: 20.0 });
    }

    #[test]
    fn test_overflow_shrinks_font_first() {
        // 10 graphemes at 20px = 100px, limit 80px
        let fit = fit_label("abcdefghij", 20.0, 80.0, fixed_advance);
        assert_eq!(fit.text, "abcdefghij");
        assert_eq!(fit.size, 16.0);
        assert!(fixed_advance(&fit.text, fit.size) <= 80.0);
    }

    #[test]
    fn test_truncates_with_ellipsis_at_min_size() {
        let label = "A very long participant name that cannot fit";
        let max_width = 60.0;
        let fit = fit_label(label, 30.0, max_width, fixed_advance);
        assert_eq!(fit.size, MIN_LABEL_FONT_SIZE);
        assert!(fit.text.ends_with(ELLIPSIS));
        assert!(fixed_advance(&fit.text, fit.size) <= max_width);
        assert!(label.starts_with(fit.text.trim_end_matches(ELLIPSIS)));
    }

    #[test]
    fn test_truncation_keeps_graphemes_whole() {
        let label = "ééééééééééééééééééééé";
        let fit = fit_label(label, 8.0, 30.0, fixed_advance);
        assert!(fit.text.ends_with(ELLIPSIS));
        assert!(fixed_advance(&fit.text, fit.size) <= 30.0);
    }

    #[test]
    fn test_nothing_fits_gives_empty_text() {
        let fit = fit_label("Alice", 20.0, 5.0, fixed_advance);
        assert!(fit.text.is_empty());
    }

    #[test]
    fn test_cache_measures_each_label_once() {
        let calls = std::cell::Cell::new(0);
        let counting = |text: &str, size: f32| {
            calls.set(calls.get() + 1);
            fixed_advance(text, size)
        };
        let cache = LabelCache::default();

        let first = cache.fit("abcdefghij", 20.0, 80.0, counting);
        let measured = calls.get();
        assert!(measured > 0);
        assert_eq!(cache.fit("abcdefghij", 20.0, 80.0, counting), first);
        assert_eq!(calls.get(), measured);

        // A narrower sector is a different key
        cache.fit("abcdefghij", 20.0, 40.0, counting);
        assert!(calls.get() > measured);
        assert_eq!(cache.len(), 2);
    }
}
