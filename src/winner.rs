//! Maps a rotation angle back to the entry under the pointer.
//!
//! The pointer sits at screen angle 0 (positive x axis) and does not rotate.
//! A wheel rotated by `r` degrees therefore has its own angle
//! `(360 - r mod 360) mod 360` under the pointer.

use crate::layout;

/// Angle of the wheel's unrotated frame that is currently under the pointer.
pub fn adjusted_rotation(rotation_deg: f64) -> f64 {
    (360.0 - rotation_deg.rem_euclid(360.0)).rem_euclid(360.0)
}

/// Index of the sector under the pointer for the given rotation.
///
/// Returns `None` for an empty wheel. Sectors are walked in entry order with
/// the same accumulation the renderer uses; if rounding leaves the angle just
/// past the last accumulated edge, the last sector with a non-zero span wins.
pub fn segment_at(rotation_deg: f64, weights: &[u32]) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }
    let adjusted = adjusted_rotation(rotation_deg);
    let sectors = layout::accumulate(weights, 0.0, 360.0);
    sectors
        .iter()
        .find(|s| adjusted >= s.start && adjusted < s.end)
        .or_else(|| sectors.iter().rev().find(|s| s.span() > 0.0))
        .map(|s| s.index)
}

/// Picks the winning entry index for a terminal rotation.
pub fn resolve_winner(final_rotation_deg: f64, weights: &[u32]) -> Option<usize> {
    segment_at(final_rotation_deg, weights)
}
