//! Weighted sector geometry.
//!
//! The renderer and the winner resolver both go through [`accumulate`], so the
//! sector the pointer is over is always the sector that was drawn there.

use std::f64::consts::TAU;

/// Angular extent of one sector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    /// Position of the entry among the drawable entries
    pub index: usize,
    /// Angle where the sector begins
    pub start: f64,
    /// Angle where the sector ends
    pub end: f64,
}

impl Sector {
    /// Angular width of the sector.
    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    /// Angle halfway between start and end.
    pub fn mid(&self) -> f64 {
        self.start + self.span() / 2.0
    }
}

/// Normalised share of each weight.
///
/// Weights are divided by their sum. When every weight is zero each entry gets
/// an equal share instead, so an all-zero wheel still draws and never divides
/// by zero.
pub fn fractions(weights: &[u32]) -> Vec<f64> {
    let total: f64 = weights.iter().map(|&w| w as f64).sum();
    if total <= 0.0 {
        let n = weights.len().max(1) as f64;
        return vec![1.0 / n; weights.len()];
    }
    weights.iter().map(|&w| w as f64 / total).collect()
}

/// Lays sectors out sequentially from `start`, in entry order, over
/// `full_turn` units (`TAU` for radians, `360.0` for degrees).
pub fn accumulate(weights: &[u32], start: f64, full_turn: f64) -> Vec<Sector> {
    let mut acc = start;
    fractions(weights)
        .into_iter()
        .enumerate()
        .map(|(index, share)| {
            let sector = Sector {
                index,
                start: acc,
                end: acc + share * full_turn,
            };
            acc = sector.end;
            sector
        })
        .collect()
}

/// Sector layout in radians for a wheel rotated by `rotation_deg` degrees.
pub fn sector_layout(weights: &[u32], rotation_deg: f64) -> Vec<Sector> {
    accumulate(weights, rotation_deg.to_radians(), TAU)
}
