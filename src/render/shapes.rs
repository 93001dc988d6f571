//! Path builders for the wheel's shapes.
//!
//! tiny-skia has no arc primitive, so arcs are approximated with cubic Bézier
//! segments of at most a quarter turn each.

use std::f32::consts::{FRAC_PI_2, TAU};

use tiny_skia::{Path, PathBuilder, Rect};

/// Appends an arc around `(cx, cy)` from angle `start` to `end` (radians,
/// clockwise in screen space). The builder must already be at the arc start.
pub fn arc_to(pb: &mut PathBuilder, cx: f32, cy: f32, radius: f32, start: f32, end: f32) {
    let sweep = end - start;
    if sweep.abs() <= f32::EPSILON {
        return;
    }
    let segments = (sweep.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
    let step = sweep / segments as f32;
    let k = 4.0 / 3.0 * (step / 4.0).tan();

    let mut a0 = start;
    for _ in 0..segments {
        let a1 = a0 + step;
        let (s0, c0) = a0.sin_cos();
        let (s1, c1) = a1.sin_cos();
        let p0 = (cx + radius * c0, cy + radius * s0);
        let p3 = (cx + radius * c1, cy + radius * s1);
        pb.cubic_to(
            p0.0 - k * radius * s0,
            p0.1 + k * radius * c0,
            p3.0 + k * radius * s1,
            p3.1 - k * radius * c1,
            p3.0,
            p3.1,
        );
        a0 = a1;
    }
}

/// Pie slice from the center out to `radius` between two angles.
///
/// Returns `None` for an empty or negative span.
pub fn wedge(cx: f32, cy: f32, radius: f32, start: f32, end: f32) -> Option<Path> {
    if end - start <= 0.0 || radius <= 0.0 {
        return None;
    }
    let end = end.min(start + TAU);
    let mut pb = PathBuilder::new();
    pb.move_to(cx, cy);
    pb.line_to(cx + radius * start.cos(), cy + radius * start.sin());
    arc_to(&mut pb, cx, cy, radius, start, end);
    pb.close();
    pb.finish()
}

/// Open arc, for strokes.
pub fn arc(cx: f32, cy: f32, radius: f32, start: f32, end: f32) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(cx + radius * start.cos(), cy + radius * start.sin());
    arc_to(&mut pb, cx, cy, radius, start, end);
    pb.finish()
}

/// Full circle.
pub fn circle(cx: f32, cy: f32, radius: f32) -> Option<Path> {
    PathBuilder::from_circle(cx, cy, radius)
}

/// Rectangle with rounded corners. The corner radius is capped at half the
/// shorter side.
pub fn rounded_rect(x: f32, y: f32, w: f32, h: f32, radius: f32) -> Option<Path> {
    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    if r == 0.0 {
        return Rect::from_xywh(x, y, w, h).map(PathBuilder::from_rect);
    }
    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    arc_to(&mut pb, x + w - r, y + r, r, -FRAC_PI_2, 0.0);
    pb.line_to(x + w, y + h - r);
    arc_to(&mut pb, x + w - r, y + h - r, r, 0.0, FRAC_PI_2);
    pb.line_to(x + r, y + h);
    arc_to(&mut pb, x + r, y + h - r, r, FRAC_PI_2, FRAC_PI_2 * 2.0);
    pb.line_to(x, y + r);
    arc_to(&mut pb, x + r, y + r, r, FRAC_PI_2 * 2.0, FRAC_PI_2 * 3.0);
    pb.close();
    pb.finish()
}

/// Closed polygon through the given points.
pub fn polygon(points: &[(f32, f32)]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.0, first.1);
    for p in rest {
        pb.line_to(p.0, p.1);
    }
    pb.close();
    pb.finish()
}

/// Open polyline through the given points.
pub fn polyline(points: &[(f32, f32)]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.0, first.1);
    for p in rest {
        pb.line_to(p.0, p.1);
    }
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_wedge_bounds() {
        let path = wedge(100.0, 100.0, 50.0, 0.0, FRAC_PI_2).unwrap();
        let b = path.bounds();
        assert!((b.left() - 100.0).abs() < 0.01);
        assert!((b.top() - 100.0).abs() < 0.01);
        assert!((b.right() - 150.0).abs() < 0.01);
        assert!((b.bottom() - 150.0).abs() < 0.01);
    }

    #[test]
    fn test_full_turn_wedge_is_a_disc() {
        let path = wedge(0.0, 0.0, 10.0, 1.0, 1.0 + TAU).unwrap();
        // bounds include control points, which sit slightly outside the circle
        let b = path.bounds();
        assert!(b.width() >= 19.95 && b.width() < 23.5);
        assert!(b.height() >= 19.95 && b.height() < 23.5);
    }

    #[test]
    fn test_empty_wedge_is_none() {
        assert!(wedge(0.0, 0.0, 10.0, 1.0, 1.0).is_none());
        assert!(wedge(0.0, 0.0, 0.0, 0.0, 1.0).is_none());
    }

    #[test]
    fn test_rounded_rect_fits_box() {
        let path = rounded_rect(10.0, 20.0, 30.0, 40.0, 7.0).unwrap();
        let b = path.bounds();
        assert!((b.left() - 10.0).abs() < 0.01);
        assert!((b.bottom() - 60.0).abs() < 0.01);
        assert!(rounded_rect(0.0, 0.0, 10.0, 10.0, 0.0).is_some());
    }

    #[test]
    fn test_polygon_needs_points() {
        assert!(polygon(&[]).is_none());
        assert!(polygon(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]).is_some());
    }
}
