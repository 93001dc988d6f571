//! Wheel rendering.
//!
//! [`WheelRenderer::draw`] paints one complete frame onto a [`Canvas`]: the
//! sectors with their fills, separators and labels, then the rim vignette,
//! the fixed pointer and the center hub. Sector geometry comes from
//! [`crate::layout::sector_layout`], the same accumulation the winner
//! resolver walks.
//!
//! Drawing never fails as a whole. A sector whose image cannot be drawn falls
//! back to its color fill and the frame carries on.

mod canvas;
pub mod shapes;
mod text;

pub use canvas::{estimate_text_width, Canvas, Fill, FontContext, PixmapCanvas, TextRun};
pub use text::{fit_label, max_label_width, preferred_font_size, FittedLabel, LabelCache};

use tiny_skia::{Path, Pixmap, Transform};

use crate::constants::*;
use crate::contrast::Contrast;
use crate::error::RenderError;
use crate::layout::{sector_layout, Sector};
use crate::types::Color;

/// Bitmap together with its precomputed contrast decision.
#[derive(Debug, Clone, Copy)]
pub struct ImageFill<'a> {
    /// Decoded bitmap
    pub image: &'a Pixmap,
    /// Tone of the bitmap
    pub contrast: Contrast,
}

/// One drawable entry as the renderer sees it.
#[derive(Debug, Clone)]
pub struct Wedge<'a> {
    /// Label text
    pub label: &'a str,
    /// Sector weight
    pub weight: u32,
    /// Per-entry color override
    pub color: Option<Color>,
    /// Per-entry image, if decoded
    pub image: Option<ImageFill<'a>>,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone)]
pub struct WheelFrame<'a> {
    /// Drawable entries in list order
    pub wedges: Vec<Wedge<'a>>,
    /// Wheel rotation in degrees
    pub rotation: f64,
    /// Whether a spin is running (hub shows pressed)
    pub spinning: bool,
    /// Label color over plain fills
    pub text_color: Color,
    /// Image filling every sector without its own color or image
    pub wheel_image: Option<ImageFill<'a>>,
}

impl WheelFrame<'_> {
    /// Weights of the wedges in order.
    pub fn weights(&self) -> Vec<u32> {
        self.wedges.iter().map(|w| w.weight).collect()
    }
}

/// Placement of the wheel on a canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelGeometry {
    /// Center x
    pub cx: f32,
    /// Center y
    pub cy: f32,
    /// Wheel radius
    pub radius: f32,
    /// Size multiplier for the hub and pointer
    pub scale: f32,
}

impl WheelGeometry {
    /// Geometry for a canvas of the given size, or `None` if the canvas is
    /// too small to hold a wheel.
    pub fn for_canvas(width: u32, height: u32) -> Option<Self> {
        let cx = width as f32 / 2.0;
        let cy = height as f32 / 2.0;
        let radius = cx.min(cy) - WHEEL_EDGE_PADDING;
        if radius <= 0.0 {
            return None;
        }
        let scale = if width >= LARGE_CANVAS_WIDTH {
            LARGE_CANVAS_CENTER_SCALE
        } else {
            1.0
        };
        Some(Self {
            cx,
            cy,
            radius,
            scale,
        })
    }

    /// Whether a canvas point lies on the wheel.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        (x - self.cx).hypot(y - self.cy) <= self.radius
    }
}

/// What ended up painted behind a sector label.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Backdrop {
    Image(Contrast),
    Plain,
}

const POINTER_SHAPE: [(f32, f32); 3] = [(50.0, 0.0), (-25.0, -40.0), (-25.0, 40.0)];

const HUB_RESTING: [(f32, Color); 3] = [
    (0.0, Color::rgb(0x2a, 0x2a, 0x2a)),
    (0.7, Color::rgb(0x1a, 0x1a, 0x1a)),
    (1.0, Color::rgb(0x00, 0x00, 0x00)),
];

const HUB_PRESSED: [(f32, Color); 3] = [
    (0.0, Color::rgb(0x00, 0x00, 0x00)),
    (0.7, Color::rgb(0x1a, 0x1a, 0x1a)),
    (1.0, Color::rgb(0x0d, 0x0d, 0x0d)),
];

fn log_failure(what: &str, result: Result<(), RenderError>) {
    if let Err(e) = result {
        log::warn!("{} not drawn: {}", what, e);
    }
}

/// Draws wheel frames.
#[derive(Debug, Clone)]
pub struct WheelRenderer {
    palette: Vec<Color>,
    labels: LabelCache,
}

impl Default for WheelRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl WheelRenderer {
    /// Creates a renderer with the default sector palette.
    pub fn new() -> Self {
        Self::with_palette(WHEEL_PALETTE.iter().filter_map(|hex| Color::from_hex(hex)).collect())
    }

    /// Creates a renderer with a custom sector palette.
    pub fn with_palette(palette: Vec<Color>) -> Self {
        Self {
            palette,
            labels: LabelCache::default(),
        }
    }

    /// Palette color for the sector at `index`.
    pub fn palette_color(&self, index: usize) -> Color {
        if self.palette.is_empty() {
            return Color::rgb(200, 200, 200);
        }
        self.palette[index % self.palette.len()]
    }

    /// Paints a full frame.
    ///
    /// A canvas too small for a wheel is left untouched. With no wedges a
    /// dimmed placeholder ring is drawn instead of sectors.
    pub fn draw<C: Canvas>(&self, canvas: &mut C, frame: &WheelFrame) -> Result<(), RenderError> {
        let (width, height) = canvas.size();
        let Some(geo) = WheelGeometry::for_canvas(width, height) else {
            log::debug!("canvas {}x{} too small for the wheel", width, height);
            return Ok(());
        };

        if frame.wedges.is_empty() {
            return self.draw_placeholder(canvas, &geo);
        }

        let sectors = sector_layout(&frame.weights(), frame.rotation);
        for (sector, wedge) in sectors.iter().zip(&frame.wedges) {
            self.draw_sector(canvas, &geo, frame, sector, wedge);
        }

        self.draw_vignette(canvas, &geo)?;
        self.draw_pointer(canvas, &geo)?;
        self.draw_hub(canvas, &geo, frame.spinning)
    }

    fn draw_sector<C: Canvas>(
        &self,
        canvas: &mut C,
        geo: &WheelGeometry,
        frame: &WheelFrame,
        sector: &Sector,
        wedge: &Wedge,
    ) {
        let Some(path) = shapes::wedge(
            geo.cx,
            geo.cy,
            geo.radius,
            sector.start as f32,
            sector.end as f32,
        ) else {
            // zero-weight sector, nothing to show
            return;
        };

        let backdrop = self.fill_sector(canvas, geo, frame, sector, wedge, &path);
        log_failure(
            "separator",
            canvas.stroke_path(&path, Color::WHITE, SEPARATOR_WIDTH, None),
        );
        log_failure(
            "label",
            self.draw_label(canvas, geo, frame, sector, wedge, backdrop),
        );
    }

    /// Fills one sector: entry image over its color, else entry color, else
    /// the wheel image, else the palette.
    fn fill_sector<C: Canvas>(
        &self,
        canvas: &mut C,
        geo: &WheelGeometry,
        frame: &WheelFrame,
        sector: &Sector,
        wedge: &Wedge,
        path: &Path,
    ) -> Backdrop {
        let base = wedge
            .color
            .unwrap_or_else(|| self.palette_color(sector.index));

        if let Some(image) = wedge.image {
            log_failure("sector fill", canvas.fill_path(path, &Fill::Solid(base), None));
            return match self.draw_entry_image(canvas, geo, sector, image, path) {
                Ok(()) => Backdrop::Image(image.contrast),
                Err(e) => {
                    log::warn!("image for sector {} not drawn, using color: {}", sector.index, e);
                    Backdrop::Plain
                }
            };
        }

        if wedge.color.is_none() {
            if let Some(wheel) = frame.wheel_image {
                let r = geo.radius;
                let transform = Transform::from_translate(geo.cx, geo.cy)
                    .pre_rotate(frame.rotation as f32)
                    .pre_translate(-r, -r)
                    .pre_scale(
                        2.0 * r / wheel.image.width() as f32,
                        2.0 * r / wheel.image.height() as f32,
                    );
                let fill = Fill::Image {
                    image: wheel.image,
                    transform,
                };
                match canvas.fill_path(path, &fill, None) {
                    Ok(()) => return Backdrop::Image(wheel.contrast),
                    Err(e) => log::warn!("wheel image not drawn in sector {}: {}", sector.index, e),
                }
            }
        }

        log_failure("sector fill", canvas.fill_path(path, &Fill::Solid(base), None));
        Backdrop::Plain
    }

    /// Places an entry image along the sector's mid-angle radius, sized by
    /// the sector's angular width and clipped to the wedge with rounded corners.
    fn draw_entry_image<C: Canvas>(
        &self,
        canvas: &mut C,
        geo: &WheelGeometry,
        sector: &Sector,
        fill: ImageFill,
        wedge_path: &Path,
    ) -> Result<(), RenderError> {
        let r = geo.radius;
        let (iw, ih) = (fill.image.width() as f32, fill.image.height() as f32);
        let size_factor = (sector.span().to_degrees() as f32 / 30.0).clamp(0.7, 1.4);
        let max_side = 0.4 * r * size_factor;
        let fit = 1f32.min(max_side / iw).min(max_side / ih);
        let dw = (iw * fit).max(ENTRY_IMAGE_MIN_SIZE);
        let dh = (ih * fit).max(ENTRY_IMAGE_MIN_SIZE);

        // keep the image's far corners inside the rim
        let reach = (dw / 2.0).hypot(dh / 2.0);
        let distance = (0.68 * r).min((r - reach - 6.0).max(0.0));

        let frame = Transform::from_translate(geo.cx, geo.cy).pre_rotate(sector.mid().to_degrees() as f32);
        let (x0, y0) = (distance - dw / 2.0, -dh / 2.0);
        let rect = shapes::rounded_rect(x0, y0, dw, dh, ENTRY_IMAGE_CORNER_RADIUS)
            .and_then(|p| p.transform(frame))
            .ok_or(RenderError::DegeneratePath)?;
        let transform = frame.pre_translate(x0, y0).pre_scale(dw / iw, dh / ih);

        canvas.fill_path(
            &rect,
            &Fill::Image {
                image: fill.image,
                transform,
            },
            Some(wedge_path),
        )
    }

    fn draw_label<C: Canvas>(
        &self,
        canvas: &mut C,
        geo: &WheelGeometry,
        frame: &WheelFrame,
        sector: &Sector,
        wedge: &Wedge,
        backdrop: Backdrop,
    ) -> Result<(), RenderError> {
        let label = wedge.label.trim();
        if label.is_empty() {
            return Ok(());
        }
        let r = geo.radius;
        let preferred = preferred_font_size(
            r,
            sector.span().to_degrees() as f32,
            frame.wedges.len(),
        );
        let fitted = self.labels.fit(label, preferred, max_label_width(r), |text, size| {
            canvas.measure_text(text, size, true)
        });
        if fitted.text.is_empty() {
            return Ok(());
        }

        let (color, outline, shadow) = match backdrop {
            Backdrop::Image(contrast) => {
                let width = (fitted.size * 0.12).round().max(2.0);
                (
                    contrast.text_color(),
                    Some((contrast.outline_color(), width)),
                    Some(contrast.shadow_color()),
                )
            }
            Backdrop::Plain => (frame.text_color, None, None),
        };

        canvas.fill_text(&TextRun {
            text: &fitted.text,
            x: LABEL_RADIAL_OFFSET * r,
            y: fitted.size * 0.3,
            size: fitted.size,
            bold: true,
            color,
            outline,
            shadow,
            transform: Transform::from_translate(geo.cx, geo.cy)
                .pre_rotate(sector.mid().to_degrees() as f32),
        })
    }

    /// Darkens the outer rim slightly.
    fn draw_vignette<C: Canvas>(&self, canvas: &mut C, geo: &WheelGeometry) -> Result<(), RenderError> {
        let disc = shapes::circle(geo.cx, geo.cy, geo.radius).ok_or(RenderError::DegeneratePath)?;
        let fill = Fill::Radial {
            focal: (geo.cx, geo.cy),
            center: (geo.cx, geo.cy),
            radius: geo.radius,
            stops: vec![
                (0.5, Color::rgba(0, 0, 0, 0.0)),
                (0.925, Color::rgba(0, 0, 0, 0.0)),
                (0.975, Color::rgba(0, 0, 0, 0.08)),
                (1.0, Color::rgba(0, 0, 0, 0.16)),
            ],
        };
        canvas.fill_path(&disc, &fill, None)
    }

    /// Fixed arrow pointing at screen angle 0, drawn as a raised button.
    fn draw_pointer<C: Canvas>(&self, canvas: &mut C, geo: &WheelGeometry) -> Result<(), RenderError> {
        let s = geo.scale;
        let ox = geo.cx + POINTER_OFFSET * s;
        let oy = geo.cy;
        let place = |dx: f32, dy: f32| -> Vec<(f32, f32)> {
            POINTER_SHAPE
                .iter()
                .map(|(x, y)| (ox + (x + dx) * s, oy + (y + dy) * s))
                .collect()
        };

        let shadow = shapes::polygon(&place(3.0, 4.0)).ok_or(RenderError::DegeneratePath)?;
        canvas.fill_path(&shadow, &Fill::Solid(Color::rgba(0, 0, 0, 0.08)), None)?;

        let body = shapes::polygon(&place(0.0, 0.0)).ok_or(RenderError::DegeneratePath)?;
        canvas.stroke_path(&body, Color::rgba(255, 255, 255, 0.5), 4.0 * s, None)?;
        canvas.fill_path(&body, &Fill::Solid(Color::BLACK), None)?;

        let tip = place(0.0, 0.0);
        let edge = shapes::polyline(&tip[..2]).ok_or(RenderError::DegeneratePath)?;
        canvas.stroke_path(&edge, Color::rgba(255, 255, 255, 0.6), 2.0, None)
    }

    /// Center button; darker and inset while spinning.
    fn draw_hub<C: Canvas>(
        &self,
        canvas: &mut C,
        geo: &WheelGeometry,
        spinning: bool,
    ) -> Result<(), RenderError> {
        let s = geo.scale;
        let r = HUB_RADIUS * s;
        let disc = shapes::circle(geo.cx, geo.cy, r).ok_or(RenderError::DegeneratePath)?;
        let stops = if spinning { HUB_PRESSED } else { HUB_RESTING };
        canvas.fill_path(
            &disc,
            &Fill::Radial {
                focal: (geo.cx - 10.0 * s, geo.cy - 10.0 * s),
                center: (geo.cx, geo.cy),
                radius: r,
                stops: stops.to_vec(),
            },
            None,
        )?;

        if spinning {
            let inset = shapes::circle(geo.cx, geo.cy, r - 2.0 * s).ok_or(RenderError::DegeneratePath)?;
            canvas.stroke_path(&inset, Color::rgba(0, 0, 0, 0.35), 4.0 * s, Some(&disc))?;
        } else {
            let highlight = shapes::arc(
                geo.cx,
                geo.cy,
                r - 4.0 * s,
                200f32.to_radians(),
                290f32.to_radians(),
            )
            .ok_or(RenderError::DegeneratePath)?;
            canvas.stroke_path(&highlight, Color::rgba(255, 255, 255, 0.18), 3.0 * s, None)?;
        }
        canvas.stroke_path(&disc, Color::WHITE, 3.0 * s, None)?;

        let size = HUB_FONT_SIZE * s;
        let (color, offset) = if spinning {
            (Color::rgb(0xcc, 0xcc, 0xcc), 2.0 * s)
        } else {
            (Color::WHITE, 0.0)
        };
        canvas.fill_text(&TextRun {
            text: HUB_LABEL,
            x: geo.cx,
            y: geo.cy + size * 0.35 + offset,
            size,
            bold: true,
            color,
            outline: None,
            shadow: None,
            transform: Transform::identity(),
        })
    }

    fn draw_placeholder<C: Canvas>(&self, canvas: &mut C, geo: &WheelGeometry) -> Result<(), RenderError> {
        let disc = shapes::circle(geo.cx, geo.cy, geo.radius).ok_or(RenderError::DegeneratePath)?;
        canvas.fill_path(&disc, &Fill::Solid(Color::rgba(128, 128, 128, 0.12)), None)?;
        canvas.stroke_path(&disc, Color::rgba(128, 128, 128, 0.35), SEPARATOR_WIDTH, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Solid(Color),
        Radial,
        Image { clipped: bool },
        Stroke(Color, f32),
        Text {
            text: String,
            color: Color,
            outlined: bool,
        },
    }

    /// Canvas that records calls and measures every char as 0.6em.
    struct RecordingCanvas {
        width: u32,
        height: u32,
        ops: Vec<Op>,
        reject_images: bool,
    }

    impl RecordingCanvas {
        fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                ops: Vec::new(),
                reject_images: false,
            }
        }

        fn texts(&self) -> Vec<(String, Color, bool)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Text {
                        text,
                        color,
                        outlined,
                    } => Some((text.clone(), *color, *outlined)),
                    _ => None,
                })
                .collect()
        }

        /// Separators drawn before the rim vignette; the hub border looks alike.
        fn separators(&self) -> usize {
            self.ops
                .iter()
                .take_while(|op| **op != Op::Radial)
                .filter(|op| **op == SEPARATOR)
                .count()
        }
    }

    impl Canvas for RecordingCanvas {
        fn size(&self) -> (u32, u32) {
            (self.width, self.height)
        }

        fn fill_path(&mut self, _path: &Path, fill: &Fill, clip: Option<&Path>) -> Result<(), RenderError> {
            let op = match fill {
                Fill::Solid(c) => Op::Solid(*c),
                Fill::Radial { .. } => Op::Radial,
                Fill::Image { .. } => {
                    if self.reject_images {
                        return Err(RenderError::Image("rejected".into()));
                    }
                    Op::Image {
                        clipped: clip.is_some(),
                    }
                }
            };
            self.ops.push(op);
            Ok(())
        }

        fn stroke_path(
            &mut self,
            _path: &Path,
            color: Color,
            width: f32,
            _clip: Option<&Path>,
        ) -> Result<(), RenderError> {
            self.ops.push(Op::Stroke(color, width));
            Ok(())
        }

        fn fill_text(&mut self, run: &TextRun) -> Result<(), RenderError> {
            self.ops.push(Op::Text {
                text: run.text.to_string(),
                color: run.color,
                outlined: run.outline.is_some(),
            });
            Ok(())
        }

        fn measure_text(&self, text: &str, size: f32, _bold: bool) -> f32 {
            estimate_text_width(text, size)
        }
    }

    fn wedge(label: &str, weight: u32) -> Wedge<'_> {
        Wedge {
            label,
            weight,
            color: None,
            image: None,
        }
    }

    fn frame(wedges: Vec<Wedge<'_>>) -> WheelFrame<'_> {
        WheelFrame {
            wedges,
            rotation: 0.0,
            spinning: false,
            text_color: Color::rgb(20, 20, 20),
            wheel_image: None,
        }
    }

    fn solid_image(color: Color) -> Pixmap {
        let mut image = Pixmap::new(16, 16).unwrap();
        image.fill(color.to_skia());
        image
    }

    const SEPARATOR: Op = Op::Stroke(Color::WHITE, SEPARATOR_WIDTH);

    #[test]
    fn test_geometry() {
        let geo = WheelGeometry::for_canvas(400, 300).unwrap();
        assert_eq!(geo.radius, 143.0);
        assert_eq!(geo.scale, 1.0);
        assert_eq!(WheelGeometry::for_canvas(800, 800).unwrap().scale, LARGE_CANVAS_CENTER_SCALE);
        assert!(WheelGeometry::for_canvas(10, 10).is_none());
        assert!(geo.contains(200.0, 150.0));
        assert!(!geo.contains(0.0, 0.0));
    }

    #[test]
    fn test_sectors_drawn_in_order_with_separators() {
        let renderer = WheelRenderer::new();
        let mut canvas = RecordingCanvas::new(400, 400);
        renderer
            .draw(&mut canvas, &frame(vec![wedge("Alice", 1), wedge("Bob", 2), wedge("Cy", 1)]))
            .unwrap();

        let texts = canvas.texts();
        let labels: Vec<&str> = texts.iter().map(|(t, _, _)| t.as_str()).collect();
        assert_eq!(labels, vec!["Alice", "Bob", "Cy", HUB_LABEL]);
        assert!(texts[..3].iter().all(|(_, c, o)| *c == Color::rgb(20, 20, 20) && !o));
        assert_eq!(canvas.separators(), 3);
        assert_eq!(canvas.ops[0], Op::Solid(renderer.palette_color(0)));
    }

    #[test]
    fn test_zero_weight_sector_is_skipped() {
        let mut canvas = RecordingCanvas::new(400, 400);
        WheelRenderer::new()
            .draw(&mut canvas, &frame(vec![wedge("Zero", 0), wedge("One", 1)]))
            .unwrap();
        let texts = canvas.texts();
        assert_eq!(texts[0].0, "One");
        assert_eq!(canvas.separators(), 1);
    }

    #[test]
    fn test_entry_color_overrides_palette() {
        let red = Color::rgb(255, 0, 0);
        let mut w = wedge("Bob", 1);
        w.color = Some(red);
        let mut canvas = RecordingCanvas::new(400, 400);
        WheelRenderer::new().draw(&mut canvas, &frame(vec![w])).unwrap();
        assert_eq!(canvas.ops[0], Op::Solid(red));
    }

    #[test]
    fn test_entry_image_gets_contrasting_outlined_text() {
        let image = solid_image(Color::rgb(10, 10, 10));
        let mut w = wedge("Night", 1);
        w.image = Some(ImageFill {
            image: &image,
            contrast: Contrast::Dark,
        });
        let mut canvas = RecordingCanvas::new(400, 400);
        WheelRenderer::new()
            .draw(&mut canvas, &frame(vec![w, wedge("Day", 1)]))
            .unwrap();

        assert!(canvas.ops.contains(&Op::Image { clipped: true }));
        let texts = canvas.texts();
        assert_eq!(texts[0], ("Night".to_string(), Color::WHITE, true));
        assert_eq!(texts[1], ("Day".to_string(), Color::rgb(20, 20, 20), false));
    }

    #[test]
    fn test_failed_image_falls_back_to_color() {
        let image = solid_image(Color::WHITE);
        let mut w = wedge("Snow", 1);
        w.image = Some(ImageFill {
            image: &image,
            contrast: Contrast::Light,
        });
        let mut canvas = RecordingCanvas::new(400, 400);
        canvas.reject_images = true;

        let renderer = WheelRenderer::new();
        renderer
            .draw(&mut canvas, &frame(vec![w, wedge("Rain", 1)]))
            .unwrap();

        assert_eq!(canvas.ops[0], Op::Solid(renderer.palette_color(0)));
        let texts = canvas.texts();
        assert_eq!(texts.len(), 3);
        assert_eq!(texts[0], ("Snow".to_string(), Color::rgb(20, 20, 20), false));
    }

    #[test]
    fn test_wheel_image_fills_uncolored_sectors() {
        let image = solid_image(Color::rgb(240, 240, 240));
        let mut colored = wedge("Own", 1);
        colored.color = Some(Color::rgb(0, 0, 200));
        let mut f = frame(vec![wedge("Shared", 1), colored]);
        f.wheel_image = Some(ImageFill {
            image: &image,
            contrast: Contrast::Light,
        });

        let mut canvas = RecordingCanvas::new(400, 400);
        WheelRenderer::new().draw(&mut canvas, &f).unwrap();

        assert_eq!(canvas.ops[0], Op::Image { clipped: false });
        assert!(canvas.ops.contains(&Op::Solid(Color::rgb(0, 0, 200))));
        let texts = canvas.texts();
        assert_eq!(texts[0], ("Shared".to_string(), Color::BLACK, true));
        assert_eq!(texts[1], ("Own".to_string(), Color::rgb(20, 20, 20), false));
    }

    #[test]
    fn test_long_label_is_truncated() {
        let long = "Bartholomew Fitzgerald-Higginbottom the Third of Nowhere";
        let mut canvas = RecordingCanvas::new(400, 400);
        WheelRenderer::new()
            .draw(&mut canvas, &frame(vec![wedge(long, 1), wedge("B", 1)]))
            .unwrap();
        let texts = canvas.texts();
        assert!(texts[0].0.ends_with(ELLIPSIS));
        assert!(estimate_text_width(&texts[0].0, MIN_LABEL_FONT_SIZE) <= max_label_width(193.0));
    }

    #[test]
    fn test_labels_are_fitted_once_across_frames() {
        let renderer = WheelRenderer::new();
        let mut f = frame(vec![wedge("Alpha", 1), wedge("Beta", 1)]);
        for step in 0..10 {
            f.rotation = step as f64 * 37.0;
            let mut canvas = RecordingCanvas::new(400, 400);
            renderer.draw(&mut canvas, &f).unwrap();
            assert_eq!(canvas.texts()[0].0, "Alpha");
        }
        assert_eq!(renderer.labels.len(), 2);
    }

    #[test]
    fn test_hub_label_reflects_spin_state() {
        let renderer = WheelRenderer::new();
        let mut f = frame(vec![wedge("A", 1)]);

        let mut resting = RecordingCanvas::new(400, 400);
        renderer.draw(&mut resting, &f).unwrap();
        assert_eq!(resting.texts().last().unwrap().1, Color::WHITE);

        f.spinning = true;
        let mut pressed = RecordingCanvas::new(400, 400);
        renderer.draw(&mut pressed, &f).unwrap();
        assert_eq!(pressed.texts().last().unwrap().1, Color::rgb(0xcc, 0xcc, 0xcc));
    }

    #[test]
    fn test_empty_wheel_draws_placeholder_without_text() {
        let mut canvas = RecordingCanvas::new(400, 400);
        WheelRenderer::new().draw(&mut canvas, &frame(vec![])).unwrap();
        assert!(canvas.texts().is_empty());
        assert_eq!(canvas.ops.len(), 2);
    }

    #[test]
    fn test_tiny_canvas_is_left_alone() {
        let mut canvas = RecordingCanvas::new(10, 10);
        WheelRenderer::new()
            .draw(&mut canvas, &frame(vec![wedge("A", 1)]))
            .unwrap();
        assert!(canvas.ops.is_empty());
    }

    #[test]
    fn test_rasterized_sectors_match_layout() {
        let renderer = WheelRenderer::new();
        let mut canvas = PixmapCanvas::new(400, 400, FontContext::empty()).unwrap();
        // rotation 0: first sector covers the lower half (angles grow clockwise)
        renderer
            .draw(&mut canvas, &frame(vec![wedge("A", 1), wedge("B", 1)]))
            .unwrap();

        let at = |x: u32, y: u32| {
            let px = canvas.pixmap().pixel(x, y).unwrap().demultiply();
            Color::rgb(px.red(), px.green(), px.blue())
        };
        assert_eq!(at(200, 354), renderer.palette_color(0));
        assert_eq!(at(200, 46), renderer.palette_color(1));
    }
}
