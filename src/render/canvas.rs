//! Drawing surface abstraction and its tiny-skia implementation.
//!
//! The wheel renderer only talks to [`Canvas`]. [`PixmapCanvas`] rasterizes
//! into a `tiny_skia::Pixmap`; tests use a recording canvas instead.

use std::fmt::Write as _;
use std::sync::Arc;

use tiny_skia::{
    FillRule, FilterQuality, GradientStop, LineCap, LineJoin, Mask, Paint, Path, Pattern, Pixmap,
    Point, RadialGradient, Shader, SpreadMode, Stroke, Transform,
};

use crate::error::RenderError;
use crate::types::Color;

/// How a path is painted.
#[derive(Debug, Clone)]
pub enum Fill<'a> {
    /// Flat color
    Solid(Color),
    /// Two-point radial gradient
    Radial {
        /// Focal point where the first stop sits
        focal: (f32, f32),
        /// Center of the outer circle
        center: (f32, f32),
        /// Radius of the outer circle
        radius: f32,
        /// `(offset, color)` pairs with offsets in `[0, 1]`
        stops: Vec<(f32, Color)>,
    },
    /// Bitmap mapped into canvas space by `transform`
    Image {
        /// Source bitmap
        image: &'a Pixmap,
        /// Image-to-canvas transform
        transform: Transform,
    },
}

/// A single line of text, centered on `(x, y)` in the frame given by
/// `transform`.
#[derive(Debug, Clone)]
pub struct TextRun<'a> {
    /// Text to draw
    pub text: &'a str,
    /// Anchor x, horizontally centered
    pub x: f32,
    /// Baseline y
    pub y: f32,
    /// Font size in pixels
    pub size: f32,
    /// Bold weight
    pub bold: bool,
    /// Fill color
    pub color: Color,
    /// Optional outline `(color, width)` drawn under the fill
    pub outline: Option<(Color, f32)>,
    /// Optional soft shadow drawn beneath everything
    pub shadow: Option<Color>,
    /// Frame transform
    pub transform: Transform,
}

/// A raster drawing surface.
pub trait Canvas {
    /// Surface size in pixels.
    fn size(&self) -> (u32, u32);

    /// Fills `path`, optionally clipped to `clip`.
    fn fill_path(&mut self, path: &Path, fill: &Fill, clip: Option<&Path>) -> Result<(), RenderError>;

    /// Strokes `path` with a solid color.
    fn stroke_path(
        &mut self,
        path: &Path,
        color: Color,
        width: f32,
        clip: Option<&Path>,
    ) -> Result<(), RenderError>;

    /// Draws a line of text.
    fn fill_text(&mut self, run: &TextRun) -> Result<(), RenderError>;

    /// Advance width of `text` at `size` pixels.
    fn measure_text(&self, text: &str, size: f32, bold: bool) -> f32;
}

/// Font database shared by every canvas.
#[derive(Clone)]
pub struct FontContext {
    db: Arc<fontdb::Database>,
}

impl std::fmt::Debug for FontContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontContext")
            .field("faces", &self.db.len())
            .finish()
    }
}

impl FontContext {
    /// Loads the system fonts. This is slow; do it once at startup.
    pub fn system() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        log::info!("loaded {} font faces", db.len());
        Self { db: Arc::new(db) }
    }

    /// A context without fonts. Text is measured by estimate and not drawn.
    pub fn empty() -> Self {
        Self {
            db: Arc::new(fontdb::Database::new()),
        }
    }

    /// Whether any font face is available.
    pub fn has_fonts(&self) -> bool {
        !self.db.is_empty()
    }

    fn options(&self) -> usvg::Options<'static> {
        let mut opt = usvg::Options::default();
        opt.fontdb = self.db.clone();
        opt
    }
}

/// Rough advance width used when no font is available.
pub fn estimate_text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.6
}

fn svg_color(c: Color) -> String {
    format!("rgb({},{},{})", c.r, c.g, c.b)
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// Canvas backed by a tiny-skia pixmap.
pub struct PixmapCanvas {
    pixmap: Pixmap,
    fonts: FontContext,
}

impl PixmapCanvas {
    /// Creates a transparent canvas. Returns `None` for a zero-sized surface.
    pub fn new(width: u32, height: u32, fonts: FontContext) -> Option<Self> {
        Some(Self {
            pixmap: Pixmap::new(width, height)?,
            fonts,
        })
    }

    /// Clears the surface to fully transparent.
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    /// Rendered pixels.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Takes the rendered pixels.
    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    fn mask_for(&self, clip: Option<&Path>) -> Result<Option<Mask>, RenderError> {
        let Some(clip) = clip else {
            return Ok(None);
        };
        let (w, h) = (self.pixmap.width(), self.pixmap.height());
        let mut mask = Mask::new(w, h).ok_or(RenderError::Mask(w, h))?;
        mask.fill_path(clip, FillRule::Winding, true, Transform::identity());
        Ok(Some(mask))
    }

    fn paint_for<'a>(fill: &Fill<'a>) -> Result<Paint<'a>, RenderError> {
        let shader = match fill {
            Fill::Solid(c) => Shader::SolidColor(c.to_skia()),
            Fill::Radial {
                focal,
                center,
                radius,
                stops,
            } => {
                let stops = stops
                    .iter()
                    .map(|(offset, color)| GradientStop::new(*offset, color.to_skia()))
                    .collect();
                RadialGradient::new(
                    Point::from_xy(focal.0, focal.1),
                    Point::from_xy(center.0, center.1),
                    *radius,
                    stops,
                    SpreadMode::Pad,
                    Transform::identity(),
                )
                .ok_or(RenderError::DegeneratePath)?
            }
            Fill::Image { image, transform } => {
                if image.width() == 0 || image.height() == 0 {
                    return Err(RenderError::Image("empty bitmap".into()));
                }
                Pattern::new(
                    image.as_ref(),
                    SpreadMode::Pad,
                    FilterQuality::Bilinear,
                    1.0,
                    *transform,
                )
            }
        };
        Ok(Paint {
            shader,
            anti_alias: true,
            ..Paint::default()
        })
    }

    fn text_svg(&self, run: &TextRun) -> String {
        let (w, h) = self.size();
        let t = run.transform;
        let weight = if run.bold { "bold" } else { "normal" };
        let text = escape_xml(run.text);
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><g transform="matrix({} {} {} {} {} {})" font-family="sans-serif" font-size="{}" font-weight="{weight}" text-anchor="middle">"#,
            t.sx, t.ky, t.kx, t.sy, t.tx, t.ty, run.size
        );
        if let Some(shadow) = run.shadow {
            let _ = write!(
                svg,
                r#"<text x="{}" y="{}" fill="{}" fill-opacity="{}">{text}</text>"#,
                run.x,
                run.y + 1.0,
                svg_color(shadow),
                shadow.alpha()
            );
        }
        if let Some((outline, width)) = run.outline {
            let _ = write!(
                svg,
                r#"<text x="{}" y="{}" fill="none" stroke="{}" stroke-opacity="{}" stroke-width="{width}" stroke-linejoin="round">{text}</text>"#,
                run.x,
                run.y,
                svg_color(outline),
                outline.alpha()
            );
        }
        let _ = write!(
            svg,
            r#"<text x="{}" y="{}" fill="{}" fill-opacity="{}">{text}</text></g></svg>"#,
            run.x,
            run.y,
            svg_color(run.color),
            run.color.alpha()
        );
        svg
    }
}

impl Canvas for PixmapCanvas {
    fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn fill_path(&mut self, path: &Path, fill: &Fill, clip: Option<&Path>) -> Result<(), RenderError> {
        let mask = self.mask_for(clip)?;
        let paint = Self::paint_for(fill)?;
        self.pixmap.fill_path(
            path,
            &paint,
            FillRule::Winding,
            Transform::identity(),
            mask.as_ref(),
        );
        Ok(())
    }

    fn stroke_path(
        &mut self,
        path: &Path,
        color: Color,
        width: f32,
        clip: Option<&Path>,
    ) -> Result<(), RenderError> {
        let mask = self.mask_for(clip)?;
        let paint = Self::paint_for(&Fill::Solid(color))?;
        let stroke = Stroke {
            width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(path, &paint, &stroke, Transform::identity(), mask.as_ref());
        Ok(())
    }

    fn fill_text(&mut self, run: &TextRun) -> Result<(), RenderError> {
        if run.text.is_empty() || !self.fonts.has_fonts() {
            return Ok(());
        }
        let svg = self.text_svg(run);
        let tree = usvg::Tree::from_str(&svg, &self.fonts.options())
            .map_err(|e| RenderError::Text(e.to_string()))?;
        resvg::render(&tree, Transform::identity(), &mut self.pixmap.as_mut());
        Ok(())
    }

    fn measure_text(&self, text: &str, size: f32, bold: bool) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        if !self.fonts.has_fonts() {
            return estimate_text_width(text, size);
        }
        let weight = if bold { "bold" } else { "normal" };
        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"><text x="0" y="{size}" font-family="sans-serif" font-size="{size}" font-weight="{weight}">{}</text></svg>"#,
            escape_xml(text)
        );
        match usvg::Tree::from_str(&svg, &self.fonts.options()) {
            Ok(tree) => {
                let width = tree.root().abs_bounding_box().width();
                if width > 0.0 {
                    width
                } else {
                    estimate_text_width(text, size)
                }
            }
            Err(e) => {
                log::warn!("text measurement failed: {}", e);
                estimate_text_width(text, size)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shapes;

    fn canvas(w: u32, h: u32) -> PixmapCanvas {
        PixmapCanvas::new(w, h, FontContext::empty()).unwrap()
    }

    fn pixel(canvas: &PixmapCanvas, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let px = canvas.pixmap().pixel(x, y).unwrap().demultiply();
        (px.red(), px.green(), px.blue(), px.alpha())
    }

    #[test]
    fn test_zero_sized_canvas_is_rejected() {
        assert!(PixmapCanvas::new(0, 10, FontContext::empty()).is_none());
    }

    #[test]
    fn test_solid_fill_with_clip() {
        let mut c = canvas(20, 20);
        let square = shapes::polygon(&[(0.0, 0.0), (20.0, 0.0), (20.0, 20.0), (0.0, 20.0)]).unwrap();
        let left = shapes::polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 20.0), (0.0, 20.0)]).unwrap();
        c.fill_path(&square, &Fill::Solid(Color::rgb(255, 0, 0)), Some(&left))
            .unwrap();
        assert_eq!(pixel(&c, 5, 10), (255, 0, 0, 255));
        assert_eq!(pixel(&c, 15, 10).3, 0);
    }

    #[test]
    fn test_image_fill_draws_bitmap() {
        let mut image = Pixmap::new(4, 4).unwrap();
        image.fill(Color::rgb(0, 0, 255).to_skia());
        let mut c = canvas(8, 8);
        let rect = shapes::polygon(&[(0.0, 0.0), (8.0, 0.0), (8.0, 8.0), (0.0, 8.0)]).unwrap();
        c.fill_path(
            &rect,
            &Fill::Image {
                image: &image,
                transform: Transform::from_scale(2.0, 2.0),
            },
            None,
        )
        .unwrap();
        assert_eq!(pixel(&c, 4, 4), (0, 0, 255, 255));
    }

    #[test]
    fn test_text_without_fonts_is_estimated() {
        let c = canvas(10, 10);
        assert_eq!(c.measure_text("", 10.0, false), 0.0);
        assert_eq!(c.measure_text("abcd", 10.0, false), 24.0);
        let mut c = c;
        let run = TextRun {
            text: "hi",
            x: 5.0,
            y: 5.0,
            size: 10.0,
            bold: false,
            color: Color::BLACK,
            outline: None,
            shadow: None,
            transform: Transform::identity(),
        };
        assert!(c.fill_text(&run).is_ok());
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }
}
