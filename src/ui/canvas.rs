//! Wheel canvas: rendering, spin input and the per-frame animation step.
//!
//! The wheel is painted with [`WheelRenderer`](crate::render::WheelRenderer)
//! into a tiny-skia pixmap, uploaded as an egui texture and drawn as a single
//! image. The texture is only re-rendered when something visible changed.

use super::state::{WheelApp, WinnerDialog};
use crate::animator::{SpinUpdate, StartOutcome};
use crate::assets::ImageKey;
use crate::render::{ImageFill, PixmapCanvas, Wedge, WheelFrame, WheelGeometry};
use eframe::egui;
use tiny_skia::Pixmap;

/// Converts a premultiplied tiny-skia pixmap to an egui image.
pub(super) fn to_color_image(pixmap: &Pixmap) -> egui::ColorImage {
    egui::ColorImage::from_rgba_premultiplied(
        [pixmap.width() as usize, pixmap.height() as usize],
        pixmap.data(),
    )
}

impl WheelApp {
    /// Builds the renderer's view of the current state.
    pub(super) fn wheel_frame(&self) -> WheelFrame<'_> {
        let wedges = self
            .entries
            .drawable()
            .into_iter()
            .map(|entry| {
                let image = self
                    .images
                    .get(&ImageKey::Entry(entry.id))
                    .filter(|loaded| entry.image.as_deref() == Some(loaded.source.as_str()))
                    .map(|loaded| ImageFill {
                        image: loaded.pixmap.as_ref(),
                        contrast: loaded.contrast,
                    });
                Wedge {
                    label: entry.display_label(),
                    weight: entry.weight,
                    color: entry.color,
                    image,
                }
            })
            .collect();

        let wheel_image = self
            .view
            .wheel_image
            .as_deref()
            .and_then(|wanted| {
                self.images
                    .get(&ImageKey::Wheel)
                    .filter(|loaded| loaded.source == wanted)
            })
            .map(|loaded| ImageFill {
                image: loaded.pixmap.as_ref(),
                contrast: loaded.contrast,
            });

        WheelFrame {
            wedges,
            rotation: self.view.rotation,
            spinning: self.animator.is_spinning(),
            text_color: self.view.text_color,
            wheel_image,
        }
    }

    /// Renders the wheel into a square pixmap of `side` pixels.
    pub(super) fn render_wheel(&self, side: u32) -> Option<Pixmap> {
        let mut canvas = PixmapCanvas::new(side, side, self.fonts.clone())?;
        if let Err(e) = self.renderer.draw(&mut canvas, &self.wheel_frame()) {
            log::warn!("wheel frame incomplete: {}", e);
        }
        Some(canvas.into_pixmap())
    }

    /// Starts a spin at `now_ms` if the wheel has entries and is at rest.
    pub(super) fn start_spin(&mut self, now_ms: f64) -> StartOutcome {
        let weights = self.entries.drawable_weights();
        let outcome = self.animator.start(
            now_ms,
            self.view.rotation,
            self.view.spin_seconds as f64,
            &weights,
            &mut self.rng,
        );
        if outcome == StartOutcome::Started {
            self.winner = None;
            self.view.dirty = true;
        }
        outcome
    }

    /// Advances a running spin to `now_ms`, playing tick sounds and opening
    /// the winner dialog on the final frame.
    pub(super) fn advance_spin(&mut self, now_ms: f64) -> Option<SpinUpdate> {
        let weights = self.entries.drawable_weights();
        let update = self.animator.tick(now_ms, &weights)?;
        self.view.rotation = update.frame.rotation;
        self.view.dirty = true;

        if update.frame.tick {
            self.sounds.on_tick();
        }
        if let Some(result) = update.finished {
            let winner = result
                .winner
                .and_then(|index| self.entries.drawable().get(index).copied())
                .map(|entry| WinnerDialog {
                    id: entry.id,
                    label: entry.display_label().to_string(),
                });
            if let Some(dialog) = &winner {
                log::info!("winner: {}", dialog.label);
                self.sounds.on_winner();
            }
            self.winner = winner;
        }
        Some(update)
    }

    /// Draws the wheel and handles clicks on it.
    ///
    /// # Arguments
    ///
    /// * `ui` - The egui UI context
    pub(super) fn draw_wheel(&mut self, ui: &mut egui::Ui) {
        let now_ms = ui.input(|i| i.time) * 1000.0;
        if self.advance_spin(now_ms).is_some() {
            ui.ctx().request_repaint();
        }

        let available = ui.available_size();
        let side = available.x.min(available.y).max(1.0);
        let (rect, response) = ui.allocate_exact_size(egui::vec2(side, side), egui::Sense::click());

        let pixels_per_point = ui.ctx().pixels_per_point();
        let pixels = (side * pixels_per_point).round().max(1.0) as u32;

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let local = (pos - rect.min) * pixels_per_point;
                let on_wheel = WheelGeometry::for_canvas(pixels, pixels)
                    .is_some_and(|geo| geo.contains(local.x, local.y));
                if on_wheel && self.start_spin(now_ms) == StartOutcome::Started {
                    ui.ctx().request_repaint();
                }
            }
        }

        if self.view.dirty || self.view.rendered_size != (pixels, pixels) || self.view.texture.is_none() {
            if let Some(pixmap) = self.render_wheel(pixels) {
                let image = to_color_image(&pixmap);
                match &mut self.view.texture {
                    Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
                    None => {
                        self.view.texture =
                            Some(ui.ctx().load_texture("wheel", image, egui::TextureOptions::LINEAR));
                    }
                }
                self.view.rendered_size = (pixels, pixels);
            }
            self.view.dirty = false;
        }

        if let Some(texture) = &self.view.texture {
            ui.painter().image(
                texture.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }

        if !self.animator.is_spinning() && !self.entries.drawable().is_empty() {
            response.on_hover_cursor(egui::CursorIcon::PointingHand);
        }
    }
}
