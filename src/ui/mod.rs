//! Desktop host for the spin wheel.
//!
//! This module wires the core model, animator and renderer into an egui
//! application: the toolbar, the side panel, the wheel canvas and the winner
//! dialog.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main WheelApp
//! - `loading` - Background image, sound and listing loads
//! - `canvas` - Wheel rendering, spin input and animation stepping
//! - `panel` - Entry editing and settings
//! - `undo` - Undo/redo history for entry edits

mod canvas;
mod loading;
mod panel;
mod state;
mod undo;

pub use state::WheelApp;
use undo::UndoableEntryList;

use self::panel::to_color32;
use eframe::egui;

impl eframe::App for WheelApp {
    /// Main update function called by egui for each frame.
    ///
    /// Applies finished background loads, handles shortcuts and lays out the
    /// toolbar, side panel and wheel. While a spin runs the wheel requests a
    /// repaint every frame.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The egui context
    /// * `_frame` - The eframe frame
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply theme visuals
        let visuals = if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        self.start_initial_loads(ctx);
        self.process_load_results(ctx);
        self.sync_entry_images(ctx);

        // Handle undo/redo keyboard shortcuts
        self.handle_undo_redo_keys(ctx);
        self.handle_spin_key(ctx);

        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        egui::SidePanel::right("entries_panel")
            .resizable(true)
            .default_width(360.0)
            .show(ctx, |ui| {
                self.draw_side_panel(ui);
            });

        let mut page = egui::Frame::central_panel(&ctx.style());
        if let Some(color) = self.theme.background {
            page = page.fill(to_color32(color));
        }
        egui::CentralPanel::default().frame(page).show(ctx, |ui| {
            if let Some(texture) = &self.view.page_texture {
                ui.painter().image(
                    texture.id(),
                    ui.max_rect(),
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
            self.apply_page_theme(ui);
            ui.vertical_centered(|ui| {
                self.draw_title(ui);
                self.draw_wheel(ui);
            });
        });

        self.draw_winner_dialog(ctx);
    }
}

impl WheelApp {
    /// Handles undo/redo keyboard shortcuts.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The egui context for checking input
    fn handle_undo_redo_keys(&mut self, ctx: &egui::Context) {
        // Text fields keep their own undo
        let is_editing_text = ctx.wants_keyboard_input();

        if !is_editing_text {
            // Ctrl+Z for undo
            if ctx
                .input(|i| i.key_pressed(egui::Key::Z) && i.modifiers.command && !i.modifiers.shift)
            {
                self.perform_undo();
            }
            // Ctrl+Shift+Z or Ctrl+Y for redo
            else if ctx.input(|i| {
                (i.key_pressed(egui::Key::Z) && i.modifiers.command && i.modifiers.shift)
                    || (i.key_pressed(egui::Key::Y) && i.modifiers.command)
            }) {
                self.perform_redo();
            }
        }
    }

    /// Space spins the wheel when no text field has focus.
    fn handle_spin_key(&mut self, ctx: &egui::Context) {
        if !ctx.wants_keyboard_input() && ctx.input(|i| i.key_pressed(egui::Key::Space)) {
            let now_ms = ctx.input(|i| i.time) * 1000.0;
            self.start_spin(now_ms);
            ctx.request_repaint();
        }
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let locked = self.is_locked();
            if ui
                .add_enabled(!locked && !self.entries.drawable().is_empty(), egui::Button::new("Spin"))
                .clicked()
            {
                let now_ms = ui.input(|i| i.time) * 1000.0;
                self.start_spin(now_ms);
            }
            ui.separator();
            if ui
                .add_enabled(!locked && self.undo_history.can_undo(), egui::Button::new("Undo"))
                .on_hover_text(format!("{} steps", self.undo_history.undo_len()))
                .clicked()
            {
                self.perform_undo();
            }
            if ui
                .add_enabled(!locked && self.undo_history.can_redo(), egui::Button::new("Redo"))
                .clicked()
            {
                self.perform_redo();
            }
            ui.separator();
            ui.checkbox(&mut self.dark_mode, "Dark mode");
            if locked {
                ui.separator();
                ui.label(format!("{:?}", self.animator.phase()));
            }
        });
    }

    /// Recolors page text and button borders to read well on a custom
    /// background. The default page keeps the stock visuals.
    fn apply_page_theme(&self, ui: &mut egui::Ui) {
        let visuals = ui.visuals_mut();
        if let Some(color) = self.theme.text_color() {
            visuals.override_text_color = Some(to_color32(color));
        }
        if let Some(border) = self.theme.button_border() {
            let stroke = egui::Stroke::new(1.5, to_color32(border));
            visuals.widgets.inactive.bg_stroke = stroke;
            visuals.widgets.hovered.bg_stroke = stroke;
            visuals.widgets.active.bg_stroke = stroke;
        }
    }

    fn draw_title(&mut self, ui: &mut egui::Ui) {
        let title_id = egui::Id::new("wheel_title");
        if self.editor.editing_title {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.editor.title_draft)
                    .id(title_id)
                    .horizontal_align(egui::Align::Center)
                    .font(egui::TextStyle::Heading),
            );
            let cancelled = ui.input(|i| i.key_pressed(egui::Key::Escape));
            if cancelled {
                self.editor.editing_title = false;
            } else if response.lost_focus() {
                let title = self.editor.title_draft.trim();
                if !title.is_empty() {
                    self.title = title.to_string();
                }
                self.editor.editing_title = false;
            }
        } else {
            // Reserve a slot so the outline lands behind the label
            let outline_slot = ui.painter().add(egui::Shape::Noop);
            let response = ui
                .add(egui::Label::new(egui::RichText::new(&self.title).heading()).sense(egui::Sense::click()))
                .on_hover_text("Double-click to rename");
            if let Some(outline) = self.theme.text_outline() {
                let font = egui::TextStyle::Heading.resolve(ui.style());
                let galley = ui
                    .painter()
                    .layout_no_wrap(self.title.clone(), font, to_color32(outline));
                let offsets = [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)];
                let shapes = offsets
                    .iter()
                    .map(|&(dx, dy)| {
                        egui::Shape::galley(
                            response.rect.min + egui::vec2(dx, dy),
                            galley.clone(),
                            to_color32(outline),
                        )
                    })
                    .collect();
                ui.painter().set(outline_slot, egui::Shape::Vec(shapes));
            }
            if response.double_clicked() {
                self.editor.title_draft = self.title.clone();
                self.editor.editing_title = true;
                ui.memory_mut(|m| m.request_focus(title_id));
            }
        }
    }

    fn draw_winner_dialog(&mut self, ctx: &egui::Context) {
        let Some(winner) = &self.winner else {
            return;
        };
        let label = winner.label.clone();
        let id = winner.id;

        let mut close = false;
        let mut remove = false;
        egui::Window::new("We have a winner!")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new(&label).size(32.0).strong());
                });
                ui.horizontal(|ui| {
                    if ui.button("Close").clicked() {
                        close = true;
                    }
                    if ui.button("Remove").on_hover_text("Take this entry off the wheel").clicked() {
                        remove = true;
                    }
                });
            });

        if remove {
            self.apply_row_edit(ctx, id, panel::RowEdit::Delete);
        }
        if close || remove {
            self.winner = None;
        }
    }

    /// Performs an undo operation.
    fn perform_undo(&mut self) {
        if self.is_locked() {
            return;
        }
        if let Some(action) = self.undo_history.pop_undo() {
            if let Some(redo_action) = self.entries.apply_undo(&action) {
                self.undo_history.push_redo(redo_action);
                self.view.dirty = true;
            }
        }
    }

    /// Performs a redo operation.
    fn perform_redo(&mut self) {
        if self.is_locked() {
            return;
        }
        if let Some(action) = self.undo_history.pop_redo() {
            if let Some(undo_action) = self.entries.apply_redo(&action) {
                // Don't call push_action here as it would clear the redo stack
                self.undo_history.push_undo(undo_action);
                self.view.dirty = true;
            }
        }
    }
}
