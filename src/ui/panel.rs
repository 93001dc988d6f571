//! Side panel: entry list editing, spin settings and background choice.
//!
//! Every list edit goes through one of the `WheelApp` methods below so it is
//! recorded for undo. Edits are ignored while a spin is running.

use super::state::WheelApp;
use super::undo::EntryAction;
use crate::constants::*;
use crate::assets::ImageKey;
use crate::listing::{image_path, ImageCategory};
use crate::theme::BackgroundSelection;
use crate::types::*;
use eframe::egui;

/// An edit requested from one entry row.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum RowEdit {
    Label(String),
    Weight(u32),
    Included(bool),
    Color(Option<Color>),
    PickImage,
    ClearImage,
    InsertBelow,
    Up,
    Down,
    Delete,
}

/// Converts a model color to an egui color.
pub(super) fn to_color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

/// Converts an egui color to an opaque model color.
pub(super) fn from_color32(color: egui::Color32) -> Color {
    Color::rgb(color.r(), color.g(), color.b())
}

impl WheelApp {
    /// Appends an entry. Blank labels are ignored.
    pub(super) fn add_entry(&mut self, label: &str) -> Option<EntryId> {
        if self.is_locked() || label.trim().is_empty() {
            return None;
        }
        let entry = Entry::new(label.trim());
        let index = self.entries.len();
        let id = self.entries.push_entry(entry.clone());
        self.undo_history.push_action(EntryAction::Added { entry, index });
        self.view.dirty = true;
        Some(id)
    }

    /// Applies one row edit to the entry `id`.
    pub(super) fn apply_row_edit(&mut self, ctx: &egui::Context, id: EntryId, edit: RowEdit) {
        if self.is_locked() {
            log::debug!("ignoring edit while spinning");
            return;
        }
        let action = match edit {
            RowEdit::Label(label) => self
                .entries
                .set_label(&id, label.clone())
                .filter(|old| *old != label)
                .map(|old_label| EntryAction::Relabeled {
                    id,
                    old_label,
                    new_label: label,
                }),
            RowEdit::Weight(weight) => self
                .entries
                .set_weight(&id, weight as i64)
                .zip(self.entries.get(&id).map(|e| e.weight))
                .filter(|(old, new)| old != new)
                .map(|(old_weight, new_weight)| EntryAction::WeightChanged {
                    id,
                    old_weight,
                    new_weight,
                }),
            RowEdit::Included(included) => self
                .entries
                .set_included(&id, included)
                .filter(|old| *old != included)
                .map(|old| EntryAction::InclusionChanged {
                    id,
                    old,
                    new: included,
                }),
            RowEdit::Color(color) => self
                .entries
                .set_color(&id, color)
                .filter(|old| *old != color)
                .map(|old_color| EntryAction::ColorChanged {
                    id,
                    old_color,
                    new_color: color,
                }),
            RowEdit::PickImage => {
                self.pick_entry_image(ctx, id);
                None
            }
            RowEdit::ClearImage => {
                self.set_entry_image(id, None);
                None
            }
            RowEdit::InsertBelow => self.entries.position(&id).and_then(|index| {
                let new_id = self.entries.insert_after(index, "");
                let entry = self.entries.get(&new_id)?.clone();
                Some(EntryAction::Added {
                    entry,
                    index: index + 1,
                })
            }),
            RowEdit::Up => self.shift_entry(&id, false),
            RowEdit::Down => self.shift_entry(&id, true),
            RowEdit::Delete => self
                .entries
                .remove(&id)
                .map(|(index, entry)| EntryAction::Removed { entry, index }),
        };

        if let Some(action) = action {
            self.undo_history.push_coalescing(action);
            self.view.dirty = true;
        }
    }

    fn shift_entry(&mut self, id: &EntryId, down: bool) -> Option<EntryAction> {
        let from = self.entries.position(id)?;
        let to = if down { from + 1 } else { from.checked_sub(1)? };
        self.entries
            .move_entry(from, to)
            .then_some(EntryAction::Moved { from, to })
    }

    /// Sorts or shuffles the list as one undoable step.
    pub(super) fn order_entries(&mut self, order: NameOrder) {
        if self.is_locked() {
            return;
        }
        let before = self.entries.clone();
        self.entries.apply_order(order, &mut self.rng);
        self.record_replacement(before);
    }

    /// Replaces the whole list with newline-separated names.
    pub(super) fn replace_entries(&mut self, text: &str) {
        if self.is_locked() {
            return;
        }
        let before = std::mem::replace(&mut self.entries, crate::entries::EntryList::from_text(text));
        self.record_replacement(before);
    }

    /// Removes every entry.
    pub(super) fn clear_entries(&mut self) {
        if self.is_locked() {
            return;
        }
        let before = self.entries.clone();
        self.entries.clear();
        self.record_replacement(before);
    }

    fn record_replacement(&mut self, before: crate::entries::EntryList) {
        if before != self.entries {
            self.undo_history.push_action(EntryAction::Replaced {
                before,
                after: self.entries.clone(),
            });
            self.view.dirty = true;
        }
    }

    /// Draws the side panel.
    ///
    /// # Arguments
    ///
    /// * `ui` - The egui UI context
    pub(super) fn draw_side_panel(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.heading("Entries");
            ui.add_enabled_ui(!self.is_locked(), |ui| {
                self.draw_entry_rows(ui);
                self.draw_add_entry(ui);
                self.draw_list_tools(ui);
            });

            ui.separator();
            ui.heading("Spin");
            self.draw_spin_settings(ui);

            ui.separator();
            ui.heading("Background");
            self.draw_background_settings(ui);
        });
    }

    fn draw_entry_rows(&mut self, ui: &mut egui::Ui) {
        let ctx = ui.ctx().clone();
        let mut edits = Vec::new();
        let count = self.entries.len();

        for (index, entry) in self.entries.iter().enumerate() {
            let id = entry.id;
            ui.push_id(id, |ui| {
                ui.horizontal(|ui| {
                    let mut included = entry.included;
                    if ui.checkbox(&mut included, "").on_hover_text("Include on the wheel").changed() {
                        edits.push((id, RowEdit::Included(included)));
                    }

                    let mut label = entry.label.clone();
                    let response = ui.add(egui::TextEdit::singleline(&mut label).desired_width(120.0));
                    if response.changed() {
                        edits.push((id, RowEdit::Label(label)));
                    }
                    // Enter starts a new line below, as in a text list
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        edits.push((id, RowEdit::InsertBelow));
                    }

                    let mut weight = entry.weight;
                    if ui
                        .add(egui::DragValue::new(&mut weight).range(0..=MAX_WEIGHT))
                        .on_hover_text("Weight")
                        .changed()
                    {
                        edits.push((id, RowEdit::Weight(weight)));
                    }

                    let share = self.entries.share_of(&id);
                    ui.weak(format!("{:.0}%", share * 100.0));

                    let swatch = entry
                        .color
                        .map(to_color32)
                        .unwrap_or(egui::Color32::TRANSPARENT);
                    ui.menu_button(egui::RichText::new("⬛").color(swatch), |ui| {
                        ui.horizontal_wrapped(|ui| {
                            for hex in PICKER_PALETTE {
                                let Some(color) = Color::from_hex(hex) else {
                                    continue;
                                };
                                let button = egui::Button::new("")
                                    .fill(to_color32(color))
                                    .min_size(egui::vec2(18.0, 18.0));
                                if ui.add(button).on_hover_text(hex).clicked() {
                                    edits.push((id, RowEdit::Color(Some(color))));
                                    ui.close();
                                }
                            }
                        });
                        if ui.button("Palette color").clicked() {
                            edits.push((id, RowEdit::Color(None)));
                            ui.close();
                        }
                    });

                    if self.images.is_loading(&ImageKey::Entry(id)) {
                        ui.spinner();
                    } else if entry.image.is_some() {
                        if ui.small_button("🖼✖").on_hover_text("Remove image").clicked() {
                            edits.push((id, RowEdit::ClearImage));
                        }
                    } else if ui.small_button("🖼").on_hover_text("Choose image").clicked() {
                        edits.push((id, RowEdit::PickImage));
                    }

                    if ui.add_enabled(index > 0, egui::Button::new("⏶").small()).clicked() {
                        edits.push((id, RowEdit::Up));
                    }
                    if ui
                        .add_enabled(index + 1 < count, egui::Button::new("⏷").small())
                        .clicked()
                    {
                        edits.push((id, RowEdit::Down));
                    }
                    if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                        edits.push((id, RowEdit::Delete));
                    }
                });
            });
        }

        if count > 0 {
            ui.weak(format!("Total weight {}", self.entries.total_drawable_weight()));
        }

        for (id, edit) in edits {
            self.apply_row_edit(&ctx, id, edit);
        }
    }

    fn draw_add_entry(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.editor.new_entry)
                    .hint_text("New entry")
                    .desired_width(160.0),
            );
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Add").clicked() || submitted {
                let label = std::mem::take(&mut self.editor.new_entry);
                self.add_entry(&label);
            }
        });
    }

    fn draw_list_tools(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("A→Z").clicked() {
                self.order_entries(NameOrder::Ascending);
            }
            if ui.button("Z→A").clicked() {
                self.order_entries(NameOrder::Descending);
            }
            if ui.button("Shuffle").clicked() {
                self.order_entries(NameOrder::Shuffle);
            }
            if ui.button("Clear").clicked() {
                self.clear_entries();
            }
        });

        egui::CollapsingHeader::new("Edit as text").show(ui, |ui| {
            ui.add(
                egui::TextEdit::multiline(&mut self.editor.bulk_text)
                    .hint_text("One name per line")
                    .desired_rows(6),
            );
            ui.horizontal(|ui| {
                if ui.button("Replace list").clicked() {
                    let text = self.editor.bulk_text.clone();
                    self.replace_entries(&text);
                }
                if ui.button("Load current").clicked() {
                    self.editor.bulk_text = self.entries.to_text();
                }
                if ui.button("Copy").clicked() {
                    ui.ctx().copy_text(self.entries.to_text());
                }
            });
        });
    }

    fn draw_spin_settings(&mut self, ui: &mut egui::Ui) {
        ui.add_enabled(
            !self.is_locked(),
            egui::Slider::new(&mut self.view.spin_seconds, MIN_SPIN_SECONDS..=MAX_SPIN_SECONDS)
                .text("seconds"),
        );

        egui::ComboBox::from_label("Tick sound")
            .selected_text(self.sounds.spin_sound.as_str())
            .show_ui(ui, |ui| {
                for name in SPIN_SOUNDS {
                    ui.selectable_value(&mut self.sounds.spin_sound, name.to_string(), name);
                }
            });

        egui::ComboBox::from_label("Winning sound")
            .selected_text(self.sounds.winning_sound.as_str())
            .show_ui(ui, |ui| {
                for name in WINNING_SOUNDS {
                    ui.selectable_value(&mut self.sounds.winning_sound, name.to_string(), name);
                }
            });

        ui.horizontal(|ui| {
            ui.label("Label color");
            let mut color = to_color32(self.view.text_color);
            if ui.color_edit_button_srgba(&mut color).changed() {
                self.view.text_color = from_color32(color);
                self.view.dirty = true;
            }
        });
    }

    fn draw_background_settings(&mut self, ui: &mut egui::Ui) {
        let ctx = ui.ctx().clone();

        ui.horizontal(|ui| {
            ui.label("Page color");
            if ui
                .color_edit_button_srgba(&mut self.editor.background_color)
                .changed()
            {
                let color = from_color32(self.editor.background_color);
                self.select_background(&ctx, BackgroundSelection::Color(color));
            }
        });

        let page_images = self
            .listings
            .get(&ImageCategory::Fullpage)
            .map(|l| l.images.clone())
            .unwrap_or_default();
        let mut chosen_page = None;
        egui::ComboBox::from_label("Page image")
            .selected_text(self.theme.background_image.as_deref().map_or("None", file_name))
            .show_ui(ui, |ui| {
                for name in &page_images {
                    if ui.selectable_label(false, name).clicked() {
                        chosen_page = Some(name.clone());
                    }
                }
            });
        if let Some(name) = chosen_page {
            let source = image_path(&self.config.assets_dir, ImageCategory::Fullpage, &name)
                .display()
                .to_string();
            self.select_background(&ctx, BackgroundSelection::Image(source));
        }

        let wheel_images = self
            .listings
            .get(&ImageCategory::Wheel)
            .map(|l| l.images.clone())
            .unwrap_or_default();
        let mut chosen_wheel = None;
        egui::ComboBox::from_label("Wheel image")
            .selected_text(self.view.wheel_image.as_deref().map_or("None", file_name))
            .show_ui(ui, |ui| {
                for name in &wheel_images {
                    if ui.selectable_label(false, name).clicked() {
                        chosen_wheel = Some(name.clone());
                    }
                }
            });
        if let Some(name) = chosen_wheel {
            self.select_wheel_image(&ctx, &name);
        }

        ui.horizontal(|ui| {
            if ui.button("Choose file…").clicked() {
                self.pick_background(&ctx);
            }
            let customised = self.theme.is_custom() || self.view.wheel_image.is_some();
            if ui.add_enabled(customised, egui::Button::new("Reset")).clicked() {
                self.select_background(&ctx, BackgroundSelection::Reset);
            }
        });
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
