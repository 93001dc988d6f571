//! Background loads for images, sounds, listings and file pickers.
//!
//! Work is spawned on the tokio runtime and reports back over the channel in
//! [`LoadState`](super::state::LoadState); the UI thread drains it once per
//! frame. Without a runtime (headless tests) the work runs inline and its
//! result is queued the same way.

use super::state::{LoadResult, WheelApp};
use super::undo::EntryAction;
use crate::assets::{load_image_file, CommitOutcome, ImageKey};
use crate::audio::{catalog, load_sounds};
use crate::constants::IMAGE_EXTENSIONS;
use crate::listing::{image_path, list_images, ImageCategory};
use crate::theme::{BackgroundSelection, PageTheme};
use crate::types::*;
use eframe::egui;
use std::future::Future;
use std::path::{Path, PathBuf};

impl WheelApp {
    /// Runs `work` off the UI thread and queues its result, if any.
    fn spawn_load<F>(&mut self, ctx: &egui::Context, work: F)
    where
        F: Future<Output = Option<LoadResult>> + Send + 'static,
    {
        let sender = self.loads.sender.clone();
        let ctx = ctx.clone();
        let job = async move {
            if let Some(result) = work.await {
                let _ = sender.send(result);
                ctx.request_repaint();
            }
        };

        self.loads.tasks.retain(|task| !task.is_finished());
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => self.loads.tasks.push(handle.spawn(job)),
            Err(_) => futures::executor::block_on(job),
        }
    }

    /// Resolves an image source to a file path. Relative sources live under
    /// the assets folder.
    pub(super) fn resolve_asset(&self, source: &str) -> PathBuf {
        let path = Path::new(source);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config.assets_dir.join(path)
        }
    }

    /// Issues the loads every session needs once: the sound catalog and both
    /// image listings.
    pub(super) fn start_initial_loads(&mut self, ctx: &egui::Context) {
        if self.loads.started {
            return;
        }
        self.loads.started = true;
        self.request_sounds(ctx);
        self.request_listing(ctx, ImageCategory::Fullpage);
        self.request_listing(ctx, ImageCategory::Wheel);
    }

    /// Loads every catalog sound that is not loaded yet.
    pub(super) fn request_sounds(&mut self, ctx: &egui::Context) {
        let tickets = self.sounds.bank.request(&catalog());
        if tickets.is_empty() {
            return;
        }
        let keys = tickets.iter().map(|t| t.key.clone()).collect();
        let backend = self.sounds.backend();
        let assets_dir = self.config.assets_dir.clone();
        log::debug!("loading {} sounds", tickets.len());
        self.spawn_load(ctx, async move {
            let results = load_sounds(backend, assets_dir, keys).await;
            Some(LoadResult::Sounds(
                tickets
                    .into_iter()
                    .zip(results.into_iter().map(|(_, result)| result))
                    .collect(),
            ))
        });
    }

    /// Lists one image category.
    pub(super) fn request_listing(&mut self, ctx: &egui::Context, category: ImageCategory) {
        let assets_dir = self.config.assets_dir.clone();
        self.spawn_load(ctx, async move {
            Some(LoadResult::Listing(category, list_images(&assets_dir, category)))
        });
    }

    /// Starts decoding `source` for `key` unless it is already loaded or
    /// loading.
    pub(super) fn request_image(&mut self, ctx: &egui::Context, key: ImageKey, source: &str) {
        let Some(ticket) = self.images.request(key, source) else {
            return;
        };
        let path = self.resolve_asset(source);
        self.spawn_load(ctx, async move {
            let result = load_image_file(&path);
            Some(LoadResult::Image(ticket, result))
        });
    }

    /// Brings the entry image cache in line with the entry list: loads
    /// images that were set and drops images whose entry is gone or cleared.
    pub(super) fn sync_entry_images(&mut self, ctx: &egui::Context) {
        let wanted: Vec<(EntryId, String)> = self
            .entries
            .iter()
            .filter_map(|e| e.image.clone().map(|image| (e.id, image)))
            .collect();

        let entries = &self.entries;
        self.images
            .retain_entries(|id| entries.get(id).is_some_and(|e| e.image.is_some()));

        for (id, source) in wanted {
            self.request_image(ctx, ImageKey::Entry(id), &source);
        }
    }

    /// Opens a file picker for an entry's image.
    pub(super) fn pick_entry_image(&mut self, ctx: &egui::Context, id: EntryId) {
        self.spawn_load(ctx, async move {
            let handle = rfd::AsyncFileDialog::new()
                .add_filter("Images", &IMAGE_EXTENSIONS[..])
                .pick_file()
                .await?;
            Some(LoadResult::EntryImagePicked(id, handle.path().to_path_buf()))
        });
    }

    /// Opens a file picker for the page background.
    pub(super) fn pick_background(&mut self, ctx: &egui::Context) {
        self.spawn_load(ctx, async move {
            let handle = rfd::AsyncFileDialog::new()
                .add_filter("Images", &IMAGE_EXTENSIONS[..])
                .pick_file()
                .await?;
            Some(LoadResult::BackgroundPicked(handle.path().to_path_buf()))
        });
    }

    /// Applies a background choice.
    ///
    /// A color clears any page and wheel image. A page image takes effect
    /// once decoded. Reset returns to the default page.
    pub(super) fn select_background(&mut self, ctx: &egui::Context, selection: BackgroundSelection) {
        match selection {
            BackgroundSelection::Color(color) => {
                self.theme = PageTheme::from_color(color);
                self.clear_page_image();
                self.clear_wheel_image();
            }
            BackgroundSelection::Image(source) => {
                self.request_image(ctx, ImageKey::Page, &source);
            }
            BackgroundSelection::Reset => {
                self.theme = PageTheme::reset();
                self.editor.background_color = egui::Color32::WHITE;
                self.clear_page_image();
                self.clear_wheel_image();
            }
        }
        self.view.dirty = true;
    }

    /// Picks an image from the wheel category to fill the wheel.
    pub(super) fn select_wheel_image(&mut self, ctx: &egui::Context, name: &str) {
        let source = image_path(&self.config.assets_dir, ImageCategory::Wheel, name)
            .display()
            .to_string();
        self.view.wheel_image = Some(source.clone());
        self.request_image(ctx, ImageKey::Wheel, &source);
        self.view.dirty = true;
    }

    fn clear_page_image(&mut self) {
        self.images.remove(&ImageKey::Page);
        self.view.page_texture = None;
    }

    fn clear_wheel_image(&mut self) {
        self.images.remove(&ImageKey::Wheel);
        self.view.wheel_image = None;
        self.view.text_color = Color::BLACK;
    }

    /// Drains finished loads and applies them.
    pub(super) fn process_load_results(&mut self, ctx: &egui::Context) {
        while let Ok(result) = self.loads.receiver.try_recv() {
            match result {
                LoadResult::Image(ticket, result) => {
                    let key = ticket.key;
                    if self.images.commit(ticket, result) == CommitOutcome::Applied {
                        self.on_image_ready(ctx, key);
                    }
                }
                LoadResult::Sounds(results) => {
                    let mut loaded = 0;
                    for (ticket, result) in results {
                        if self.sounds.bank.commit(&ticket, result) {
                            loaded += 1;
                        }
                    }
                    log::info!("{} sounds ready", loaded);
                }
                LoadResult::Listing(category, listing) => {
                    log::debug!("{} {} images listed", listing.images.len(), category.dir_name());
                    self.listings.insert(category, listing);
                }
                LoadResult::EntryImagePicked(id, path) => {
                    self.set_entry_image(id, Some(path.display().to_string()));
                }
                LoadResult::BackgroundPicked(path) => {
                    self.select_background(ctx, BackgroundSelection::Image(path.display().to_string()));
                }
            }
        }
    }

    fn on_image_ready(&mut self, ctx: &egui::Context, key: ImageKey) {
        let Some(image) = self.images.get(&key) else {
            return;
        };
        match key {
            ImageKey::Page => {
                self.theme = PageTheme::from_image(image.source.clone(), &image.pixmap);
                self.view.page_texture = Some(ctx.load_texture(
                    "page-background",
                    super::canvas::to_color_image(&image.pixmap),
                    egui::TextureOptions::LINEAR,
                ));
            }
            ImageKey::Wheel => {
                self.view.text_color = image.contrast.text_color();
            }
            ImageKey::Entry(_) => {}
        }
        self.view.dirty = true;
    }

    /// Sets or clears an entry's image, recording the change for undo.
    pub(super) fn set_entry_image(&mut self, id: EntryId, image: Option<String>) {
        if self.is_locked() {
            return;
        }
        let Some(old_image) = self.entries.set_image(&id, image.clone()) else {
            return;
        };
        if old_image != image {
            self.undo_history.push_action(EntryAction::ImageChanged {
                id,
                old_image,
                new_image: image,
            });
            self.view.dirty = true;
        }
    }
}
