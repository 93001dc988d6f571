//! Decoded image cache with stale-load protection.
//!
//! Image loads run off the UI thread and may finish in any order. Every load
//! is started with a [`LoadTicket`] from a [`LoadGuard`]; when the result comes
//! back it is only committed if the ticket is still the newest one issued for
//! its key. A newer request for the same key, or removing the key, turns any
//! older in-flight load into a no-op.

use std::collections::HashMap;
use std::hash::Hash;
use std::path::Path;
use std::sync::Arc;

use tiny_skia::{ColorU8, IntSize, Pixmap};

use crate::constants::MAX_SVG_RASTER_SIZE;
use crate::contrast::{contrast_of_image, Contrast, ContrastCache};
use crate::error::AssetError;
use crate::types::EntryId;

/// Proof that a load was requested; carries the generation it was issued at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket<K> {
    /// Resource the load is for
    pub key: K,
    generation: u64,
}

/// Tracks the newest request per key.
#[derive(Debug)]
pub struct LoadGuard<K> {
    current: HashMap<K, u64>,
    next_generation: u64,
}

impl<K> Default for LoadGuard<K> {
    fn default() -> Self {
        Self {
            current: HashMap::new(),
            next_generation: 0,
        }
    }
}

impl<K: Eq + Hash + Clone> LoadGuard<K> {
    /// Creates an empty guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket for `key`, superseding any earlier ticket for it.
    pub fn begin(&mut self, key: K) -> LoadTicket<K> {
        self.next_generation += 1;
        self.current.insert(key.clone(), self.next_generation);
        LoadTicket {
            key,
            generation: self.next_generation,
        }
    }

    /// Whether `ticket` is still the newest for its key.
    pub fn is_current(&self, ticket: &LoadTicket<K>) -> bool {
        self.current.get(&ticket.key) == Some(&ticket.generation)
    }

    /// Consumes `ticket` if it is current. Returns `false` for stale tickets.
    pub fn finish(&mut self, ticket: &LoadTicket<K>) -> bool {
        if self.is_current(ticket) {
            self.current.remove(&ticket.key);
            true
        } else {
            false
        }
    }

    /// Invalidates any outstanding ticket for `key`.
    pub fn cancel(&mut self, key: &K) {
        self.current.remove(key);
    }

    /// Whether a load is outstanding for `key`.
    pub fn is_pending(&self, key: &K) -> bool {
        self.current.contains_key(key)
    }
}

/// Which image a cache slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKey {
    /// Per-entry sector image
    Entry(EntryId),
    /// Image filling the whole wheel
    Wheel,
    /// Full-page background
    Page,
}

/// A decoded image ready for drawing.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Path or name the image was loaded from
    pub source: String,
    /// Decoded pixels
    pub pixmap: Arc<Pixmap>,
    /// Tone of the image, computed once on commit
    pub contrast: Contrast,
}

/// What happened to a completed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The image is now in the store
    Applied,
    /// A newer request exists; the result was dropped
    Stale,
    /// The load failed; any previous image for the key is kept
    Failed,
}

/// Decoded images keyed by owner.
#[derive(Debug, Default)]
pub struct ImageStore {
    slots: HashMap<ImageKey, LoadedImage>,
    pending: HashMap<ImageKey, String>,
    guard: LoadGuard<ImageKey>,
    tones: ContrastCache<ImageKey, String>,
}

impl ImageStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a load of `source` for `key`.
    ///
    /// Returns `None` when `source` is already loaded or already loading for
    /// that key, so callers do not decode the same file twice. Asking for the
    /// image that is already shown also cancels any newer load for the key.
    pub fn request(&mut self, key: ImageKey, source: &str) -> Option<LoadTicket<ImageKey>> {
        if self.slots.get(&key).is_some_and(|s| s.source == source) {
            // Switching back to the shown image voids whatever was picked since
            self.guard.cancel(&key);
            self.pending.remove(&key);
            return None;
        }
        if self.guard.is_pending(&key) && self.pending.get(&key).is_some_and(|s| s == source) {
            return None;
        }
        self.pending.insert(key, source.to_string());
        Some(self.guard.begin(key))
    }

    /// Commits the result of a load started with [`ImageStore::request`].
    pub fn commit(
        &mut self,
        ticket: LoadTicket<ImageKey>,
        result: Result<Pixmap, AssetError>,
    ) -> CommitOutcome {
        if !self.guard.finish(&ticket) {
            log::debug!("dropping stale image load for {:?}", ticket.key);
            return CommitOutcome::Stale;
        }
        let Some(source) = self.pending.remove(&ticket.key) else {
            return CommitOutcome::Stale;
        };
        match result {
            Ok(pixmap) => {
                let contrast = self
                    .tones
                    .get_or_compute(ticket.key, source.clone(), |_| contrast_of_image(&pixmap));
                log::info!(
                    "loaded image {} for {:?} ({}x{}, {:?})",
                    source,
                    ticket.key,
                    pixmap.width(),
                    pixmap.height(),
                    contrast
                );
                self.slots.insert(
                    ticket.key,
                    LoadedImage {
                        source,
                        pixmap: Arc::new(pixmap),
                        contrast,
                    },
                );
                CommitOutcome::Applied
            }
            Err(e) => {
                log::warn!("failed to load image {} for {:?}: {}", source, ticket.key, e);
                CommitOutcome::Failed
            }
        }
    }

    /// Drops the image for `key` and voids any load in flight for it.
    pub fn remove(&mut self, key: &ImageKey) -> Option<LoadedImage> {
        self.guard.cancel(key);
        self.pending.remove(key);
        self.tones.invalidate(key);
        self.slots.remove(key)
    }

    /// Drops every entry image whose id is not in `keep`.
    pub fn retain_entries(&mut self, keep: impl Fn(&EntryId) -> bool) {
        let stale: Vec<ImageKey> = self
            .slots
            .keys()
            .chain(self.pending.keys())
            .filter(|k| matches!(k, ImageKey::Entry(id) if !keep(id)))
            .copied()
            .collect();
        for key in stale {
            self.remove(&key);
        }
    }

    /// Image currently stored for `key`.
    pub fn get(&self, key: &ImageKey) -> Option<&LoadedImage> {
        self.slots.get(key)
    }

    /// Whether a load is outstanding for `key`.
    pub fn is_loading(&self, key: &ImageKey) -> bool {
        self.guard.is_pending(key)
    }
}

/// Decodes image bytes. The format is sniffed from the content.
///
/// PNG goes through tiny-skia directly. JPEG, GIF and WebP are decoded to
/// RGBA and premultiplied. SVGs are rasterized at their intrinsic size,
/// scaled down so the longer side is at most 1024 pixels.
pub fn decode_image(bytes: &[u8]) -> Result<Pixmap, AssetError> {
    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
    if bytes.is_empty() {
        return Err(AssetError::Empty);
    }
    if bytes.starts_with(PNG_MAGIC) {
        return Pixmap::decode_png(bytes).map_err(|e| AssetError::Png(e.to_string()));
    }
    if looks_like_svg(bytes) {
        return rasterize_svg(bytes);
    }
    match image::guess_format(bytes) {
        Ok(format) => decode_raster(bytes, format),
        Err(_) => Err(AssetError::UnsupportedFormat),
    }
}

fn decode_raster(bytes: &[u8], format: image::ImageFormat) -> Result<Pixmap, AssetError> {
    let rgba = image::load_from_memory_with_format(bytes, format)?.to_rgba8();
    let size = IntSize::from_wh(rgba.width(), rgba.height()).ok_or(AssetError::Empty)?;
    let mut data = rgba.into_raw();
    for px in data.chunks_exact_mut(4) {
        let c = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
        px.copy_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Pixmap::from_vec(data, size).ok_or(AssetError::Empty)
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    String::from_utf8_lossy(head).contains("<svg")
}

fn rasterize_svg(bytes: &[u8]) -> Result<Pixmap, AssetError> {
    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())?;
    let size = tree.size();
    let longest = size.width().max(size.height());
    let scale = if longest > MAX_SVG_RASTER_SIZE {
        MAX_SVG_RASTER_SIZE / longest
    } else {
        1.0
    };
    let width = (size.width() * scale).round().max(1.0) as u32;
    let height = (size.height() * scale).round().max(1.0) as u32;
    let mut pixmap = Pixmap::new(width, height).ok_or(AssetError::Empty)?;
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

/// Reads and decodes an image file. Blocking; run it off the UI thread.
pub fn load_image_file(path: &Path) -> Result<Pixmap, AssetError> {
    let bytes = std::fs::read(path)?;
    decode_image(&bytes)
}
