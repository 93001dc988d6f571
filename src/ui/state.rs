//! Application state structures.
//!
//! This module holds the main [`WheelApp`] and the smaller state groups it is
//! built from: the wheel view, the winner dialog, the editor and the channel
//! that background loads report back on.

use super::undo::UndoHistory;
use crate::animator::SpinAnimator;
use crate::assets::{ImageKey, ImageStore, LoadTicket};
use crate::audio::{SilentAudio, SoundBoard, SoundBuffer, SoundKey};
use crate::config::AppConfig;
use crate::entries::EntryList;
use crate::error::{AssetError, AudioError};
use crate::listing::{ImageCategory, ImageListing};
use crate::render::{FontContext, WheelRenderer};
use crate::theme::PageTheme;
use crate::types::*;
use eframe::egui;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use tiny_skia::Pixmap;

/// Messages sent from background tasks back to the UI thread.
#[derive(Debug)]
pub enum LoadResult {
    /// An image finished decoding
    Image(LoadTicket<ImageKey>, Result<Pixmap, AssetError>),
    /// A batch of sounds finished decoding
    Sounds(Vec<(LoadTicket<SoundKey>, Result<SoundBuffer, AudioError>)>),
    /// An image folder was listed
    Listing(ImageCategory, ImageListing),
    /// The user picked an image file for an entry
    EntryImagePicked(EntryId, PathBuf),
    /// The user picked a page background file
    BackgroundPicked(PathBuf),
}

/// Background work in flight.
pub struct LoadState {
    /// Channel for task results
    pub sender: Sender<LoadResult>,
    /// Receiving end, drained every frame
    pub receiver: Receiver<LoadResult>,
    /// Spawned tasks; aborted when the app goes away
    pub tasks: Vec<tokio::task::JoinHandle<()>>,
    /// Whether the startup loads (sounds, listings) were issued
    pub started: bool,
}

impl Default for LoadState {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            tasks: Vec::new(),
            started: false,
        }
    }
}

impl Drop for LoadState {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// State of the wheel view itself.
pub struct WheelViewState {
    /// Current rotation in degrees, normalised to `[0, 360)`
    pub rotation: f64,
    /// Selected spin duration in seconds
    pub spin_seconds: u32,
    /// Texture holding the last rendered frame
    pub texture: Option<egui::TextureHandle>,
    /// Size of the last rendered frame in pixels
    pub rendered_size: (u32, u32),
    /// Whether the wheel must be re-rendered this frame
    pub dirty: bool,
    /// Label color over plain sectors
    pub text_color: Color,
    /// Image filling the wheel, if chosen
    pub wheel_image: Option<String>,
    /// Texture of the page background image
    pub page_texture: Option<egui::TextureHandle>,
}

impl Default for WheelViewState {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            spin_seconds: crate::constants::DEFAULT_SPIN_SECONDS,
            texture: None,
            rendered_size: (0, 0),
            dirty: true,
            text_color: Color::BLACK,
            wheel_image: None,
            page_texture: None,
        }
    }
}

/// Winner announcement.
#[derive(Debug, Clone, PartialEq)]
pub struct WinnerDialog {
    /// Entry that won
    pub id: EntryId,
    /// Its label at the time it won
    pub label: String,
}

/// State for the side panel editors.
#[derive(Default)]
pub struct EditorState {
    /// Text of the "add entry" field
    pub new_entry: String,
    /// Whether the title is being edited
    pub editing_title: bool,
    /// Title text while editing
    pub title_draft: String,
    /// Color picked for the page background
    pub background_color: egui::Color32,
    /// Newline-separated names for bulk replace
    pub bulk_text: String,
}

/// The main application structure.
///
/// This struct implements the `eframe::App` trait and handles all user
/// interface rendering and interaction logic.
pub struct WheelApp {
    /// Startup settings
    pub config: AppConfig,
    /// Entries on the wheel
    pub entries: EntryList,
    /// Undo/redo history for entry edits
    pub undo_history: UndoHistory,
    /// Spin state machine
    pub animator: SpinAnimator,
    /// Wheel view state
    pub view: WheelViewState,
    /// Frame renderer
    pub renderer: WheelRenderer,
    /// Fonts used to draw labels
    pub fonts: FontContext,
    /// Decoded images
    pub images: ImageStore,
    /// Sounds and their triggers
    pub sounds: SoundBoard,
    /// Page theme derived from the background
    pub theme: PageTheme,
    /// Title shown above the wheel
    pub title: String,
    /// Winner dialog, when open
    pub winner: Option<WinnerDialog>,
    /// Image folder listings for the pickers
    pub listings: HashMap<ImageCategory, ImageListing>,
    /// Side panel editing state
    pub editor: EditorState,
    /// Background work
    pub loads: LoadState,
    /// Randomness for spins and shuffles
    pub rng: StdRng,
    /// Whether dark mode visuals are enabled
    pub dark_mode: bool,
}

impl Default for WheelApp {
    fn default() -> Self {
        Self::with_fonts(AppConfig::default(), FontContext::empty())
    }
}

impl WheelApp {
    /// Creates the app from a config, loading system fonts.
    pub fn new(config: AppConfig) -> Self {
        Self::with_fonts(config, FontContext::system())
    }

    /// Creates the app with an explicit font context.
    pub fn with_fonts(config: AppConfig, fonts: FontContext) -> Self {
        let entries = EntryList::from_text(&config.initial_entries);
        let mut sounds = SoundBoard::new(Arc::new(SilentAudio));
        sounds.spin_sound = config.spin_sound.clone();
        sounds.winning_sound = config.winning_sound.clone();
        let view = WheelViewState {
            spin_seconds: config.spin_seconds,
            ..WheelViewState::default()
        };
        Self {
            animator: SpinAnimator::with_table(config.phase_table.clone()),
            config,
            entries,
            undo_history: UndoHistory::new(),
            view,
            renderer: WheelRenderer::new(),
            fonts,
            images: ImageStore::new(),
            sounds,
            theme: PageTheme::default(),
            title: "Spin the Wheel".to_string(),
            winner: None,
            listings: HashMap::new(),
            editor: EditorState {
                background_color: egui::Color32::WHITE,
                ..EditorState::default()
            },
            loads: LoadState::default(),
            rng: StdRng::from_entropy(),
            dark_mode: false,
        }
    }

    /// Whether entry edits are locked because a spin is running.
    pub fn is_locked(&self) -> bool {
        self.animator.is_spinning()
    }
}
