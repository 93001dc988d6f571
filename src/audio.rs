//! Sound catalogs and playback triggers.
//!
//! The wheel plays a short sound each time the pointer enters a new sector
//! and, when a spin ends, a drum roll together with the chosen winning sound.
//! Decoding and output are delegated to an [`AudioBackend`]; a missing or
//! failed sound is logged and skipped, never surfaced as an error.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::join_all;

use crate::assets::{LoadGuard, LoadTicket};
use crate::constants::{
    DEFAULT_SPIN_SOUND, DEFAULT_WINNING_SOUND, DRUM_ROLL_GAIN, DRUM_ROLL_SOUND, SPIN_SOUNDS,
    WINNING_GAIN, WINNING_SOUNDS,
};
use crate::error::AudioError;

/// Sound families, each stored in its own folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundKind {
    /// Played on every sector crossing
    Spin,
    /// Played when the winner is shown
    Winning,
    /// Drum roll under the winning sound
    Drum,
}

impl SoundKind {
    fn dir_name(self) -> &'static str {
        match self {
            SoundKind::Spin => "spin",
            SoundKind::Winning => "winning",
            SoundKind::Drum => "drum",
        }
    }

    fn extension(self) -> &'static str {
        match self {
            SoundKind::Winning => "wav",
            SoundKind::Spin | SoundKind::Drum => "mp3",
        }
    }
}

/// Identifies one sound file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SoundKey {
    /// Family
    pub kind: SoundKind,
    /// Catalog name without extension
    pub name: String,
}

impl SoundKey {
    /// Creates a key.
    pub fn new(kind: SoundKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Location of the file under the assets folder.
    pub fn path(&self, assets_dir: &Path) -> PathBuf {
        assets_dir
            .join("sounds")
            .join(self.kind.dir_name())
            .join(format!("{}.{}", self.name, self.kind.extension()))
    }
}

/// Every sound the wheel knows about.
pub fn catalog() -> Vec<SoundKey> {
    std::iter::once(SoundKey::new(SoundKind::Drum, DRUM_ROLL_SOUND))
        .chain(WINNING_SOUNDS.iter().map(|n| SoundKey::new(SoundKind::Winning, *n)))
        .chain(SPIN_SOUNDS.iter().map(|n| SoundKey::new(SoundKind::Spin, *n)))
        .collect()
}

/// A decoded sound ready to play.
#[derive(Debug, Clone)]
pub struct SoundBuffer {
    /// Sound this buffer was decoded from
    pub key: SoundKey,
    /// Backend-specific decoded data
    pub data: Arc<[u8]>,
}

/// Audio output.
pub trait AudioBackend: Send + Sync {
    /// Turns file bytes into a playable buffer.
    fn decode(&self, key: &SoundKey, bytes: Vec<u8>) -> Result<SoundBuffer, AudioError>;

    /// Starts playback and returns immediately.
    fn play(&self, buffer: &SoundBuffer, gain: f32);
}

/// Backend that accepts everything and plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioBackend for SilentAudio {
    fn decode(&self, key: &SoundKey, bytes: Vec<u8>) -> Result<SoundBuffer, AudioError> {
        if bytes.is_empty() {
            return Err(AudioError::Decode {
                key: key.name.clone(),
                reason: "empty file".into(),
            });
        }
        Ok(SoundBuffer {
            key: key.clone(),
            data: bytes.into(),
        })
    }

    fn play(&self, buffer: &SoundBuffer, gain: f32) {
        log::debug!("play {} at gain {:.2}", buffer.key.name, gain);
    }
}

/// Reads and decodes `keys` concurrently. Failed sounds are returned as
/// errors alongside the successes.
pub async fn load_sounds(
    backend: Arc<dyn AudioBackend>,
    assets_dir: PathBuf,
    keys: Vec<SoundKey>,
) -> Vec<(SoundKey, Result<SoundBuffer, AudioError>)> {
    let loads = keys.into_iter().map(|key| {
        let backend = backend.clone();
        let path = key.path(&assets_dir);
        async move {
            let result = std::fs::read(&path)
                .map_err(AudioError::from)
                .and_then(|bytes| backend.decode(&key, bytes));
            (key, result)
        }
    });
    join_all(loads).await
}

/// Decoded sounds keyed by [`SoundKey`].
#[derive(Debug, Default)]
pub struct SoundBank {
    buffers: HashMap<SoundKey, SoundBuffer>,
    guard: LoadGuard<SoundKey>,
}

impl SoundBank {
    /// Creates an empty bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues tickets for every key not yet loaded or loading.
    pub fn request(&mut self, keys: &[SoundKey]) -> Vec<LoadTicket<SoundKey>> {
        let mut tickets = Vec::new();
        for key in keys {
            if !self.buffers.contains_key(key) && !self.guard.is_pending(key) {
                tickets.push(self.guard.begin(key.clone()));
            }
        }
        tickets
    }

    /// Stores a finished load if its ticket is still current. Returns whether
    /// a buffer was stored.
    pub fn commit(
        &mut self,
        ticket: &LoadTicket<SoundKey>,
        result: Result<SoundBuffer, AudioError>,
    ) -> bool {
        if !self.guard.finish(ticket) {
            return false;
        }
        match result {
            Ok(buffer) => {
                self.buffers.insert(ticket.key.clone(), buffer);
                true
            }
            Err(e) => {
                log::warn!("failed to load sound {}: {}", ticket.key.name, e);
                false
            }
        }
    }

    /// Buffer for `key`.
    pub fn get(&self, key: &SoundKey) -> Result<&SoundBuffer, AudioError> {
        self.buffers
            .get(key)
            .ok_or_else(|| AudioError::NotLoaded(key.name.clone()))
    }

    /// Number of loaded sounds.
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Whether nothing is loaded.
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

/// Current sound choices and the triggers that use them.
pub struct SoundBoard {
    backend: Arc<dyn AudioBackend>,
    /// Loaded buffers
    pub bank: SoundBank,
    /// Name of the sector-crossing sound
    pub spin_sound: String,
    /// Name of the winner sound
    pub winning_sound: String,
    /// Sounds already reported as unplayable
    reported: RefCell<HashSet<SoundKey>>,
}

impl std::fmt::Debug for SoundBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundBoard")
            .field("loaded", &self.bank.len())
            .field("spin_sound", &self.spin_sound)
            .field("winning_sound", &self.winning_sound)
            .finish()
    }
}

impl SoundBoard {
    /// Creates a board with the default choices.
    pub fn new(backend: Arc<dyn AudioBackend>) -> Self {
        Self {
            backend,
            bank: SoundBank::new(),
            spin_sound: DEFAULT_SPIN_SOUND.to_string(),
            winning_sound: DEFAULT_WINNING_SOUND.to_string(),
            reported: RefCell::new(HashSet::new()),
        }
    }

    /// Backend handle for loaders.
    pub fn backend(&self) -> Arc<dyn AudioBackend> {
        self.backend.clone()
    }

    fn play(&self, key: &SoundKey, gain: f32) {
        match self.bank.get(key) {
            Ok(buffer) => self.backend.play(buffer, gain),
            // Ticks fire on every sector crossing; warn once per sound
            Err(e) if self.reported.borrow_mut().insert(key.clone()) => log::warn!("{}", e),
            Err(e) => log::trace!("{}", e),
        }
    }

    /// Pointer entered a new sector.
    pub fn on_tick(&self) {
        self.play(&SoundKey::new(SoundKind::Spin, self.spin_sound.clone()), 1.0);
    }

    /// Winner is being shown: drum roll and winning sound together.
    pub fn on_winner(&self) {
        self.play(&SoundKey::new(SoundKind::Drum, DRUM_ROLL_SOUND), DRUM_ROLL_GAIN);
        self.play(
            &SoundKey::new(SoundKind::Winning, self.winning_sound.clone()),
            WINNING_GAIN,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingAudio {
        played: Mutex<Vec<(String, f32)>>,
    }

    impl AudioBackend for RecordingAudio {
        fn decode(&self, key: &SoundKey, bytes: Vec<u8>) -> Result<SoundBuffer, AudioError> {
            SilentAudio.decode(key, bytes)
        }

        fn play(&self, buffer: &SoundBuffer, gain: f32) {
            self.played
                .lock()
                .unwrap()
                .push((buffer.key.name.clone(), gain));
        }
    }

    fn loaded_board(backend: Arc<RecordingAudio>) -> SoundBoard {
        let mut board = SoundBoard::new(backend);
        for key in catalog() {
            let ticket = board.bank.request(std::slice::from_ref(&key)).remove(0);
            let buffer = SilentAudio.decode(&key, vec![1, 2, 3]);
            assert!(board.bank.commit(&ticket, buffer));
        }
        board
    }

    #[test]
    fn test_catalog_paths() {
        let keys = catalog();
        assert_eq!(keys.len(), 1 + WINNING_SOUNDS.len() + SPIN_SOUNDS.len());
        let drum = keys[0].path(Path::new("assets"));
        assert_eq!(drum, Path::new("assets/sounds/drum/drum-roll.mp3"));
        let win = SoundKey::new(SoundKind::Winning, "yes-victory").path(Path::new("a"));
        assert_eq!(win, Path::new("a/sounds/winning/yes-victory.wav"));
    }

    #[test]
    fn test_winner_plays_drum_and_stinger() {
        let backend = Arc::new(RecordingAudio::default());
        let mut board = loaded_board(backend.clone());
        board.winning_sound = "video-game-win".into();
        board.on_winner();
        let played = backend.played.lock().unwrap().clone();
        assert_eq!(
            played,
            vec![
                ("drum-roll".to_string(), DRUM_ROLL_GAIN),
                ("video-game-win".to_string(), WINNING_GAIN)
            ]
        );
    }

    #[test]
    fn test_tick_uses_selected_spin_sound() {
        let backend = Arc::new(RecordingAudio::default());
        let mut board = loaded_board(backend.clone());
        board.on_tick();
        board.spin_sound = "bell-signal".into();
        board.on_tick();
        let names: Vec<String> = backend.played.lock().unwrap().iter().map(|p| p.0.clone()).collect();
        assert_eq!(names, vec![DEFAULT_SPIN_SOUND.to_string(), "bell-signal".to_string()]);
    }

    #[test]
    fn test_missing_sound_is_silent() {
        let backend = Arc::new(RecordingAudio::default());
        let board = SoundBoard::new(backend.clone());
        board.on_tick();
        board.on_winner();
        assert!(backend.played.lock().unwrap().is_empty());
    }

    #[test]
    fn test_bank_skips_duplicate_requests_and_failures() {
        let mut bank = SoundBank::new();
        let key = SoundKey::new(SoundKind::Spin, "ticker-single");
        let tickets = bank.request(&[key.clone(), key.clone()]);
        assert_eq!(tickets.len(), 1);
        assert!(bank.request(std::slice::from_ref(&key)).is_empty());

        let failed = SilentAudio.decode(&key, Vec::new());
        assert!(!bank.commit(&tickets[0], failed));
        assert!(matches!(bank.get(&key), Err(AudioError::NotLoaded(_))));
    }

    #[test]
    fn test_load_sounds_reads_files() {
        let assets = std::env::temp_dir().join(format!("spin_wheel_audio_{}", std::process::id()));
        let present = SoundKey::new(SoundKind::Spin, "single-spin");
        let absent = SoundKey::new(SoundKind::Spin, "missing");
        let path = present.path(&assets);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"ID3").unwrap();

        let results = futures::executor::block_on(load_sounds(
            Arc::new(SilentAudio),
            assets.clone(),
            vec![present.clone(), absent.clone()],
        ));
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, present);
        assert!(results[0].1.is_ok());
        assert!(matches!(results[1].1, Err(AudioError::Io(_))));
        let _ = std::fs::remove_dir_all(&assets);
    }

    #[test]
    fn test_missing_sound_is_reported_once() {
        let backend = Arc::new(RecordingAudio::default());
        let board = SoundBoard::new(backend.clone());
        for _ in 0..20 {
            board.on_tick();
        }
        board.on_winner();
        assert!(backend.played.lock().unwrap().is_empty());
        // tick, drum roll and winning sound
        assert_eq!(board.reported.borrow().len(), 3);
    }
}
