//! Shared application-wide constants.
//! Centralizes tweakable values used across layout, rendering, animation and audio.

// Entries
/// Weight assigned to a freshly created entry.
pub const DEFAULT_WEIGHT: u32 = 1;
/// Largest weight an entry may carry; larger inputs are clamped.
pub const MAX_WEIGHT: u32 = 200;

/// Fill colors used for sectors without a per-entry override, indexed by position.
pub const WHEEL_PALETTE: [&str; 10] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#FFA07A", "#98D8C8", "#F7DC6F", "#BB8FCE", "#85C1E2",
    "#F8B88B", "#ABEBC6",
];

/// Swatches offered by the per-entry color picker.
pub const PICKER_PALETTE: [&str; 30] = [
    "#FF6B6B", "#FF8A80", "#FF5252", "#FF1744", "#D50000", "#FFAB40", "#FFA726", "#FF9800",
    "#FFB86B", "#FFD54F", "#F7DC6F", "#F0E68C", "#ABEBC6", "#A3E4D7", "#4ECDC4", "#45B7D1",
    "#5DADE2", "#85C1E2", "#7D3C98", "#BB8FCE", "#F1948A", "#E74C3C", "#A3BE8C", "#2ECC71",
    "#27AE60", "#16A085", "#34495E", "#95A5A6", "#F1948A", "#F8B88B",
];

// Contrast
/// Luminance (0-255) below which a background counts as dark.
pub const LUMINANCE_THRESHOLD: f64 = 128.0;
/// Side length of the grid an image is downsampled to before averaging luminance.
pub const CONTRAST_SAMPLE_SIZE: u32 = 64;
/// Only every n-th pixel of the downsampled grid is averaged.
pub const CONTRAST_PIXEL_STRIDE: usize = 4;

// Wheel geometry
/// Gap in pixels between the wheel rim and the canvas edge.
pub const WHEEL_EDGE_PADDING: f32 = 7.0;
/// Canvas width from which the hub and pointer are drawn enlarged.
pub const LARGE_CANVAS_WIDTH: u32 = 768;
/// Enlargement applied to the hub and pointer on large canvases.
pub const LARGE_CANVAS_CENTER_SCALE: f32 = 1.7;
/// Separator stroke width between sectors.
pub const SEPARATOR_WIDTH: f32 = 3.0;
/// Unscaled hub radius.
pub const HUB_RADIUS: f32 = 45.0;
/// Unscaled horizontal offset of the pointer from the wheel center.
pub const POINTER_OFFSET: f32 = 20.5;
/// Text shown on the hub.
pub const HUB_LABEL: &str = "SPIN";
/// Unscaled hub label font size.
pub const HUB_FONT_SIZE: f32 = 20.0;

// Labels
/// Radial position of the label center as a fraction of the wheel radius.
pub const LABEL_RADIAL_OFFSET: f32 = 0.65;
/// Maximum label width as a fraction of the wheel radius.
pub const LABEL_MAX_WIDTH_RATIO: f32 = 0.55;
/// Smallest font size a label shrinks to before being truncated.
pub const MIN_LABEL_FONT_SIZE: f32 = 8.0;
/// Floor for the radius-derived base font size.
pub const MIN_BASE_FONT_SIZE: f32 = 12.0;
/// Entry count from which labels get the legibility boost.
pub const MANY_ENTRIES: usize = 8;
/// Fitted labels kept between frames before the cache starts over.
pub const LABEL_CACHE_CAPACITY: usize = 256;
/// Suffix appended to truncated labels.
pub const ELLIPSIS: &str = "...";

// Entry images
/// Corner radius of the rounded clip around entry images.
pub const ENTRY_IMAGE_CORNER_RADIUS: f32 = 7.0;
/// Smallest drawn edge of an entry image in pixels.
pub const ENTRY_IMAGE_MIN_SIZE: f32 = 12.0;

// Spin timing
/// Shortest selectable spin duration in seconds.
pub const MIN_SPIN_SECONDS: u32 = 2;
/// Longest selectable spin duration in seconds.
pub const MAX_SPIN_SECONDS: u32 = 40;
/// Default spin duration in seconds.
pub const DEFAULT_SPIN_SECONDS: u32 = 10;
/// Minimum number of full turns in a spin (inclusive).
pub const MIN_FULL_TURNS: u32 = 5;
/// Maximum number of full turns in a spin (exclusive).
pub const MAX_FULL_TURNS: u32 = 10;
/// Angular speed in degrees per millisecond under which the wheel counts as resting.
pub const REST_SPEED_THRESHOLD: f64 = 0.002;
/// Amount the deceleration phase is stretched per evaluated frame.
pub const DECEL_EXTENSION_STEP_MS: f64 = 100.0;
/// Upper bound on the total deceleration stretch.
pub const MAX_DECEL_EXTENSION_MS: f64 = 10_000.0;

// Audio
/// Tick sounds available for sector crossings.
pub const SPIN_SOUNDS: [&str; 21] = [
    "alarm-beep-2mp3",
    "alarm-clock-beep",
    "bell-signal",
    "chime-bell-ring",
    "clock-close-up",
    "clock-gong",
    "clock-mix-tick",
    "clock-strikemp3",
    "electric-tickmp3",
    "pendulum-tick",
    "percussion-tock",
    "racing-countdown",
    "single-spin",
    "slow-racing-countdown",
    "ticker-single",
    "ticking-counter",
    "ticking-timer",
    "tick-tock-bell-beep",
    "tick-tock-bell",
    "wall-clock-tick",
    "wall-clock-tock",
];
/// Stingers available for the winner announcement.
pub const WINNING_SOUNDS: [&str; 8] = [
    "cheering-crowd-whistle",
    "fanfare-announcement",
    "huge-crowd-cheering",
    "moderate-applause",
    "small-group-applause",
    "video-game-win",
    "win-alarm",
    "yes-victory",
];
/// Default tick sound.
pub const DEFAULT_SPIN_SOUND: &str = "single-spin";
/// Default winner stinger.
pub const DEFAULT_WINNING_SOUND: &str = "small-group-applause";
/// Key of the drum roll played before the winner stinger.
pub const DRUM_ROLL_SOUND: &str = "drum-roll";
/// Gain for the drum roll.
pub const DRUM_ROLL_GAIN: f32 = 0.8;
/// Gain for the winner stinger.
pub const WINNING_GAIN: f32 = 0.9;

// Undo/redo
/// Maximum number of undo history entries to retain.
pub const MAX_UNDO_HISTORY: usize = 200;

// Assets
/// File extensions accepted by the image listings.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "svg"];
/// Largest edge an SVG image is rasterised to.
pub const MAX_SVG_RASTER_SIZE: f32 = 1024.0;
