//! # Spin Wheel
//!
//! A weighted prize wheel: a list of entries is laid out as pie sectors sized
//! by weight, spun with a timed accelerate, cruise and decelerate animation,
//! and the entry under the fixed pointer when the wheel comes to rest wins.
//!
//! ## Components
//! - **Entry list** ([`entries`]): ordered entries with stable ids, inclusion
//!   flags, weights, colors and images
//! - **Sector layout** ([`layout`]): weights to contiguous angular ranges
//! - **Contrast** ([`contrast`], [`theme`]): light/dark decisions for text
//!   over colors and images
//! - **Renderer** ([`render`]): one complete wheel frame on a raster canvas
//! - **Animator** ([`animator`]): the spin state machine, advanced per frame
//! - **Winner** ([`winner`]): the sector under the pointer at rest
//!
//! Assets (images, sounds, listings) and configuration live in [`assets`],
//! [`audio`], [`listing`] and [`config`]. The desktop host is built on egui.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod animator;
pub mod assets;
pub mod audio;
pub mod config;
pub mod constants;
pub mod contrast;
pub mod entries;
pub mod error;
pub mod layout;
pub mod listing;
pub mod render;
pub mod theme;
pub mod types;
pub mod winner;
mod ui;

// Re-export the types most callers need
pub use animator::{SpinAnimator, SpinFrame, SpinResult, StartOutcome};
pub use config::AppConfig;
pub use entries::EntryList;
pub use types::*;
use ui::WheelApp;

/// Runs the spin wheel application.
///
/// Configuration is read from the file named by `SPIN_WHEEL_CONFIG`, falling
/// back to defaults. System fonts are loaded once here for label rendering.
///
/// # Returns
///
/// Returns `Ok(())` if the application runs successfully, or an `eframe::Error` if
/// initialization fails.
///
/// # Example
///
/// ```no_run
/// use spin_wheel::run_app;
///
/// fn main() -> Result<(), eframe::Error> {
///     run_app()
/// }
/// ```
pub fn run_app() -> Result<(), eframe::Error> {
    let config = AppConfig::from_env();
    let (width, height) = config.window_size;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Spin the Wheel")
            .with_inner_size([width, height]),
        ..Default::default()
    };
    eframe::run_native(
        "Spin the Wheel",
        options,
        Box::new(|_cc| Ok(Box::new(WheelApp::new(config)))),
    )
}
