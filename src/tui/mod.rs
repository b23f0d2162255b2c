//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides a single-screen form for:
//! - Entering a name
//! - Watching the lookup run in the background
//! - Reading the estimated age, gender and nationalities

mod app;
pub mod format;
mod styles;
mod ui;
mod worker;

pub use app::App;
pub use styles::ProbeTheme;
pub use worker::{LookupCompletion, LookupWorker};
