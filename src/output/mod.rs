//! Tree formatting and display
//!
//! The walker produces structured `TreeLine`s; this module decides how they
//! look:
//! - `streaming` - console output with glyphs, icons and colored labels
//! - `json` - one JSON object per event
//! - `utils` - glyph constants and prefix helpers

mod config;
mod json;
mod streaming;
mod utils;

pub use config::OutputConfig;
pub use json::JsonLinesFormatter;
pub use streaming::StreamingFormatter;
pub use utils::{BRANCH, DIR_ICON, FILE_ICON, INDENT_UNIT, entry_text, icon, indent, plain_line};
