//! Directory tree walking logic
//!
//! `StreamingWalker` descends depth-first, one open directory cursor per
//! level, and hands each entry to a `StreamingOutput` as soon as it is read.
//! Nothing is sorted or buffered, so memory stays O(depth) however wide a
//! directory is.

mod config;
mod source;
mod streaming;

pub use config::{DEFAULT_IGNORED_NAMES, WalkerConfig};
pub use source::{DirectoryEntry, DirectorySource, EntryKind, FsCursor, FsSource};
pub use streaming::{ScanSummary, StreamingOutput, StreamingWalker, TreeLine};
