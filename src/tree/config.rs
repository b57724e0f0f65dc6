//! Configuration types for tree walkers

use std::ffi::OsStr;

/// Names skipped by default: version-control metadata and dependency caches.
pub const DEFAULT_IGNORED_NAMES: [&str; 2] = [".git", "node_modules"];

/// Configuration for tree walking behavior.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Entry names that are never shown, opened or sniffed. Exact match.
    pub ignored_names: Vec<String>,
    /// Descend at most this many levels below the root.
    pub max_depth: Option<usize>,
    /// Run the format sniffer on regular files.
    pub sniff: bool,
}

impl WalkerConfig {
    /// Check if an entry name is in the ignore set.
    pub fn is_ignored(&self, name: &OsStr) -> bool {
        self.ignored_names.iter().any(|n| name == OsStr::new(n))
    }

    /// Check if a directory at `depth` may be opened.
    pub fn can_descend(&self, depth: usize) -> bool {
        self.max_depth.is_none_or(|max| depth < max)
    }
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            ignored_names: DEFAULT_IGNORED_NAMES.iter().map(|s| s.to_string()).collect(),
            max_depth: None,
            sniff: true,
        }
    }
}
