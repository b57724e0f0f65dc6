//! Sentinel - a streaming directory tree scanner that labels binary files
//! from their first few bytes

pub mod error;
pub mod output;
pub mod sniff;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use std::io::IsTerminal;
use std::path::Path;

pub use error::{DirectoryError, ScanError};
pub use output::{JsonLinesFormatter, OutputConfig, StreamingFormatter};
pub use sniff::{FormatMatcher, Prefix, SniffResult, Sniffer, identify};
pub use tree::{
    DirectoryEntry, DirectorySource, EntryKind, FsSource, ScanSummary, StreamingOutput,
    StreamingWalker, TreeLine, WalkerConfig,
};

/// Scan `path` with default settings and print the tree to stdout.
///
/// Returns after the whole tree, the totals and the completion marker have
/// been printed.
pub fn scan(path: &Path) -> Result<ScanSummary, ScanError> {
    let walker = StreamingWalker::new(WalkerConfig::default());
    let mut formatter = StreamingFormatter::new(OutputConfig {
        use_color: std::io::stdout().is_terminal(),
        error_color: std::io::stderr().is_terminal(),
        ..Default::default()
    });
    walker.walk_streaming(path, &mut formatter)
}
