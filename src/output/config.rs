//! Output configuration types

/// Configuration for output formatting.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Color tree lines and labels on stdout.
    pub use_color: bool,
    /// Color directory error reports on stderr.
    pub error_color: bool,
    /// Print the directory/file totals before the completion marker.
    pub show_totals: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            use_color: true,
            error_color: true,
            show_totals: true,
        }
    }
}
