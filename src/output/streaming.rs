//! Streaming console formatter
//!
//! This module provides `StreamingFormatter`, which writes each tree line
//! as soon as the walker produces it, for use with `StreamingWalker`.

use std::io::{self, Write};
use std::path::Path;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::error::DirectoryError;
use crate::tree::{ScanSummary, StreamingOutput, TreeLine};

use super::config::OutputConfig;
use super::utils::{CANCELLED_MARKER, COMPLETE_MARKER, entry_text};

/// Streaming output formatter - writes directly to the terminal without buffering.
///
/// Tree lines go to `out`; unreadable-directory reports go to `err`.
pub struct StreamingFormatter<W = StandardStream> {
    config: OutputConfig,
    out: W,
    err: W,
}

impl StreamingFormatter<StandardStream> {
    /// Write to stdout and stderr.
    pub fn new(config: OutputConfig) -> Self {
        Self {
            out: StandardStream::stdout(color_choice(config.use_color)),
            err: StandardStream::stderr(color_choice(config.error_color)),
            config,
        }
    }
}

fn color_choice(enabled: bool) -> ColorChoice {
    if enabled {
        ColorChoice::Always
    } else {
        ColorChoice::Never
    }
}

impl<W: WriteColor> StreamingFormatter<W> {
    /// Write to caller-supplied sinks, e.g. `termcolor::Buffer` in tests.
    pub fn with_writers(config: OutputConfig, out: W, err: W) -> Self {
        Self { config, out, err }
    }

    pub fn into_writers(self) -> (W, W) {
        (self.out, self.err)
    }
}

impl<W: WriteColor> StreamingOutput for StreamingFormatter<W> {
    fn begin(&mut self, root: &Path) -> io::Result<()> {
        writeln!(self.out, "Scanning Tree: {} ...", root.display())?;
        writeln!(self.out)
    }

    fn output_line(&mut self, line: &TreeLine<'_>) -> io::Result<()> {
        write!(self.out, "{}", entry_text(line))?;
        if let Some(label) = line.label {
            write!(self.out, " ")?;
            self.out
                .set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
            write!(self.out, "{}", label)?;
            self.out.reset()?;
        }
        writeln!(self.out)
    }

    fn output_error(&mut self, error: &DirectoryError) -> io::Result<()> {
        self.err
            .set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
        write!(self.err, "❌ {}", error)?;
        self.err.reset()?;
        writeln!(self.err)
    }

    fn finish(&mut self, summary: &ScanSummary) -> io::Result<()> {
        writeln!(self.out)?;
        if self.config.show_totals {
            writeln!(
                self.out,
                "{} directories, {} files",
                summary.directories,
                summary.files + summary.others
            )?;
        }
        if summary.cancelled {
            writeln!(self.out, "{}", CANCELLED_MARKER)?;
        } else {
            writeln!(self.out, "{}", COMPLETE_MARKER)?;
        }
        self.out.flush()?;
        self.err.flush()
    }
}
