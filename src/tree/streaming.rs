//! StreamingWalker - streams output without building the tree in memory

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use crate::error::{DirectoryError, ScanError};
use crate::sniff::Sniffer;

use super::config::WalkerConfig;
use super::source::{DirectoryEntry, DirectorySource, EntryKind, FsSource};

/// One rendered entry, before any presentation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeLine<'a> {
    /// Nesting level; entries of the root directory are at depth 0.
    pub depth: usize,
    pub kind: EntryKind,
    pub name: &'a str,
    /// Sniffer label for regular files, or links to them, that matched a format.
    pub label: Option<&'a str>,
}

/// Totals for a finished (or cancelled) scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub directories: usize,
    pub files: usize,
    pub others: usize,
    pub annotated: usize,
    pub errors: usize,
    pub cancelled: bool,
}

/// Callback for streaming output - receives each line as soon as it is known.
pub trait StreamingOutput {
    /// Called once with the resolved root, before any entry.
    fn begin(&mut self, root: &Path) -> io::Result<()>;

    fn output_line(&mut self, line: &TreeLine<'_>) -> io::Result<()>;

    /// A directory that could not be opened or read to the end.
    fn output_error(&mut self, error: &DirectoryError) -> io::Result<()>;

    /// Always called last, including after cancellation.
    fn finish(&mut self, summary: &ScanSummary) -> io::Result<()>;
}

/// One level of the depth-first descent.
#[derive(Debug)]
struct ScanFrame {
    path: PathBuf,
    depth: usize,
}

impl ScanFrame {
    fn child(&self, name: &std::ffi::OsStr) -> ScanFrame {
        ScanFrame {
            path: self.path.join(name),
            depth: self.depth + 1,
        }
    }
}

enum Flow {
    Continue,
    Stop,
}

/// Streaming tree walker that outputs directly without building a tree in memory.
///
/// Only the chain of open directories from the root to the current entry is
/// live at any time, one cursor per level, so memory is O(depth) no matter
/// how many entries a directory holds.
pub struct StreamingWalker<S = FsSource> {
    config: WalkerConfig,
    source: S,
    sniffer: Sniffer,
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl StreamingWalker<FsSource> {
    pub fn new(config: WalkerConfig) -> Self {
        Self {
            config,
            source: FsSource,
            sniffer: Sniffer::default(),
            cancel_flag: None,
        }
    }
}

impl<S: DirectorySource> StreamingWalker<S> {
    /// Read directories from somewhere other than the real file system.
    pub fn with_source<T: DirectorySource>(self, source: T) -> StreamingWalker<T> {
        StreamingWalker {
            config: self.config,
            source,
            sniffer: self.sniffer,
            cancel_flag: self.cancel_flag,
        }
    }

    pub fn with_sniffer(mut self, sniffer: Sniffer) -> Self {
        self.sniffer = sniffer;
        self
    }

    /// Stop the walk once `flag` is set. Checked before every entry.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(flag);
        self
    }

    pub fn config(&self) -> &WalkerConfig {
        &self.config
    }

    /// Walk `root` depth-first and stream every line to `output`.
    ///
    /// Fails before producing any output if the root cannot be opened as a
    /// directory. Unreadable subdirectories are reported through
    /// [`StreamingOutput::output_error`] and do not stop the walk; only a
    /// write failure on `output` does.
    pub fn walk_streaming<O: StreamingOutput>(
        &self,
        root: &Path,
        output: &mut O,
    ) -> Result<ScanSummary, ScanError> {
        let root = std::path::absolute(root).map_err(|source| ScanError::Resolve {
            path: root.to_path_buf(),
            source,
        })?;
        let cursor = self
            .source
            .open(&root)
            .map_err(|e| ScanError::from_root_open(root.clone(), e))?;

        output.begin(&root)?;

        let mut summary = ScanSummary::default();
        let frame = ScanFrame {
            path: root,
            depth: 0,
        };
        if let Flow::Stop = self.drain_dir(&frame, cursor, output, &mut summary)? {
            tracing::debug!("scan of {} cancelled", frame.path.display());
            summary.cancelled = true;
        }

        output.finish(&summary)?;
        Ok(summary)
    }

    fn walk_dir<O: StreamingOutput>(
        &self,
        frame: &ScanFrame,
        output: &mut O,
        summary: &mut ScanSummary,
    ) -> io::Result<Flow> {
        match self.source.open(&frame.path) {
            Ok(cursor) => self.drain_dir(frame, cursor, output, summary),
            Err(e) => {
                self.report(DirectoryError::new(&frame.path, e), output, summary)?;
                Ok(Flow::Continue)
            }
        }
    }

    fn drain_dir<O: StreamingOutput>(
        &self,
        frame: &ScanFrame,
        cursor: S::Cursor,
        output: &mut O,
        summary: &mut ScanSummary,
    ) -> io::Result<Flow> {
        for entry in cursor {
            if self.is_cancelled() {
                return Ok(Flow::Stop);
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    // The rest of this directory is abandoned; siblings continue.
                    self.report(DirectoryError::new(&frame.path, e), output, summary)?;
                    return Ok(Flow::Continue);
                }
            };

            if self.config.is_ignored(&entry.name) {
                continue;
            }

            if let Flow::Stop = self.visit(frame, entry, output, summary)? {
                return Ok(Flow::Stop);
            }
        }
        Ok(Flow::Continue)
    }

    fn visit<O: StreamingOutput>(
        &self,
        frame: &ScanFrame,
        entry: DirectoryEntry,
        output: &mut O,
        summary: &mut ScanSummary,
    ) -> io::Result<Flow> {
        let name = entry.name.to_string_lossy();

        match entry.kind {
            EntryKind::Directory => {
                output.output_line(&TreeLine {
                    depth: frame.depth,
                    kind: EntryKind::Directory,
                    name: &name,
                    label: None,
                })?;
                summary.directories += 1;

                let child = frame.child(&entry.name);
                if self.config.can_descend(child.depth) {
                    return self.walk_dir(&child, output, summary);
                }
            }
            EntryKind::File => {
                let sniffed = self
                    .config
                    .sniff
                    .then(|| self.sniffer.identify(&frame.path.join(&entry.name)));
                let label = sniffed.as_ref().and_then(|result| result.label());

                output.output_line(&TreeLine {
                    depth: frame.depth,
                    kind: EntryKind::File,
                    name: &name,
                    label,
                })?;
                summary.files += 1;
                if label.is_some() {
                    summary.annotated += 1;
                }
            }
            EntryKind::Other => {
                // Symlinks to regular files are sniffed through the link.
                // FIFOs, sockets and devices are never opened.
                let path = frame.path.join(&entry.name);
                let sniffed = (self.config.sniff
                    && fs::metadata(&path).is_ok_and(|meta| meta.is_file()))
                .then(|| self.sniffer.identify(&path));
                let label = sniffed.as_ref().and_then(|result| result.label());

                output.output_line(&TreeLine {
                    depth: frame.depth,
                    kind: EntryKind::Other,
                    name: &name,
                    label,
                })?;
                summary.others += 1;
                if label.is_some() {
                    summary.annotated += 1;
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn report<O: StreamingOutput>(
        &self,
        error: DirectoryError,
        output: &mut O,
        summary: &mut ScanSummary,
    ) -> io::Result<()> {
        tracing::debug!("{}", error);
        summary.errors += 1;
        output.output_error(&error)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}
