//! Test utilities: temporary trees, in-memory directory sources and a
//! recording output sink.
//!
//! This module is only compiled for tests and benchmarks.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tempfile::TempDir;

use crate::error::DirectoryError;
use crate::tree::{DirectoryEntry, DirectorySource, ScanSummary, StreamingOutput, TreeLine};

/// A temporary directory tree for testing.
///
/// The tree is automatically cleaned up when dropped.
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file, creating parent directories as needed.
    pub fn add_file(&self, path: &str, content: &[u8]) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Write a PNG header with the given IHDR dimensions.
    pub fn add_png(&self, path: &str, width: u32, height: u32) -> PathBuf {
        self.add_file(path, &png_bytes(width, height))
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Signature, IHDR chunk header, dimensions and a little trailing data.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(&13u32.to_be_bytes());
    data.extend_from_slice(b"IHDR");
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[8, 2, 0, 0, 0, 0x90, 0x77, 0x53, 0xDE]);
    data
}

/// An owned copy of one output event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    Begin(PathBuf),
    Line {
        depth: usize,
        name: String,
        label: Option<String>,
    },
    Error {
        path: PathBuf,
        message: String,
    },
    Finish(ScanSummary),
}

/// Output sink that keeps every event, in order.
#[derive(Debug, Default)]
pub struct RecordingOutput {
    pub events: Vec<Recorded>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(depth, name)` for every tree line, in emission order.
    pub fn lines(&self) -> Vec<(usize, String)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Recorded::Line { depth, name, .. } => Some((*depth, name.clone())),
                _ => None,
            })
            .collect()
    }

    /// `(path, message)` for every reported directory error.
    pub fn errors(&self) -> Vec<(PathBuf, String)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Recorded::Error { path, message } => Some((path.clone(), message.clone())),
                _ => None,
            })
            .collect()
    }

    /// Label of the first line named `name`.
    pub fn label_of(&self, name: &str) -> Option<String> {
        self.events.iter().find_map(|e| match e {
            Recorded::Line {
                name: n, label, ..
            } if n == name => label.clone(),
            _ => None,
        })
    }
}

impl StreamingOutput for RecordingOutput {
    fn begin(&mut self, root: &Path) -> io::Result<()> {
        self.events.push(Recorded::Begin(root.to_path_buf()));
        Ok(())
    }

    fn output_line(&mut self, line: &TreeLine<'_>) -> io::Result<()> {
        self.events.push(Recorded::Line {
            depth: line.depth,
            name: line.name.to_string(),
            label: line.label.map(str::to_string),
        });
        Ok(())
    }

    fn output_error(&mut self, error: &DirectoryError) -> io::Result<()> {
        self.events.push(Recorded::Error {
            path: error.path.clone(),
            message: error.source.to_string(),
        });
        Ok(())
    }

    fn finish(&mut self, summary: &ScanSummary) -> io::Result<()> {
        self.events.push(Recorded::Finish(*summary));
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum Listing {
    Entries(Vec<DirectoryEntry>),
    Generated(usize),
    Fails(io::ErrorKind),
    FailsAfter(Vec<DirectoryEntry>, io::ErrorKind),
}

/// In-memory directory source. Paths without a listing do not exist.
///
/// Clones share the record of which directories were opened.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    listings: HashMap<PathBuf, Listing>,
    opened: Rc<RefCell<Vec<PathBuf>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir(mut self, path: impl Into<PathBuf>, entries: Vec<DirectoryEntry>) -> Self {
        self.listings.insert(path.into(), Listing::Entries(entries));
        self
    }

    /// A directory of `count` files named `entry-0000000` onwards, generated lazily.
    pub fn with_generated_dir(mut self, path: impl Into<PathBuf>, count: usize) -> Self {
        self.listings.insert(path.into(), Listing::Generated(count));
        self
    }

    /// A directory whose open fails with `kind`.
    pub fn with_failing_dir(mut self, path: impl Into<PathBuf>, kind: io::ErrorKind) -> Self {
        self.listings.insert(path.into(), Listing::Fails(kind));
        self
    }

    /// A directory that yields `entries` and then a read error.
    pub fn with_dir_failing_after(
        mut self,
        path: impl Into<PathBuf>,
        entries: Vec<DirectoryEntry>,
        kind: io::ErrorKind,
    ) -> Self {
        self.listings
            .insert(path.into(), Listing::FailsAfter(entries, kind));
        self
    }

    pub fn was_opened(&self, path: impl AsRef<Path>) -> bool {
        self.opened.borrow().iter().any(|p| p == path.as_ref())
    }
}

impl DirectorySource for MemorySource {
    type Cursor = Box<dyn Iterator<Item = io::Result<DirectoryEntry>>>;

    fn open(&self, path: &Path) -> io::Result<Self::Cursor> {
        self.opened.borrow_mut().push(path.to_path_buf());
        match self.listings.get(path) {
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
            Some(Listing::Fails(kind)) => Err(io::Error::from(*kind)),
            Some(Listing::Entries(entries)) => Ok(Box::new(entries.clone().into_iter().map(Ok))),
            Some(Listing::Generated(count)) => Ok(Box::new(
                (0..*count).map(|i| Ok(DirectoryEntry::file(format!("entry-{:07}", i)))),
            )),
            Some(Listing::FailsAfter(entries, kind)) => {
                let kind = *kind;
                Ok(Box::new(
                    entries
                        .clone()
                        .into_iter()
                        .map(Ok)
                        .chain(std::iter::once(Err(io::Error::from(kind)))),
                ))
            }
        }
    }
}
