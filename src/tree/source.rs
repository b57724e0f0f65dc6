//! Lazy directory cursors
//!
//! The walker never asks for a whole listing. A `DirectorySource` opens one
//! directory and hands back a cursor that yields entries one at a time.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

/// What a directory entry is, as reported by the directory read itself.
/// Symbolic links are `Other` and are never followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    File,
    Other,
}

impl From<fs::FileType> for EntryKind {
    fn from(file_type: fs::FileType) -> Self {
        if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }
}

/// One entry yielded by a directory cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: OsString,
    pub kind: EntryKind,
}

impl DirectoryEntry {
    pub fn new(name: impl Into<OsString>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn file(name: impl Into<OsString>) -> Self {
        Self::new(name, EntryKind::File)
    }

    pub fn dir(name: impl Into<OsString>) -> Self {
        Self::new(name, EntryKind::Directory)
    }
}

/// Opens directories as streaming cursors.
pub trait DirectorySource {
    type Cursor: Iterator<Item = io::Result<DirectoryEntry>>;

    fn open(&self, path: &Path) -> io::Result<Self::Cursor>;
}

/// The real file system, read through `std::fs::read_dir`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSource;

impl DirectorySource for FsSource {
    type Cursor = FsCursor;

    fn open(&self, path: &Path) -> io::Result<FsCursor> {
        tracing::trace!("opening directory {}", path.display());
        fs::read_dir(path).map(|inner| FsCursor { inner })
    }
}

/// Cursor over a `ReadDir`. The directory handle closes when this drops.
#[derive(Debug)]
pub struct FsCursor {
    inner: fs::ReadDir,
}

impl Iterator for FsCursor {
    type Item = io::Result<DirectoryEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.inner.next()?;
        Some(entry.map(|entry| {
            // d_type is usually available; an unknown type falls back to Other.
            let kind = entry.file_type().map_or(EntryKind::Other, EntryKind::from);
            DirectoryEntry::new(entry.file_name(), kind)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fs_cursor_reports_kinds() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let mut entries: Vec<_> = FsSource
            .open(dir.path())
            .unwrap()
            .map(|e| e.unwrap())
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(
            entries,
            vec![DirectoryEntry::file("a.txt"), DirectoryEntry::dir("sub")]
        );
    }

    #[test]
    #[cfg(unix)]
    fn test_symlink_is_other() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("real")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link")).unwrap();

        let link = FsSource
            .open(dir.path())
            .unwrap()
            .map(|e| e.unwrap())
            .find(|e| e.name == "link")
            .unwrap();
        assert_eq!(link.kind, EntryKind::Other);
    }

    #[test]
    fn test_open_missing_directory_fails() {
        let err = FsSource.open(Path::new("/nonexistent/sentinel")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_open_file_is_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain");
        fs::write(&file, "x").unwrap();
        assert!(FsSource.open(&file).is_err());
    }
}
