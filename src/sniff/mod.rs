//! Binary format sniffing from file headers
//!
//! A `Sniffer` reads at most [`PREFIX_LEN`] bytes from the start of a file and
//! runs a list of registered [`FormatMatcher`]s over that buffer, in order.
//! The first matcher that recognizes the bytes supplies the label.
//!
//! Sniffing never fails loudly. A file that cannot be opened or read yields
//! [`SniffResult::ReadError`], which the walker renders the same way as
//! [`SniffResult::NoMatch`]: no annotation.

mod formats;

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::LazyLock;

pub use formats::{Bmp, Elf, Gif, Gzip, Jpeg, Pdf, Png, Zip};

/// Number of header bytes handed to matchers.
pub const PREFIX_LEN: usize = 32;

static DEFAULT_SNIFFER: LazyLock<Sniffer> = LazyLock::new(Sniffer::default);

/// Identify a file with the default set of formats.
pub fn identify(path: &Path) -> SniffResult {
    DEFAULT_SNIFFER.identify(path)
}

/// Outcome of sniffing one file.
#[derive(Debug)]
pub enum SniffResult {
    /// A registered format recognized the header.
    Match(String),
    /// The header was read but no registered format recognized it.
    NoMatch,
    /// The file could not be opened or read.
    ReadError(io::Error),
}

impl SniffResult {
    /// The label to display, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            SniffResult::Match(label) => Some(label),
            SniffResult::NoMatch | SniffResult::ReadError(_) => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, SniffResult::Match(_))
    }
}

/// The first bytes of a file, zero-padded to [`PREFIX_LEN`].
///
/// `len` records how many bytes were actually read. Signature checks go
/// through [`Prefix::starts_with`], which only looks at real bytes, while the
/// fixed-offset integer readers see zeros past the end of a short file.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Prefix {
    bytes: [u8; PREFIX_LEN],
    len: usize,
}

impl Prefix {
    /// Build a prefix from an in-memory header. Bytes past `PREFIX_LEN` are dropped.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut prefix = Self::empty();
        let len = data.len().min(PREFIX_LEN);
        prefix.bytes[..len].copy_from_slice(&data[..len]);
        prefix.len = len;
        prefix
    }

    /// Read up to `PREFIX_LEN` bytes from the start of `reader`.
    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut prefix = Self::empty();
        while prefix.len < PREFIX_LEN {
            match reader.read(&mut prefix.bytes[prefix.len..]) {
                Ok(0) => break,
                Ok(n) => prefix.len += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(prefix)
    }

    fn empty() -> Self {
        Self {
            bytes: [0; PREFIX_LEN],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The bytes actually read from the file.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn starts_with(&self, signature: &[u8]) -> bool {
        self.as_slice().starts_with(signature)
    }

    /// Whether `signature` appears at `offset` within the bytes actually read.
    pub fn has_at(&self, offset: usize, signature: &[u8]) -> bool {
        self.as_slice()
            .get(offset..offset + signature.len())
            .is_some_and(|bytes| bytes == signature)
    }

    pub fn byte(&self, offset: usize) -> u8 {
        self.bytes.get(offset).copied().unwrap_or(0)
    }

    pub fn u16_le(&self, offset: usize) -> u16 {
        u16::from_le_bytes(self.array(offset))
    }

    pub fn u32_be(&self, offset: usize) -> u32 {
        u32::from_be_bytes(self.array(offset))
    }

    pub fn u32_le(&self, offset: usize) -> u32 {
        u32::from_le_bytes(self.array(offset))
    }

    pub fn i32_le(&self, offset: usize) -> i32 {
        i32::from_le_bytes(self.array(offset))
    }

    fn array<const N: usize>(&self, offset: usize) -> [u8; N] {
        self.bytes
            .get(offset..offset + N)
            .and_then(|bytes| bytes.try_into().ok())
            .unwrap_or([0; N])
    }
}

impl fmt::Debug for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prefix")
            .field("bytes", &self.as_slice())
            .field("len", &self.len)
            .finish()
    }
}

/// One recognizable format: a signature check plus label extraction.
pub trait FormatMatcher: Send + Sync {
    /// Short format name, used for logging and listing.
    fn name(&self) -> &'static str;

    /// Return a label if the header belongs to this format.
    fn probe(&self, prefix: &Prefix) -> Option<String>;
}

/// Ordered registry of format matchers.
pub struct Sniffer {
    matchers: Vec<Box<dyn FormatMatcher>>,
}

impl Sniffer {
    /// A sniffer with no formats; every file is `NoMatch`.
    pub fn new() -> Self {
        Self {
            matchers: Vec::new(),
        }
    }

    /// All built-in formats, PNG first.
    pub fn with_default_formats() -> Self {
        let mut sniffer = Self::new();
        sniffer.register(Png);
        sniffer.register(Jpeg);
        sniffer.register(Gif);
        sniffer.register(Bmp);
        sniffer.register(Pdf);
        sniffer.register(Gzip);
        sniffer.register(Zip);
        sniffer.register(Elf);
        sniffer
    }

    /// Append a matcher. It runs after every matcher registered before it.
    pub fn register<M: FormatMatcher + 'static>(&mut self, matcher: M) {
        self.matchers.push(Box::new(matcher));
    }

    /// Names of registered formats in evaluation order.
    pub fn formats(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.matchers.iter().map(|m| m.name())
    }

    /// Classify an already-read header.
    pub fn classify(&self, prefix: &Prefix) -> SniffResult {
        self.matchers
            .iter()
            .find_map(|m| m.probe(prefix))
            .map_or(SniffResult::NoMatch, SniffResult::Match)
    }

    /// Open `path`, read its header and classify it.
    ///
    /// The file is closed before this returns on every path.
    pub fn identify(&self, path: &Path) -> SniffResult {
        match read_prefix(path) {
            Ok(prefix) => self.classify(&prefix),
            Err(e) => {
                tracing::trace!("sniff skipped {}: {}", path.display(), e);
                SniffResult::ReadError(e)
            }
        }
    }
}

impl Default for Sniffer {
    fn default() -> Self {
        Self::with_default_formats()
    }
}

impl fmt::Debug for Sniffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.formats()).finish()
    }
}

fn read_prefix(path: &Path) -> io::Result<Prefix> {
    let mut file = File::open(path)?;
    Prefix::read_from(&mut file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn png_header(width: u32, height: u32) -> Vec<u8> {
        let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        data.extend_from_slice(&13u32.to_be_bytes());
        data.extend_from_slice(b"IHDR");
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&[8, 6, 0, 0, 0]);
        data.extend_from_slice(b"trailing image data that is never read");
        data
    }

    #[test]
    fn test_png_dimensions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("screen.png");
        fs::write(&path, png_header(1920, 1080)).unwrap();

        let result = identify(&path);
        assert_eq!(result.label(), Some("[PNG 1920x1080]"));
    }

    #[test]
    fn test_png_only_needs_four_byte_signature() {
        let mut data = vec![0x89, 0x50, 0x4E, 0x47];
        data.resize(16, 0xAA);
        data.extend_from_slice(&640u32.to_be_bytes());
        data.extend_from_slice(&480u32.to_be_bytes());

        let result = Sniffer::default().classify(&Prefix::from_bytes(&data));
        assert_eq!(result.label(), Some("[PNG 640x480]"));
    }

    #[test]
    fn test_short_and_empty_files_do_not_match() {
        let dir = TempDir::new().unwrap();
        let empty = dir.path().join("empty");
        let three = dir.path().join("three");
        let zeros = dir.path().join("zeros");
        fs::write(&empty, b"").unwrap();
        fs::write(&three, [0x89, 0x50, 0x4E]).unwrap();
        fs::write(&zeros, [0u8; 64]).unwrap();

        for path in [&empty, &three, &zeros] {
            let result = identify(path);
            assert!(
                matches!(result, SniffResult::NoMatch),
                "{} should not match: {:?}",
                path.display(),
                result
            );
        }
    }

    #[test]
    fn test_truncated_png_reads_zero_dimensions() {
        let prefix = Prefix::from_bytes(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]);
        let result = Sniffer::default().classify(&prefix);
        assert_eq!(result.label(), Some("[PNG 0x0]"));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = identify(Path::new("/nonexistent/sentinel/image.png"));
        assert!(matches!(result, SniffResult::ReadError(_)));
        assert_eq!(result.label(), None);
    }

    #[test]
    #[cfg(unix)]
    fn test_directory_path_is_read_error() {
        let dir = TempDir::new().unwrap();
        let result = identify(dir.path());
        assert!(matches!(result, SniffResult::ReadError(_)));
    }

    #[test]
    fn test_prefix_caps_at_prefix_len() {
        let data = [7u8; 100];
        let prefix = Prefix::read_from(&mut &data[..]).unwrap();
        assert_eq!(prefix.len(), PREFIX_LEN);
        assert_eq!(prefix.as_slice(), &data[..PREFIX_LEN]);
    }

    #[test]
    fn test_prefix_reads_past_end_as_zero() {
        let prefix = Prefix::from_bytes(&[1, 2, 3]);
        assert_eq!(prefix.len(), 3);
        assert_eq!(prefix.byte(2), 3);
        assert_eq!(prefix.byte(3), 0);
        assert_eq!(prefix.u32_be(16), 0);
        assert_eq!(prefix.u32_be(30), 0);
        assert!(!prefix.has_at(2, &[3, 0]));
    }

    #[test]
    fn test_empty_registry_never_matches() {
        let result = Sniffer::new().classify(&Prefix::from_bytes(&png_header(1, 1)));
        assert!(matches!(result, SniffResult::NoMatch));
    }

    struct Magic;

    impl FormatMatcher for Magic {
        fn name(&self) -> &'static str {
            "MAGIC"
        }

        fn probe(&self, prefix: &Prefix) -> Option<String> {
            prefix.starts_with(b"MAGIC").then(|| "[MAGIC]".to_string())
        }
    }

    #[test]
    fn test_registered_matcher_runs_in_order() {
        let mut sniffer = Sniffer::with_default_formats();
        sniffer.register(Magic);

        assert_eq!(sniffer.formats().last(), Some("MAGIC"));
        assert_eq!(
            sniffer.classify(&Prefix::from_bytes(b"MAGIC and more")).label(),
            Some("[MAGIC]")
        );
        // PNG is registered earlier and still wins on PNG input.
        assert_eq!(
            sniffer.classify(&Prefix::from_bytes(&png_header(2, 3))).label(),
            Some("[PNG 2x3]")
        );
    }
}
