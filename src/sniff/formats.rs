//! Built-in format matchers
//!
//! Every matcher checks a magic number inside the bytes actually read, then
//! pulls whatever fixed-offset fields fit in the header buffer.

use super::{FormatMatcher, Prefix};

const PNG_SIGNATURE: [u8; 4] = [0x89, 0x50, 0x4E, 0x47];
const JPEG_SIGNATURE: [u8; 3] = [0xFF, 0xD8, 0xFF];
const GZIP_SIGNATURE: [u8; 3] = [0x1F, 0x8B, 0x08];
const ZIP_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
const ELF_SIGNATURE: [u8; 4] = [0x7F, 0x45, 0x4C, 0x46];

/// BITMAPINFOHEADER and its later extensions. The older 12-byte core header
/// stores 16-bit dimensions and is not recognized.
const BMP_INFO_HEADER_SIZES: [u32; 5] = [40, 52, 56, 108, 124];

/// PNG: width and height are the first two IHDR fields, big-endian.
pub struct Png;

impl FormatMatcher for Png {
    fn name(&self) -> &'static str {
        "PNG"
    }

    fn probe(&self, prefix: &Prefix) -> Option<String> {
        if !prefix.starts_with(&PNG_SIGNATURE) {
            return None;
        }
        let width = prefix.u32_be(16);
        let height = prefix.u32_be(20);
        Some(format!("[PNG {}x{}]", width, height))
    }
}

/// JPEG: SOI marker followed by any segment marker. Dimensions live in a
/// SOF segment that is usually well past the header buffer.
pub struct Jpeg;

impl FormatMatcher for Jpeg {
    fn name(&self) -> &'static str {
        "JPEG"
    }

    fn probe(&self, prefix: &Prefix) -> Option<String> {
        prefix
            .starts_with(&JPEG_SIGNATURE)
            .then(|| "[JPEG]".to_string())
    }
}

/// GIF87a / GIF89a: logical screen size, little-endian u16.
pub struct Gif;

impl FormatMatcher for Gif {
    fn name(&self) -> &'static str {
        "GIF"
    }

    fn probe(&self, prefix: &Prefix) -> Option<String> {
        if !prefix.starts_with(b"GIF87a") && !prefix.starts_with(b"GIF89a") {
            return None;
        }
        Some(format!("[GIF {}x{}]", prefix.u16_le(6), prefix.u16_le(8)))
    }
}

/// Windows bitmap. Height is negative for top-down images.
pub struct Bmp;

impl FormatMatcher for Bmp {
    fn name(&self) -> &'static str {
        "BMP"
    }

    fn probe(&self, prefix: &Prefix) -> Option<String> {
        // "BM" alone is too weak; require a known DIB header size as well.
        if !prefix.starts_with(b"BM") || prefix.len() < 18 {
            return None;
        }
        if !BMP_INFO_HEADER_SIZES.contains(&prefix.u32_le(14)) {
            return None;
        }
        let width = prefix.i32_le(18).unsigned_abs();
        let height = prefix.i32_le(22).unsigned_abs();
        Some(format!("[BMP {}x{}]", width, height))
    }
}

/// PDF: `%PDF-` followed by a `major.minor` version.
pub struct Pdf;

impl FormatMatcher for Pdf {
    fn name(&self) -> &'static str {
        "PDF"
    }

    fn probe(&self, prefix: &Prefix) -> Option<String> {
        if !prefix.starts_with(b"%PDF-") {
            return None;
        }
        let version = prefix
            .as_slice()
            .get(5..8)
            .filter(|v| v[0].is_ascii_digit() && v[1] == b'.' && v[2].is_ascii_digit())
            .and_then(|v| std::str::from_utf8(v).ok());
        Some(match version {
            Some(v) => format!("[PDF {}]", v),
            None => "[PDF]".to_string(),
        })
    }
}

/// gzip with the deflate method byte.
pub struct Gzip;

impl FormatMatcher for Gzip {
    fn name(&self) -> &'static str {
        "GZIP"
    }

    fn probe(&self, prefix: &Prefix) -> Option<String> {
        prefix
            .starts_with(&GZIP_SIGNATURE)
            .then(|| "[GZIP]".to_string())
    }
}

/// ZIP local file header. Also matches jar, docx, apk and friends.
pub struct Zip;

impl FormatMatcher for Zip {
    fn name(&self) -> &'static str {
        "ZIP"
    }

    fn probe(&self, prefix: &Prefix) -> Option<String> {
        prefix
            .starts_with(&ZIP_SIGNATURE)
            .then(|| "[ZIP]".to_string())
    }
}

/// ELF object or executable, with its word size.
pub struct Elf;

impl FormatMatcher for Elf {
    fn name(&self) -> &'static str {
        "ELF"
    }

    fn probe(&self, prefix: &Prefix) -> Option<String> {
        if !prefix.starts_with(&ELF_SIGNATURE) {
            return None;
        }
        let label = match prefix.as_slice().get(4) {
            Some(1) => "[ELF 32-bit]",
            Some(2) => "[ELF 64-bit]",
            _ => "[ELF]",
        };
        Some(label.to_string())
    }
}
