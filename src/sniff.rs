//! File format detection by magic signature.
//!
//! Input files are classified by their leading bytes, never by their
//! extension — a `.png` file holding JPEG data is a JPEG here. The table of
//! signatures is fixed: framekit detects exactly five formats and treats
//! everything else as "not an image".
//!
//! Detection is deliberately infallible: a missing file, a permission error,
//! or a file shorter than a signature all classify as unknown (`None`).
//! Sniffing must never abort a batch run.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// An image format recognized by its magic signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectedFormat {
    Png,
    Jpeg,
    Tiff,
    Bmp,
    WebP,
}

impl DetectedFormat {
    /// The `image` crate format used to decode files of this type.
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            DetectedFormat::Png => image::ImageFormat::Png,
            DetectedFormat::Jpeg => image::ImageFormat::Jpeg,
            DetectedFormat::Tiff => image::ImageFormat::Tiff,
            DetectedFormat::Bmp => image::ImageFormat::Bmp,
            DetectedFormat::WebP => image::ImageFormat::WebP,
        }
    }

    /// Lossy source formats are re-encoded to the lossless default (PNG)
    /// on output rather than being recompressed in their own container.
    pub fn is_lossy(self) -> bool {
        matches!(self, DetectedFormat::Jpeg | DetectedFormat::WebP)
    }
}

impl std::fmt::Display for DetectedFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DetectedFormat::Png => "png",
            DetectedFormat::Jpeg => "jpeg",
            DetectedFormat::Tiff => "tiff",
            DetectedFormat::Bmp => "bmp",
            DetectedFormat::WebP => "webp",
        };
        f.write_str(name)
    }
}

/// Ordered (signature, format) table. First match wins.
///
/// The RIFF entry is a container prefix, not a full WebP signature; it needs
/// the secondary `WEBP` marker check at offset 8 (see [`Sniffer::detect_bytes`]).
const SIGNATURES: &[(&[u8], DetectedFormat)] = &[
    (b"\x89PNG\r\n\x1a\n", DetectedFormat::Png),
    (b"\xFF\xD8\xFF", DetectedFormat::Jpeg),
    (b"II*\x00", DetectedFormat::Tiff),
    (b"MM\x00*", DetectedFormat::Tiff),
    (b"BM", DetectedFormat::Bmp),
    (b"RIFF", DetectedFormat::WebP),
];

/// Longest prefix any signature check needs: RIFF (4) + size (4) + `WEBP` (4).
const PREFIX_LEN: usize = 12;

/// Magic-signature matcher over a fixed, ordered table.
pub struct Sniffer {
    table: &'static [(&'static [u8], DetectedFormat)],
}

impl Sniffer {
    pub fn new() -> Self {
        Self { table: SIGNATURES }
    }

    /// Classify a file by its first bytes. Returns `None` for any file that
    /// matches no signature or cannot be read.
    pub fn detect(&self, path: &Path) -> Option<DetectedFormat> {
        let mut file = File::open(path).ok()?;
        let mut header = [0u8; PREFIX_LEN];
        let mut filled = 0;
        while filled < header.len() {
            match file.read(&mut header[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(_) => return None,
            }
        }
        self.detect_bytes(&header[..filled])
    }

    /// Classify a byte prefix against the signature table, in table order.
    ///
    /// A `RIFF` prefix whose bytes 8–11 are not `WEBP` is not a WebP file;
    /// matching continues with the remaining table entries rather than
    /// failing outright.
    pub fn detect_bytes(&self, header: &[u8]) -> Option<DetectedFormat> {
        for &(magic, format) in self.table {
            if !header.starts_with(magic) {
                continue;
            }
            if format == DetectedFormat::WebP && header.get(8..12) != Some(b"WEBP".as_slice()) {
                continue;
            }
            return Some(format);
        }
        None
    }
}

impl Default for Sniffer {
    fn default() -> Self {
        Self::new()
    }
}
