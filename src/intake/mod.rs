//! Image intake: type checking and decoding of user-supplied files.

use crate::constants::IMAGE_EXTENSIONS;
use crate::error::{Error, Result};
use image::{ImageFormat, RgbImage};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Bytes read from the start of a file to identify its format.
const SIGNATURE_LEN: u64 = 16;

/// Supported image encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// JPEG / JFIF.
    Jpeg,
    /// PNG.
    Png,
}

impl ImageKind {
    fn format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
        }
    }
}

impl std::fmt::Display for ImageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Jpeg => write!(f, "JPEG"),
            Self::Png => write!(f, "PNG"),
        }
    }
}

/// Check if a path has an accepted image extension.
pub fn has_image_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|accepted| ext.eq_ignore_ascii_case(accepted))
    })
}

/// Verify that a file is a JPEG or PNG by extension and by content signature.
///
/// Only the first few bytes are read; the image is not decoded.
pub fn check_image_path(path: &Path) -> Result<ImageKind> {
    ensure_image_extension(path)?;

    let mut header = Vec::with_capacity(SIGNATURE_LEN as usize);
    File::open(path)
        .and_then(|f| f.take(SIGNATURE_LEN).read_to_end(&mut header))
        .map_err(|e| Error::ImageRead {
            path: path.to_path_buf(),
            source: e,
        })?;

    sniff(path, &header)
}

fn ensure_image_extension(path: &Path) -> Result<()> {
    if has_image_extension(path) {
        return Ok(());
    }
    let found = path.extension().map_or_else(
        || "no file extension".to_string(),
        |ext| format!("'.{}' extension", ext.to_string_lossy()),
    );
    Err(Error::UnsupportedImageType {
        path: path.to_path_buf(),
        found,
    })
}

/// Identify the encoding from leading bytes.
fn sniff(path: &Path, header: &[u8]) -> Result<ImageKind> {
    match image::guess_format(header) {
        Ok(ImageFormat::Jpeg) => Ok(ImageKind::Jpeg),
        Ok(ImageFormat::Png) => Ok(ImageKind::Png),
        Ok(other) => Err(Error::UnsupportedImageType {
            path: path.to_path_buf(),
            found: format!("{other:?} content"),
        }),
        Err(_) => Err(Error::UnsupportedImageType {
            path: path.to_path_buf(),
            found: "unrecognized content".to_string(),
        }),
    }
}

/// Read, type-check and decode an image file into RGB.
///
/// The encoding is taken from the content, so a PNG named `.jpg` still decodes.
/// Alpha is dropped.
pub fn read_image(path: &Path) -> Result<RgbImage> {
    ensure_image_extension(path)?;

    let bytes = std::fs::read(path).map_err(|e| Error::ImageRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let kind = sniff(path, &bytes)?;

    let pixels = image::load_from_memory_with_format(&bytes, kind.format())
        .map_err(|e| Error::ImageDecode {
            path: path.to_path_buf(),
            source: e,
        })?
        .to_rgb8();

    debug!(
        "Decoded {} image {} ({}x{})",
        kind,
        path.display(),
        pixels.width(),
        pixels.height()
    );

    Ok(pixels)
}
