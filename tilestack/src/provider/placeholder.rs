//! Placeholder images
//!
//! Two kinds of shared, read-only image bytes live here: the "no tile"
//! image some servers send instead of an error (loaded once from disk at
//! startup), and a generated error tile that hosts can display when a
//! request fails.

use std::io::Cursor;
use std::path::Path;
use std::sync::OnceLock;

use bytes::Bytes;
use image::{ImageFormat, Rgba, RgbaImage};
use tracing::{info, warn};

/// Edge length of generated tiles in pixels.
pub const TILE_SIZE: u32 = 256;

/// Magenta, opaque: conspicuous on every basemap.
const ERROR_COLOR: Rgba<u8> = Rgba([255, 0, 255, 255]);

/// Reads a server's "no tile" image from `path`.
///
/// Returns `None` (and logs) if the file cannot be read or is empty, in
/// which case placeholder detection is disabled for that server.
pub fn load_no_tile_image(path: &Path) -> Option<Bytes> {
    match std::fs::read(path) {
        Ok(data) if !data.is_empty() => {
            info!(path = %path.display(), bytes = data.len(), "Loaded no-tile placeholder");
            Some(Bytes::from(data))
        }
        Ok(_) => {
            warn!(path = %path.display(), "No-tile placeholder file is empty");
            None
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read no-tile placeholder");
            None
        }
    }
}

/// A solid PNG tile shown in place of a tile that failed to load.
///
/// Generated on first use and shared for the life of the process.
pub fn error_tile() -> Bytes {
    static ERROR_TILE: OnceLock<Bytes> = OnceLock::new();
    ERROR_TILE
        .get_or_init(|| {
            let img = RgbaImage::from_pixel(TILE_SIZE, TILE_SIZE, ERROR_COLOR);
            let mut out = Cursor::new(Vec::new());
            match img.write_to(&mut out, ImageFormat::Png) {
                Ok(()) => Bytes::from(out.into_inner()),
                Err(e) => {
                    warn!(error = %e, "Failed to encode error tile");
                    Bytes::new()
                }
            }
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_error_tile_is_png_of_tile_size() {
        let tile = error_tile();
        let img = image::load_from_memory_with_format(&tile, ImageFormat::Png).unwrap();
        assert_eq!(img.width(), TILE_SIZE);
        assert_eq!(img.height(), TILE_SIZE);
        assert_eq!(img.to_rgba8().get_pixel(10, 10), &ERROR_COLOR);
    }

    #[test]
    fn test_error_tile_is_shared() {
        let a = error_tile();
        let b = error_tile();
        assert_eq!(a.as_ptr(), b.as_ptr());
    }

    #[test]
    fn test_load_no_tile_image() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[1, 2, 3]).unwrap();

        let loaded = load_no_tile_image(file.path()).unwrap();
        assert_eq!(loaded.as_ref(), &[1, 2, 3]);
    }

    #[test]
    fn test_load_missing_or_empty_file() {
        assert!(load_no_tile_image(Path::new("/nonexistent/no-tile.jpg")).is_none());

        let empty = tempfile::NamedTempFile::new().unwrap();
        assert!(load_no_tile_image(empty.path()).is_none());
    }
}
