//! Image decode/encode helpers

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};

/// JPEG quality used when re-encoding composited tiles.
pub const JPEG_QUALITY: u8 = 90;

/// Sniffs the image format of `data` and returns its short tag.
///
/// JPEG is reported as `jpg`, PNG as `png`, and so on. Returns `None` when
/// the bytes are not a recognised image.
pub fn image_format_tag(data: &[u8]) -> Option<String> {
    let format = image::guess_format(data).ok()?;
    format.extensions_str().first().map(|ext| ext.to_string())
}

/// True for tags that select JPEG output.
pub fn is_jpeg_tag(tag: &str) -> bool {
    tag.eq_ignore_ascii_case("jpg") || tag.eq_ignore_ascii_case("jpeg")
}

/// Decodes `data` into RGBA8.
///
/// The format named by `tag` is tried first, then content sniffing. Returns
/// `None` for undecodable or zero-sized images.
pub fn decode_rgba(data: &[u8], tag: &str) -> Option<RgbaImage> {
    if data.is_empty() {
        return None;
    }

    let tagged = ImageFormat::from_extension(tag)
        .and_then(|format| image::load_from_memory_with_format(data, format).ok());
    let img = match tagged {
        Some(img) => img,
        None => image::load_from_memory(data).ok()?,
    };

    let rgba = img.to_rgba8();
    (rgba.width() > 0 && rgba.height() > 0).then_some(rgba)
}

/// Encodes `img` for the given format tag.
///
/// JPEG tags produce a quality-90 JPEG (alpha dropped); everything else
/// produces a lossless PNG. Returns the bytes and the tag they carry, or
/// `None` if encoding failed.
pub fn encode_rgba(img: &RgbaImage, tag: &str) -> Option<(Vec<u8>, String)> {
    let mut out = Cursor::new(Vec::new());

    if is_jpeg_tag(tag) {
        let rgb = DynamicImage::ImageRgba8(img.clone()).to_rgb8();
        let encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
        rgb.write_with_encoder(encoder).ok()?;
        Some((out.into_inner(), tag.to_ascii_lowercase()))
    } else {
        img.write_to(&mut out, ImageFormat::Png).ok()?;
        Some((out.into_inner(), "png".to_string()))
    }
}
