//! Source-over alpha blending

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::layer::clamp_opacity;

/// Blends `overlay` over `base` at `opacity` and returns the result.
///
/// Either image being empty makes this the identity on the other one, so
/// blends can be folded safely. Opacity is clamped to `[0, 1]`; at 0 the
/// base comes back unchanged. An overlay of a different size is stretched
/// to the base dimensions first.
pub fn composite_images(base: &RgbaImage, overlay: &RgbaImage, opacity: f64) -> RgbaImage {
    if is_empty(base) {
        return overlay.clone();
    }
    if is_empty(overlay) {
        return base.clone();
    }

    let opacity = clamp_opacity(opacity);
    if opacity == 0.0 {
        return base.clone();
    }

    let resized;
    let overlay = if overlay.dimensions() != base.dimensions() {
        resized = resize_to(overlay, base.width(), base.height());
        &resized
    } else {
        overlay
    };

    let mut out = base.clone();
    for (dst, src) in out.pixels_mut().zip(overlay.pixels()) {
        let sa = f64::from(src[3]) / 255.0 * opacity;
        let da = f64::from(dst[3]) / 255.0;
        let oa = sa + da * (1.0 - sa);

        if oa <= 0.0 {
            dst.0 = [0, 0, 0, 0];
            continue;
        }

        for c in 0..3 {
            let sc = f64::from(src[c]);
            let dc = f64::from(dst[c]);
            dst[c] = to_channel((sc * sa + dc * da * (1.0 - sa)) / oa);
        }
        dst[3] = to_channel(oa * 255.0);
    }
    out
}

/// Stretches `img` to `width` x `height`, ignoring aspect ratio.
pub(crate) fn resize_to(img: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    imageops::resize(img, width, height, FilterType::CatmullRom)
}

fn is_empty(img: &RgbaImage) -> bool {
    img.width() == 0 || img.height() == 0
}

fn to_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
