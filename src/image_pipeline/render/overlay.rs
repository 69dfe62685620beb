use image::{Rgb, RgbImage};

use crate::image_pipeline::mask::ClassMask;

/// Fill colour and opacity of a translucent mask overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub fill: Rgb<u8>,
    /// Weight of the fill colour, clamped to `[0, 1]` when compositing.
    pub opacity: f32,
}

pub const SEAGRASS_OVERLAY: OverlayStyle = OverlayStyle {
    fill: Rgb([120, 255, 0]),
    opacity: 0.45,
};

pub const SAND_OVERLAY: OverlayStyle = OverlayStyle {
    fill: Rgb([255, 255, 255]),
    opacity: 0.35,
};

/// Blends `style.fill` into every masked pixel; unmasked pixels are copied.
pub fn composite(image: &RgbImage, mask: &ClassMask, style: OverlayStyle) -> RgbImage {
    let alpha = style.opacity.clamp(0.0, 1.0);
    let fill = style.fill.0.map(f32::from);

    let mut out = image.clone();
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        if !mask.get(x, y) {
            continue;
        }
        for c in 0..3 {
            let blended = alpha * fill[c] + (1.0 - alpha) * f32::from(pixel[c]);
            pixel[c] = blended.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}
