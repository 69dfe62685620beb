//! Preprocessing: bound the working resolution, then clip specular highlights.

use image::{Rgb, RgbImage};
use imageproc::filter::median_filter;
use tracing::debug;

use crate::image_pipeline::color::HsvPlanes;
use crate::image_pipeline::config::PipelineOptions;

pub fn preprocess(image: RgbImage, options: &PipelineOptions) -> RgbImage {
    let bounded = downscale_to_bound(image, options.max_side);
    if options.suppress_glints {
        suppress_glints(&bounded, options.glint_median_size)
    } else {
        bounded
    }
}

/// Dimensions after shrinking so that the longest side is at most `max_side`.
///
/// Images already within the bound keep their size; they are never enlarged.
pub fn bounded_dimensions(width: u32, height: u32, max_side: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_side {
        return (width, height);
    }
    let scale = |side: u32| {
        ((u64::from(side) * u64::from(max_side)) / u64::from(longest)).max(1) as u32
    };
    (scale(width), scale(height))
}

pub fn downscale_to_bound(image: RgbImage, max_side: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    let (new_width, new_height) = bounded_dimensions(width, height, max_side);
    if (new_width, new_height) == (width, height) {
        return image;
    }

    debug!(width, height, new_width, new_height, "Downscaling oversized image");
    resize_area(&image, new_width, new_height)
}

/// Box resampling: every destination pixel is the mean of the source area it
/// covers, with partially covered source pixels weighted by their overlap.
pub fn resize_area(image: &RgbImage, new_width: u32, new_height: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    let columns = area_taps(width, new_width);
    let rows = area_taps(height, new_height);

    // horizontal pass, one f64 triple per (new_x, y)
    let mut horizontal = vec![[0.0f64; 3]; new_width as usize * height as usize];
    for y in 0..height {
        for (x, taps) in columns.iter().enumerate() {
            let acc = &mut horizontal[y as usize * new_width as usize + x];
            for &(sx, weight) in taps {
                let Rgb(px) = image.get_pixel(sx, y);
                for c in 0..3 {
                    acc[c] += weight * f64::from(px[c]);
                }
            }
        }
    }

    RgbImage::from_fn(new_width, new_height, |x, y| {
        let mut acc = [0.0f64; 3];
        for &(sy, weight) in &rows[y as usize] {
            let src = horizontal[sy as usize * new_width as usize + x as usize];
            for c in 0..3 {
                acc[c] += weight * src[c];
            }
        }
        Rgb(acc.map(|v| v.round().clamp(0.0, 255.0) as u8))
    })
}

/// Source indices and normalised weights for each destination index.
fn area_taps(src_len: u32, dst_len: u32) -> Vec<Vec<(u32, f64)>> {
    let scale = f64::from(src_len) / f64::from(dst_len);
    (0..dst_len)
        .map(|i| {
            let start = f64::from(i) * scale;
            let end = (start + scale).min(f64::from(src_len));
            let mut taps = Vec::new();
            let mut s = start.floor() as u32;
            while f64::from(s) < end && s < src_len {
                let overlap = end.min(f64::from(s) + 1.0) - start.max(f64::from(s));
                if overlap > 1e-9 {
                    taps.push((s, overlap / scale));
                }
                s += 1;
            }
            taps
        })
        .collect()
}

/// Replaces the value channel with `min(V, median(V))` over a square window.
///
/// Isolated highlights are pulled down to their neighbourhood while broad
/// brightness gradients pass through unchanged.
pub fn suppress_glints(image: &RgbImage, median_size: u32) -> RgbImage {
    let mut planes = HsvPlanes::from_rgb(image);
    let radius = median_size / 2;
    let smoothed = median_filter(&planes.value, radius, radius);

    let mut clipped = 0usize;
    for (v, m) in planes.value.pixels_mut().zip(smoothed.pixels()) {
        if m[0] < v[0] {
            v[0] = m[0];
            clipped += 1;
        }
    }
    debug!(clipped, "Glint suppression applied");

    planes.to_rgb()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_dimensions_keeps_small_images() {
        assert_eq!(bounded_dimensions(1280, 720, 1280), (1280, 720));
        assert_eq!(bounded_dimensions(100, 100, 1280), (100, 100));
    }

    #[test]
    fn test_bounded_dimensions_shrinks_longest_side_to_bound() {
        assert_eq!(bounded_dimensions(2560, 1440, 1280), (1280, 720));
        assert_eq!(bounded_dimensions(1000, 3000, 1280), (426, 1280));
        assert_eq!(bounded_dimensions(4000, 3, 1280), (1280, 1));
    }

    #[test]
    fn test_downscale_averages_blocks() {
        // 4x2 checker of black/white columns halves into mid grey
        let image = RgbImage::from_fn(4, 2, |x, _| {
            if x % 2 == 0 { Rgb([0, 0, 0]) } else { Rgb([200, 100, 50]) }
        });
        let resized = resize_area(&image, 2, 1);
        assert_eq!(resized.dimensions(), (2, 1));
        assert_eq!(resized.get_pixel(0, 0), &Rgb([100, 50, 25]));
        assert_eq!(resized.get_pixel(1, 0), &Rgb([100, 50, 25]));
    }

    #[test]
    fn test_downscale_fractional_ratio_preserves_flat_colour() {
        let image = RgbImage::from_pixel(30, 21, Rgb([12, 180, 90]));
        let resized = resize_area(&image, 13, 9);
        assert!(resized.pixels().all(|p| *p == Rgb([12, 180, 90])));
    }

    #[test]
    fn test_downscale_to_bound_passthrough() {
        let image = RgbImage::from_pixel(64, 32, Rgb([1, 2, 3]));
        let out = downscale_to_bound(image.clone(), 64);
        assert_eq!(out, image);
    }

    #[test]
    fn test_glint_is_clipped() {
        let mut image = RgbImage::from_pixel(9, 9, Rgb([30, 100, 40]));
        image.put_pixel(4, 4, Rgb([255, 255, 255]));

        let out = suppress_glints(&image, 5);
        let center = out.get_pixel(4, 4);
        assert!(center.0.iter().all(|&c| c <= 101), "{center:?}");
    }

    #[test]
    fn test_flat_image_survives_glint_suppression() {
        let image = RgbImage::from_pixel(12, 12, Rgb([40, 200, 60]));
        let out = suppress_glints(&image, 5);
        let first = *out.get_pixel(0, 0);
        assert!(out.pixels().all(|p| *p == first));
        for c in 0..3 {
            assert!((i32::from(first[c]) - i32::from(image.get_pixel(0, 0)[c])).abs() <= 2);
        }
    }

    #[test]
    fn test_preprocess_respects_options() {
        let image = RgbImage::from_pixel(300, 150, Rgb([250, 250, 250]));
        let options = PipelineOptions::builder()
            .max_side(100)
            .suppress_glints(false)
            .build();
        let out = preprocess(image, &options);
        assert_eq!(out.dimensions(), (100, 50));
        assert_eq!(out.get_pixel(10, 10), &Rgb([250, 250, 250]));
    }
}
