//! Binary morphology with elliptical structuring elements.
//!
//! Opening and closing run through `imageproc`'s grayscale operators, which on
//! 0/255 masks are exactly the binary ones. Pixels outside the raster never
//! take part: erosion does not eat in from the border and dilation does not
//! grow in from it.

use image::{GrayImage, Luma};
use imageproc::morphology::{grayscale_close, grayscale_open, Mask};

use crate::image_pipeline::mask::ClassMask;

/// Ellipse inscribed in a `size`×`size` box, rasterised row by row with the
/// half-width of each row rounded to the nearest pixel.
pub fn ellipse_stencil(size: u8) -> GrayImage {
    let size = i32::from(size.max(1));
    let r = size / 2;
    let inv_r2 = if r > 0 { 1.0 / f64::from(r * r) } else { 0.0 };

    let mut stencil = GrayImage::new(size as u32, size as u32);
    for i in 0..size {
        let dy = i - r;
        let dx = (f64::from(r) * (f64::from(r * r - dy * dy) * inv_r2).sqrt()).round() as i32;
        for j in (r - dx).max(0)..(r + dx + 1).min(size) {
            stencil.put_pixel(j as u32, i as u32, Luma([255]));
        }
    }
    stencil
}

/// Structuring element anchored at the centre of its stencil.
pub fn ellipse(size: u8) -> Mask {
    let size = size.max(1);
    Mask::from_image(&ellipse_stencil(size), size / 2, size / 2)
}

/// Erosion followed by dilation; removes specks smaller than the element.
pub fn open(mask: &ClassMask, element: &Mask) -> ClassMask {
    ClassMask::from_binary(grayscale_open(mask.as_image(), element))
}

/// Dilation followed by erosion; fills gaps smaller than the element.
pub fn close(mask: &ClassMask, element: &Mask) -> ClassMask {
    ClassMask::from_binary(grayscale_close(mask.as_image(), element))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(stencil: &GrayImage) -> usize {
        stencil.pixels().filter(|p| p[0] != 0).count()
    }

    #[test]
    fn test_ellipse_shapes() {
        assert_eq!(cells(&ellipse_stencil(1)), 1);

        let three = ellipse_stencil(3);
        assert_eq!(cells(&three), 5);
        assert_eq!(three.get_pixel(0, 0)[0], 0);

        let five = ellipse_stencil(5);
        assert_eq!(cells(&five), 17);
        assert_eq!(five.get_pixel(2, 0)[0], 255);
        assert_eq!(five.get_pixel(1, 0)[0], 0);
        assert_eq!(five.get_pixel(0, 1)[0], 255);

        assert_eq!(cells(&ellipse_stencil(7)), 33);
    }

    #[test]
    fn test_opening_removes_speck() {
        let mut mask = ClassMask::empty(20, 20);
        mask.set(10, 10, true);
        mask.set(11, 10, true);
        assert_eq!(open(&mask, &ellipse(5)).count(), 0);
    }

    #[test]
    fn test_closing_fills_hole() {
        let mut mask = ClassMask::from_fn(20, 20, |_, _| true);
        mask.set(8, 8, false);
        mask.set(9, 8, false);
        assert_eq!(close(&mask, &ellipse(7)).count(), 400);
    }

    #[test]
    fn test_full_mask_is_stable_at_borders() {
        let mask = ClassMask::from_fn(15, 9, |_, _| true);
        let element = ellipse(7);
        assert_eq!(open(&mask, &element).count(), 135);
        assert_eq!(close(&mask, &element).count(), 135);
    }

    #[test]
    fn test_half_plane_is_preserved_by_open_and_close() {
        let mask = ClassMask::from_fn(40, 20, |x, _| x < 20);
        let element = ellipse(5);
        assert_eq!(open(&mask, &element), mask);
        assert_eq!(close(&mask, &element), mask);
    }

    #[test]
    fn test_open_keeps_blocks_larger_than_element() {
        // a 6x6 block survives a 5x5 ellipse opening; its corners do not
        let mask = ClassMask::from_fn(20, 20, |x, y| (5..11).contains(&x) && (5..11).contains(&y));
        let opened = open(&mask, &ellipse(5));
        assert!(opened.get(7, 7));
        assert!(opened.get(5, 8));
        assert!(!opened.get(5, 5));
        assert!(opened.count() < 36);
        assert_eq!(opened.difference(&mask).count(), 0);
    }

    #[test]
    fn test_results_stay_binary() {
        let mask = ClassMask::from_fn(31, 17, |x, y| (x * 7 + y * 3) % 5 < 2);
        let element = ellipse(3);
        for out in [open(&mask, &element), close(&mask, &element)] {
            assert!(out.as_image().pixels().all(|p| p[0] == 0 || p[0] == 255));
        }
    }
}
