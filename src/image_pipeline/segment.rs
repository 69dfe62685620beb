//! Colour-range segmentation into seagrass and sand candidates.
//!
//! Both tests run on every pixel independently. A pixel can pass both (the
//! refiner settles it) or neither, in which case it belongs to no mask.

use tracing::debug;

use crate::image_pipeline::color::HsvPlanes;
use crate::image_pipeline::mask::ClassMask;

/// Inclusive per-channel bounds in 8-bit HSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    #[inline]
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| self.lower[c] <= hsv[c] && hsv[c] <= self.upper[c])
    }

    pub fn mask(&self, planes: &HsvPlanes) -> ClassMask {
        let (width, height) = planes.dimensions();
        ClassMask::from_fn(width, height, |x, y| self.contains(planes.get(x, y)))
    }
}

/// Green band with enough saturation and brightness to be vegetation.
pub const SEAGRASS_RANGE: HsvRange = HsvRange::new([35, 50, 35], [95, 255, 255]);

/// Washed-out bright pixels of any hue.
pub const SAND_RANGE: HsvRange = HsvRange::new([0, 0, 185], [180, 60, 255]);

/// Raw per-class masks straight out of the colour tests.
#[derive(Debug, Clone)]
pub struct CandidateMasks {
    pub seagrass: ClassMask,
    pub sand: ClassMask,
}

pub fn segment(planes: &HsvPlanes) -> CandidateMasks {
    let seagrass = SEAGRASS_RANGE.mask(planes);
    let sand = SAND_RANGE.mask(planes);

    debug!(
        seagrass = seagrass.count(),
        sand = sand.count(),
        "Candidate pixels"
    );
    CandidateMasks { seagrass, sand }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::color::rgb_to_hsv;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_seagrass_bounds_are_inclusive() {
        assert!(SEAGRASS_RANGE.contains([35, 50, 35]));
        assert!(SEAGRASS_RANGE.contains([95, 255, 255]));
        assert!(!SEAGRASS_RANGE.contains([34, 200, 200]));
        assert!(!SEAGRASS_RANGE.contains([96, 200, 200]));
        assert!(!SEAGRASS_RANGE.contains([60, 49, 200]));
        assert!(!SEAGRASS_RANGE.contains([60, 200, 34]));
    }

    #[test]
    fn test_sand_ignores_hue() {
        assert!(SAND_RANGE.contains([0, 0, 255]));
        assert!(SAND_RANGE.contains([170, 60, 185]));
        assert!(!SAND_RANGE.contains([10, 61, 255]));
        assert!(!SAND_RANGE.contains([10, 10, 184]));
    }

    #[test]
    fn test_typical_colours() {
        assert!(SEAGRASS_RANGE.contains(rgb_to_hsv(Rgb([40, 200, 60]))));
        assert!(!SAND_RANGE.contains(rgb_to_hsv(Rgb([40, 200, 60]))));
        assert!(SAND_RANGE.contains(rgb_to_hsv(Rgb([235, 230, 220]))));
        assert!(!SEAGRASS_RANGE.contains(rgb_to_hsv(Rgb([235, 230, 220]))));
        // deep water blue is neither
        let blue = rgb_to_hsv(Rgb([20, 60, 140]));
        assert!(!SEAGRASS_RANGE.contains(blue));
        assert!(!SAND_RANGE.contains(blue));
    }

    #[test]
    fn test_pale_green_can_match_both() {
        // bright, faintly green: passes both tests before refinement
        let hsv = rgb_to_hsv(Rgb([200, 250, 200]));
        assert!(SEAGRASS_RANGE.contains(hsv));
        assert!(SAND_RANGE.contains(hsv));
    }

    #[test]
    fn test_segment_masks() {
        let image = RgbImage::from_fn(10, 4, |x, _| {
            if x < 5 { Rgb([40, 200, 60]) } else { Rgb([255, 255, 255]) }
        });
        let masks = segment(&HsvPlanes::from_rgb(&image));
        assert_eq!(masks.seagrass.count(), 20);
        assert_eq!(masks.sand.count(), 20);
        assert!(masks.seagrass.is_disjoint(&masks.sand));
    }
}
