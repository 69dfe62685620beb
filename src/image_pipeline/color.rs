//! 8-bit HSV conversion.
//!
//! Hue is stored on a half-circle scale (0..180, two degrees per step) so that
//! it fits a byte; saturation and value span 0..=255. Ties for the dominant
//! channel resolve red first, then green.

use image::{GrayImage, Luma, Rgb, RgbImage};

/// Exclusive upper bound of the hue channel.
pub const HUE_RANGE: u8 = 180;

/// Converts one RGB pixel to `[hue, saturation, value]`.
pub fn rgb_to_hsv(pixel: Rgb<u8>) -> [u8; 3] {
    let [r, g, b] = pixel.0.map(i32::from);
    let value = r.max(g).max(b);
    let diff = value - r.min(g).min(b);

    let saturation = if value == 0 {
        0
    } else {
        round_half_up(255.0 * f64::from(diff) / f64::from(value))
    };

    let hue = if diff == 0 {
        0
    } else {
        let sector = if value == r {
            g - b
        } else if value == g {
            b - r + 2 * diff
        } else {
            r - g + 4 * diff
        };
        let hue = round_half_up(30.0 * f64::from(sector) / f64::from(diff));
        if hue < 0 { hue + i32::from(HUE_RANGE) } else { hue }
    };

    [hue as u8, saturation as u8, value as u8]
}

/// Inverse of [`rgb_to_hsv`], up to 8-bit quantisation.
pub fn hsv_to_rgb(hsv: [u8; 3]) -> Rgb<u8> {
    let saturation = f64::from(hsv[1]) / 255.0;
    let value = f64::from(hsv[2]) / 255.0;

    if hsv[1] == 0 {
        let v = to_channel(value);
        return Rgb([v, v, v]);
    }

    let scaled = (f64::from(hsv[0]) * 2.0 / 60.0).rem_euclid(6.0);
    let sector = scaled.floor();
    let fraction = scaled - sector;

    let p = value * (1.0 - saturation);
    let q = value * (1.0 - saturation * fraction);
    let t = value * (1.0 - saturation * (1.0 - fraction));

    let (r, g, b) = match sector as u8 {
        0 => (value, t, p),
        1 => (q, value, p),
        2 => (p, value, t),
        3 => (p, q, value),
        4 => (t, p, value),
        _ => (value, p, q),
    };
    Rgb([to_channel(r), to_channel(g), to_channel(b)])
}

fn round_half_up(x: f64) -> i32 {
    (x + 0.5).floor() as i32
}

fn to_channel(x: f64) -> u8 {
    (x * 255.0).round().clamp(0.0, 255.0) as u8
}

/// An image split into its hue, saturation and value planes.
#[derive(Debug, Clone)]
pub struct HsvPlanes {
    pub hue: GrayImage,
    pub saturation: GrayImage,
    pub value: GrayImage,
}

impl HsvPlanes {
    pub fn from_rgb(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let mut hue = GrayImage::new(width, height);
        let mut saturation = GrayImage::new(width, height);
        let mut value = GrayImage::new(width, height);

        for (x, y, pixel) in image.enumerate_pixels() {
            let [h, s, v] = rgb_to_hsv(*pixel);
            hue.put_pixel(x, y, Luma([h]));
            saturation.put_pixel(x, y, Luma([s]));
            value.put_pixel(x, y, Luma([v]));
        }

        Self {
            hue,
            saturation,
            value,
        }
    }

    pub fn to_rgb(&self) -> RgbImage {
        let (width, height) = self.dimensions();
        RgbImage::from_fn(width, height, |x, y| hsv_to_rgb(self.get(x, y)))
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.value.dimensions()
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        [
            self.hue.get_pixel(x, y)[0],
            self.saturation.get_pixel(x, y)[0],
            self.value.get_pixel(x, y)[0],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primaries() {
        assert_eq!(rgb_to_hsv(Rgb([255, 0, 0])), [0, 255, 255]);
        assert_eq!(rgb_to_hsv(Rgb([0, 255, 0])), [60, 255, 255]);
        assert_eq!(rgb_to_hsv(Rgb([0, 0, 255])), [120, 255, 255]);
    }

    #[test]
    fn test_greys_have_no_hue_or_saturation() {
        assert_eq!(rgb_to_hsv(Rgb([255, 255, 255])), [0, 0, 255]);
        assert_eq!(rgb_to_hsv(Rgb([0, 0, 0])), [0, 0, 0]);
        assert_eq!(rgb_to_hsv(Rgb([90, 90, 90])), [0, 0, 90]);
    }

    #[test]
    fn test_hue_stays_below_range() {
        // magenta-red side wraps around instead of going negative
        let [h, _, _] = rgb_to_hsv(Rgb([255, 0, 10]));
        assert!(h < HUE_RANGE);
        assert!(h > 170);
    }

    #[test]
    fn test_seagrass_green() {
        let [h, s, v] = rgb_to_hsv(Rgb([40, 200, 60]));
        assert_eq!(h, 64);
        assert_eq!(s, 204);
        assert_eq!(v, 200);
    }

    #[test]
    fn test_round_trip_is_close() {
        for rgb in [[40, 200, 60], [120, 255, 0], [10, 20, 200], [250, 240, 230], [3, 3, 3]] {
            let back = hsv_to_rgb(rgb_to_hsv(Rgb(rgb)));
            for c in 0..3 {
                let delta = (i32::from(back[c]) - i32::from(rgb[c])).abs();
                assert!(delta <= 4, "{rgb:?} -> {back:?}");
            }
        }
    }

    #[test]
    fn test_planes_round_trip_dimensions() {
        let image = RgbImage::from_pixel(4, 2, Rgb([40, 200, 60]));
        let planes = HsvPlanes::from_rgb(&image);
        assert_eq!(planes.dimensions(), (4, 2));
        assert_eq!(planes.get(3, 1), [64, 204, 200]);
        assert_eq!(planes.to_rgb().dimensions(), (4, 2));
    }
}
