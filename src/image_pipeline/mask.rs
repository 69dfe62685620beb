//! Binary class masks.

use image::{GrayImage, Luma};

const ON: u8 = 255;

/// A binary raster stored as 0/255 luma so it can be inspected as an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMask(GrayImage);

impl ClassMask {
    pub fn empty(width: u32, height: u32) -> Self {
        Self(GrayImage::new(width, height))
    }

    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> bool,
    {
        Self(GrayImage::from_fn(width, height, |x, y| {
            Luma([if f(x, y) { ON } else { 0 }])
        }))
    }

    /// Wraps a raster whose pixels are already 0 or 255.
    pub(crate) fn from_binary(image: GrayImage) -> Self {
        debug_assert!(image.pixels().all(|p| p[0] == 0 || p[0] == ON));
        Self(image)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.0.get_pixel(x, y)[0] != 0
    }

    pub fn set(&mut self, x: u32, y: u32, on: bool) {
        self.0.put_pixel(x, y, Luma([if on { ON } else { 0 }]));
    }

    pub fn count(&self) -> usize {
        self.0.pixels().filter(|p| p[0] != 0).count()
    }

    pub fn intersection(&self, other: &ClassMask) -> ClassMask {
        self.zip_with(other, |a, b| a && b)
    }

    /// Pixels set here and not in `other`.
    pub fn difference(&self, other: &ClassMask) -> ClassMask {
        self.zip_with(other, |a, b| a && !b)
    }

    pub fn is_disjoint(&self, other: &ClassMask) -> bool {
        self.0
            .pixels()
            .zip(other.0.pixels())
            .all(|(a, b)| a[0] == 0 || b[0] == 0)
    }

    fn zip_with<F>(&self, other: &ClassMask, f: F) -> ClassMask
    where
        F: Fn(bool, bool) -> bool,
    {
        debug_assert_eq!(self.dimensions(), other.dimensions());
        let (width, height) = self.dimensions();
        ClassMask::from_fn(width, height, |x, y| f(self.get(x, y), other.get(x, y)))
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.0
    }
}
