//! Image reader backed by the `image` crate decoders.

use image::RgbImage;
use tracing::debug;

use crate::image_pipeline::common::error::{AnalysisError, Result};
use crate::image_pipeline::decode::reader::ImageReader;

/// Reader for any format the enabled `image` codecs understand.
///
/// Alpha and 16-bit inputs are flattened to 8-bit RGB; the format is sniffed
/// from the content, never from a file extension.
pub struct StandardImageReader;

impl ImageReader for StandardImageReader {
    fn read_image(&self, data: &[u8]) -> Result<RgbImage> {
        debug!("Decoding image, {} bytes", data.len());

        let decoded =
            image::load_from_memory(data).map_err(|e| AnalysisError::DecodeError(e.to_string()))?;
        let rgb = decoded.to_rgb8();

        debug!("Decoded image: {}x{}", rgb.width(), rgb.height());
        Ok(rgb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};
    use std::io::Cursor;

    #[test]
    fn test_decodes_png() {
        let source = RgbImage::from_pixel(7, 3, Rgb([10, 200, 30]));
        let mut bytes = Vec::new();
        source
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let decoded = StandardImageReader.read_image(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (7, 3));
        assert_eq!(decoded.get_pixel(6, 2), &Rgb([10, 200, 30]));
    }

    #[test]
    fn test_rejects_garbage() {
        let result = StandardImageReader.read_image(b"definitely not an image");
        assert!(matches!(result, Err(AnalysisError::DecodeError(_))));
    }

    #[test]
    fn test_rejects_empty_input() {
        assert!(StandardImageReader.read_image(&[]).is_err());
    }
}
