use std::io::Cursor;

use image::{ImageFormat, RgbImage};
use tracing::debug;

use crate::image_pipeline::common::error::{AnalysisError, Result};
use crate::image_pipeline::render::encoder::{EncodedOverlay, OverlayEncoder};

/// Lossless PNG wrapped in standard base64.
pub struct PngBase64Encoder;

impl OverlayEncoder for PngBase64Encoder {
    fn encode(&self, image: &RgbImage) -> Result<EncodedOverlay> {
        debug!("Encoding overlay: {}x{}", image.width(), image.height());

        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| AnalysisError::EncodeError(e.to_string()))?;

        debug!("PNG overlay: {} bytes", png.len());
        Ok(EncodedOverlay::from_png_bytes(&png))
    }
}
