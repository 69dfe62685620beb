use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::RgbImage;
use serde::Serialize;

use crate::image_pipeline::common::error::{AnalysisError, Result};

pub trait OverlayEncoder {
    fn encode(&self, image: &RgbImage) -> Result<EncodedOverlay>;
}

/// A base64 encoded PNG, ready to embed in a JSON document or a data URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EncodedOverlay(String);

impl EncodedOverlay {
    pub fn from_png_bytes(png: &[u8]) -> Self {
        Self(STANDARD.encode(png))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.0)
    }

    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.0)
            .map_err(|e| AnalysisError::DecodeError(format!("overlay payload: {e}")))
    }
}
