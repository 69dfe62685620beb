use std::path::{Path, PathBuf};

use image::RgbImage;
use serde::Serialize;
use tracing::debug;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::metrics::{round2, CoverageMetrics};
use crate::image_pipeline::refine::RefinedMasks;
use crate::image_pipeline::render::EncodedOverlay;

/// Outcome of one analysis call.
///
/// Serialises with the field names the upload page reads:
/// `seagrass_pct`, `white_pct`, `blue_carbon_g`, `overlay_seagrass_b64`,
/// `overlay_white_b64`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    seagrass_pct: f64,
    white_pct: f64,
    blue_carbon_g: f64,
    #[serde(rename = "overlay_seagrass_b64")]
    overlay_seagrass: EncodedOverlay,
    #[serde(rename = "overlay_white_b64")]
    overlay_white: EncodedOverlay,
}

impl AnalysisResult {
    pub fn new(
        metrics: &CoverageMetrics,
        overlay_seagrass: EncodedOverlay,
        overlay_white: EncodedOverlay,
    ) -> Self {
        Self {
            seagrass_pct: metrics.seagrass_pct,
            white_pct: metrics.white_pct,
            blue_carbon_g: metrics.blue_carbon_g,
            overlay_seagrass,
            overlay_white,
        }
    }

    pub fn seagrass_pct(&self) -> f64 {
        self.seagrass_pct
    }

    pub fn white_pct(&self) -> f64 {
        self.white_pct
    }

    /// Share of the frame in neither class.
    pub fn other_pct(&self) -> f64 {
        round2((100.0 - self.seagrass_pct - self.white_pct).max(0.0))
    }

    pub fn blue_carbon_g(&self) -> f64 {
        self.blue_carbon_g
    }

    pub fn overlay_seagrass(&self) -> &EncodedOverlay {
        &self.overlay_seagrass
    }

    pub fn overlay_white(&self) -> &EncodedOverlay {
        &self.overlay_white
    }

    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            seagrass_pct: self.seagrass_pct,
            white_pct: self.white_pct,
            other_pct: self.other_pct(),
            blue_carbon_g: self.blue_carbon_g,
        }
    }

    /// Writes both overlays as `<stem>_seagrass.png` and `<stem>_white.png`
    /// under `dir` and returns their paths.
    pub fn write_overlays(&self, dir: &Path, stem: &str) -> Result<(PathBuf, PathBuf)> {
        let seagrass_path = dir.join(format!("{stem}_seagrass.png"));
        let white_path = dir.join(format!("{stem}_white.png"));

        std::fs::write(&seagrass_path, self.overlay_seagrass.to_png_bytes()?)?;
        std::fs::write(&white_path, self.overlay_white.to_png_bytes()?)?;

        debug!(
            seagrass = %seagrass_path.display(),
            white = %white_path.display(),
            "Overlays written"
        );
        Ok((seagrass_path, white_path))
    }
}

/// The numeric part of an [`AnalysisResult`], without overlay payloads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub seagrass_pct: f64,
    pub white_pct: f64,
    pub other_pct: f64,
    pub blue_carbon_g: f64,
}

/// Output of the first three stages: the working raster and its class masks.
#[derive(Debug, Clone)]
pub struct Classification {
    pub working: RgbImage,
    pub masks: RefinedMasks,
}
