//! Coverage percentages and the blue-carbon placeholder model.

use serde::Serialize;
use tracing::debug;

use crate::image_pipeline::common::error::{AnalysisError, Result};
use crate::image_pipeline::config::CarbonConfig;
use crate::image_pipeline::refine::RefinedMasks;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoverageMetrics {
    pub total_pixels: u64,
    pub seagrass_pixels: u64,
    pub sand_pixels: u64,
    /// Percent of the frame, rounded to two decimals.
    pub seagrass_pct: f64,
    /// Percent of the frame, rounded to two decimals.
    pub white_pct: f64,
    pub blue_carbon_g: f64,
}

/// Rounds half away from zero at the second decimal.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Carbon mass for a given coverage percentage.
///
/// Linear placeholder: `pct / 100 × quadrat area × carbon density`. Callers
/// pass the already rounded percentage, so the estimate carries the rounding.
pub fn blue_carbon_g(seagrass_pct: f64, config: &CarbonConfig) -> f64 {
    let cover_fraction = seagrass_pct / 100.0;
    cover_fraction * config.quadrat_area_m2() * config.carbon_density_g_per_m2()
}

pub fn from_counts(
    seagrass_pixels: u64,
    sand_pixels: u64,
    total_pixels: u64,
    config: &CarbonConfig,
) -> CoverageMetrics {
    let percent = |count: u64| round2(100.0 * count as f64 / total_pixels as f64);
    let seagrass_pct = percent(seagrass_pixels);
    let white_pct = percent(sand_pixels);

    CoverageMetrics {
        total_pixels,
        seagrass_pixels,
        sand_pixels,
        seagrass_pct,
        white_pct,
        blue_carbon_g: blue_carbon_g(seagrass_pct, config),
    }
}

pub fn estimate(masks: &RefinedMasks, config: &CarbonConfig) -> Result<CoverageMetrics> {
    let (width, height) = masks.dimensions();
    let total_pixels = u64::from(width) * u64::from(height);
    if total_pixels == 0 {
        return Err(AnalysisError::DegenerateInput { width, height });
    }

    let metrics = from_counts(
        masks.seagrass().count() as u64,
        masks.sand().count() as u64,
        total_pixels,
        config,
    );
    debug!(?metrics, "Coverage estimated");
    Ok(metrics)
}
