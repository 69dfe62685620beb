//! Analysis configuration types

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_QUADRAT_AREA_M2: f64 = 0.25;
pub const DEFAULT_CARBON_DENSITY_G_PER_M2: f64 = 100.0;
pub const DEFAULT_MAX_SIDE: u32 = 1280;
pub const DEFAULT_GLINT_MEDIAN_SIZE: u32 = 5;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
}

/// Survey constants for the carbon estimate.
///
/// Construct through [`CarbonConfig::new`] or [`CarbonConfig::from_overrides`];
/// both guarantee that every field is finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CarbonConfig {
    quadrat_area_m2: f64,
    carbon_density_g_per_m2: f64,
}

impl Default for CarbonConfig {
    fn default() -> Self {
        Self {
            quadrat_area_m2: DEFAULT_QUADRAT_AREA_M2,
            carbon_density_g_per_m2: DEFAULT_CARBON_DENSITY_G_PER_M2,
        }
    }
}

impl CarbonConfig {
    pub fn new(quadrat_area_m2: f64, carbon_density_g_per_m2: f64) -> Result<Self, ConfigError> {
        check_positive("quadrat_area_m2", quadrat_area_m2)?;
        check_positive("carbon_density_g_per_m2", carbon_density_g_per_m2)?;
        Ok(Self {
            quadrat_area_m2,
            carbon_density_g_per_m2,
        })
    }

    /// Overlays the given overrides on the defaults and validates the result.
    pub fn try_from_overrides(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        Self::new(
            overrides.quadrat_area_m2.unwrap_or(DEFAULT_QUADRAT_AREA_M2),
            overrides
                .carbon_density_g_per_m2
                .unwrap_or(DEFAULT_CARBON_DENSITY_G_PER_M2),
        )
    }

    /// Like [`CarbonConfig::try_from_overrides`], but an override set that
    /// produces an invalid record is discarded as a whole.
    pub fn from_overrides(overrides: &ConfigOverrides) -> Self {
        Self::try_from_overrides(overrides).unwrap_or_default()
    }

    pub fn quadrat_area_m2(&self) -> f64 {
        self.quadrat_area_m2
    }

    pub fn carbon_density_g_per_m2(&self) -> f64 {
        self.carbon_density_g_per_m2
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

/// Optional fields read from an external configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigOverrides {
    #[serde(default)]
    pub quadrat_area_m2: Option<f64>,
    #[serde(default)]
    pub carbon_density_g_per_m2: Option<f64>,
}

/// Tunables for the image stages
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    /// Longest side allowed for the working raster
    pub max_side: u32,
    /// Whether to clip specular highlights before segmentation
    pub suppress_glints: bool,
    /// Side of the square median window used for glint suppression (odd)
    pub glint_median_size: u32,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_side: DEFAULT_MAX_SIDE,
            suppress_glints: true,
            glint_median_size: DEFAULT_GLINT_MEDIAN_SIZE,
        }
    }
}

impl PipelineOptions {
    pub fn builder() -> PipelineOptionsBuilder {
        PipelineOptionsBuilder::default()
    }
}

/// Builder for PipelineOptions
#[derive(Default)]
pub struct PipelineOptionsBuilder {
    max_side: Option<u32>,
    suppress_glints: Option<bool>,
    glint_median_size: Option<u32>,
}

impl PipelineOptionsBuilder {
    pub fn max_side(mut self, max_side: u32) -> Self {
        self.max_side = Some(max_side.max(1));
        self
    }

    pub fn suppress_glints(mut self, enable: bool) -> Self {
        self.suppress_glints = Some(enable);
        self
    }

    /// Even sizes are bumped to the next odd size.
    pub fn glint_median_size(mut self, size: u32) -> Self {
        self.glint_median_size = Some(size.max(1) | 1);
        self
    }

    pub fn build(self) -> PipelineOptions {
        let default = PipelineOptions::default();
        PipelineOptions {
            max_side: self.max_side.unwrap_or(default.max_side),
            suppress_glints: self.suppress_glints.unwrap_or(default.suppress_glints),
            glint_median_size: self.glint_median_size.unwrap_or(default.glint_median_size),
        }
    }
}
