//! Configuration module
//!
//! Survey constants for the carbon model, tunables for the image stages and
//! the JSON file loader that resolves them with fallback to defaults.

pub mod loader;
pub mod types;

pub use loader::{load_or_default, parse_or_default, DEFAULT_CONFIG_PATH};
pub use types::{
    CarbonConfig, ConfigError, ConfigOverrides, PipelineOptions, PipelineOptionsBuilder,
    DEFAULT_CARBON_DENSITY_G_PER_M2, DEFAULT_GLINT_MEDIAN_SIZE, DEFAULT_MAX_SIDE,
    DEFAULT_QUADRAT_AREA_M2,
};
