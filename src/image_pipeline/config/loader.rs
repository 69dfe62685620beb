//! Resolution of [`CarbonConfig`] from an external JSON file.
//!
//! Nothing here returns an error: every failure to locate, read or parse the
//! file yields [`CarbonConfig::default`].

use std::path::Path;

use tracing::{debug, warn};

use crate::image_pipeline::config::types::{CarbonConfig, ConfigOverrides};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

pub fn load_or_default<P: AsRef<Path>>(path: P) -> CarbonConfig {
    let path = path.as_ref();

    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No configuration file, using defaults");
            return CarbonConfig::default();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Unreadable configuration, using defaults");
            return CarbonConfig::default();
        }
    };

    parse_or_default(&text)
}

pub fn parse_or_default(text: &str) -> CarbonConfig {
    let overrides: ConfigOverrides = match serde_json::from_str(text) {
        Ok(overrides) => overrides,
        Err(e) => {
            warn!(error = %e, "Malformed configuration, using defaults");
            return CarbonConfig::default();
        }
    };

    let config = match CarbonConfig::try_from_overrides(&overrides) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "Configuration values out of range, using defaults");
            return CarbonConfig::default();
        }
    };

    debug!(
        quadrat_area_m2 = config.quadrat_area_m2(),
        carbon_density_g_per_m2 = config.carbon_density_g_per_m2(),
        "Configuration resolved"
    );
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_or_default(dir.path().join("absent.json"));
        assert_eq!(config, CarbonConfig::default());
    }

    #[test]
    fn test_file_overrides_are_applied() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"quadrat_area_m2": 1.0, "carbon_density_g_per_m2": 80.0}}"#).unwrap();

        let config = load_or_default(file.path());
        assert_eq!(config.quadrat_area_m2(), 1.0);
        assert_eq!(config.carbon_density_g_per_m2(), 80.0);
    }

    #[test]
    fn test_corrupted_file_yields_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert_eq!(load_or_default(file.path()), CarbonConfig::default());
    }

    #[test]
    fn test_wrong_types_yield_defaults() {
        assert_eq!(
            parse_or_default(r#"{"quadrat_area_m2": "large"}"#),
            CarbonConfig::default()
        );
        assert_eq!(parse_or_default("42"), CarbonConfig::default());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let config = parse_or_default(r#"{"carbon_density_g_per_m2": 120.0, "site": "bay"}"#);
        assert_eq!(config.quadrat_area_m2(), 0.25);
        assert_eq!(config.carbon_density_g_per_m2(), 120.0);
    }

    #[test]
    fn test_negative_values_yield_defaults() {
        assert_eq!(
            parse_or_default(r#"{"quadrat_area_m2": -0.5}"#),
            CarbonConfig::default()
        );
    }
}
