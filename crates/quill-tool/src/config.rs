//! Tool settings, loadable from TOML

use quill_core::nurbs::MAX_DEGREE;
use quill_core::{QuillError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for the curve drawing tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Minimum world-space spacing between emitted edit points
    pub length: f64,
    /// Rays are not tested beyond this distance from the near plane
    pub max_ray_length: f64,
    /// Barycentric slack for ray/triangle tests
    pub hit_tolerance: f64,
    /// Degree of the built curve
    pub degree: usize,
    /// Uniform knot spacing; chord length otherwise
    pub uniform_param: bool,
    /// Delete the in-progress curve when the tool is deactivated mid-stroke
    pub discard_on_deactivate: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            length: 1.0,
            max_ray_length: 1000.0,
            hit_tolerance: 1e-5,
            degree: 3,
            uniform_param: true,
            discard_on_deactivate: true,
        }
    }
}

impl ToolConfig {
    /// Load settings from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("no tool config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        log::info!("tool config loaded from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        validate_length(self.length)?;
        if !(self.max_ray_length.is_finite() && self.max_ray_length > 0.0) {
            return Err(QuillError::ConfigError(format!(
                "max_ray_length must be positive, got {}",
                self.max_ray_length
            )));
        }
        if !(self.hit_tolerance.is_finite() && self.hit_tolerance >= 0.0) {
            return Err(QuillError::ConfigError(format!(
                "hit_tolerance must not be negative, got {}",
                self.hit_tolerance
            )));
        }
        if self.degree < 1 || self.degree > MAX_DEGREE {
            return Err(QuillError::ValueOutOfRange {
                field: "degree".into(),
                min: 1.0,
                max: MAX_DEGREE as f64,
                value: self.degree as f64,
            });
        }
        Ok(())
    }
}

/// Sample spacing must be finite and strictly positive
pub(crate) fn validate_length(length: f64) -> Result<()> {
    if length.is_finite() && length > 0.0 {
        Ok(())
    } else {
        Err(QuillError::ValueOutOfRange {
            field: "length".into(),
            min: f64::MIN_POSITIVE,
            max: f64::MAX,
            value: length,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ToolConfig::from_toml("length = 0.25\n").unwrap();
        assert_eq!(config.length, 0.25);
        assert_eq!(config.degree, 3);
        assert!(config.discard_on_deactivate);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(ToolConfig::from_toml("length = 0.0\n").is_err());
        assert!(ToolConfig::from_toml("length = -2.0\n").is_err());
        assert!(ToolConfig::from_toml("degree = 5\n").is_err());
        assert!(ToolConfig::from_toml("degree = 0\n").is_err());
        assert!(ToolConfig::from_toml("max_ray_length = 0.0\n").is_err());
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        assert!(ToolConfig::from_toml("length = [").is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = ToolConfig::load(Path::new("/nonexistent/quill-tool.toml")).unwrap();
        assert_eq!(config, ToolConfig::default());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = ToolConfig {
            length: 0.5,
            uniform_param: false,
            ..Default::default()
        };
        let parsed = ToolConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
