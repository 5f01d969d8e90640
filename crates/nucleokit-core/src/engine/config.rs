use crate::core::assembly::ChainRecompute;
use nalgebra::Point2;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Drawing area the components live on.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
    /// Edge length of the square each component occupies.
    pub component_size: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            component_size: 60.0,
        }
    }
}

impl CanvasConfig {
    /// Whether a component centered at `center` sticks out of the canvas on any side.
    pub fn is_outside(&self, center: &Point2<f64>) -> bool {
        let half = self.component_size / 2.0;
        let left = center.x - half;
        let top = center.y - half;
        left < 0.0
            || top < 0.0
            || left > self.width - self.component_size
            || top > self.height - self.component_size
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct EngineConfig {
    pub canvas: CanvasConfig,
    /// Center distance below which a finished drag tries to connect two components.
    pub auto_assembly_threshold: f64,
    /// Multiplier applied to rotation deltas while fine tuning.
    pub fine_tune_factor: f64,
    pub notice_ttl_ms: u64,
    pub chain_recompute: ChainRecompute,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            auto_assembly_threshold: 50.0,
            fine_tune_factor: 0.3,
            notice_ttl_ms: 3000,
            chain_recompute: ChainRecompute::default(),
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }

    /// Reads a configuration file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Toml {
            path: "<inline>".to_string(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidParameter {
                    name,
                    reason: format!("must be a positive number, got {}", value),
                })
            }
        }

        positive("canvas.width", self.canvas.width)?;
        positive("canvas.height", self.canvas.height)?;
        positive("canvas.component-size", self.canvas.component_size)?;
        if self.canvas.component_size > self.canvas.width.min(self.canvas.height) {
            return Err(ConfigError::InvalidParameter {
                name: "canvas.component-size",
                reason: "must fit inside the canvas".to_string(),
            });
        }
        positive("auto-assembly-threshold", self.auto_assembly_threshold)?;
        positive("fine-tune-factor", self.fine_tune_factor)?;
        if self.fine_tune_factor > 1.0 {
            return Err(ConfigError::InvalidParameter {
                name: "fine-tune-factor",
                reason: format!("must not exceed 1.0, got {}", self.fine_tune_factor),
            });
        }
        if self.notice_ttl_ms == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "notice-ttl-ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct EngineConfigBuilder {
    canvas_width: Option<f64>,
    canvas_height: Option<f64>,
    component_size: Option<f64>,
    auto_assembly_threshold: Option<f64>,
    fine_tune_factor: Option<f64>,
    notice_ttl_ms: Option<u64>,
    chain_recompute: Option<ChainRecompute>,
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn canvas_size(mut self, width: f64, height: f64) -> Self {
        self.canvas_width = Some(width);
        self.canvas_height = Some(height);
        self
    }
    pub fn component_size(mut self, size: f64) -> Self {
        self.component_size = Some(size);
        self
    }
    pub fn auto_assembly_threshold(mut self, threshold: f64) -> Self {
        self.auto_assembly_threshold = Some(threshold);
        self
    }
    pub fn fine_tune_factor(mut self, factor: f64) -> Self {
        self.fine_tune_factor = Some(factor);
        self
    }
    pub fn notice_ttl_ms(mut self, ttl: u64) -> Self {
        self.notice_ttl_ms = Some(ttl);
        self
    }
    pub fn chain_recompute(mut self, policy: ChainRecompute) -> Self {
        self.chain_recompute = Some(policy);
        self
    }

    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        let defaults = EngineConfig::default();
        let config = EngineConfig {
            canvas: CanvasConfig {
                width: self.canvas_width.unwrap_or(defaults.canvas.width),
                height: self.canvas_height.unwrap_or(defaults.canvas.height),
                component_size: self
                    .component_size
                    .unwrap_or(defaults.canvas.component_size),
            },
            auto_assembly_threshold: self
                .auto_assembly_threshold
                .unwrap_or(defaults.auto_assembly_threshold),
            fine_tune_factor: self.fine_tune_factor.unwrap_or(defaults.fine_tune_factor),
            notice_ttl_ms: self.notice_ttl_ms.unwrap_or(defaults.notice_ttl_ms),
            chain_recompute: self.chain_recompute.unwrap_or(defaults.chain_recompute),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_simulator_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.canvas.width, 800.0);
        assert_eq!(config.canvas.height, 600.0);
        assert_eq!(config.canvas.component_size, 60.0);
        assert_eq!(config.auto_assembly_threshold, 50.0);
        assert_eq!(config.fine_tune_factor, 0.3);
        assert_eq!(config.notice_ttl(), Duration::from_secs(3));
        assert_eq!(config.chain_recompute, ChainRecompute::Traverse);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn is_outside_uses_component_footprint() {
        let canvas = CanvasConfig::default();
        assert!(!canvas.is_outside(&Point2::new(30.0, 30.0)));
        assert!(!canvas.is_outside(&Point2::new(770.0, 570.0)));
        assert!(canvas.is_outside(&Point2::new(29.0, 300.0)));
        assert!(canvas.is_outside(&Point2::new(400.0, 571.0)));
        assert!(canvas.is_outside(&Point2::new(771.0, 300.0)));
        assert!(canvas.is_outside(&Point2::new(400.0, -10.0)));
    }

    #[test]
    fn builder_fills_unset_fields_with_defaults() {
        let config = EngineConfig::builder()
            .auto_assembly_threshold(75.0)
            .chain_recompute(ChainRecompute::TrustMembership)
            .build()
            .unwrap();
        assert_eq!(config.auto_assembly_threshold, 75.0);
        assert_eq!(config.chain_recompute, ChainRecompute::TrustMembership);
        assert_eq!(config.canvas, CanvasConfig::default());
    }

    #[test]
    fn builder_rejects_invalid_values() {
        let result = EngineConfig::builder().fine_tune_factor(1.5).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "fine-tune-factor",
                ..
            })
        ));

        let result = EngineConfig::builder().canvas_size(-1.0, 600.0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "canvas.width",
                ..
            })
        ));

        let result = EngineConfig::builder().notice_ttl_ms(0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "notice-ttl-ms",
                ..
            })
        ));
    }

    #[test]
    fn from_toml_str_reads_partial_document() {
        let config = EngineConfig::from_toml_str(
            r#"
            auto-assembly-threshold = 40.0
            chain-recompute = "trust-membership"

            [canvas]
            width = 1024
            "#,
        );
        let config = config.unwrap();
        assert_eq!(config.auto_assembly_threshold, 40.0);
        assert_eq!(config.chain_recompute, ChainRecompute::TrustMembership);
        assert_eq!(config.canvas.width, 1024.0);
        assert_eq!(config.canvas.height, 600.0);
    }

    #[test]
    fn from_toml_str_rejects_unknown_keys() {
        let result = EngineConfig::from_toml_str("snap-distance = 10.0");
        assert!(matches!(result, Err(ConfigError::Toml { .. })));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        fs::write(&path, "fine-tune-factor = 0.5\nnotice-ttl-ms = 1500\n").unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.fine_tune_factor, 0.5);
        assert_eq!(config.notice_ttl(), Duration::from_millis(1500));
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let result = EngineConfig::load(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn load_fails_for_malformed_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "this is not toml").unwrap();
        assert!(matches!(
            EngineConfig::load(&path),
            Err(ConfigError::Toml { .. })
        ));
    }

    #[test]
    fn load_validates_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");
        fs::write(&path, "auto-assembly-threshold = -5.0\n").unwrap();
        assert!(matches!(
            EngineConfig::load(&path),
            Err(ConfigError::InvalidParameter { .. })
        ));
    }
}
