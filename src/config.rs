//! Pipeline configuration and anthropometric inputs.
//!
//! Defaults reproduce the reference measurement setup: a 4-sample baseline
//! window, 3-window BPM smoothing, 10 second measurement windows and a
//! plausible heart-rate range of 30..=180 BPM.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tuning knobs for the PPG pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalsConfig {
    /// Circular buffer size for the red-channel baseline (samples).
    pub baseline_window: usize,
    /// Circular buffer size for BPM smoothing (validated windows).
    pub bpm_window: usize,
    /// Measurement window duration in seconds.
    pub window_secs: f64,
    /// Lower bound of the plausible heart-rate range (BPM, inclusive).
    pub min_plausible_bpm: u32,
    /// Upper bound of the plausible heart-rate range (BPM, inclusive).
    pub max_plausible_bpm: u32,
}

impl Default for VitalsConfig {
    fn default() -> Self {
        Self {
            baseline_window: 4,
            bpm_window: 3,
            window_secs: 10.0,
            min_plausible_bpm: 30,
            max_plausible_bpm: 180,
        }
    }
}

impl VitalsConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: VitalsConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.baseline_window == 0 {
            return Err(ConfigError::Validation(
                "baseline_window must be > 0".to_string(),
            ));
        }
        if self.bpm_window == 0 {
            return Err(ConfigError::Validation(
                "bpm_window must be > 0".to_string(),
            ));
        }
        if self.window_secs <= 0.0 {
            return Err(ConfigError::Validation(
                "window_secs must be positive".to_string(),
            ));
        }
        if self.min_plausible_bpm >= self.max_plausible_bpm {
            return Err(ConfigError::Validation(
                "min_plausible_bpm must be < max_plausible_bpm".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

/// Body position during measurement. Ejection time differs when lying down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Posture {
    Sitting,
    Standing,
    LyingDown,
}

/// Subject characteristics consumed by the blood-pressure estimator.
///
/// Metric units at the boundary; the estimator converts to pounds/inches
/// internally for the Du Bois body-surface-area formula.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropometricProfile {
    pub gender: Gender,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub posture: Posture,
    pub age_years: u32,
}

impl Default for AnthropometricProfile {
    fn default() -> Self {
        Self {
            gender: Gender::Male,
            weight_kg: 130.0,
            height_cm: 190.0,
            posture: Posture::Sitting,
            age_years: 25,
        }
    }
}

impl AnthropometricProfile {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.weight_kg <= 0.0 {
            return Err(ConfigError::Validation(
                "weight_kg must be positive".to_string(),
            ));
        }
        if self.height_cm <= 0.0 {
            return Err(ConfigError::Validation(
                "height_cm must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(VitalsConfig::default().validate().is_ok());
        assert!(AnthropometricProfile::default().validate().is_ok());
    }

    #[test]
    fn test_default_values() {
        let config = VitalsConfig::default();
        assert_eq!(config.baseline_window, 4);
        assert_eq!(config.bpm_window, 3);
        assert!((config.window_secs - 10.0).abs() < f64::EPSILON);
        assert_eq!(config.min_plausible_bpm, 30);
        assert_eq!(config.max_plausible_bpm, 180);
    }

    #[test]
    fn test_rejects_empty_windows() {
        let mut config = VitalsConfig::default();
        config.baseline_window = 0;
        assert!(config.validate().is_err());

        let mut config = VitalsConfig::default();
        config.bpm_window = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_bpm_range() {
        let mut config = VitalsConfig::default();
        config.min_plausible_bpm = 200;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_nonpositive_body_metrics() {
        let mut profile = AnthropometricProfile::default();
        profile.weight_kg = 0.0;
        assert!(profile.validate().is_err());

        let mut profile = AnthropometricProfile::default();
        profile.height_cm = -1.0;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = VitalsConfig::default();
        let text = toml::to_string(&config).unwrap();
        let parsed: VitalsConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.baseline_window, config.baseline_window);
        assert_eq!(parsed.max_plausible_bpm, config.max_plausible_bpm);
    }
}
