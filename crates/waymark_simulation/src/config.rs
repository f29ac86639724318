//! Конфигурация симуляции (RON)
//!
//! Пример `config/simulation.ron`:
//! ```ron
//! (
//!     fixed_hz: 90.0,
//!     seed: 7,
//!     log_level: Debug,
//!     waypoint: (speed: 2.0, curve_distance: 0.2),
//! )
//! ```
//! Отсутствующие поля берутся из Default.

use bevy::prelude::*;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::logger::LogLevel;

#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    /// Значение прочиталось, но не годится (например fixed_hz <= 0)
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "config I/O error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "config parse error: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e.to_string())
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

/// Корневой config resource
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Частота FixedUpdate (Hz)
    pub fixed_hz: f64,
    /// Seed для DeterministicRng
    pub seed: u64,
    pub log_level: LogLevel,
    pub waypoint: WaypointDefaults,
    pub locomotion: LocomotionDefaults,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_hz: 60.0,
            seed: 42,
            log_level: LogLevel::Info,
            waypoint: WaypointDefaults::default(),
            locomotion: LocomotionDefaults::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Проверка значений, которые serde пропускает (Time<Fixed> паникует на них)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fixed_hz.is_finite() || self.fixed_hz <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "fixed_hz must be a positive finite number, got {}",
                self.fixed_hz
            )));
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_ron_str(&source)
    }

    /// Загрузить из файла; при ошибке: Default + warning в лог
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                crate::logger::log_warning(&format!(
                    "Config {:?} not loaded ({}), using defaults",
                    path, e
                ));
                Self::default()
            }
        }
    }
}

/// Параметры по умолчанию для новых WaypointMovement
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct WaypointDefaults {
    pub speed: f32,
    pub curve_distance: f32,
}

impl Default for WaypointDefaults {
    fn default() -> Self {
        Self {
            speed: 1.0,
            curve_distance: 0.1,
        }
    }
}

/// Параметры по умолчанию для SmoothLocomotion
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LocomotionDefaults {
    pub move_speed: f32,
    pub snap_degrees: f32,
    pub snap_deadzone: f32,
}

impl Default for LocomotionDefaults {
    fn default() -> Self {
        Self {
            move_speed: 1.0,
            snap_degrees: 45.0,
            snap_deadzone: 0.8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = SimulationConfig::from_ron_str("(fixed_hz: 90.0, waypoint: (speed: 2.5))")
            .expect("valid config");

        assert_eq!(config.fixed_hz, 90.0);
        assert_eq!(config.seed, 42);
        assert_eq!(config.waypoint.speed, 2.5);
        assert_eq!(config.waypoint.curve_distance, 0.1);
        assert_eq!(config.locomotion, LocomotionDefaults::default());
    }

    #[test]
    fn test_log_level_parses() {
        let config = SimulationConfig::from_ron_str("(log_level: Warning)").expect("valid config");
        assert_eq!(config.log_level, LogLevel::Warning);
    }

    #[test]
    fn test_broken_config_is_parse_error() {
        let err = SimulationConfig::from_ron_str("(fixed_hz: \"fast\")").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_non_positive_fixed_hz_is_invalid() {
        for source in ["(fixed_hz: 0.0)", "(fixed_hz: -30.0)"] {
            let err = SimulationConfig::from_ron_str(source).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{}: {:?}", source, err);
        }
    }

    #[test]
    fn test_nan_fixed_hz_is_invalid() {
        let config = SimulationConfig {
            fixed_hz: f64::NAN,
            ..SimulationConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!(
            "waymark_zero_hz_{}.ron",
            std::process::id()
        ));
        std::fs::write(&path, "(fixed_hz: 0.0, seed: 7)").unwrap();

        let config = SimulationConfig::load_or_default(&path);
        let _ = std::fs::remove_file(&path);

        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SimulationConfig::load("/definitely/not/here/simulation.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
