//! Application configuration loaded from `config.toml`.
//!
//! The file lives under the OS config directory (`neurovision/config.toml`);
//! `NEUROVISION_CONFIG` points at a different file. A missing file means
//! defaults everywhere.

use crate::dashboard::UserProfile;
use crate::upload::{SimulationConfig, SimulationError};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_ENV: &str = "NEUROVISION_CONFIG";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("Invalid [simulation] section: {0}")]
    Simulation(#[from] SimulationError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub simulation: SimulationConfig,
    pub logging: LoggingConfig,
    /// Skips the sign-in screen when present.
    pub profile: Option<UserProfile>,
}

impl AppConfig {
    /// Loads the config from the resolved path, falling back to defaults
    /// when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        match config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            Some(path) => {
                tracing::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        if let Some(profile) = &self.profile {
            profile.validate().map_err(|e| ConfigError::Invalid {
                field: "profile",
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }
}

/// `NEUROVISION_CONFIG` if set, otherwise the per-user config directory.
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    ProjectDirs::from("", "", "neurovision").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::Role;
    use crate::upload::IncrementRange;
    use std::io::Write;

    fn write_config(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(text.as_bytes()).expect("write");
        file
    }

    #[test]
    fn empty_file_gives_defaults() {
        let file = write_config("");
        let config = AppConfig::from_file(file.path()).expect("loads");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.simulation.upload_tick_ms, 200);
        assert_eq!(config.simulation.processing_tick_ms, 300);
        assert_eq!(config.simulation.phase_delay_ms, 500);
        assert_eq!(config.simulation.upload_increment, IncrementRange::new(5.0, 25.0));
        assert_eq!(config.simulation.processing_increment, IncrementRange::new(3.0, 18.0));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let file = write_config(
            r#"
[simulation]
upload_tick_ms = 50
seed = 9

[logging]
level = "debug"

[profile]
full_name = "Dr. Lee"
role = "radiologist"
email = "lee@hospital.org"
"#,
        );
        let config = AppConfig::from_file(file.path()).expect("loads");
        assert_eq!(config.simulation.upload_tick_ms, 50);
        assert_eq!(config.simulation.processing_tick_ms, 300);
        assert_eq!(config.simulation.seed, Some(9));
        assert_eq!(config.logging.level, "debug");
        let profile = config.profile.expect("profile");
        assert_eq!(profile.role, Role::Radiologist);
    }

    #[test]
    fn rejects_non_positive_increments() {
        let file = write_config(
            r#"
[simulation]
processing_increment = { min = 0.0, max = 10.0 }
"#,
        );
        let err = AppConfig::from_file(file.path()).unwrap_err();
        match err {
            ConfigError::Simulation(inner) => assert_eq!(inner.field(), "processing_increment"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_zero_tick() {
        let file = write_config("[simulation]\nupload_tick_ms = 0\n");
        assert!(matches!(
            AppConfig::from_file(file.path()),
            Err(ConfigError::Simulation(SimulationError::ZeroTick {
                field: "upload_tick_ms"
            }))
        ));
    }

    #[test]
    fn rejects_bad_profile_and_bad_toml() {
        let file = write_config(
            "[profile]\nfull_name = \"A\"\nrole = \"doctor\"\nemail = \"nope\"\n",
        );
        assert!(matches!(
            AppConfig::from_file(file.path()),
            Err(ConfigError::Invalid { field: "profile", .. })
        ));

        let file = write_config("[simulation\n");
        assert!(matches!(
            AppConfig::from_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = AppConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
