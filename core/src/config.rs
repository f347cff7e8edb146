// core/src/config.rs
use crate::planner::bounds::RawParameters;
use crate::utils::DEFAULT_CONFIG_FILE_NAME;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at {0}")]
    NotFound(PathBuf),
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Planner config file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlannerConfig {
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
    #[serde(rename = "log-path")]
    pub log_path: Option<PathBuf>,
    pub parameters: RawParameters,
}

impl PlannerConfig {
    pub fn from_json(path: &Path, content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_json(path, &content)
    }

    /// An explicit path must exist. Without one, `default.json` in `dir` is
    /// used when present and built-in defaults otherwise.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let fallback = dir.join(DEFAULT_CONFIG_FILE_NAME);
                if fallback.exists() {
                    Self::load(&fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
