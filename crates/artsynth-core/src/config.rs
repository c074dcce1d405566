//! Run configuration loaded from a JSON file and the environment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::DatasetOptions;

/// Environment variable overriding [`Config::input_dir`].
pub const ENV_IN_PATH: &str = "ARTSYNTH_IN_PATH";
/// Environment variable overriding [`Config::output_dir`].
pub const ENV_OUT_PATH: &str = "ARTSYNTH_OUT_PATH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Where source images come from, where variants go, and how the dataset
/// is handed off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Accepted source extensions, including the leading dot.
    pub supported_extensions: Vec<String>,
    pub dataset: DatasetOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./1me-images/"),
            output_dir: PathBuf::from("./1me-images-out/"),
            supported_extensions: vec![".jpg".to_string(), ".jpeg".to_string()],
            dataset: DatasetOptions::default(),
        }
    }
}

impl Config {
    /// Read `path` as JSON, then apply environment overrides and validate.
    ///
    /// Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// [`Config::load`] with overrides read through `lookup` instead of the
    /// process environment.
    pub fn load_with_env<F>(path: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.apply_env(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Defaults with overrides read through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        config.apply_env(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Override the directories from `lookup`, which maps a variable name
    /// to its value. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_IN_PATH).filter(|v| !v.is_empty()) {
            self.input_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(ENV_OUT_PATH).filter(|v| !v.is_empty()) {
            self.output_dir = PathBuf::from(dir);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.supported_extensions.is_empty() {
            return Err(ConfigError::Invalid(
                "supported_extensions must not be empty".into(),
            ));
        }
        if let Some(ext) = self.supported_extensions.iter().find(|e| !e.starts_with('.')) {
            return Err(ConfigError::Invalid(format!(
                "extension {ext:?} must start with '.'"
            )));
        }
        if self.dataset.batch_size == 0 {
            return Err(ConfigError::Invalid(
                "dataset.batch_size must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Whether `file_name` has one of the supported extensions, ignoring case.
    pub fn is_supported_extension(&self, file_name: &str) -> bool {
        let Some(ext) = Path::new(file_name).extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.supported_extensions
            .iter()
            .any(|s| s.strip_prefix('.').unwrap_or(s).eq_ignore_ascii_case(ext))
    }
}
