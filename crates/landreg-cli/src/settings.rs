use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use landreg_generate::{DEFAULT_MAX_ATTEMPTS, TypeWeighting};

pub const DEFAULT_SETTINGS_FILE: &str = "landreg.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file not found: {0}")]
    Missing(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Defaults for `landreg generate`; command-line flags take precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Applications generated when no `--type` is given.
    pub random_count: usize,
    pub print_samples: usize,
    pub run_dir: PathBuf,
    pub store_dir: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub seed: Option<u64>,
    pub weighting: TypeWeighting,
    pub max_reference_attempts: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            random_count: 20,
            print_samples: 5,
            run_dir: PathBuf::from("runs"),
            store_dir: None,
            catalog: None,
            seed: None,
            weighting: TypeWeighting::Uniform,
            max_reference_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Load settings from `path`, or from `./landreg.toml` when no path is given.
///
/// A missing default file yields the built-in defaults; a missing explicit
/// file is an error.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, SettingsError> {
    let (path, explicit) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_SETTINGS_FILE), false),
    };

    if !path.exists() {
        if explicit {
            return Err(SettingsError::Missing(path));
        }
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(&path)?;
    parse_settings(&content)
}

pub fn parse_settings(content: &str) -> Result<Settings, SettingsError> {
    Ok(toml::from_str(content)?)
}
