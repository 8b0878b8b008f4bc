// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use track_view::{Theme, ThemeError};
use tracing::debug;

const APP_DIR: &str = "run-tracker";
const ENV_PREFIX: &str = "RUN_TRACKER";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Yearly goal in kilometers.
    pub goal_km: f64,
    /// Data file, `<data_local_dir>/run-tracker/runs.txt` if not set.
    pub data_file: Option<PathBuf>,
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            goal_km: 1000.0,
            data_file: None,
            theme: Theme::default(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine the local data directory")]
    DataDirNotFound,
    #[error("Invalid goal {0}, expected a positive distance")]
    InvalidGoal(f64),
    #[error("Invalid theme: {0}")]
    Theme(#[from] ThemeError),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

pub fn default_data_file() -> Result<PathBuf, ConfigError> {
    let mut data_file = dirs::data_local_dir().ok_or(ConfigError::DataDirNotFound)?;
    data_file.push(APP_DIR);
    data_file.push("runs.txt");
    Ok(data_file)
}

impl Config {
    /// Loads the configuration from `path` and the `RUN_TRACKER_*` environment.
    ///
    /// The values are not validated yet, so command line options can still
    /// replace them; see [`Config::validate`].
    ///
    /// Without `path` the file in the user's config directory is used if it exists.
    /// An explicitly given file must exist.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        Config::load_with_env(path, None)
    }

    /// Like [`Config::load`], but reads the environment from `env` when set.
    ///
    /// Nested keys are separated by `__`, e.g. `RUN_TRACKER_THEME__PROGRESS`.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Config, ConfigError> {
        let mut builder = config::Config::builder();
        match path {
            Some(path) => {
                debug!("Loading config {}", path.display());
                builder = builder.add_source(config::File::from(path).required(true));
            }
            None => {
                if let Some(path) = default_config_path() {
                    debug!("Loading config {} if present", path.display());
                    builder = builder.add_source(config::File::from(path).required(false));
                }
            }
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Applies the command line options on top of the loaded values.
    pub fn with_overrides(mut self, data_file: Option<PathBuf>, goal_km: Option<f64>) -> Self {
        if let Some(data_file) = data_file {
            self.data_file = Some(data_file);
        }
        if let Some(goal_km) = goal_km {
            self.goal_km = goal_km;
        }
        self
    }

    pub fn validate(self) -> Result<Config, ConfigError> {
        if !(self.goal_km.is_finite() && self.goal_km > 0.0) {
            return Err(ConfigError::InvalidGoal(self.goal_km));
        }
        self.theme.validate()?;
        Ok(self)
    }

    pub fn data_file(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_file {
            Some(data_file) => Ok(data_file.clone()),
            None => default_data_file(),
        }
    }
}
