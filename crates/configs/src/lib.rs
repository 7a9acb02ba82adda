//! # configs
//!
//! Typed runtime settings for the Rusty-Board binaries.
//! Values come from `.env` (if present) and `RUSTY_BOARD__*` environment
//! variables, e.g. `RUSTY_BOARD__DATA_DIR=/var/lib/rusty-board`.

use std::collections::HashMap;
use std::path::PathBuf;

use config::{Config, Environment};
use serde::Deserialize;
use thiserror::Error;

pub const ENV_PREFIX: &str = "RUSTY_BOARD";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Directory holding one `<board>.jsonl` action log per board
    pub data_dir: PathBuf,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Settings {
    /// Loads `.env` into the process environment, then reads settings from it.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env is normal; plain environment variables still apply.
        dotenvy::dotenv().ok();
        Self::load(None)
    }

    /// Reads settings from `vars` instead of the process environment when given.
    pub fn load(vars: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("data_dir", "./data")?
            .set_default("log_format", "pretty")?
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .source(vars),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
