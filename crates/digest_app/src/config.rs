//! Run configuration: a `.env`-style file overlaid by the process environment.
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use digest_engine::{DEFAULT_FEED_BASE, DEFAULT_READER_BASE};

pub const TOKEN_KEY: &str = "MINIFLUX_API_TOKEN";
pub const BASE_URL_KEY: &str = "MINIFLUX_BASE_URL";
pub const READER_URL_KEY: &str = "READER_BASE_URL";
pub const LANGUAGE_KEY: &str = "TRANSCRIPT_LANGUAGE";
pub const CHROMIUM_KEY: &str = "CHROMIUM_BIN";
pub const CLIPBOARD_KEY: &str = "CLIPBOARD_COMMAND";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("MINIFLUX_API_TOKEN is not set (add it to the environment or {})", .env_file.display())]
    MissingToken { env_file: PathBuf },
    #[error("could not read {}: {message}", .path.display())]
    EnvFile { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_token: String,
    pub base_url: String,
    pub reader_base_url: String,
    pub transcript_language: String,
    pub chromium_bin: String,
    pub clipboard_command: Option<String>,
}

impl AppConfig {
    /// Process environment over `env_file`. Non-UTF-8 variables are ignored.
    pub fn from_process_env(env_file: &Path) -> Result<Self, ConfigError> {
        let environ: HashMap<String, String> = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        Self::load(env_file, &environ)
    }

    /// Merge `env_file` (missing file is fine) under `environ`; `environ` wins.
    pub fn load(env_file: &Path, environ: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut values = read_env_file(env_file)?;
        for (key, value) in environ {
            values.insert(key.clone(), value.clone());
        }

        let lookup = |key: &str| {
            values
                .get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let api_token = lookup(TOKEN_KEY).ok_or_else(|| ConfigError::MissingToken {
            env_file: env_file.to_path_buf(),
        })?;

        Ok(Self {
            api_token,
            base_url: lookup(BASE_URL_KEY).unwrap_or_else(|| DEFAULT_FEED_BASE.to_string()),
            reader_base_url: lookup(READER_URL_KEY)
                .unwrap_or_else(|| DEFAULT_READER_BASE.to_string()),
            transcript_language: lookup(LANGUAGE_KEY).unwrap_or_else(|| "en".to_string()),
            chromium_bin: lookup(CHROMIUM_KEY).unwrap_or_else(|| "chromium".to_string()),
            clipboard_command: lookup(CLIPBOARD_KEY),
        })
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    if !path.is_file() {
        return Ok(HashMap::new());
    }
    let env_error = |err: dotenv::Error| ConfigError::EnvFile {
        path: path.to_path_buf(),
        message: err.to_string(),
    };

    let mut values = HashMap::new();
    for item in dotenv::from_path_iter(path).map_err(env_error)? {
        let (key, value) = item.map_err(env_error)?;
        values.insert(key, value);
    }
    Ok(values)
}
