//! # Application Configuration
//!
//! Settings are layered, lowest priority first:
//!
//! 1. Built-in defaults (API version, output directory, timeout, cleaning toggles).
//! 2. A YAML file: `metasync.yml` in the working directory when present, or the file
//!    passed with `--config` (which must then exist). `${VAR}` placeholders in the file
//!    are replaced with environment values before parsing.
//! 3. `METASYNC_*` environment variables, e.g. `METASYNC_INSTANCE_URL` or
//!    `METASYNC_CLEAN__LOGIN_HOURS=false` for nested keys.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use metasync::constants::{DEFAULT_API_VERSION, DEFAULT_PROFILE_DIR};
use metasync::CleanConfig;
use metasync_soap::SoapConfig;
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// The file picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "metasync.yml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    General(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Missing required setting `{0}` (set it in the config file or via METASYNC_{1})")]
    Missing(&'static str, &'static str),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `metasync.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The org's instance URL. Loaded from `METASYNC_INSTANCE_URL`.
    #[serde(default)]
    pub instance_url: Option<String>,
    /// Session id / OAuth access token. Loaded from `METASYNC_ACCESS_TOKEN`.
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Where Profile files are written and discovered.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Which environment-specific fields are stripped after retrieval.
    #[serde(default)]
    pub clean: CleanConfig,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_PROFILE_DIR)
}

fn default_timeout_secs() -> u64 {
    120
}

impl AppConfig {
    /// The connection settings for the SOAP client.
    ///
    /// Fails when the instance URL or the access token is not configured.
    pub fn soap_config(&self) -> Result<SoapConfig, ConfigError> {
        let instance_url = non_empty(&self.instance_url)
            .ok_or(ConfigError::Missing("instance_url", "INSTANCE_URL"))?;
        let access_token = non_empty(&self.access_token)
            .ok_or(ConfigError::Missing("access_token", "ACCESS_TOKEN"))?;
        Ok(SoapConfig {
            instance_url: instance_url.to_string(),
            access_token: access_token.to_string(),
            api_version: self.api_version.clone(),
            timeout_secs: self.timeout_secs,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// Reads a file and replaces `${VAR}` placeholders with environment values.
// Returns Ok(None) if the file does not exist.
fn read_and_substitute(path: &Path) -> Result<Option<String>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        ConfigError::General(format!(
            "Failed to read config file '{}': {e}",
            path.display()
        ))
    })?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(e.to_string()))?;
    let expanded = re.replace_all(&content, |caps: &regex::Captures| {
        env::var(&caps["var"]).unwrap_or_default()
    });

    Ok(Some(expanded.into_owned()))
}

/// Loads the application configuration from the optional file and the environment.
pub fn get_config(config_path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder();

    let file_content = match config_path_override {
        Some(path) => Some(read_and_substitute(path)?.ok_or_else(|| {
            ConfigError::NotFound(format!("Config file not found at '{}'.", path.display()))
        })?),
        None => read_and_substitute(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    if let Some(content) = file_content {
        info!(
            "Loading configuration from '{}'.",
            config_path_override
                .unwrap_or(Path::new(DEFAULT_CONFIG_FILE))
                .display()
        );
        builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
    }

    let settings = builder
        .add_source(
            Environment::with_prefix("METASYNC")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
