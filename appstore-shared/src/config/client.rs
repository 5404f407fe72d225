use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};
use thiserror::Error;
use url::Url;

/// Primary environment variable for the backend base URL.
pub const API_BASE_ENV: &str = "APPSTORE_API_BASE";
/// Secondary environment variable for the backend base URL.
pub const BACKEND_URL_ENV: &str = "APPSTORE_BACKEND_URL";
/// Environment variable overriding where the access token is stored.
pub const TOKEN_PATH_ENV: &str = "APPSTORE_TOKEN_PATH";
/// Environment variable overriding the log level.
pub const LOG_LEVEL_ENV: &str = "APPSTORE_LOG_LEVEL";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A `.yaml`/`.yml` file did not parse.
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yml::Error),
    /// A `.json` file did not parse.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
    /// The file extension is neither YAML nor JSON.
    #[error("Unsupported configuration format. Use 'yaml' or 'json'.")]
    UnsupportedFormat,
    /// The backend URL override is not an absolute URL.
    #[error("invalid backend URL '{value}': {source}")]
    InvalidUrl {
        /// Rejected value.
        value: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
}

/// Output format for log lines.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is not set.
    pub level: String,
    /// Line format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// The main configuration structure for the App Store client.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Backend base URL. `None` means same-origin, which only a browser has.
    #[serde(default)]
    pub api_base_url: Option<Url>,

    /// File holding the access token. `None` uses the per-user config directory.
    #[serde(default)]
    pub token_path: Option<PathBuf>,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Generates a default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Loads the configuration from a file, environment variables, or defaults.
    ///
    /// Precedence, lowest first: defaults, file, environment, `api_base_override`.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when the file cannot be read or parsed, or when a
    /// base URL from any source is not a valid absolute URL.
    pub fn load_config(
        config_path: Option<PathBuf>,
        api_base_override: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut config = Config::with_defaults();

        if let Some(path) = config_path {
            let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            config = match path.extension().and_then(|ext| ext.to_str()) {
                Some("yaml" | "yml") => serde_yml::from_str(&content)?,
                Some("json") => serde_json::from_str(&content)?,
                _ => return Err(ConfigError::UnsupportedFormat),
            };
        }

        let env_base = non_empty_env(API_BASE_ENV).or_else(|| non_empty_env(BACKEND_URL_ENV));
        if let Some(base) = env_base {
            config.api_base_url = Some(parse_base_url(&base)?);
        }
        if let Some(path) = non_empty_env(TOKEN_PATH_ENV) {
            config.token_path = Some(PathBuf::from(path));
        }
        if let Some(level) = non_empty_env(LOG_LEVEL_ENV) {
            config.logging.level = level;
        }

        if let Some(base) = api_base_override.filter(|value| !value.trim().is_empty()) {
            config.api_base_url = Some(parse_base_url(base)?);
        }

        tracing::debug!(
            api_base = config.api_base_url.as_ref().map_or("(same-origin)", Url::as_str),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Base URL with trailing slashes removed, or an empty string for same-origin.
    #[must_use]
    pub fn api_base(&self) -> String {
        self.api_base_url
            .as_ref()
            .map(|url| url.as_str().trim_end_matches('/').to_string())
            .unwrap_or_default()
    }

    /// Token file location: the configured path, else `<config_dir>/appstore/token`.
    #[cfg(not(target_arch = "wasm32"))]
    #[must_use]
    pub fn resolved_token_path(&self) -> PathBuf {
        self.token_path.clone().unwrap_or_else(|| {
            directories::BaseDirs::new()
                .map(|dirs| dirs.config_dir().join("appstore").join("token"))
                .unwrap_or_else(|| PathBuf::from("./appstore.token"))
        })
    }

    /// Validate the configuration, collecting every problem found.
    ///
    /// # Errors
    /// Returns the list of human-readable problems.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        match &self.api_base_url {
            Some(url) if !matches!(url.scheme(), "http" | "https") => {
                errors.push(format!(
                    "Unsupported backend URL scheme '{}'. Use http or https.",
                    url.scheme()
                ));
            }
            Some(_) => {}
            None if cfg!(not(target_arch = "wasm32")) => {
                errors.push(format!(
                    "No backend URL configured. Set {API_BASE_ENV} or pass --api-base."
                ));
            }
            None => {}
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log level '{}'. Use one of: {}.",
                self.logging.level,
                LOG_LEVELS.join(", ")
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|source| ConfigError::InvalidUrl {
        value: value.to_string(),
        source,
    })
}
