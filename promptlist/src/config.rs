//! Configuration resolution for promptlist
//!
//! Each setting resolves with priority command line → environment → TOML
//! file → built-in default. Credentials are never validated here; a missing
//! one is logged and surfaces later as an authentication failure.

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::ConfigError;

pub const DEFAULT_PORT: u16 = 3030;
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_MATCH_CONCURRENCY: usize = 4;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_SPOTIFY_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com";

pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const SPOTIFY_CLIENT_ID_ENV: &str = "SPOTIFY_CLIENT_ID";
pub const SPOTIFY_CLIENT_SECRET_ENV: &str = "SPOTIFY_CLIENT_SECRET";

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    pub openai_api_key: Option<String>,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    pub openai_base_url: Option<String>,
    pub spotify_accounts_url: Option<String>,
    pub spotify_api_url: Option<String>,
    pub match_concurrency: Option<usize>,
    pub http_timeout_secs: Option<u64>,
    pub completion: CompletionParams,
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `promptlist=debug`
    #[serde(default)]
    pub level: Option<String>,
}

/// Sampling parameters sent with every completion request
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CompletionParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            model: "gpt-4-turbo-2024-04-09".to_string(),
            temperature: 1.0,
            max_tokens: 256,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

/// External service credentials
#[derive(Clone, Default)]
pub struct Credentials {
    pub openai_api_key: String,
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
}

// Keep secrets out of debug logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("spotify_client_id", &self.spotify_client_id)
            .field("spotify_client_secret", &redact(&self.spotify_client_secret))
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: IpAddr,
    pub port: u16,
    pub credentials: Credentials,
    pub completion: CompletionParams,
    pub openai_base_url: String,
    pub spotify_accounts_url: String,
    pub spotify_api_url: String,
    /// Upper bound on catalog searches in flight for one request
    pub match_concurrency: usize,
    /// Timeout applied to each outbound HTTP request
    pub http_timeout: Duration,
}

impl Config {
    /// Resolve configuration from the environment and an already loaded TOML file
    ///
    /// `cli_port` carries both the `--port` flag and `PROMPTLIST_PORT`, which
    /// clap merges before this runs.
    pub fn resolve(toml: TomlConfig, cli_port: Option<u16>) -> Result<Self, ConfigError> {
        Self::from_sources(toml, cli_port, |name| std::env::var(name).ok())
    }

    /// Resolve configuration with an injectable environment lookup
    pub fn from_sources<F>(toml: TomlConfig, cli_port: Option<u16>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_address = toml
            .bind_address
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDRESS);
        let bind_address = bind_address
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidValue {
                key: "bind_address",
                value: bind_address.to_string(),
            })?;

        let credentials = Credentials {
            openai_api_key: resolve_secret(
                "OpenAI API key",
                env(OPENAI_API_KEY_ENV),
                toml.openai_api_key,
            ),
            spotify_client_id: resolve_secret(
                "Spotify client id",
                env(SPOTIFY_CLIENT_ID_ENV),
                toml.spotify_client_id,
            ),
            spotify_client_secret: resolve_secret(
                "Spotify client secret",
                env(SPOTIFY_CLIENT_SECRET_ENV),
                toml.spotify_client_secret,
            ),
        };

        let match_concurrency = toml.match_concurrency.unwrap_or(DEFAULT_MATCH_CONCURRENCY);
        if match_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                key: "match_concurrency",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            bind_address,
            port: cli_port.or(toml.port).unwrap_or(DEFAULT_PORT),
            credentials,
            completion: toml.completion,
            openai_base_url: trim_base_url(toml.openai_base_url, DEFAULT_OPENAI_BASE_URL),
            spotify_accounts_url: trim_base_url(
                toml.spotify_accounts_url,
                DEFAULT_SPOTIFY_ACCOUNTS_URL,
            ),
            spotify_api_url: trim_base_url(toml.spotify_api_url, DEFAULT_SPOTIFY_API_URL),
            match_concurrency,
            http_timeout: Duration::from_secs(
                toml.http_timeout_secs.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            ),
        })
    }
}

/// Pick a credential from environment, then TOML
///
/// Returns an empty string when neither source has a usable value.
fn resolve_secret(label: &str, env_value: Option<String>, toml_value: Option<String>) -> String {
    let env_value = env_value.filter(|v| is_valid_key(v));
    let toml_value = toml_value.filter(|v| is_valid_key(v));

    match (env_value, toml_value) {
        (Some(value), toml_value) => {
            if toml_value.is_some() {
                warn!(
                    "{} found in environment and TOML config. Using environment (higher priority).",
                    label
                );
            }
            info!("{} loaded from environment variable", label);
            value
        }
        (None, Some(value)) => {
            info!("{} loaded from TOML config", label);
            value
        }
        (None, None) => {
            warn!(
                "{} not configured; calls needing it will fail authentication",
                label
            );
            String::new()
        }
    }
}

/// Validate credential (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

fn trim_base_url(value: Option<String>, default: &str) -> String {
    value
        .as_deref()
        .unwrap_or(default)
        .trim_end_matches('/')
        .to_string()
}

/// Default config file location: `<config dir>/promptlist/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("promptlist").join("config.toml"))
}

/// Load the TOML config file
///
/// An explicit path must exist and parse. Without one, the default location
/// is used if present, otherwise every key takes its default.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(TomlConfig::default()),
        },
    };

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
}
