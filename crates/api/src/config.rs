//! # Server Configuration
//!
//! Settings come from the process environment (a `.env` file is loaded by
//! the binaries beforehand):
//!
//! | variable | default |
//! |----------|---------|
//! | `API_HOST` | `0.0.0.0` |
//! | `API_PORT` | `3000` |
//! | `DATABASE_URL` | required |
//! | `LOG_LEVEL` | `info` |
//! | `API_CORS_ORIGINS` | unset, comma separated |
//! | `API_REQUEST_TIMEOUT_SECONDS` | `30` |

use eyre::{eyre, Result, WrapErr};
use std::env;
use tracing::Level;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime settings of the HTTP server.
///
/// ```no_run
/// use tutorsync_api::config::ApiConfig;
///
/// fn example() -> eyre::Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Listening on {}", config.server_addr());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub log_level: Level,
    /// Browser origins allowed to call the API; `None` disables CORS.
    pub cors_origins: Option<Vec<String>>,
    /// Seconds before an in-flight request is answered with 408.
    pub request_timeout: u64,
}

impl ApiConfig {
    /// Reads the process environment.
    ///
    /// Fails when `DATABASE_URL` is missing or a numeric setting does not
    /// parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("API_PORT") {
            Some(raw) => raw.trim().parse().wrap_err("Invalid API_PORT value")?,
            None => DEFAULT_PORT,
        };

        let request_timeout = match lookup("API_REQUEST_TIMEOUT_SECONDS") {
            Some(raw) => raw
                .trim()
                .parse()
                .wrap_err("Invalid API_REQUEST_TIMEOUT_SECONDS value")?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| eyre!("DATABASE_URL environment variable must be set"))?;

        let cors_origins = lookup("API_CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty());

        Ok(Self {
            host: lookup("API_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database_url,
            log_level: parse_log_level(lookup("LOG_LEVEL").as_deref().unwrap_or("info")),
            cors_origins,
            request_timeout,
        })
    }

    /// `host:port` to bind.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Unknown levels fall back to `INFO`.
pub fn parse_log_level(value: &str) -> Level {
    match value.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
