use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Base path of the AutoSender backend API. Every endpoint the gateway knows
/// is relative to this.
const DEFAULT_API_BASE_URL: &str = "https://email-backend-rtn0.onrender.com/api/v1";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Application configuration loaded from environment variables.
/// All variables are optional; defaults target the hosted backend.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    /// Bound on every gateway request. A hung call fails with a timeout
    /// error instead of leaving the caller waiting indefinitely.
    pub request_timeout: Duration,
    /// Location of the stored credential token.
    pub token_path: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let api_base_url = std::env::var("AUTOSENDER_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        let request_timeout = std::env::var("AUTOSENDER_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map(Duration::from_secs)
            .context("AUTOSENDER_REQUEST_TIMEOUT_SECS must be a whole number of seconds")?;

        let token_path = match std::env::var("AUTOSENDER_TOKEN_PATH") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_token_path()?,
        };

        Ok(Config {
            api_base_url,
            request_timeout,
            token_path,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn default_token_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("could not determine the user configuration directory")?;
    Ok(base.join("autosender").join("credentials"))
}
