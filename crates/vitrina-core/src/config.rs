//! Configuration module
//!
//! Client configuration is read from the environment (after loading a `.env`
//! file if present): backend URL, auth token location, request timeout, and
//! listing defaults.

use std::env;
use std::path::PathBuf;

use crate::models::DEFAULT_PAGE_SIZE;

const DEFAULT_API_URL: &str = "http://localhost:3000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;
const TOKEN_FILE_NAME: &str = "token";

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
    /// Explicit token; takes precedence over the token file.
    pub token: Option<String>,
    pub token_file: PathBuf,
    pub timeout_secs: u64,
    pub page_size: u32,
    pub search_debounce_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            token_file: default_token_file(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
        }
    }
}

/// `<config dir>/vitrina/token`, or `./.vitrina/token` when no config dir exists.
pub fn default_token_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".vitrina"))
        .join("vitrina")
        .join(TOKEN_FILE_NAME)
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("VITRINA_API_URL")
            .or_else(|| lookup("API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let token = lookup("VITRINA_TOKEN").filter(|t| !t.trim().is_empty());

        let token_file = lookup("VITRINA_TOKEN_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(default_token_file);

        let timeout_secs = match lookup("VITRINA_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse()
                .map_err(|_| anyhow::anyhow!("VITRINA_TIMEOUT_SECS must be a valid number"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let page_size = match lookup("VITRINA_PAGE_SIZE") {
            Some(raw) => raw
                .parse()
                .map_err(|_| anyhow::anyhow!("VITRINA_PAGE_SIZE must be a valid number"))?,
            None => DEFAULT_PAGE_SIZE,
        };

        let search_debounce_ms = match lookup("VITRINA_SEARCH_DEBOUNCE_MS") {
            Some(raw) => raw.parse().map_err(|_| {
                anyhow::anyhow!("VITRINA_SEARCH_DEBOUNCE_MS must be a valid number")
            })?,
            None => DEFAULT_SEARCH_DEBOUNCE_MS,
        };

        let config = Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
            token_file,
            timeout_secs,
            page_size,
            search_debounce_ms,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.api_url.trim().is_empty() {
            return Err(anyhow::anyhow!("VITRINA_API_URL cannot be empty"));
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "VITRINA_API_URL must start with http:// or https://"
            ));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow::anyhow!("VITRINA_TIMEOUT_SECS must be greater than 0"));
        }
        if self.page_size == 0 {
            return Err(anyhow::anyhow!("VITRINA_PAGE_SIZE must be greater than 0"));
        }
        tracing::debug!(api_url = %self.api_url, "Client configuration validated");
        Ok(())
    }
}
