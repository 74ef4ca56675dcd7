//! Runtime settings for the binary, read from the environment.

use crate::error::AppError;
use std::net::SocketAddr;

/// Settings the server needs at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Token for outbound GitHub API calls.
    pub github_token: String,

    /// Directory holding `<owner>/<repo>.json` files and `_global.json`.
    pub config_dir: String,

    /// Socket address the webhook server binds.
    pub addr: SocketAddr,

    /// GitHub API root, overridable for testing against a local stub.
    pub api_root: String,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let github_token = lookup("GITHUB_TOKEN").ok_or_else(|| {
            AppError::internal("GITHUB_TOKEN is not set")
        })?;

        let addr = lookup("BUTLER_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8000".to_string())
            .parse()
            .map_err(|e| AppError::internal(format!("invalid BUTLER_ADDR: {}", e)))?;

        Ok(Self {
            github_token,
            config_dir: lookup("BUTLER_CONFIG_DIR").unwrap_or_else(|| "configs".to_string()),
            addr,
            api_root: lookup("GITHUB_API_ROOT")
                .unwrap_or_else(|| "https://api.github.com".to_string()),
        })
    }
}
