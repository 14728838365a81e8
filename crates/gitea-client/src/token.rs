//! Access token resolution
//!
//! The pipeline normally passes the token in the source configuration.
//! For local runs it can come from the environment or a `.env` file instead.

use anyhow::Result;
use log::debug;

/// Environment variable consulted when no token is configured
pub const TOKEN_ENV_VAR: &str = "GITEA_ACCESS_TOKEN";

/// Resolves the Gitea access token
///
/// Tries, in order:
/// 1. The token from the source configuration
/// 2. `GITEA_ACCESS_TOKEN` (loading `.env` first when it is unset)
#[derive(Debug, Clone, Default)]
pub struct TokenResolver {
    /// Token read from the environment at construction
    env_token: Option<String>,
}

impl TokenResolver {
    /// Create a resolver that reads the process environment
    pub fn new() -> Self {
        if std::env::var(TOKEN_ENV_VAR).is_err() {
            match dotenvy::dotenv() {
                Ok(path) => debug!("Loaded .env file from: {:?}", path),
                Err(_) => debug!(".env file not found, relying on environment variables"),
            }
        }

        Self::with_env_token(std::env::var(TOKEN_ENV_VAR).ok())
    }

    /// Create a resolver with an explicit fallback token
    pub fn with_env_token(env_token: Option<String>) -> Self {
        Self {
            env_token: env_token.filter(|t| !t.is_empty()),
        }
    }

    /// Pick the configured token, falling back to the environment
    pub fn resolve(&self, configured: &str) -> Result<String> {
        if !configured.is_empty() {
            return Ok(configured.to_string());
        }

        if let Some(ref token) = self.env_token {
            debug!("Using token from env var {}", TOKEN_ENV_VAR);
            return Ok(token.clone());
        }

        Err(anyhow::anyhow!(
            "access_token must be set in the source configuration or via {}",
            TOKEN_ENV_VAR
        ))
    }
}
