use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.modrinth.com/v2";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_user_agent() -> String {
    format!("rinth/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Settings of a [`crate::Modrinth`] client.
///
/// ```toml
/// base_url = "https://staging-api.modrinth.com/v2"
/// token = "mrp_..."
/// timeout_secs = 30
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Used by every call that is not given a token of its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::Decode {
            path: "config".to_owned(),
            message: e.to_string(),
        })
    }

    pub async fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let s = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::io(path, e))?;
        let config = Self::from_toml_str(&s)?;

        tracing::info!("Config {} has been read successfully", path.to_string_lossy());

        Ok(config)
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        if token.is_some() {
            self.token = token;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        assert_eq!(ClientConfig::default(), ClientConfig::from_toml_str("").unwrap());
    }

    #[test]
    fn partial_file() {
        let config = ClientConfig::from_toml_str("token = \"mrp_x\"\ntimeout_secs = 5").unwrap();
        assert_eq!(Some("mrp_x"), config.token.as_deref());
        assert_eq!(5, config.timeout_secs);
        assert_eq!(DEFAULT_BASE_URL, config.base_url);
    }

    #[test]
    fn bad_file() {
        assert!(matches!(
            ClientConfig::from_toml_str("timeout_secs = \"soon\""),
            Err(Error::Decode { .. })
        ));
    }

    #[test]
    fn cli_token_overrides_file() {
        let config = ClientConfig::default().with_token(Some("file".to_owned()));
        let overridden = config.clone().with_token(Some("flag".to_owned()));
        assert_eq!(Some("flag"), overridden.token.as_deref());
        assert_eq!(Some("file"), config.with_token(None).token.as_deref());
    }

    #[tokio::test]
    async fn reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rinth.toml");
        tokio::fs::write(&path, "base_url = \"http://localhost:8000/v2\"").await.unwrap();

        let config = ClientConfig::from_toml_file(&path).await.unwrap();
        assert_eq!("http://localhost:8000/v2", config.base_url);

        assert!(matches!(
            ClientConfig::from_toml_file(dir.path().join("missing.toml")).await,
            Err(Error::Io { .. })
        ));
    }
}
