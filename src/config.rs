use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

use crate::telegram::DEFAULT_API_URL;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("couldn't read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("couldn't parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("`tgBotToken` is empty")]
    EmptyToken,
    #[error("`apiUrl` is not a valid url: {0}")]
    ApiUrl(String),
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_owned()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    #[serde(alias = "tg_bot_token")]
    tg_bot_token: String,
    #[serde(default = "default_api_url", alias = "api_url")]
    api_url: String,
}

pub struct Config {
    pub tg_bot_token: String,
    /// Bot API server, for self-hosted instances.
    pub api_url: Url,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("tg_bot_token", &"<redacted>")
            .field("api_url", &self.api_url.as_str())
            .finish()
    }
}

impl Config {
    pub fn from_json(data: &[u8], path: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_slice(data).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        if raw.tg_bot_token.trim().is_empty() {
            return Err(ConfigError::EmptyToken);
        }
        let api_url = Url::parse(&raw.api_url).map_err(|_| ConfigError::ApiUrl(raw.api_url))?;
        Ok(Config {
            tg_bot_token: raw.tg_bot_token,
            api_url,
        })
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = tokio::fs::read(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_owned(),
                source,
            })?;
        Self::from_json(&data, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn parse(json: &str) -> Result<Config, ConfigError> {
        Config::from_json(json.as_bytes(), Path::new("config.json"))
    }

    #[test]
    fn token_only() {
        let config = parse(r#"{ "tgBotToken": "123:abc" }"#).unwrap();
        assert_eq!(config.tg_bot_token, "123:abc");
        assert_eq!(config.api_url.as_str(), "https://api.telegram.org/");
    }

    #[test]
    fn snake_case_and_custom_server() {
        let config =
            parse(r#"{ "tg_bot_token": "123:abc", "apiUrl": "http://localhost:8081" }"#).unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:8081/");
    }

    #[test]
    fn missing_or_empty_token_is_rejected() {
        assert!(matches!(parse("{}"), Err(ConfigError::Parse { .. })));
        assert!(matches!(parse("not json"), Err(ConfigError::Parse { .. })));
        assert!(matches!(
            parse(r#"{ "tgBotToken": "  " }"#),
            Err(ConfigError::EmptyToken)
        ));
        assert!(matches!(
            parse(r#"{ "tgBotToken": "123:abc", "apiUrl": "nowhere" }"#),
            Err(ConfigError::ApiUrl(_))
        ));
    }

    #[test]
    fn debug_hides_token() {
        let config = parse(r#"{ "tgBotToken": "123:abc" }"#).unwrap();
        assert!(!format!("{config:?}").contains("123:abc"));
    }

    #[tokio::test]
    async fn missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = Config::load(tmp.path().join("config.json")).await.unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[tokio::test]
    async fn loads_from_disk() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        tokio::fs::write(&path, br#"{ "tgBotToken": "123:abc" }"#)
            .await
            .unwrap();
        assert_eq!(Config::load(&path).await.unwrap().tg_bot_token, "123:abc");
    }
}
