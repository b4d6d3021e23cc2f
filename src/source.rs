use async_trait::async_trait;
use reqwest::Url;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(reqwest::Error),
    #[error("api error ({}): {description}", .code.unwrap_or_default())]
    Api {
        code: Option<i64>,
        description: String,
    },
    #[error("couldn't build request url")]
    BadUrl,
    #[error("response is missing `{0}`")]
    Missing(&'static str),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        // request urls carry the bot token
        Self::Transport(err.without_url())
    }
}

/// One image of a pack, `index` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetItem {
    pub index: usize,
    pub remote_id: String,
    pub tag: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RemotePack {
    pub title: String,
    pub assets: Vec<AssetItem>,
}

/// Short-lived location of an asset's bytes.
///
/// `url` embeds credentials and must never end up in a log line.
#[derive(Clone)]
pub struct AssetLocation {
    pub url: Url,
    pub file_path: String,
}

impl std::fmt::Debug for AssetLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetLocation")
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

/// The remote platform as seen by the exporter. Implementations don't
/// retry; callers decide what a failure costs.
#[async_trait]
pub trait StickerSource: Send + Sync {
    async fn pack(&self, name: &str) -> Result<RemotePack, ApiError>;
    async fn locate_asset(&self, asset_id: &str) -> Result<AssetLocation, ApiError>;
}
