use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::source::{ApiError, AssetItem, AssetLocation, RemotePack, StickerSource};

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<i64>,
}

impl<T> Envelope<T> {
    fn into_result(self) -> Result<T, ApiError> {
        if !self.ok {
            return Err(ApiError::Api {
                code: self.error_code,
                description: self.description.unwrap_or_default(),
            });
        }
        self.result.ok_or(ApiError::Missing("result"))
    }
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub first_name: String,
    pub username: Option<String>,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.first_name)
    }
}

#[derive(Debug, Deserialize)]
pub struct Sticker {
    pub file_id: String,
    pub emoji: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StickerSet {
    pub title: String,
    pub stickers: Vec<Sticker>,
}

impl From<StickerSet> for RemotePack {
    fn from(set: StickerSet) -> Self {
        let assets = set
            .stickers
            .into_iter()
            .enumerate()
            .map(|(i, sticker)| AssetItem {
                index: i + 1,
                remote_id: sticker.file_id,
                tag: sticker.emoji.filter(|emoji| !emoji.is_empty()),
            })
            .collect();
        RemotePack {
            title: set.title,
            assets,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct File {
    pub file_path: Option<String>,
}

#[derive(Serialize)]
struct GetStickerSet<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct GetFile<'a> {
    file_id: &'a str,
}

/// Bot API client. Every call is a JSON `POST` to `{base}/bot{token}/{method}`.
#[derive(Clone)]
pub struct BotApi {
    client: reqwest::Client,
    base: Url,
    token: String,
}

impl std::fmt::Debug for BotApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotApi")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

impl BotApi {
    pub fn new(client: reqwest::Client, base: Url, token: impl Into<String>) -> Self {
        Self {
            client,
            base,
            token: token.into(),
        }
    }

    fn endpoint(&self, tail: &str) -> Result<Url, ApiError> {
        let base = self.base.as_str().trim_end_matches('/');
        let url = format!("{base}/{tail}");
        Url::parse(&url).map_err(|_| ApiError::BadUrl)
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(&format!("bot{}/{method}", self.token))?;
        let envelope: Envelope<T> = self
            .client
            .post(url)
            .json(body)
            .send()
            .await?
            .json()
            .await?;
        envelope.into_result()
    }

    /// Checks the token, returns the bot account it belongs to.
    pub async fn get_me(&self) -> Result<User, ApiError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    pub async fn get_sticker_set(&self, name: &str) -> Result<StickerSet, ApiError> {
        self.call("getStickerSet", &GetStickerSet { name }).await
    }

    pub async fn get_file(&self, file_id: &str) -> Result<File, ApiError> {
        self.call("getFile", &GetFile { file_id }).await
    }

    pub fn file_url(&self, file_path: &str) -> Result<Url, ApiError> {
        self.endpoint(&format!("file/bot{}/{file_path}", self.token))
    }
}

#[async_trait]
impl StickerSource for BotApi {
    async fn pack(&self, name: &str) -> Result<RemotePack, ApiError> {
        Ok(self.get_sticker_set(name).await?.into())
    }

    async fn locate_asset(&self, asset_id: &str) -> Result<AssetLocation, ApiError> {
        let file = self.get_file(asset_id).await?;
        let file_path = file.file_path.ok_or(ApiError::Missing("file_path"))?;
        Ok(AssetLocation {
            url: self.file_url(&file_path)?,
            file_path,
        })
    }
}
