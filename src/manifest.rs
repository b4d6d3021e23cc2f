use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const META_VERSION: u32 = 2;
pub const MANIFEST_FILE_NAME: &str = "meta.json";

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("couldn't serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("couldn't write {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiMeta {
    pub name: String,
    pub category: String,
    pub aliases: Vec<String>,
}

/// Result of one asset. `file_name` is empty unless `downloaded` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmojiEntry {
    pub downloaded: bool,
    pub file_name: String,
    pub emoji: EmojiMeta,
}

impl EmojiEntry {
    pub fn new(name: String, category: &str, alias: Option<&str>, file_name: Option<String>) -> Self {
        Self {
            downloaded: file_name.is_some(),
            file_name: file_name.unwrap_or_default(),
            emoji: EmojiMeta {
                name,
                category: category.to_owned(),
                aliases: alias.map(str::to_owned).into_iter().collect(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackManifest {
    pub meta_version: u32,
    pub host: String,
    pub exported_at: DateTime<Utc>,
    pub emojis: Vec<EmojiEntry>,
}

impl PackManifest {
    pub fn new(host: &str, exported_at: DateTime<Utc>, emojis: Vec<EmojiEntry>) -> Self {
        Self {
            meta_version: META_VERSION,
            host: host.to_owned(),
            exported_at,
            emojis,
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>, ManifestError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Writes `meta.json` into `dir` and returns its path.
    pub async fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ManifestError> {
        let data = self.to_json()?;
        let path = dir.as_ref().join(MANIFEST_FILE_NAME);
        match tokio::fs::write(&path, data).await {
            Ok(()) => Ok(path),
            Err(source) => Err(ManifestError::Write { path, source }),
        }
    }
}
