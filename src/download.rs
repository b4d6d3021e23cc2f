use std::path::{Path, PathBuf};

use anyhow::Result;
use futures::StreamExt;
use lazy_regex::regex_captures;
use log::warn;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

use crate::source::{ApiError, AssetItem, StickerSource};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub const FALLBACK_EXTENSION: &str = "png";

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("couldn't locate file: {0}")]
    Locate(#[source] ApiError),
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("couldn't create {path:?}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("couldn't write {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("download of {path:?} broke off: {source}")]
    Stream {
        path: PathBuf,
        source: reqwest::Error,
    },
}

pub fn client() -> Result<reqwest::Client> {
    Ok(reqwest::ClientBuilder::new()
        .user_agent(USER_AGENT)
        .build()?)
}

/// Suffix of the last segment of a remote file path, e.g. `webp` for
/// `stickers/file_3.webp`.
pub fn extension_from_path(file_path: &str) -> Option<&str> {
    let (_, ext) = regex_captures!(r"\.([^./]+)$", file_path)?;
    Some(ext)
}

pub fn extension_from_content_type(content_type: &str) -> Option<&'static str> {
    let mime = content_type.split(';').next()?.trim().to_ascii_lowercase();
    let ext = match mime.as_str() {
        "image/webp" => "webp",
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/avif" => "avif",
        "image/svg+xml" => "svg",
        "video/webm" => "webm",
        "video/mp4" => "mp4",
        "application/x-tgsticker" => "tgs",
        _ => return None,
    };
    Some(ext)
}

/// Path suffix first, then the declared content type, then [`FALLBACK_EXTENSION`].
pub fn infer_extension<'a>(file_path: &'a str, content_type: Option<&str>) -> &'a str {
    extension_from_path(file_path)
        .or_else(|| content_type.and_then(extension_from_content_type))
        .unwrap_or(FALLBACK_EXTENSION)
}

async fn write_body(response: reqwest::Response, path: &Path) -> Result<(), AssetError> {
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|source| AssetError::Create {
            path: path.to_owned(),
            source,
        })?;
    let write_err = |source| AssetError::Write {
        path: path.to_owned(),
        source,
    };

    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|source| AssetError::Stream {
            path: path.to_owned(),
            source: source.without_url(),
        })?;
        file.write_all(&chunk).await.map_err(write_err)?;
    }
    file.flush().await.map_err(write_err)?;
    Ok(())
}

/// Downloads one asset into `dir` as `{base_name}.{ext}` and returns the
/// file name. Response and file handle are released before this returns.
pub async fn download_asset(
    client: &reqwest::Client,
    source: &dyn StickerSource,
    item: &AssetItem,
    dir: &Path,
    base_name: &str,
) -> Result<String, AssetError> {
    let location = source
        .locate_asset(&item.remote_id)
        .await
        .map_err(AssetError::Locate)?;

    let response = client
        .get(location.url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|err| AssetError::Request(err.without_url()))?;

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let ext = infer_extension(&location.file_path, content_type);
    let file_name = format!("{base_name}.{ext}");
    let path = dir.join(&file_name);

    match write_body(response, &path).await {
        Ok(()) => Ok(file_name),
        Err(err) => {
            if !matches!(err, AssetError::Create { .. }) {
                // half-written files would look like finished downloads
                if let Err(rm_err) = tokio::fs::remove_file(&path).await {
                    warn!("couldn't remove partial file {path:?}: {rm_err}");
                }
            }
            Err(err)
        }
    }
}
