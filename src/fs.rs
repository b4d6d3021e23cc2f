use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirError {
    #[error("couldn't create directory {path:?}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{0:?} exists, but is not a directory")]
    InvalidType(PathBuf),
}

/// Makes sure `path` is a directory, creating it and its parents if missing.
pub async fn assert_dir(path: impl AsRef<Path>) -> Result<(), DirError> {
    let path = path.as_ref();
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(DirError::InvalidType(path.to_owned())),
        Err(_) => tokio::fs::create_dir_all(path)
            .await
            .map_err(|source| DirError::Create {
                path: path.to_owned(),
                source,
            }),
    }
}

/// Creates the directory of a single pack. An existing directory is an error,
/// so two packs never share one.
pub async fn create_pack_dir(root: impl AsRef<Path>, output_id: &str) -> Result<PathBuf, DirError> {
    let path = root.as_ref().join(output_id);
    match tokio::fs::create_dir(&path).await {
        Ok(()) => Ok(path),
        Err(source) => Err(DirError::Create { path, source }),
    }
}
