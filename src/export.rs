use std::path::PathBuf;

use chrono::{DateTime, Utc};
use derive_builder::Builder;
use thiserror::Error;

use crate::download::download_asset;
use crate::fs::{create_pack_dir, DirError};
use crate::manifest::{EmojiEntry, ManifestError, PackManifest};
use crate::reference::PackReference;
use crate::report::Reporter;
use crate::source::{ApiError, StickerSource};

pub const DEFAULT_OUT_DIR: &str = "packs";
pub const DEFAULT_HOST: &str = "nya.one";

/// Everything a run needs besides the remote client. Built once at startup.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct ExportSettings {
    #[builder(default = "PathBuf::from(DEFAULT_OUT_DIR)")]
    pub out_dir: PathBuf,
    /// Instance label written into every manifest.
    #[builder(default = "DEFAULT_HOST.to_owned()")]
    pub host: String,
    /// Shared by all manifests of a run.
    #[builder(default = "Utc::now()")]
    pub exported_at: DateTime<Utc>,
}

impl ExportSettings {
    pub fn builder() -> ExportSettingsBuilder {
        ExportSettingsBuilder::default()
    }
}

#[derive(Error, Debug)]
pub enum PackError {
    #[error("couldn't fetch pack: {0}")]
    Fetch(#[source] ApiError),
    #[error("couldn't prepare directory: {0}")]
    Prepare(#[source] DirError),
    #[error("couldn't save manifest: {0}")]
    Manifest(#[source] ManifestError),
}

#[derive(Debug)]
pub enum PackOutcome {
    Exported {
        dir: PathBuf,
        manifest_path: PathBuf,
        manifest: PackManifest,
    },
    /// Files downloaded before the failure stay on disk.
    Skipped(PackError),
}

pub struct Exporter<'a> {
    source: &'a dyn StickerSource,
    client: reqwest::Client,
    settings: &'a ExportSettings,
}

impl<'a> Exporter<'a> {
    pub fn new(
        source: &'a dyn StickerSource,
        client: reqwest::Client,
        settings: &'a ExportSettings,
    ) -> Self {
        Self {
            source,
            client,
            settings,
        }
    }

    async fn run_pack(&self, pack: &PackReference, report: &mut dyn Reporter) -> PackOutcome {
        let remote = match self.source.pack(&pack.remote_id).await {
            Ok(remote) => remote,
            Err(err) => return PackOutcome::Skipped(PackError::Fetch(err)),
        };
        report.pack_started(pack, &remote);

        let out_id = pack.output_id();
        let dir = match create_pack_dir(&self.settings.out_dir, out_id).await {
            Ok(dir) => dir,
            Err(err) => return PackOutcome::Skipped(PackError::Prepare(err)),
        };

        let mut emojis = Vec::with_capacity(remote.assets.len());
        for item in &remote.assets {
            let name = format!("{out_id}_{}", item.index);
            let result = download_asset(&self.client, self.source, item, &dir, &name).await;
            report.asset_finished(pack, item, &result);
            emojis.push(EmojiEntry::new(
                name,
                &remote.title,
                item.tag.as_deref(),
                result.ok(),
            ));
        }

        let manifest = PackManifest::new(&self.settings.host, self.settings.exported_at, emojis);
        match manifest.write_to(&dir).await {
            Ok(manifest_path) => PackOutcome::Exported {
                dir,
                manifest_path,
                manifest,
            },
            Err(err) => PackOutcome::Skipped(PackError::Manifest(err)),
        }
    }

    /// Exports one pack. Failures end up in the outcome, never in a panic.
    pub async fn export_pack(&self, pack: &PackReference, report: &mut dyn Reporter) -> PackOutcome {
        let outcome = self.run_pack(pack, report).await;
        report.pack_finished(pack, &outcome);
        outcome
    }

    /// Exports packs one after another, in order. A failed pack never stops the rest.
    pub async fn export_all(
        &self,
        packs: &[PackReference],
        report: &mut dyn Reporter,
    ) -> Vec<PackOutcome> {
        let mut outcomes = Vec::with_capacity(packs.len());
        for pack in packs {
            outcomes.push(self.export_pack(pack, report).await);
        }
        outcomes
    }
}
