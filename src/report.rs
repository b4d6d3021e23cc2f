use log::{error, info, warn};

use crate::download::AssetError;
use crate::export::{PackError, PackOutcome};
use crate::reference::{PackReference, Rejection};
use crate::source::{AssetItem, RemotePack};

/// Receives progress of a run. The exporter never logs on its own.
pub trait Reporter {
    fn rejected(&mut self, rejection: &Rejection);
    fn pack_started(&mut self, pack: &PackReference, remote: &RemotePack);
    fn asset_finished(
        &mut self,
        pack: &PackReference,
        item: &AssetItem,
        result: &Result<String, AssetError>,
    );
    fn pack_finished(&mut self, pack: &PackReference, outcome: &PackOutcome);
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub packs_exported: usize,
    pub packs_skipped: usize,
    pub assets_downloaded: usize,
    pub assets_failed: usize,
}

/// Renders every event as a log line and keeps a tally for the end of the run.
#[derive(Debug, Default)]
pub struct LogReporter {
    summary: RunSummary,
}

impl LogReporter {
    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    pub fn finish(&self) {
        let s = self.summary();
        info!(
            "all packs processed: {} exported, {} skipped, {} files downloaded, {} failed",
            s.packs_exported, s.packs_skipped, s.assets_downloaded, s.assets_failed
        );
    }
}

impl Reporter for LogReporter {
    fn rejected(&mut self, rejection: &Rejection) {
        match rejection {
            Rejection::Invalid(token) => warn!("invalid pack `{token}`"),
            Rejection::DuplicateOverride {
                remote_id,
                existing,
                ignored,
            } => warn!("pack `{remote_id}` already has custom id `{existing}`, ignoring `{ignored}`"),
            Rejection::Orphan(token) => {
                warn!("custom id `{token}` doesn't follow a pack link, ignoring")
            }
        }
    }

    fn pack_started(&mut self, pack: &PackReference, remote: &RemotePack) {
        info!(
            "downloading pack `{}` ({pack}, {} files)",
            remote.title,
            remote.assets.len()
        );
    }

    fn asset_finished(
        &mut self,
        pack: &PackReference,
        item: &AssetItem,
        result: &Result<String, AssetError>,
    ) {
        match result {
            Ok(file_name) => {
                self.summary.assets_downloaded += 1;
                info!("downloaded `{file_name}`");
            }
            Err(err) => {
                self.summary.assets_failed += 1;
                warn!(
                    "couldn't download file #{} `{}` of pack `{}`: {err}",
                    item.index,
                    item.remote_id,
                    pack.output_id()
                );
            }
        }
    }

    fn pack_finished(&mut self, pack: &PackReference, outcome: &PackOutcome) {
        match outcome {
            PackOutcome::Exported {
                dir,
                manifest_path,
                manifest,
            } => {
                self.summary.packs_exported += 1;
                let downloaded = manifest.emojis.iter().filter(|e| e.downloaded).count();
                info!(
                    "exported pack `{pack}` to {dir:?} ({downloaded}/{} files), manifest at {manifest_path:?}",
                    manifest.emojis.len()
                );
            }
            PackOutcome::Skipped(err) => {
                self.summary.packs_skipped += 1;
                match err {
                    PackError::Manifest(_) => error!("pack `{pack}` has no manifest: {err}"),
                    _ => warn!("skipping pack `{pack}`: {err}"),
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Keeps events as plain strings so tests can assert on their order.
    #[derive(Debug, Default)]
    pub struct Recorder {
        pub events: Vec<String>,
    }

    impl Reporter for Recorder {
        fn rejected(&mut self, rejection: &Rejection) {
            self.events.push(format!("rejected {rejection:?}"));
        }
        fn pack_started(&mut self, pack: &PackReference, remote: &RemotePack) {
            self.events
                .push(format!("start {} {}", pack.output_id(), remote.assets.len()));
        }
        fn asset_finished(
            &mut self,
            pack: &PackReference,
            item: &AssetItem,
            result: &Result<String, AssetError>,
        ) {
            let status = if result.is_ok() { "ok" } else { "failed" };
            self.events
                .push(format!("asset {} {} {status}", pack.output_id(), item.index));
        }
        fn pack_finished(&mut self, pack: &PackReference, outcome: &PackOutcome) {
            let status = match outcome {
                PackOutcome::Exported { .. } => "exported",
                PackOutcome::Skipped(_) => "skipped",
            };
            self.events
                .push(format!("finish {} {status}", pack.output_id()));
        }
    }

    #[test]
    fn log_reporter_tallies_outcomes() {
        let mut reporter = LogReporter::default();
        let pack = PackReference::new("abcd");
        let item = AssetItem {
            index: 1,
            remote_id: "f1".into(),
            tag: None,
        };

        reporter.asset_finished(&pack, &item, &Ok("abcd_1.webp".into()));
        reporter.asset_finished(
            &pack,
            &item,
            &Err(AssetError::Locate(crate::source::ApiError::BadUrl)),
        );
        reporter.pack_finished(
            &pack,
            &PackOutcome::Skipped(PackError::Fetch(crate::source::ApiError::BadUrl)),
        );

        assert_eq!(
            reporter.summary(),
            RunSummary {
                packs_exported: 0,
                packs_skipped: 1,
                assets_downloaded: 1,
                assets_failed: 1,
            }
        );
    }
}
