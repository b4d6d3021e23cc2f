use std::path::PathBuf;

use anyhow::Result;
use structopt::StructOpt;

use crate::export::{ExportSettings, DEFAULT_HOST, DEFAULT_OUT_DIR};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "telemoji",
    about = "Export Telegram sticker and emoji packs with a manifest.",
    usage = "telemoji [OPTIONS] <pack-link> [out-id] [<pack-link2> [out-id2]]..."
)]
pub struct Opt {
    /// Config file path
    #[structopt(long, default_value = "config.json")]
    pub config: PathBuf,

    /// Emoji pack save directory
    #[structopt(long, default_value = DEFAULT_OUT_DIR)]
    pub outdir: PathBuf,

    /// Instance for emoji meta
    #[structopt(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Pack links (`https://t.me/addstickers/...` or `https://t.me/addemoji/...`),
    /// each optionally followed by a custom output id
    pub packs: Vec<String>,
}

/// Options frozen once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: PathBuf,
    pub export: ExportSettings,
}

impl Opt {
    /// Freezes the options, stamping the run's export time.
    pub fn settings(&self) -> Result<Settings> {
        let export = ExportSettings::builder()
            .out_dir(self.outdir.clone())
            .host(self.host.clone())
            .build()?;
        Ok(Settings {
            config: self.config.clone(),
            export,
        })
    }
}
