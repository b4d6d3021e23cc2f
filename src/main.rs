mod config;
mod download;
mod export;
mod fs;
mod logging;
mod manifest;
mod opt;
mod reference;
mod report;
mod source;
mod telegram;
mod unwrap_ext;

use config::Config;
use export::Exporter;
use opt::Opt;
use report::{LogReporter, Reporter};
use telegram::BotApi;
use unwrap_ext::UnwrapOrExit;

use log::{error, info};
use structopt::StructOpt;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(err) = logging::init(logging::level()) {
        eprintln!("couldn't set up logging: {err}");
    }

    let opt = Opt::from_args();
    if opt.packs.is_empty() {
        Opt::clap()
            .print_help()
            .unwrap_or_exit("couldn't print usage");
        println!();
        return;
    }

    let mut reporter = LogReporter::default();
    let resolution = reference::resolve(&opt.packs);
    for rejection in &resolution.rejected {
        reporter.rejected(rejection);
    }
    if resolution.packs.is_empty() {
        error!("no valid packs");
        std::process::exit(1);
    }
    let listed = resolution
        .packs
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    info!("downloading valid packs: {listed}");

    let settings = opt.settings().unwrap_or_exit("invalid options");
    fs::assert_dir(&settings.export.out_dir)
        .await
        .unwrap_or_exit("couldn't prepare output directory");

    let config = Config::load(&settings.config)
        .await
        .unwrap_or_exit("couldn't load config");
    let client = download::client().unwrap_or_exit("couldn't build http client");
    let api = BotApi::new(client.clone(), config.api_url, config.tg_bot_token);
    let me = api.get_me().await.unwrap_or_exit("couldn't authorize bot");
    info!("authorized as `{}`", me.display_name());

    let exporter = Exporter::new(&api, client, &settings.export);
    exporter.export_all(&resolution.packs, &mut reporter).await;
    reporter.finish();
}
