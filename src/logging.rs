use std::str::FromStr;

use anyhow::Result;
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

pub const LEVEL_VAR: &str = "TELEMOJI_LOG";

/// Level from `TELEMOJI_LOG` (environment or `.env`), `info` if unset or garbage.
pub fn level() -> LevelFilter {
    dotenv::var(LEVEL_VAR)
        .ok()
        .and_then(|level| LevelFilter::from_str(level.trim()).ok())
        .unwrap_or(LevelFilter::Info)
}

pub fn init(level: LevelFilter) -> Result<()> {
    TermLogger::init(
        level,
        ConfigBuilder::default()
            .add_filter_allow_str("telemoji")
            .build(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;
    Ok(())
}
