use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_SOURCE_URL: &str = "https://kworb.net/spotify/country/in_daily.html";
const DEFAULT_COUNTRY: &str = "India";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RAW_SNAPSHOT: &str = "spotify_raw.csv";
const DEFAULT_CLEAN_SNAPSHOT: &str = "spotify_clean.csv";
const DEFAULT_DB_PATH: &str = "data/music_analytics.sqlite";
const DEFAULT_TABLE: &str = "spotify_charts";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub source_url: String,
    pub country: String,
    pub timeout_secs: u64,
    pub raw_snapshot: PathBuf,
    pub clean_snapshot: PathBuf,
    pub db: DbSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DbSettings {
    pub path: PathBuf,
    pub table: String,
}

impl Settings {
    /// Defaults, then the optional TOML file, then `CHARTS_*` env vars.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("source_url", DEFAULT_SOURCE_URL)?
            .set_default("country", DEFAULT_COUNTRY)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("raw_snapshot", DEFAULT_RAW_SNAPSHOT)?
            .set_default("clean_snapshot", DEFAULT_CLEAN_SNAPSHOT)?
            .set_default("db.path", DEFAULT_DB_PATH)?
            .set_default("db.table", DEFAULT_TABLE)?;

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path));
        }

        builder
            .add_source(
                config::Environment::with_prefix("CHARTS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to build settings")?
            .try_deserialize()
            .context("Invalid settings")
    }
}
