mod chart;
mod cleaner;
mod db;
mod error;
mod fetcher;
mod settings;
mod snapshot;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::info;

use chart::ChartRecord;
use settings::Settings;

const PREVIEW_ROWS: usize = 5;

#[derive(Parser)]
#[command(name = "chart_loader", about = "Daily streaming chart scraper and loader")]
struct Cli {
    /// TOML settings file (defaults and CHARTS_* env vars apply without it)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, clean and load in one pass (the default)
    Run,
    /// Fetch the chart and write the raw snapshot
    Fetch,
    /// Clean the raw snapshot into the clean snapshot
    Clean,
    /// Load the clean snapshot into the database
    Load,
    /// Show loaded rows
    Show {
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    info!(settings = ?settings, "Settings loaded");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let raw = fetcher::fetch_chart(&settings).await?;
            print_preview(&raw);
            let cleaned = cleaner::clean_and_save(raw, &settings)?;
            load(&settings, &cleaned)?;
        }
        Commands::Fetch => {
            let raw = fetcher::fetch_chart(&settings).await?;
            print_preview(&raw);
        }
        Commands::Clean => {
            let cleaned = cleaner::clean_snapshot(&settings)?;
            print_preview(&cleaned);
        }
        Commands::Load => {
            let cleaned = snapshot::read_records(&settings.clean_snapshot)?;
            load(&settings, &cleaned)?;
        }
        Commands::Show { limit } => {
            let conn = db::connect(&settings.db.path)?;
            if !db::table_exists(&conn, &settings.db.table)? {
                println!(
                    "Table {} does not exist yet. Run 'run' or 'load' first.",
                    settings.db.table
                );
                return Ok(());
            }
            let rows = db::fetch_records(&conn, &settings.db.table, Some(limit))?;
            if rows.is_empty() {
                println!("No rows loaded. Run 'run' or 'load' first.");
                return Ok(());
            }
            print_table(&rows);
            let total = db::count_rows(&conn, &settings.db.table)?;
            println!("\n{} of {} rows in {}", rows.len(), total, settings.db.table);
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }
    Ok(())
}

fn load(settings: &Settings, records: &[ChartRecord]) -> anyhow::Result<()> {
    println!("Loading {} records into {:?}...", records.len(), settings.db.path);
    let conn = db::connect(&settings.db.path)?;
    let n = db::load_records(&conn, &settings.db.table, records)?;
    println!("Data successfully loaded: {} rows in {}", n, settings.db.table);
    Ok(())
}

fn print_preview(records: &[ChartRecord]) {
    if records.is_empty() {
        println!("No records.");
        return;
    }
    print_table(&records[..records.len().min(PREVIEW_ROWS)]);
    println!("[{} records]", records.len());
}

fn print_table(records: &[ChartRecord]) {
    println!(
        "{:>4} | {:<28} | {:<24} | {:>12} | {:<8} | {:<10}",
        "Rank", "Track", "Artist", "Streams", "Country", "Date"
    );
    println!("{}", "-".repeat(103));

    for r in records {
        println!(
            "{:>4} | {:<28} | {:<24} | {:>12} | {:<8} | {:<10}",
            r.chart_rank,
            truncate(r.track_name.as_deref().unwrap_or("-"), 28),
            truncate(r.artist.as_deref().unwrap_or("-"), 24),
            r.daily_streams,
            truncate(&r.country, 8),
            r.scrape_date,
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate("Tum Hi Ho", 28), "Tum Hi Ho");
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("तुम ही हो तुम ही हो", 6), "तुम...");
        assert_eq!(truncate("abcdefgh", 6), "abc...");
    }

    #[test]
    fn cli_defaults_to_run() {
        let cli = Cli::try_parse_from(["chart_loader"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());

        let cli = Cli::try_parse_from(["chart_loader", "show", "-n", "3", "--config", "c.toml"])
            .unwrap();
        assert!(matches!(cli.command, Some(Commands::Show { limit: 3 })));
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
    }
}
