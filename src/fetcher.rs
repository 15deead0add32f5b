use std::sync::LazyLock;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use tracing::info;

use crate::chart::{self, ChartRecord};
use crate::error::PipelineError;
use crate::settings::Settings;
use crate::snapshot;

const TABLE_SELECTOR: &str = "table.sortable";
const MIN_CELLS: usize = 6;

const RANK_CELL: usize = 0;
const ARTIST_TITLE_CELL: usize = 2;
const STREAMS_CELL: usize = 5;

static TABLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse(TABLE_SELECTOR).unwrap());
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());

/// Parsed chart plus counts of what was dropped or defaulted on the way.
#[derive(Debug)]
pub struct ChartPage {
    pub records: Vec<ChartRecord>,
    pub skipped_rows: usize,
    pub zeroed_streams: usize,
}

/// Fetch, parse and snapshot today's chart.
pub async fn fetch_chart(settings: &Settings) -> Result<Vec<ChartRecord>> {
    println!("Scraping chart from {}...", settings.source_url);

    let html = fetch_page(settings).await?;
    let scrape_date = chrono::Local::now().date_naive();
    let page = parse_chart(&html, &settings.country, scrape_date)?;
    info!(
        "Parsed {} records ({} short rows skipped, {} stream counts defaulted to 0)",
        page.records.len(),
        page.skipped_rows,
        page.zeroed_streams
    );

    snapshot::write_records(&settings.raw_snapshot, &page.records)?;
    println!("Raw data saved: {}", settings.raw_snapshot.display());

    Ok(page.records)
}

/// One GET, no retry. Non-success statuses are errors.
pub async fn fetch_page(settings: &Settings) -> Result<String> {
    let url = &settings.source_url;
    let transport = |source: reqwest::Error| PipelineError::Transport {
        url: url.clone(),
        source,
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()
        .map_err(transport)?;

    let start = Instant::now();
    let body = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(transport)?
        .text()
        .await
        .map_err(transport)?;

    info!(
        "Fetched {} bytes from {} in {}ms",
        body.len(),
        url,
        start.elapsed().as_millis()
    );
    Ok(body)
}

/// Extract chart rows from the page's sortable table. The first row is the header.
pub fn parse_chart(
    html: &str,
    country: &str,
    scrape_date: NaiveDate,
) -> Result<ChartPage, PipelineError> {
    let doc = Html::parse_document(html);
    let table = doc
        .select(&TABLE)
        .next()
        .ok_or(PipelineError::TableNotFound {
            selector: TABLE_SELECTOR,
        })?;

    let mut page = ChartPage {
        records: Vec::new(),
        skipped_rows: 0,
        zeroed_streams: 0,
    };

    for (idx, row) in table.select(&ROW).enumerate().skip(1) {
        let cells: Vec<String> = row.select(&CELL).map(cell_text).collect();
        if cells.len() < MIN_CELLS {
            page.skipped_rows += 1;
            continue;
        }

        let rank_text = &cells[RANK_CELL];
        let chart_rank = rank_text
            .parse::<i64>()
            .map_err(|_| PipelineError::BadRank {
                row: idx,
                value: rank_text.clone(),
            })?;

        let (artist, track_name) = chart::split_artist_title(&cells[ARTIST_TITLE_CELL]);
        let daily_streams = chart::parse_streams(&cells[STREAMS_CELL]).unwrap_or_else(|| {
            page.zeroed_streams += 1;
            0
        });

        page.records.push(ChartRecord {
            chart_rank,
            track_name: chart::non_empty(track_name),
            artist: chart::non_empty(artist),
            daily_streams,
            country: country.to_string(),
            scrape_date,
        });
    }

    Ok(page)
}

fn cell_text(cell: ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}
