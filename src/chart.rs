use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder for a missing track or artist name.
pub const UNKNOWN: &str = "Unknown";

const ARTIST_TITLE_SEP: &str = " - ";

/// One row of the daily leaderboard. Field order is the snapshot column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRecord {
    pub chart_rank: i64,
    pub track_name: Option<String>,
    pub artist: Option<String>,
    pub daily_streams: i64,
    pub country: String,
    pub scrape_date: NaiveDate,
}

/// Split "Artist - Title" on the first separator.
/// Without a separator the whole string is the artist.
pub fn split_artist_title(combined: &str) -> (String, String) {
    match combined.split_once(ARTIST_TITLE_SEP) {
        Some((artist, title)) => (artist.to_string(), title.to_string()),
        None => (combined.to_string(), UNKNOWN.to_string()),
    }
}

/// Parse a stream count like "12,345,678".
pub fn parse_streams(raw: &str) -> Option<i64> {
    raw.trim().replace(',', "").parse().ok()
}

/// Empty cells count as missing.
pub fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_on_first_separator() {
        let (artist, title) = split_artist_title("Arijit Singh - Tum Hi Ho");
        assert_eq!(artist, "Arijit Singh");
        assert_eq!(title, "Tum Hi Ho");
    }

    #[test]
    fn split_keeps_later_separators_in_title() {
        let combined = "A - B - Remix";
        let (artist, title) = split_artist_title(combined);
        assert_eq!(artist, "A");
        assert_eq!(title, "B - Remix");
        assert_eq!(format!("{artist} - {title}"), combined);
    }

    #[test]
    fn split_without_separator() {
        let (artist, title) = split_artist_title("SingleName");
        assert_eq!(artist, "SingleName");
        assert_eq!(title, UNKNOWN);

        // a bare hyphen is not the separator
        let (artist, title) = split_artist_title("Jay-Z");
        assert_eq!(artist, "Jay-Z");
        assert_eq!(title, UNKNOWN);
    }

    #[test]
    fn streams_with_thousands_separators() {
        assert_eq!(parse_streams("12,345,678"), Some(12_345_678));
        assert_eq!(parse_streams("987"), Some(987));
        assert_eq!(parse_streams("9,876,543,210"), Some(9_876_543_210));
    }

    #[test]
    fn streams_unparseable() {
        assert_eq!(parse_streams("abc"), None);
        assert_eq!(parse_streams(""), None);
        assert_eq!(parse_streams("1.5"), None);
    }

    #[test]
    fn blank_is_missing() {
        assert_eq!(non_empty("  ".to_string()), None);
        assert_eq!(non_empty("x".to_string()), Some("x".to_string()));
    }
}
