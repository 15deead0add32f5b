use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Connection failure, timeout, or a non-success status.
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("chart table `{selector}` not found on page")]
    TableNotFound { selector: &'static str },

    #[error("row {row}: rank `{value}` is not an integer")]
    BadRank { row: usize, value: String },

    #[error("{}: record cannot be coerced", path.display())]
    Coerce {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid table name `{0}`")]
    TableName(String),
}
