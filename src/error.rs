//! Fetch-side errors. None of these are fatal: the controller logs them and
//! leaves the affected series empty.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("payload is not a JSON array of records: {0}")]
    Decode(#[from] serde_json::Error),
}
