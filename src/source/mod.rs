pub mod http_client;

use crate::config::SourceConfig;
use crate::error::SourceError;
use crate::models::{RawForecastRecord, RawRecord};
use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use self::http_client::HttpClient;

pub const HISTORY_ENDPOINT: &str = "/api/data/merged_oil_price_history";
pub const FORECAST_ENDPOINT: &str = "/api/data/forecast";

// ── Source trait ──────────────────────────────────────────────────────────────

/// Swappable data source abstraction. Each call is one independent fetch.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_history(&self) -> Result<Vec<RawRecord>, SourceError>;
    async fn fetch_forecast(&self) -> Result<Vec<RawForecastRecord>, SourceError>;
}

// ── Dashboard backend over HTTP ───────────────────────────────────────────────

pub struct HttpSource {
    client: HttpClient,
}

impl HttpSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(config)?,
        })
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch_history(&self) -> Result<Vec<RawRecord>, SourceError> {
        let rows: Vec<RawRecord> = self.client.get_json(HISTORY_ENDPOINT).await?;
        info!("History endpoint: {} rows", rows.len());
        Ok(rows)
    }

    async fn fetch_forecast(&self) -> Result<Vec<RawForecastRecord>, SourceError> {
        let rows: Vec<RawForecastRecord> = self.client.get_json(FORECAST_ENDPOINT).await?;
        info!("Forecast endpoint: {} rows", rows.len());
        Ok(rows)
    }
}

// ── Local JSON exports ────────────────────────────────────────────────────────

/// Reads the same two JSON arrays the backend serves, from disk.
pub struct FileSource {
    history: PathBuf,
    forecast: PathBuf,
}

impl FileSource {
    pub fn new(history: impl Into<PathBuf>, forecast: impl Into<PathBuf>) -> Self {
        Self {
            history: history.into(),
            forecast: forecast.into(),
        }
    }
}

async fn load_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, SourceError> {
    debug!("Loading {:?}", path);
    let body = tokio::fs::read(path).await.map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows: Vec<T> = serde_json::from_slice(&body)?;
    info!("{:?}: {} rows loaded", path, rows.len());
    Ok(rows)
}

#[async_trait]
impl DataSource for FileSource {
    async fn fetch_history(&self) -> Result<Vec<RawRecord>, SourceError> {
        load_json_array(&self.history).await
    }

    async fn fetch_forecast(&self) -> Result<Vec<RawForecastRecord>, SourceError> {
        load_json_array(&self.forecast).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn json_file(body: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(body.as_bytes()).unwrap();
        f
    }

    #[tokio::test]
    async fn test_file_source_reads_both_arrays() {
        let history = json_file(
            r#"[{"Date":"2020-01-01","Price":50,"event_type":"OPEC"},
                {"Date":"bad-date","Price":99,"event_type":"X"}]"#,
        );
        let forecast = json_file(r#"[{"Date":"2024-01-01","PredictedPrice":80.5}]"#);
        let source = FileSource::new(history.path(), forecast.path());

        let rows = tokio_test::assert_ok!(source.fetch_history().await);
        assert_eq!(rows.len(), 2);
        let rows = tokio_test::assert_ok!(source.fetch_forecast().await);
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let source = FileSource::new("/nonexistent/history.json", "/nonexistent/forecast.json");
        let err = tokio_test::assert_err!(source.fetch_history().await);
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[tokio::test]
    async fn test_file_source_rejects_non_array() {
        let history = json_file(r#"{"Date":"2020-01-01"}"#);
        let source = FileSource::new(history.path(), history.path());
        let err = tokio_test::assert_err!(source.fetch_history().await);
        assert!(matches!(err, SourceError::Decode(_)));
    }
}
