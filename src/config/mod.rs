use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::models::ModelMetrics;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_source")]
    pub source: SourceConfig,
    #[serde(default = "default_chart")]
    pub chart: ChartConfig,
    #[serde(default = "default_metrics")]
    pub metrics: MetricsConfig,
}

/// Dashboard backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Text chart dimensions
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChartConfig {
    #[serde(default = "default_width")]
    pub width: usize,

    #[serde(default = "default_height")]
    pub height: usize,
}

/// Static forecast accuracy figures
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default = "default_rmse")]
    pub rmse: f64,

    #[serde(default = "default_mae")]
    pub mae: f64,
}

impl MetricsConfig {
    pub fn model_metrics(&self) -> ModelMetrics {
        ModelMetrics {
            rmse: self.rmse,
            mae: self.mae,
        }
    }
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    "brent-dashboard/0.1 (oil price event dashboard)".to_string()
}
fn default_width() -> usize {
    72
}
fn default_height() -> usize {
    16
}
fn default_rmse() -> f64 {
    2.5
}
fn default_mae() -> f64 {
    1.8
}
fn default_source() -> SourceConfig {
    SourceConfig {
        base_url: default_base_url(),
        timeout_secs: default_timeout_secs(),
        user_agent: default_user_agent(),
    }
}
fn default_chart() -> ChartConfig {
    ChartConfig {
        width: default_width(),
        height: default_height(),
    }
}
fn default_metrics() -> MetricsConfig {
    MetricsConfig {
        rmse: default_rmse(),
        mae: default_mae(),
    }
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("DASHBOARD").separator("__"))
            .build()?;

        Ok(Self::from_config(cfg))
    }

    fn from_config(cfg: config::Config) -> Self {
        cfg.try_deserialize().unwrap_or_else(|e| {
            tracing::warn!("Unusable configuration ({}), falling back to defaults", e);
            AppConfig::default()
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            chart: default_chart(),
            metrics: default_metrics(),
        }
    }
}
