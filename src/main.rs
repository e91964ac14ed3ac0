mod config;
mod controller;
mod error;
mod filter;
mod forecast;
mod models;
mod parser;
mod presenter;
mod source;
mod utils;
mod vocabulary;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::AppConfig;
use crate::controller::{DashboardController, DashboardFrame};
use crate::models::{Category, DateRange, FilterSelection, Timestamp};
use crate::presenter::surface::{render_metrics, ChartSurface, TextSurface};
use crate::source::{DataSource, FileSource, HttpSource};

#[derive(Parser)]
#[command(name = "brent-dashboard", about = "Brent oil price event dashboard", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch both series, apply the filter and draw the charts
    Show {
        /// Inclusive lower date bound (ISO-8601)
        #[arg(long, value_parser = parse_date_arg)]
        from: Option<Timestamp>,

        /// Inclusive upper date bound (ISO-8601)
        #[arg(long, value_parser = parse_date_arg)]
        to: Option<Timestamp>,

        /// Event category to show ("all" for every record)
        #[arg(short, long, default_value = "all")]
        category: String,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// List the event categories present in the price history
    Categories {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Show the forecast model's accuracy figures
    Metrics,
}

#[derive(Args)]
struct SourceArgs {
    /// Read price history from a local JSON export instead of the backend
    #[arg(long, requires = "forecast")]
    history: Option<PathBuf>,

    /// Read the forecast from a local JSON export instead of the backend
    #[arg(long, requires = "history")]
    forecast: Option<PathBuf>,

    /// Backend base URL (overrides config)
    #[arg(long, env = "DASHBOARD_URL")]
    base_url: Option<String>,
}

fn parse_date_arg(s: &str) -> Result<Timestamp, String> {
    parser::parse_timestamp(s).ok_or_else(|| format!("not an ISO-8601 date: {s:?}"))
}

/// Mount a dashboard, wait for both fetches, and take one frame.
async fn load_frame<S: DataSource + 'static>(source: S, selection: FilterSelection) -> DashboardFrame {
    let mut dash = DashboardController::new(Arc::new(source));
    dash.set_range(selection.date_range);
    dash.set_category(selection.category);

    dash.mount();
    dash.settle().await;
    let frame = dash.frame();
    dash.teardown();
    frame
}

async fn fetch_frame(
    config: &AppConfig,
    args: &SourceArgs,
    selection: FilterSelection,
) -> Result<DashboardFrame> {
    if let (Some(history), Some(forecast)) = (&args.history, &args.forecast) {
        return Ok(load_frame(FileSource::new(history, forecast), selection).await);
    }

    let mut source_cfg = config.source.clone();
    if let Some(url) = &args.base_url {
        source_cfg.base_url = url.clone();
    }
    info!("Using backend at {}", source_cfg.base_url);
    Ok(load_frame(HttpSource::new(&source_cfg)?, selection).await)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "brent_dashboard=info,warn",
        1 => "brent_dashboard=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load()?;

    match cli.command {
        Command::Show {
            from,
            to,
            category,
            source,
        } => {
            let mut timer = utils::Timer::start("Dashboard render");
            let selection = FilterSelection::new(DateRange::new(from, to), Category::parse(&category));
            let frame = fetch_frame(&config, &source, selection).await?;
            timer.record(frame.history.points.len() + frame.forecast.points.len());

            let mut surface = TextSurface::new(config.chart.width, config.chart.height);
            surface.draw(&frame.history);
            surface.draw(&frame.forecast);

            println!("─────────────────────────────────");
            println!("  Brent Oil Price Dashboard");
            println!("─────────────────────────────────");
            println!(
                "  Range    : {} → {}",
                frame.selection.date_range.start.map(|d| d.date_naive().to_string()).unwrap_or("—".into()),
                frame.selection.date_range.end.map(|d| d.date_naive().to_string()).unwrap_or("—".into()),
            );
            println!("  Category : {}", frame.selection.category);
            println!("  Options  : {}", frame.categories.join(", "));
            println!("─────────────────────────────────");
            println!("{}", surface.as_str());
            print!("{}", render_metrics(&config.metrics.model_metrics()));
        }

        Command::Categories { source } => {
            let frame = fetch_frame(&config, &source, FilterSelection::default()).await?;
            if frame.categories.len() <= 1 {
                println!("No event categories — the price history is empty or untagged.");
            }
            for c in &frame.categories {
                println!("  {}", c);
            }
        }

        Command::Metrics => {
            print!("{}", render_metrics(&config.metrics.model_metrics()));
        }
    }

    Ok(())
}
