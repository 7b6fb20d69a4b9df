//! CLI entry point for the project rater.
//!
//! Rates a project workbook (score + traffic-light status), logs the board
//! summary and writes the enriched workbook back out.

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use project_rater::config::ScoringPolicy;
use project_rater::fetch::load_workbook;
use project_rater::output::{write_csv, write_xlsx};
use project_rater::process_with;
use project_rater::report::{Summary, log_summary, log_top, top_projects};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "project_rater")]
#[command(about = "Score and prioritize projects from an Excel workbook", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rate the projects of a workbook from a file or URL
    Rate {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Enriched workbook to write
        #[arg(short, long, default_value = "proyectos_con_score.xlsx")]
        output: String,

        /// Optional: also write the enriched table as CSV
        #[arg(long)]
        csv: Option<String>,

        /// Optional: JSON file overriding weights and thresholds
        #[arg(short, long)]
        policy: Option<String>,

        /// Number of projects to list as recommended focus
        #[arg(short, long, default_value_t = 5)]
        top: usize,
    },
    /// Print the effective scoring policy as JSON
    Policy {
        /// Optional: JSON file overriding weights and thresholds
        #[arg(short, long)]
        policy: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/project_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("project_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Rate {
            source,
            output,
            csv,
            policy,
            top,
        } => {
            let policy = load_policy(policy.as_deref())?;
            let bytes = load_workbook(&source).await?;

            // One evaluation date for the whole run
            let today = Local::now().date_naive();
            info!(today = %today, "Rating workbook");

            let table = process_with(&bytes, &policy, today)?;

            log_summary(&Summary::from_table(&table));
            log_top(&top_projects(&table, top));

            write_xlsx(&output, &table)?;
            if let Some(csv_path) = csv {
                write_csv(&csv_path, &table)?;
            }
        }
        Commands::Policy { policy } => {
            let policy = load_policy(policy.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&policy)?);
        }
    }

    Ok(())
}

fn load_policy(path: Option<&str>) -> Result<ScoringPolicy> {
    match path {
        Some(p) => {
            info!(path = p, "Loading scoring policy");
            ScoringPolicy::load(p)
        }
        None => Ok(ScoringPolicy::default()),
    }
}
