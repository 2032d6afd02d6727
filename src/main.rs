//! CLI entry point for the course feedback aggregator.
//!
//! Loads the survey export once, then prints one of the aggregated views as
//! JSON or exports all of them to a directory.

use anyhow::Result;
use clap::{Parser, Subcommand};
use course_feedback::analyzers::types::Field;
use course_feedback::config::{STATS_PRECISION, SurveyConfig};
use course_feedback::dataset::Dataset;
use course_feedback::fetch::BasicClient;
use course_feedback::output::{export_all, to_json, write_overview_csv};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEFAULT_DATA_PATH: &str = "data/fidbek po istorii.json";

#[derive(Parser)]
#[command(name = "course_feedback")]
#[command(about = "Aggregate course feedback surveys into lecturer statistics", long_about = None)]
struct Cli {
    /// Survey export to load: a path or an http(s) URL [env: FEEDBACK_DATA_PATH]
    #[arg(long, global = true, value_name = "FILE_OR_URL")]
    data: Option<String>,

    /// JSON file overriding question texts and subject tables
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the lecturer overview list
    Lecturers {
        /// Also write the overview to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Print the full review feed
    Reviews {
        /// Print only the reviews grouped by subject
        #[arg(long, default_value_t = false)]
        by_subject: bool,
    },
    /// Print one lecturer's responses and practitioners
    Lecturer {
        /// Exact lecturer name
        name: String,
    },
    /// Print per-teacher statistics
    Stats {
        /// Decimal places for the averages
        #[arg(short, long, default_value_t = STATS_PRECISION)]
        precision: u32,
    },
    /// Print group sizes for a canonical field (e.g. lecturer, subject, practitioner)
    Group {
        field: Field,
    },
    /// Write every view and a reloadable dataset to a directory
    Export {
        #[arg(short, long, default_value = "export")]
        out_dir: PathBuf,

        /// Gzip-compress the exported dataset
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/course_feedback.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("course_feedback.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SurveyConfig::load(path)?,
        None => SurveyConfig::default(),
    };
    let source = cli
        .data
        .or_else(|| std::env::var("FEEDBACK_DATA_PATH").ok())
        .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());

    let client = BasicClient::new()?;
    let dataset = Dataset::load(&client, &source, config).await?;

    match cli.command {
        Commands::Lecturers { csv } => {
            let rows = dataset.overview();
            if let Some(path) = csv {
                write_overview_csv(&path, &rows)?;
                info!(path = %path.display(), rows = rows.len(), "Overview CSV written");
            }
            println!("{}", to_json(&rows)?);
        }
        Commands::Reviews { by_subject } => {
            let feed = dataset.review_feed();
            if by_subject {
                println!("{}", to_json(&feed.by_subject)?);
            } else {
                println!("{}", to_json(&feed)?);
            }
        }
        Commands::Lecturer { name } => match dataset.lecturer_detail(&name) {
            Ok(detail) => println!("{}", to_json(&detail)?),
            Err(e) => {
                warn!(name = %name, "Lecturer lookup failed");
                return Err(e.into());
            }
        },
        Commands::Stats { precision } => {
            let stats = if precision == STATS_PRECISION {
                dataset.teacher_stats().clone()
            } else {
                dataset.teacher_stats_with_precision(precision)
            };
            println!("{}", to_json(&stats)?);
        }
        Commands::Group { field } => {
            let group = dataset.group_by(field);
            info!(
                %field,
                groups = group.len(),
                records = group.total_records(),
                "Grouping summary"
            );
            println!("{}", to_json(&group.sizes())?);
        }
        Commands::Export { out_dir, gzip } => {
            let manifest = export_all(&out_dir, &dataset, gzip)?;
            println!("{}", to_json(&manifest)?);
        }
    }

    Ok(())
}
