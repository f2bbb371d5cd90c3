//! Measurement upload checker
//!
//! Validates a tab-delimited measurement metadata sheet against a JSON fixture
//! of known sample codes and instrument CURIEs.
//!
//! **Usage:**
//! ```bash
//! batchgrid upload.tsv --fixture known.json [--config engine.json] [--json]
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use batchgrid::config::EngineConfig;
use batchgrid::source::{MemoryStore, StoreFixture};
use batchgrid::upload::{validate_measurement_upload, Sheet, UploadReport};

/// Validate a measurement metadata upload
#[derive(Parser, Debug)]
#[command(name = "batchgrid", version)]
#[command(about = "Validate a tab-delimited measurement metadata upload")]
struct Args {
    /// Tab-delimited upload, first line is the header
    #[arg(value_name = "TSV")]
    upload: PathBuf,

    /// JSON fixture with known `samples` and `instruments`
    #[arg(long, value_name = "FILE")]
    fixture: Option<PathBuf>,

    /// JSON engine configuration
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let fixture: StoreFixture = match &args.fixture {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening fixture {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("parsing fixture {}", path.display()))?
        }
        None => StoreFixture::default(),
    };
    info!(
        samples = fixture.samples.len(),
        instruments = fixture.instruments.len(),
        "loaded fixture"
    );

    let file = File::open(&args.upload)
        .with_context(|| format!("opening upload {}", args.upload.display()))?;
    let sheet = Sheet::read(BufReader::new(file))
        .with_context(|| format!("reading upload {}", args.upload.display()))?;

    let store = Arc::new(MemoryStore::from_fixture(&fixture));
    let report = validate_measurement_upload(&sheet, store, &config).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&sheet, &report);
    }

    Ok(if report.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_report(sheet: &Sheet, report: &UploadReport) {
    println!("=== {} upload ===\n", report.domain());
    for (row, row_report) in sheet.rows().iter().zip(report.rows()) {
        for failure in row_report.failures() {
            println!("line {:>4}  FAIL  {failure}", row.line());
        }
        for warning in row_report.warnings() {
            println!("line {:>4}  WARN  {warning}", row.line());
        }
    }
    let summary = report.summary();
    println!(
        "\n{} validated, {} failures, {} warnings",
        summary.validated_entries(),
        summary.failures().len(),
        summary.warnings().len()
    );
    if sheet.has_no_data() {
        for failure in summary.failures() {
            println!("{failure}");
        }
    }
}
