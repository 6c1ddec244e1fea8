//! Reusable runner shared by the `run-etl` binary.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::EtlConfig;
use crate::constants::reporting::FAILURE_DETAIL_LIMIT;
use crate::pipeline::{run_pipeline_from_path, PipelineReport};
use crate::sink::{FactSink, JsonFileSink};

#[derive(Debug, Parser)]
#[command(
    name = "run-etl",
    disable_help_subcommand = true,
    about = "Repair, validate, and flatten property records",
    long_about = "Run the repair, validate, and normalize pipeline over a raw \
                  property-records file and optionally export the resulting fact \
                  rows and dimension sets as JSON.",
    after_help = "Settings resolve in order: explicit flag, environment variable \
                  (JSON_INPUT_FILE, MAX_RECORDS, SKIP_INVALID, BATCH_SIZE), then default."
)]
struct EtlCli {
    #[arg(
        long,
        value_name = "FILE",
        help = "Raw input file (overrides JSON_INPUT_FILE)"
    )]
    input: Option<PathBuf>,
    #[arg(
        long,
        value_name = "N",
        help = "Process only the first N records (0 = unlimited)"
    )]
    max_records: Option<usize>,
    #[arg(long, help = "Abort on the first rejected record")]
    stop_on_first_failure: bool,
    #[arg(
        long,
        value_name = "DIR",
        help = "Directory to receive facts.json and dimensions.json"
    )]
    out_dir: Option<PathBuf>,
}

/// Entry point for the `run-etl` binary.
pub fn run_etl_app() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = EtlCli::parse();
    let mut config = EtlConfig::from_env()?;
    if let Some(input) = cli.input {
        config.input_file = input;
    }
    if let Some(max_records) = cli.max_records {
        config.max_records = max_records;
    }
    if cli.stop_on_first_failure {
        config.skip_invalid = false;
    }
    info!(
        input = %config.input_file.display(),
        max_records = config.max_records,
        skip_invalid = config.skip_invalid,
        batch_size = config.batch_size,
        "configuration resolved"
    );

    let report = run_pipeline_from_path(&config.input_file, &config.batch_options())?;
    log_report(&report);

    if let Some(out_dir) = cli.out_dir {
        let mut sink = JsonFileSink::new(&out_dir);
        sink.store_facts(&report.facts)?;
        sink.store_dimensions(&report.dimensions)?;
        info!(directory = %out_dir.display(), "facts and dimensions exported");
    }
    Ok(())
}

fn log_report(report: &PipelineReport) {
    let summary = &report.summary;
    info!(
        valid = summary.valid_records,
        rejected = summary.failed_records,
        repairs = summary.repairs_applied,
        "extract complete"
    );
    info!(
        properties = summary.property_rows,
        valuations = summary.valuation_rows,
        hoa_fees = summary.hoa_rows,
        rehab_assessments = summary.rehab_rows,
        "fact tables built"
    );
    info!(
        markets = summary.distinct_markets,
        sources = summary.distinct_sources,
        property_types = summary.distinct_property_types,
        layouts = summary.distinct_layouts,
        "dimension sets built"
    );
    for failure in report.failures.iter().take(FAILURE_DETAIL_LIMIT) {
        if let Some(first) = failure.errors.first() {
            warn!(
                record = failure.record_index,
                errors = failure.errors.len(),
                field = %first.field,
                "{}",
                first.message
            );
        }
    }
    if report.failures.len() > FAILURE_DETAIL_LIMIT {
        warn!(
            omitted = report.failures.len() - FAILURE_DETAIL_LIMIT,
            "further rejected records not shown"
        );
    }
}
