//! End-to-end orchestration of the repair, parse, validate, and transform
//! stages.
//!
//! The pipeline is a single synchronous pass: raw text → repair → parse →
//! per-record validation → denormalization → dimension extraction. Fatal
//! errors (unreadable input, residual parse failure, an empty valid set)
//! abort the run; per-record validation failures accumulate in the report.

use std::fs;
use std::path::Path;

use tracing::{error, info, warn};

use crate::constants::reporting::REPAIR_DETAIL_LIMIT;
use crate::dimensions::{extract_dimensions, DimensionSet};
use crate::errors::EtlError;
use crate::metrics::{summarize, RunSummary};
use crate::parse::{error_context, parse_records};
use crate::repair::{repair, RepairLogEntry, RepairOutcome};
use crate::transform::{denormalize, FactRowSet};
use crate::validate::{validate_batch, BatchOptions, ValidationFailure};

/// Everything produced by one pipeline run.
#[derive(Debug)]
pub struct PipelineReport {
    /// Fixes applied by the text repair engine, in application order.
    pub repairs: Vec<RepairLogEntry>,
    /// Rejected records with per-field detail, in input order.
    pub failures: Vec<ValidationFailure>,
    /// Flattened fact rows.
    pub facts: FactRowSet,
    /// Distinct categorical values for reference tables.
    pub dimensions: DimensionSet,
    /// Aggregate run counters.
    pub summary: RunSummary,
}

/// Run the full pipeline over raw text already in memory.
pub fn run_pipeline(raw: &str, options: &BatchOptions) -> Result<PipelineReport, EtlError> {
    let RepairOutcome { text, fixes } = repair(raw);
    if !fixes.is_empty() {
        warn!(fixes = fixes.len(), "input text required repair");
        for fix in fixes.iter().take(REPAIR_DETAIL_LIMIT) {
            warn!(rule = fix.rule, "{}", fix.description);
        }
        if fixes.len() > REPAIR_DETAIL_LIMIT {
            warn!(
                omitted = fixes.len() - REPAIR_DETAIL_LIMIT,
                "further repairs not shown"
            );
        }
    }

    let records = match parse_records(&text) {
        Ok(records) => records,
        Err(parse_error) => {
            if let EtlError::Parse { line, .. } = &parse_error {
                error!(
                    "text failed to parse after repair:\n{}",
                    error_context(&text, *line)
                );
            }
            return Err(parse_error);
        }
    };
    info!(records = records.len(), "parsed record batch");

    let outcome = validate_batch(&records, options)?;
    info!(
        valid = outcome.valid.len(),
        rejected = outcome.failures.len(),
        "validation complete"
    );
    if outcome.valid.is_empty() {
        return Err(EtlError::EmptyValidSet);
    }

    let facts = denormalize(&outcome.valid);
    let dimensions = extract_dimensions(&facts.properties);
    let summary = summarize(
        records.len(),
        fixes.len(),
        outcome.valid.len(),
        outcome.failures.len(),
        &facts,
        &dimensions,
    );
    Ok(PipelineReport {
        repairs: fixes,
        failures: outcome.failures,
        facts,
        dimensions,
        summary,
    })
}

/// Read a raw input file and run the pipeline over its contents.
pub fn run_pipeline_from_path(path: &Path, options: &BatchOptions) -> Result<PipelineReport, EtlError> {
    let raw = fs::read_to_string(path).map_err(|source| EtlError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = raw.len(), "loaded raw input");
    run_pipeline(&raw, options)
}
