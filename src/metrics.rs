use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dimensions::DimensionSet;
use crate::transform::FactRowSet;

/// Aggregate counters describing one pipeline run.
#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    /// Records present in the parsed input (before any cap).
    pub records_seen: usize,
    /// Records that passed validation.
    pub valid_records: usize,
    /// Records rejected by validation.
    pub failed_records: usize,
    /// Fixes applied by the text repair engine.
    pub repairs_applied: usize,
    /// Rows emitted into the `properties` table.
    pub property_rows: usize,
    /// Rows emitted into the `valuations` table.
    pub valuation_rows: usize,
    /// Rows emitted into the `hoa_fees` table.
    pub hoa_rows: usize,
    /// Rows emitted into the `rehab_assessments` table.
    pub rehab_rows: usize,
    /// Distinct market values.
    pub distinct_markets: usize,
    /// Distinct source values.
    pub distinct_sources: usize,
    /// Distinct property-type values.
    pub distinct_property_types: usize,
    /// Distinct layout values.
    pub distinct_layouts: usize,
    /// When the run finished.
    pub completed_at: DateTime<Utc>,
}

/// Build a run summary from pipeline outputs.
pub fn summarize(
    records_seen: usize,
    repairs_applied: usize,
    valid_records: usize,
    failed_records: usize,
    facts: &FactRowSet,
    dimensions: &DimensionSet,
) -> RunSummary {
    RunSummary {
        records_seen,
        valid_records,
        failed_records,
        repairs_applied,
        property_rows: facts.properties.len(),
        valuation_rows: facts.valuations.len(),
        hoa_rows: facts.hoa_fees.len(),
        rehab_rows: facts.rehab_assessments.len(),
        distinct_markets: dimensions.markets.len(),
        distinct_sources: dimensions.sources.len(),
        distinct_property_types: dimensions.property_types.len(),
        distinct_layouts: dimensions.layouts.len(),
        completed_at: Utc::now(),
    }
}
