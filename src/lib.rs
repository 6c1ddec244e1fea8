#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Reusable runner shared by the `run-etl` binary.
pub mod app;
/// Environment-driven pipeline configuration.
pub mod config;
/// Grouped static tables used across repair, coercion, and reporting.
pub mod constants;
/// Distinct-value dimension extraction.
pub mod dimensions;
mod errors;
/// Run summary statistics.
pub mod metrics;
/// Structured-parser boundary producing the generic value tree.
pub mod parse;
/// End-to-end pipeline orchestration.
pub mod pipeline;
/// Rule-based text repair for malformed exports.
pub mod repair;
/// Typed property records and declarative field tables.
pub mod schema;
/// Storage collaborator boundary and built-in sinks.
pub mod sink;
/// Denormalization into relational row sets.
pub mod transform;
/// Shared type aliases.
pub mod types;
/// Schema validation and coercion.
pub mod validate;

pub use config::EtlConfig;
pub use dimensions::{extract_dimensions, DimensionSet};
pub use errors::EtlError;
pub use metrics::{summarize, RunSummary};
pub use parse::parse_records;
pub use pipeline::{run_pipeline, run_pipeline_from_path, PipelineReport};
pub use repair::{repair, RepairLogEntry, RepairOutcome};
pub use schema::{FieldKind, FieldSpec, HoaRecord, Property, RehabRecord, TriState, ValuationRecord};
pub use sink::{FactSink, JsonFileSink, MemorySink};
pub use transform::{denormalize, FactRowSet, HoaRow, PropertyRow, RehabRow, ValuationRow};
pub use types::{FieldPath, PropertyId, RecordIndex, RuleName};
pub use validate::{
    validate_batch, validate_record, BatchOptions, BatchOutcome, FieldError, ValidationFailure,
};
