//! Storage collaborator boundary.
//!
//! The pipeline hands finished row sets to a `FactSink`; connection
//! management and bulk-insert mechanics live behind this trait. Implementors
//! must apply each entity type's batch atomically: either every row of a
//! table is stored or none are, with failure reported via `EtlError::Storage`.

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::dimensions::DimensionSet;
use crate::errors::EtlError;
use crate::transform::FactRowSet;

/// Destination for denormalized fact rows and dimension values.
pub trait FactSink {
    /// Store all four fact-row batches.
    fn store_facts(&mut self, facts: &FactRowSet) -> Result<(), EtlError>;
    /// Store distinct dimension values for reference/lookup tables.
    fn store_dimensions(&mut self, dimensions: &DimensionSet) -> Result<(), EtlError>;
}

/// Sink that retains everything in memory; used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    /// Last stored row sets.
    pub facts: Option<FactRowSet>,
    /// Last stored dimension sets.
    pub dimensions: Option<DimensionSet>,
}

impl FactSink for MemorySink {
    fn store_facts(&mut self, facts: &FactRowSet) -> Result<(), EtlError> {
        self.facts = Some(facts.clone());
        Ok(())
    }

    fn store_dimensions(&mut self, dimensions: &DimensionSet) -> Result<(), EtlError> {
        self.dimensions = Some(dimensions.clone());
        Ok(())
    }
}

/// Sink that serializes row sets and dimensions as JSON files under one
/// directory (`facts.json`, `dimensions.json`).
#[derive(Debug)]
pub struct JsonFileSink {
    directory: PathBuf,
}

impl JsonFileSink {
    /// Create a sink writing into `directory` (created on first store).
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn write(&self, filename: &str, payload: &impl serde::Serialize) -> Result<(), EtlError> {
        fs::create_dir_all(&self.directory)?;
        let rendered = serde_json::to_string_pretty(payload)
            .map_err(|error| EtlError::Storage(error.to_string()))?;
        let path = self.directory.join(filename);
        fs::write(&path, rendered)?;
        info!(path = %path.display(), "sink file written");
        Ok(())
    }
}

impl FactSink for JsonFileSink {
    fn store_facts(&mut self, facts: &FactRowSet) -> Result<(), EtlError> {
        info!(
            properties = facts.properties.len(),
            valuations = facts.valuations.len(),
            hoa_fees = facts.hoa_fees.len(),
            rehab_assessments = facts.rehab_assessments.len(),
            "storing fact rows"
        );
        self.write("facts.json", facts)
    }

    fn store_dimensions(&mut self, dimensions: &DimensionSet) -> Result<(), EtlError> {
        self.write("dimensions.json", dimensions)
    }
}
