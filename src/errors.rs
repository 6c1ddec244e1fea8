use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::validate::ValidationFailure;

/// Error type for input, parsing, validation, configuration, and storage failures.
///
/// Per-record validation failures are plain values (`ValidationFailure`)
/// accumulated alongside successes; they only surface here, as
/// `RecordRejected`, when the caller asked to stop on the first bad record.
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("failed to read input '{path}': {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("repaired text failed to parse at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("record {} rejected with {} field error(s)", .0.record_index, .0.errors.len())]
    RecordRejected(Box<ValidationFailure>),
    #[error("no records survived validation")]
    EmptyValidSet,
    #[error("storage sink failure: {0}")]
    Storage(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}
