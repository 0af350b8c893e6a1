// ⚠️ Error Types - Startup and print failures
// Resolver outcomes are NOT errors; they live in resolver::Resolution

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// LOAD ERRORS (fatal at startup)
// ============================================================================

/// Failure while loading the catalog or the corrections file.
///
/// Every variant is fatal: the station must not start with partial data,
/// since that could print blank or wrong labels.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot open '{path}': {source}")]
    Unreachable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("'{path}' is not valid UTF-8 text")]
    Encoding { path: PathBuf },

    #[error("'{path}' is empty (no header line)")]
    MissingHeader { path: PathBuf },

    #[error("'{path}' has no '{column}' column in its header")]
    MissingColumn { path: PathBuf, column: String },

    #[error("'{path}' line {line}: {reason}")]
    MalformedRow {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("'{path}' line {line}: barcode {barcode} appears more than once")]
    DuplicateBarcode {
        path: PathBuf,
        line: usize,
        barcode: String,
    },

    #[error("'{path}' line {line}: a rule for {barcode} already exists")]
    DuplicateRule {
        path: PathBuf,
        line: usize,
        barcode: String,
    },

    #[error("Failed to read '{path}': {source}")]
    Csv { path: PathBuf, source: csv::Error },
}

impl LoadError {
    /// Title/message pair for the blocking startup dialog
    pub fn operator_message(&self) -> (&'static str, String) {
        match self {
            LoadError::Unreachable { .. } => ("Missing file", self.to_string()),
            LoadError::Encoding { .. } => ("Unreadable file", self.to_string()),
            _ => ("Invalid data file", self.to_string()),
        }
    }
}

pub type LoadResult<T> = Result<T, LoadError>;

// ============================================================================
// PRINT ERRORS (recoverable)
// ============================================================================

#[derive(Error, Debug)]
pub enum PrintError {
    #[error("No item selected")]
    NothingSelected,

    #[error("No label artwork for {barcode} at '{path}': {source}")]
    MissingArtwork {
        barcode: String,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Printer command '{program}' could not be started: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("Printer command '{program}' failed with {status}: {stderr}")]
    Rejected {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("Cannot write print output to '{path}': {source}")]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Copy count must be between 1 and {max}, got {requested}")]
    CopyCount { requested: u32, max: u32 },
}
