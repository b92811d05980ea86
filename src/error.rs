//! Error types and handling for surveymerge
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Every error maps to one of two envelope classes: client-input failures
//! (status 400) and internal failures (status 500). Unparseable input CSV is
//! deliberately classed as internal: it stems from upstream data and the
//! function cannot tell caller error apart from data corruption.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for surveymerge operations
#[derive(Error, Diagnostic, Debug)]
pub enum MergeError {
    // Configuration errors
    #[error("Required environment variable '{name}' is not set")]
    #[diagnostic(
        code(surveymerge::config::missing),
        help("Set the variable to the bucket directory, or pass --bucket")
    )]
    ConfigMissing { name: String },

    #[error("Failed to read policy file: {path}")]
    #[diagnostic(code(surveymerge::policy::read_failed))]
    PolicyReadFailed { path: String, reason: String },

    #[error("Failed to parse policy file: {path}")]
    #[diagnostic(
        code(surveymerge::policy::parse_failed),
        help("Policy files are YAML with optional keys: mode, key_renames, raw_prefix")
    )]
    PolicyParseFailed { path: String, reason: String },

    #[error("Invalid rename spec: {spec}")]
    #[diagnostic(
        code(surveymerge::policy::invalid_rename),
        help("Rename specs take the form OLD=NEW, e.g. 'Homeless ID=HID'")
    )]
    InvalidRenameSpec { spec: String },

    // Validation errors
    #[error("Join key column '{column}' is missing from {dataset}")]
    #[diagnostic(
        code(surveymerge::merge::key_missing),
        help("Check the dataset header row, or run with --lenient to outer-join anyway")
    )]
    KeyColumnMissing { column: String, dataset: String },

    // Event errors
    #[error("Failed to parse invocation event: {reason}")]
    #[diagnostic(
        code(surveymerge::event::parse_failed),
        help("Events are JSON of the form {{\"records\": [{{\"key\": \"...\"}}]}}")
    )]
    EventParseFailed { reason: String },

    #[error("Failed to read event file: {path}")]
    #[diagnostic(code(surveymerge::event::read_failed))]
    EventReadFailed { path: String, reason: String },

    // Schema errors
    #[error("Object '{key}' is not parseable as CSV: {reason}")]
    #[diagnostic(code(surveymerge::table::parse_failed))]
    CsvParseFailed { key: String, reason: String },

    #[error("Failed to serialize merged dataset: {reason}")]
    #[diagnostic(code(surveymerge::table::encode_failed))]
    CsvEncodeFailed { reason: String },

    // Storage errors
    #[error("Object not found: {key}")]
    #[diagnostic(code(surveymerge::storage::not_found))]
    ObjectNotFound { key: String },

    #[error("Failed to read object '{key}': {reason}")]
    #[diagnostic(code(surveymerge::storage::read_failed))]
    StorageReadFailed { key: String, reason: String },

    #[error("Failed to write object '{key}': {reason}")]
    #[diagnostic(code(surveymerge::storage::write_failed))]
    StorageWriteFailed { key: String, reason: String },

    // Anything else caught at the invocation boundary
    #[error("IO error: {message}")]
    #[diagnostic(code(surveymerge::io_error))]
    IoError { message: String },

    #[error("Internal error: {message}")]
    #[diagnostic(code(surveymerge::internal))]
    Internal { message: String },
}

impl MergeError {
    /// Envelope status for this error: 400 for client-input failures,
    /// 500 for everything else.
    pub fn status_code(&self) -> u16 {
        match self {
            MergeError::ConfigMissing { .. }
            | MergeError::PolicyReadFailed { .. }
            | MergeError::PolicyParseFailed { .. }
            | MergeError::InvalidRenameSpec { .. }
            | MergeError::KeyColumnMissing { .. }
            | MergeError::EventParseFailed { .. }
            | MergeError::EventReadFailed { .. } => 400,
            _ => 500,
        }
    }
}

impl From<std::io::Error> for MergeError {
    fn from(err: std::io::Error) -> Self {
        MergeError::IoError {
            message: err.to_string(),
        }
    }
}

// Convenience constructors

pub fn config_missing(name: impl Into<String>) -> MergeError {
    MergeError::ConfigMissing { name: name.into() }
}

pub fn key_column_missing(column: impl Into<String>, dataset: impl Into<String>) -> MergeError {
    MergeError::KeyColumnMissing {
        column: column.into(),
        dataset: dataset.into(),
    }
}

pub fn event_parse_failed(reason: impl Into<String>) -> MergeError {
    MergeError::EventParseFailed {
        reason: reason.into(),
    }
}

pub fn csv_parse_failed(key: impl Into<String>, reason: impl Into<String>) -> MergeError {
    MergeError::CsvParseFailed {
        key: key.into(),
        reason: reason.into(),
    }
}

pub fn csv_encode_failed(reason: impl Into<String>) -> MergeError {
    MergeError::CsvEncodeFailed {
        reason: reason.into(),
    }
}

pub fn object_not_found(key: impl Into<String>) -> MergeError {
    MergeError::ObjectNotFound { key: key.into() }
}

pub fn storage_read_failed(key: impl Into<String>, reason: impl Into<String>) -> MergeError {
    MergeError::StorageReadFailed {
        key: key.into(),
        reason: reason.into(),
    }
}

pub fn storage_write_failed(key: impl Into<String>, reason: impl Into<String>) -> MergeError {
    MergeError::StorageWriteFailed {
        key: key.into(),
        reason: reason.into(),
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, MergeError>;
