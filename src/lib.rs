//! GeoIP Loader Library
//!
//! A Rust library for building an address-to-geolocation lookup store from
//! vendor CSV exports (MaxMind GeoLite v1, MaxMind GeoLite2 v2, NetAcuity edge).
//!
//! This library provides tools for:
//! - Detecting vendor CSV formats from their header signatures
//! - Streaming multi-schema CSV parsing with per-field validation
//! - Joining locations files against blocks files (shared and merge strategies)
//! - Decomposing inclusive address ranges into minimal CIDR prefix covers
//! - Registering finished records with a prefix-indexed lookup store

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod csv_parser;
        pub mod prefix_ranges;
        pub mod prefix_store;
        pub mod provider;
        pub mod record_registry;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{Coverage, GeoRecord, IpRange, Prefix, ProviderKind};
pub use config::LoadConfig;

/// Result type alias for the GeoIP loader
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for GeoIP loading operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Bad arguments or unusable input file set, detected before parsing
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// No known header signature matched (covers empty files)
    #[error("Unrecognized file format in '{file}': no known header signature found")]
    UnrecognizedFormat { file: String },

    /// Recognized file that cannot be used here (wrong kind, mixed versions)
    #[error("Format error in '{file}': {message}")]
    Format { file: String, message: String },

    /// CSV grammar error from the underlying reader
    #[error("CSV parsing error in '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Row-level hard error (wrong column count, bad range)
    #[error("Row error in '{file}' line {line}: {message}")]
    Row {
        file: String,
        line: u64,
        message: String,
    },

    /// Cell-level hard error (malformed or out-of-range token)
    #[error("Cell error in '{file}' line {line} column {column}: {message}")]
    Cell {
        file: String,
        line: u64,
        column: usize,
        message: String,
    },

    /// A blocks row referenced a location identifier that was never parsed
    #[error("Unresolved location id {key} in '{file}' line {line}")]
    JoinKeyNotFound { file: String, line: u64, key: u32 },

    /// Two records were committed with the same identifier
    #[error("Duplicate record identifier: {id}")]
    DuplicateRecordId { id: u32 },

    /// Record identifier 0 is reserved as "no record"
    #[error("Record identifier 0 is reserved")]
    ReservedRecordId,

    /// The prefix store rejected an association
    #[error("Prefix association failed: {message}")]
    Association { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an unrecognized-format error
    pub fn unrecognized_format(file: impl Into<String>) -> Self {
        Self::UnrecognizedFormat { file: file.into() }
    }

    /// Create a format error
    pub fn format(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Format {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a row-level error
    pub fn row(file: impl Into<String>, line: u64, message: impl Into<String>) -> Self {
        Self::Row {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a cell-level error
    pub fn cell(
        file: impl Into<String>,
        line: u64,
        column: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::Cell {
            file: file.into(),
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a join lookup failure
    pub fn join_key_not_found(file: impl Into<String>, line: u64, key: u32) -> Self {
        Self::JoinKeyNotFound {
            file: file.into(),
            line,
            key,
        }
    }

    /// Create an association failure
    pub fn association(message: impl Into<String>) -> Self {
        Self::Association {
            message: message.into(),
        }
    }
}
