//! Multi-schema CSV parser for vendor geolocation exports
//!
//! This module implements the ingestion front-end: detecting which vendor
//! format a file carries, validating each field, and assembling rows into
//! location or block records for the join and association stages.
//!
//! ## Architecture
//!
//! - [`schema`] - Tagged schema registry with per-variant column tables
//! - [`detector`] - Header-signature format detection
//! - [`field_parsers`] - Pure token-to-value field validators
//! - [`record_parser`] - Per-schema row assembly and discard policies
//! - [`parser`] - Streaming parse loop with column-count enforcement
//! - [`stats`] - Parsing statistics

pub mod detector;
pub mod field_parsers;
pub mod parser;
pub mod record_parser;
pub mod schema;
pub mod stats;

// Re-export main types for easy access
pub use detector::{detect_format, expect_kind, expect_version, DetectedFormat};
pub use parser::parse_rows;
pub use record_parser::{BlockRow, LocationRow, RowData, RowOutcome};
pub use schema::{FileKind, FormatVersion, Schema};
pub use stats::ParseStats;
