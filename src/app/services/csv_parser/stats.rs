//! Parsing statistics for vendor CSV files

/// Per-file parsing statistics
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ParseStats {
    /// Total number of data rows encountered
    pub total_rows: usize,

    /// Number of rows assembled and handed to the row handler
    pub rows_parsed: usize,

    /// Location rows discarded for missing coordinates
    pub discarded_missing_coordinates: usize,

    /// Block rows discarded for an empty foreign key
    pub discarded_missing_key: usize,
}

impl ParseStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Total rows dropped by the discard policies
    pub fn discarded_total(&self) -> usize {
        self.discarded_missing_coordinates + self.discarded_missing_key
    }

    /// Fold another file's statistics into this one
    pub fn merge(&mut self, other: &ParseStats) {
        self.total_rows += other.total_rows;
        self.rows_parsed += other.rows_parsed;
        self.discarded_missing_coordinates += other.discarded_missing_coordinates;
        self.discarded_missing_key += other.discarded_missing_key;
    }
}
