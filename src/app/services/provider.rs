//! Provider loading pipeline
//!
//! One provider instance owns one load: it resolves which join strategy the
//! detected format version needs, drives the streaming parser over the
//! locations file and then each blocks file, and feeds finished records into
//! the prefix store. Legacy v1 and NetAcuity files share the
//! locations-first strategy where every block borrows its committed record;
//! GeoLite2 v2 merges location and block fields into a fresh record per
//! block under a synthetic sequence identifier.

use super::csv_parser::{
    detect_format, expect_kind, expect_version, parse_rows, DetectedFormat, FileKind,
    FormatVersion, ParseStats, RowData,
};
use super::prefix_ranges::associate_coverage;
use super::prefix_store::PrefixStore;
use super::record_registry::RecordRegistry;
use crate::app::models::{GeoRecord, ProviderKind};
use crate::config::ResolvedInputs;
use crate::{Error, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::info;

/// Outcome of one completed provider load
#[derive(Debug, Clone)]
pub struct LoadSummary {
    /// Provider that produced the data
    pub provider: ProviderKind,

    /// Format version the load was fixed to
    pub version: FormatVersion,

    /// Merged parsing statistics across all input files
    pub stats: ParseStats,

    /// Records committed to the provider's registry
    pub records_committed: usize,

    /// Prefix associations added to the store
    pub prefixes_added: usize,

    /// Wall-clock duration of the load
    pub elapsed: Duration,
}

/// A loadable geolocation data provider
pub trait GeoProvider {
    /// Vendor this provider handles
    fn kind(&self) -> ProviderKind;

    /// Run the full load, feeding prefix associations into `store`
    fn load(&mut self, store: &mut dyn PrefixStore) -> Result<LoadSummary>;

    /// The registry of records committed by the last load
    fn records(&self) -> &RecordRegistry;

    /// Release all loaded records
    fn clear(&mut self);
}

/// MaxMind provider handling both GeoLite v1 and GeoLite2 v2 exports
#[derive(Debug)]
pub struct MaxmindProvider {
    inputs: ResolvedInputs,
    registry: RecordRegistry,
}

impl MaxmindProvider {
    pub fn new(inputs: ResolvedInputs) -> Self {
        Self {
            inputs,
            registry: RecordRegistry::new(),
        }
    }
}

impl GeoProvider for MaxmindProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Maxmind
    }

    fn load(&mut self, store: &mut dyn PrefixStore) -> Result<LoadSummary> {
        run_load(ProviderKind::Maxmind, &self.inputs, &mut self.registry, store)
    }

    fn records(&self) -> &RecordRegistry {
        &self.registry
    }

    fn clear(&mut self) {
        self.registry.clear();
    }
}

/// NetAcuity edge provider
#[derive(Debug)]
pub struct NetacuityProvider {
    inputs: ResolvedInputs,
    registry: RecordRegistry,
}

impl NetacuityProvider {
    pub fn new(inputs: ResolvedInputs) -> Self {
        Self {
            inputs,
            registry: RecordRegistry::new(),
        }
    }
}

impl GeoProvider for NetacuityProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Netacuity
    }

    fn load(&mut self, store: &mut dyn PrefixStore) -> Result<LoadSummary> {
        run_load(
            ProviderKind::Netacuity,
            &self.inputs,
            &mut self.registry,
            store,
        )
    }

    fn records(&self) -> &RecordRegistry {
        &self.registry
    }

    fn clear(&mut self) {
        self.registry.clear();
    }
}

// =============================================================================
// Provider Factory Registry
// =============================================================================

/// Factory producing a provider for a set of resolved inputs
pub type ProviderFactory = fn(ResolvedInputs) -> Box<dyn GeoProvider>;

/// Registry mapping provider kinds to their factories
#[derive(Default)]
pub struct ProviderRegistry {
    factories: HashMap<ProviderKind, ProviderFactory>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in providers registered
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        // Registration of the built-ins cannot collide
        let _ = registry.register(ProviderKind::Maxmind, |inputs| {
            Box::new(MaxmindProvider::new(inputs))
        });
        let _ = registry.register(ProviderKind::Netacuity, |inputs| {
            Box::new(NetacuityProvider::new(inputs))
        });
        registry
    }

    /// Register a factory for a provider kind
    ///
    /// Registering the same kind twice is a configuration error.
    pub fn register(&mut self, kind: ProviderKind, factory: ProviderFactory) -> Result<()> {
        match self.factories.entry(kind) {
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(factory);
                Ok(())
            }
            std::collections::hash_map::Entry::Occupied(_) => Err(Error::configuration(format!(
                "Provider '{}' is already registered",
                kind
            ))),
        }
    }

    /// Instantiate the provider for a kind
    pub fn create(&self, kind: ProviderKind, inputs: ResolvedInputs) -> Result<Box<dyn GeoProvider>> {
        let factory = self
            .factories
            .get(&kind)
            .ok_or_else(|| Error::configuration(format!("No provider registered for '{}'", kind)))?;
        Ok(factory(inputs))
    }
}

// =============================================================================
// Load Engine
// =============================================================================

fn run_load(
    kind: ProviderKind,
    inputs: &ResolvedInputs,
    registry: &mut RecordRegistry,
    store: &mut dyn PrefixStore,
) -> Result<LoadSummary> {
    let started = Instant::now();
    let mut stats = ParseStats::new();
    let mut prefixes_added = 0usize;

    // Locations file fixes the format version for the whole load
    let locations_name = inputs.locations.display().to_string();
    let (detected, reader) = open_and_detect(&inputs.locations, &locations_name)?;
    expect_kind(&detected, FileKind::Locations, &locations_name)?;
    expect_vendor(&detected, kind, &locations_name)?;
    let version = expect_version(&detected, None, &locations_name)?;

    info!("Loading {} locations from '{}'", version, locations_name);

    // V2 location rows stay in a transient index until blocks merge them
    let mut location_index: HashMap<u32, GeoRecord> = HashMap::new();

    let location_stats = match version {
        FormatVersion::LegacyV1 | FormatVersion::NetacuityEdge => parse_rows(
            detected.schema,
            reader,
            &locations_name,
            detected.header_lines,
            |row, line| match row {
                RowData::Location(location) => {
                    registry.commit(location.record)?;
                    Ok(())
                }
                RowData::Block(_) => Err(Error::row(
                    &locations_name,
                    line,
                    "unexpected block row in a locations file",
                )),
            },
        )?,
        FormatVersion::V2 => parse_rows(
            detected.schema,
            reader,
            &locations_name,
            detected.header_lines,
            |row, line| match row {
                RowData::Location(location) => {
                    let id = location.record.id;
                    if location_index.insert(id, location.record).is_some() {
                        return Err(Error::DuplicateRecordId { id });
                    }
                    Ok(())
                }
                RowData::Block(_) => Err(Error::row(
                    &locations_name,
                    line,
                    "unexpected block row in a locations file",
                )),
            },
        )?,
    };
    stats.merge(&location_stats);

    // Synthetic sequence identifiers for v2 merged records
    let mut next_id: u32 = 1;

    for blocks_path in &inputs.blocks {
        let blocks_name = blocks_path.display().to_string();
        let (detected, reader) = open_and_detect(blocks_path, &blocks_name)?;
        expect_kind(&detected, FileKind::Blocks, &blocks_name)?;
        expect_vendor(&detected, kind, &blocks_name)?;
        expect_version(&detected, Some(version), &blocks_name)?;

        info!("Loading {} blocks from '{}'", version, blocks_name);

        let block_stats = parse_rows(
            detected.schema,
            reader,
            &blocks_name,
            detected.header_lines,
            |row, line| {
                let block = match row {
                    RowData::Block(block) => block,
                    RowData::Location(_) => {
                        return Err(Error::row(
                            &blocks_name,
                            line,
                            "unexpected location row in a blocks file",
                        ));
                    }
                };

                let record = match version {
                    FormatVersion::LegacyV1 | FormatVersion::NetacuityEdge => {
                        // Shared-location join: one record, many prefixes
                        registry
                            .get(block.key)
                            .ok_or_else(|| Error::join_key_not_found(&blocks_name, line, block.key))?
                    }
                    FormatVersion::V2 => {
                        // Merge join: deep-copy the location fields into a
                        // fresh per-block record and overlay block fields
                        let base = location_index.get(&block.key).ok_or_else(|| {
                            Error::join_key_not_found(&blocks_name, line, block.key)
                        })?;

                        let mut merged = base.clone();
                        merged.id = next_id;
                        next_id += 1;
                        if block.postal_code.is_some() {
                            merged.postal_code = block.postal_code.clone();
                        }
                        if let Some(latitude) = block.latitude {
                            merged.latitude = latitude;
                        }
                        if let Some(longitude) = block.longitude {
                            merged.longitude = longitude;
                        }
                        if let Some(radius) = block.accuracy_radius {
                            merged.accuracy_radius = radius;
                        }
                        registry.commit(merged)?
                    }
                };

                prefixes_added += associate_coverage(store, &block.coverage, &record)?;
                Ok(())
            },
        )?;
        stats.merge(&block_stats);
    }

    let summary = LoadSummary {
        provider: kind,
        version,
        stats,
        records_committed: registry.len(),
        prefixes_added,
        elapsed: started.elapsed(),
    };

    info!(
        "Load complete: {} records, {} prefixes in {:.2?}",
        summary.records_committed, summary.prefixes_added, summary.elapsed
    );

    Ok(summary)
}

fn open_and_detect(path: &Path, name: &str) -> Result<(DetectedFormat, BufReader<File>)> {
    let file =
        File::open(path).map_err(|e| Error::io(format!("Failed to open '{}'", name), e))?;
    let mut reader = BufReader::new(file);
    let detected = detect_format(&mut reader, name)?;
    Ok((detected, reader))
}

fn expect_vendor(detected: &DetectedFormat, expected: ProviderKind, file: &str) -> Result<()> {
    let found = detected.schema.provider();
    if found != expected {
        return Err(Error::format(
            file,
            format!("expected {} data, found {} data", expected, found),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_creates_both_providers() {
        let registry = ProviderRegistry::with_builtin();
        let inputs = ResolvedInputs {
            locations: "loc.csv".into(),
            blocks: vec!["blocks.csv".into()],
        };

        let maxmind = registry
            .create(ProviderKind::Maxmind, inputs.clone())
            .unwrap();
        assert_eq!(maxmind.kind(), ProviderKind::Maxmind);

        let netacuity = registry.create(ProviderKind::Netacuity, inputs).unwrap();
        assert_eq!(netacuity.kind(), ProviderKind::Netacuity);
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = ProviderRegistry::with_builtin();
        let result = registry.register(ProviderKind::Maxmind, |inputs| {
            Box::new(MaxmindProvider::new(inputs))
        });

        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_unregistered_kind_is_rejected() {
        let registry = ProviderRegistry::new();
        let inputs = ResolvedInputs {
            locations: "loc.csv".into(),
            blocks: vec![],
        };

        assert!(matches!(
            registry.create(ProviderKind::Maxmind, inputs),
            Err(Error::Configuration { .. })
        ));
    }
}
