//! Load configuration
//!
//! Input selection for one provider load: either a data directory holding
//! the vendor's well-known file names, or explicitly named locations and
//! blocks files. Resolution happens up front so every missing-file and
//! bad-combination case is a configuration error before any parsing starts.

use crate::app::models::ProviderKind;
use crate::constants::{
    LEGACY_BLOCKS_FILENAME, LEGACY_LOCATIONS_FILENAME, MAX_BLOCK_FILES,
    NETACUITY_BLOCKS_FILENAME, NETACUITY_LOCATIONS_FILENAME, V2_BLOCKS_V4_FILENAME,
    V2_BLOCKS_V6_FILENAME, V2_LOCATIONS_FILENAME,
};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Configuration for one provider load
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Which vendor's files to expect
    pub provider: ProviderKind,

    /// Data directory holding the vendor's well-known file names
    pub directory: Option<PathBuf>,

    /// Explicit locations file
    pub locations_file: Option<PathBuf>,

    /// Explicit blocks files, at most one per address family
    pub block_files: Vec<PathBuf>,
}

/// Input files fixed for one load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInputs {
    pub locations: PathBuf,
    pub blocks: Vec<PathBuf>,
}

impl LoadConfig {
    /// Create a configuration with no input selection yet
    pub fn new(provider: ProviderKind) -> Self {
        Self {
            provider,
            directory: None,
            locations_file: None,
            block_files: Vec::new(),
        }
    }

    /// Resolve the configuration into concrete input files
    ///
    /// Explicit files take precedence over a directory; giving both logs a
    /// warning rather than failing. Directory mode for MaxMind probes for
    /// the GeoLite2 layout first and falls back to the legacy v1 names.
    pub fn resolve(&self) -> Result<ResolvedInputs> {
        let explicit = self.locations_file.is_some() || !self.block_files.is_empty();

        if explicit && self.directory.is_some() {
            warn!("Both a directory and explicit files were given; the directory is ignored");
        }

        let inputs = if explicit {
            self.resolve_explicit()?
        } else if let Some(directory) = &self.directory {
            self.resolve_directory(directory)?
        } else {
            return Err(Error::configuration(
                "No input given: specify a data directory or explicit locations/blocks files",
            ));
        };

        if inputs.blocks.len() > MAX_BLOCK_FILES {
            return Err(Error::configuration(format!(
                "Too many blocks files: {} given, at most {} (one per address family)",
                inputs.blocks.len(),
                MAX_BLOCK_FILES
            )));
        }

        require_file(&inputs.locations)?;
        for blocks in &inputs.blocks {
            require_file(blocks)?;
        }

        Ok(inputs)
    }

    fn resolve_explicit(&self) -> Result<ResolvedInputs> {
        let locations = self
            .locations_file
            .clone()
            .ok_or_else(|| Error::configuration("A locations file is required"))?;

        if self.block_files.is_empty() {
            return Err(Error::configuration("At least one blocks file is required"));
        }

        Ok(ResolvedInputs {
            locations,
            blocks: self.block_files.clone(),
        })
    }

    fn resolve_directory(&self, directory: &Path) -> Result<ResolvedInputs> {
        if !directory.is_dir() {
            return Err(Error::configuration(format!(
                "Data directory not found: {}",
                directory.display()
            )));
        }

        match self.provider {
            ProviderKind::Maxmind => {
                // GeoLite2 layout wins when present
                let v2_locations = directory.join(V2_LOCATIONS_FILENAME);
                if v2_locations.is_file() {
                    let mut blocks = vec![directory.join(V2_BLOCKS_V4_FILENAME)];
                    let v6 = directory.join(V2_BLOCKS_V6_FILENAME);
                    if v6.is_file() {
                        blocks.push(v6);
                    }
                    return Ok(ResolvedInputs {
                        locations: v2_locations,
                        blocks,
                    });
                }

                Ok(ResolvedInputs {
                    locations: directory.join(LEGACY_LOCATIONS_FILENAME),
                    blocks: vec![directory.join(LEGACY_BLOCKS_FILENAME)],
                })
            }
            ProviderKind::Netacuity => Ok(ResolvedInputs {
                locations: directory.join(NETACUITY_LOCATIONS_FILENAME),
                blocks: vec![directory.join(NETACUITY_BLOCKS_FILENAME)],
            }),
        }
    }
}

fn require_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(Error::configuration(format!(
            "Input file not found: {}",
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, "x\n").unwrap();
        path
    }

    #[test]
    fn test_no_input_is_an_error() {
        let config = LoadConfig::new(ProviderKind::Maxmind);
        assert!(matches!(
            config.resolve(),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn test_explicit_files() {
        let dir = TempDir::new().unwrap();
        let locations = touch(&dir, "loc.csv");
        let blocks = touch(&dir, "blocks.csv");

        let mut config = LoadConfig::new(ProviderKind::Maxmind);
        config.locations_file = Some(locations.clone());
        config.block_files = vec![blocks.clone()];

        let inputs = config.resolve().unwrap();
        assert_eq!(inputs.locations, locations);
        assert_eq!(inputs.blocks, vec![blocks]);
    }

    #[test]
    fn test_explicit_blocks_without_locations_is_an_error() {
        let dir = TempDir::new().unwrap();
        let blocks = touch(&dir, "blocks.csv");

        let mut config = LoadConfig::new(ProviderKind::Maxmind);
        config.block_files = vec![blocks];

        assert!(matches!(
            config.resolve(),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn test_explicit_files_override_directory() {
        let dir = TempDir::new().unwrap();
        let locations = touch(&dir, "loc.csv");
        let blocks = touch(&dir, "blocks.csv");
        touch(&dir, LEGACY_LOCATIONS_FILENAME);
        touch(&dir, LEGACY_BLOCKS_FILENAME);

        let mut config = LoadConfig::new(ProviderKind::Maxmind);
        config.directory = Some(dir.path().to_path_buf());
        config.locations_file = Some(locations.clone());
        config.block_files = vec![blocks];

        let inputs = config.resolve().unwrap();
        assert_eq!(inputs.locations, locations);
    }

    #[test]
    fn test_directory_mode_legacy_names() {
        let dir = TempDir::new().unwrap();
        let locations = touch(&dir, LEGACY_LOCATIONS_FILENAME);
        let blocks = touch(&dir, LEGACY_BLOCKS_FILENAME);

        let mut config = LoadConfig::new(ProviderKind::Maxmind);
        config.directory = Some(dir.path().to_path_buf());

        let inputs = config.resolve().unwrap();
        assert_eq!(inputs.locations, locations);
        assert_eq!(inputs.blocks, vec![blocks]);
    }

    #[test]
    fn test_directory_mode_prefers_v2_layout() {
        let dir = TempDir::new().unwrap();
        touch(&dir, LEGACY_LOCATIONS_FILENAME);
        touch(&dir, LEGACY_BLOCKS_FILENAME);
        let locations = touch(&dir, V2_LOCATIONS_FILENAME);
        let v4 = touch(&dir, V2_BLOCKS_V4_FILENAME);
        let v6 = touch(&dir, V2_BLOCKS_V6_FILENAME);

        let mut config = LoadConfig::new(ProviderKind::Maxmind);
        config.directory = Some(dir.path().to_path_buf());

        let inputs = config.resolve().unwrap();
        assert_eq!(inputs.locations, locations);
        assert_eq!(inputs.blocks, vec![v4, v6]);
    }

    #[test]
    fn test_directory_mode_netacuity_names() {
        let dir = TempDir::new().unwrap();
        let locations = touch(&dir, NETACUITY_LOCATIONS_FILENAME);
        let blocks = touch(&dir, NETACUITY_BLOCKS_FILENAME);

        let mut config = LoadConfig::new(ProviderKind::Netacuity);
        config.directory = Some(dir.path().to_path_buf());

        let inputs = config.resolve().unwrap();
        assert_eq!(inputs.locations, locations);
        assert_eq!(inputs.blocks, vec![blocks]);
    }

    #[test]
    fn test_missing_directory_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        touch(&dir, LEGACY_LOCATIONS_FILENAME);
        // Blocks file deliberately absent

        let mut config = LoadConfig::new(ProviderKind::Maxmind);
        config.directory = Some(dir.path().to_path_buf());

        let err = config.resolve().unwrap_err();
        match err {
            Error::Configuration { message } => {
                assert!(message.contains(LEGACY_BLOCKS_FILENAME));
            }
            other => panic!("expected a configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_blocks_file_cap() {
        let dir = TempDir::new().unwrap();
        let locations = touch(&dir, "loc.csv");
        let blocks: Vec<PathBuf> = (0..3)
            .map(|i| touch(&dir, &format!("blocks-{}.csv", i)))
            .collect();

        let mut config = LoadConfig::new(ProviderKind::Maxmind);
        config.locations_file = Some(locations);
        config.block_files = blocks;

        assert!(matches!(
            config.resolve(),
            Err(Error::Configuration { .. })
        ));
    }
}
