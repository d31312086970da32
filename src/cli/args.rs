//! Command-line argument definitions for the GeoIP loader
//!
//! Defines the complete CLI interface using the clap derive API.

use crate::app::models::ProviderKind;
use crate::config::LoadConfig;
use clap::{Parser, Subcommand, ValueEnum};
use std::net::IpAddr;
use std::path::PathBuf;

/// CLI arguments for the GeoIP loader
///
/// Builds an address-to-geolocation lookup store from vendor CSV exports
/// (MaxMind GeoLite v1, MaxMind GeoLite2, NetAcuity edge).
#[derive(Debug, Clone, Parser)]
#[command(
    name = "geoip-loader",
    version,
    about = "Load vendor GeoIP CSV exports into an address-to-location lookup store",
    long_about = "Ingests geolocation CSV exports from MaxMind (legacy GeoLite v1 and \
                  GeoLite2) and NetAcuity: detects the file format from its header, \
                  validates every field, joins locations against address blocks, and \
                  decomposes address ranges into CIDR prefixes for longest-prefix lookups."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the GeoIP loader
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Load a provider's CSV export into an in-memory lookup store
    Load(LoadArgs),
    /// List the supported vendor file formats
    Formats,
}

/// Arguments for the load command
#[derive(Debug, Clone, Parser)]
pub struct LoadArgs {
    /// Provider whose export format to expect
    #[arg(
        long = "provider",
        value_enum,
        default_value = "maxmind",
        help = "Data provider (maxmind, netacuity)"
    )]
    pub provider: ProviderArg,

    /// Data directory holding the provider's well-known file names
    ///
    /// For MaxMind the GeoLite2 layout (GeoLite2-City-Locations-en.csv plus
    /// per-family blocks files) is probed first, falling back to the legacy
    /// GeoLiteCity-Location.csv/GeoLiteCity-Blocks.csv pair.
    #[arg(
        short = 'd',
        long = "directory",
        value_name = "PATH",
        help = "Data directory with the provider's default file names"
    )]
    pub directory: Option<PathBuf>,

    /// Explicit locations file
    ///
    /// Overrides directory-based file discovery. Requires at least one
    /// --blocks file.
    #[arg(
        short = 'l',
        long = "locations",
        value_name = "FILE",
        help = "Explicit locations CSV file"
    )]
    pub locations: Option<PathBuf>,

    /// Explicit blocks file (repeatable, at most one per address family)
    #[arg(
        short = 'b',
        long = "blocks",
        value_name = "FILE",
        help = "Explicit blocks CSV file (repeatable)"
    )]
    pub blocks: Vec<PathBuf>,

    /// Addresses to look up after loading (repeatable)
    #[arg(
        long = "query",
        value_name = "IP",
        help = "Look up an address in the loaded store (repeatable)"
    )]
    pub queries: Vec<IpAddr>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Provider selection on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProviderArg {
    /// MaxMind GeoLite (v1 or GeoLite2 exports)
    Maxmind,
    /// NetAcuity edge exports
    Netacuity,
}

impl ProviderArg {
    /// Map the CLI choice to the model-level provider kind
    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderArg::Maxmind => ProviderKind::Maxmind,
            ProviderArg::Netacuity => ProviderKind::Netacuity,
        }
    }
}

impl LoadArgs {
    /// Build the load configuration from the parsed arguments
    pub fn to_config(&self) -> LoadConfig {
        LoadConfig {
            provider: self.provider.kind(),
            directory: self.directory.clone(),
            locations_file: self.locations.clone(),
            block_files: self.blocks.clone(),
        }
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress output (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_args_parse() {
        let args = Args::parse_from([
            "geoip-loader",
            "load",
            "--provider",
            "netacuity",
            "-l",
            "loc.csv",
            "-b",
            "blocks-v4.csv",
            "-b",
            "blocks-v6.csv",
            "--query",
            "10.0.0.1",
        ]);

        let load = match args.command {
            Some(Commands::Load(load)) => load,
            other => panic!("expected a load command, got {:?}", other),
        };
        assert!(matches!(load.provider, ProviderArg::Netacuity));
        assert_eq!(load.blocks.len(), 2);
        assert_eq!(load.queries, vec!["10.0.0.1".parse::<IpAddr>().unwrap()]);
    }

    #[test]
    fn test_to_config_carries_inputs() {
        let args = Args::parse_from(["geoip-loader", "load", "-d", "/data/geoip"]);
        let load = match args.command {
            Some(Commands::Load(load)) => load,
            other => panic!("expected a load command, got {:?}", other),
        };

        let config = load.to_config();
        assert_eq!(config.provider, ProviderKind::Maxmind);
        assert_eq!(config.directory, Some(PathBuf::from("/data/geoip")));
        assert!(config.locations_file.is_none());
    }

    #[test]
    fn test_log_level() {
        let mut load = match Args::parse_from(["geoip-loader", "load"]).command {
            Some(Commands::Load(load)) => load,
            other => panic!("expected a load command, got {:?}", other),
        };

        assert_eq!(load.get_log_level(), "warn");
        load.verbose = 1;
        assert_eq!(load.get_log_level(), "info");
        load.verbose = 3;
        assert_eq!(load.get_log_level(), "trace");

        load.verbose = 0;
        load.quiet = true;
        assert_eq!(load.get_log_level(), "error");
        assert!(!load.show_progress());
    }
}
