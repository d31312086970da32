//! Command implementations for the GeoIP loader CLI
//!
//! This module contains the command execution logic, progress reporting,
//! and the human-readable summary output.

use crate::app::services::csv_parser::Schema;
use crate::app::services::prefix_store::MemoryPrefixStore;
use crate::app::services::provider::{LoadSummary, ProviderRegistry};
use crate::cli::args::{Args, Commands, LoadArgs};
use crate::Result;
use colored::Colorize;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use std::net::IpAddr;
use std::time::Duration;
use tracing::{debug, info};

/// Main command runner for the GeoIP loader
pub fn run(args: Args) -> Result<()> {
    match args.command {
        Some(Commands::Load(load_args)) => run_load(load_args),
        Some(Commands::Formats) => {
            run_formats();
            Ok(())
        }
        // main() only dispatches here with a command present
        None => Ok(()),
    }
}

/// Execute the load command
///
/// Resolves the input files, runs the provider load into an in-memory
/// store, reports a summary, and answers any --query lookups.
fn run_load(args: LoadArgs) -> Result<()> {
    setup_logging(&args)?;

    info!("Starting GeoIP load");
    debug!("Command line arguments: {:?}", args);

    let config = args.to_config();
    let inputs = config.resolve()?;
    info!(
        "Resolved inputs: locations '{}', {} blocks file(s)",
        inputs.locations.display(),
        inputs.blocks.len()
    );

    let registry = ProviderRegistry::with_builtin();
    let mut provider = registry.create(config.provider, inputs)?;

    let progress = if args.show_progress() {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Loading {} data...", provider.kind()));
        Some(pb)
    } else {
        None
    };

    let mut store = MemoryPrefixStore::new();
    let result = provider.load(&mut store);

    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }
    let summary = result?;

    if args.show_progress() {
        print_summary(&summary);
    }

    for query in &args.queries {
        print_lookup(&store, *query);
    }

    Ok(())
}

/// Execute the formats command: list every supported schema
fn run_formats() {
    println!("{}", "Supported vendor file formats".bold());
    println!(
        "{:<22} {:<12} {:<10} {:<8} {}",
        "schema".dimmed(),
        "signature".dimmed(),
        "kind".dimmed(),
        "columns".dimmed(),
        "version".dimmed()
    );

    for schema in Schema::ALL {
        println!(
            "{:<22} {:<12} {:<10} {:<8} {}",
            schema.to_string(),
            schema.signature(),
            schema.kind().to_string(),
            schema.column_count(),
            schema.version()
        );
    }
}

/// Print the post-load summary report
fn print_summary(summary: &LoadSummary) {
    println!();
    println!("{}", "GeoIP load complete".green().bold());
    println!("  Provider:          {}", summary.provider);
    println!("  Format version:    {}", summary.version);
    println!(
        "  Rows parsed:       {} of {}",
        summary.stats.rows_parsed, summary.stats.total_rows
    );
    if summary.stats.discarded_total() > 0 {
        println!(
            "  Rows discarded:    {} ({} missing coordinates, {} missing key)",
            summary.stats.discarded_total().to_string().yellow(),
            summary.stats.discarded_missing_coordinates,
            summary.stats.discarded_missing_key
        );
    }
    println!("  Records committed: {}", summary.records_committed);
    println!("  Prefixes added:    {}", summary.prefixes_added);
    println!("  Elapsed:           {}", HumanDuration(summary.elapsed));
}

/// Print one --query lookup result
fn print_lookup(store: &MemoryPrefixStore, query: IpAddr) {
    match store.lookup(query) {
        Some(record) => {
            let place = match (&record.city, &record.region) {
                (Some(city), Some(region)) => format!("{}, {}", city, region),
                (Some(city), None) => city.clone(),
                (None, Some(region)) => region.clone(),
                (None, None) => "unknown place".to_string(),
            };
            println!(
                "{} {} {} ({}/{}) lat {} long {} [record {}]",
                query.to_string().cyan(),
                "->".dimmed(),
                place,
                record.country_code,
                record.continent_code,
                record.latitude,
                record.longitude,
                record.id
            );
        }
        None => {
            println!("{} {} {}", query.to_string().cyan(), "->".dimmed(), "no match".red());
        }
    }
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &LoadArgs) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("geoip_loader={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}
