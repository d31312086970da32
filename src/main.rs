use clap::Parser;
use geoip_loader::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(()) => {
            // Success - the summary has already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("GeoIP Loader - Vendor CSV to Lookup Store");
    println!("=========================================");
    println!();
    println!("Load geolocation CSV exports from MaxMind (GeoLite v1, GeoLite2) and");
    println!("NetAcuity into an address-to-location lookup store.");
    println!();
    println!("USAGE:");
    println!("    geoip-loader <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    load        Load a provider's CSV export (main command)");
    println!("    formats     List the supported vendor file formats");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Load a MaxMind export from a data directory:");
    println!("    geoip-loader load --directory /data/geoip");
    println!();
    println!("    # Load explicit files and query two addresses:");
    println!("    geoip-loader load -l GeoLiteCity-Location.csv -b GeoLiteCity-Blocks.csv \\");
    println!("                      --query 81.2.69.160 --query 10.0.0.1");
    println!();
    println!("    # Load a NetAcuity export:");
    println!("    geoip-loader load --provider netacuity -d /data/netacuity");
    println!();
    println!("For detailed help on any command, use:");
    println!("    geoip-loader <COMMAND> --help");
}
