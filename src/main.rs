use anyhow::Context;
use clap::Parser;
use damflow::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args).context("damflow command failed") {
        Ok(()) => process::exit(0),
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("DamFlow - Dam Water Flow Monitor");
    println!("================================");
    println!();
    println!("Record dam water levels and review rate-of-flow trends from a");
    println!("local CSV reading log.");
    println!();
    println!("USAGE:");
    println!("    damflow <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    dashboard   Monthly or daily rate-of-flow summary for one dam");
    println!("    record      Record a new water level reading");
    println!("    trends      Full rate-of-flow history for one dam");
    println!("    locations   List known dams and their profiles");
    println!("    validate    Check the reading log and report rejected rows");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Record a reading, deriving the rate of flow from the levels:");
    println!("    damflow record --location \"Dam A\" --initial 300 --final 800 \\");
    println!("                   --shape trapezoidal --lat 10 --lon 20 --area 5");
    println!();
    println!("    # Summarise the latest month for a dam:");
    println!("    damflow dashboard --location \"Dam A\"");
    println!();
    println!("    # Daily means as CSV:");
    println!("    damflow trends --location \"Dam A\" --daily --format csv");
    println!();
    println!("For detailed help on any command, use:");
    println!("    damflow <COMMAND> --help");
}
