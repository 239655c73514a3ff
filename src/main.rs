mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing::{error, trace, Level};

/// Compare protein-protein interface footprints across structural complexes
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity of the program:
    /// -v for info, -vv for debug, and -vvv for trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download structures from the RCSB PDB
    Fetch(cli::fetch::Args),
    /// Superpose a structure onto another one and save the result
    Align(cli::align::Args),
    /// Find the interface residues between two chain groups
    Interface(cli::interface::Args),
    /// Calculate the buried surface area between two chain groups
    Dsasa(cli::dsasa::Args),
    /// Compare the interface footprints of two complexes sharing one protein
    Compare(cli::compare::Args),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
    trace!("{cli:?}");

    let result = match &cli.command {
        Commands::Fetch(args) => cli::fetch::run(args),
        Commands::Align(args) => cli::align::run(args),
        Commands::Interface(args) => cli::interface::run(args),
        Commands::Dsasa(args) => cli::dsasa::run(args),
        Commands::Compare(args) => cli::compare::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
