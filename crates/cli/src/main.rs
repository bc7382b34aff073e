mod args;
mod commands;
pub mod defaults;
mod printing;
mod utils;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use args::{CheckArgs, ExportArgs, InitArgs, RunArgs, TableArgs};
use commands::{check, export, info, init, run, table};

/// hapdyn: deterministic haploid multi-locus population dynamics
///
/// Iterates genotype frequencies of a population with L biallelic loci
/// under recombination, selection and (possibly assortative) mating until
/// they stop changing.
#[derive(Parser, Debug)]
#[command(name = "hapdyn")]
#[command(author, version, about = "Simulates haploid genotype-frequency dynamics under recombination", long_about = None)]
struct Cli {
    /// Number of threads to use for parallel processing
    ///
    /// If not specified, defaults to the number of logical CPUs.
    #[arg(short = 't', long, global = true)]
    threads: Option<usize>,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a new run configuration file.
    ///
    /// Sets up the model (loci, recombination map, fitness, mating) and how
    /// trials are run, but does not run anything yet.
    Init(Box<InitArgs>),

    /// Run trials to convergence.
    ///
    /// Reads a configuration file or builds one from the flags.
    Run(Box<RunArgs>),

    /// Build a recombination table and report its size.
    Table(Box<TableArgs>),

    /// Validate a configuration and self-check its recombination table.
    Check(Box<CheckArgs>),

    /// Show the configuration and results stored in a database.
    Info {
        /// Database path
        #[arg(short, long)]
        database: PathBuf,
    },

    /// Export recorded data to CSV or JSON.
    Export(ExportArgs),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    match cli.command {
        Commands::Init(args) => init::init_configuration(&args)?,
        Commands::Run(args) => run::run_simulation(&args)?,
        Commands::Table(args) => table::build_table(&args)?,
        Commands::Check(args) => check::check_model(&args)?,
        Commands::Info { database } => info::show_info(&database)?,
        Commands::Export(args) => export::export_data(&args)?,
    }

    Ok(())
}
