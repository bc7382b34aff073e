use clap::Args;
use std::path::PathBuf;

use crate::defaults;

/// Loci, linkage, fitness and mating.
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Number of biallelic loci
    #[arg(short = 'L', long, default_value_t = defaults::LOCI)]
    pub loci: usize,

    /// Recombination fractions between adjacent loci
    ///
    /// Either one value used at every junction, or a comma-separated list
    /// with `loci - 1` entries (e.g. "0.1,0.5,0.2").
    #[arg(short, long, default_value = defaults::RECOMBINATION)]
    pub recombination: String,

    /// Explicit fitness per genotype, comma-separated (2^loci entries)
    #[arg(long, conflicts_with_all = ["additive", "multiplicative"])]
    pub fitness: Option<String>,

    /// Additive fitness: "base:e0,e1,..." with one effect per locus
    #[arg(long, conflicts_with = "multiplicative")]
    pub additive: Option<String>,

    /// Multiplicative fitness: one selection coefficient per locus
    #[arg(long)]
    pub multiplicative: Option<String>,

    /// Mating rule (random, assortative, similarity)
    #[arg(short, long, default_value = defaults::MATING)]
    pub mating: String,

    /// Weight given to dissimilar pairs under assortative or similarity mating
    #[arg(short, long, default_value_t = defaults::DISTORTION)]
    pub distortion: f64,
}

/// Trials, stopping rule, start condition and recording.
#[derive(Args, Debug, Clone)]
pub struct ExecutionArgs {
    /// Number of independent trials
    #[arg(short = 'n', long, default_value_t = defaults::TRIALS)]
    pub trials: usize,

    /// Generation cap per trial
    #[arg(short = 'g', long, default_value_t = defaults::MAX_GENERATIONS)]
    pub max_generations: usize,

    /// Convergence tolerance on the Euclidean distance between generations
    #[arg(long, default_value_t = defaults::TOLERANCE)]
    pub tolerance: f64,

    /// Initial condition
    ///
    /// One of: uniform, corners, random-alleles, random-genotypes,
    /// fixed:<genotype>, alleles:<p0,p1,...>, genotypes:<f0,f1,...>,
    /// disequilibrium:<d>:<p0,p1,...>
    #[arg(short, long, default_value = defaults::INITIAL)]
    pub initial: String,

    /// Keep every n-th generation in the trajectory (0 keeps none)
    #[arg(long, default_value_t = defaults::RECORD_EVERY)]
    pub record_every: usize,

    /// Encoding of database payloads (plain, zstd)
    #[arg(long, default_value = defaults::CODEC)]
    pub codec: String,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Output configuration file
    #[arg(short, long, default_value = defaults::CONFIG_FILE)]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,

    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub execution: ExecutionArgs,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Configuration file written by `init`
    ///
    /// When given, model and execution flags are ignored except `--seed`.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Record the run into this SQLite database
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Write trial outcomes as JSON to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Show progress bar
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub progress: bool,

    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub execution: ExecutionArgs,
}

#[derive(Args, Debug)]
pub struct TableArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Build on one thread
    #[arg(long)]
    pub serial: bool,

    /// Print the parent-pair matrix of this offspring genotype
    #[arg(long)]
    pub show: Option<usize>,

    /// Store the built table in this SQLite database
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Encoding of the stored table (plain, zstd)
    #[arg(long, default_value = defaults::CODEC)]
    pub codec: String,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Configuration file to check instead of the model flags
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub model: ModelArgs,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Database path
    #[arg(short, long)]
    pub database: PathBuf,

    /// What to export (trials, trajectory, config)
    #[arg(long, default_value = "trials")]
    pub data_type: String,

    /// Output format (csv, json)
    #[arg(short, long, default_value = "csv")]
    pub format: String,

    /// Restrict to one trial
    #[arg(long)]
    pub trial: Option<usize>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
