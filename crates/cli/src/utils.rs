use anyhow::{Context, Result, bail};
use hapdyn_codec::CodecStrategy;
use hapdyn_sim::evolution::{FitnessModel, MatingRule};
use hapdyn_sim::simulation::{Configuration, ExecutionConfig, InitialCondition, ModelConfig};
use indicatif::ProgressStyle;

use crate::args::{ExecutionArgs, ModelArgs};

/// Parse a comma-separated list of numbers.
pub fn parse_list(s: &str) -> Result<Vec<f64>> {
    s.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<f64>()
                .with_context(|| format!("'{v}' is not a number"))
        })
        .collect()
}

/// A single value is repeated at every junction.
pub fn parse_recombination(s: &str, loci: usize) -> Result<Vec<f64>> {
    let values = parse_list(s)?;
    if let [r] = values.as_slice() {
        return Ok(vec![*r; loci.saturating_sub(1)]);
    }
    Ok(values)
}

pub fn parse_fitness(args: &ModelArgs) -> Result<FitnessModel> {
    if let Some(values) = &args.fitness {
        return Ok(FitnessModel::Explicit {
            values: parse_list(values)?,
        });
    }
    if let Some(additive) = &args.additive {
        let (base, effects) = additive
            .split_once(':')
            .context("additive fitness must look like 'base:e0,e1,...'")?;
        return Ok(FitnessModel::Additive {
            base: base.trim().parse().context("invalid additive base")?,
            effects: parse_list(effects)?,
        });
    }
    if let Some(coefficients) = &args.multiplicative {
        return Ok(FitnessModel::Multiplicative {
            coefficients: parse_list(coefficients)?,
        });
    }
    Ok(FitnessModel::Neutral)
}

pub fn parse_mating(name: &str, distortion: f64) -> Result<MatingRule> {
    match name {
        "random" => Ok(MatingRule::Random),
        "assortative" => Ok(MatingRule::Assortative { distortion }),
        "similarity" => Ok(MatingRule::Similarity { distortion }),
        _ => bail!("Unknown mating rule '{name}'. Use: random, assortative, or similarity"),
    }
}

pub fn parse_initial(s: &str) -> Result<InitialCondition> {
    let (kind, rest) = s.split_once(':').unwrap_or((s, ""));
    let initial = match kind {
        "uniform" => InitialCondition::Uniform,
        "corners" => InitialCondition::Corners,
        "random-alleles" => InitialCondition::RandomAlleles,
        "random-genotypes" => InitialCondition::RandomGenotypes,
        "fixed" => InitialCondition::Fixed {
            genotype: rest
                .parse()
                .with_context(|| format!("invalid genotype '{rest}'"))?,
        },
        "alleles" => InitialCondition::Alleles {
            frequencies: parse_list(rest)?,
        },
        "genotypes" => InitialCondition::Genotypes {
            frequencies: parse_list(rest)?,
        },
        "disequilibrium" => {
            let (d, alleles) = rest
                .split_once(':')
                .context("disequilibrium must look like 'disequilibrium:<d>:<p0,p1,...>'")?;
            InitialCondition::Disequilibrium {
                alleles: parse_list(alleles)?,
                d: d.parse().with_context(|| format!("invalid D '{d}'"))?,
            }
        }
        _ => bail!("Unknown initial condition '{s}'"),
    };
    Ok(initial)
}

pub fn parse_codec(s: &str) -> Result<CodecStrategy> {
    s.parse::<CodecStrategy>()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Invalid codec strategy")
}

pub fn model_config(args: &ModelArgs) -> Result<ModelConfig> {
    Ok(ModelConfig {
        loci: args.loci,
        recombination: parse_recombination(&args.recombination, args.loci)?,
        fitness: parse_fitness(args)?,
        mating: parse_mating(&args.mating, args.distortion)?,
    })
}

pub fn execution_config(args: &ExecutionArgs) -> Result<ExecutionConfig> {
    Ok(ExecutionConfig {
        trials: args.trials,
        max_generations: args.max_generations,
        tolerance: args.tolerance,
        seed: args.seed,
        initial: parse_initial(&args.initial)?,
        record_every: args.record_every,
        codec: parse_codec(&args.codec)?,
    })
}

/// Build and validate a configuration from command-line flags.
pub fn build_config(model: &ModelArgs, execution: &ExecutionArgs) -> Result<Configuration> {
    let config = Configuration::new(model_config(model)?, execution_config(execution)?);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

pub fn progress_style() -> Result<ProgressStyle> {
    Ok(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {per_sec}")?
        .progress_chars("#>-"))
}
