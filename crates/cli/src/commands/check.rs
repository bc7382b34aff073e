use anyhow::{Context, Result, bail};
use hapdyn_sim::FrequencyVector;
use hapdyn_sim::evolution::RecombinationTable;
use hapdyn_sim::evolution::recombination::MAX_ENUMERATION_LOCI;
use hapdyn_sim::simulation::{Configuration, ExecutionConfig, step};

use crate::args::CheckArgs;
use crate::defaults::CHECK_TOLERANCE;
use crate::printing::{print_parameters, print_table_summary};
use crate::utils::model_config;

/// Validate a configuration and self-check its recombination table.
pub fn check_model(args: &CheckArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => Configuration::load(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => Configuration::new(model_config(&args.model)?, ExecutionConfig::default()),
    };
    config.validate().context("Invalid configuration")?;
    print_parameters(&config);
    println!("✓ Configuration is valid");

    let table = RecombinationTable::build(config.model.loci, &config.model.recombination)
        .context("Failed to build recombination table")?;
    print_table_summary(&table);

    let mut failed = Vec::new();
    let mut report = |name: &str, error: f64| {
        let mark = if error <= CHECK_TOLERANCE { "✓" } else { "✗" };
        println!("  {mark} {name}: {error:.3e}");
        if error > CHECK_TOLERANCE {
            failed.push(name.to_string());
        }
    };

    println!("\n🔍 Table Checks");
    report("conservation", table.conservation_error());
    report("symmetry", table.symmetry_error());

    if config.model.loci <= MAX_ENUMERATION_LOCI {
        let oracle = RecombinationTable::by_mask_enumeration(table.map())
            .context("Failed to enumerate crossover masks")?;
        report("mask enumeration", max_difference(&table, &oracle));
    } else {
        println!("  - mask enumeration: skipped above {MAX_ENUMERATION_LOCI} loci");
    }

    let uniform = FrequencyVector::uniform(table.space());
    let fitness = config.model.fitness_vector()?;
    let next = step(&uniform, &fitness, &table, &config.model.mating)
        .context("Failed to step from uniform frequencies")?;
    report("one-step mass", (next.total() - 1.0).abs());

    if !failed.is_empty() {
        bail!("checks failed: {}", failed.join(", "));
    }
    println!("\n✓ All checks passed");
    Ok(())
}

fn max_difference(a: &RecombinationTable, b: &RecombinationTable) -> f64 {
    let space = a.space();
    let mut max = 0.0_f64;
    for k in space.genotypes() {
        for mom in space.genotypes() {
            for dad in space.genotypes() {
                max = max.max((a.probability(k, mom, dad) - b.probability(k, mom, dad)).abs());
            }
        }
    }
    max
}
