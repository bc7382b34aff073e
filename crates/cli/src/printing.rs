use hapdyn_analysis::analysis::{haplotype_diversity, mean_heterozygosity};
use hapdyn_sim::evolution::{FitnessModel, RecombinationTable};
use hapdyn_sim::simulation::{Configuration, Simulation, TrialOutcome};

pub fn print_simulation_parameters(sim: &Simulation) {
    print_parameters(sim.config());
    println!("  • Resolved Seed: {}", sim.seed());
    println!();
}

pub fn print_parameters(config: &Configuration) {
    let model = &config.model;
    let execution = &config.execution;

    println!("\n📋 Model");
    match model.space() {
        Ok(space) => println!(
            "  • Loci: {} ({} genotypes) [-L, --loci]",
            space.loci(),
            space.size()
        ),
        Err(_) => println!("  • Loci: {} (unsupported) [-L, --loci]", model.loci),
    }
    println!(
        "  • Recombination: {:?} [-r, --recombination]",
        model.recombination
    );
    println!("  • Mating: {} [-m, --mating]", model.mating);
    match &model.fitness {
        FitnessModel::Neutral => println!("  • Fitness: Neutral (No Selection)"),
        FitnessModel::Explicit { values } => {
            println!("  • Fitness: Explicit {values:?} [--fitness]")
        }
        FitnessModel::Additive { base, effects } => {
            println!("  • Fitness: Additive, base={base}, effects={effects:?} [--additive]")
        }
        FitnessModel::Multiplicative { coefficients } => {
            println!("  • Fitness: Multiplicative {coefficients:?} [--multiplicative]")
        }
    }

    println!("\n⚙️  Execution");
    println!("  • Trials: {} [-n, --trials]", execution.trials);
    println!(
        "  • Max Generations: {} [-g, --max-generations]",
        execution.max_generations
    );
    println!("  • Tolerance: {:.1e} [--tolerance]", execution.tolerance);
    println!(
        "  • Initial Condition: {} [-i, --initial]",
        execution.initial.name()
    );
    if let Some(seed) = execution.seed {
        println!("  • Random Seed: {seed} [--seed]");
    } else {
        println!("  • Random Seed: Random [--seed]");
    }
    if execution.record_every > 0 {
        println!(
            "  • Recording: every {} generations [--record-every]",
            execution.record_every
        );
    }
    println!("  • Codec: {} [--codec]", execution.codec);
}

pub fn print_table_summary(table: &RecombinationTable) {
    let n = table.space().size();
    println!("\n🔀 Recombination Table");
    println!("  • Loci: {}", table.space().loci());
    println!("  • Map: {:?}", table.map().fractions());
    println!("  • Matrices: {} of {n}x{n}", table.len());
    println!(
        "  • Stored Entries: {} ({:.1}% of dense)",
        table.nnz(),
        100.0 * table.nnz() as f64 / (n * n * n) as f64
    );
}

pub fn print_outcome(outcome: &TrialOutcome) {
    let status = if outcome.converged {
        "converged"
    } else {
        "cap reached"
    };
    println!(
        "  Trial {:>3}: {status} after {} generations, w̄={:.6}, D={:+.6}, H={:.4}, He={:.4}",
        outcome.trial,
        outcome.generations,
        outcome.mean_fitness,
        outcome.linkage_disequilibrium(),
        haplotype_diversity(&outcome.final_frequencies),
        mean_heterozygosity(&outcome.final_frequencies),
    );
}

/// Genotype frequencies with their allele labels, largest first.
pub fn print_frequencies(outcome: &TrialOutcome, limit: usize) {
    let space = outcome.final_frequencies.space();
    let mut entries: Vec<_> = outcome
        .final_frequencies
        .iter()
        .copied()
        .enumerate()
        .collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    for (g, f) in entries.into_iter().take(limit) {
        println!("    {} {f:.6}", space.label(g));
    }
}
