use anyhow::{Context, Result};
use hapdyn_sim::evolution::TableCache;
use hapdyn_sim::simulation::{Configuration, Simulation, TrialOutcome};
use hapdyn_sim::storage::Recorder;
use indicatif::ProgressBar;

use crate::args::RunArgs;
use crate::printing::{print_frequencies, print_outcome, print_simulation_parameters};
use crate::utils::{build_config, progress_style};

/// Trials beyond this are summarized instead of listed.
const MAX_LISTED_TRIALS: usize = 20;

pub fn run_simulation(args: &RunArgs) -> Result<()> {
    println!("🧬 hapdyn - Running Simulation");
    println!("============================================");

    let config = load_config(args)?;
    let cache = TableCache::new();
    let sim = Simulation::from_config_cached(config, &cache)
        .context("Failed to initialize simulation")?;

    tracing::debug!(
        seed = sim.seed(),
        entries = sim.table().nnz(),
        cached = cache.len(),
        "simulation ready"
    );
    print_simulation_parameters(&sim);

    let trials = sim.config().execution.trials;
    println!("Running {trials} trials...");

    let pb = if args.progress {
        let pb = ProgressBar::new(trials as u64);
        pb.set_style(progress_style()?);
        Some(pb)
    } else {
        None
    };

    let results = sim.run_trials_with(|_| {
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    });

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    let mut outcomes = Vec::with_capacity(results.len());
    let mut failures = 0;
    for (trial, result) in results.into_iter().enumerate() {
        match result {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                failures += 1;
                eprintln!("⚠️  Trial {trial} failed: {e}");
            }
        }
    }

    report(&outcomes);

    if let Some(path) = &args.database {
        let mut recorder = Recorder::new(path, sim.config(), sim.seed())
            .context("Failed to create recorder")?;
        recorder
            .store_table(sim.table())
            .context("Failed to store recombination table")?;
        for outcome in &outcomes {
            recorder
                .record_trial(outcome)
                .with_context(|| format!("Failed to record trial {}", outcome.trial))?;
        }
        let stats = recorder.close().context("Failed to close recorder")?;
        println!(
            "\n✓ Recorded {} trials ({} trajectory points, {} bytes) to {}",
            stats.trials_recorded,
            stats.trajectory_points,
            stats.bytes_written,
            path.display()
        );
    }

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&outcomes)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("✓ Outcomes written to: {}", path.display());
    }

    println!("\n✓ Simulation complete!");
    if let Some(path) = &args.database {
        println!(
            "\n💡 Use 'hapdyn info -d {}' to view results",
            path.display()
        );
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {trials} trials failed");
    }
    Ok(())
}

fn load_config(args: &RunArgs) -> Result<Configuration> {
    match &args.config {
        Some(path) => {
            let mut config = Configuration::load(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            if let Some(seed) = args.execution.seed {
                config.execution.seed = Some(seed);
            }
            Ok(config)
        }
        None => build_config(&args.model, &args.execution),
    }
}

fn report(outcomes: &[TrialOutcome]) {
    let converged = outcomes.iter().filter(|o| o.converged).count();
    println!("\n📈 Results");
    println!("  Converged: {converged}/{}", outcomes.len());

    if outcomes.len() <= MAX_LISTED_TRIALS {
        for outcome in outcomes {
            print_outcome(outcome);
        }
    } else {
        let mean_generations = outcomes.iter().map(|o| o.generations).sum::<usize>() as f64
            / outcomes.len() as f64;
        println!("  Mean generations: {mean_generations:.1}");
    }

    if let [single] = outcomes {
        println!("  Final frequencies:");
        print_frequencies(single, 8);
    }
}
