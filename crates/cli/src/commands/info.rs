use anyhow::{Context, Result};
use hapdyn_sim::storage::QueryBuilder;
use std::path::Path;

use crate::printing::print_parameters;

pub fn show_info(database: &Path) -> Result<()> {
    if !database.exists() {
        anyhow::bail!("Database not found: {}", database.display());
    }
    let query = QueryBuilder::new(database).context("Failed to open database")?;
    let config = query
        .get_config()
        .context("Failed to get simulation info")?;
    let stats = query.stats()?;

    println!("\n📊 Simulation Information");
    println!("{}", "=".repeat(50));
    if let Some(seed) = query.get_seed()? {
        println!("Seed: {seed}");
    }
    if let Some(created) = query.get_metadata_value("created_at")? {
        println!("Created: {created} (unix seconds)");
    }
    println!(
        "Stored: {} trials, {} trajectory points, {} tables",
        stats.trials, stats.trajectory_points, stats.tables
    );

    print_parameters(&config);

    let trials = query.get_trials().context("Failed to load trials")?;
    if !trials.is_empty() {
        println!("\n📈 Trials");
        for t in &trials {
            println!(
                "  Trial {:>3}: {} after {} generations, w̄={:.6}, D={:+.6}",
                t.trial,
                if t.converged { "converged" } else { "cap reached" },
                t.generations,
                t.mean_fitness,
                t.ld
            );
        }
    }

    let tables = query.list_tables()?;
    if !tables.is_empty() {
        println!("\n🔀 Stored Tables");
        for (loci, map) in tables {
            println!("  L={loci} map={map:?}");
        }
    }

    query.close()?;
    Ok(())
}
