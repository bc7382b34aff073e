use anyhow::{Context, Result, bail};
use hapdyn_sim::evolution::{RecombinationMap, RecombinationTable, RecombinationTableBuilder};
use hapdyn_sim::simulation::{Configuration, ExecutionConfig, MAX_CONFIG_LOCI};
use hapdyn_sim::storage::Recorder;
use std::time::Instant;

use crate::args::TableArgs;
use crate::defaults::MAX_SHOWN_LOCI;
use crate::printing::print_table_summary;
use crate::utils::{model_config, parse_codec};

pub fn build_table(args: &TableArgs) -> Result<()> {
    let model = model_config(&args.model)?;
    if model.loci > MAX_CONFIG_LOCI {
        bail!(
            "table is limited to {MAX_CONFIG_LOCI} loci ({} requested)",
            model.loci
        );
    }
    let map = RecombinationMap::new(model.recombination.clone())
        .context("Invalid recombination map")?;

    let start = Instant::now();
    let table = RecombinationTableBuilder::new(model.loci, map)
        .context("Invalid table parameters")?
        .parallel(!args.serial)
        .build()
        .context("Failed to build recombination table")?;
    let elapsed = start.elapsed();

    print_table_summary(&table);
    println!("  • Build Time: {elapsed:.2?}");
    println!("  • Conservation Error: {:.3e}", table.conservation_error());
    println!("  • Symmetry Error: {:.3e}", table.symmetry_error());

    if let Some(k) = args.show {
        show_target(&table, k)?;
    }

    if let Some(path) = &args.database {
        let execution = ExecutionConfig {
            codec: parse_codec(&args.codec)?,
            ..ExecutionConfig::default()
        };
        let config = Configuration::new(model, execution);
        let mut recorder =
            Recorder::new(path, &config, 0).context("Failed to open database")?;
        recorder
            .store_table(&table)
            .context("Failed to store recombination table")?;
        let stats = recorder.close()?;
        println!(
            "\n✓ Table stored in {} ({} bytes)",
            path.display(),
            stats.bytes_written
        );
    }

    Ok(())
}

/// Print P(k | mom, dad) with mothers as rows.
fn show_target(table: &RecombinationTable, k: usize) -> Result<()> {
    let space = table.space();
    if space.loci() > MAX_SHOWN_LOCI {
        bail!(
            "--show is limited to {MAX_SHOWN_LOCI} loci ({} requested)",
            space.loci()
        );
    }
    if table.get(k).is_none() {
        bail!("genotype {k} is outside 0..{}", space.size());
    }

    println!("\nP({} | mom, dad)", space.label(k));
    print!("{:>w$}", "", w = space.loci() + 1);
    for dad in space.genotypes() {
        print!(" {:>7}", space.label(dad));
    }
    println!();
    for mom in space.genotypes() {
        print!("{} ", space.label(mom));
        for dad in space.genotypes() {
            print!(" {:>7.4}", table.probability(k, mom, dad));
        }
        println!();
    }
    Ok(())
}
