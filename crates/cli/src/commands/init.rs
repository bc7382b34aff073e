use anyhow::{Context, Result, bail};

use crate::args::InitArgs;
use crate::printing::print_parameters;
use crate::utils::build_config;

pub fn init_configuration(args: &InitArgs) -> Result<()> {
    println!("🧬 hapdyn - Haploid Multi-Locus Dynamics");
    println!("============================================\n");

    if args.output.exists() && !args.force {
        bail!(
            "{} already exists; pass --force to overwrite",
            args.output.display()
        );
    }

    let config = build_config(&args.model, &args.execution)?;
    print_parameters(&config);

    config
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("\n✓ Configuration written: {}", args.output.display());
    println!(
        "\n💡 Use 'hapdyn run -c {}' to start the simulation",
        args.output.display()
    );

    Ok(())
}
