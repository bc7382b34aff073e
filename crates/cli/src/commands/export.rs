use anyhow::{Context, Result, bail};
use hapdyn_sim::FrequencyVector;
use hapdyn_sim::storage::{QueryBuilder, TrajectoryPoint, TrialRecord};

use crate::args::ExportArgs;

pub fn export_data(args: &ExportArgs) -> Result<()> {
    if !args.database.exists() {
        bail!("Database not found: {}", args.database.display());
    }
    let query = QueryBuilder::new(&args.database).context("Failed to open database")?;

    let content = match args.data_type.as_str() {
        "trials" => export_trials(&query, &args.format, args.trial)?,
        "trajectory" => export_trajectory(&query, &args.format, args.trial)?,
        "config" => {
            let config = query.get_config().context("Failed to load configuration")?;
            config.to_json()?
        }
        other => bail!("Unknown data type '{other}'. Use: trials, trajectory, or config"),
    };
    query.close()?;

    if let Some(path) = &args.output {
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("✓ Data exported to: {}", path.display());
    } else {
        println!("{content}");
    }

    Ok(())
}

fn export_trials(query: &QueryBuilder, format: &str, trial: Option<usize>) -> Result<String> {
    let trials: Vec<TrialRecord> = match trial {
        Some(t) => query
            .get_trial(t)?
            .into_iter()
            .collect(),
        None => query.get_trials()?,
    };

    match format {
        "csv" => {
            let mut content = String::from(
                "trial,seed,generations,converged,final_distance,mean_fitness,ld,frequencies\n",
            );
            for t in &trials {
                content.push_str(&format!(
                    "{},{},{},{},{},{},{},{}\n",
                    t.trial,
                    t.seed,
                    t.generations,
                    t.converged,
                    t.final_distance,
                    t.mean_fitness,
                    t.ld,
                    joined(&t.final_frequencies)
                ));
            }
            Ok(content)
        }
        "json" => Ok(serde_json::to_string_pretty(&trials)?),
        _ => bail!("Unknown format '{format}'. Use: csv or json"),
    }
}

fn export_trajectory(query: &QueryBuilder, format: &str, trial: Option<usize>) -> Result<String> {
    let ids: Vec<usize> = match trial {
        Some(t) => vec![t],
        None => query.get_trials()?.iter().map(|t| t.trial).collect(),
    };
    let mut points: Vec<TrajectoryPoint> = Vec::new();
    for id in ids {
        points.extend(query.get_trajectory(id)?);
    }

    match format {
        "csv" => {
            let mut content = String::from("trial,generation,mean_fitness,ld,frequencies\n");
            for p in &points {
                content.push_str(&format!(
                    "{},{},{},{},{}\n",
                    p.trial,
                    p.generation,
                    p.mean_fitness,
                    p.ld,
                    joined(&p.frequencies)
                ));
            }
            Ok(content)
        }
        "json" => Ok(serde_json::to_string_pretty(&points)?),
        _ => bail!("Unknown format '{format}'. Use: csv or json"),
    }
}

/// Frequencies as one space-separated CSV field.
fn joined(freqs: &FrequencyVector) -> String {
    freqs
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
