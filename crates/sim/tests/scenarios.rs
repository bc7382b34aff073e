//! End-to-end runs through the builder, driver and storage.

use hapdyn_sim::evolution::{FitnessModel, MatingRule, TableCache};
use hapdyn_sim::simulation::{Configuration, InitialCondition, Simulation, SimulationBuilder};
use hapdyn_sim::storage::{QueryBuilder, Recorder};
use std::sync::Arc;

#[test]
fn test_equilibrium_start_stays_put() {
    let sim = SimulationBuilder::new()
        .loci(2)
        .uniform_recombination(0.25)
        .initial(InitialCondition::Uniform)
        .record_every(1)
        .seed(1)
        .build()
        .unwrap();
    let outcome = sim.run_trial(0, 1).unwrap();
    assert!(outcome.converged);
    assert_eq!(outcome.generations, 1);
    for v in outcome.final_frequencies.iter() {
        assert!((v - 0.25).abs() < 1e-12);
    }
    assert!(outcome.trajectory.iter().all(|r| r.ld.abs() < 1e-12));
}

#[test]
fn test_fixed_genotype_without_recombination() {
    let sim = SimulationBuilder::new()
        .loci(2)
        .recombination(vec![0.0])
        .fitness(FitnessModel::Explicit {
            values: vec![1.0; 4],
        })
        .initial(InitialCondition::Genotypes {
            frequencies: vec![1.0, 0.0, 0.0, 0.0],
        })
        .max_generations(25)
        .record_every(1)
        .build()
        .unwrap();
    let outcome = sim.run_trial(0, 0).unwrap();
    assert_eq!(outcome.final_frequencies.as_slice(), &[1.0, 0.0, 0.0, 0.0]);
    for record in &outcome.trajectory {
        assert_eq!(record.frequencies.as_slice(), &[1.0, 0.0, 0.0, 0.0]);
    }
}

#[test]
fn test_disequilibrium_decays_geometrically() {
    let r = 0.1;
    let sim = SimulationBuilder::new()
        .loci(2)
        .uniform_recombination(r)
        .initial(InitialCondition::Disequilibrium {
            alleles: vec![0.3, 0.6],
            d: 0.1,
        })
        .record_every(1)
        .max_generations(20)
        .tolerance(1e-300)
        .build()
        .unwrap();
    let outcome = sim.run_trial(0, 0).unwrap();
    let d0 = outcome.trajectory[0].ld;
    for record in &outcome.trajectory {
        let expected = d0 * (1.0 - r).powi(record.generation as i32);
        assert!((record.ld - expected).abs() < 1e-12);
        // Allele frequencies do not move under neutrality.
        let p = record.frequencies.allele_frequencies();
        assert!((p[0] - 0.3).abs() < 1e-12 && (p[1] - 0.6).abs() < 1e-12);
    }
}

#[test]
fn test_selection_fixes_the_fittest_haplotype() {
    let sim = SimulationBuilder::new()
        .loci(3)
        .recombination(vec![0.1, 0.1])
        .fitness(FitnessModel::Multiplicative {
            coefficients: vec![0.1, 0.2, 0.05],
        })
        .initial(InitialCondition::Uniform)
        .tolerance(1e-12)
        .build()
        .unwrap();
    let outcome = sim.run_trial(0, 0).unwrap();
    assert!(outcome.converged);
    assert!(outcome.final_frequencies.get(0b111) > 0.999);
    assert!(outcome.mean_fitness > 1.38);
}

#[test]
fn test_assortative_mating_run() {
    let sim = SimulationBuilder::new()
        .loci(2)
        .uniform_recombination(0.5)
        .mating(MatingRule::Assortative { distortion: 0.1 })
        .initial(InitialCondition::RandomGenotypes)
        .trials(4)
        .seed(3)
        .build()
        .unwrap();
    for result in sim.run_trials() {
        let outcome = result.unwrap();
        assert!((outcome.final_frequencies.total() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn test_config_file_drives_identical_runs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let config = SimulationBuilder::new()
        .loci(3)
        .recombination(vec![0.05, 0.3])
        .initial(InitialCondition::Corners)
        .trials(10)
        .seed(17)
        .configuration()
        .unwrap();
    config.save(&path).unwrap();

    let cache = TableCache::new();
    let a = Simulation::from_config_cached(Configuration::load(&path).unwrap(), &cache).unwrap();
    let b = Simulation::from_config_cached(config, &cache).unwrap();
    assert!(Arc::ptr_eq(a.table(), b.table()));

    let ra: Vec<_> = a.run_trials().into_iter().map(Result::unwrap).collect();
    let rb: Vec<_> = b.run_trials().into_iter().map(Result::unwrap).collect();
    assert_eq!(ra, rb);
    // Corner trials start monomorphic and stay there.
    for outcome in &ra[..8] {
        assert_eq!(outcome.final_frequencies.get(outcome.trial), 1.0);
    }
}

#[test]
fn test_recorded_run_can_be_queried() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("run.sqlite");
    let sim = SimulationBuilder::new()
        .loci(2)
        .uniform_recombination(0.2)
        .initial(InitialCondition::RandomAlleles)
        .trials(2)
        .record_every(10)
        .seed(5)
        .build()
        .unwrap();

    let mut recorder = Recorder::new(&db, sim.config(), sim.seed()).unwrap();
    for result in sim.run_trials() {
        recorder.record_trial(&result.unwrap()).unwrap();
    }
    recorder.close().unwrap();

    let query = QueryBuilder::new(&db).unwrap();
    let trials = query.get_trials().unwrap();
    assert_eq!(trials.len(), 2);
    assert!(trials.iter().all(|t| t.converged));
    let meta = query.get_metadata().unwrap();
    assert_eq!(meta.get("loci").map(String::as_str), Some("2"));
    assert_eq!(meta.get("mating").map(String::as_str), Some("random"));
}
