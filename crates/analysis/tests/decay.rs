use hapdyn_analysis::analysis::{expected_ld_decay, implied_recombination, ld_trajectory};
use hapdyn_sim::simulation::{InitialCondition, SimulationBuilder};

#[test]
fn simulated_decay_matches_expectation() {
    for r in [0.05, 0.2, 0.5] {
        let sim = SimulationBuilder::new()
            .loci(2)
            .uniform_recombination(r)
            .initial(InitialCondition::Disequilibrium {
                alleles: vec![0.5, 0.5],
                d: 0.2,
            })
            .record_every(1)
            .max_generations(30)
            .seed(3)
            .build()
            .unwrap();
        let outcome = sim.run_trial(0, 1).unwrap();

        for (t, d) in ld_trajectory(&outcome.trajectory) {
            let expected = expected_ld_decay(0.2, r, t);
            assert!((d - expected).abs() < 1e-12, "r={r} t={t}: {d} vs {expected}");
        }
        let implied = implied_recombination(&outcome.trajectory).unwrap();
        assert!((implied - r).abs() < 1e-6, "r={r}: implied {implied}");
    }
}
