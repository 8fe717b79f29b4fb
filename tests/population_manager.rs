use evobias::config::{EvaluationMode, EvolutionConfig, FitnessConfig};
use evobias::engines::evaluation::FitnessEvaluator;
use evobias::engines::generation::{Gene, ParameterVector, PopulationManager, RecordingObserver};
use evobias::types::Regime;
use evobias::{EvobiasError, Result};
use std::time::Duration;

fn no_trades(_: &ParameterVector, _: usize) -> Result<Vec<f64>> {
    Ok(Vec::new())
}

/// Returns derived from the genes, so fitness differs between individuals
fn gene_returns(vector: &ParameterVector, _: usize) -> Result<Vec<f64>> {
    Ok(vec![
        vector.gene(Gene::StFactor) - 3.0,
        vector.gene(Gene::RiskTpAtr) - 2.0,
        vector.gene(Gene::BrainThreshold) - 0.6,
        vector.gene(Gene::WeightLead) - 0.5,
    ])
}

fn manager_with(config: EvolutionConfig) -> PopulationManager {
    PopulationManager::new(config, FitnessConfig::default()).unwrap()
}

#[test]
fn test_same_seed_same_evolution() {
    let mut a = manager_with(EvolutionConfig::default());
    let mut b = manager_with(EvolutionConfig::default());

    for regime in [Regime::Trend, Regime::Range, Regime::Trend, Regime::Choppy] {
        let ca = a.evolve(regime, &[1.0, -0.5], &gene_returns).unwrap();
        let cb = b.evolve(regime, &[1.0, -0.5], &gene_returns).unwrap();
        assert_eq!(ca, cb);
    }

    for regime in Regime::ALL {
        assert_eq!(a.population_snapshot(regime), b.population_snapshot(regime));
    }
    assert_eq!(a.snapshot(), b.snapshot());
    assert_eq!(a.generation(), 4);
}

#[test]
fn test_parallel_matches_sequential() {
    let mut sequential = manager_with(EvolutionConfig::default());
    let mut parallel = manager_with(EvolutionConfig {
        evaluation_mode: EvaluationMode::Parallel,
        ..EvolutionConfig::default()
    });

    for _ in 0..3 {
        let a = sequential.evolve(Regime::Range, &[], &gene_returns).unwrap();
        let b = parallel.evolve(Regime::Range, &[], &gene_returns).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn test_generation_without_trades_completes() {
    let mut manager = manager_with(EvolutionConfig::default());
    let champion = manager.evolve(Regime::Choppy, &[], &no_trades).unwrap();

    assert_eq!(champion.generation, 1);
    assert_eq!(champion.metrics().fitness, 0.0);
    assert_eq!(champion.metrics().trade_count, 0);
    assert_eq!(manager.population_snapshot(Regime::Choppy).len(), 20);
}

#[test]
fn test_identical_population_gets_injection() {
    let mut manager = manager_with(EvolutionConfig {
        mutation_rate: 0.0,
        ..EvolutionConfig::default()
    });
    let clone = manager.population_snapshot(Regime::Trend)[0].clone();
    manager.replace_population(Regime::Trend, vec![clone.clone(); 20]).unwrap();

    manager.evolve(Regime::Trend, &[], &no_trades).unwrap();

    let population = manager.population_snapshot(Regime::Trend);
    let distinct = population
        .iter()
        .filter(|v| v.genes() != clone.genes())
        .count();
    assert_eq!(distinct, 2);
    assert!(population[..10].iter().all(|v| v.genes() == clone.genes()));
}

#[test]
fn test_elites_survive_unchanged() {
    let mut manager = manager_with(EvolutionConfig::default());
    let evaluator = FitnessEvaluator::new(FitnessConfig::default(), 100);

    let mut ranked: Vec<(f64, ParameterVector)> = manager
        .population_snapshot(Regime::Range)
        .into_iter()
        .map(|v| (evaluator.evaluate(&v, &gene_returns).unwrap().fitness, v))
        .collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

    let champion = manager.evolve(Regime::Range, &[], &gene_returns).unwrap();
    let next = manager.population_snapshot(Regime::Range);

    assert_eq!(champion.vector.genes(), ranked[0].1.genes());
    assert_eq!(champion.metrics().fitness, ranked[0].0);
    for (elite, (fitness, expected)) in next.iter().zip(ranked.iter()).take(4) {
        assert_eq!(elite.genes(), expected.genes());
        assert_eq!(elite.fitness(), *fitness);
    }
}

/// Population whose members differ only in `StFactor` as far as fitness goes
fn population_split_by_st_factor(manager: &PopulationManager, regime: Regime, low: &[usize]) -> Vec<ParameterVector> {
    let mut population = manager.population_snapshot(regime);
    for (i, vector) in population.iter_mut().enumerate() {
        for gene in [
            Gene::ExitRsiEnable,
            Gene::ExitMomoEnable,
            Gene::ExitStallEnable,
            Gene::ExitMaEnable,
            Gene::StackThreshold,
            Gene::BrainThreshold,
            Gene::VolumeWeight,
        ] {
            vector.set_gene(gene, gene.spec().min);
        }
        vector.set_gene(Gene::StFactor, if low.contains(&i) { 2.0 } else { 4.0 });
    }
    population
}

#[test]
fn test_all_tied_keeps_prior_order() {
    let mut manager = manager_with(EvolutionConfig::default());
    let before = manager.population_snapshot(Regime::Trend);

    let champion = manager.evolve(Regime::Trend, &[], &no_trades).unwrap();
    let next = manager.population_snapshot(Regime::Trend);

    assert_eq!(champion.vector.genes(), before[0].genes());
    for i in 0..4 {
        assert_eq!(next[i].genes(), before[i].genes());
    }
}

#[test]
fn test_partial_tie_keeps_prior_order() {
    let mut manager = manager_with(EvolutionConfig::default());
    let population = population_split_by_st_factor(&manager, Regime::Range, &[3, 7, 11, 15, 19]);
    manager.replace_population(Regime::Range, population.clone()).unwrap();

    // same returns for every low-factor vector, none for the rest
    let split = |vector: &ParameterVector, _: usize| -> Result<Vec<f64>> {
        if vector.gene(Gene::StFactor) < 3.0 {
            Ok(vec![1.0, -0.5])
        } else {
            Ok(Vec::new())
        }
    };
    let champion = manager.evolve(Regime::Range, &[], &split).unwrap();
    let next = manager.population_snapshot(Regime::Range);

    assert_eq!(champion.vector.genes(), population[3].genes());
    for (elite, expected) in next.iter().zip([3, 7, 11, 15]) {
        assert_eq!(elite.genes(), population[expected].genes());
    }
}

#[test]
fn test_nan_fitness_ranks_last() {
    let mut manager = manager_with(EvolutionConfig::default());
    let population = population_split_by_st_factor(&manager, Regime::Choppy, &[0, 1]);
    manager.replace_population(Regime::Choppy, population.clone()).unwrap();

    let poisoned = |vector: &ParameterVector, _: usize| -> Result<Vec<f64>> {
        if vector.gene(Gene::StFactor) < 3.0 {
            Ok(vec![f64::NAN, 1.0])
        } else {
            Ok(Vec::new())
        }
    };
    let champion = manager.evolve(Regime::Choppy, &[], &poisoned).unwrap();
    let next = manager.population_snapshot(Regime::Choppy);

    assert_eq!(champion.vector.genes(), population[2].genes());
    assert_eq!(champion.metrics().fitness, 0.0);
    for (elite, expected) in next.iter().zip(2..6) {
        assert_eq!(elite.genes(), population[expected].genes());
    }
}

#[test]
fn test_time_budget_keeps_previous_state() {
    let config = EvolutionConfig {
        time_budget_ms: Some(5),
        ..EvolutionConfig::default()
    };
    let mut manager = manager_with(config.clone());
    let champion_before = manager.get_champion(Regime::Trend);
    let population_before = manager.population_snapshot(Regime::Trend);

    let slow = |_: &ParameterVector, _: usize| -> Result<Vec<f64>> {
        std::thread::sleep(Duration::from_millis(2));
        Ok(vec![1.0, -1.0])
    };
    let result = manager.evolve(Regime::Trend, &[], &slow);

    assert!(matches!(result, Err(EvobiasError::TimeBudgetExceeded { budget_ms: 5, .. })));
    assert_eq!(manager.generation(), 0);
    assert_eq!(manager.get_champion(Regime::Trend), champion_before);
    assert_eq!(manager.population_snapshot(Regime::Trend), population_before);

    // random state untouched: the next generation matches a fresh manager's first
    let mut fresh = manager_with(config);
    assert_eq!(
        manager.evolve(Regime::Trend, &[], &no_trades).unwrap(),
        fresh.evolve(Regime::Trend, &[], &no_trades).unwrap()
    );
}

#[test]
fn test_simulator_error_keeps_previous_state() {
    let mut manager = manager_with(EvolutionConfig::default());
    manager.evolve(Regime::Range, &[], &gene_returns).unwrap();
    let snapshot = manager.snapshot();
    let population = manager.population_snapshot(Regime::Range);

    let broken = |_: &ParameterVector, _: usize| -> Result<Vec<f64>> {
        Err(EvobiasError::Simulation("missing bars".into()))
    };
    let err = manager.evolve(Regime::Range, &[], &broken).unwrap_err();

    assert!(err.is_skippable());
    assert_eq!(manager.snapshot(), snapshot);
    assert_eq!(manager.population_snapshot(Regime::Range), population);
}

#[test]
fn test_champion_lookup_by_name() {
    let manager = manager_with(EvolutionConfig::default());

    let champion = manager.get_champion_named("range").unwrap();
    assert_eq!(champion.regime, Regime::Range);
    assert_eq!(
        champion.extract_named("RSI_PERIOD").unwrap(),
        champion.vector.gene(Gene::RsiPeriod)
    );
    assert!(matches!(
        manager.get_champion_named("sideways"),
        Err(EvobiasError::InvalidRegime(_))
    ));
}

#[test]
fn test_observer_sees_every_individual() {
    let mut manager = manager_with(EvolutionConfig::default());
    let mut observer = RecordingObserver::default();

    let champion = manager
        .evolve_with_observer(Regime::Choppy, &[], &gene_returns, &mut observer)
        .unwrap();

    assert_eq!(observer.started, vec![(Regime::Choppy, 0)]);
    assert_eq!(observer.evaluated, 20);
    assert_eq!(observer.completed, vec![(Regime::Choppy, 1, champion.metrics().fitness)]);
}

#[test]
fn test_champion_snapshot_outlives_evolution() {
    let mut manager = manager_with(EvolutionConfig::default());
    let first = manager.evolve(Regime::Trend, &[], &gene_returns).unwrap();
    let held = first.vector.clone();

    for _ in 0..3 {
        manager.evolve(Regime::Trend, &[], &gene_returns).unwrap();
    }

    assert_eq!(first.vector, held);
    assert_eq!(first.generation, 1);
    assert_eq!(manager.get_champion(Regime::Trend).generation, 4);
}
