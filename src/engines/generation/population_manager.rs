use crate::config::{EvaluationMode, EvolutionConfig, FitnessConfig, ConfigSection};
use crate::engines::evaluation::{DecisionSimulator, FitnessEvaluator};
use crate::engines::generation::{
    diversity::DiversityMonitor,
    genes::{validate_gene_table, GENE_TABLE},
    operators::{elite_count, random_population, tournament_offspring},
    progress::EvolutionObserver,
    vector::{ParameterVector, VectorMetrics},
};
use crate::engines::metrics::ReturnMetrics;
use crate::error::{EvobiasError, Result};
use crate::types::Regime;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Immutable copy of the fittest vector of a regime at generation end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionSnapshot {
    pub regime: Regime,
    /// Value of the shared generation counter when this champion was published
    pub generation: u64,
    pub vector: ParameterVector,
}

impl ChampionSnapshot {
    pub fn extract_named(&self, name: &str) -> Result<f64> {
        self.vector.extract_named(name)
    }

    pub fn metrics(&self) -> &VectorMetrics {
        self.vector.metrics()
    }
}

/// Serializable view of every published champion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagerSnapshot {
    pub generation: u64,
    pub champions: Vec<ChampionSnapshot>,
}

struct RegimeSlot {
    population: Vec<ParameterVector>,
    champion: Arc<ChampionSnapshot>,
}

/// Owns the three regime populations and their champions.
///
/// Each call to [`PopulationManager::evolve`] runs exactly one generation for
/// one regime. The manager is not reentrant; callers drive it from a single
/// periodic loop.
pub struct PopulationManager {
    config: EvolutionConfig,
    evaluator: FitnessEvaluator,
    diversity: DiversityMonitor,
    slots: [RegimeSlot; 3],
    generation: u64,
    rng: StdRng,
}

impl PopulationManager {
    pub fn new(config: EvolutionConfig, fitness: FitnessConfig) -> Result<Self> {
        config.validate()?;
        fitness.validate()?;
        validate_gene_table(&GENE_TABLE)?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let slots = [Regime::Trend, Regime::Range, Regime::Choppy].map(|regime| {
            let population = random_population(config.population_size, &mut rng);
            let champion = Arc::new(ChampionSnapshot {
                regime,
                generation: 0,
                vector: population[0].clone(),
            });
            RegimeSlot { population, champion }
        });

        Ok(Self {
            evaluator: FitnessEvaluator::new(fitness, config.horizon_bars),
            diversity: DiversityMonitor::new(config.diversity_target, config.diversity_injection_rate),
            config,
            slots,
            generation: 0,
            rng,
        })
    }

    /// Generations completed across all regimes
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get_champion(&self, regime: Regime) -> Arc<ChampionSnapshot> {
        Arc::clone(&self.slots[regime.index()].champion)
    }

    pub fn get_champion_named(&self, regime: &str) -> Result<Arc<ChampionSnapshot>> {
        Ok(self.get_champion(regime.parse()?))
    }

    /// Deep copy of a regime's current population
    pub fn population_snapshot(&self, regime: Regime) -> Vec<ParameterVector> {
        self.slots[regime.index()].population.clone()
    }

    /// Replace a regime's population, e.g. to restore persisted state
    pub fn replace_population(&mut self, regime: Regime, population: Vec<ParameterVector>) -> Result<()> {
        if population.len() != self.config.population_size {
            return Err(EvobiasError::Configuration(format!(
                "Population for {} must have {} members, got {}",
                regime,
                self.config.population_size,
                population.len()
            )));
        }
        self.slots[regime.index()].population = population;
        Ok(())
    }

    pub fn snapshot(&self) -> ManagerSnapshot {
        ManagerSnapshot {
            generation: self.generation,
            champions: self.slots.iter().map(|slot| (*slot.champion).clone()).collect(),
        }
    }

    pub fn evolve<S: DecisionSimulator>(
        &mut self,
        regime: Regime,
        recent_returns: &[f64],
        simulator: &S,
    ) -> Result<Arc<ChampionSnapshot>> {
        self.evolve_with_observer(regime, recent_returns, simulator, &mut ())
    }

    /// Run one generation for `regime` and publish its champion.
    ///
    /// On any error the stored population, champion, generation counter and
    /// random state are left exactly as they were.
    pub fn evolve_with_observer<S: DecisionSimulator, O: EvolutionObserver>(
        &mut self,
        regime: Regime,
        recent_returns: &[f64],
        simulator: &S,
        observer: &mut O,
    ) -> Result<Arc<ChampionSnapshot>> {
        let started = Instant::now();
        observer.on_generation_start(regime, self.generation);

        if !recent_returns.is_empty() {
            debug!(
                "{}: {} logged returns, mean {:.3}%",
                regime,
                recent_returns.len(),
                ReturnMetrics::mean(recent_returns)
            );
        }

        let mut evaluated = self.slots[regime.index()].population.clone();
        self.evaluate(regime, &mut evaluated, simulator, observer, started)?;

        evaluated.sort_by(|a, b| rank_key(b.fitness()).total_cmp(&rank_key(a.fitness())));

        let champion = Arc::new(ChampionSnapshot {
            regime,
            generation: self.generation + 1,
            vector: evaluated[0].clone(),
        });

        let mut next_generation = self.breed(&evaluated);
        let diversity = DiversityMonitor::score(&next_generation);
        self.diversity.enforce(&mut next_generation, &mut self.rng);

        let slot = &mut self.slots[regime.index()];
        slot.population = next_generation;
        slot.champion = Arc::clone(&champion);
        self.generation += 1;

        let metrics = champion.metrics();
        info!(
            "Gen {} | {} | Fitness: {:.3} | WinRate: {:.0}% | Sharpe: {:.2} | Complexity: {} | {}ms",
            self.generation,
            regime,
            metrics.fitness,
            metrics.win_rate * 100.0,
            metrics.sharpe_ratio,
            metrics.complexity,
            started.elapsed().as_millis()
        );
        observer.on_generation_complete(regime, self.generation, metrics.fitness, diversity);

        Ok(champion)
    }

    fn evaluate<S: DecisionSimulator, O: EvolutionObserver>(
        &self,
        regime: Regime,
        population: &mut [ParameterVector],
        simulator: &S,
        observer: &mut O,
        started: Instant,
    ) -> Result<()> {
        let total = population.len();

        match self.config.evaluation_mode {
            EvaluationMode::Sequential => {
                for (i, vector) in population.iter_mut().enumerate() {
                    let metrics = self.evaluator.evaluate(vector, simulator)?;
                    vector.set_metrics(metrics);
                    observer.on_individual_evaluated(regime, i + 1, total, metrics.fitness);
                    self.check_budget(started)?;
                }
            }
            EvaluationMode::Parallel => {
                let evaluator = &self.evaluator;
                let results: Vec<VectorMetrics> = population
                    .par_iter()
                    .map(|vector| evaluator.evaluate(vector, simulator))
                    .collect::<Result<Vec<_>>>()?;

                for (i, (vector, metrics)) in population.iter_mut().zip(results).enumerate() {
                    vector.set_metrics(metrics);
                    observer.on_individual_evaluated(regime, i + 1, total, metrics.fitness);
                }
                self.check_budget(started)?;
            }
        }

        Ok(())
    }

    fn check_budget(&self, started: Instant) -> Result<()> {
        if let Some(budget_ms) = self.config.time_budget_ms {
            let elapsed = started.elapsed();
            if elapsed > Duration::from_millis(budget_ms) {
                warn!(
                    "Evolution exceeded its {}ms budget after {}ms, keeping previous champion",
                    budget_ms,
                    elapsed.as_millis()
                );
                return Err(EvobiasError::TimeBudgetExceeded {
                    budget_ms,
                    elapsed_ms: elapsed.as_millis() as u64,
                });
            }
        }
        Ok(())
    }

    /// Elites, then crossover offspring or elite clones; non-elites mutated
    fn breed(&mut self, sorted: &[ParameterVector]) -> Vec<ParameterVector> {
        let size = self.config.population_size;
        let elites = elite_count(size, self.config.elitism_rate);

        let mut next_generation: Vec<ParameterVector> = sorted[..elites].to_vec();

        while next_generation.len() < size {
            let child = if self.rng.gen::<f64>() < self.config.crossover_rate {
                tournament_offspring(sorted, self.config.tournament_size, &mut self.rng)
            } else {
                sorted[self.rng.gen_range(0..elites)].clone()
            };
            next_generation.push(child);
        }

        for child in next_generation.iter_mut().skip(elites) {
            child.mutate(self.config.mutation_rate, &mut self.rng);
        }

        next_generation
    }
}

/// NaN fitness ranks last
fn rank_key(fitness: f64) -> f64 {
    if fitness.is_nan() {
        f64::NEG_INFINITY
    } else {
        fitness
    }
}
