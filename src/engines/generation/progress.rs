use crate::types::Regime;
use log::{debug, info};

/// Hooks invoked while a generation is being produced
pub trait EvolutionObserver {
    fn on_generation_start(&mut self, regime: Regime, generation: u64);
    fn on_individual_evaluated(&mut self, regime: Regime, index: usize, total: usize, fitness: f64);
    fn on_generation_complete(&mut self, regime: Regime, generation: u64, best_fitness: f64, diversity: f64);
}

/// Observer that ignores every event
impl EvolutionObserver for () {
    fn on_generation_start(&mut self, _regime: Regime, _generation: u64) {}
    fn on_individual_evaluated(&mut self, _regime: Regime, _index: usize, _total: usize, _fitness: f64) {}
    fn on_generation_complete(&mut self, _regime: Regime, _generation: u64, _best_fitness: f64, _diversity: f64) {}
}

pub struct LogObserver;

impl EvolutionObserver for LogObserver {
    fn on_generation_start(&mut self, regime: Regime, generation: u64) {
        debug!("{} generation {} starting...", regime, generation + 1);
    }

    fn on_individual_evaluated(&mut self, regime: Regime, index: usize, total: usize, fitness: f64) {
        if index % 10 == 0 || index == total {
            debug!("  {} evaluated {}/{} (last fitness {:.4})", regime, index, total, fitness);
        }
    }

    fn on_generation_complete(&mut self, regime: Regime, generation: u64, best_fitness: f64, diversity: f64) {
        info!(
            "{} generation {} complete. Best fitness: {:.4}, diversity: {:.3}",
            regime, generation, best_fitness, diversity
        );
    }
}

/// Collects events in memory, mostly useful in tests and reports
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub started: Vec<(Regime, u64)>,
    pub evaluated: usize,
    pub completed: Vec<(Regime, u64, f64)>,
}

impl EvolutionObserver for RecordingObserver {
    fn on_generation_start(&mut self, regime: Regime, generation: u64) {
        self.started.push((regime, generation));
    }

    fn on_individual_evaluated(&mut self, _regime: Regime, _index: usize, _total: usize, _fitness: f64) {
        self.evaluated += 1;
    }

    fn on_generation_complete(&mut self, regime: Regime, generation: u64, best_fitness: f64, _diversity: f64) {
        self.completed.push((regime, generation, best_fitness));
    }
}
