use crate::config::{ConfigSection, SchedulingConfig};
use crate::engines::evaluation::DecisionSimulator;
use crate::engines::generation::{ChampionSnapshot, LogObserver, PopulationManager};
use crate::error::Result;
use crate::types::Regime;
use log::{debug, warn};
use std::collections::VecDeque;
use std::sync::Arc;

/// What happened on one scheduling tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Warm-up, cooldown or too few logged returns
    Idle,
    Evolved(Arc<ChampionSnapshot>),
    /// A recoverable failure; the previous champion stays active
    Skipped { regime: Regime, reason: String },
}

/// Decides when a regime's population evolves.
///
/// Owns the per-regime returns logs (capped, oldest evicted first) and the
/// per-regime bar cooldowns. Each evolution receives a copy of the log.
pub struct EvolutionScheduler {
    config: SchedulingConfig,
    logs: [VecDeque<f64>; 3],
    bars_since_evolve: [usize; 3],
    bars_seen: usize,
}

impl EvolutionScheduler {
    pub fn new(config: SchedulingConfig) -> Result<Self> {
        config.validate()?;
        let cooldown = config.cooldown_bars;
        Ok(Self {
            logs: Default::default(),
            bars_since_evolve: [cooldown; 3],
            bars_seen: 0,
            config,
        })
    }

    pub fn bars_seen(&self) -> usize {
        self.bars_seen
    }

    /// Log a realized percent return for the regime it was earned in
    pub fn record_return(&mut self, regime: Regime, return_pct: f64) {
        let log = &mut self.logs[regime.index()];
        log.push_back(return_pct);
        while log.len() > self.config.returns_log_capacity {
            log.pop_front();
        }
    }

    /// Log the returns of one paper-trading pass of the active champion.
    ///
    /// A skippable failure drops the pass with a warning and logs nothing;
    /// other errors are returned. Yields the number of returns logged.
    pub fn record_pass(&mut self, regime: Regime, pass: Result<Vec<f64>>) -> Result<usize> {
        match pass {
            Ok(returns) => {
                let count = returns.len();
                for return_pct in returns {
                    self.record_return(regime, return_pct);
                }
                Ok(count)
            }
            Err(e) if e.is_skippable() => {
                warn!("Paper-trading pass for {} dropped: {}", regime, e);
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }

    /// Copy of a regime's log, oldest first
    pub fn returns(&self, regime: Regime) -> Vec<f64> {
        self.logs[regime.index()].iter().copied().collect()
    }

    pub fn is_ready(&self, regime: Regime) -> bool {
        self.bars_seen >= self.config.warmup_bars
            && self.logs[regime.index()].len() >= self.config.min_regime_returns
            && self.bars_since_evolve[regime.index()] >= self.config.cooldown_bars
    }

    /// Advance one bar and evolve `regime` if it is due.
    ///
    /// Every attempt restarts the regime's cooldown. Skippable failures
    /// (simulation errors, time budget) become [`TickOutcome::Skipped`];
    /// anything else is returned as an error.
    pub fn on_bar<S: DecisionSimulator>(
        &mut self,
        regime: Regime,
        manager: &mut PopulationManager,
        simulator: &S,
    ) -> Result<TickOutcome> {
        self.bars_seen += 1;
        for count in self.bars_since_evolve.iter_mut() {
            *count = count.saturating_add(1);
        }

        if !self.is_ready(regime) {
            return Ok(TickOutcome::Idle);
        }

        self.bars_since_evolve[regime.index()] = 0;
        let returns = self.returns(regime);
        debug!("Bar {}: evolving {} with {} logged returns", self.bars_seen, regime, returns.len());

        match manager.evolve_with_observer(regime, &returns, simulator, &mut LogObserver) {
            Ok(champion) => Ok(TickOutcome::Evolved(champion)),
            Err(e) if e.is_skippable() => {
                warn!("Evolution of {} skipped: {}", regime, e);
                Ok(TickOutcome::Skipped {
                    regime,
                    reason: e.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }
}
