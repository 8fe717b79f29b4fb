use anyhow::{bail, Result};
use chrono::Utc;
use evobias::config::ConfigManager;
use evobias::data::CsvConnector;
use evobias::engines::evaluation::bar_simulator::MIN_EXTRA_BARS;
use evobias::engines::evaluation::{classify_regime, BarSimulator, DecisionSimulator};
use evobias::engines::generation::{ManagerSnapshot, PopulationManager};
use evobias::engines::scheduling::{ChampionParameters, EvolutionScheduler, TickOutcome};
use evobias::functions::indicators::ADX;
use evobias::functions::Indicator;
use evobias::types::Regime;
use log::info;
use serde::Serialize;

/// Bars between paper-trading passes of the active champion
const PAPER_TRADE_INTERVAL: usize = 20;

#[derive(Serialize)]
struct Report {
    generated_at: String,
    bars: usize,
    evolved: usize,
    skipped: usize,
    snapshot: ManagerSnapshot,
    parameters: Vec<ChampionParameters>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        bail!("usage: evobias <bars.csv> [config.toml] [report.json]");
    }

    let config_manager = ConfigManager::new();
    match args.get(2) {
        Some(path) => config_manager.load_from_file(path)?,
        None => config_manager.load_from_env()?,
    }
    let config = config_manager.get()?;

    let series = CsvConnector::load_bars(&args[1], config.evolution.horizon_bars + MIN_EXTRA_BARS)?;
    let bars = series.bars();
    let adx = ADX { period: 14 }.calculate(bars)?;

    let mut manager = PopulationManager::new(config.evolution.clone(), config.fitness.clone())?;
    let mut scheduler = EvolutionScheduler::new(config.scheduling.clone())?;
    let (mut evolved, mut skipped) = (0usize, 0usize);

    for (i, &strength) in adx.iter().enumerate() {
        let regime = classify_regime(strength);
        let simulator = BarSimulator::new(series.up_to(i));

        if i > 0 && i % PAPER_TRADE_INTERVAL == 0 {
            let champion = manager.get_champion(regime);
            let pass = simulator.simulate(&champion.vector, PAPER_TRADE_INTERVAL);
            scheduler.record_pass(regime, pass)?;
        }

        match scheduler.on_bar(regime, &mut manager, &simulator)? {
            TickOutcome::Evolved(champion) => {
                evolved += 1;
                info!(
                    "Bar {}: new {} champion from generation {} (fitness {:.3})",
                    i,
                    regime,
                    champion.generation,
                    champion.metrics().fitness
                );
            }
            TickOutcome::Skipped { .. } => skipped += 1,
            TickOutcome::Idle => {}
        }
    }

    let parameters = Regime::ALL
        .iter()
        .map(|&regime| {
            ChampionParameters::from_champion(
                &manager.get_champion(regime),
                config.scheduling.min_component_weight,
            )
        })
        .collect::<evobias::Result<Vec<_>>>()?;

    let report = Report {
        generated_at: Utc::now().to_rfc3339(),
        bars: bars.len(),
        evolved,
        skipped,
        snapshot: manager.snapshot(),
        parameters,
    };
    let json = serde_json::to_string_pretty(&report)?;

    match args.get(3) {
        Some(path) => {
            std::fs::write(path, json)?;
            info!("Report written to {}", path);
        }
        None => println!("{}", json),
    }

    info!(
        "Replayed {} bars: {} generations evolved, {} skipped",
        scheduler.bars_seen(),
        evolved,
        skipped
    );
    Ok(())
}
