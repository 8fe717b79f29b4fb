use evobias::data::{Bar, CsvConnector};
use evobias::engines::evaluation::{BarSimulator, DecisionSimulator};
use evobias::engines::generation::ParameterVector;
use evobias::types::ExitReason;
use evobias::EvobiasError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Sine-wave price path with an upward drift
fn wave_csv(rows: usize) -> String {
    let mut csv = String::from("Open,High,Low,Close,Volume\n");
    let mut prev: f64 = 100.0;
    for i in 0..rows {
        let close = 100.0 + 0.05 * i as f64 + 6.0 * (i as f64 / 9.0).sin();
        let high = prev.max(close) + 0.4;
        let low = prev.min(close) - 0.4;
        writeln!(csv, "{},{},{},{},{}", prev, high, low, close, 1000 + i).unwrap();
        prev = close;
    }
    csv
}

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("evobias_{}_{}.csv", name, std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_bars_from_csv() {
    let path = write_temp("load", &wave_csv(300));
    let series = CsvConnector::load_bars(&path, 150).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(series.len(), 300);
    let first: &Bar = &series.bars()[0];
    assert_eq!(first.open, 100.0);
    assert_eq!(first.volume, 1000.0);
    assert!(series.bars().iter().all(|b| b.low <= b.close && b.close <= b.high));
}

#[test]
fn test_short_file_rejected() {
    let path = write_temp("short", &wave_csv(40));
    let result = CsvConnector::load_bars(&path, 150);
    std::fs::remove_file(&path).ok();

    assert!(matches!(result, Err(EvobiasError::DataLoading(_))));
}

#[test]
fn test_inconsistent_bar_rejected() {
    let csv = "open,high,low,close\n100,101,99,100.5\n100,99,98,100\n";
    let path = write_temp("broken", csv);
    let result = CsvConnector::load_bars(&path, 1);
    std::fs::remove_file(&path).ok();

    assert!(result.is_err());
}

#[test]
fn test_simulated_trades_on_loaded_bars() {
    let path = write_temp("simulate", &wave_csv(400));
    let series = CsvConnector::load_bars(&path, 150).unwrap();
    std::fs::remove_file(&path).ok();

    let simulator = BarSimulator::new(series.bars());
    let mut rng = StdRng::seed_from_u64(21);
    let n = series.len();

    for _ in 0..10 {
        let vector = ParameterVector::random(&mut rng);
        let trades = simulator.simulate_trades(&vector, 100).unwrap();
        let returns = simulator.simulate(&vector, 100).unwrap();

        assert_eq!(trades.len(), returns.len());
        let mut last_exit = 0;
        for (i, trade) in trades.iter().enumerate() {
            assert!(trade.entry_index >= n - 100);
            assert!(trade.exit_index <= n - 2);
            assert!(trade.entry_index < trade.exit_index || trade.exit_reason == ExitReason::EndOfWindow);
            assert!(trade.entry_index >= last_exit);
            if trade.exit_reason == ExitReason::EndOfWindow {
                assert_eq!(i, trades.len() - 1);
            }
            last_exit = trade.exit_index + 1;
        }
    }
}
