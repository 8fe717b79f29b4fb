pub mod bars;
pub mod connectors;

pub use bars::{Bar, BarSeries};
pub use connectors::{CsvConnector, DataValidator, OhlcColumn};
