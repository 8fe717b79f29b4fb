pub mod momentum;
pub mod trend;
pub mod volatility;

pub use trend::EMA;
pub use momentum::RSI;
pub use volatility::{ATR, ADX};
