pub mod bar_simulator;
pub mod fitness;
pub mod simulator;

pub use bar_simulator::{classify_regime, BarSimulator, SimulatedTrade};
pub use fitness::FitnessEvaluator;
pub use simulator::DecisionSimulator;
