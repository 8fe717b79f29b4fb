pub mod champion_params;
pub mod scheduler;

pub use champion_params::{ChampionParameters, ComponentWeights, ExitTactics, RegimeGates};
pub use scheduler::{EvolutionScheduler, TickOutcome};
