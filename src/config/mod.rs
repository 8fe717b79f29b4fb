pub mod traits;
pub mod evolution;
pub mod fitness;
pub mod scheduling;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evolution::{EvolutionConfig, EvaluationMode};
pub use fitness::FitnessConfig;
pub use scheduling::SchedulingConfig;
pub use traits::ConfigSection;
