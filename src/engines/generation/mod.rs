pub mod genes;
pub mod vector;
pub mod operators;
pub mod diversity;
pub mod progress;
pub mod population_manager;

pub use genes::{Gene, GeneSpec, MutationClass, GENE_COUNT, GENE_TABLE};
pub use vector::{ParameterVector, VectorMetrics};
pub use diversity::DiversityMonitor;
pub use progress::{EvolutionObserver, LogObserver, RecordingObserver};
pub use population_manager::{ChampionSnapshot, ManagerSnapshot, PopulationManager};
