pub mod traits;
pub mod evolution;
pub mod race;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evolution::{CrossoverMethod, EvolutionConfig, MutationOperator, SelectionMethod};
pub use race::RaceConfig;
pub use traits::ConfigSection;
