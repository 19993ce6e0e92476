pub mod evolution_engine;
pub mod genome;
pub mod operators;
pub mod population;
pub mod progress;
pub mod selection;

pub use evolution_engine::{DiversityAction, EngineState, EvolutionEngine, ProgressCallback};
pub use genome::Genome;
pub use population::Population;
pub use progress::{
    ChannelProgressCallback, ConsoleProgressCallback, JsonLinesProgressCallback,
    LogProgressCallback, ProgressMessage,
};
