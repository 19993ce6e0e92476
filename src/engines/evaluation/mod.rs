pub mod fitness;
pub mod reference;
pub mod simulator;

pub use fitness::FitnessEvaluator;
pub use reference::ReferenceRace;
pub use simulator::RaceSimulator;
