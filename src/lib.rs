pub mod config;
pub mod engines;
pub mod error;
pub mod types;

pub use error::{PursuitError, Result};
