use thiserror::Error;

#[derive(Error, Debug)]
pub enum PursuitError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Precondition violated: {0}")]
    Precondition(String),

    #[error("Simulator error: {0}")]
    Simulator(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, PursuitError>;
