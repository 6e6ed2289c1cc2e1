use thiserror::Error;

/// Errors at the configuration/IO boundary.
///
/// Simulation operations never return these: rejected placement and
/// vanished harvest targets are ordinary negative results.
#[derive(Error, Debug)]
pub enum HomesteadError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HomesteadError>;
