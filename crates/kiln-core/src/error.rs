//! Error types for Kiln

use thiserror::Error;

/// The main error type for Kiln operations
#[derive(Debug, Error)]
pub enum KilnError {
    #[error("Malformed need: {}", .0.join("; "))]
    MalformedNeed(Vec<String>),

    #[error("Unsupported asset family: {0}")]
    UnsupportedFamily(String),

    #[error("Unknown generation method: {0}")]
    UnknownMethod(String),

    #[error("Specification error: {0}")]
    SpecificationError(String),

    #[error("Generation error: {0}")]
    GenerationError(String),

    #[error("Validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),

    #[error("Registry error: {0}")]
    RegistryError(String),

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("JSON error: {0}")]
    JsonError(String),
}

/// Result type alias for Kiln operations
pub type Result<T> = std::result::Result<T, KilnError>;

impl From<toml::de::Error> for KilnError {
    fn from(err: toml::de::Error) -> Self {
        KilnError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for KilnError {
    fn from(err: toml::ser::Error) -> Self {
        KilnError::TomlSerError(err.to_string())
    }
}
