//! Error types for Quill

use thiserror::Error;

/// The main error type for Quill operations
#[derive(Debug, Error)]
pub enum QuillError {
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    #[error("Entity is not a surface: {0}")]
    NotASurface(String),

    #[error("Entity is not a curve: {0}")]
    NotACurve(String),

    #[error("Duplicate entity name: {0}")]
    DuplicateEntityName(String),

    #[error("Scene rejected mutation: {0}")]
    SceneLocked(String),

    #[error("Curve construction failed: {0}")]
    CurveConstruction(String),

    #[error("Not enough edit points: need {required}, got {got}")]
    InsufficientPoints { required: usize, got: usize },

    #[error("View error: {0}")]
    ViewError(String),

    #[error("Callback error: {0}")]
    CallbackError(String),

    #[error("Registry error: {0}")]
    RegistryError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),
}

/// Result type alias for Quill operations
pub type Result<T> = std::result::Result<T, QuillError>;

impl From<toml::de::Error> for QuillError {
    fn from(err: toml::de::Error) -> Self {
        QuillError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for QuillError {
    fn from(err: toml::ser::Error) -> Self {
        QuillError::TomlSerError(err.to_string())
    }
}
