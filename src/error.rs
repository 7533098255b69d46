use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// Grid, buffer or coefficient dimensions disagree.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Species count, coefficient arity, symmetry or grid size unusable for the model.
    #[error("invalid model configuration: {0}")]
    InvalidModelConfig(String),

    #[error("invalid value {value:?} for {key}: {reason}")]
    Config {
        key: String,
        value: String,
        reason: String,
    },
}
