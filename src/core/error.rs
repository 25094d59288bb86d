use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankError {
    #[error("Unknown requirement type: {0}")]
    UnknownRequirement(String),

    #[error("Requirement '{name}' takes {min}..={max} parameters, got {got} (usage: {usage})")]
    BadArity {
        name: String,
        min: usize,
        max: usize,
        got: usize,
        usage: String,
    },

    #[error("Invalid amount '{token}' for requirement '{name}': {reason}")]
    InvalidAmount {
        name: String,
        token: String,
        reason: String,
    },

    #[error("Invalid duration '{0}': {1}")]
    InvalidDuration(String, String),

    #[error("Unknown identifier '{token}' for requirement '{name}'")]
    UnknownIdentifier { name: String, token: String },

    #[error("Empty requirement definition")]
    EmptyDefinition,

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RankError>;
