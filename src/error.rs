use thiserror::Error;

#[derive(Error, Debug)]
pub enum CasParseError {
    #[error("Statement text is empty or contains no readable lines")]
    EmptyInput,

    #[error("Invalid growth range {min}..{max}: bounds must be positive and min < max")]
    InvalidGrowthRange { min: f64, max: f64 },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CasParseError>;
