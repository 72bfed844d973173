use thiserror::Error;

#[derive(Error, Debug)]
pub enum StagerError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Authentication failed: {message}")]
    AuthError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Input error in {path}: {message}")]
    InputError { path: String, message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, StagerError>;
