use thiserror::Error;

/// Errors raised while resolving the deployment configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing secret `{field}` ({source_path} has no such field and no env override is set)")]
    MissingSecret { field: String, source_path: String },

    #[error("secret `{field}` is not a usable private key: {reason}")]
    InvalidKey { field: String, reason: String },

    #[error("network `{network}`: invalid endpoint `{endpoint}`: {reason}")]
    InvalidEndpoint {
        network: String,
        endpoint: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("configuration validation failed: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
