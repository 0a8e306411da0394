#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to install tracing subscriber: {0}")]
    Telemetry(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
