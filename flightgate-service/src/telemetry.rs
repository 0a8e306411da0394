use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app_config::Config;
use crate::error::{ServiceError, ServiceResult};

pub const DEFAULT_FILTER: &str = "flightgate_core=info,flightgate_service=info";

/// Install the global subscriber. `RUST_LOG` wins over `default_filter`.
///
/// Fails if a subscriber is already installed, e.g. by the embedding application.
pub fn init_tracing(default_filter: &str) -> ServiceResult<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| ServiceError::Telemetry(e.to_string()))
}

/// Install the global subscriber using `log_filter` from config as the default.
///
/// A malformed filter is a config error and is reported before anything is installed.
pub fn init_from_config(config: &Config) -> ServiceResult<()> {
    let filter = config.log_filter.as_deref().unwrap_or(DEFAULT_FILTER);
    tracing_subscriber::EnvFilter::try_new(filter)
        .map_err(|e| ServiceError::InvalidConfig(format!("log_filter {filter:?}: {e}")))?;
    init_tracing(filter)
}
