use chrono::FixedOffset;
use flightgate_core::{date, Clock, FixedClock, OffsetClock, SystemClock};
use serde::Deserialize;
use std::env;
use std::sync::Arc;

use crate::error::{ServiceError, ServiceResult};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub clock: ClockConfig,
    pub event_capacity: usize,
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clock: ClockConfig::default(),
            event_capacity: 64,
            log_filter: None,
        }
    }
}

/// Chooses the clock injected into the validator.
///
/// `fixed_today` (DD/MM/YYYY) pins the date and takes precedence;
/// otherwise `utc_offset_seconds` selects a wall clock at that offset;
/// with neither, the host's local zone is used.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ClockConfig {
    pub utc_offset_seconds: Option<i32>,
    pub fixed_today: Option<String>,
}

impl ClockConfig {
    pub fn build(&self) -> ServiceResult<Arc<dyn Clock>> {
        if let Some(text) = &self.fixed_today {
            let today = date::parse(text).map_err(|e| {
                ServiceError::InvalidConfig(format!("clock.fixed_today {text:?}: {e}"))
            })?;
            return Ok(Arc::new(FixedClock::new(today.into())));
        }

        match self.utc_offset_seconds {
            Some(seconds) => {
                let offset = FixedOffset::east_opt(seconds).ok_or_else(|| {
                    ServiceError::InvalidConfig(format!(
                        "clock.utc_offset_seconds {seconds} is outside +/-86399"
                    ))
                })?;
                Ok(Arc::new(OffsetClock::new(offset)))
            }
            None => Ok(Arc::new(SystemClock)),
        }
    }
}

impl Config {
    pub fn load() -> ServiceResult<Self> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. FLIGHTGATE_CLOCK__FIXED_TODAY=13/10/2025
            .add_source(
                config::Environment::with_prefix("FLIGHTGATE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_sources(s)
    }

    pub fn from_sources(source: config::Config) -> ServiceResult<Self> {
        let config: Self = source.try_deserialize()?;
        if config.event_capacity == 0 {
            return Err(ServiceError::InvalidConfig(
                "event_capacity must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }
}
