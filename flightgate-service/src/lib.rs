pub mod app_config;
pub mod error;
pub mod service;
pub mod telemetry;

pub use app_config::{ClockConfig, Config};
pub use error::{ServiceError, ServiceResult};
pub use service::BookingService;
