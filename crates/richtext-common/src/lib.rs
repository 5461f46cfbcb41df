//! Host-side plumbing shared by richtext frontends: config files and
//! tracing setup.

pub mod config;
pub mod telemetry;

pub use config::{ConfigError, FileStore, Loader, Saver};
pub use telemetry::{TelemetryConfig, init_tracing};
