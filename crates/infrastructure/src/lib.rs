//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer.
//! Contains configuration loading, logging setup, adapters over the
//! speech and inference crates, and the provider factory.

pub mod adapters;
pub mod config;
pub mod factory;
pub mod telemetry;

pub use adapters::*;
pub use config::{
    AppConfig, FeedbackProvider, LogFormat, PhonemizerProvider, ProvidersConfig, ServerConfig,
    SynthesisProvider, TranscriptionProvider, TutorConfig,
};
pub use factory::{ProviderError, build_providers};
pub use telemetry::{TelemetryConfig, TelemetryError, init_telemetry};
