//! Application layer - Use cases and orchestration
//!
//! Defines the strategy ports (transcription, phonemization, feedback,
//! synthesis) and orchestrates them together with the domain's phonetic
//! core into the tutoring request flows.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
