//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod feedback_port;
mod phonemizer_port;
mod synthesis_port;
mod transcription_port;

pub use feedback_port::FeedbackPort;
#[cfg(test)]
pub use feedback_port::MockFeedbackPort;
#[cfg(test)]
pub use phonemizer_port::MockPhonemizerPort;
pub use phonemizer_port::PhonemizerPort;
#[cfg(test)]
pub use synthesis_port::MockSynthesisPort;
pub use synthesis_port::{SynthesisPort, SynthesizedAudio};
#[cfg(test)]
pub use transcription_port::MockTranscriptionPort;
pub use transcription_port::TranscriptionPort;
