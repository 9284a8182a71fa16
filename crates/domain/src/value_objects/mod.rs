//! Value objects - Immutable domain primitives

mod audio_format;
mod phoneme;
mod score;

pub use audio_format::AudioFormat;
pub use phoneme::{PhonemeSequence, PhonemeToken};
pub use score::Score;
