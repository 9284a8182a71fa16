//! Speech provider implementations

pub mod command;
pub mod espeak;
pub mod http;
pub mod openai;
pub mod piper;
