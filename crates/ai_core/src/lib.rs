//! AI Core - LLM inference clients
//!
//! Provides the `InferenceEngine` port and two HTTP clients for it:
//! - `OllamaInferenceEngine` for the Ollama chat API
//! - `LlamaCppInferenceEngine` for llama.cpp's OpenAI-compatible server

pub mod config;
pub mod error;
pub mod llama_cpp;
pub mod ollama;
pub mod ports;

pub use config::InferenceConfig;
pub use error::InferenceError;
pub use llama_cpp::LlamaCppInferenceEngine;
pub use ollama::OllamaInferenceEngine;
pub use ports::{InferenceEngine, InferenceMessage, InferenceRequest, InferenceResponse, TokenUsage};
