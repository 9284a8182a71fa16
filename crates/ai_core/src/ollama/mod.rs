//! Ollama chat API client

mod client;

pub use client::OllamaInferenceEngine;
