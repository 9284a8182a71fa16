//! llama.cpp server client (OpenAI-compatible API)

mod client;

pub use client::LlamaCppInferenceEngine;
