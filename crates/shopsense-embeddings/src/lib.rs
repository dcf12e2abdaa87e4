//! # ShopSense Embeddings
//!
//! Embedding backend implementations for ShopSense.
//!
//! All OpenAI-compatible embeddings APIs (OpenAI, Ollama, llama.cpp,
//! Together, Mistral) are handled by a single `OpenAiCompatibleEmbedder`.
//! Backends are distinguished only by endpoint URL, auth style, and API key.

pub mod openai_compatible;
pub mod registry;

use shopsense_core::config::ShopSenseConfig;
use shopsense_core::error::{Result, ShopSenseError};
use shopsense_core::traits::Embedder;

/// Create an embedding backend from configuration.
pub fn create_embedder(config: &ShopSenseConfig) -> Result<Box<dyn Embedder>> {
    let backend_name = config.embedding.backend.as_str();

    match backend_name {
        // Custom endpoint: "custom:https://my-server.com/v1"
        other if other.starts_with("custom:") => Ok(Box::new(
            openai_compatible::OpenAiCompatibleEmbedder::custom(other, config),
        )),

        // All known OpenAI-compatible backends
        _ => {
            let registry = registry::get_backend_config(backend_name)
                .ok_or_else(|| ShopSenseError::BackendNotFound(backend_name.into()))?;
            Ok(Box::new(
                openai_compatible::OpenAiCompatibleEmbedder::from_registry(registry, config),
            ))
        }
    }
}

/// List all available backend names.
pub fn available_backends() -> Vec<&'static str> {
    let mut names = registry::all_backend_names();
    names.push("custom");
    names
}
