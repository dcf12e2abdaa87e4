//! Unified OpenAI-compatible embeddings backend.
//!
//! A single struct that handles the `/embeddings` endpoint for ALL
//! OpenAI-compatible APIs. Different backends are distinguished only by
//! endpoint URL, auth style, and API key.

use async_trait::async_trait;
use serde_json::{Value, json};
use shopsense_core::config::ShopSenseConfig;
use shopsense_core::error::{Result, ShopSenseError};
use shopsense_core::traits::Embedder;

use crate::registry::{AuthStyle, BackendConfig};

/// A unified embedder that works with any OpenAI-compatible API.
pub struct OpenAiCompatibleEmbedder {
    /// Backend name (e.g., "openai", "ollama").
    name: String,
    /// API key for authentication.
    api_key: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    base_url: String,
    /// Path for the embeddings endpoint (e.g., "/embeddings").
    embeddings_path: String,
    /// Authentication style.
    auth_style: AuthStyle,
    /// Embedding model identifier.
    model: String,
    /// HTTP client.
    client: reqwest::Client,
}

impl OpenAiCompatibleEmbedder {
    /// Create from a known backend config + ShopSenseConfig.
    ///
    /// Resolution order:
    /// - API key: `config.embedding.api_key` > env vars > empty
    /// - Base URL: `config.embedding.endpoint` > env override > registry default
    /// - Model: `config.embedding.model` > registry default
    pub fn from_registry(registry: &BackendConfig, config: &ShopSenseConfig) -> Self {
        let api_key = if !config.embedding.api_key.is_empty() {
            config.embedding.api_key.clone()
        } else {
            registry
                .env_keys
                .iter()
                .find_map(|key| std::env::var(key).ok())
                .unwrap_or_default()
        };

        let base_url = if !config.embedding.endpoint.is_empty() {
            config.embedding.endpoint.trim_end_matches('/').to_string()
        } else {
            registry
                .base_url_env
                .and_then(|env_key| {
                    let val = std::env::var(env_key).ok()?;
                    // For OLLAMA_HOST / LLAMACPP_HOST, append /v1 if not present
                    if val.ends_with("/v1") {
                        Some(val)
                    } else {
                        Some(format!("{}/v1", val.trim_end_matches('/')))
                    }
                })
                .unwrap_or_else(|| registry.base_url.to_string())
        };

        let model = if !config.embedding.model.is_empty() {
            config.embedding.model.clone()
        } else {
            registry.default_model.to_string()
        };

        Self {
            name: registry.name.to_string(),
            api_key,
            base_url,
            embeddings_path: registry.embeddings_path.to_string(),
            auth_style: registry.auth_style,
            model,
            client: reqwest::Client::new(),
        }
    }

    /// Create for a custom endpoint (e.g., "custom:https://my-server.com/v1").
    pub fn custom(endpoint: &str, config: &ShopSenseConfig) -> Self {
        let base_url = endpoint
            .strip_prefix("custom:")
            .unwrap_or(endpoint)
            .trim_end_matches('/')
            .to_string();

        let api_key = if !config.embedding.api_key.is_empty() {
            config.embedding.api_key.clone()
        } else {
            std::env::var("CUSTOM_API_KEY").unwrap_or_default()
        };

        let auth_style = if api_key.is_empty() {
            AuthStyle::None
        } else {
            AuthStyle::Bearer
        };

        Self {
            name: "custom".to_string(),
            api_key,
            base_url,
            embeddings_path: "/embeddings".to_string(),
            auth_style,
            model: config.embedding.model.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// The model this embedder sends to the backend.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the auth header for the request.
    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth_style {
            AuthStyle::Bearer if !self.api_key.is_empty() => {
                req.header("Authorization", format!("Bearer {}", self.api_key))
            }
            _ => req,
        }
    }
}

/// Parse an OpenAI-format embeddings response body.
///
/// Rows are reordered by their `index` field, so the output lines up with
/// the input batch regardless of response order. A row count that differs
/// from `expected` or inconsistent dimensions across rows is malformed
/// output from the backend.
pub(crate) fn parse_embeddings_response(json: &Value, expected: usize) -> Result<Vec<Vec<f32>>> {
    let data = json["data"]
        .as_array()
        .ok_or_else(|| ShopSenseError::Embedding("No data array in response".into()))?;

    let mut rows: Vec<(usize, Vec<f32>)> = Vec::with_capacity(data.len());
    for entry in data {
        let index = entry["index"].as_u64().unwrap_or(rows.len() as u64) as usize;
        let vector: Vec<f32> = entry["embedding"]
            .as_array()
            .ok_or_else(|| ShopSenseError::Embedding("Row missing embedding array".into()))?
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0) as f32)
            .collect();
        rows.push((index, vector));
    }
    rows.sort_by_key(|(index, _)| *index);

    let vectors: Vec<Vec<f32>> = rows.into_iter().map(|(_, v)| v).collect();
    if vectors.len() != expected {
        return Err(ShopSenseError::Embedding(format!(
            "Expected {} vectors, backend returned {}",
            expected,
            vectors.len()
        )));
    }
    if let Some(first) = vectors.first() {
        let dimension = first.len();
        if dimension == 0 || vectors.iter().any(|v| v.len() != dimension) {
            return Err(ShopSenseError::Embedding(
                "Backend returned vectors of inconsistent dimension".into(),
            ));
        }
    }
    Ok(vectors)
}

#[async_trait]
impl Embedder for OpenAiCompatibleEmbedder {
    fn name(&self) -> &str {
        &self.name
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        // For backends that require auth, check API key
        if self.auth_style != AuthStyle::None && self.api_key.is_empty() {
            return Err(ShopSenseError::ApiKeyMissing(self.name.clone()));
        }

        let body = json!({
            "model": self.model,
            "input": texts,
        });

        let url = format!("{}{}", self.base_url, self.embeddings_path);
        let req = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body);
        let req = self.apply_auth(req);

        let resp = req.send().await.map_err(|e| {
            ShopSenseError::Http(format!("{} connection failed ({}): {}", self.name, url, e))
        })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(ShopSenseError::Embedding(format!(
                "{} API error {}: {}",
                self.name, status, text
            )));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| ShopSenseError::Http(e.to_string()))?;

        let vectors = parse_embeddings_response(&json, texts.len())?;
        tracing::debug!(
            backend = %self.name,
            batch = texts.len(),
            dimension = vectors.first().map(|v| v.len()).unwrap_or(0),
            "embedded batch"
        );
        Ok(vectors)
    }

    async fn health_check(&self) -> Result<bool> {
        if self.auth_style != AuthStyle::None {
            // For cloud backends, just check if API key is set
            return Ok(!self.api_key.is_empty());
        }

        // For local servers (ollama, llamacpp), try to connect
        let resp = self.client.get(&self.base_url).send().await;
        Ok(resp.is_ok())
    }
}
