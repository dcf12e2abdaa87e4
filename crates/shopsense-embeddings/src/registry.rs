//! Backend registry — maps backend names to endpoint configurations.
//!
//! All OpenAI-compatible embeddings backends are defined here as static
//! config entries. The unified `OpenAiCompatibleEmbedder` uses these configs
//! to connect to any backend.

/// How to attach auth credentials to requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AuthStyle {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// No authentication required (local servers).
    None,
}

/// Configuration for a single backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Backend identifier.
    pub name: &'static str,
    /// Base URL for the API.
    pub base_url: &'static str,
    /// Path for the embeddings endpoint (appended to base_url).
    pub embeddings_path: &'static str,
    /// Environment variable names to try for the API key (in order).
    pub env_keys: &'static [&'static str],
    /// How to send auth credentials.
    pub auth_style: AuthStyle,
    /// Environment variable to override the base URL (e.g., OLLAMA_HOST).
    pub base_url_env: Option<&'static str>,
    /// Model used when the config does not name one.
    pub default_model: &'static str,
}

// ─── Backend Definitions ─────────────────────────────────────────────────────

/// All known backends.
static BACKENDS: &[BackendConfig] = &[
    BackendConfig {
        name: "openai",
        base_url: "https://api.openai.com/v1",
        embeddings_path: "/embeddings",
        env_keys: &["OPENAI_API_KEY"],
        auth_style: AuthStyle::Bearer,
        base_url_env: Some("OPENAI_API_BASE"),
        default_model: "text-embedding-3-small",
    },
    BackendConfig {
        name: "ollama",
        base_url: "http://localhost:11434/v1",
        embeddings_path: "/embeddings",
        env_keys: &[],
        auth_style: AuthStyle::None,
        base_url_env: Some("OLLAMA_HOST"),
        default_model: "nomic-embed-text",
    },
    BackendConfig {
        name: "llamacpp",
        base_url: "http://localhost:8080/v1",
        embeddings_path: "/embeddings",
        env_keys: &[],
        auth_style: AuthStyle::None,
        base_url_env: Some("LLAMACPP_HOST"),
        default_model: "local-model",
    },
    BackendConfig {
        name: "together",
        base_url: "https://api.together.xyz/v1",
        embeddings_path: "/embeddings",
        env_keys: &["TOGETHER_API_KEY"],
        auth_style: AuthStyle::Bearer,
        base_url_env: None,
        default_model: "BAAI/bge-base-en-v1.5",
    },
    BackendConfig {
        name: "mistral",
        base_url: "https://api.mistral.ai/v1",
        embeddings_path: "/embeddings",
        env_keys: &["MISTRAL_API_KEY"],
        auth_style: AuthStyle::Bearer,
        base_url_env: None,
        default_model: "mistral-embed",
    },
];

/// Look up a backend config by name.
pub fn get_backend_config(name: &str) -> Option<&'static BackendConfig> {
    // Also match aliases
    let lookup = match name {
        "llama.cpp" => "llamacpp",
        "together_ai" | "togetherai" => "together",
        other => other,
    };
    BACKENDS.iter().find(|b| b.name == lookup)
}

/// List all known backend names.
pub fn all_backend_names() -> Vec<&'static str> {
    BACKENDS.iter().map(|b| b.name).collect()
}
