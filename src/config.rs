//! Client configuration loaded from environment variables.

use serde::Deserialize;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Manifold API ===
    /// REST API base URL (without trailing slash).
    #[serde(default = "default_api_url")]
    pub manifold_api_url: String,

    /// Optional request timeout in milliseconds. Unset means no timeout.
    #[serde(default)]
    pub manifold_http_timeout_ms: Option<u64>,

    /// Idle connections kept per host.
    #[serde(default = "default_pool_size")]
    pub manifold_http_pool_size: usize,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub manifold_user_agent: String,
}

fn default_api_url() -> String {
    "https://api.manifold.markets/v0".to_string()
}

fn default_pool_size() -> usize {
    4
}

fn default_user_agent() -> String {
    format!("manifold-check/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifold_api_url: default_api_url(),
            manifold_http_timeout_ms: None,
            manifold_http_pool_size: default_pool_size(),
            manifold_user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Build configuration from explicit `(NAME, value)` pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }

    /// Default configuration pointed at another base URL.
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            manifold_api_url: api_url.into(),
            ..Self::default()
        }
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        let url = url::Url::parse(&self.manifold_api_url)
            .map_err(|e| format!("MANIFOLD_API_URL is not a valid URL: {}", e))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "MANIFOLD_API_URL must use http or https, got {}",
                url.scheme()
            ));
        }

        if self.manifold_http_pool_size == 0 {
            return Err("MANIFOLD_HTTP_POOL_SIZE must be at least 1".to_string());
        }

        if self.manifold_http_timeout_ms == Some(0) {
            return Err("MANIFOLD_HTTP_TIMEOUT_MS must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Base URL with any trailing slash removed.
    pub fn api_base(&self) -> &str {
        self.manifold_api_url.trim_end_matches('/')
    }
}
