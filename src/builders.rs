//! Client configuration and builder.
//!
//! ```no_run
//! use vizlook_rs::builders::ClientBuilder;
//! use std::time::Duration;
//!
//! # fn example() -> vizlook_rs::VizlookResult<()> {
//! let client = ClientBuilder::new()
//!     .with_api_key("vl-...")
//!     .with_timeout(Duration::from_secs(120))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::time::Duration;

use crate::client::{ReqwestTransport, Transport, TransportConfig, VizlookClient};
use crate::error::{VizlookError, VizlookResult};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.vizlook.com";

/// Environment variable read when no API key is given explicitly.
pub const API_KEY_ENV: &str = "VIZLOOK_API_KEY";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("vizlook-rust-sdk/", env!("CARGO_PKG_VERSION"));

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API key sent in `x-api-key`.
    pub api_key: String,
    /// API base URL, without a trailing slash.
    pub base_url: String,
    /// Extra headers sent with every request. They override the defaults.
    pub headers: HashMap<String, String>,
}

impl ClientConfig {
    /// Config with the given API key and the default base URL.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            headers: HashMap::new(),
        }
    }

    /// Headers sent with every request: API key, JSON content type, user
    /// agent, then any extra headers.
    pub fn request_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert(API_KEY_HEADER.to_string(), self.api_key.clone());
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("User-Agent".to_string(), USER_AGENT.to_string());
        for (key, value) in &self.headers {
            headers.retain(|k, _| !k.eq_ignore_ascii_case(key));
            headers.insert(key.clone(), value.clone());
        }
        headers
    }
}

/// Pick the explicit key, else the environment value. Empty strings count as unset.
fn resolve_api_key(explicit: Option<String>, from_env: Option<String>) -> VizlookResult<String> {
    explicit
        .filter(|k| !k.trim().is_empty())
        .or_else(|| from_env.filter(|k| !k.trim().is_empty()))
        .ok_or(VizlookError::MissingApiKey)
}

/// Builder for [`VizlookClient`].
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    headers: HashMap<String, String>,
    http_client: Option<reqwest::Client>,
}

impl ClientBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key. Without one, `VIZLOOK_API_KEY` is used.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the API base URL. Defaults to [`DEFAULT_BASE_URL`].
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the total request timeout, including reading the body.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Add a custom HTTP header sent with every request.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Use an existing `reqwest::Client`. Timeouts set on this builder are
    /// then ignored in favour of the client's own.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Resolve the configuration, reading `VIZLOOK_API_KEY` if needed.
    ///
    /// # Errors
    ///
    /// Returns [`VizlookError::MissingApiKey`] if no key is available, or
    /// [`VizlookError::InvalidConfig`] if the base URL is not a valid URL.
    pub fn config(&self) -> VizlookResult<ClientConfig> {
        let api_key = resolve_api_key(self.api_key.clone(), std::env::var(API_KEY_ENV).ok())?;

        let base_url = self
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        reqwest::Url::parse(&base_url)
            .map_err(|e| VizlookError::InvalidConfig(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(ClientConfig {
            api_key,
            base_url,
            headers: self.headers.clone(),
        })
    }

    /// Build a client on the default `reqwest` transport.
    pub fn build(self) -> VizlookResult<VizlookClient> {
        let config = self.config()?;

        let transport = match self.http_client {
            Some(client) => ReqwestTransport::with_client(client),
            None => {
                let mut transport_config = TransportConfig {
                    timeout: self.timeout,
                    ..TransportConfig::default()
                };
                if let Some(connect_timeout) = self.connect_timeout {
                    transport_config.connect_timeout = connect_timeout;
                }
                ReqwestTransport::with_config(transport_config)?
            }
        };

        tracing::debug!(base_url = %config.base_url, "built vizlook client");
        Ok(VizlookClient::with_transport(config, Box::new(transport)))
    }

    /// Build a client on a custom transport.
    pub fn build_with_transport(
        self,
        transport: Box<dyn Transport>,
    ) -> VizlookResult<VizlookClient> {
        let config = self.config()?;
        Ok(VizlookClient::with_transport(config, transport))
    }
}
