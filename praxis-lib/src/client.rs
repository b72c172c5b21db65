//! Main PraxisClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::Client;
use reqwest::Method;

use crate::api::autocomplete::AutocompleteRequest;
use crate::api::ListQuery;
use crate::cache::CacheConfig;
use crate::cache::CacheProvider;
use crate::error::ApiError;
use crate::error::Error;
use crate::model::Entity;

/// The main client for the practice administration API.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across tasks safely. Authentication is external: if the deployment is
/// token-protected, the caller supplies a ready bearer token; the client
/// never obtains or refreshes one itself.
///
/// # Example
///
/// ```ignore
/// use praxis_lib::PraxisClient;
/// use praxis_lib::model::Entity;
///
/// let client = PraxisClient::builder()
///     .url("https://practice.example.org")
///     .build();
///
/// let page = client.list(Entity::Clinics).execute().await?;
/// ```
#[derive(Clone)]
pub struct PraxisClient {
    inner: Arc<PraxisClientInner>,
}

struct PraxisClientInner {
    base_url: String,
    api_prefix: String,
    bearer_token: Option<String>,
    http_client: Client,
    timeout: Option<Duration>,
    cache: Option<Arc<dyn CacheProvider>>,
    cache_config: CacheConfig,
}

impl PraxisClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> PraxisClientBuilder<Missing> {
        PraxisClientBuilder::new()
    }

    /// Returns the base URL of the deployment.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Returns the API path prefix (default `api`).
    pub fn api_prefix(&self) -> &str {
        &self.inner.api_prefix
    }

    /// Returns the configured cache provider, if any.
    pub fn cache(&self) -> Option<&Arc<dyn CacheProvider>> {
        self.inner.cache.as_ref()
    }

    /// Returns the cache TTL configuration.
    pub fn cache_config(&self) -> &CacheConfig {
        &self.inner.cache_config
    }

    /// Builds the absolute URL of a collection endpoint.
    ///
    /// The backend routes require the trailing slash.
    pub fn collection_url(&self, entity: Entity) -> String {
        format!(
            "{}/{}/{}/",
            self.inner.base_url.trim_end_matches('/'),
            self.inner.api_prefix.trim_matches('/'),
            entity.collection_path()
        )
    }

    /// Builds the absolute URL of one record's endpoint.
    pub fn record_url(&self, entity: Entity, id: uuid::Uuid) -> String {
        format!("{}{}/", self.collection_url(entity), id)
    }

    /// Starts a list query against the given collection.
    pub fn list(&self, entity: Entity) -> ListQuery<'_> {
        ListQuery::new(self, entity)
    }

    /// Starts an autocomplete request against the given collection.
    pub fn autocomplete(&self, entity: Entity) -> AutocompleteRequest<'_> {
        AutocompleteRequest::new(self, entity)
    }

    /// Performs one HTTP request, applying the bearer token and timeout.
    ///
    /// Maps transport failures to [`ApiError::Network`] and elapsed
    /// timeouts to [`ApiError::Timeout`]. Status codes are not inspected
    /// here; callers decide what a non-success response means.
    pub(crate) async fn request(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response, Error> {
        let mut request = self.inner.http_client.request(method, url).headers(headers);

        if let Some(token) = &self.inner.bearer_token {
            request = request.bearer_auth(token);
        }
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        request.send().await.map_err(|e| {
            if e.is_timeout() {
                let timeout = self.inner.timeout.unwrap_or(Duration::from_secs(30));
                Error::Api(ApiError::Timeout(timeout))
            } else {
                Error::Api(ApiError::Network(e))
            }
        })
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`PraxisClient`].
///
/// Uses the typestate pattern so the one required field, the deployment
/// URL, is enforced at compile time.
///
/// # Example
///
/// ```ignore
/// let client = PraxisClient::builder()
///     .url("https://practice.example.org")
///     .bearer_token(token_from_env)
///     .timeout(Duration::from_secs(30))
///     .build();
/// ```
pub struct PraxisClientBuilder<Url> {
    url: Url,
    api_prefix: String,
    bearer_token: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
    cache: Option<Arc<dyn CacheProvider>>,
    cache_config: CacheConfig,
}

impl PraxisClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            api_prefix: "api".to_string(),
            bearer_token: None,
            timeout: None,
            connect_timeout: None,
            http_client: None,
            cache: None,
            cache_config: CacheConfig::default(),
        }
    }

    /// Sets the deployment base URL.
    pub fn url(self, url: impl Into<String>) -> PraxisClientBuilder<Set<String>> {
        PraxisClientBuilder {
            url: Set(url.into()),
            api_prefix: self.api_prefix,
            bearer_token: self.bearer_token,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
            cache: self.cache,
            cache_config: self.cache_config,
        }
    }
}

impl Default for PraxisClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> PraxisClientBuilder<U> {
    /// Sets the API path prefix.
    ///
    /// Defaults to `api`.
    pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    /// Sets a bearer token supplied by an external authentication flow.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Enables response caching with the given provider.
    pub fn cache<C: CacheProvider + 'static>(mut self, provider: C) -> Self {
        self.cache = Some(Arc::new(provider));
        self
    }

    /// Sets the cache TTL configuration.
    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }
}

impl PraxisClientBuilder<Set<String>> {
    /// Builds the [`PraxisClient`].
    ///
    /// Only available once the URL has been set.
    pub fn build(self) -> PraxisClient {
        let http_client = self.http_client.unwrap_or_else(|| {
            let mut builder = Client::builder();
            if let Some(timeout) = self.connect_timeout {
                builder = builder.connect_timeout(timeout);
            }
            builder.build().expect("Failed to build HTTP client")
        });

        PraxisClient {
            inner: Arc::new(PraxisClientInner {
                base_url: self.url.0,
                api_prefix: self.api_prefix,
                bearer_token: self.bearer_token,
                http_client,
                timeout: self.timeout,
                cache: self.cache,
                cache_config: self.cache_config,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_collection_and_record_urls() {
        let client = PraxisClient::builder()
            .url("https://practice.example.org/")
            .build();

        assert_eq!(
            client.collection_url(Entity::Adults),
            "https://practice.example.org/api/patients/adults/"
        );

        let id: uuid::Uuid = "6a9f8d3e-2c41-4b88-9f1a-3a5e0c7d1102".parse().unwrap();
        assert_eq!(
            client.record_url(Entity::Clinics, id),
            "https://practice.example.org/api/others/clinics/6a9f8d3e-2c41-4b88-9f1a-3a5e0c7d1102/"
        );
    }
}
