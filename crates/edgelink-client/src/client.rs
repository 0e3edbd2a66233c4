//! HTTP client factory over the shared trust configuration.

use reqwest::Client as HttpClient;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::{RetryConfig, TransportTuning};
use crate::trust::{TrustConfiguration, TrustStoreBuilder};
use edgelink_core::{AgentConfig, EdgeError, Result};

/// Produces HTTP clients configured for the agent's backends.
///
/// Implementations must be callable concurrently without locking.
pub trait ClientFactory: Send + Sync {
    /// Build a new client. `override_timeout` replaces the default
    /// whole-request timeout for this client only.
    fn new_client(&self, override_timeout: Option<Duration>) -> Result<AgentClient>;

    /// Build a client with the default timeout
    fn default_client(&self) -> Result<AgentClient> {
        self.new_client(None)
    }
}

/// A produced client together with the timeout it was built with.
#[derive(Debug, Clone)]
pub struct AgentClient {
    http: HttpClient,
    timeout: Duration,
}

impl AgentClient {
    /// The underlying reqwest client
    #[must_use]
    pub const fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Whole-request timeout, covering the body transfer. Zero means
    /// unbounded.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Unwrap into the reqwest client
    #[must_use]
    pub fn into_inner(self) -> HttpClient {
        self.http
    }
}

/// [`ClientFactory`] backed by an immutable [`TrustConfiguration`].
///
/// Every produced client gets its own connection pool; only the TLS
/// parameters are shared.
#[derive(Debug, Clone)]
pub struct TlsClientFactory {
    trust: Arc<TrustConfiguration>,
    default_timeout: Duration,
    tuning: TransportTuning,
    retry: RetryConfig,
    user_agent: String,
}

impl TlsClientFactory {
    /// Create a factory with the agent transport tuning and no retries
    #[must_use]
    pub fn new(trust: TrustConfiguration, default_timeout: Duration) -> Self {
        Self {
            trust: Arc::new(trust),
            default_timeout,
            tuning: TransportTuning::AGENT,
            retry: RetryConfig::new(),
            user_agent: format!("edgelink/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Build the trust store described by `config` and wrap it.
    pub fn from_config(config: &AgentConfig, mgmt_hub_cert: Option<&Path>) -> Result<Self> {
        let trust = TrustStoreBuilder::from_config(config, mgmt_hub_cert).build()?;
        Ok(Self::new(
            trust,
            Duration::from_secs(config.edge.default_http_client_timeout_s),
        ))
    }

    /// Set retry parameters
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// The shared trust configuration
    #[must_use]
    pub fn trust(&self) -> &TrustConfiguration {
        &self.trust
    }

    /// Timeout used when no override is given
    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Transport settings applied to every client
    #[must_use]
    pub const fn tuning(&self) -> &TransportTuning {
        &self.tuning
    }

    /// Retry parameters for request-issuing callers
    #[must_use]
    pub const fn retry(&self) -> RetryConfig {
        self.retry
    }

    /// Number of retries on transport error
    #[must_use]
    pub const fn retry_count(&self) -> u32 {
        self.retry.retry_count
    }

    /// Seconds between retries, never zero
    #[must_use]
    pub const fn retry_interval_s(&self) -> u64 {
        self.retry.effective_interval_s()
    }

    /// Erase into a shareable handle for external callers
    #[must_use]
    pub fn shared(self) -> Arc<dyn ClientFactory> {
        Arc::new(self)
    }
}

impl ClientFactory for TlsClientFactory {
    fn new_client(&self, override_timeout: Option<Duration>) -> Result<AgentClient> {
        let timeout = override_timeout.unwrap_or(self.default_timeout);
        let tls = rustls::ClientConfig::clone(self.trust.tls_config());

        let mut builder = HttpClient::builder()
            .use_preconfigured_tls(tls)
            .connect_timeout(self.tuning.connect_timeout())
            .tcp_keepalive(self.tuning.keep_alive)
            .read_timeout(self.tuning.response_header_timeout)
            .pool_max_idle_per_host(self.tuning.max_idle_connections)
            .pool_idle_timeout(self.tuning.idle_connection_timeout)
            .user_agent(&self.user_agent)
            .gzip(true);
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|e| EdgeError::ClientBuild(e.to_string()))?;
        debug!(timeout_s = timeout.as_secs(), "built HTTP client");

        Ok(AgentClient { http, timeout })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trust::CertPool;

    fn factory(default_timeout: Duration) -> TlsClientFactory {
        let trust = TrustConfiguration::from_pool(CertPool::empty()).unwrap();
        TlsClientFactory::new(trust, default_timeout)
    }

    #[test]
    fn test_default_timeout() {
        let factory = factory(Duration::from_secs(30));
        let client = factory.new_client(None).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_override_timeout() {
        let factory = factory(Duration::from_secs(30));
        let client = factory.new_client(Some(Duration::from_secs(5))).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(5));

        // override applies to that client only
        assert_eq!(factory.default_client().unwrap().timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_zero_timeout_is_unbounded() {
        let factory = factory(Duration::ZERO);
        let client = factory.new_client(None).unwrap();
        assert!(client.timeout().is_zero());
    }

    #[test]
    fn test_retry_parameters() {
        let factory = factory(Duration::from_secs(30));
        assert_eq!(factory.retry_count(), 0);
        assert_eq!(factory.retry_interval_s(), 10);

        let factory = factory.with_retry(RetryConfig::new().retry_count(2).retry_interval_s(0));
        assert_eq!(factory.retry_count(), 2);
        assert_eq!(factory.retry_interval_s(), 10);
    }

    #[test]
    fn test_clients_share_trust() {
        let factory = factory(Duration::from_secs(30));
        let shared = factory.clone().shared();
        let a = shared.new_client(None).unwrap();
        let b = shared.new_client(Some(Duration::from_secs(1))).unwrap();
        assert_ne!(a.timeout(), b.timeout());
        assert!(Arc::ptr_eq(&factory.trust, &factory.clone().trust));
    }

    #[test]
    fn test_from_config() {
        let mut config = AgentConfig::default();
        config.edge.default_http_client_timeout_s = 7;
        let factory = TlsClientFactory::from_config(&config, None).unwrap();
        assert_eq!(factory.default_timeout(), Duration::from_secs(7));
        assert!(factory.trust().is_empty());
        assert_eq!(factory.tuning(), &TransportTuning::AGENT);
    }
}
