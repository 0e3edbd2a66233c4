//! The agent's shared network collaborators, built once at startup.

use std::fmt;
use std::path::Path;

use crate::client::TlsClientFactory;
use crate::keys::KeyFileLocator;
use edgelink_core::{AgentConfig, Result};

/// Client factory and key locator, built together from agent config.
#[derive(Debug, Clone)]
pub struct Collaborators {
    /// Produces TLS clients for backend services
    pub http_client_factory: TlsClientFactory,
    /// Finds candidate verification key files
    pub key_file_locator: KeyFileLocator,
}

impl Collaborators {
    /// Build both collaborators. `mgmt_hub_cert` is the already resolved
    /// management hub certificate path, see
    /// [`mgmt_hub_cert_from_env`](edgelink_core::mgmt_hub_cert_from_env).
    ///
    /// # Errors
    ///
    /// Fails if the trust store cannot be built; no partial result is
    /// returned.
    pub fn new(config: &AgentConfig, mgmt_hub_cert: Option<&Path>) -> Result<Self> {
        let http_client_factory = TlsClientFactory::from_config(config, mgmt_hub_cert)?;
        Ok(Self {
            http_client_factory,
            key_file_locator: KeyFileLocator::new(),
        })
    }
}

impl fmt::Display for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let trust = self.http_client_factory.trust();
        write!(
            f,
            "HTTPClientFactory: {{anchors: {}, system roots: {}, default timeout: {}s, retries: {} every {}s}}, KeyFileLocator: {:?}",
            trust.len(),
            trust.includes_system_roots(),
            self.http_client_factory.default_timeout().as_secs(),
            self.http_client_factory.retry_count(),
            self.http_client_factory.retry_interval_s(),
            self.key_file_locator,
        )
    }
}
