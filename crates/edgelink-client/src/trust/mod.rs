//! Trust store assembly.
//!
//! ```text
//! CA directory ──collect_ca_material()──> CertBuffers ─┐
//! system anchors (optional) ───────────────────────────┤
//! management hub cert (optional) ──────────────────────┼──> CertPool ──> TrustConfiguration
//! agbot CSS cert (optional, implies system anchors) ───┘
//! ```

mod collector;
mod parse;
mod pool;

pub use collector::{collect_ca_material, CertBuffers, CertEncoding, CertSource, CA_EXTENSIONS};
pub use parse::{parse_cer_blob, parse_der_sequence, parse_der_single, parse_pem_certs};
pub use pool::CertPool;

use rustls::{ClientConfig, ProtocolVersion, RootCertStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use edgelink_core::{AgentConfig, CertRole, EdgeError, Result};

/// Lowest TLS version ever negotiated.
pub const MIN_PROTOCOL_VERSION: ProtocolVersion = ProtocolVersion::TLSv1_2;

static PROTOCOL_VERSIONS: &[&rustls::SupportedProtocolVersion] =
    &[&rustls::version::TLS13, &rustls::version::TLS12];

/// Finished TLS parameters shared by every produced client.
///
/// Immutable once built. Certificate verification is always on.
#[derive(Debug, Clone)]
pub struct TrustConfiguration {
    tls: Arc<ClientConfig>,
    roots: Arc<RootCertStore>,
    system_roots: bool,
}

impl TrustConfiguration {
    /// Freeze a pool into TLS client parameters.
    pub fn from_pool(pool: CertPool) -> Result<Self> {
        let system_roots = pool.includes_system_roots();
        let roots = Arc::new(pool.into_root_store());

        let tls = ClientConfig::builder_with_provider(Arc::new(
            rustls::crypto::ring::default_provider(),
        ))
        .with_protocol_versions(PROTOCOL_VERSIONS)
        .map_err(|e| EdgeError::Tls(format!("TLS version config: {e}")))?
        .with_root_certificates(Arc::clone(&roots))
        .with_no_client_auth();

        Ok(Self {
            tls: Arc::new(tls),
            roots,
            system_roots,
        })
    }

    /// rustls client parameters
    #[must_use]
    pub const fn tls_config(&self) -> &Arc<ClientConfig> {
        &self.tls
    }

    /// Number of trust anchors
    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Returns true if no anchor is trusted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Returns true if the platform anchors are part of the pool
    #[must_use]
    pub const fn includes_system_roots(&self) -> bool {
        self.system_roots
    }

    /// Lowest TLS version this configuration negotiates
    #[must_use]
    pub const fn min_protocol_version(&self) -> ProtocolVersion {
        MIN_PROTOCOL_VERSION
    }
}

/// Builder for a [`TrustConfiguration`].
///
/// Merge order:
/// 1. platform anchors, if requested (or if a CSS cert is set)
/// 2. `.pem` buffer
/// 3. `.der` buffer, all or nothing
/// 4. each `.cer` / `.crt` blob, PEM then DER then dropped
/// 5. management hub cert (PEM)
/// 6. agbot CSS cert (PEM)
#[derive(Debug, Clone, Default)]
pub struct TrustStoreBuilder {
    system_trust: bool,
    ca_certs_path: Option<PathBuf>,
    mgmt_hub_cert: Option<PathBuf>,
    css_cert: Option<PathBuf>,
}

impl TrustStoreBuilder {
    /// Create a builder with no sources
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder populated from agent config and the resolved management hub
    /// certificate path.
    #[must_use]
    pub fn from_config(config: &AgentConfig, mgmt_hub_cert: Option<&Path>) -> Self {
        Self {
            system_trust: config.edge.trust_system_ca_certs,
            ca_certs_path: config.edge.ca_certs_dir().map(Path::to_path_buf),
            mgmt_hub_cert: mgmt_hub_cert.map(Path::to_path_buf),
            css_cert: config.agreement_bot.css_cert().map(Path::to_path_buf),
        }
    }

    /// Start from the platform trust anchors
    #[must_use]
    pub const fn system_trust(mut self, enabled: bool) -> Self {
        self.system_trust = enabled;
        self
    }

    /// Directory of extra CA certificates
    #[must_use]
    pub fn ca_certs_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_certs_path = Some(path.into());
        self
    }

    /// Management hub certificate file
    #[must_use]
    pub fn mgmt_hub_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.mgmt_hub_cert = Some(path.into());
        self
    }

    /// Agbot CSS certificate file. Also pulls in the platform anchors.
    #[must_use]
    pub fn css_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.css_cert = Some(path.into());
        self
    }

    /// Read every source and build the configuration.
    ///
    /// # Errors
    ///
    /// Fails on any unreadable CA file or override certificate, naming the
    /// path. Malformed certificates are skipped, never reported.
    pub fn build(self) -> Result<TrustConfiguration> {
        let buffers = collect_ca_material(self.ca_certs_path.as_deref())?;
        let hub_bytes = read_override(self.mgmt_hub_cert.as_deref(), CertRole::ManagementHub)?;
        let css_bytes = read_override(self.css_cert.as_deref(), CertRole::AgbotCss)?;

        let mut pool = if self.system_trust || self.css_cert.is_some() {
            CertPool::with_system_roots()?
        } else {
            CertPool::empty()
        };

        pool.append_buffers(&buffers);
        if let Some(bytes) = hub_bytes {
            pool.append_pem(&bytes);
        }
        if let Some(bytes) = css_bytes {
            pool.append_pem(&bytes);
        }

        debug!(
            anchors = pool.len(),
            system = pool.includes_system_roots(),
            "trust store built"
        );
        TrustConfiguration::from_pool(pool)
    }
}

fn read_override(path: Option<&Path>, role: CertRole) -> Result<Option<Vec<u8>>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let bytes = std::fs::read(path).map_err(|source| EdgeError::CertFileRead {
        role,
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), role = %role, "read override cert from provided file");
    Ok(Some(bytes))
}
