//! Agent configuration consumed by the network collaborators.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{EdgeError, Result};

/// Legacy environment variable naming the management hub certificate.
/// Checked first.
pub const LEGACY_MGMT_HUB_CERT_ENV: &str = "HZN_ICP_CA_CERT_PATH";

/// Current environment variable naming the management hub certificate.
pub const MGMT_HUB_CERT_ENV: &str = "HZN_MGMT_HUB_CERT_PATH";

/// Top-level agent configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Edge node settings.
    pub edge: EdgeConfig,

    /// Agreement bot settings.
    pub agreement_bot: AgbotConfig,
}

/// Edge node settings relevant to backend connectivity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    /// Directory holding extra CA certificates (walked recursively).
    #[serde(deserialize_with = "empty_path_as_none")]
    pub ca_certs_path: Option<PathBuf>,

    /// Start the trust pool from the platform's trust anchors.
    pub trust_system_ca_certs: bool,

    /// Whole-request timeout for produced clients (seconds, 0 = unbounded).
    pub default_http_client_timeout_s: u64,

    /// Platform public key file. Its sibling `.pem` files are candidate
    /// verification keys.
    pub public_key_path: String,

    /// Directory of user-supplied verification keys.
    pub user_public_key_path: String,
}

/// Agreement bot settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgbotConfig {
    /// Certificate presented by the CSS backend. Setting it also pulls in
    /// the platform trust anchors.
    #[serde(deserialize_with = "empty_path_as_none")]
    pub css_ssl_cert: Option<PathBuf>,
}

impl EdgeConfig {
    /// Configured CA directory, an empty path counting as unset
    #[must_use]
    pub fn ca_certs_dir(&self) -> Option<&Path> {
        non_empty(self.ca_certs_path.as_deref())
    }
}

impl AgbotConfig {
    /// Configured CSS certificate, an empty path counting as unset
    #[must_use]
    pub fn css_cert(&self) -> Option<&Path> {
        non_empty(self.css_ssl_cert.as_deref())
    }
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            ca_certs_path: None,
            trust_system_ca_certs: false,
            default_http_client_timeout_s: default_http_client_timeout(),
            public_key_path: String::new(),
            user_public_key_path: String::new(),
        }
    }
}

impl AgentConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| EdgeError::Config(format!("{}: {e}", path.display())))?;
            toml::from_str(&content)
                .map_err(|e| EdgeError::Config(format!("{}: {e}", path.display())))
        } else {
            debug!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Whether the trust pool should start from the platform trust anchors.
    ///
    /// A CSS certificate forces this on.
    #[must_use]
    pub fn wants_system_trust(&self) -> bool {
        self.edge.trust_system_ca_certs || self.agreement_bot.css_cert().is_some()
    }
}

/// Resolve the management hub certificate path.
///
/// `lookup` maps a variable name to its value. The legacy name wins when it
/// is set to a non-empty value; otherwise the current name is used. Empty
/// values count as unset.
pub fn resolve_mgmt_hub_cert_path<F>(lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    [LEGACY_MGMT_HUB_CERT_ENV, MGMT_HUB_CERT_ENV]
        .into_iter()
        .find_map(|name| lookup(name).filter(|v| !v.is_empty()))
        .map(PathBuf::from)
}

/// [`resolve_mgmt_hub_cert_path`] over the process environment.
#[must_use]
pub fn mgmt_hub_cert_from_env() -> Option<PathBuf> {
    resolve_mgmt_hub_cert_path(|name| std::env::var(name).ok())
}

const fn default_http_client_timeout() -> u64 {
    30
}

fn non_empty(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}

fn empty_path_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    let path = Option::<PathBuf>::deserialize(deserializer)?;
    Ok(path.filter(|p| !p.as_os_str().is_empty()))
}
