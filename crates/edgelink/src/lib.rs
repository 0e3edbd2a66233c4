//! Trust store, TLS client factory and key discovery for edge node agents.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use edgelink::{mgmt_hub_cert_from_env, AgentConfig, ClientFactory, Collaborators};
//!
//! #[tokio::main]
//! async fn main() -> edgelink::Result<()> {
//!     let config = AgentConfig::load("/etc/edge/agent.toml".as_ref())?;
//!     let collab = Collaborators::new(&config, mgmt_hub_cert_from_env().as_deref())?;
//!     println!("{collab}");
//!
//!     // one client per call site, longer timeout for a large download
//!     let client = collab
//!         .http_client_factory
//!         .new_client(Some(std::time::Duration::from_secs(600)))?;
//!     let resp = client.http().get("https://exchange.example/v1/admin/version").send().await;
//!
//!     let keys = collab
//!         .key_file_locator
//!         .key_file_names(&config.edge.public_key_path, &config.edge.user_public_key_path)
//!         .await?;
//!     println!("{} candidate keys", keys.len());
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/edgelink/0.1.0")]

// Re-export core types
pub use edgelink_core::*;

// Re-export collaborators
pub use edgelink_client::trust;
pub use edgelink_client::{
    AgentClient, ClientFactory, Collaborators, KeyFileLocator, KeyFileQuery, RetryConfig,
    TlsClientFactory, TransportTuning, TrustConfiguration, TrustStoreBuilder,
};

// Re-export runtime for convenience
pub use reqwest;
pub use tokio;
