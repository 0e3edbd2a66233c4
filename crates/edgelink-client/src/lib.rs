//! Network collaborators for edge agents.
//!
//! This crate assembles the trust material an agent uses to reach its
//! backend services and finds the key files used to verify signed
//! artifacts:
//!
//! - [`trust`]: collect CA files, merge them with system and override
//!   certificates into a [`TrustConfiguration`]
//! - [`TlsClientFactory`]: produce reqwest clients over that configuration
//! - [`KeyFileLocator`]: list candidate `.pem` verification keys
//! - [`Collaborators`]: all of the above, built from [`AgentConfig`]
//!
//! # Example
//!
//! ```rust,ignore
//! use edgelink_client::{ClientFactory, Collaborators};
//! use edgelink_core::{mgmt_hub_cert_from_env, AgentConfig};
//!
//! let config = AgentConfig::load("/etc/edge/agent.toml".as_ref())?;
//! let hub_cert = mgmt_hub_cert_from_env();
//! let collab = Collaborators::new(&config, hub_cert.as_deref())?;
//!
//! let client = collab.http_client_factory.new_client(None)?;
//! let keys = collab
//!     .key_file_locator
//!     .key_file_names(&config.edge.public_key_path, &config.edge.user_public_key_path)
//!     .await?;
//! ```

#![doc(html_root_url = "https://docs.rs/edgelink-client/0.1.0")]

mod client;
mod collaborators;
mod config;
mod keys;
pub mod trust;

pub use client::{AgentClient, ClientFactory, TlsClientFactory};
pub use collaborators::Collaborators;
pub use config::*;
pub use keys::{public_key_dir, KeyFileLocator, KeyFileQuery, KEY_FILE_SUFFIX};
pub use trust::{CertPool, TrustConfiguration, TrustStoreBuilder};
pub use edgelink_core::{AgentConfig, EdgeError, Result};
