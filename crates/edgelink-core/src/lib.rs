//! Core types for the edgelink agent collaborators.
//!
//! This crate provides the pieces shared by the collaborator crates:
//!
//! - **Errors**: the [`EdgeError`] taxonomy and [`Result`] alias
//! - **Config**: the subset of agent configuration the collaborators read,
//!   plus management hub certificate resolution
//!
//! # Example
//!
//! ```rust,ignore
//! use edgelink_core::{mgmt_hub_cert_from_env, AgentConfig};
//!
//! let config = AgentConfig::load("/etc/edge/agent.toml".as_ref())?;
//! let hub_cert = mgmt_hub_cert_from_env();
//! ```

mod config;
mod error;

pub use config::{
    mgmt_hub_cert_from_env, resolve_mgmt_hub_cert_path, AgbotConfig, AgentConfig, EdgeConfig,
    LEGACY_MGMT_HUB_CERT_ENV, MGMT_HUB_CERT_ENV,
};
pub use error::{CertRole, EdgeError, Result};
