use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for edgelink operations
pub type Result<T> = std::result::Result<T, EdgeError>;

/// Errors that can occur while building the agent's network collaborators
#[derive(Error, Debug)]
pub enum EdgeError {
    /// A file under the custom CA directory could not be read, or the walk
    /// itself failed
    #[error("failed to read CA certs file: {}", path.display())]
    CaCertRead {
        /// Path of the file or directory that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An override certificate file could not be read
    #[error("failed to read {role} cert file: {}", path.display())]
    CertFileRead {
        /// Which override the file was configured for
        role: CertRole,
        /// Configured path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A key directory exists but could not be listed
    #[error("unable to get list of PEM files in {}: {source}", path.display())]
    KeyDirRead {
        /// Directory that failed to list
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Platform trust anchors could not be loaded
    #[error("failed to load system trust anchors: {0}")]
    SystemRoots(String),

    /// TLS parameters were rejected
    #[error("TLS configuration error: {0}")]
    Tls(String),

    /// HTTP client construction failed
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// Configuration file unreadable or malformed
    #[error("configuration error: {0}")]
    Config(String),

    /// Generic I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The override certificate an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertRole {
    /// Management hub certificate (from the environment)
    ManagementHub,
    /// Agreement bot CSS certificate (from config)
    AgbotCss,
}

impl std::fmt::Display for CertRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ManagementHub => f.write_str("management hub"),
            Self::AgbotCss => f.write_str("agbot CSS"),
        }
    }
}

impl EdgeError {
    /// Build a [`EdgeError::CaCertRead`] for `path`
    pub fn ca_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CaCertRead {
            path: path.into(),
            source,
        }
    }

    /// Returns true if the error came from an unreadable file or directory
    #[must_use]
    pub const fn is_io_failure(&self) -> bool {
        matches!(
            self,
            Self::CaCertRead { .. } | Self::CertFileRead { .. } | Self::KeyDirRead { .. } | Self::Io(_)
        )
    }

    /// Returns the configured path that caused the error, if any
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::CaCertRead { path, .. }
            | Self::CertFileRead { path, .. }
            | Self::KeyDirRead { path, .. } => Some(path.as_path()),
            _ => None,
        }
    }
}
