//! Discovery of candidate signature verification keys.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use edgelink_core::{EdgeConfig, EdgeError, Result};

/// Suffix of key files, matched case-sensitively.
pub const KEY_FILE_SUFFIX: &str = ".pem";

/// The two places key files are looked up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyFileQuery {
    /// Platform public key file; its directory is searched. Empty to skip.
    pub public_key_path: String,
    /// User key directory. Empty to skip.
    pub user_key_path: String,
}

impl KeyFileQuery {
    /// Build a query
    pub fn new(public_key_path: impl Into<String>, user_key_path: impl Into<String>) -> Self {
        Self {
            public_key_path: public_key_path.into(),
            user_key_path: user_key_path.into(),
        }
    }

    /// Query for the configured key locations
    #[must_use]
    pub fn from_config(config: &EdgeConfig) -> Self {
        Self::new(&config.public_key_path, &config.user_public_key_path)
    }
}

/// Lists `.pem` key files next to the platform public key and in the user
/// key directory.
///
/// Directories are listed, not walked. Results are not deduplicated: a
/// directory reachable through both inputs contributes its files twice.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyFileLocator;

impl KeyFileLocator {
    /// Create a locator
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Locate key files for `query`, public key directory first.
    ///
    /// # Errors
    ///
    /// Returns [`EdgeError::KeyDirRead`] if a directory exists but cannot be
    /// listed. A missing directory contributes nothing.
    pub async fn locate(&self, query: &KeyFileQuery) -> Result<Vec<PathBuf>> {
        self.key_file_names(&query.public_key_path, &query.user_key_path)
            .await
    }

    /// Locate key files from the raw path pair.
    pub async fn key_file_names(
        &self,
        public_key_path: &str,
        user_key_path: &str,
    ) -> Result<Vec<PathBuf>> {
        let mut names = Vec::new();

        if !public_key_path.is_empty() {
            let dir = public_key_dir(public_key_path);
            names.extend(pem_files_in(Path::new(dir)).await?);
        }
        if !user_key_path.is_empty() {
            names.extend(pem_files_in(Path::new(user_key_path)).await?);
        }

        Ok(names)
    }
}

/// Directory part of a public key path: everything before the last `/`.
///
/// A bare file name maps to `.`, a file directly under the root to `/`.
#[must_use]
pub fn public_key_dir(public_key_path: &str) -> &str {
    match public_key_path.rfind('/') {
        Some(0) => "/",
        Some(i) => &public_key_path[..i],
        None => ".",
    }
}

/// Non-directory entries of `dir` ending in `.pem`, in listing order.
async fn pem_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_err = |source| EdgeError::KeyDirRead {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %dir.display(), "key directory not found, skipping");
            return Ok(Vec::new());
        }
        Err(e) => return Err(read_err(e)),
    };

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(read_err)? {
        let name = entry.file_name();
        if !name.as_encoded_bytes().ends_with(KEY_FILE_SUFFIX.as_bytes()) {
            continue;
        }
        if entry.file_type().await.map_err(read_err)?.is_dir() {
            continue;
        }
        files.push(dir.join(name));
    }

    debug!(path = %dir.display(), count = files.len(), "listed key files");
    Ok(files)
}
