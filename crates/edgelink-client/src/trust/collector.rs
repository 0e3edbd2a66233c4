//! Custom CA directory collection.
//!
//! Walks an administrator-provided directory and sorts recognised
//! certificate files into per-encoding buffers. Parsing happens later in
//! [`TrustStoreBuilder`](super::TrustStoreBuilder).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use edgelink_core::{EdgeError, Result};

/// File extensions picked up from the CA directory. Matching is exact and
/// case-sensitive.
pub const CA_EXTENSIONS: &[&str] = &[".der", ".pem", ".crt", ".cer"];

/// Encoding inferred from a certificate file's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertEncoding {
    /// `.der`: binary, concatenated into one buffer
    Der,
    /// `.pem`: text, concatenated into one buffer
    Pem,
    /// `.cer` / `.crt`: either encoding, kept per file
    Cer,
}

impl CertEncoding {
    /// Classify a path by its extension, `None` if unrecognised.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match file_extension(path)? {
            ".der" => Some(Self::Der),
            ".pem" => Some(Self::Pem),
            ".cer" | ".crt" => Some(Self::Cer),
            _ => None,
        }
    }
}

/// A recognised file found during the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertSource {
    /// Location on disk
    pub path: PathBuf,
    /// Encoding inferred from the extension
    pub encoding: CertEncoding,
}

impl CertSource {
    /// Build a source for `path` if its extension is recognised.
    #[must_use]
    pub fn classify(path: &Path) -> Option<Self> {
        CertEncoding::from_path(path).map(|encoding| Self {
            path: path.to_path_buf(),
            encoding,
        })
    }
}

/// Raw certificate bytes collected from the CA directory.
#[derive(Debug, Default, Clone)]
pub struct CertBuffers {
    /// Concatenated `.der` contents
    pub der: Vec<u8>,
    /// Concatenated `.pem` contents
    pub pem: Vec<u8>,
    /// One blob per `.cer` / `.crt` file
    pub cer: Vec<Vec<u8>>,
}

impl CertBuffers {
    /// Returns true if nothing was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.der.is_empty() && self.pem.is_empty() && self.cer.is_empty()
    }

    fn push(&mut self, encoding: CertEncoding, bytes: Vec<u8>) {
        match encoding {
            CertEncoding::Der => self.der.extend_from_slice(&bytes),
            CertEncoding::Pem => self.pem.extend_from_slice(&bytes),
            CertEncoding::Cer => self.cer.push(bytes),
        }
    }
}

/// Recursively collect certificate material under `root`.
///
/// `None` or a non-existent directory yields empty buffers. Any other
/// failure to stat `root` is an error. Unrecognised
/// extensions are never opened.
///
/// # Errors
///
/// Returns [`EdgeError::CaCertRead`] naming the failing path if any entry
/// cannot be visited or any recognised file cannot be read. Nothing
/// collected so far is returned in that case.
pub fn collect_ca_material(root: Option<&Path>) -> Result<CertBuffers> {
    let mut buffers = CertBuffers::default();

    let Some(root) = root else {
        return Ok(buffers);
    };
    match std::fs::metadata(root) {
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %root.display(), "CA certs path not found, skipping");
            return Ok(buffers);
        }
        Err(e) => return Err(EdgeError::ca_read(root, e)),
    }

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
            EdgeError::ca_read(path, e.into())
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        let Some(source) = CertSource::classify(entry.path()) else {
            continue;
        };

        let bytes = std::fs::read(&source.path).map_err(|e| EdgeError::ca_read(&source.path, e))?;
        debug!(path = %source.path.display(), encoding = ?source.encoding, "read CA certs from provided file");
        buffers.push(source.encoding, bytes);
    }

    Ok(buffers)
}

/// Extension from the final `.` of the file name, dot included.
fn file_extension(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    name.rfind('.').map(|i| &name[i..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_classify_extensions() {
        assert_eq!(CertEncoding::from_path(Path::new("a/b.der")), Some(CertEncoding::Der));
        assert_eq!(CertEncoding::from_path(Path::new("b.pem")), Some(CertEncoding::Pem));
        assert_eq!(CertEncoding::from_path(Path::new("b.crt")), Some(CertEncoding::Cer));
        assert_eq!(CertEncoding::from_path(Path::new("b.cer")), Some(CertEncoding::Cer));
        assert_eq!(CertEncoding::from_path(Path::new("b.PEM")), None);
        assert_eq!(CertEncoding::from_path(Path::new("b.pem.bak")), None);
        assert_eq!(CertEncoding::from_path(Path::new("README")), None);
        assert_eq!(CertEncoding::from_path(Path::new("dir/.pem")), Some(CertEncoding::Pem));
    }

    #[test]
    fn test_no_root_is_empty() {
        let buffers = collect_ca_material(None).unwrap();
        assert!(buffers.is_empty());
    }

    #[test]
    fn test_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let buffers = collect_ca_material(Some(&dir.path().join("nope"))).unwrap();
        assert!(buffers.is_empty());
    }

    #[test]
    fn test_sorts_into_buffers() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested/deeper");
        fs::create_dir_all(&nested).unwrap();

        fs::write(dir.path().join("a.der"), b"\x30\x01").unwrap();
        fs::write(nested.join("b.der"), b"\x30\x02").unwrap();
        fs::write(dir.path().join("a.pem"), b"PEM-A\n").unwrap();
        fs::write(nested.join("b.pem"), b"PEM-B\n").unwrap();
        fs::write(dir.path().join("one.crt"), b"CRT").unwrap();
        fs::write(nested.join("two.cer"), b"CER").unwrap();
        fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();
        fs::create_dir(dir.path().join("dir.pem")).unwrap();

        let buffers = collect_ca_material(Some(dir.path())).unwrap();
        assert_eq!(buffers.der, b"\x30\x01\x30\x02");
        assert_eq!(buffers.pem, b"PEM-A\nPEM-B\n");
        assert_eq!(buffers.cer.len(), 2);
        assert!(buffers.cer.contains(&b"CRT".to_vec()));
        assert!(buffers.cer.contains(&b"CER".to_vec()));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_fails_with_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.pem"), b"ok").unwrap();
        fs::create_dir(dir.path().join("target")).unwrap();
        // not followed by the walk, so it is read as a file and fails
        let bad = dir.path().join("z.crt");
        std::os::unix::fs::symlink(dir.path().join("target"), &bad).unwrap();

        let err = collect_ca_material(Some(dir.path())).unwrap_err();
        assert!(matches!(err, EdgeError::CaCertRead { .. }));
        assert_eq!(err.path(), Some(bad.as_path()));
    }

    #[test]
    fn test_root_under_a_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        fs::write(&file, b"x").unwrap();
        let root = file.join("ca");

        let err = collect_ca_material(Some(&root)).unwrap_err();
        assert!(matches!(err, EdgeError::CaCertRead { .. }));
        assert_eq!(err.path(), Some(root.as_path()));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_unrecognised_file_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let other = dir.path().join("private.key");
        fs::write(&other, b"secret").unwrap();
        fs::set_permissions(&other, fs::Permissions::from_mode(0o000)).unwrap();

        let buffers = collect_ca_material(Some(dir.path())).unwrap();
        assert!(buffers.is_empty());
    }
}
