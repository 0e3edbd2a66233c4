//! The certificate pool handed to the TLS layer.

use rustls::pki_types::CertificateDer;
use rustls::RootCertStore;
use std::collections::HashSet;
use tracing::{debug, warn};

use super::collector::CertBuffers;
use super::parse;
use edgelink_core::{EdgeError, Result};

/// A set of trust anchors.
///
/// Adding a certificate already present is a no-op, so the merge order of
/// the different sources does not matter.
#[derive(Debug, Clone)]
pub struct CertPool {
    roots: RootCertStore,
    seen: HashSet<Vec<u8>>,
    system_roots: bool,
}

impl Default for CertPool {
    fn default() -> Self {
        Self::empty()
    }
}

impl CertPool {
    /// An empty pool
    #[must_use]
    pub fn empty() -> Self {
        Self {
            roots: RootCertStore::empty(),
            seen: HashSet::new(),
            system_roots: false,
        }
    }

    /// A pool seeded with the platform's trust anchors.
    ///
    /// Individual anchors the TLS layer refuses are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`EdgeError::SystemRoots`] only when nothing could be loaded
    /// and the platform reported errors.
    pub fn with_system_roots() -> Result<Self> {
        let loaded = rustls_native_certs::load_native_certs();
        if loaded.certs.is_empty() && !loaded.errors.is_empty() {
            let reasons: Vec<String> = loaded.errors.iter().map(ToString::to_string).collect();
            return Err(EdgeError::SystemRoots(reasons.join("; ")));
        }
        for e in &loaded.errors {
            warn!(error = %e, "error loading some system trust anchors");
        }

        let mut pool = Self::empty();
        pool.system_roots = true;
        let added = pool.extend(loaded.certs);
        debug!(count = added, "added distribution-provided CA certs to trust");
        Ok(pool)
    }

    /// Add one DER certificate. Returns true if the pool grew.
    pub fn add(&mut self, cert: CertificateDer<'static>) -> bool {
        if self.seen.contains(&*cert) {
            return false;
        }
        let key = cert.to_vec();
        match self.roots.add(cert) {
            Ok(()) => {
                self.seen.insert(key);
                true
            }
            Err(e) => {
                debug!(error = %e, "trust anchor rejected");
                false
            }
        }
    }

    /// Add several certificates, returning how many were new.
    pub fn extend<I>(&mut self, certs: I) -> usize
    where
        I: IntoIterator<Item = CertificateDer<'static>>,
    {
        certs
            .into_iter()
            .fold(0, |n, cert| n + usize::from(self.add(cert)))
    }

    /// Append every certificate found in PEM text.
    pub fn append_pem(&mut self, bytes: &[u8]) -> usize {
        if bytes.is_empty() {
            return 0;
        }
        self.extend(parse::parse_pem_certs(bytes))
    }

    /// Append a buffer of concatenated DER certificates. A buffer that does
    /// not parse as a whole contributes nothing.
    pub fn append_der_sequence(&mut self, bytes: &[u8]) -> usize {
        if bytes.is_empty() {
            return 0;
        }
        parse::parse_der_sequence(bytes).map_or(0, |certs| self.extend(certs))
    }

    /// Append a `.cer` / `.crt` blob: PEM, else single DER, else dropped.
    pub fn append_cer(&mut self, bytes: &[u8]) -> usize {
        match parse::parse_cer_blob(bytes) {
            Some(certs) => self.extend(certs),
            None => {
                debug!(len = bytes.len(), "dropping undecodable cer/crt blob");
                0
            }
        }
    }

    /// Merge everything collected from a CA directory.
    pub fn append_buffers(&mut self, buffers: &CertBuffers) -> usize {
        let mut added = self.append_pem(&buffers.pem);
        added += self.append_der_sequence(&buffers.der);
        for blob in &buffers.cer {
            added += self.append_cer(blob);
        }
        added
    }

    /// Returns true if `der` is in the pool
    #[must_use]
    pub fn contains(&self, der: &[u8]) -> bool {
        self.seen.contains(der)
    }

    /// Number of trust anchors
    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Returns true if the pool holds no anchors
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Returns true if the pool was seeded with the platform anchors
    #[must_use]
    pub const fn includes_system_roots(&self) -> bool {
        self.system_roots
    }

    pub(crate) fn into_root_store(self) -> RootCertStore {
        self.roots
    }
}
