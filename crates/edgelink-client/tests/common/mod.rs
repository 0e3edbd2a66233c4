//! Certificate fixtures shared by the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// A freshly generated self-signed certificate.
pub fn self_signed(name: &str) -> rcgen::Certificate {
    rcgen::generate_simple_self_signed(vec![name.to_string()])
        .unwrap()
        .cert
}

/// Write `cert` as PEM to `path`.
pub fn write_pem(path: &Path, cert: &rcgen::Certificate) {
    fs::write(path, cert.pem()).unwrap();
}

/// Write `cert` as DER to `path`.
pub fn write_der(path: &Path, cert: &rcgen::Certificate) {
    fs::write(path, cert.der()).unwrap();
}
