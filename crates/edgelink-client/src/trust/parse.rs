//! Best-effort certificate decoding.
//!
//! None of these functions fail loudly: malformed material yields fewer (or
//! no) certificates and a `debug!` line.

use rustls::pki_types::CertificateDer;
use tracing::debug;

/// One decoding attempt for a `.cer` / `.crt` blob. `None` means the attempt
/// found nothing and the next one should run.
type CerAttempt = fn(&[u8]) -> Option<Vec<CertificateDer<'static>>>;

/// Ordered fallback chain for `.cer` / `.crt` blobs: PEM first, then a
/// single DER certificate.
const CER_ATTEMPTS: [(&str, CerAttempt); 2] = [("pem", pem_attempt), ("der", der_attempt)];

const PEM_BEGIN: &[u8] = b"-----BEGIN";
const CERTIFICATE_TAG: &str = "CERTIFICATE";

/// Decode every `CERTIFICATE` block in PEM text.
///
/// Blocks are decoded independently, so one corrupt block does not hide
/// its neighbours. Blocks with other tags and blocks whose body is not an
/// X.509 certificate are skipped.
pub fn parse_pem_certs(bytes: &[u8]) -> Vec<CertificateDer<'static>> {
    let starts: Vec<usize> = find_all(bytes, PEM_BEGIN);
    let mut certs = Vec::with_capacity(starts.len());

    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(bytes.len());
        let block = match pem::parse(&bytes[start..end]) {
            Ok(block) => block,
            Err(e) => {
                debug!(error = %e, "skipping malformed PEM block");
                continue;
            }
        };
        if block.tag() != CERTIFICATE_TAG {
            continue;
        }
        match x509_parser::parse_x509_certificate(block.contents()) {
            Ok(_) => certs.push(CertificateDer::from(block.contents().to_vec())),
            Err(e) => debug!(error = %e, "skipping unparseable certificate in PEM block"),
        }
    }

    certs
}

/// Split a buffer of back-to-back DER certificates.
///
/// All or nothing: if any certificate in the sequence fails to parse the
/// whole buffer is rejected, since the boundary of everything after it is
/// unknown.
pub fn parse_der_sequence(bytes: &[u8]) -> Option<Vec<CertificateDer<'static>>> {
    let mut certs = Vec::new();
    let mut rest = bytes;

    while !rest.is_empty() {
        match x509_parser::parse_x509_certificate(rest) {
            Ok((remaining, _)) => {
                let consumed = rest.len() - remaining.len();
                certs.push(CertificateDer::from(rest[..consumed].to_vec()));
                rest = remaining;
            }
            Err(e) => {
                debug!(error = %e, offset = bytes.len() - rest.len(), "DER buffer rejected");
                return None;
            }
        }
    }

    Some(certs)
}

/// Decode exactly one DER certificate. Trailing bytes are a failure.
pub fn parse_der_single(bytes: &[u8]) -> Option<CertificateDer<'static>> {
    match x509_parser::parse_x509_certificate(bytes) {
        Ok((remaining, _)) if remaining.is_empty() => Some(CertificateDer::from(bytes.to_vec())),
        Ok((remaining, _)) => {
            debug!(trailing = remaining.len(), "trailing data after DER certificate");
            None
        }
        Err(_) => None,
    }
}

/// Decode a `.cer` / `.crt` blob by running [`CER_ATTEMPTS`] in order and
/// stopping at the first that yields certificates. `None` means the blob is
/// dropped.
pub fn parse_cer_blob(bytes: &[u8]) -> Option<Vec<CertificateDer<'static>>> {
    if bytes.is_empty() {
        return None;
    }
    CER_ATTEMPTS.iter().find_map(|(name, attempt)| {
        let found = attempt(bytes);
        if found.is_some() {
            debug!(format = name, "decoded cer/crt blob");
        }
        found
    })
}

fn pem_attempt(bytes: &[u8]) -> Option<Vec<CertificateDer<'static>>> {
    let certs = parse_pem_certs(bytes);
    (!certs.is_empty()).then_some(certs)
}

fn der_attempt(bytes: &[u8]) -> Option<Vec<CertificateDer<'static>>> {
    parse_der_single(bytes).map(|cert| vec![cert])
}

fn find_all(haystack: &[u8], needle: &[u8]) -> Vec<usize> {
    haystack
        .windows(needle.len())
        .enumerate()
        .filter_map(|(i, w)| (w == needle).then_some(i))
        .collect()
}
