mod common;

use common::{self_signed, write_der, write_pem};
use edgelink_client::{EdgeError, TrustStoreBuilder};
use std::fs;

#[test]
fn test_mixed_directory_counts_every_parseable_cert() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("intermediates");
    fs::create_dir(&nested).unwrap();

    // two certs in one PEM bundle, one more PEM in a subdirectory
    let (a, b, c) = (self_signed("a.test"), self_signed("b.test"), self_signed("c.test"));
    fs::write(dir.path().join("bundle.pem"), format!("{}{}", a.pem(), b.pem())).unwrap();
    write_pem(&nested.join("c.pem"), &c);

    // two DER files, concatenated by the collector
    let (d, e) = (self_signed("d.test"), self_signed("e.test"));
    write_der(&dir.path().join("d.der"), &d);
    write_der(&nested.join("e.der"), &e);

    // .crt as PEM, .cer as DER
    let (f, g) = (self_signed("f.test"), self_signed("g.test"));
    write_pem(&dir.path().join("f.crt"), &f);
    write_der(&dir.path().join("g.cer"), &g);

    // not picked up
    let h = self_signed("h.test");
    write_pem(&dir.path().join("h.txt"), &h);
    write_pem(&dir.path().join("h.PEM"), &h);

    let trust = TrustStoreBuilder::new().ca_certs_path(dir.path()).build().unwrap();
    assert_eq!(trust.len(), 7);
    assert!(!trust.includes_system_roots());
}

#[test]
fn test_garbage_crt_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("broken.crt"), b"\x00\x01 definitely not a certificate").unwrap();
    write_pem(&dir.path().join("good.pem"), &self_signed("good.test"));
    write_der(&dir.path().join("good.cer"), &self_signed("good2.test"));

    let trust = TrustStoreBuilder::new().ca_certs_path(dir.path()).build().unwrap();
    assert_eq!(trust.len(), 2);
}

#[test]
fn test_corrupt_der_file_drops_der_buffer_only() {
    let dir = tempfile::tempdir().unwrap();
    write_der(&dir.path().join("a.der"), &self_signed("a.test"));
    fs::write(dir.path().join("b.der"), b"corrupt").unwrap();
    write_pem(&dir.path().join("c.pem"), &self_signed("c.test"));

    let trust = TrustStoreBuilder::new().ca_certs_path(dir.path()).build().unwrap();
    assert_eq!(trust.len(), 1);
}

#[cfg(unix)]
#[test]
fn test_unreadable_ca_file_names_path() {
    let dir = tempfile::tempdir().unwrap();
    write_pem(&dir.path().join("a.pem"), &self_signed("a.test"));
    write_pem(&dir.path().join("b.pem"), &self_signed("b.test"));
    fs::create_dir(dir.path().join("elsewhere")).unwrap();
    // a link to a directory has a cert extension but reading it fails
    let broken = dir.path().join("m.crt");
    std::os::unix::fs::symlink(dir.path().join("elsewhere"), &broken).unwrap();

    let err = TrustStoreBuilder::new().ca_certs_path(dir.path()).build().unwrap_err();
    assert!(matches!(err, EdgeError::CaCertRead { .. }));
    assert_eq!(err.path(), Some(broken.as_path()));
    assert!(err.to_string().contains("m.crt"));
}

#[test]
fn test_ca_path_below_a_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("f");
    fs::write(&file, b"not a directory").unwrap();
    let ca_dir = file.join("ca");

    let err = TrustStoreBuilder::new().ca_certs_path(&ca_dir).build().unwrap_err();
    assert!(matches!(err, EdgeError::CaCertRead { .. }));
    assert_eq!(err.path(), Some(ca_dir.as_path()));
}

#[test]
fn test_css_cert_pulls_in_system_trust() {
    let dir = tempfile::tempdir().unwrap();
    let css = self_signed("css.test");
    let css_path = dir.path().join("css.crt");
    write_pem(&css_path, &css);

    let trust = TrustStoreBuilder::new()
        .system_trust(false)
        .css_cert(&css_path)
        .build()
        .unwrap();
    assert!(trust.includes_system_roots());
    // the platform anchors come on top of the CSS cert
    assert!(trust.len() > 1);
}

#[test]
fn test_all_sources_merge() {
    let dir = tempfile::tempdir().unwrap();
    let ca_dir = dir.path().join("ca");
    fs::create_dir(&ca_dir).unwrap();
    let shared = self_signed("shared.test");
    write_pem(&ca_dir.join("shared.pem"), &shared);

    let hub_path = dir.path().join("hub.crt");
    write_pem(&hub_path, &self_signed("hub.test"));

    // the same cert again through a different source
    let dup_path = dir.path().join("dup.crt");
    write_pem(&dup_path, &shared);

    let trust = TrustStoreBuilder::new()
        .ca_certs_path(&ca_dir)
        .mgmt_hub_cert(&hub_path)
        .build()
        .unwrap();
    assert_eq!(trust.len(), 2);

    let trust = TrustStoreBuilder::new()
        .ca_certs_path(&ca_dir)
        .mgmt_hub_cert(&dup_path)
        .build()
        .unwrap();
    assert_eq!(trust.len(), 1);
}
