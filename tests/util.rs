#![allow(dead_code)]

use trustkit::CertificateAuthority;
use trustkit::cert::Certificate;

/// A root followed by `depth` CAs, each signed by the previous one.
pub fn ca_chain(depth: usize) -> Vec<CertificateAuthority> {
    let mut cas = vec![CertificateAuthority::new().expect("Failed to create root CA")];
    for _ in 0..depth {
        let child = cas
            .last()
            .unwrap()
            .create_child_ca()
            .expect("Failed to create child CA");
        cas.push(child);
    }
    cas
}

/// Asserts that `leaf`, followed by `chain`, links up to `root` one signature at a time.
pub fn assert_chains_to(leaf: &Certificate, chain: &[Certificate], root: &Certificate) {
    let mut current = leaf;
    for issuer in chain {
        assert!(
            current.is_signed_by(issuer).unwrap(),
            "certificate not signed by the next chain entry"
        );
        current = issuer;
    }
    assert!(
        current.is_signed_by(root).unwrap(),
        "chain does not end at the root"
    );
}
