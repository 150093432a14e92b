mod util;

use std::process::Command;

use openssl::stack::Stack;
use openssl::x509::store::X509StoreBuilder;
use openssl::x509::{X509, X509StoreContext};
use regex::Regex;
use trustkit::CertificateAuthority;
use trustkit::cert::Certificate;

fn to_openssl(certificate: &Certificate) -> X509 {
    X509::from_der(&certificate.to_der().unwrap()).expect("OpenSSL rejected certificate")
}

/// Runs OpenSSL's chain verification of `leaf` against `root`, with `chain` as untrusted
/// intermediates. Returns the verification outcome and OpenSSL's reason string.
fn openssl_verify(root: &Certificate, leaf: &Certificate, chain: &[Certificate]) -> (bool, String) {
    let mut store = X509StoreBuilder::new().unwrap();
    store.add_cert(to_openssl(root)).unwrap();
    let store = store.build();

    let mut untrusted = Stack::new().unwrap();
    for certificate in chain {
        untrusted.push(to_openssl(certificate)).unwrap();
    }

    let mut context = X509StoreContext::new().unwrap();
    context
        .init(&store, &to_openssl(leaf), &untrusted, |c| {
            Ok((c.verify_cert()?, c.error().error_string().to_string()))
        })
        .unwrap()
}

#[test]
fn test_openssl_parses_generated_certificates() {
    let root = CertificateAuthority::new().unwrap();
    let leaf = root.issue_server_cert(["localhost"]).unwrap();

    for pem in [root.cert_pem(), leaf.cert_pem()] {
        let x509 = X509::from_pem(pem.bytes()).expect("OpenSSL rejected PEM");
        assert_eq!(x509.version(), 2);
    }
    let key = openssl::pkey::PKey::private_key_from_pem(leaf.private_key_pem().bytes())
        .expect("OpenSSL rejected private key");
    let x509 = X509::from_pem(leaf.cert_pem().bytes()).unwrap();
    assert!(x509.public_key().unwrap().public_eq(&key));
}

#[test]
fn test_openssl_verifies_chains() {
    for depth in 0..3 {
        let cas = util::ca_chain(depth);
        let leaf = cas
            .last()
            .unwrap()
            .issue_server_cert(["example.com"])
            .unwrap();

        let (ok, reason) = openssl_verify(cas[0].certificate(), leaf.certificate(), leaf.chain());
        assert!(ok, "depth {depth}: {reason}");
    }
}

#[test]
fn test_openssl_rejects_foreign_root() {
    let ca = CertificateAuthority::new().unwrap();
    let other = CertificateAuthority::new().unwrap();
    let leaf = ca.issue_server_cert(["example.com"]).unwrap();

    let (ok, _) = openssl_verify(other.certificate(), leaf.certificate(), leaf.chain());
    assert!(!ok);
}

#[test]
fn test_openssl_reads_subject_alt_names() {
    let ca = CertificateAuthority::new().unwrap();
    let leaf = ca
        .issue_server_cert(["example.org", "127.0.0.1", "::1", "*.example.com", "café.example.com"])
        .unwrap();
    let x509 = to_openssl(leaf.certificate());
    let names = x509.subject_alt_names().expect("no SAN extension");

    let dns: Vec<&str> = names.iter().filter_map(|name| name.dnsname()).collect();
    assert_eq!(
        dns,
        ["example.org", "*.example.com", "xn--caf-dma.example.com"]
    );

    let ips: Vec<&[u8]> = names.iter().filter_map(|name| name.ipaddress()).collect();
    let mut loopback_v6 = [0u8; 16];
    loopback_v6[15] = 1;
    assert_eq!(ips, [&[127, 0, 0, 1][..], &loopback_v6[..]]);
}

#[cfg(feature = "openssl")]
#[test]
fn test_ssl_context_adapters() {
    use openssl::ssl::{SslContext, SslMethod};

    let root = CertificateAuthority::new().unwrap();
    let intermediate = root.create_child_ca().unwrap();
    let leaf = intermediate.issue_server_cert(["localhost"]).unwrap();

    let mut client = SslContext::builder(SslMethod::tls()).unwrap();
    root.configure_trust(&mut client).unwrap();

    let mut server = SslContext::builder(SslMethod::tls()).unwrap();
    leaf.configure_cert(&mut server).unwrap();
    let server = server.build();

    let presented = server.certificate().expect("no certificate configured");
    assert_eq!(presented.to_der().unwrap(), leaf.certificate().to_der().unwrap());
    let extra = server.extra_chain_certs();
    assert_eq!(extra.len(), 1);
    assert_eq!(
        extra.get(0).unwrap().to_der().unwrap(),
        intermediate.certificate().to_der().unwrap()
    );
}

#[test]
#[ignore = "requires the openssl command-line tool"]
fn test_openssl_cli_text_output() {
    let root = CertificateAuthority::new().unwrap();
    let intermediate = root.create_child_ca().unwrap();
    let leaf = intermediate
        .issue_server_cert(["localhost", "127.0.0.1"])
        .unwrap();

    let cert_file = leaf.cert_pem().tempfile(None).unwrap();
    let output = Command::new("openssl")
        .arg("x509")
        .arg("-in")
        .arg(cert_file.path())
        .arg("-noout")
        .arg("-text")
        .output()
        .expect("Failed to execute OpenSSL command");

    assert!(
        output.status.success(),
        "OpenSSL command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let output_text = String::from_utf8_lossy(&output.stdout);

    assert!(
        output_text.contains("Version: 3 (0x2)"),
        "Version field is incorrect"
    );
    assert!(
        output_text.contains("Signature Algorithm: ecdsa-with-SHA256"),
        "Signature algorithm is incorrect"
    );
    assert!(
        output_text.contains("CA:FALSE"),
        "Basic constraints are incorrect"
    );
    assert!(
        output_text.contains("DNS:localhost, IP Address:127.0.0.1"),
        "Subject alternative names are incorrect"
    );

    let issuer_regex =
        Regex::new(r"Issuer: O\s?=\s?trustkit v[0-9.]+, OU\s?=\s?Testing CA #[A-Za-z0-9_-]+").unwrap();
    assert!(
        issuer_regex.is_match(&output_text),
        "Issuer field is incorrect"
    );
    let subject_regex =
        Regex::new(r"Subject: O\s?=\s?trustkit v[0-9.]+, OU\s?=\s?Testing server cert #[A-Za-z0-9_-]+")
            .unwrap();
    assert!(
        subject_regex.is_match(&output_text),
        "Subject field is incorrect"
    );
    let not_after_regex = Regex::new(r"Not After : Jan  1 00:00:00 3000 GMT").unwrap();
    assert!(
        not_after_regex.is_match(&output_text),
        "Not After field is incorrect"
    );
}
