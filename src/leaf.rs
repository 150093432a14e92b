use crate::blob::Blob;
use crate::cert::Certificate;
use crate::error::Result;
use crate::tls::PresentationSink;

/// A server or client certificate.
///
/// This type has no public constructor; you get one from
/// [`CertificateAuthority::issue_server_cert`](crate::CertificateAuthority::issue_server_cert)
/// or [`issue_cert`](crate::CertificateAuthority::issue_cert).
///
/// The chain holds the issuing CA's certificate and every CA certificate above it, except
/// the self-signed root, which callers distribute separately as trust material.
#[derive(Debug, Clone)]
pub struct LeafCertificate {
    certificate: Certificate,
    chain: Vec<Certificate>,
    private_key_pem: Blob,
    cert_chain_pems: Vec<Blob>,
    private_key_and_cert_chain_pem: Blob,
}

impl LeafCertificate {
    pub(crate) fn new(
        private_key_pem: Blob,
        certificate: Certificate,
        chain: Vec<Certificate>,
    ) -> Result<Self> {
        let cert_chain_pems = std::iter::once(&certificate)
            .chain(&chain)
            .map(Certificate::to_pem_blob)
            .collect::<Result<Vec<_>>>()?;
        let private_key_and_cert_chain_pem =
            Blob::concat(std::iter::once(&private_key_pem).chain(&cert_chain_pems));

        Ok(Self {
            certificate,
            chain,
            private_key_pem,
            cert_chain_pems,
            private_key_and_cert_chain_pem,
        })
    }

    /// The PEM-encoded private key corresponding to this certificate.
    pub fn private_key_pem(&self) -> &Blob {
        &self.private_key_pem
    }

    /// The PEM-encoded leaf certificate alone.
    pub fn cert_pem(&self) -> &Blob {
        &self.cert_chain_pems[0]
    }

    /// The PEM-encoded ancestor certificates, immediate issuer first.
    pub fn chain_pems(&self) -> &[Blob] {
        &self.cert_chain_pems[1..]
    }

    /// The leaf certificate followed by the rest of the chain needed to reach the root CA.
    pub fn cert_chain_pems(&self) -> &[Blob] {
        &self.cert_chain_pems
    }

    /// The private key followed by the certificate chain, as one PEM bundle.
    pub fn private_key_and_cert_chain_pem(&self) -> &Blob {
        &self.private_key_and_cert_chain_pem
    }

    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    pub fn chain(&self) -> &[Certificate] {
        &self.chain
    }

    /// Installs this certificate, its key and its chain as the identity a TLS endpoint presents.
    pub fn configure_cert<P: PresentationSink + ?Sized>(&self, sink: &mut P) -> Result<()> {
        sink.present(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::CertificateAuthority;
    use crate::pem_utils::split_pem_bundle;

    #[test]
    fn test_bundle_layout() {
        let root = CertificateAuthority::new().unwrap();
        let intermediate = root.create_child_ca().unwrap();
        let leaf = intermediate.issue_server_cert(["example.com"]).unwrap();

        assert_eq!(leaf.cert_chain_pems().len(), 2);
        assert_eq!(leaf.chain_pems(), &leaf.cert_chain_pems()[1..]);
        assert_eq!(leaf.chain_pems()[0], *intermediate.cert_pem());

        let blocks = split_pem_bundle(leaf.private_key_and_cert_chain_pem().bytes()).unwrap();
        let labels: Vec<&str> = blocks.iter().map(|(label, _)| label.as_str()).collect();
        assert_eq!(labels, ["PRIVATE KEY", "CERTIFICATE", "CERTIFICATE"]);
        assert_eq!(blocks[1].1, leaf.certificate().to_der().unwrap());
        assert_eq!(blocks[2].1, intermediate.certificate().to_der().unwrap());
    }
}
