//! OpenSSL adapters over [`SslContextBuilder`].

use ::openssl::pkey::PKey;
use ::openssl::ssl::SslContextBuilder;
use ::openssl::x509::X509;

use super::{PresentationSink, TrustSink};
use crate::cert::Certificate;
use crate::error::{Result, TrustKitError};
use crate::leaf::LeafCertificate;

fn tls_error(err: ::openssl::error::ErrorStack) -> TrustKitError {
    TrustKitError::TlsContext(err.to_string())
}

fn to_x509(certificate: &Certificate) -> Result<X509> {
    X509::from_der(&certificate.to_der()?).map_err(tls_error)
}

impl TrustSink for SslContextBuilder {
    fn add_trust_anchor(&mut self, ca_certificate: &Certificate) -> Result<()> {
        self.cert_store_mut()
            .add_cert(to_x509(ca_certificate)?)
            .map_err(tls_error)
    }
}

impl PresentationSink for SslContextBuilder {
    fn present(&mut self, leaf: &LeafCertificate) -> Result<()> {
        let key = PKey::private_key_from_pem(leaf.private_key_pem().bytes()).map_err(tls_error)?;
        self.set_private_key(&key).map_err(tls_error)?;
        self.set_certificate(&to_x509(leaf.certificate())?)
            .map_err(tls_error)?;
        for certificate in leaf.chain() {
            self.add_extra_chain_cert(to_x509(certificate)?)
                .map_err(tls_error)?;
        }
        self.check_private_key().map_err(tls_error)
    }
}
