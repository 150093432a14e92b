//! rustls adapters.
//!
//! ```
//! use trustkit::CertificateAuthority;
//! use trustkit::tls::rustls::{RustlsIdentity, client_config};
//!
//! let ca = CertificateAuthority::new()?;
//! let mut roots = rustls::RootCertStore::empty();
//! ca.configure_trust(&mut roots)?;
//!
//! let mut identity = RustlsIdentity::new();
//! ca.issue_server_cert(["localhost"])?.configure_cert(&mut identity)?;
//!
//! let _server = identity.server_config()?;
//! let _client = client_config(roots)?;
//! # Ok::<(), trustkit::TrustKitError>(())
//! ```

use std::sync::Arc;

use ::rustls::crypto::CryptoProvider;
use ::rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use ::rustls::server::WebPkiClientVerifier;
use ::rustls::{ClientConfig, RootCertStore, ServerConfig};

use super::{PresentationSink, TrustSink};
use crate::cert::Certificate;
use crate::error::{Result, TrustKitError};
use crate::leaf::LeafCertificate;
use crate::pem_utils::split_pem_bundle;

fn tls_error(err: impl std::fmt::Display) -> TrustKitError {
    TrustKitError::TlsContext(err.to_string())
}

/// The crypto provider every config built here uses.
pub fn provider() -> Arc<CryptoProvider> {
    Arc::new(::rustls::crypto::ring::default_provider())
}

impl TrustSink for RootCertStore {
    fn add_trust_anchor(&mut self, ca_certificate: &Certificate) -> Result<()> {
        self.add(CertificateDer::from(ca_certificate.to_der()?))
            .map_err(tls_error)
    }
}

/// A client config that trusts `roots` and presents no certificate.
pub fn client_config(roots: RootCertStore) -> Result<ClientConfig> {
    Ok(ClientConfig::builder_with_provider(provider())
        .with_safe_default_protocol_versions()
        .map_err(tls_error)?
        .with_root_certificates(roots)
        .with_no_client_auth())
}

/// Key and certificate chain collected from a [`LeafCertificate`], ready for rustls.
#[derive(Debug, Default)]
pub struct RustlsIdentity {
    cert_chain: Vec<CertificateDer<'static>>,
    key: Option<PrivateKeyDer<'static>>,
}

impl RustlsIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leaf certificate first, then the ancestors.
    pub fn cert_chain(&self) -> &[CertificateDer<'static>] {
        &self.cert_chain
    }

    pub fn key(&self) -> Option<&PrivateKeyDer<'static>> {
        self.key.as_ref()
    }

    /// A server config presenting this identity, without client authentication.
    pub fn server_config(&self) -> Result<ServerConfig> {
        let (cert_chain, key) = self.parts()?;
        ServerConfig::builder_with_provider(provider())
            .with_safe_default_protocol_versions()
            .map_err(tls_error)?
            .with_no_client_auth()
            .with_single_cert(cert_chain, key)
            .map_err(tls_error)
    }

    /// A server config presenting this identity and requiring clients chained to `client_roots`.
    pub fn server_config_with_client_auth(&self, client_roots: RootCertStore) -> Result<ServerConfig> {
        let (cert_chain, key) = self.parts()?;
        let verifier =
            WebPkiClientVerifier::builder_with_provider(Arc::new(client_roots), provider())
                .build()
                .map_err(tls_error)?;
        ServerConfig::builder_with_provider(provider())
            .with_safe_default_protocol_versions()
            .map_err(tls_error)?
            .with_client_cert_verifier(verifier)
            .with_single_cert(cert_chain, key)
            .map_err(tls_error)
    }

    /// A client config trusting `roots` and presenting this identity for client authentication.
    pub fn client_auth_config(&self, roots: RootCertStore) -> Result<ClientConfig> {
        let (cert_chain, key) = self.parts()?;
        ClientConfig::builder_with_provider(provider())
            .with_safe_default_protocol_versions()
            .map_err(tls_error)?
            .with_root_certificates(roots)
            .with_client_auth_cert(cert_chain, key)
            .map_err(tls_error)
    }

    fn parts(&self) -> Result<(Vec<CertificateDer<'static>>, PrivateKeyDer<'static>)> {
        let key = self.key.as_ref().ok_or_else(|| {
            TrustKitError::TlsContext("no certificate has been presented".to_string())
        })?;
        Ok((self.cert_chain.clone(), key.clone_key()))
    }
}

impl PresentationSink for RustlsIdentity {
    fn present(&mut self, leaf: &LeafCertificate) -> Result<()> {
        let blocks = split_pem_bundle(leaf.private_key_and_cert_chain_pem().bytes())
            .map_err(|e| TrustKitError::DecodingError(e.to_string()))?;

        let mut key = None;
        let mut cert_chain = Vec::new();
        for (label, der) in blocks {
            match label.as_str() {
                "PRIVATE KEY" => {
                    key = Some(PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(der)));
                }
                "CERTIFICATE" => cert_chain.push(CertificateDer::from(der)),
                other => {
                    return Err(TrustKitError::DecodingError(format!(
                        "unexpected PEM block {other:?}"
                    )));
                }
            }
        }

        self.key = Some(key.ok_or_else(|| {
            TrustKitError::DecodingError("bundle has no private key".to_string())
        })?);
        self.cert_chain = cert_chain;
        Ok(())
    }
}
