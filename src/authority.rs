use std::sync::Arc;

use tracing::debug;
use x509_cert::name::Name;

use crate::blob::Blob;
use crate::cert::Certificate;
use crate::cert::extensions::{
    AuthorityKeyIdentifier, BasicConstraints, SubjectAltName, SubjectKeyIdentifier,
};
use crate::cert::params::DistinguishedName;
use crate::config::CaConfig;
use crate::error::{Result, TrustKitError};
use crate::hostname::hostname_to_san;
use crate::issuer::{Issuer, SelfIssuer};
use crate::key::KeyPair;
use crate::leaf::LeafCertificate;
use crate::tbs_certificate::TbsCertificate;
use crate::tls::TrustSink;

const CA_LABEL: &str = "Testing CA";
const SERVER_CERT_LABEL: &str = "Testing server cert";

/// A certificate authority.
///
/// A root CA signs its own certificate; a child CA, made with
/// [`create_child_ca`](Self::create_child_ca), is signed by its parent. Cloning is cheap and
/// shares the same key and certificate. A CA never changes after construction, so children
/// and leaves can be issued from any number of handles.
///
/// ```
/// use trustkit::CertificateAuthority;
///
/// let ca = CertificateAuthority::new()?;
/// let leaf = ca.issue_server_cert(["localhost", "127.0.0.1"])?;
/// assert!(leaf.certificate().is_signed_by(ca.certificate())?);
/// assert!(leaf.chain().is_empty());
/// # Ok::<(), trustkit::TrustKitError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CertificateAuthority(Arc<Authority>);

#[derive(Debug)]
struct Authority {
    key: KeyPair,
    certificate: Certificate,
    cert_pem: Blob,
    key_identifier: SubjectKeyIdentifier,
    config: CaConfig,
    parent: Option<CertificateAuthority>,
}

impl CertificateAuthority {
    /// Creates a self-signed root CA with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(CaConfig::default())
    }

    /// Creates a self-signed root CA.
    pub fn with_config(config: CaConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Creates an intermediate CA signed by this one. The child shares this CA's config.
    pub fn create_child_ca(&self) -> Result<Self> {
        Self::build(self.0.config.clone(), Some(self.clone()))
    }

    fn build(config: CaConfig, parent: Option<CertificateAuthority>) -> Result<Self> {
        let key = KeyPair::generate(config.key_algorithm)?;
        let subject = DistinguishedName::random(&config.organization, CA_LABEL);
        let name = subject.as_x509_name()?;

        let self_issuer;
        let signer: &dyn Issuer = match &parent {
            Some(parent) => parent as &dyn Issuer,
            None => {
                self_issuer = SelfIssuer {
                    name: name.clone(),
                    key: &key,
                };
                &self_issuer
            }
        };

        let mut tbs = TbsCertificate::new(
            name,
            signer.issuer_name(),
            key.public_key(),
            config.validity.clone(),
        )?
        .add_extension(
            &BasicConstraints {
                is_ca: true,
                max_path_length: Some(config.path_length),
            },
            true,
        )?;
        if let Some(aki) = signer.authority_key_identifier() {
            tbs = tbs.add_extension(&aki, false)?;
        }
        let certificate = signer.sign(&tbs)?;

        let key_identifier = certificate.subject_key_identifier()?.ok_or_else(|| {
            TrustKitError::CertificateError("CA certificate lacks a subject key identifier".into())
        })?;
        let cert_pem = certificate.to_pem_blob()?;

        let ca = Self(Arc::new(Authority {
            key,
            certificate,
            cert_pem,
            key_identifier,
            config,
            parent,
        }));
        debug!(
            subject = %subject.organization_unit,
            depth = ca.depth(),
            "created certificate authority"
        );
        Ok(ca)
    }

    /// Issues a server certificate valid for `hostnames`.
    ///
    /// Each hostname becomes one subject alternative name entry, in order. Accepted forms
    /// are listed in [`crate::hostname`]: DNS names (wildcard and internationalized included),
    /// IP addresses and IP networks.
    pub fn issue_server_cert<I, S>(&self, hostnames: I) -> Result<LeafCertificate>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.issue_cert(hostnames, None)
    }

    /// Issues a leaf certificate valid for `hostnames`, optionally with a subject common name.
    pub fn issue_cert<I, S>(&self, hostnames: I, common_name: Option<&str>) -> Result<LeafCertificate>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let hostnames: Vec<S> = hostnames.into_iter().collect();
        if hostnames.is_empty() {
            return Err(TrustKitError::InvalidArgument(
                "Must specify at least one hostname".to_string(),
            ));
        }
        let entries = hostnames
            .iter()
            .map(|hostname| hostname_to_san(hostname.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let key = KeyPair::generate(self.0.config.key_algorithm)?;
        let subject = DistinguishedName::random(&self.0.config.organization, SERVER_CERT_LABEL)
            .with_common_name(common_name);

        let tbs = TbsCertificate::new(
            subject.as_x509_name()?,
            self.issuer_name(),
            key.public_key(),
            self.0.config.validity.clone(),
        )?
        .add_extension(
            &BasicConstraints {
                is_ca: false,
                max_path_length: None,
            },
            true,
        )?
        .add_extension(&AuthorityKeyIdentifier::from(&self.0.key_identifier), false)?
        .add_extension(&SubjectAltName { entries }, true)?;
        let certificate = self.sign(&tbs)?;

        debug!(
            subject = %subject.organization_unit,
            issuer_depth = self.depth(),
            san_count = hostnames.len(),
            "issued leaf certificate"
        );
        LeafCertificate::new(key.to_pkcs8_pem()?, certificate, self.chain_to_root())
    }

    /// Certificates a leaf issued by this CA must present: this CA's own certificate and
    /// those of its ancestors, stopping before the self-signed root.
    pub fn chain_to_root(&self) -> Vec<Certificate> {
        let mut chain = Vec::new();
        let mut ca = self;
        while let Some(parent) = &ca.0.parent {
            chain.push(ca.0.certificate.clone());
            ca = parent;
        }
        chain
    }

    /// Installs this CA's certificate as a trust anchor.
    pub fn configure_trust<T: TrustSink + ?Sized>(&self, sink: &mut T) -> Result<()> {
        sink.add_trust_anchor(&self.0.certificate)
    }

    pub fn certificate(&self) -> &Certificate {
        &self.0.certificate
    }

    /// The PEM-encoded certificate for this CA. Add it to a trust store to trust this CA.
    pub fn cert_pem(&self) -> &Blob {
        &self.0.cert_pem
    }

    /// The CA's private key as PKCS#8 PEM.
    pub fn private_key_pem(&self) -> Result<Blob> {
        self.0.key.to_pkcs8_pem()
    }

    pub fn parent(&self) -> Option<&CertificateAuthority> {
        self.0.parent.as_ref()
    }

    /// The self-signed CA at the top of this CA's chain.
    pub fn root(&self) -> &CertificateAuthority {
        let mut ca = self;
        while let Some(parent) = &ca.0.parent {
            ca = parent;
        }
        ca
    }

    /// Number of CAs above this one; zero for a root.
    pub fn depth(&self) -> usize {
        self.parent().map_or(0, |parent| parent.depth() + 1)
    }

    pub fn config(&self) -> &CaConfig {
        &self.0.config
    }
}

impl Issuer for CertificateAuthority {
    fn issuer_name(&self) -> Name {
        self.0.certificate.subject().clone()
    }

    fn signing_key(&self) -> &KeyPair {
        &self.0.key
    }

    fn key_identifier(&self) -> Option<SubjectKeyIdentifier> {
        Some(self.0.key_identifier.clone())
    }
}
