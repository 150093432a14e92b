use der::Encode;
use x509_cert::certificate::CertificateInner;
use x509_cert::name::Name;

use crate::cert::extensions::{AuthorityKeyIdentifier, SubjectKeyIdentifier};
use crate::cert::{Certificate, SignatureAlgorithm};
use crate::error::Result;
use crate::key::KeyPair;
use crate::tbs_certificate::TbsCertificate;

/// Represents an entity capable of issuing certificates.
///
/// This trait provides methods to retrieve issuer details and sign certificates.
pub trait Issuer {
    /// Returns the distinguished name written into the issued certificate's issuer field.
    fn issuer_name(&self) -> Name;

    /// Returns the signing key of the issuer.
    fn signing_key(&self) -> &KeyPair;

    /// Returns the issuer's subject key identifier, if it has one to link to.
    fn key_identifier(&self) -> Option<SubjectKeyIdentifier>;

    /// Builds an authority key identifier pointing at this issuer.
    fn authority_key_identifier(&self) -> Option<AuthorityKeyIdentifier> {
        self.key_identifier().as_ref().map(AuthorityKeyIdentifier::from)
    }

    /// Signs `tbs` with SHA-256 and the issuer's key.
    ///
    /// The issuer field of `tbs` must already name this issuer.
    fn sign(&self, tbs: &TbsCertificate) -> Result<Certificate> {
        let signature_algorithm = SignatureAlgorithm::for_key(self.signing_key());
        let tbs_certificate = tbs.to_tbs_certificate_inner(signature_algorithm)?;
        let signature = self.signing_key().sign_data(&tbs_certificate.to_der()?)?;

        let inner = CertificateInner {
            tbs_certificate,
            signature_algorithm: signature_algorithm.to_algorithm_identifier()?,
            signature: der::asn1::BitString::from_bytes(&signature)?,
        };

        Ok(Certificate { inner })
    }
}

/// Issuer of a self-signed certificate: the subject signs with its own key.
pub(crate) struct SelfIssuer<'a> {
    pub name: Name,
    pub key: &'a KeyPair,
}

impl Issuer for SelfIssuer<'_> {
    fn issuer_name(&self) -> Name {
        self.name.clone()
    }

    fn signing_key(&self) -> &KeyPair {
        self.key
    }

    fn key_identifier(&self) -> Option<SubjectKeyIdentifier> {
        None
    }
}
