pub mod extensions;
pub mod params;

use der::{Decode, DecodePem, Encode, EncodePem};
use extensions::{
    AuthorityKeyIdentifier, BasicConstraints, SubjectAltName, SubjectKeyIdentifier,
    ToAndFromX509Extension,
};
use params::{DistinguishedName, ExtensionParam};
use x509_cert::certificate::CertificateInner;
use x509_cert::name::Name;
use x509_cert::spki::AlgorithmIdentifierOwned;

use crate::blob::Blob;
use crate::error::{Result, TrustKitError};
use crate::key::{KeyPair, PublicKey};

/// Represents the supported signature algorithms for certificates.
///
/// This enum provides a mapping to the corresponding OIDs for each algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// SHA-256 with RSA encryption.
    Sha256WithRSA,
    /// SHA-256 with ECDSA.
    Sha256WithECDSA,
}

impl SignatureAlgorithm {
    /// The algorithm a given key signs with.
    pub fn for_key(key: &KeyPair) -> Self {
        match key {
            KeyPair::Rsa { .. } => SignatureAlgorithm::Sha256WithRSA,
            KeyPair::EcdsaP256 { .. } => SignatureAlgorithm::Sha256WithECDSA,
        }
    }

    /// Converts a `SignatureAlgorithm` into an `AlgorithmIdentifierOwned`.
    ///
    /// RSA identifiers carry an explicit NULL parameter, ECDSA ones carry none (RFC 5758 3.2).
    pub fn to_algorithm_identifier(self) -> Result<AlgorithmIdentifierOwned> {
        Ok(match self {
            SignatureAlgorithm::Sha256WithRSA => AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
                parameters: Some(der::Any::new(der::Tag::Null, Vec::<u8>::new())?),
            },
            SignatureAlgorithm::Sha256WithECDSA => AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::ECDSA_WITH_SHA_256,
                parameters: None,
            },
        })
    }
}

/// Represents an X.509 certificate.
///
/// This struct provides methods to encode the certificate into DER or PEM formats and to
/// read back the fields this crate writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: CertificateInner,
}

impl Certificate {
    /// Encodes the certificate into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.inner
            .to_der()
            .map_err(|e| TrustKitError::EncodingError(e.to_string()))
    }

    /// Encodes the certificate into PEM format.
    pub fn to_pem(&self) -> Result<String> {
        self.inner
            .to_pem(der::pem::LineEnding::LF)
            .map_err(|e| TrustKitError::EncodingError(e.to_string()))
    }

    pub(crate) fn to_pem_blob(&self) -> Result<Blob> {
        Ok(Blob::new(self.to_pem()?.into_bytes()))
    }

    pub fn from_der(der: &[u8]) -> Result<Self> {
        let inner =
            CertificateInner::from_der(der).map_err(|e| TrustKitError::DecodingError(e.to_string()))?;
        Ok(Self { inner })
    }

    pub fn from_pem(pem: impl AsRef<[u8]>) -> Result<Self> {
        let inner = CertificateInner::from_pem(pem)
            .map_err(|e| TrustKitError::DecodingError(e.to_string()))?;
        Ok(Self { inner })
    }

    pub fn subject(&self) -> &Name {
        &self.inner.tbs_certificate.subject
    }

    pub fn issuer(&self) -> &Name {
        &self.inner.tbs_certificate.issuer
    }

    pub fn subject_dn(&self) -> Result<DistinguishedName> {
        DistinguishedName::from_x509_name(self.subject())
    }

    pub fn serial_number(&self) -> &[u8] {
        self.inner.tbs_certificate.serial_number.as_bytes()
    }

    pub fn public_key(&self) -> Result<PublicKey> {
        PublicKey::from_x509spki(&self.inner.tbs_certificate.subject_public_key_info)
    }

    /// All extensions, in certificate order.
    pub fn extensions(&self) -> Vec<ExtensionParam> {
        self.inner
            .tbs_certificate
            .extensions
            .iter()
            .flatten()
            .map(ExtensionParam::from_x509_extension)
            .collect()
    }

    /// Finds and decodes the extension `E`, returning it with its criticality.
    pub fn extension<E: ToAndFromX509Extension>(&self) -> Result<Option<(bool, E)>> {
        self.extensions()
            .iter()
            .find(|ext| ext.oid == E::OID)
            .map(|ext| -> Result<(bool, E)> { Ok((ext.critical, ext.to_extension::<E>()?)) })
            .transpose()
    }

    pub fn basic_constraints(&self) -> Result<Option<BasicConstraints>> {
        Ok(self.extension::<BasicConstraints>()?.map(|(_, bc)| bc))
    }

    pub fn subject_key_identifier(&self) -> Result<Option<SubjectKeyIdentifier>> {
        Ok(self.extension::<SubjectKeyIdentifier>()?.map(|(_, ski)| ski))
    }

    pub fn authority_key_identifier(&self) -> Result<Option<AuthorityKeyIdentifier>> {
        Ok(self
            .extension::<AuthorityKeyIdentifier>()?
            .map(|(_, aki)| aki))
    }

    pub fn subject_alt_name(&self) -> Result<Option<SubjectAltName>> {
        Ok(self.extension::<SubjectAltName>()?.map(|(_, san)| san))
    }

    /// Checks that `issuer` named and signed this certificate.
    pub fn is_signed_by(&self, issuer: &Certificate) -> Result<bool> {
        if self.issuer() != issuer.subject() {
            return Ok(false);
        }
        let tbs = self.inner.tbs_certificate.to_der()?;
        let signature = self.inner.signature.raw_bytes();
        Ok(issuer.public_key()?.verify(&tbs, signature).is_ok())
    }
}
