use rand::RngCore;
use x509_cert::Version;
use x509_cert::certificate::TbsCertificateInner;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;

use crate::cert::SignatureAlgorithm;
use crate::cert::extensions::{SubjectKeyIdentifier, ToAndFromX509Extension};
use crate::cert::params::{ExtensionParam, Validity};
use crate::error::Result;
use crate::key::PublicKey;

/// Length of generated serial numbers, the RFC 5280 maximum.
const SERIAL_NUMBER_LEN: usize = 20;

/// Represents the "To Be Signed" (TBS) portion of an X.509 certificate.
///
/// [`TbsCertificate::new`] fills in everything CA and leaf certificates have in common: the
/// validity window, a random serial number and the subject key identifier. Callers then add
/// their own extensions and hand the result to an [`Issuer`](crate::issuer::Issuer).
///
/// # Fields
/// * `serial_number` - The unique identifier for the certificate.
/// * `issuer` - The distinguished name of the certificate issuer.
/// * `validity` - The certificate's validity period.
/// * `subject` - The distinguished name of the certificate subject.
/// * `subject_public_key` - The public key of the certificate subject.
/// * `extensions` - X.509 extensions, in the order they will be encoded.
#[derive(Debug, Clone)]
pub struct TbsCertificate {
    pub serial_number: Vec<u8>,
    pub issuer: Name,
    pub validity: Validity,
    pub subject: Name,
    pub subject_public_key: PublicKey,
    pub extensions: Vec<ExtensionParam>,
}

impl TbsCertificate {
    /// Creates a `TbsCertificate` carrying the fields shared by every certificate.
    ///
    /// # Arguments
    /// * `subject` - The distinguished name of the certificate subject.
    /// * `issuer` - The distinguished name of the certificate issuer.
    /// * `subject_public_key` - The public key of the certificate subject.
    /// * `validity` - The validity window.
    pub fn new(
        subject: Name,
        issuer: Name,
        subject_public_key: PublicKey,
        validity: Validity,
    ) -> Result<Self> {
        let ski = SubjectKeyIdentifier::from_spki(&subject_public_key.to_spki()?);
        Ok(Self {
            serial_number: random_serial_number(),
            issuer,
            validity,
            subject,
            subject_public_key,
            extensions: vec![ExtensionParam::from_extension(&ski, false)?],
        })
    }

    /// Appends an extension.
    pub fn add_extension<E: ToAndFromX509Extension>(
        mut self,
        extension: &E,
        critical: bool,
    ) -> Result<Self> {
        self.extensions
            .push(ExtensionParam::from_extension(extension, critical)?);
        Ok(self)
    }

    /// Converts the `TbsCertificate` into a `TbsCertificateInner` for DER encoding.
    pub fn to_tbs_certificate_inner(
        &self,
        signature_algorithm: SignatureAlgorithm,
    ) -> Result<TbsCertificateInner> {
        let extensions = self
            .extensions
            .iter()
            .map(ExtensionParam::to_x509_extension)
            .collect::<Result<Vec<_>>>()?;

        Ok(TbsCertificateInner {
            version: Version::V3,
            serial_number: SerialNumber::new(&self.serial_number)?,
            signature: signature_algorithm.to_algorithm_identifier()?,
            issuer: self.issuer.clone(),
            validity: self.validity.to_x509_validity()?,
            subject: self.subject.clone(),
            subject_public_key_info: self.subject_public_key.to_spki()?,
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions: Some(extensions),
        })
    }
}

/// Random positive serial number of at most 20 octets.
fn random_serial_number() -> Vec<u8> {
    let mut serial = vec![0u8; SERIAL_NUMBER_LEN];
    rand::rng().fill_bytes(&mut serial);
    // Clear the sign bit so the DER INTEGER stays within 20 octets; keep it non-zero.
    serial[0] = (serial[0] & 0x7f) | 0x01;
    serial
}
