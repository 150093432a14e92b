use base64::{Engine, engine::general_purpose::URL_SAFE};
use const_oid::ObjectIdentifier;
use der::asn1::{SetOfVec, Utf8StringRef};
use der::Any;
use rand::RngCore;
use time::OffsetDateTime;
use time::macros::datetime;
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::{Name, RdnSequence, RelativeDistinguishedName};
use x509_cert::time::Time;

use super::extensions::ToAndFromX509Extension;
use crate::error::{Result, TrustKitError};

const ORGANIZATION_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");
const ORGANIZATIONAL_UNIT_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.11");
const COMMON_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");

/// URL-safe base64 of 12 random bytes, used to keep names unique across test runs.
pub fn random_text() -> String {
    let mut bytes = [0u8; 12];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE.encode(bytes)
}

/// Distinguished name of a generated certificate.
///
/// Every name carries the library's organization and an organizational unit made of a
/// human-readable label and a random suffix. Leaves may additionally carry a common name.
///
/// # Fields
/// * `organization` - The organization (O).
/// * `organization_unit` - The organizational unit (OU).
/// * `common_name` - The common name (CN), if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistinguishedName {
    pub organization: String,
    pub organization_unit: String,
    pub common_name: Option<String>,
}

impl DistinguishedName {
    /// Fresh name with `label` followed by a random suffix, e.g. `Testing CA #3q2-7wEAAAAAAAAA`.
    pub fn random(organization: &str, label: &str) -> Self {
        Self {
            organization: organization.to_string(),
            organization_unit: format!("{label} #{}", random_text()),
            common_name: None,
        }
    }

    pub fn with_common_name(mut self, common_name: Option<&str>) -> Self {
        self.common_name = common_name.map(str::to_string);
        self
    }

    /// Converts the distinguished name to an X.509 `Name`, one attribute per RDN.
    pub fn as_x509_name(&self) -> Result<Name> {
        let mut attributes = vec![
            (ORGANIZATION_NAME, self.organization.as_str()),
            (ORGANIZATIONAL_UNIT_NAME, self.organization_unit.as_str()),
        ];
        if let Some(common_name) = &self.common_name {
            attributes.push((COMMON_NAME, common_name.as_str()));
        }

        let rdns = attributes
            .into_iter()
            .map(|(oid, value)| -> Result<RelativeDistinguishedName> {
                let atv = AttributeTypeAndValue {
                    oid,
                    value: Any::encode_from(&Utf8StringRef::new(value)?)?,
                };
                Ok(RelativeDistinguishedName(SetOfVec::try_from(vec![atv])?))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(RdnSequence(rdns))
    }

    /// Reads the organization, organizational unit and common name out of an X.509 `Name`.
    pub fn from_x509_name(name: &Name) -> Result<Self> {
        let mut organization = None;
        let mut organization_unit = None;
        let mut common_name = None;

        for rdn in name.0.iter() {
            for attr in rdn.0.iter() {
                let slot = match attr.oid {
                    ORGANIZATION_NAME => &mut organization,
                    ORGANIZATIONAL_UNIT_NAME => &mut organization_unit,
                    COMMON_NAME => &mut common_name,
                    _ => continue,
                };
                *slot = Some(attr.value.decode_as::<String>()?);
            }
        }

        match (organization, organization_unit) {
            (Some(organization), Some(organization_unit)) => Ok(Self {
                organization,
                organization_unit,
                common_name,
            }),
            _ => Err(TrustKitError::DecodingError(
                "name lacks an organization or organizational unit".to_string(),
            )),
        }
    }
}

/// Certificate validity period.
///
/// The default window runs from 2000-01-01 to 3000-01-01, so generated certificates are
/// valid for any test run. Some verifiers reject dates past ~3001-01-19.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validity {
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

impl Default for Validity {
    fn default() -> Self {
        Self {
            not_before: datetime!(2000-01-01 0:00 UTC),
            not_after: datetime!(3000-01-01 0:00 UTC),
        }
    }
}

impl Validity {
    pub fn to_x509_validity(&self) -> Result<x509_cert::time::Validity> {
        Ok(x509_cert::time::Validity {
            not_before: encode_time(self.not_before)?,
            not_after: encode_time(self.not_after)?,
        })
    }
}

// RFC 5280 4.1.2.5: UTCTime through 2049, GeneralizedTime from 2050 on.
fn encode_time(at: OffsetDateTime) -> Result<Time> {
    if at.year() < 2050 {
        Ok(Time::UtcTime(der::asn1::UtcTime::from_system_time(
            at.into(),
        )?))
    } else {
        Ok(Time::GeneralTime(der::asn1::GeneralizedTime::from_system_time(
            at.into(),
        )?))
    }
}

/// Represents an X.509 extension.
///
/// # Fields
/// * `oid` - The object identifier of the extension.
/// * `critical` - Indicates if the extension is critical.
/// * `value` - The DER-encoded value of the extension.
#[derive(Clone, Debug)]
pub struct ExtensionParam {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    /// DER-encoded extension value
    pub value: Vec<u8>,
}

impl ExtensionParam {
    /// Creates an `ExtensionParam` from a specific extension.
    pub fn from_extension<E: ToAndFromX509Extension>(extension: &E, critical: bool) -> Result<Self> {
        Ok(Self {
            oid: E::OID,
            critical,
            value: extension.to_x509_extension_value()?,
        })
    }

    /// Decodes an `ExtensionParam` into a specific extension.
    pub fn to_extension<E: ToAndFromX509Extension>(&self) -> Result<E> {
        E::from_x509_extension_value(&self.value)
    }

    pub fn to_x509_extension(&self) -> Result<x509_cert::ext::Extension> {
        Ok(x509_cert::ext::Extension {
            extn_id: self.oid,
            critical: self.critical,
            extn_value: der::asn1::OctetString::new(self.value.clone())?,
        })
    }

    pub fn from_x509_extension(ext: &x509_cert::ext::Extension) -> Self {
        Self {
            oid: ext.extn_id,
            critical: ext.critical,
            value: ext.extn_value.as_bytes().to_vec(),
        }
    }
}
