use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use const_oid::AssociatedOid;
use der::{
    Decode, Encode,
    asn1::{Ia5String, OctetString},
    oid::ObjectIdentifier,
};
use ipnet::IpNet;
use sha1::{Digest, Sha1};
use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::error::{Result, TrustKitError};
use crate::hostname::SanEntry;

/// Trait for converting to and from X.509 extensions.
///
/// This trait provides methods to encode and decode X.509 extension values.
///
/// # Example
/// ```
/// use trustkit::cert::extensions::{SubjectAltName, ToAndFromX509Extension};
/// use trustkit::hostname::SanEntry;
///
/// let san = SubjectAltName { entries: vec![SanEntry::DnsName("example.com".to_string())] };
/// let encoded = san.to_x509_extension_value().unwrap();
/// let decoded = SubjectAltName::from_x509_extension_value(&encoded).unwrap();
/// assert_eq!(san.entries, decoded.entries);
/// ```
pub trait ToAndFromX509Extension {
    /// The Object Identifier (OID) for the extension.
    const OID: ObjectIdentifier;

    /// Encodes the extension into a DER-encoded byte vector.
    fn to_x509_extension_value(&self) -> Result<Vec<u8>>;

    /// Decodes the extension from a DER-encoded byte slice.
    fn from_x509_extension_value(extension: &[u8]) -> Result<Self>
    where
        Self: Sized;
}

/// Represents the Subject Alternative Name (SAN) extension.
///
/// Entries keep their order and are not deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectAltName {
    pub entries: Vec<SanEntry>,
}

impl ToAndFromX509Extension for SubjectAltName {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::SubjectAltName::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let san = x509_cert::ext::pkix::SubjectAltName(
            self.entries
                .iter()
                .map(to_general_name)
                .collect::<Result<Vec<_>>>()?,
        );

        Ok(san.to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self> {
        let san = x509_cert::ext::pkix::SubjectAltName::from_der(extension)?;
        let entries = san
            .0
            .iter()
            .map(from_general_name)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }
}

fn to_general_name(entry: &SanEntry) -> Result<GeneralName> {
    match entry {
        SanEntry::DnsName(name) => Ia5String::new(name)
            .map(GeneralName::DnsName)
            .map_err(|e| TrustKitError::InvalidArgument(e.to_string())),
        SanEntry::IpAddress(addr) => Ok(GeneralName::IpAddress(OctetString::new(ip_octets(
            *addr,
        ))?)),
        // Address immediately followed by the netmask (RFC 5280 4.2.1.6, name constraints form).
        SanEntry::IpNetwork(net) => {
            let mut octets = ip_octets(net.network());
            octets.extend(ip_octets(net.netmask()));
            Ok(GeneralName::IpAddress(OctetString::new(octets)?))
        }
    }
}

fn from_general_name(name: &GeneralName) -> Result<SanEntry> {
    match name {
        GeneralName::DnsName(dns) => Ok(SanEntry::DnsName(dns.to_string())),
        GeneralName::IpAddress(octets) => {
            let octets = octets.as_bytes();
            match octets.len() {
                4 | 16 => Ok(SanEntry::IpAddress(ip_from_octets(octets)?)),
                8 | 32 => {
                    let (addr, mask) = octets.split_at(octets.len() / 2);
                    let mut prefix = 0u8;
                    for byte in mask {
                        prefix += byte.leading_ones() as u8;
                        if *byte != 0xff {
                            break;
                        }
                    }
                    let net = IpNet::new(ip_from_octets(addr)?, prefix)
                        .map_err(|e| TrustKitError::DecodingError(e.to_string()))?;
                    Ok(SanEntry::IpNetwork(net))
                }
                len => Err(TrustKitError::DecodingError(format!(
                    "IP address entry has invalid length {len}"
                ))),
            }
        }
        _ => Err(TrustKitError::DecodingError(
            "Unsupported general name type".to_string(),
        )),
    }
}

fn ip_octets(addr: IpAddr) -> Vec<u8> {
    match addr {
        IpAddr::V4(v4) => v4.octets().to_vec(),
        IpAddr::V6(v6) => v6.octets().to_vec(),
    }
}

fn ip_from_octets(octets: &[u8]) -> Result<IpAddr> {
    if let Ok(v4) = <[u8; 4]>::try_from(octets) {
        Ok(IpAddr::V4(Ipv4Addr::from(v4)))
    } else if let Ok(v6) = <[u8; 16]>::try_from(octets) {
        Ok(IpAddr::V6(Ipv6Addr::from(v6)))
    } else {
        Err(TrustKitError::DecodingError(format!(
            "IP address has invalid length {}",
            octets.len()
        )))
    }
}

/// Represents the Basic Constraints extension.
///
/// This extension indicates whether the certificate is a CA certificate and its path length.
///
/// # Fields
/// * `is_ca` - Indicates if the certificate is a CA.
/// * `max_path_length` - The maximum number of intermediate CAs allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BasicConstraints {
    pub is_ca: bool,
    pub max_path_length: Option<u8>,
}

impl ToAndFromX509Extension for BasicConstraints {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::BasicConstraints::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let bc = x509_cert::ext::pkix::BasicConstraints {
            ca: self.is_ca,
            path_len_constraint: self.max_path_length,
        };

        Ok(bc.to_der()?)
    }

    fn from_x509_extension_value(der_bytes: &[u8]) -> Result<Self> {
        let bc = x509_cert::ext::pkix::BasicConstraints::from_der(der_bytes)?;
        Ok(Self {
            is_ca: bc.ca,
            max_path_length: bc.path_len_constraint,
        })
    }
}

/// Represents the Subject Key Identifier (SKI) extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectKeyIdentifier(pub Vec<u8>);

impl SubjectKeyIdentifier {
    /// SHA-1 of the subjectPublicKey bit string (RFC 5280 4.2.1.2, method 1).
    pub fn from_spki(spki: &SubjectPublicKeyInfoOwned) -> Self {
        Self(Sha1::digest(spki.subject_public_key.raw_bytes()).to_vec())
    }
}

impl ToAndFromX509Extension for SubjectKeyIdentifier {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::SubjectKeyIdentifier::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let ski = x509_cert::ext::pkix::SubjectKeyIdentifier(OctetString::new(self.0.as_slice())?);
        Ok(ski.to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self> {
        let ski = x509_cert::ext::pkix::SubjectKeyIdentifier::from_der(extension)?;
        Ok(Self(ski.0.as_bytes().to_vec()))
    }
}

/// Represents the Authority Key Identifier (AKI) extension.
///
/// Only the key identifier form is produced; it equals the issuer's subject key identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityKeyIdentifier {
    pub key_identifier: Vec<u8>,
}

impl From<&SubjectKeyIdentifier> for AuthorityKeyIdentifier {
    fn from(ski: &SubjectKeyIdentifier) -> Self {
        Self {
            key_identifier: ski.0.clone(),
        }
    }
}

impl ToAndFromX509Extension for AuthorityKeyIdentifier {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::AuthorityKeyIdentifier::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let aki = x509_cert::ext::pkix::AuthorityKeyIdentifier {
            key_identifier: Some(OctetString::new(self.key_identifier.as_slice())?),
            authority_cert_issuer: None,
            authority_cert_serial_number: None,
        };

        Ok(aki.to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self> {
        let aki = x509_cert::ext::pkix::AuthorityKeyIdentifier::from_der(extension)?;
        let key_identifier = aki.key_identifier.ok_or_else(|| {
            TrustKitError::DecodingError("authority key identifier has no key id".to_string())
        })?;
        Ok(Self {
            key_identifier: key_identifier.as_bytes().to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_constraints_encoding_decoding() {
        let original = BasicConstraints {
            is_ca: true,
            max_path_length: Some(9),
        };
        let encoded = original.to_x509_extension_value().unwrap();
        let decoded = BasicConstraints::from_x509_extension_value(&encoded).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn test_authority_key_identifier_encoding_decoding() {
        let ski = SubjectKeyIdentifier(vec![1, 2, 3, 4, 5]);
        let original = AuthorityKeyIdentifier::from(&ski);
        let encoded = original.to_x509_extension_value().unwrap();
        let decoded = AuthorityKeyIdentifier::from_x509_extension_value(&encoded).unwrap();
        assert_eq!(decoded.key_identifier, ski.0);
    }

    #[test]
    fn test_san_ip_network_octets() {
        let san = SubjectAltName {
            entries: vec![
                SanEntry::IpNetwork("10.0.0.0/8".parse().unwrap()),
                SanEntry::IpAddress("127.0.0.1".parse().unwrap()),
            ],
        };
        let encoded = san.to_x509_extension_value().unwrap();
        let raw = x509_cert::ext::pkix::SubjectAltName::from_der(&encoded).unwrap();
        match &raw.0[0] {
            GeneralName::IpAddress(octets) => {
                assert_eq!(octets.as_bytes(), [10, 0, 0, 0, 255, 0, 0, 0])
            }
            other => panic!("unexpected general name {other:?}"),
        }
        match &raw.0[1] {
            GeneralName::IpAddress(octets) => assert_eq!(octets.as_bytes(), [127, 0, 0, 1]),
            other => panic!("unexpected general name {other:?}"),
        }
    }

    #[test]
    fn test_san_keeps_order_and_duplicates() {
        let san = SubjectAltName {
            entries: vec![
                SanEntry::DnsName("b.example".to_string()),
                SanEntry::IpNetwork("2001::/16".parse().unwrap()),
                SanEntry::DnsName("a.example".to_string()),
                SanEntry::DnsName("b.example".to_string()),
            ],
        };
        let encoded = san.to_x509_extension_value().unwrap();
        let decoded = SubjectAltName::from_x509_extension_value(&encoded).unwrap();
        assert_eq!(decoded, san);
    }
}
