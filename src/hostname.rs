//! Classification of hostname-like strings into subject alternative name entries.
//!
//! Accepted forms:
//!
//! - Regular hostname: `example.com`
//! - Wildcard hostname: `*.example.com`
//! - International Domain Name (IDN): `café.example.com`
//! - IDN in A-label form: `xn--caf-dma.example.com`
//! - IPv4 address: `127.0.0.1`
//! - IPv6 address: `::1`
//! - IPv4 network: `10.0.0.0/8`
//! - IPv6 network: `2001::/16`

use std::fmt;
use std::net::IpAddr;

use idna::uts46::{AsciiDenyList, DnsLength, Hyphens, Uts46};
use ipnet::IpNet;
use tracing::trace;

use crate::error::{Result, TrustKitError};

const WILDCARD_PREFIX: &str = "*.";

/// A single entry of the subject alternative name extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanEntry {
    IpAddress(IpAddr),
    IpNetwork(IpNet),
    /// ASCII-compatible (A-label) form of the DNS name.
    DnsName(String),
}

impl fmt::Display for SanEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SanEntry::IpAddress(addr) => write!(f, "IP:{addr}"),
            SanEntry::IpNetwork(net) => write!(f, "IP:{net}"),
            SanEntry::DnsName(name) => write!(f, "DNS:{name}"),
        }
    }
}

/// Turns one hostname-like string into a [`SanEntry`].
///
/// Addresses are tried before networks, because a bare address such as `127.0.0.1` would
/// otherwise parse as the network `127.0.0.1/32`. Anything that is neither becomes a DNS
/// name, IDNA-encoded with UTS-46 mapping and STD3 rules. A leading `*.` is kept as-is and
/// only the remainder is encoded. A trailing root dot (`example.com.`) is kept.
pub fn hostname_to_san(hostname: &str) -> Result<SanEntry> {
    if hostname.is_empty() {
        return Err(TrustKitError::InvalidArgument(
            "hostnames must not be empty".to_string(),
        ));
    }

    let entry = if let Ok(addr) = hostname.parse::<IpAddr>() {
        SanEntry::IpAddress(addr)
    } else if let Some(net) = parse_network(hostname) {
        SanEntry::IpNetwork(net)
    } else {
        SanEntry::DnsName(to_a_label(hostname)?)
    };

    trace!(hostname, %entry, "classified hostname");
    Ok(entry)
}

// Host bits must be clear: "10.0.0.1/8" is not a network.
fn parse_network(hostname: &str) -> Option<IpNet> {
    let net = hostname.parse::<IpNet>().ok()?;
    (net.trunc() == net).then_some(net)
}

fn to_a_label(hostname: &str) -> Result<String> {
    let encode = |domain: &str| {
        Uts46::new()
            .to_ascii(
                domain.as_bytes(),
                AsciiDenyList::STD3,
                Hyphens::Check,
                DnsLength::VerifyAllowRootDot,
            )
            .map(|label| label.into_owned())
            .map_err(|source| TrustKitError::Idna {
                hostname: hostname.to_string(),
                source,
            })
    };

    match hostname.strip_prefix(WILDCARD_PREFIX) {
        Some(rest) => Ok(format!("{WILDCARD_PREFIX}{}", encode(rest)?)),
        None => encode(hostname),
    }
}
