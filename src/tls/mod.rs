//! Loading generated material into TLS stacks.
//!
//! Each supported stack implements [`TrustSink`] (accept a CA certificate as a trust anchor)
//! and [`PresentationSink`] (accept a leaf's key and chain as the local identity). The stack
//! is chosen at compile time through the `rustls` and `openssl` features.

#[cfg(feature = "openssl")]
pub mod openssl;
#[cfg(feature = "rustls")]
pub mod rustls;

use crate::cert::Certificate;
use crate::error::Result;
use crate::leaf::LeafCertificate;

/// Something that can be told to trust a CA certificate.
pub trait TrustSink {
    fn add_trust_anchor(&mut self, ca_certificate: &Certificate) -> Result<()>;
}

/// Something that can present a leaf certificate, its private key and its chain.
pub trait PresentationSink {
    fn present(&mut self, leaf: &LeafCertificate) -> Result<()>;
}
