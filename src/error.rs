//! use trustkit::error::TrustKitError;

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, TrustKitError>;

/// Represents errors that can occur while building test certificates.
#[derive(Debug, Error)]
pub enum TrustKitError {
    /// A caller-supplied argument was rejected (for example an empty hostname list).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The IDNA encoder rejected a domain name.
    #[error("Failed to encode {hostname:?} as an IDNA A-label: {source}")]
    Idna {
        hostname: String,
        #[source]
        source: idna::Errors,
    },

    /// ASN.1 DER encoding or decoding failure.
    #[error("DER error: {0}")]
    Der(String),

    /// Error during data encoding.
    #[error("Failed to encode data: {0}")]
    EncodingError(String),

    /// Error during data decoding.
    #[error("Failed to decode data: {0}")]
    DecodingError(String),

    /// Error during key generation.
    #[error("Key generation error: {0}")]
    KeyGenerationError(String),

    /// Error related to certificate operations.
    #[error("Certificate error: {0}")]
    CertificateError(String),

    /// Signing or signature verification failed.
    #[error("Signature error: {0}")]
    SignatureError(String),

    /// Error from RSA operations.
    #[error("RSA error: {0}")]
    RsaError(String),

    /// A TLS stack refused the generated material.
    #[error("TLS context error: {0}")]
    TlsContext(String),

    /// Filesystem error while writing PEM data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<der::Error> for TrustKitError {
    fn from(err: der::Error) -> Self {
        TrustKitError::Der(err.to_string())
    }
}

impl From<rsa::Error> for TrustKitError {
    fn from(err: rsa::Error) -> Self {
        TrustKitError::RsaError(err.to_string())
    }
}

impl From<pkcs8::Error> for TrustKitError {
    fn from(err: pkcs8::Error) -> Self {
        TrustKitError::EncodingError(err.to_string())
    }
}

impl From<pkcs8::spki::Error> for TrustKitError {
    fn from(err: pkcs8::spki::Error) -> Self {
        TrustKitError::EncodingError(err.to_string())
    }
}

impl From<ecdsa::signature::Error> for TrustKitError {
    fn from(err: ecdsa::signature::Error) -> Self {
        TrustKitError::SignatureError(err.to_string())
    }
}
