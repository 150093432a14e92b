use bon::Builder;

use crate::cert::params::Validity;

/// Path length written into every CA's basic constraints extension.
pub const DEFAULT_PATH_LENGTH: u8 = 9;

/// RSA modulus size used when RSA is requested without an explicit size.
///
/// This is the smallest size rustls (through ring) accepts for RSA signatures, so it is
/// not the fastest option; pass a smaller `bits` for material that never reaches rustls.
pub const DEFAULT_RSA_BITS: usize = 2048;

/// Organization name placed in every generated distinguished name.
pub fn default_organization() -> String {
    format!("trustkit v{}", env!("CARGO_PKG_VERSION"))
}

/// Key algorithm used for CA and leaf key pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyAlgorithm {
    /// ECDSA over P-256. Fast to generate, so it is the default.
    #[default]
    EcdsaP256,
    /// RSA with the given modulus size in bits.
    Rsa { bits: usize },
}

impl KeyAlgorithm {
    pub fn rsa() -> Self {
        KeyAlgorithm::Rsa {
            bits: DEFAULT_RSA_BITS,
        }
    }
}

/// Settings shared by a root CA and every CA and leaf issued beneath it.
///
/// ```
/// use trustkit::config::{CaConfig, KeyAlgorithm};
///
/// let config = CaConfig::builder()
///     .key_algorithm(KeyAlgorithm::Rsa { bits: 1024 })
///     .organization("integration tests".to_string())
///     .build();
/// assert_eq!(config.path_length, 9);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct CaConfig {
    #[builder(default)]
    pub key_algorithm: KeyAlgorithm,
    #[builder(default = default_organization())]
    pub organization: String,
    #[builder(default = DEFAULT_PATH_LENGTH)]
    pub path_length: u8,
    #[builder(default)]
    pub validity: Validity,
}

impl Default for CaConfig {
    fn default() -> Self {
        CaConfig::builder().build()
    }
}
