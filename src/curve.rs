//! Supported elliptic curves.
//!
//! The vault supports a closed set of NIST prime-field curves. Curve lookup
//! is a pure function over this enum; there is no runtime registry.

use crate::error::{KeyVaultError, Result};
use serde::{Deserialize, Serialize};

/// The elliptic curves a key can be generated on.
///
/// Variants are named after the OpenSSL-style curve identifiers accepted by
/// [`Curve::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Curve {
    /// NIST P-224 / secp224r1, SECG curve over a 224-bit prime field
    Secp224r1,
    /// NIST P-256 / prime256v1, X9.62 curve over a 256-bit prime field
    Prime256v1,
    /// NIST P-384 / secp384r1, SECG curve over a 384-bit prime field
    Secp384r1,
    /// NIST P-521 / secp521r1, SECG curve over a 521-bit prime field
    Secp521r1,
}

impl Curve {
    /// Resolve a curve identifier string to a curve.
    ///
    /// # Example
    ///
    /// ```
    /// use keyvault::curve::Curve;
    ///
    /// let curve = Curve::resolve("prime256v1").unwrap();
    /// assert_eq!(curve, Curve::Prime256v1);
    /// assert!(Curve::resolve("ed25519").is_err());
    /// ```
    pub fn resolve(name: &str) -> Result<Self> {
        match name {
            "secp224r1" => Ok(Curve::Secp224r1),
            "prime256v1" => Ok(Curve::Prime256v1),
            "secp384r1" => Ok(Curve::Secp384r1),
            "secp521r1" => Ok(Curve::Secp521r1),
            other => Err(KeyVaultError::UnsupportedCurve(other.to_string())),
        }
    }

    /// The canonical label for this curve, suitable for display and storage.
    pub fn label(&self) -> &'static str {
        match self {
            Curve::Secp224r1 => "secp224r1",
            Curve::Prime256v1 => "prime256v1",
            Curve::Secp384r1 => "secp384r1",
            Curve::Secp521r1 => "secp521r1",
        }
    }

    /// Width of a field element (and thus of each signature scalar) in bytes.
    pub fn field_size(&self) -> usize {
        match self {
            Curve::Secp224r1 => 28,
            Curve::Prime256v1 => 32,
            Curve::Secp384r1 => 48,
            Curve::Secp521r1 => 66,
        }
    }

    /// All supported curves, in ascending field size.
    pub fn all() -> &'static [Curve] {
        &[
            Curve::Secp224r1,
            Curve::Prime256v1,
            Curve::Secp384r1,
            Curve::Secp521r1,
        ]
    }
}

impl std::fmt::Display for Curve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
