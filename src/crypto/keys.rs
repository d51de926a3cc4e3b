//! ECDSA key pair generation and public-key import.
//!
//! Key material is handled in its canonical DER forms: PKCS8 for private
//! keys, SPKI for public keys. Each supported curve dispatches to its
//! concrete RustCrypto implementation.

use crate::crypto::codec;
use crate::curve::Curve;
use crate::error::{KeyVaultError, Result};
use pkcs8::{DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

/// A freshly generated key pair in canonical DER encodings.
pub struct GeneratedKeypair {
    /// PKCS8 DER private key; zeroized on drop.
    pub private_der: Zeroizing<Vec<u8>>,

    /// SPKI DER public key.
    pub public_der: Vec<u8>,
}

/// Generate a new key pair on the given curve using the operating system's
/// cryptographically secure random number generator.
///
/// # Example
///
/// ```
/// use keyvault::crypto::keys::generate_keypair;
/// use keyvault::curve::Curve;
///
/// let pair = generate_keypair(Curve::Prime256v1).unwrap();
/// assert!(!pair.public_der.is_empty());
/// ```
pub fn generate_keypair(curve: Curve) -> Result<GeneratedKeypair> {
    let (private, public) = match curve {
        Curve::Secp224r1 => {
            let secret = p224::SecretKey::random(&mut OsRng);
            let private = secret.to_pkcs8_der().map_err(crypto_err)?;
            let public = secret.public_key().to_public_key_der().map_err(crypto_err)?;
            (private, public)
        }
        Curve::Prime256v1 => {
            let secret = p256::SecretKey::random(&mut OsRng);
            let private = secret.to_pkcs8_der().map_err(crypto_err)?;
            let public = secret.public_key().to_public_key_der().map_err(crypto_err)?;
            (private, public)
        }
        Curve::Secp384r1 => {
            let secret = p384::SecretKey::random(&mut OsRng);
            let private = secret.to_pkcs8_der().map_err(crypto_err)?;
            let public = secret.public_key().to_public_key_der().map_err(crypto_err)?;
            (private, public)
        }
        Curve::Secp521r1 => {
            let secret = p521::SecretKey::random(&mut OsRng);
            let private = secret.to_pkcs8_der().map_err(crypto_err)?;
            let public = secret.public_key().to_public_key_der().map_err(crypto_err)?;
            (private, public)
        }
    };

    Ok(GeneratedKeypair {
        private_der: Zeroizing::new(private.as_bytes().to_vec()),
        public_der: public.into_vec(),
    })
}

/// Import a PEM-armored public key, validating it against the given curve.
///
/// Returns the canonical SPKI DER encoding, so two imports of the same key
/// produce identical bytes regardless of PEM formatting differences.
pub fn import_public_pem(curve: Curve, pem: &str) -> Result<Vec<u8>> {
    let der = codec::decode_public_pem(pem)?;

    let canonical = match curve {
        Curve::Secp224r1 => p224::PublicKey::from_public_key_der(&der)
            .map_err(import_err)?
            .to_public_key_der()
            .map_err(crypto_err)?,
        Curve::Prime256v1 => p256::PublicKey::from_public_key_der(&der)
            .map_err(import_err)?
            .to_public_key_der()
            .map_err(crypto_err)?,
        Curve::Secp384r1 => p384::PublicKey::from_public_key_der(&der)
            .map_err(import_err)?
            .to_public_key_der()
            .map_err(crypto_err)?,
        Curve::Secp521r1 => p521::PublicKey::from_public_key_der(&der)
            .map_err(import_err)?
            .to_public_key_der()
            .map_err(crypto_err)?,
    };

    Ok(canonical.into_vec())
}

fn crypto_err<E: std::fmt::Display>(err: E) -> KeyVaultError {
    KeyVaultError::Crypto(err.to_string())
}

fn import_err<E: std::fmt::Display>(err: E) -> KeyVaultError {
    KeyVaultError::MalformedKey(format!("not a valid public key for the curve: {}", err))
}
