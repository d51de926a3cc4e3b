//! Cryptographic operations module.
//!
//! This module provides the cryptographic core of the vault:
//!
//! - ECDSA key pair generation and public-key import on the supported
//!   NIST prime curves
//! - Canonical container encodings (PKCS8/SPKI DER, PEM armor, base64
//!   transport wrap)
//! - Public key fingerprint derivation
//! - Signing, verification, and DER signature interchange
//!
//! # Example
//!
//! ```
//! use keyvault::crypto::{codec, fingerprint, keys};
//! use keyvault::curve::Curve;
//!
//! # fn example() -> keyvault::Result<()> {
//! let pair = keys::generate_keypair(Curve::Prime256v1)?;
//! let (private_pem, public_pem) =
//!     codec::encode_pair(Some(pair.private_der.as_slice()), &pair.public_der)?;
//!
//! assert!(private_pem.is_some());
//! assert_eq!(fingerprint::sha256(&pair.public_der).len(), 64);
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod fingerprint;
pub mod keys;
pub mod signature;
