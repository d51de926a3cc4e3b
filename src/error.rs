//! Error types for the keyvault library.
//!
//! This module defines all error types used throughout the library.
//! All errors implement `std::error::Error` and are designed so callers can
//! branch on the failure kind ("wrong operation for this key" versus "bad
//! data") rather than parsing messages.

use thiserror::Error;
use uuid::Uuid;

/// The main error type for keyvault operations.
///
/// This enum covers all possible errors that can occur during key
/// generation, encoding, persistence, and signing operations.
#[derive(Error, Debug)]
pub enum KeyVaultError {
    /// A key name was blank or whitespace-only
    #[error("key name cannot be blank")]
    EmptyName,

    /// The requested curve is not one of the supported set
    #[error("unsupported curve: {0}")]
    UnsupportedCurve(String),

    /// Key material failed base64, PEM, or DER decoding
    #[error("malformed key: {0}")]
    MalformedKey(String),

    /// A signature failed DER decoding
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    /// A stored record blob failed to deserialize
    #[error("corrupt key record: {0}")]
    CorruptRecord(String),

    /// A signing attempt against a record holding only public material
    #[error("key {0} has no private key material")]
    MissingPrivateKey(Uuid),

    /// Lookup by identifier with no matching storage directory
    #[error("key not found: {0}")]
    NotFound(String),

    /// A cryptographic operation failed
    #[error("cryptographic error: {0}")]
    Crypto(String),

    /// Storage I/O error
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for keyvault operations.
pub type Result<T> = std::result::Result<T, KeyVaultError>;
