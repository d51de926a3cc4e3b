//! keyvault: local ECDSA key management.
//!
//! This library generates, persists, enumerates, and uses elliptic-curve
//! key pairs on a local host. It enables users to:
//!
//! - Generate key pairs on four NIST prime curves (P-224 through P-521)
//! - Import existing PEM public keys as verify-only records
//! - Persist each key in a directory-per-identifier flat-file store
//! - Sign and verify payloads, with DER signature interchange
//!
//! # Architecture
//!
//! Records are plain data; the store owns persistence and per-identifier
//! locking, and the repository composes curve resolution, key generation,
//! encoding, and fingerprinting on top. All operations return `Result`
//! types with comprehensive error handling - no `unwrap()` or panic.
//!
//! # Example
//!
//! ```rust,no_run
//! use keyvault::crypto::signature;
//! use keyvault::repository::KeyRepository;
//! use std::path::Path;
//!
//! fn example() -> keyvault::Result<()> {
//!     let repo = KeyRepository::open(Path::new("keys"))?;
//!
//!     let record = repo.create_generated("api-key", "prime256v1")?;
//!     println!("created {} ({})", record.id, record.fingerprint_sha256);
//!
//!     let sig = signature::sign(&record, b"payload")?;
//!     assert!(signature::verify(&record, b"payload", &sig)?);
//!     Ok(())
//! }
//! ```

pub mod crypto;
pub mod curve;
pub mod error;
pub mod render;
pub mod repository;
pub mod slug;
pub mod storage;

// Re-export commonly used types
pub use curve::Curve;
pub use error::{KeyVaultError, Result};
pub use repository::KeyRepository;
pub use storage::record::{KeyRecord, KeyStatus, KeyView};
