//! The persisted key record and its public view.
//!
//! `KeyRecord` is the sole persisted entity: plain data, created once and
//! never mutated. The serialized record blob is the canonical source of
//! truth for a key; the raw DER and PEM files beside it are derived exports.

use crate::curve::Curve;
use crate::error::{KeyVaultError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Lifecycle status of a key.
///
/// Only `Active` is ever produced today; `Archived` exists as write-once
/// metadata with no transition path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyStatus {
    Active,
    Archived,
}

/// One key as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyRecord {
    /// Globally unique identifier; also the storage directory name.
    pub id: Uuid,

    /// Operator-supplied label, not unique-indexed.
    pub name: String,

    /// Auto-generated memorable alias, not unique-indexed.
    pub slug: String,

    /// Write-once lifecycle status.
    pub status: KeyStatus,

    /// The elliptic curve the key pair lives on.
    pub curve: Curve,

    /// Legacy 128-bit MD5 fingerprint of the SPKI DER, hex.
    pub fingerprint_md5: String,

    /// 256-bit SHA-256 fingerprint of the SPKI DER, hex.
    pub fingerprint_sha256: String,

    /// Base64-wrapped PEM public key.
    pub public_key_b64: String,

    /// Base64-wrapped PEM private key; empty for imported public-only keys.
    pub private_key_b64: String,

    /// Location of the raw PKCS8 DER private key artifact.
    pub private_key_path: PathBuf,

    /// Location of the raw SPKI DER public key artifact.
    pub public_key_path: PathBuf,

    /// Location of the PEM-armored private key artifact.
    pub private_pem_path: PathBuf,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl KeyRecord {
    /// The identifier in the form used as the storage directory name.
    pub fn file_pointer(&self) -> String {
        self.id.to_string()
    }

    /// Whether this record can sign, or holds only public material.
    pub fn has_private_key(&self) -> bool {
        !self.private_key_b64.is_empty()
    }

    /// Serialize to the canonical record blob: bincode, base64-armored.
    pub fn to_blob(&self) -> Result<String> {
        let bytes = bincode::serialize(self)
            .map_err(|e| KeyVaultError::CorruptRecord(format!("record encoding failed: {}", e)))?;
        Ok(BASE64.encode(bytes))
    }

    /// Reconstruct a record from its blob. Every field round-trips exactly.
    pub fn from_blob(text: &str) -> Result<Self> {
        let bytes = BASE64
            .decode(text.trim())
            .map_err(|e| KeyVaultError::CorruptRecord(format!("blob base64 decode: {}", e)))?;
        bincode::deserialize(&bytes)
            .map_err(|e| KeyVaultError::CorruptRecord(format!("blob decode failed: {}", e)))
    }

    /// The public, render-safe view of this record.
    pub fn view(&self) -> KeyView {
        KeyView {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
            status: self.status,
            curve: self.curve.label(),
            fingerprint_md5: self.fingerprint_md5.clone(),
            fingerprint_sha256: self.fingerprint_sha256.clone(),
            public_key_preview: preview(&self.public_key_b64),
            private_key_preview: preview(&self.private_key_b64),
            created_at: self.created_at,
        }
    }
}

/// A record's identity and metadata without its raw key material.
///
/// Key text appears only as truncated previews; anything that needs the
/// real material goes through the capability-scoped operations instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyView {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub status: KeyStatus,
    pub curve: &'static str,
    pub fingerprint_md5: String,
    pub fingerprint_sha256: String,
    pub public_key_preview: String,
    pub private_key_preview: String,
    pub created_at: DateTime<Utc>,
}

fn preview(text: &str) -> String {
    if text.is_empty() {
        return "... ... ... ... ... ...".to_string();
    }
    let mut out: String = text.chars().take(47).collect();
    if text.len() > 47 {
        out.push_str("...");
    }
    out
}
