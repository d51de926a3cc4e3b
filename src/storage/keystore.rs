//! Flat-file key store.
//!
//! Each key occupies one directory under the store root, named by its
//! identifier, holding the raw DER artifacts, the PEM-armored private key,
//! and the canonical record blob:
//!
//! ```text
//! <root>/<id>/private.key   PKCS8 DER (absent for public-only keys)
//! <root>/<id>/public.key    SPKI DER
//! <root>/<id>/private.pem   PEM armor (absent for public-only keys)
//! <root>/<id>/record.bin    base64-armored bincode record blob
//! ```
//!
//! Creation writes every artifact into a dot-prefixed staging directory and
//! renames it into place, so a crash can never leave a partially visible
//! key: a directory either holds a complete record or is a staging leftover
//! that enumeration skips.

use crate::crypto::codec;
use crate::error::{KeyVaultError, Result};
use crate::storage::record::KeyRecord;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;
use uuid::Uuid;

const PRIVATE_KEY_FILE: &str = "private.key";
const PUBLIC_KEY_FILE: &str = "public.key";
const PRIVATE_PEM_FILE: &str = "private.pem";
const RECORD_FILE: &str = "record.bin";
const STAGING_PREFIX: &str = ".stage-";

/// Final locations of a key's derived artifacts.
pub struct ArtifactPaths {
    pub private_key: PathBuf,
    pub public_key: PathBuf,
    pub private_pem: PathBuf,
}

/// A store of key records rooted at a caller-configured directory.
///
/// The store owns the per-identifier locks; records themselves stay plain
/// data. Locks serialize writes for one identifier within this process and
/// have no cross-process reach.
pub struct KeyStore {
    root: PathBuf,
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl KeyStore {
    /// Open a store, creating the root directory if needed.
    pub fn open(root: &Path) -> Result<Self> {
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The storage directory for an identifier.
    pub fn key_dir(&self, id: &Uuid) -> PathBuf {
        self.root.join(id.to_string())
    }

    /// Final artifact locations for an identifier, for recording before the
    /// artifacts are written.
    pub fn artifact_paths(&self, id: &Uuid) -> ArtifactPaths {
        let dir = self.key_dir(id);
        ArtifactPaths {
            private_key: dir.join(PRIVATE_KEY_FILE),
            public_key: dir.join(PUBLIC_KEY_FILE),
            private_pem: dir.join(PRIVATE_PEM_FILE),
        }
    }

    /// Persist a record and its key artifacts.
    ///
    /// The private artifacts are written only when private DER is supplied.
    /// All writes land in a staging directory that is renamed to the final
    /// identifier directory as the last step.
    pub fn create(
        &self,
        record: &KeyRecord,
        private_der: Option<&[u8]>,
        public_der: &[u8],
    ) -> Result<()> {
        let lock = self.record_lock(record.id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let staging = self
            .root
            .join(format!("{}{}", STAGING_PREFIX, record.id));
        fs::create_dir_all(&staging)?;

        if let Err(err) = write_artifacts(&staging, record, private_der, public_der) {
            let _ = fs::remove_dir_all(&staging);
            return Err(err);
        }

        fs::rename(&staging, self.key_dir(&record.id))?;
        debug!(id = %record.id, "key record persisted");
        Ok(())
    }

    /// Fetch a record by identifier.
    pub fn get(&self, id: &Uuid) -> Result<KeyRecord> {
        let dir = self.key_dir(id);
        if !dir.is_dir() {
            return Err(KeyVaultError::NotFound(id.to_string()));
        }

        let blob = fs::read_to_string(dir.join(RECORD_FILE)).map_err(|e| {
            KeyVaultError::CorruptRecord(format!("record blob for {} unreadable: {}", id, e))
        })?;

        KeyRecord::from_blob(&blob)
    }

    /// Enumerate every stored record, oldest first.
    ///
    /// Staging leftovers are skipped; any other entry that is not a
    /// readable record fails the whole listing.
    pub fn list(&self) -> Result<Vec<KeyRecord>> {
        let mut records = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            let id = Uuid::parse_str(&name).map_err(|_| {
                KeyVaultError::CorruptRecord(format!("unexpected entry in store root: {}", name))
            })?;
            records.push(self.get(&id)?);
        }

        records.sort_by_key(|record| record.created_at);
        Ok(records)
    }

    /// The interchange path for a detached signature made with a key,
    /// embedding the identifier and a creation timestamp.
    pub fn signature_path(&self, id: &Uuid, timestamp: i64) -> PathBuf {
        self.key_dir(id)
            .join(format!("signature-{}.der", timestamp))
    }

    /// Write a DER signature next to its key and return the path.
    pub fn write_signature(&self, id: &Uuid, timestamp: i64, der: &[u8]) -> Result<PathBuf> {
        let lock = self.record_lock(*id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        if !self.key_dir(id).is_dir() {
            return Err(KeyVaultError::NotFound(id.to_string()));
        }

        let path = self.signature_path(id, timestamp);
        fs::write(&path, der)?;
        debug!(id = %id, path = %path.display(), "signature written");
        Ok(path)
    }

    fn record_lock(&self, id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.entry(id).or_default().clone()
    }
}

fn write_artifacts(
    dir: &Path,
    record: &KeyRecord,
    private_der: Option<&[u8]>,
    public_der: &[u8],
) -> Result<()> {
    if let Some(der) = private_der {
        fs::write(dir.join(PRIVATE_KEY_FILE), der)?;

        let pem = codec::encode_private_pem(der)?;
        fs::write(dir.join(PRIVATE_PEM_FILE), pem.as_bytes())?;
    }

    fs::write(dir.join(PUBLIC_KEY_FILE), public_der)?;

    // The record blob is the canonical artifact, written last
    fs::write(dir.join(RECORD_FILE), record.to_blob()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Curve;
    use crate::storage::record::KeyStatus;
    use chrono::Utc;
    use tempfile::TempDir;

    fn dummy_record(store: &KeyStore, name: &str) -> KeyRecord {
        let id = Uuid::new_v4();
        let paths = store.artifact_paths(&id);
        KeyRecord {
            id,
            name: name.to_string(),
            slug: "amber-ridge-7305".to_string(),
            status: KeyStatus::Active,
            curve: Curve::Prime256v1,
            fingerprint_md5: "0".repeat(32),
            fingerprint_sha256: "0".repeat(64),
            public_key_b64: "cHVi".to_string(),
            private_key_b64: "cHJp".to_string(),
            private_key_path: paths.private_key,
            public_key_path: paths.public_key,
            private_pem_path: paths.private_pem,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_open_creates_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("nested").join("keys");

        KeyStore::open(&root).unwrap();
        assert!(root.is_dir());
    }

    #[test]
    fn test_create_then_get_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = KeyStore::open(temp_dir.path()).unwrap();
        let record = dummy_record(&store, "round-trip");

        store
            .create(&record, Some(b"private der"), b"public der")
            .unwrap();

        let loaded = store.get(&record.id).unwrap();
        assert_eq!(loaded, record);
    }

    #[test]
    fn test_create_writes_all_artifacts() {
        let temp_dir = TempDir::new().unwrap();
        let store = KeyStore::open(temp_dir.path()).unwrap();
        let record = dummy_record(&store, "artifacts");

        store
            .create(&record, Some(b"private der"), b"public der")
            .unwrap();

        let dir = store.key_dir(&record.id);
        assert_eq!(fs::read(dir.join("private.key")).unwrap(), b"private der");
        assert_eq!(fs::read(dir.join("public.key")).unwrap(), b"public der");
        assert!(fs::read_to_string(dir.join("private.pem"))
            .unwrap()
            .contains("EC PRIVATE KEY"));
        assert!(dir.join("record.bin").is_file());
    }

    #[test]
    fn test_create_public_only_skips_private_artifacts() {
        let temp_dir = TempDir::new().unwrap();
        let store = KeyStore::open(temp_dir.path()).unwrap();
        let mut record = dummy_record(&store, "public-only");
        record.private_key_b64 = String::new();

        store.create(&record, None, b"public der").unwrap();

        let dir = store.key_dir(&record.id);
        assert!(!dir.join("private.key").exists());
        assert!(!dir.join("private.pem").exists());
        assert!(dir.join("public.key").is_file());
        assert!(dir.join("record.bin").is_file());
    }

    #[test]
    fn test_create_leaves_no_staging_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = KeyStore::open(temp_dir.path()).unwrap();
        let record = dummy_record(&store, "staged");

        store.create(&record, None, b"public der").unwrap();

        let leftovers: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with('.'))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_get_missing_id_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = KeyStore::open(temp_dir.path()).unwrap();

        let result = store.get(&Uuid::new_v4());
        assert!(matches!(result, Err(KeyVaultError::NotFound(_))));
    }

    #[test]
    fn test_get_corrupt_blob() {
        let temp_dir = TempDir::new().unwrap();
        let store = KeyStore::open(temp_dir.path()).unwrap();
        let record = dummy_record(&store, "corrupt");

        store.create(&record, None, b"public der").unwrap();
        fs::write(store.key_dir(&record.id).join("record.bin"), "garbage!").unwrap();

        let result = store.get(&record.id);
        assert!(matches!(result, Err(KeyVaultError::CorruptRecord(_))));
    }

    #[test]
    fn test_get_missing_blob_is_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let store = KeyStore::open(temp_dir.path()).unwrap();
        let record = dummy_record(&store, "blobless");

        store.create(&record, None, b"public der").unwrap();
        fs::remove_file(store.key_dir(&record.id).join("record.bin")).unwrap();

        let result = store.get(&record.id);
        assert!(matches!(result, Err(KeyVaultError::CorruptRecord(_))));
    }

    #[test]
    fn test_list_returns_every_record() {
        let temp_dir = TempDir::new().unwrap();
        let store = KeyStore::open(temp_dir.path()).unwrap();

        let mut ids = Vec::new();
        for name in ["a", "b", "c"] {
            let record = dummy_record(&store, name);
            store.create(&record, None, b"public der").unwrap();
            ids.push(record.id);
        }

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 3);
        for id in ids {
            assert!(listed.iter().any(|r| r.id == id));
            assert!(store.get(&id).is_ok());
        }
    }

    #[test]
    fn test_list_is_oldest_first() {
        let temp_dir = TempDir::new().unwrap();
        let store = KeyStore::open(temp_dir.path()).unwrap();

        for name in ["first", "second", "third"] {
            let record = dummy_record(&store, name);
            store.create(&record, None, b"public der").unwrap();
        }

        let listed = store.list().unwrap();
        let names: Vec<_> = listed.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn test_list_skips_staging_leftovers() {
        let temp_dir = TempDir::new().unwrap();
        let store = KeyStore::open(temp_dir.path()).unwrap();

        let record = dummy_record(&store, "real");
        store.create(&record, None, b"public der").unwrap();

        // Simulate a crash that left a staging directory behind
        fs::create_dir(temp_dir.path().join(".stage-leftover")).unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[test]
    fn test_list_fails_fast_on_foreign_entry() {
        let temp_dir = TempDir::new().unwrap();
        let store = KeyStore::open(temp_dir.path()).unwrap();

        fs::create_dir(temp_dir.path().join("not-a-uuid")).unwrap();

        let result = store.list();
        assert!(matches!(result, Err(KeyVaultError::CorruptRecord(_))));
    }

    #[test]
    fn test_list_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = KeyStore::open(temp_dir.path()).unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_write_signature() {
        let temp_dir = TempDir::new().unwrap();
        let store = KeyStore::open(temp_dir.path()).unwrap();
        let record = dummy_record(&store, "signer");
        store.create(&record, Some(b"private"), b"public").unwrap();

        let path = store
            .write_signature(&record.id, 1_700_000_000, b"\x30\x06\x02\x01\x01\x02\x01\x02")
            .unwrap();

        assert!(path.ends_with("signature-1700000000.der"));
        assert!(path.starts_with(store.key_dir(&record.id)));
        assert!(path.is_file());
    }

    #[test]
    fn test_write_signature_for_missing_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = KeyStore::open(temp_dir.path()).unwrap();

        let result = store.write_signature(&Uuid::new_v4(), 0, b"sig");
        assert!(matches!(result, Err(KeyVaultError::NotFound(_))));
    }

    #[test]
    fn test_concurrent_creates_with_distinct_ids() {
        let temp_dir = TempDir::new().unwrap();
        let store = std::sync::Arc::new(KeyStore::open(temp_dir.path()).unwrap());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = store.clone();
                let record = dummy_record(&store, &format!("worker-{}", i));
                std::thread::spawn(move || store.create(&record, None, b"public der"))
            })
            .collect();

        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        assert_eq!(store.list().unwrap().len(), 4);
    }
}
