//! The key repository: create, fetch, and enumerate records.
//!
//! Composes the curve registry, key generation, codec, fingerprinting, and
//! the store into the two creation paths (generated and imported) plus thin
//! lookup delegations.

use crate::crypto::{codec, fingerprint, keys};
use crate::curve::Curve;
use crate::error::{KeyVaultError, Result};
use crate::slug;
use crate::storage::keystore::KeyStore;
use crate::storage::record::{KeyRecord, KeyStatus};
use chrono::Utc;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// Repository over a single store root.
pub struct KeyRepository {
    store: KeyStore,
}

impl KeyRepository {
    /// Open a repository rooted at the given directory.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use keyvault::repository::KeyRepository;
    /// use std::path::Path;
    ///
    /// # fn example() -> keyvault::Result<()> {
    /// let repo = KeyRepository::open(Path::new("keys"))?;
    /// let record = repo.create_generated("api-key", "prime256v1")?;
    /// assert_eq!(record.curve.label(), "prime256v1");
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(root: &Path) -> Result<Self> {
        Ok(Self {
            store: KeyStore::open(root)?,
        })
    }

    /// The underlying store, for artifact paths and signature files.
    pub fn store(&self) -> &KeyStore {
        &self.store
    }

    /// Generate a fresh key pair and persist its record.
    ///
    /// Fails with `EmptyName` or `UnsupportedCurve` before touching the
    /// file system.
    pub fn create_generated(&self, name: &str, curve_name: &str) -> Result<KeyRecord> {
        let name = validated_name(name)?;
        let curve = Curve::resolve(curve_name)?;

        let pair = keys::generate_keypair(curve)?;
        let record = self.assemble(name, curve, Some(pair.private_der.as_slice()), &pair.public_der)?;
        self.store
            .create(&record, Some(pair.private_der.as_slice()), &pair.public_der)?;

        info!(id = %record.id, curve = %curve, "generated key pair");
        Ok(record)
    }

    /// Import a PEM public key and persist a public-only record.
    ///
    /// The resulting record carries no private material and refuses to
    /// sign. Persistence failures propagate like every other path.
    pub fn create_imported(
        &self,
        name: &str,
        curve_name: &str,
        public_pem: &[u8],
    ) -> Result<KeyRecord> {
        let name = validated_name(name)?;
        let curve = Curve::resolve(curve_name)?;

        let pem = std::str::from_utf8(public_pem)
            .map_err(|e| KeyVaultError::MalformedKey(format!("public key is not UTF-8: {}", e)))?;
        let spki_der = keys::import_public_pem(curve, pem)?;

        let record = self.assemble(name, curve, None, &spki_der)?;
        self.store.create(&record, None, &spki_der)?;

        info!(id = %record.id, curve = %curve, "imported public key");
        Ok(record)
    }

    /// Fetch a record by its identifier string.
    pub fn get_by_id(&self, id: &str) -> Result<KeyRecord> {
        let id = Uuid::parse_str(id).map_err(|_| KeyVaultError::NotFound(id.to_string()))?;
        self.store.get(&id)
    }

    /// Fetch a record by identifier.
    pub fn get(&self, id: &Uuid) -> Result<KeyRecord> {
        self.store.get(id)
    }

    /// Enumerate every stored record.
    pub fn list(&self) -> Result<Vec<KeyRecord>> {
        self.store.list()
    }

    fn assemble(
        &self,
        name: String,
        curve: Curve,
        private_der: Option<&[u8]>,
        public_der: &[u8],
    ) -> Result<KeyRecord> {
        let (private_pem, public_pem) = codec::encode_pair(private_der, public_der)?;
        let id = Uuid::new_v4();
        let paths = self.store.artifact_paths(&id);

        Ok(KeyRecord {
            id,
            name,
            slug: slug::haikunate(),
            status: KeyStatus::Active,
            curve,
            fingerprint_md5: fingerprint::md5(public_der),
            fingerprint_sha256: fingerprint::sha256(public_der),
            public_key_b64: codec::wrap_base64(&public_pem),
            private_key_b64: private_pem
                .map(|pem| codec::wrap_base64(&pem))
                .unwrap_or_default(),
            private_key_path: paths.private_key,
            public_key_path: paths.public_key,
            private_pem_path: paths.private_pem,
            created_at: Utc::now(),
        })
    }
}

fn validated_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(KeyVaultError::EmptyName);
    }
    Ok(trimmed.to_string())
}
