//! Public key fingerprints.
//!
//! Fingerprints are computed over the canonical SPKI DER encoding of the
//! public key, never over PEM text, so line wrapping and whitespace cannot
//! change them. Two digests are derived: a 128-bit MD5 kept for legacy
//! interoperability and a 256-bit SHA-256 used as the primary identity
//! marker. Both are rendered as lowercase hex.

use md5::Md5;
use sha2::{Digest, Sha256};

/// Compute the legacy 128-bit MD5 fingerprint of a public key.
pub fn md5(spki_der: &[u8]) -> String {
    hex::encode(Md5::digest(spki_der))
}

/// Compute the 256-bit SHA-256 fingerprint of a public key.
pub fn sha256(spki_der: &[u8]) -> String {
    hex::encode(Sha256::digest(spki_der))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::generate_keypair;
    use crate::curve::Curve;

    #[test]
    fn test_fingerprints_are_deterministic() {
        let pair = generate_keypair(Curve::Prime256v1).unwrap();

        assert_eq!(md5(&pair.public_der), md5(&pair.public_der));
        assert_eq!(sha256(&pair.public_der), sha256(&pair.public_der));
    }

    #[test]
    fn test_fingerprint_lengths() {
        let pair = generate_keypair(Curve::Prime256v1).unwrap();

        // 128-bit and 256-bit digests in hex
        assert_eq!(md5(&pair.public_der).len(), 32);
        assert_eq!(sha256(&pair.public_der).len(), 64);
    }

    #[test]
    fn test_distinct_keys_have_distinct_fingerprints() {
        let a = generate_keypair(Curve::Prime256v1).unwrap();
        let b = generate_keypair(Curve::Prime256v1).unwrap();

        assert_ne!(md5(&a.public_der), md5(&b.public_der));
        assert_ne!(sha256(&a.public_der), sha256(&b.public_der));
    }

    #[test]
    fn test_known_digest() {
        // Fixed input pins the construction: hex(sha256(input))
        assert_eq!(
            sha256(b"testing"),
            "cf80cd8aed482d5d1527d7dc72fceff84e6326592848447d2dc0b0e87dfc9a90"
        );
        assert_eq!(md5(b"testing"), "ae2b1fca515949e5d54fb22b8ed95575");
    }
}
