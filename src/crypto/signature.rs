//! ECDSA signing, verification, and DER signature interchange.
//!
//! A signature is a pair of unbounded unsigned integers `{r, s}` held as
//! minimal big-endian bytes, independent of any curve's scalar width. For
//! storage and transport it serializes to the standard ASN.1 DER sequence of
//! two INTEGERs.
//!
//! Signing digests the payload with the curve's paired SHA-2 (SHA-224 for
//! P-224 through SHA-512 for P-521) and draws nonces from the operating
//! system's secure random source. Verification reports a merely-invalid
//! signature as `Ok(false)`; only malformed inputs produce errors.

use crate::crypto::codec;
use crate::curve::Curve;
use crate::error::{KeyVaultError, Result};
use crate::storage::record::KeyRecord;
use der::asn1::UintRef;
use der::{Decode, Encode, Sequence};
use p256::ecdsa::signature::{RandomizedSigner, Verifier};
use pkcs8::{DecodePrivateKey, DecodePublicKey};
use rand::rngs::OsRng;

/// An ECDSA signature as the integer pair `{r, s}`.
///
/// Scalars are stored as minimal big-endian unsigned bytes, so the same
/// type carries signatures for every supported curve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    r: Vec<u8>,
    s: Vec<u8>,
}

/// ASN.1 `SEQUENCE { r INTEGER, s INTEGER }` interchange form.
#[derive(Sequence)]
struct SignatureSequence<'a> {
    r: UintRef<'a>,
    s: UintRef<'a>,
}

impl Signature {
    /// Build a signature from big-endian scalar bytes. Leading zero bytes
    /// are stripped so equal scalars compare equal.
    pub fn new(r: &[u8], s: &[u8]) -> Self {
        Self {
            r: trim_leading_zeros(r),
            s: trim_leading_zeros(s),
        }
    }

    /// The `r` scalar as minimal big-endian bytes.
    pub fn r(&self) -> &[u8] {
        &self.r
    }

    /// The `s` scalar as minimal big-endian bytes.
    pub fn s(&self) -> &[u8] {
        &self.s
    }

    /// Serialize to the DER two-integer sequence used for interchange.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        let sequence = SignatureSequence {
            r: UintRef::new(&self.r).map_err(der_err)?,
            s: UintRef::new(&self.s).map_err(der_err)?,
        };
        sequence.to_der().map_err(der_err)
    }

    /// Parse the DER two-integer sequence back into a signature.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let sequence = SignatureSequence::from_der(bytes).map_err(der_err)?;
        Ok(Signature::new(sequence.r.as_bytes(), sequence.s.as_bytes()))
    }
}

/// Sign a payload with a record's private key.
///
/// Fails with `MissingPrivateKey` when the record holds only public
/// material, and `MalformedKey` when the stored key text does not decode.
pub fn sign(record: &KeyRecord, payload: &[u8]) -> Result<Signature> {
    if !record.has_private_key() {
        return Err(KeyVaultError::MissingPrivateKey(record.id));
    }

    let der = codec::decode_private_b64(&record.private_key_b64)?;

    match record.curve {
        Curve::Secp224r1 => {
            let key = p224_signing_key(&der)?;
            let sig: p224::ecdsa::Signature =
                key.try_sign_with_rng(&mut OsRng, payload).map_err(sign_err)?;
            let (r, s) = sig.split_bytes();
            Ok(Signature::new(r.as_slice(), s.as_slice()))
        }
        Curve::Prime256v1 => {
            let key = p256_signing_key(&der)?;
            let sig: p256::ecdsa::Signature =
                key.try_sign_with_rng(&mut OsRng, payload).map_err(sign_err)?;
            let (r, s) = sig.split_bytes();
            Ok(Signature::new(r.as_slice(), s.as_slice()))
        }
        Curve::Secp384r1 => {
            let key = p384_signing_key(&der)?;
            let sig: p384::ecdsa::Signature =
                key.try_sign_with_rng(&mut OsRng, payload).map_err(sign_err)?;
            let (r, s) = sig.split_bytes();
            Ok(Signature::new(r.as_slice(), s.as_slice()))
        }
        Curve::Secp521r1 => {
            let key = p521_signing_key(&der)?;
            let sig: p521::ecdsa::Signature =
                key.try_sign_with_rng(&mut OsRng, payload).map_err(sign_err)?;
            let (r, s) = sig.split_bytes();
            Ok(Signature::new(r.as_slice(), s.as_slice()))
        }
    }
}

/// Verify a payload against a signature using a record's public key.
///
/// Returns `Ok(false)` for any signature that is simply invalid for this
/// key and payload, including scalars out of range for the record's curve.
pub fn verify(record: &KeyRecord, payload: &[u8], signature: &Signature) -> Result<bool> {
    let spki = codec::decode_public_b64(&record.public_key_b64)?;

    match record.curve {
        Curve::Secp224r1 => {
            let key =
                p224::ecdsa::VerifyingKey::from_public_key_der(&spki).map_err(public_err)?;
            let mut r = p224::FieldBytes::default();
            let mut s = p224::FieldBytes::default();
            if !left_pad(signature.r(), r.as_mut_slice())
                || !left_pad(signature.s(), s.as_mut_slice())
            {
                return Ok(false);
            }
            match p224::ecdsa::Signature::from_scalars(r, s) {
                Ok(sig) => Ok(key.verify(payload, &sig).is_ok()),
                Err(_) => Ok(false),
            }
        }
        Curve::Prime256v1 => {
            let key =
                p256::ecdsa::VerifyingKey::from_public_key_der(&spki).map_err(public_err)?;
            let mut r = p256::FieldBytes::default();
            let mut s = p256::FieldBytes::default();
            if !left_pad(signature.r(), r.as_mut_slice())
                || !left_pad(signature.s(), s.as_mut_slice())
            {
                return Ok(false);
            }
            match p256::ecdsa::Signature::from_scalars(r, s) {
                Ok(sig) => Ok(key.verify(payload, &sig).is_ok()),
                Err(_) => Ok(false),
            }
        }
        Curve::Secp384r1 => {
            let key =
                p384::ecdsa::VerifyingKey::from_public_key_der(&spki).map_err(public_err)?;
            let mut r = p384::FieldBytes::default();
            let mut s = p384::FieldBytes::default();
            if !left_pad(signature.r(), r.as_mut_slice())
                || !left_pad(signature.s(), s.as_mut_slice())
            {
                return Ok(false);
            }
            match p384::ecdsa::Signature::from_scalars(r, s) {
                Ok(sig) => Ok(key.verify(payload, &sig).is_ok()),
                Err(_) => Ok(false),
            }
        }
        Curve::Secp521r1 => {
            // p521 0.13's ECDSA VerifyingKey is a newtype wrapper that does not
            // implement pkcs8's DecodePublicKey; decode via PublicKey and convert.
            let public = p521::PublicKey::from_public_key_der(&spki).map_err(public_err)?;
            let key =
                p521::ecdsa::VerifyingKey::from_affine(*public.as_affine()).map_err(public_err)?;
            let mut r = p521::FieldBytes::default();
            let mut s = p521::FieldBytes::default();
            if !left_pad(signature.r(), r.as_mut_slice())
                || !left_pad(signature.s(), s.as_mut_slice())
            {
                return Ok(false);
            }
            match p521::ecdsa::Signature::from_scalars(r, s) {
                Ok(sig) => Ok(key.verify(payload, &sig).is_ok()),
                Err(_) => Ok(false),
            }
        }
    }
}

fn p224_signing_key(der: &[u8]) -> Result<p224::ecdsa::SigningKey> {
    if let Ok(key) = p224::ecdsa::SigningKey::from_pkcs8_der(der) {
        return Ok(key);
    }
    p224::SecretKey::from_sec1_der(der)
        .map(Into::into)
        .map_err(private_err)
}

fn p256_signing_key(der: &[u8]) -> Result<p256::ecdsa::SigningKey> {
    if let Ok(key) = p256::ecdsa::SigningKey::from_pkcs8_der(der) {
        return Ok(key);
    }
    p256::SecretKey::from_sec1_der(der)
        .map(Into::into)
        .map_err(private_err)
}

fn p384_signing_key(der: &[u8]) -> Result<p384::ecdsa::SigningKey> {
    if let Ok(key) = p384::ecdsa::SigningKey::from_pkcs8_der(der) {
        return Ok(key);
    }
    p384::SecretKey::from_sec1_der(der)
        .map(Into::into)
        .map_err(private_err)
}

fn p521_signing_key(der: &[u8]) -> Result<p521::ecdsa::SigningKey> {
    // p521 0.13's ECDSA SigningKey is a newtype wrapper that does not implement
    // pkcs8's DecodePrivateKey nor From<SecretKey>; decode via SecretKey and
    // rebuild the SigningKey from its scalar bytes.
    let secret = if let Ok(sk) = p521::SecretKey::from_pkcs8_der(der) {
        sk
    } else {
        p521::SecretKey::from_sec1_der(der).map_err(private_err)?
    };
    p521::ecdsa::SigningKey::from_slice(&secret.to_bytes()).map_err(private_err)
}

/// Copy `src` into the tail of `out`, zero-filling the front. False when
/// `src` does not fit, which can only mean a scalar from a wider curve.
fn left_pad(src: &[u8], out: &mut [u8]) -> bool {
    if src.len() > out.len() {
        return false;
    }
    let offset = out.len() - src.len();
    out[offset..].copy_from_slice(src);
    true
}

fn trim_leading_zeros(bytes: &[u8]) -> Vec<u8> {
    match bytes.iter().position(|&b| b != 0) {
        Some(start) => bytes[start..].to_vec(),
        None => vec![0],
    }
}

fn der_err<E: std::fmt::Display>(err: E) -> KeyVaultError {
    KeyVaultError::MalformedSignature(err.to_string())
}

fn sign_err<E: std::fmt::Display>(err: E) -> KeyVaultError {
    KeyVaultError::Crypto(format!("signing failed: {}", err))
}

fn private_err<E: std::fmt::Display>(err: E) -> KeyVaultError {
    KeyVaultError::MalformedKey(format!("not a PKCS#8 or SEC1 private key: {}", err))
}

fn public_err<E: std::fmt::Display>(err: E) -> KeyVaultError {
    KeyVaultError::MalformedKey(format!("public key decode failed: {}", err))
}
