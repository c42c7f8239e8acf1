//! AES-256-GCM encryption, decryption, and authentication-only operations.
//!
//! All functions are pure: given the same key, IV, AAD, and data they always
//! produce the same output. Tag generation is deterministic in GCM (no
//! caller-supplied randomness is needed, unlike the ratchet-based schemes
//! this engine's sibling crates use).

use aes_gcm::{
    Aes256Gcm, Key, Nonce, Tag,
    aead::{AeadInPlace, KeyInit},
};

use crate::error::CryptoEngineError;

/// Authentication tag size for AES-GCM, in octets.
pub const TAG_SIZE: usize = 16;

/// Nonce (IV) size this engine supports, in octets.
pub const IV_SIZE: usize = 12;

fn build_cipher(key: &[u8]) -> Result<Aes256Gcm, CryptoEngineError> {
    if key.len() != 32 {
        return Err(CryptoEngineError::InvalidKeyLength { actual: key.len() });
    }
    Ok(Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)))
}

fn build_nonce(iv: &[u8]) -> Result<&Nonce, CryptoEngineError> {
    if iv.len() != IV_SIZE {
        return Err(CryptoEngineError::InvalidIvLength { actual: iv.len() });
    }
    Ok(Nonce::from_slice(iv))
}

/// Encrypt `plaintext` in place, returning the detached 16-byte
/// authentication tag. Ciphertext length equals plaintext length.
///
/// # Errors
///
/// Returns [`CryptoEngineError::InvalidKeyLength`] or
/// [`CryptoEngineError::InvalidIvLength`] if `key` or `iv` are not shaped for
/// AES-256-GCM with a 96-bit nonce.
pub fn seal(
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    plaintext_in_place: &mut [u8],
) -> Result<[u8; TAG_SIZE], CryptoEngineError> {
    let cipher = build_cipher(key)?;
    let nonce = build_nonce(iv)?;

    let tag = cipher
        .encrypt_in_place_detached(nonce, aad, plaintext_in_place)
        .unwrap_or_else(|_| unreachable!("AES-256-GCM encryption cannot fail with valid inputs"));

    Ok(tag.into())
}

/// Decrypt `ciphertext` in place against the detached `tag`, leaving
/// plaintext behind on success.
///
/// # Errors
///
/// Returns [`CryptoEngineError::MacMismatch`] if the tag does not
/// authenticate, or a length error if `key`/`iv` are malformed.
pub fn open(
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    ciphertext_in_place: &mut [u8],
    tag: &[u8; TAG_SIZE],
) -> Result<(), CryptoEngineError> {
    let cipher = build_cipher(key)?;
    let nonce = build_nonce(iv)?;
    let tag = Tag::from_slice(tag);

    cipher
        .decrypt_in_place_detached(nonce, aad, ciphertext_in_place, tag)
        .map_err(|_| CryptoEngineError::MacMismatch)
}

/// Produce an authentication-only tag over `aad` with zero-length plaintext.
/// Used when `est=0, ast=1`: the frame is authenticated but not encrypted.
///
/// # Errors
///
/// Returns a length error if `key`/`iv` are malformed; authentication-only
/// mode cannot otherwise fail.
pub fn mac_only(key: &[u8], iv: &[u8], aad: &[u8]) -> Result<[u8; TAG_SIZE], CryptoEngineError> {
    seal(key, iv, aad, &mut [])
}

/// Verify an authentication-only tag produced by [`mac_only`].
///
/// # Errors
///
/// Returns [`CryptoEngineError::MacMismatch`] if the tag does not
/// authenticate.
pub fn verify_mac(
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    tag: &[u8; TAG_SIZE],
) -> Result<(), CryptoEngineError> {
    open(key, iv, aad, &mut [], tag)
}
