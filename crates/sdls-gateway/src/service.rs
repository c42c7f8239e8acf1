//! Maps an SA's `(ServiceType, EncryptionCipherSuite)` pair onto one of the
//! three cryptographic code paths the pipelines implement.
//!
//! The source branches on `sa_service_type` with a `switch` that, for
//! `CRYPTO_LIB_RESERVED`/`CRYPTO_LIB_ENCRYPTION` combined with a non-AEAD
//! `ecs`, falls through into plaintext with neither a warning nor a MAC —
//! a path this crate does not reproduce (see DESIGN.md). Instead, any
//! service type that needs authentication but the cipher suite cannot
//! provide it as part of encryption runs the same MAC-only code path as
//! pure `Authentication`.

use sdls_core::{EncryptionCipherSuite, ServiceType};

/// The cryptographic code path a frame's service type and cipher suite
/// select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoBranch {
    /// No cryptographic transform; the frame passes through unchanged past
    /// the security header fields.
    Plaintext,
    /// AEAD seal/open over the payload, producing or consuming a detached
    /// tag, with the AAD drawn from the SA's bit mask.
    Aead,
    /// No plaintext transform; a detached tag is computed or verified over
    /// AAD built from the SA's bit mask (covering the payload too, since
    /// there is no ciphertext to carry that coverage).
    AuthOnly,
}

/// Select the code path for a `(ServiceType, EncryptionCipherSuite)` pair.
///
/// `Encryption` and `AuthenticatedEncryption` use [`CryptoBranch::Aead`] only
/// when `ecs` is itself AEAD (today, only `Aes256Gcm`); otherwise they fall
/// back to [`CryptoBranch::AuthOnly`], since this crate implements no
/// non-AEAD cipher and a request for authentication coverage must not be
/// silently dropped.
#[must_use]
pub fn crypto_branch(service_type: ServiceType, ecs: EncryptionCipherSuite) -> CryptoBranch {
    match service_type {
        ServiceType::Plaintext => CryptoBranch::Plaintext,
        ServiceType::Authentication => CryptoBranch::AuthOnly,
        ServiceType::Encryption | ServiceType::AuthenticatedEncryption => {
            if ecs.is_aead() {
                CryptoBranch::Aead
            } else {
                CryptoBranch::AuthOnly
            }
        },
    }
}
