//! AES-256-GCM cryptographic engine for the TC security core.
//!
//! Pure functions operating on caller-supplied key, IV, and AAD material.
//! There is no key management here — key lifecycle (`PREACTIVE` /`ACTIVE`
//! /`DEACTIVATED` /`DESTROYED`) and lookup by key-id live in `sdls-core`'s key
//! ring; this crate only ever sees raw bytes the caller has already deemed
//! usable.
//!
//! # Security
//!
//! - Deterministic: identical `(key, iv, aad, data)` always produces the same
//!   ciphertext/tag. IV reuse under the same key is the caller's
//!   responsibility to avoid (the anti-replay window and the mandatory IV
//!   increment after every successful `ApplySecurity` are what prevent it in
//!   practice).
//! - Detached tags: `seal`/`open` operate on ciphertext and tag separately so
//!   callers can place the tag in the security trailer slot without an extra
//!   copy.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod aead;
mod error;

pub use aead::{IV_SIZE, TAG_SIZE, mac_only, open, seal, verify_mac};
pub use error::CryptoEngineError;
