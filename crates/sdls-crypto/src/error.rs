//! Error type for the cryptographic engine.

use thiserror::Error;

/// Errors raised by the AES-256-GCM engine.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoEngineError {
    /// Authentication tag did not match during `open` or `verify_mac`.
    #[error("authentication tag mismatch")]
    MacMismatch,

    /// IV length is not supported. This engine implements AES-GCM with the
    /// 96-bit (12-octet) nonce size used throughout the SDLS TC profile;
    /// other `shivf_len` values are a caller configuration error, not an
    /// engine fault.
    #[error("unsupported IV length: expected 12 bytes, got {actual}")]
    InvalidIvLength {
        /// Length actually supplied.
        actual: usize,
    },

    /// Key length is not 32 bytes (AES-256).
    #[error("unsupported key length: expected 32 bytes, got {actual}")]
    InvalidKeyLength {
        /// Length actually supplied.
        actual: usize,
    },
}

impl CryptoEngineError {
    /// Whether this error reflects an authentication failure on validly
    /// shaped input, as opposed to a caller misconfiguration (bad key or IV
    /// length). Callers use this to decide whether `MAC_VALIDATION_ERROR` or
    /// a configuration-class status is the right status code to surface.
    #[must_use]
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::MacMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mac_mismatch_is_authentication_failure() {
        assert!(CryptoEngineError::MacMismatch.is_authentication_failure());
    }

    #[test]
    fn length_errors_are_not_authentication_failures() {
        assert!(!CryptoEngineError::InvalidIvLength { actual: 8 }.is_authentication_failure());
        assert!(!CryptoEngineError::InvalidKeyLength { actual: 16 }.is_authentication_failure());
    }
}
