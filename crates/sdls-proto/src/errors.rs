//! Error type for the wire-format codec.

use thiserror::Error;

/// Errors raised while packing or unpacking TC frame structure.
///
/// This covers structural/shape failures only: the codec has no notion of
/// Security Associations, managed parameters, or cryptography. Higher layers
/// translate these into the broader `SdlsError` taxonomy.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// Buffer shorter than the primary header (5 octets).
    #[error("frame too short: expected at least {expected} bytes, got {actual}")]
    FrameTooShort {
        /// Minimum length required.
        expected: usize,
        /// Actual buffer length.
        actual: usize,
    },

    /// The frame's declared length field (`fl + 1`) does not match the number
    /// of octets actually available.
    #[error("frame length mismatch: header declares {declared} bytes, buffer has {actual}")]
    FrameTruncated {
        /// Length declared by the primary header's `fl` field, plus one.
        declared: usize,
        /// Actual buffer length.
        actual: usize,
    },

    /// Not enough bytes remained to read a security header/trailer field of
    /// the requested length.
    #[error("security field too short: expected {expected} bytes, got {actual}")]
    SecurityFieldTooShort {
        /// Bytes required by the requested field length.
        expected: usize,
        /// Bytes actually available.
        actual: usize,
    },
}
