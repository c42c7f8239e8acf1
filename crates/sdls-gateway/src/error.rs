//! The gateway's single error taxonomy.
//!
//! Every status code in the source's `Crypto_Status_Codes_t` becomes one
//! variant here (`SUCCESS` is simply `Ok`). This is the type both
//! `apply_security` and `process_security` return in their `Err` arm; callers
//! never see the leaf component error types (`ProtocolError`,
//! `SaRepositoryError`, ...) directly — each is folded in at the point the
//! pipeline encounters it, the same way layer-specific errors elsewhere in
//! this codebase (`ProtocolError`, `SaRepositoryError`, `KeyRingError`) each
//! cover one layer's failures without leaking into the layer above.

use sdls_core::{KeyRingError, ManagedParametersError, SaRepositoryError};
use sdls_proto::ProtocolError;
use thiserror::Error;

/// Status codes the gateway pipelines return.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SdlsError {
    /// No `CryptoConfig` was supplied when building the `Context`.
    ///
    /// Unreachable through the typed `Context` builder in this crate (a
    /// `Context` cannot be constructed without a config) but kept as a
    /// status so the full source taxonomy is represented.
    #[error("no configuration present")]
    NoConfig,

    /// No SA repository is attached to the `Context`.
    ///
    /// Unreachable through the typed builder for the same reason as
    /// `NoConfig`.
    #[error("no SA repository attached")]
    NoInit,

    /// The input frame buffer was empty.
    #[error("null or empty frame buffer")]
    NullBuffer,

    /// The frame's wire structure could not be parsed.
    #[error("frame structure error: {0}")]
    Protocol(#[from] ProtocolError),

    /// No managed parameters are registered for this frame's GVCID.
    #[error("managed parameters not found for tfvn={tfvn} scid={scid} vcid={vcid}")]
    ManagedParametersForGvcidNotFound {
        /// Transfer Frame Version Number.
        tfvn: u8,
        /// Spacecraft Identifier.
        scid: u16,
        /// Virtual Channel Identifier (already masked).
        vcid: u8,
    },

    /// `ApplySecurity` was called on a control-command frame (`cc=1`).
    /// Control frames bypass security processing entirely.
    #[error("control-command frames may not be passed through security processing")]
    InvalidCcFlag,

    /// The frame's FECF did not match the recomputed CRC-16/CCITT-FALSE.
    #[error("FECF mismatch")]
    InvalidFecf,

    /// The SA's authentication bit mask is shorter than the AAD this frame
    /// requires.
    #[error("authentication bit mask ({abm_len} octets) is shorter than the required AAD length ({aad_len})")]
    AbmTooShortForAad {
        /// Length of the SA's `abm`, in octets.
        abm_len: usize,
        /// AAD length this frame's service type requires.
        aad_len: usize,
    },

    /// No SA (by SPI, or OPERATIONAL for the GVCID/MAP-ID) matched.
    #[error("SA lookup failed: {0}")]
    SaNotFound(#[from] SaRepositoryError),

    /// `process_security` found an SA by SPI but it is not OPERATIONAL, and
    /// the gateway is not configured with `ignore_sa_state`.
    #[error("SA {spi:#06x} is not operational (state: {state:?})")]
    SaNotOperational {
        /// The SA's Security Parameter Index.
        spi: u16,
        /// The SA's current lifecycle state.
        state: sdls_core::SaState,
    },

    /// The candidate IV/ARC fell outside the SA's anti-replay window.
    #[error("candidate IV/ARC is outside the anti-replay window")]
    BadAntiReplayWindow,

    /// Authentication-only tag generation failed (caller misconfiguration —
    /// see `CryptoEngineError`'s length-error variants).
    #[error("authentication tag generation failed")]
    AuthenticationError,

    /// The security trailer did not hold enough octets to read the MAC
    /// field the SA declares.
    #[error("unable to retrieve MAC from frame trailer: {0}")]
    MacRetrievalError(ProtocolError),

    /// The authentication tag did not validate.
    #[error("MAC validation failed")]
    MacValidationError,

    /// AEAD decryption failed for a reason other than tag mismatch.
    #[error("decryption failed")]
    DecryptError,

    /// The underlying cryptographic engine rejected its inputs (e.g. a key
    /// or IV of the wrong length for the SA's declared field lengths).
    /// Named `CryptoEngineError` rather than the source's `LIBGCRYPT_ERROR`
    /// since this crate wraps a Rust AEAD crate, not libgcrypt.
    #[error("cryptographic engine fault: {0}")]
    CryptoEngineError(sdls_crypto::CryptoEngineError),

    /// The SA references a key-ring entry that is missing or not active.
    #[error("key ring lookup failed: {0}")]
    KeyNotUsable(#[from] KeyRingError),

    /// The SA's IV overflowed (wrapped from all-ones) during the mandatory
    /// post-`ApplySecurity` increment. See DESIGN.md for why this rewrite
    /// treats overflow as fatal rather than silently wrapping.
    #[error("SA IV exhausted: increment overflowed, SA must be rekeyed out of band")]
    IvExhausted,

    /// Catch-all for conditions the source reports as a bare `CRYPTO_LIB_ERR`
    /// with no more specific status.
    #[error("{0}")]
    Err(String),
}

impl From<ManagedParametersError> for SdlsError {
    fn from(err: ManagedParametersError) -> Self {
        match err {
            ManagedParametersError::NotFound { tfvn, scid, vcid } => {
                Self::ManagedParametersForGvcidNotFound { tfvn, scid, vcid }
            },
        }
    }
}
