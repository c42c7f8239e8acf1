//! Error types for the TC security core's leaf components.
//!
//! Each component owns a narrow error type covering only its own failure
//! modes; the gateway pipelines (`sdls-gateway`) fold these into the single
//! `SdlsError` taxonomy callers see.

use thiserror::Error;

/// Managed-parameters registry lookup failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagedParametersError {
    /// No managed parameters configured for this `(tfvn, scid, vcid)`.
    #[error("managed parameters not found for tfvn={tfvn} scid={scid} vcid={vcid}")]
    NotFound {
        /// Transfer Frame Version Number.
        tfvn: u8,
        /// Spacecraft Identifier.
        scid: u16,
        /// Virtual Channel Identifier (already masked).
        vcid: u8,
    },
}

/// Security Association repository failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaRepositoryError {
    /// No SA is bound to the requested SPI.
    #[error("no SA bound to SPI {spi:#06x}")]
    SpiNotFound {
        /// The requested Security Parameter Index.
        spi: u16,
    },

    /// No OPERATIONAL SA is bound to the requested GVCID/MAP-ID.
    #[error(
        "no operational SA for tfvn={tfvn} scid={scid} vcid={vcid} map_id={map_id}"
    )]
    OperationalNotFound {
        /// Transfer Frame Version Number.
        tfvn: u8,
        /// Spacecraft Identifier.
        scid: u16,
        /// Virtual Channel Identifier.
        vcid: u8,
        /// MAP-ID.
        map_id: u8,
    },
}

/// Key ring lookup failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRingError {
    /// `key_id` does not name any entry in the ring.
    #[error("key id {key_id} out of range")]
    NotFound {
        /// The requested key id.
        key_id: u16,
    },

    /// The key exists but is not in the `Active` state required for use.
    #[error("key id {key_id} is not active (state: {state:?})")]
    NotActive {
        /// The requested key id.
        key_id: u16,
        /// The key's current lifecycle state.
        state: crate::key_ring::KeyState,
    },
}

/// Anti-replay window rejection.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("candidate is outside the anti-replay window")]
pub struct AntiReplayError;

/// Overflow signal from the big-endian counter increment helper.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("counter overflowed on increment (wrapped from all-ones to zero)")]
pub struct IncrementOverflow;
