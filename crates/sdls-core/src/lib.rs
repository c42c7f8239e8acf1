//! Managed parameters, the Security Association model, the key ring, and
//! the anti-replay window for the TC security core.
//!
//! This crate has no notion of wire bytes (see `sdls-proto`) or AEAD
//! mechanics (see `sdls-crypto`); it owns the stateful pieces the pipelines
//! in `sdls-gateway` look up and mutate: which GVCIDs exist, which SA serves
//! a GVCID/SPI, which keys are usable, and whether a candidate IV/ARC falls
//! inside the replay window.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod key_ring;
pub mod managed_params;
pub mod replay;
pub mod sa;
pub mod sa_repository;

pub use error::{
    AntiReplayError, IncrementOverflow, KeyRingError, ManagedParametersError, SaRepositoryError,
};
pub use key_ring::{KeyRing, KeyState};
pub use managed_params::{Gvcid, ManagedParameters, ManagedParametersRegistry};
pub use replay::{check_window, increment_be};
pub use sa::{AuthCipherSuite, EncryptionCipherSuite, SaState, SecurityAssociation, ServiceType};
pub use sa_repository::{InMemorySaRepository, SaRepository};
