//! SDLS gateway: the `ApplySecurity`/`ProcessSecurity` pipelines for CCSDS TC
//! Transfer Frames.
//!
//! This crate wires the wire codec (`sdls-proto`), the Security Association
//! model and stateful stores (`sdls-core`), and the AES-256-GCM engine
//! (`sdls-crypto`) into the two pipelines a gateway actually calls:
//!
//! - [`apply_security`]: plaintext TC frame in, protected frame out —
//!   applies the frame's Security Association's encryption/authentication
//!   service and advances its IV/ARC.
//! - [`process_security`]: protected TC frame in, plaintext payload out —
//!   verifies the FECF, looks up the SA by SPI, checks the anti-replay
//!   window, and authenticates/decrypts.
//!
//! # Components
//!
//! - [`Context`]: owns a [`CryptoConfig`], an SA repository, a key ring, and
//!   an optional Extended-Procedure dispatcher; the type most embedders call
//!   `apply_security`/`process_security` on directly.
//! - [`CryptoConfig`]/[`CryptoConfigBuilder`]: library behavior flags and the
//!   managed parameters registry, assembled once at startup.
//! - [`SdlsDispatcher`]/[`SdlsPdu`]: the seam `process_security` hands
//!   SDLS PDUs through when `process_sdls_pdus` is configured (see
//!   [`dispatcher`]).
//! - [`SdlsError`]: the single error taxonomy both pipelines return.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod apply;
mod config;
mod context;
pub mod dispatcher;
mod error;
mod process;
mod service;

pub use apply::apply_security;
pub use config::{CryptoConfig, CryptoConfigBuilder};
pub use context::Context;
pub use dispatcher::{SdlsDispatcher, SdlsPdu};
pub use error::SdlsError;
pub use process::{ProcessedFrame, process_security};
pub use service::{CryptoBranch, crypto_branch};
