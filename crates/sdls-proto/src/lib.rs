//! Wire-format codec for CCSDS TC Transfer Frames.
//!
//! This crate packs and unpacks the bit-packed TC primary header and the
//! optional segment header, computes and verifies the FECF (CRC-16/CCITT-FALSE
//! trailer), and provides helpers for reading and writing the variable-length
//! security header/trailer fields whose lengths are determined by the owning
//! Security Association rather than by this crate.
//!
//! # Layout
//!
//! ```text
//! [primary header: 5B] [segment header: 0/1B] [security header: variable]
//!   [payload: variable] [MAC: variable] [FECF: 0/2B]
//! ```
//!
//! Field lengths for the security header/trailer are not known to this crate;
//! they come from the Security Association that owns the frame. This crate
//! only knows how to pack/unpack given explicit lengths.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod crc;
mod errors;
mod frame;
mod primary_header;
mod security;
mod segment_header;

pub use crc::{CRC16_CCITT_FALSE_TABLE, crc16_ccitt_false};
pub use errors::ProtocolError;
pub use frame::ParsedLeader;
pub use primary_header::PrimaryHeader;
pub use security::{SecurityHeaderFields, read_mac, read_security_header, write_security_header};
pub use segment_header::SegmentHeader;
