//! ProcessSecurity Pipeline (C8): protected TC frame in, plaintext payload
//! (plus frame identity) out.

use sdls_core::{KeyRing, SaRepository};
use sdls_proto::{PrimaryHeader, crc16_ccitt_false, read_mac, read_security_header};

use crate::{
    config::CryptoConfig,
    dispatcher::{SdlsDispatcher, SdlsPdu, is_extended_procedure_payload},
    error::SdlsError,
    service::{CryptoBranch, crypto_branch},
};

/// Result of a successful `process_security` call: the frame's identity and
/// its recovered plaintext payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFrame {
    /// Transfer Frame Version Number.
    pub tfvn: u8,
    /// Spacecraft Identifier.
    pub scid: u16,
    /// Virtual Channel Identifier (masked).
    pub vcid: u8,
    /// MAP-ID the frame was addressed to.
    pub map_id: u8,
    /// Security Parameter Index of the SA that served this frame.
    pub spi: u16,
    /// Recovered plaintext payload.
    pub payload: Vec<u8>,
}

/// Strip and validate security processing from a received TC frame,
/// recovering its plaintext payload.
///
/// Parses the primary header, looks up the frame's SA and key, checks the
/// candidate IV/ARC against the anti-replay window, then (per the SA's
/// service type) verifies and/or decrypts the security header, payload, and
/// trailer, returning the recovered plaintext. The numbered comments below
/// walk through each stage in order.
///
/// # Errors
///
/// Returns the matching [`SdlsError`] variant for the first failed step.
#[allow(clippy::too_many_lines)]
pub fn process_security<R: SaRepository>(
    frame: &[u8],
    config: &CryptoConfig,
    sa_repository: &R,
    key_ring: &KeyRing,
    dispatcher: Option<&dyn SdlsDispatcher>,
) -> Result<ProcessedFrame, SdlsError> {
    // Step 1: null buffer.
    if frame.is_empty() {
        return Err(SdlsError::NullBuffer);
    }

    // Step 2: parse primary header.
    let header = PrimaryHeader::parse(frame)?;

    // Step 3: control frames bypass security entirely.
    if header.cc {
        return Err(SdlsError::InvalidCcFlag);
    }

    // Step 4: managed parameters lookup.
    let vcid = header.vcid_masked(config.vcid_bitmask);
    let managed = config.managed_parameters.lookup(header.tfvn, header.scid, vcid)?;

    // Step 5: FECF verification, over everything but the trailing FECF.
    let declared_len = header.frame_length();
    if declared_len > frame.len() {
        return Err(SdlsError::Protocol(sdls_proto::ProtocolError::FrameTruncated {
            declared: declared_len,
            actual: frame.len(),
        }));
    }
    let frame = &frame[..declared_len];
    if managed.has_fecf && config.check_fecf {
        if frame.len() < 2 {
            return Err(SdlsError::InvalidFecf);
        }
        let (body, fecf) = frame.split_at(frame.len() - 2);
        let expected = crc16_ccitt_false(body);
        if expected.to_be_bytes() != fecf {
            return Err(SdlsError::InvalidFecf);
        }
    }

    // Step 6: leader (primary header + optional segment header).
    let leader = sdls_proto::ParsedLeader::parse(frame, managed.has_segment_hdr)?;
    let map_id = leader.map_id();

    // Step 7: peek the SPI (first two octets of the security header) to
    // find the SA before its field lengths are known.
    if leader.body.len() < 2 {
        return Err(SdlsError::Protocol(sdls_proto::ProtocolError::SecurityFieldTooShort {
            expected: 2,
            actual: leader.body.len(),
        }));
    }
    let spi = u16::from_be_bytes([leader.body[0], leader.body[1]]);
    let mut sa = sa_repository.get_sa_by_spi(spi)?;

    // Step 8: SA state check.
    if !config.ignore_sa_state && sa.sa_state != sdls_core::SaState::Operational {
        return Err(SdlsError::SaNotOperational { spi: sa.spi, state: sa.sa_state });
    }
    if config.unique_sa_per_map_id && sa.map_id != map_id {
        return Err(SdlsError::SaNotFound(sdls_core::SaRepositoryError::OperationalNotFound {
            tfvn: header.tfvn,
            scid: header.scid,
            vcid,
            map_id,
        }));
    }

    let service_type = sa.service_type();

    // Step 9: parse the remaining security header fields now that the SA's
    // field lengths are known.
    let (fields, rest) =
        read_security_header(leader.body, sa.shivf_len, sa.shsnf_len, sa.shplf_len)?;

    let fecf_len = usize::from(managed.has_fecf) * 2;
    let prefix_len = frame.len() - rest.len() - fecf_len;
    if rest.len() < fecf_len + sa.stmacf_len {
        return Err(SdlsError::MacRetrievalError(
            sdls_proto::ProtocolError::SecurityFieldTooShort {
                expected: fecf_len + sa.stmacf_len,
                actual: rest.len(),
            },
        ));
    }
    let payload_len = rest.len() - fecf_len - sa.stmacf_len;
    let payload = &rest[..payload_len];
    let mac = read_mac(&rest[payload_len..], sa.stmacf_len)
        .map_err(SdlsError::MacRetrievalError)?;

    // Step 10: anti-replay window check, over the ARC field when present,
    // otherwise over the IV field. Only authenticated service types are
    // windowed; a pure-Encryption SA's IV advances on its own schedule and is
    // never intended to be replay-checked.
    if !config.ignore_anti_replay
        && matches!(
            service_type,
            sdls_core::ServiceType::Authentication | sdls_core::ServiceType::AuthenticatedEncryption
        )
    {
        let (reference, candidate): (&[u8], &[u8]) = if sa.shsnf_len > 0 {
            (&sa.arc, fields.arc)
        } else if sa.shivf_len > 0 {
            (&sa.iv, fields.iv)
        } else {
            (&[], &[])
        };
        if !reference.is_empty() {
            sdls_core::check_window(candidate, reference, sa.arcw)
                .map_err(|_| SdlsError::BadAntiReplayWindow)?;
            // Advance the floor of the window to the validated value so the
            // same (or an older) counter cannot be replayed again. Unlike
            // the source, which leaves the receive-side counter untouched,
            // this crate persists it (see DESIGN.md).
            if sa.shsnf_len > 0 {
                sa.arc = candidate.to_vec();
            } else {
                sa.iv = candidate.to_vec();
            }
        }
    }

    // Step 11: authentication / decryption branch. Uses `fields.iv` (the IV
    // as transmitted on this frame), never `sa.iv` (the stored reference,
    // which is only meaningful for the anti-replay comparison above).
    let recovered_payload = match crypto_branch(service_type, sa.ecs) {
        CryptoBranch::Plaintext => payload.to_vec(),
        CryptoBranch::Aead => {
            let aad_len = prefix_len;
            if sa.abm.len() < aad_len {
                return Err(SdlsError::AbmTooShortForAad { abm_len: sa.abm.len(), aad_len });
            }
            let aad: Vec<u8> =
                sa.abm[..aad_len].iter().zip(frame[..aad_len].iter()).map(|(m, b)| m & b).collect();

            let tag: [u8; sdls_crypto::TAG_SIZE] = mac.try_into().map_err(|_| {
                SdlsError::Err(format!(
                    "SA declares stmacf_len={} but engine requires {}",
                    sa.stmacf_len,
                    sdls_crypto::TAG_SIZE
                ))
            })?;

            let key = key_ring.active_key(sa.ekid)?;
            let mut buf = payload.to_vec();
            sdls_crypto::open(key, fields.iv, &aad, &mut buf, &tag).map_err(|err| {
                if err.is_authentication_failure() {
                    SdlsError::MacValidationError
                } else {
                    SdlsError::CryptoEngineError(err)
                }
            })?;
            buf
        },
        CryptoBranch::AuthOnly => {
            let aad_len = prefix_len + payload_len;
            if sa.abm.len() < aad_len {
                return Err(SdlsError::AbmTooShortForAad { abm_len: sa.abm.len(), aad_len });
            }
            let frame_and_payload: Vec<u8> =
                frame[..prefix_len].iter().chain(payload.iter()).copied().collect();
            let aad: Vec<u8> = sa.abm[..aad_len]
                .iter()
                .zip(frame_and_payload.iter())
                .map(|(m, b)| m & b)
                .collect();

            let tag: [u8; sdls_crypto::TAG_SIZE] = mac.try_into().map_err(|_| {
                SdlsError::Err(format!(
                    "SA declares stmacf_len={} but engine requires {}",
                    sa.stmacf_len,
                    sdls_crypto::TAG_SIZE
                ))
            })?;

            let key = key_ring.active_key(sa.akid)?;
            sdls_crypto::verify_mac(key, fields.iv, &aad, &tag).map_err(|err| {
                if err.is_authentication_failure() {
                    SdlsError::MacValidationError
                } else {
                    SdlsError::CryptoEngineError(err)
                }
            })?;
            payload.to_vec()
        },
    };

    // Step 12: persist the advanced anti-replay reference.
    sa_repository.save_sa(&sa)?;

    // Step 13: Extended-Procedure Bridge.
    if config.process_sdls_pdus
        && is_extended_procedure_payload(&recovered_payload, config.has_pus_hdr)
    {
        if let Some(dispatcher) = dispatcher {
            if let Some(pdu) = SdlsPdu::parse(&recovered_payload) {
                dispatcher.dispatch(&pdu).map_err(SdlsError::Err)?;
            }
        }
    }

    Ok(ProcessedFrame {
        tfvn: header.tfvn,
        scid: header.scid,
        vcid,
        map_id,
        spi: sa.spi,
        payload: recovered_payload,
    })
}
