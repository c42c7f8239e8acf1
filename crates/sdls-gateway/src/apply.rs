//! ApplySecurity Pipeline (C7): plaintext TC frame in, protected TC frame
//! out.

use sdls_core::{KeyRing, SaRepository};
use sdls_proto::{PrimaryHeader, crc16_ccitt_false};

use crate::{config::CryptoConfig, error::SdlsError, service::crypto_branch};

/// Apply security to a plaintext TC frame, producing the protected frame.
///
/// Parses the primary header, looks up the frame's SA and key, then (per the
/// SA's service type) writes a security header, encrypts and/or authenticates
/// the payload, and appends a security trailer, producing the protected
/// frame. The numbered comments below walk through each stage in order.
///
/// # Errors
///
/// Returns the matching [`SdlsError`] variant for the first failed step.
/// No step that fails mutates the SA (the repository's `save_sa` is only
/// called after every prior step, including the mandatory IV increment,
/// has succeeded).
pub fn apply_security<R: SaRepository>(
    frame: &[u8],
    config: &CryptoConfig,
    sa_repository: &R,
    key_ring: &KeyRing,
) -> Result<Vec<u8>, SdlsError> {
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

    let leader = sdls_proto::ParsedLeader::parse(frame, managed.has_segment_hdr)?;
    let map_id = leader.map_id();

    // Step 5: operational SA lookup.
    let lookup_map_id = if config.unique_sa_per_map_id { map_id } else { 0 };
    let mut sa =
        sa_repository.get_operational_sa(header.tfvn, header.scid, vcid, lookup_map_id)?;

    // Step 6: service type.
    let service_type = sa.service_type();

    let primary_len = PrimaryHeader::SIZE;
    let segment_len = usize::from(managed.has_segment_hdr);
    let fecf_len = usize::from(managed.has_fecf) * 2;

    // Step 7: payload length on the plaintext input, then output length.
    let input_fecf_len = fecf_len;
    let input_len = header.frame_length();
    let header_and_segment = primary_len + segment_len;
    if input_len < header_and_segment + input_fecf_len {
        return Err(SdlsError::Protocol(sdls_proto::ProtocolError::FrameTruncated {
            declared: input_len,
            actual: frame.len(),
        }));
    }
    let payload_len = input_len - header_and_segment - input_fecf_len;

    let output_len = header_and_segment
        + 2
        + sa.shivf_len
        + sa.shsnf_len
        + sa.shplf_len
        + payload_len
        + sa.stmacf_len
        + fecf_len;

    // Step 8: allocate and zero the output.
    let mut out = vec![0u8; output_len];

    // Step 9: primary header, with the length field rewritten.
    let new_header = PrimaryHeader::new(
        header.tfvn,
        header.bypass,
        header.cc,
        header.spare,
        header.scid,
        header.vcid,
        output_len,
        header.fsn,
    )?;
    out[..primary_len].copy_from_slice(&new_header.to_bytes());

    // Step 10: segment header, copied unchanged.
    let mut offset = primary_len;
    if let Some(segment) = leader.segment {
        out[offset] = segment.to_byte();
        offset += 1;
    }

    // Step 11: SPI.
    out[offset..offset + 2].copy_from_slice(&sa.spi.to_be_bytes());
    offset += 2;

    // Step 12: IV.
    if sa.shivf_len > 0 {
        out[offset..offset + sa.shivf_len].copy_from_slice(&sa.iv);
        offset += sa.shivf_len;
    }

    // Step 13: ARC, incremented before being written.
    if sa.shsnf_len > 0 {
        // Source leaves ARC overflow unexamined; only the IV increment
        // later in this pipeline is treated as fatal (see DESIGN.md).
        let _ = sdls_core::increment_be(&mut sa.arc);
        out[offset..offset + sa.shsnf_len].copy_from_slice(&sa.arc);
        offset += sa.shsnf_len;
    }

    // Step 14: pad-length field, left zeroed.
    offset += sa.shplf_len;

    // Step 15: plaintext payload.
    let payload_offset = offset;
    out[payload_offset..payload_offset + payload_len]
        .copy_from_slice(&leader.body[..payload_len]);

    let mac_offset = payload_offset + payload_len;
    let aad_header_len = payload_offset;

    // Step 16: authentication / encryption branch.
    match crypto_branch(service_type, sa.ecs) {
        crate::service::CryptoBranch::Plaintext => {},
        crate::service::CryptoBranch::Aead => {
            let aad_len = aad_header_len;
            if sa.abm.len() < aad_len {
                return Err(SdlsError::AbmTooShortForAad { abm_len: sa.abm.len(), aad_len });
            }
            let mut aad = vec![0u8; aad_len];
            for (slot, (mask, frame_byte)) in
                aad.iter_mut().zip(sa.abm.iter().zip(out[..aad_len].iter()))
            {
                *slot = mask & frame_byte;
            }

            let key = key_ring.active_key(sa.ekid)?;
            let tag = sdls_crypto::seal(
                key,
                &sa.iv,
                &aad,
                &mut out[payload_offset..payload_offset + payload_len],
            )
            .map_err(SdlsError::CryptoEngineError)?;
            out[mac_offset..mac_offset + sa.stmacf_len]
                .copy_from_slice(&tag[..sa.stmacf_len]);
        },
        crate::service::CryptoBranch::AuthOnly => {
            let aad_len = aad_header_len + payload_len;
            if sa.abm.len() < aad_len {
                return Err(SdlsError::AbmTooShortForAad { abm_len: sa.abm.len(), aad_len });
            }
            let mut aad = vec![0u8; aad_len];
            for (slot, (mask, frame_byte)) in
                aad.iter_mut().zip(sa.abm.iter().zip(out[..aad_len].iter()))
            {
                *slot = mask & frame_byte;
            }

            let key = key_ring.active_key(sa.akid)?;
            let tag = sdls_crypto::mac_only(key, &sa.iv, &aad)
                .map_err(|_| SdlsError::AuthenticationError)?;
            out[mac_offset..mac_offset + sa.stmacf_len]
                .copy_from_slice(&tag[..sa.stmacf_len]);
        },
    }

    // Step 17: increment SA.iv, when the SA carries one at all. Overflow
    // halts the pipeline: an SA that has exhausted its IV space must be
    // rekeyed out of band (see DESIGN.md).
    if sa.shivf_len > 0 && sdls_core::increment_be(&mut sa.iv).is_err() {
        tracing::warn!(spi = sa.spi, "SA IV exhausted on ApplySecurity increment");
        return Err(SdlsError::IvExhausted);
    }

    // Step 18: FECF.
    if managed.has_fecf {
        if config.create_fecf {
            let crc = crc16_ccitt_false(&out[..output_len - 2]);
            out[output_len - 2..].copy_from_slice(&crc.to_be_bytes());
        }
        // else: left zeroed by the initial allocation.
    }

    // Step 19: persist the mutated SA.
    sa_repository.save_sa(&sa)?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use sdls_core::{
        AuthCipherSuite, EncryptionCipherSuite, InMemorySaRepository, SaState, SecurityAssociation,
    };

    use super::*;
    use crate::config::CryptoConfig;

    fn sample_sa() -> SecurityAssociation {
        SecurityAssociation {
            spi: 1,
            tfvn: 0,
            scid: 3,
            vcid: 0,
            map_id: 0,
            sa_state: SaState::Operational,
            est: true,
            ast: true,
            ecs: EncryptionCipherSuite::Aes256Gcm,
            acs: AuthCipherSuite::Aes256Gcm,
            shivf_len: 12,
            shsnf_len: 0,
            shplf_len: 0,
            stmacf_len: 16,
            iv: vec![0xAAu8; 12],
            arc: vec![],
            arcw: 5,
            abm: vec![0xFFu8; 64],
            ekid: 1,
            akid: 1,
        }
    }

    fn sample_config() -> CryptoConfig {
        CryptoConfig::builder()
            .add_gvcid(
                (0, 3, 0),
                sdls_core::ManagedParameters {
                    has_fecf: true,
                    has_segment_hdr: false,
                    max_frame_length: 1024,
                },
            )
            .build()
    }

    #[test]
    fn happy_path_produces_expected_output_length() {
        let config = sample_config();
        let repo = InMemorySaRepository::new();
        repo.insert(sample_sa());
        let mut key_ring = KeyRing::new();
        key_ring.load(1, vec![0x11u8; 32], sdls_core::KeyState::Active);

        // TFVN=0 SCID=3 VCID=0 CC=0, fl = 4 (5-byte primary + 0 payload - 1), fsn arbitrary.
        let payload = b"hello!!!";
        let frame_len = PrimaryHeader::SIZE + payload.len() + 2;
        let header =
            PrimaryHeader::new(0, false, false, 0, 3, 0, frame_len, 7).expect("valid header");
        let mut frame = header.to_bytes().to_vec();
        frame.extend_from_slice(payload);
        frame.extend_from_slice(&[0u8, 0u8]); // placeholder FECF

        let out = apply_security(&frame, &config, &repo, &key_ring).expect("should succeed");

        let expected_len =
            PrimaryHeader::SIZE + 2 + 12 + payload.len() + 16 + 2;
        assert_eq!(out.len(), expected_len);

        let out_header = PrimaryHeader::parse(&out).expect("should parse");
        assert_eq!(out_header.frame_length(), expected_len);

        // IV was incremented exactly once (last octet only, no carry).
        let sa = repo.get_sa_by_spi(1).expect("sa should exist");
        let mut expected_iv = vec![0xAAu8; 12];
        expected_iv[11] = 0xAB;
        assert_eq!(sa.iv, expected_iv);
    }

    #[test]
    fn null_buffer_is_rejected() {
        let config = sample_config();
        let repo = InMemorySaRepository::new();
        let key_ring = KeyRing::new();
        assert_eq!(apply_security(&[], &config, &repo, &key_ring), Err(SdlsError::NullBuffer));
    }

    #[test]
    fn control_frame_is_rejected() {
        let config = sample_config();
        let repo = InMemorySaRepository::new();
        let key_ring = KeyRing::new();

        let header = PrimaryHeader::new(0, false, true, 0, 3, 0, 7, 0).expect("valid header");
        let mut frame = header.to_bytes().to_vec();
        frame.extend_from_slice(&[0u8, 0, 0]);

        assert_eq!(
            apply_security(&frame, &config, &repo, &key_ring),
            Err(SdlsError::InvalidCcFlag)
        );
    }

    #[test]
    fn unknown_gvcid_is_rejected() {
        let config = sample_config();
        let repo = InMemorySaRepository::new();
        let key_ring = KeyRing::new();

        let header = PrimaryHeader::new(0, false, false, 0, 1, 0, 7, 0).expect("valid header");
        let mut frame = header.to_bytes().to_vec();
        frame.extend_from_slice(&[0u8, 0, 0]);

        assert_eq!(
            apply_security(&frame, &config, &repo, &key_ring),
            Err(SdlsError::ManagedParametersForGvcidNotFound { tfvn: 0, scid: 1, vcid: 0 })
        );
    }

    /// An SA requesting `AuthenticatedEncryption` over a non-AEAD `ecs` must
    /// not silently drop encryption coverage: `crypto_branch` routes it to
    /// the MAC-only path, so the payload is written through unencrypted but
    /// a tag still covers the whole frame (see `service.rs` and DESIGN.md's
    /// first resolved open question).
    #[test]
    fn non_aead_ecs_falls_back_to_auth_only_and_leaves_payload_unencrypted() {
        let config = sample_config();
        let repo = InMemorySaRepository::new();
        let mut sa = sample_sa();
        sa.ecs = EncryptionCipherSuite::Aes256Cbc;
        repo.insert(sa);
        let mut key_ring = KeyRing::new();
        key_ring.load(1, vec![0x11u8; 32], sdls_core::KeyState::Active);

        let payload = b"hello!!!";
        let frame_len = PrimaryHeader::SIZE + payload.len() + 2;
        let header =
            PrimaryHeader::new(0, false, false, 0, 3, 0, frame_len, 7).expect("valid header");
        let mut frame = header.to_bytes().to_vec();
        frame.extend_from_slice(payload);
        frame.extend_from_slice(&[0u8, 0u8]);

        let out = apply_security(&frame, &config, &repo, &key_ring).expect("should succeed");

        // Security header: primary(5) + SPI(2) + IV(12) = 19 octets precede the payload.
        let payload_region = &out[19..19 + payload.len()];
        assert_eq!(payload_region, payload, "auth-only branch must not encrypt the payload");
    }
}
