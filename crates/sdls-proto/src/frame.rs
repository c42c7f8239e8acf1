//! The leading, fixed-shape part of a TC transfer frame: primary header plus
//! optional segment header.
//!
//! Everything after the leader (security header, payload, MAC, FECF) has
//! lengths that depend on the owning Security Association, so it is not
//! modeled as a fixed struct here; callers work with the returned `body`
//! slice using [`crate::security`] and [`crate::crc`].

use crate::{errors::ProtocolError, primary_header::PrimaryHeader, segment_header::SegmentHeader};

/// Primary header, optional segment header, and the remaining frame body.
///
/// # Invariants
///
/// - `body` starts exactly after the primary header and, when present, the
///   segment header.
/// - `body.len()` has already been checked against
///   `header.frame_length() - PrimaryHeader::SIZE - segment size`; a
///   mismatch is reported as [`ProtocolError::FrameTruncated`] rather than
///   silently truncating or over-reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedLeader<'a> {
    /// The parsed primary header.
    pub header: PrimaryHeader,
    /// The parsed segment header, when the managed parameters for this
    /// GVCID say one is present.
    pub segment: Option<SegmentHeader>,
    /// Everything in the frame after the leader, truncated to exactly the
    /// length the primary header's `fl` field declares.
    pub body: &'a [u8],
}

impl<'a> ParsedLeader<'a> {
    /// Parse the primary header and, if `has_segment_header` is set, the
    /// segment header that follows it, then slice `body` to exactly the
    /// octet count the primary header declares.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::FrameTooShort`] if `bytes` is shorter than the
    ///   primary header (plus the segment header, when present).
    /// - [`ProtocolError::FrameTruncated`] if `bytes` holds fewer octets than
    ///   the primary header's declared `fl + 1` frame length.
    pub fn parse(bytes: &'a [u8], has_segment_header: bool) -> Result<Self, ProtocolError> {
        let header = PrimaryHeader::parse(bytes)?;

        let leader_len =
            PrimaryHeader::SIZE + if has_segment_header { SegmentHeader::SIZE } else { 0 };

        if bytes.len() < leader_len {
            return Err(ProtocolError::FrameTooShort { expected: leader_len, actual: bytes.len() });
        }

        let declared_len = header.frame_length();
        if declared_len < leader_len || bytes.len() < declared_len {
            return Err(ProtocolError::FrameTruncated {
                declared: declared_len,
                actual: bytes.len(),
            });
        }

        let segment = has_segment_header.then(|| SegmentHeader::parse(bytes[PrimaryHeader::SIZE]));

        Ok(Self { header, segment, body: &bytes[leader_len..declared_len] })
    }

    /// The MAP-ID for this frame: from the segment header when present,
    /// otherwise `0` (mirrors `TcUniqueSaPerMapId` treating an absent
    /// segment header as MAP-ID 0).
    #[must_use]
    pub fn map_id(&self) -> u8 {
        self.segment.map(|s| s.map_id).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn build_frame(
        has_segment_header: bool,
        map_id: u8,
        body_extra: &[u8],
    ) -> (Vec<u8>, PrimaryHeader) {
        let segment_len = usize::from(has_segment_header);
        let frame_length = PrimaryHeader::SIZE + segment_len + body_extra.len();
        let header =
            PrimaryHeader::new(0, false, false, 0, 3, 0, frame_length, 7).expect("valid length");

        let mut bytes = header.to_bytes().to_vec();
        if has_segment_header {
            bytes.push(SegmentHeader { sequence_flags: 0, map_id }.to_byte());
        }
        bytes.extend_from_slice(body_extra);
        (bytes, header)
    }

    proptest! {
        #[test]
        fn round_trip(
            has_segment_header in any::<bool>(),
            map_id in 0u8..=0x3F,
            body_extra in prop::collection::vec(any::<u8>(), 0..64),
        ) {
            let (bytes, header) = build_frame(has_segment_header, map_id, &body_extra);
            let parsed = ParsedLeader::parse(&bytes, has_segment_header).expect("should parse");
            prop_assert_eq!(parsed.header, header);
            prop_assert_eq!(parsed.body, body_extra.as_slice());
            if has_segment_header {
                prop_assert_eq!(parsed.map_id(), map_id);
            } else {
                prop_assert_eq!(parsed.map_id(), 0);
            }
        }
    }

    #[test]
    fn reject_truncated_frame() {
        let (mut bytes, _) = build_frame(false, 0, &[1, 2, 3, 4]);
        bytes.truncate(bytes.len() - 2);
        let result = ParsedLeader::parse(&bytes, false);
        assert!(matches!(result, Err(ProtocolError::FrameTruncated { .. })));
    }

    #[test]
    fn reject_short_buffer_with_segment_header() {
        let bytes = [0x20, 0x03, 0x00, 0x05, 0x00];
        let result = ParsedLeader::parse(&bytes, true);
        assert_eq!(result, Err(ProtocolError::FrameTooShort { expected: 6, actual: 5 }));
    }
}
