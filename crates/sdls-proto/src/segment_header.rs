//! TC Segment Header: a single octet carrying the MAP-ID, present only when
//! the managed parameters for a GVCID say so.

/// Parsed segment header (1 octet).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentHeader {
    /// Sequence flags (2 bits). Not interpreted by the security core.
    pub sequence_flags: u8,
    /// Multiplexer Access Point identifier (6 bits).
    pub map_id: u8,
}

impl SegmentHeader {
    /// Size of the segment header in octets.
    pub const SIZE: usize = 1;

    /// Parse a segment header from a single octet.
    #[must_use]
    pub fn parse(byte: u8) -> Self {
        Self { sequence_flags: (byte & 0xC0) >> 6, map_id: byte & 0x3F }
    }

    /// Serialize this segment header to its one-octet wire form.
    #[must_use]
    pub fn to_byte(self) -> u8 {
        (self.sequence_flags << 6) | (self.map_id & 0x3F)
    }
}
