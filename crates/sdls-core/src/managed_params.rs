//! Managed Parameters Registry: per-GVCID frame-shape configuration.
//!
//! The source builds a singly-linked list at configuration time and walks it
//! on every lookup. This is a `HashMap` keyed by `(tfvn, scid, vcid)` instead:
//! O(1) lookup, trivial teardown, and write-once-then-read-only for the
//! lifetime of a `Context`.

use std::collections::HashMap;

use crate::error::ManagedParametersError;

/// GVCID: the `(tfvn, scid, vcid)` triple managed parameters are keyed on.
/// MAP-ID is deliberately excluded — managed parameters are per virtual
/// channel, not per MAP.
pub type Gvcid = (u8, u16, u8);

/// Per-GVCID frame-shape configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagedParameters {
    /// Whether frames on this GVCID carry a trailing FECF.
    pub has_fecf: bool,
    /// Whether frames on this GVCID carry a segment header.
    pub has_segment_hdr: bool,
    /// Maximum frame length, in octets, accepted for this GVCID.
    pub max_frame_length: usize,
}

/// Write-once-at-configuration, read-only-thereafter managed parameters
/// table.
#[derive(Debug, Clone, Default)]
pub struct ManagedParametersRegistry {
    entries: HashMap<Gvcid, ManagedParameters>,
}

impl ManagedParametersRegistry {
    /// An empty registry. Use [`Self::add_gvcid`] to populate it at
    /// configuration time.
    #[must_use]
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    /// Add (or replace) the managed parameters for one GVCID.
    ///
    /// Mirrors `Crypto_Config_Add_Gvcid_Managed_Parameter`: one call per
    /// GVCID at configuration time, before the registry is handed to a
    /// `Context`.
    pub fn add_gvcid(&mut self, gvcid: Gvcid, params: ManagedParameters) -> &mut Self {
        self.entries.insert(gvcid, params);
        self
    }

    /// Look up the managed parameters for a GVCID.
    ///
    /// # Errors
    ///
    /// Returns [`ManagedParametersError::NotFound`] if no entry was
    /// registered for `(tfvn, scid, vcid)`.
    pub fn lookup(
        &self,
        tfvn: u8,
        scid: u16,
        vcid: u8,
    ) -> Result<&ManagedParameters, ManagedParametersError> {
        self.entries.get(&(tfvn, scid, vcid)).ok_or_else(|| {
            tracing::debug!(tfvn, scid, vcid, "managed parameters not found for GVCID");
            ManagedParametersError::NotFound { tfvn, scid, vcid }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_hit_and_miss() {
        let mut registry = ManagedParametersRegistry::new();
        registry.add_gvcid(
            (0, 3, 0),
            ManagedParameters { has_fecf: true, has_segment_hdr: true, max_frame_length: 1024 },
        );

        let found = registry.lookup(0, 3, 0).expect("registered GVCID should be found");
        assert!(found.has_fecf);
        assert!(found.has_segment_hdr);

        assert_eq!(
            registry.lookup(0, 1, 0),
            Err(ManagedParametersError::NotFound { tfvn: 0, scid: 1, vcid: 0 })
        );
    }

    #[test]
    fn later_add_replaces_earlier() {
        let mut registry = ManagedParametersRegistry::new();
        registry.add_gvcid(
            (0, 3, 0),
            ManagedParameters { has_fecf: false, has_segment_hdr: false, max_frame_length: 256 },
        );
        registry.add_gvcid(
            (0, 3, 0),
            ManagedParameters { has_fecf: true, has_segment_hdr: true, max_frame_length: 1024 },
        );

        let found = registry.lookup(0, 3, 0).expect("registered GVCID should be found");
        assert!(found.has_fecf);
        assert_eq!(found.max_frame_length, 1024);
    }
}
