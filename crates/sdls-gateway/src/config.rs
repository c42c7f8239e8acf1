//! Gateway configuration: the library behavior flags and the managed
//! parameters registry, assembled with a builder and consumed by value when
//! a `Context` is built.
//!
//! Mirrors `Crypto_Config_CryptoLib`/`Crypto_Config_Add_Gvcid_Managed_Parameter`
//! from the source, which mutate a global `crypto_config`. There is no
//! global here: `CryptoConfigBuilder::build()` produces an owned
//! `CryptoConfig`, and `Context::new` takes ownership of it — the two-phase
//! "configure, then initialize" shape is preserved without process-wide
//! mutable state.

use sdls_core::managed_params::{Gvcid, ManagedParameters, ManagedParametersRegistry};

/// Library behavior flags and the managed parameters registry.
///
/// Built via [`CryptoConfig::builder`]; construct once at startup and hand
/// it to [`crate::Context::new`].
#[derive(Debug, Clone)]
pub struct CryptoConfig {
    /// When set, `process_security` hands parsed SDLS PDUs to the
    /// configured `SdlsDispatcher` (see [`crate::dispatcher`]).
    pub process_sdls_pdus: bool,
    /// Whether the packet layer above the security header is a PUS packet
    /// (APID 0x180 addresses the Extended Procedure); when unset, a
    /// dedicated SDLS virtual channel with no packet layer is assumed.
    pub has_pus_hdr: bool,
    /// When set, `process_security` does not require the looked-up SA to be
    /// OPERATIONAL.
    pub ignore_sa_state: bool,
    /// When set, `process_security` skips the anti-replay window check
    /// entirely.
    pub ignore_anti_replay: bool,
    /// When set, SA lookup includes `map_id`; when unset, an SA bound with
    /// `map_id = 0` matches any MAP-ID within its GVCID.
    pub unique_sa_per_map_id: bool,
    /// Whether `process_security` verifies the FECF.
    pub check_fecf: bool,
    /// Whether `apply_security` computes and writes a FECF (when the
    /// managed parameters for the GVCID say one is present).
    pub create_fecf: bool,
    /// Bitmask applied to the primary header's raw `vcid` field before
    /// managed-parameter and SA lookup.
    pub vcid_bitmask: u8,
    pub(crate) managed_parameters: ManagedParametersRegistry,
}

/// Builder for [`CryptoConfig`]. All flags default to `false`/permissive
/// except `vcid_bitmask`, which defaults to `0x3F` (all six VCID bits
/// significant, i.e. no masking).
#[derive(Debug, Clone)]
pub struct CryptoConfigBuilder {
    process_sdls_pdus: bool,
    has_pus_hdr: bool,
    ignore_sa_state: bool,
    ignore_anti_replay: bool,
    unique_sa_per_map_id: bool,
    check_fecf: bool,
    create_fecf: bool,
    vcid_bitmask: u8,
    managed_parameters: ManagedParametersRegistry,
}

impl Default for CryptoConfigBuilder {
    fn default() -> Self {
        Self {
            process_sdls_pdus: false,
            has_pus_hdr: false,
            ignore_sa_state: false,
            ignore_anti_replay: false,
            unique_sa_per_map_id: false,
            check_fecf: true,
            create_fecf: true,
            vcid_bitmask: 0x3F,
            managed_parameters: ManagedParametersRegistry::new(),
        }
    }
}

impl CryptoConfigBuilder {
    /// Whether `process_security` should hand SDLS PDUs to the
    /// `SdlsDispatcher`.
    #[must_use]
    pub fn process_sdls_pdus(mut self, value: bool) -> Self {
        self.process_sdls_pdus = value;
        self
    }

    /// Whether a PUS header (with APID 0x180 addressing the Extended
    /// Procedure) sits above the security header.
    #[must_use]
    pub fn has_pus_hdr(mut self, value: bool) -> Self {
        self.has_pus_hdr = value;
        self
    }

    /// Whether `process_security` should ignore SA state (accept a
    /// non-OPERATIONAL SA).
    #[must_use]
    pub fn ignore_sa_state(mut self, value: bool) -> Self {
        self.ignore_sa_state = value;
        self
    }

    /// Whether `process_security` should skip the anti-replay window check.
    #[must_use]
    pub fn ignore_anti_replay(mut self, value: bool) -> Self {
        self.ignore_anti_replay = value;
        self
    }

    /// Whether SA lookup should include `map_id`.
    #[must_use]
    pub fn unique_sa_per_map_id(mut self, value: bool) -> Self {
        self.unique_sa_per_map_id = value;
        self
    }

    /// Whether `process_security` should verify the FECF.
    #[must_use]
    pub fn check_fecf(mut self, value: bool) -> Self {
        self.check_fecf = value;
        self
    }

    /// Whether `apply_security` should compute and write a FECF.
    #[must_use]
    pub fn create_fecf(mut self, value: bool) -> Self {
        self.create_fecf = value;
        self
    }

    /// Bitmask applied to the primary header's `vcid` field before
    /// managed-parameter and SA lookup.
    #[must_use]
    pub fn vcid_bitmask(mut self, mask: u8) -> Self {
        self.vcid_bitmask = mask;
        self
    }

    /// Register the managed parameters for one GVCID. Call once per GVCID
    /// the gateway should accept.
    #[must_use]
    pub fn add_gvcid(mut self, gvcid: Gvcid, params: ManagedParameters) -> Self {
        self.managed_parameters.add_gvcid(gvcid, params);
        self
    }

    /// Finish configuration, producing an immutable [`CryptoConfig`].
    #[must_use]
    pub fn build(self) -> CryptoConfig {
        CryptoConfig {
            process_sdls_pdus: self.process_sdls_pdus,
            has_pus_hdr: self.has_pus_hdr,
            ignore_sa_state: self.ignore_sa_state,
            ignore_anti_replay: self.ignore_anti_replay,
            unique_sa_per_map_id: self.unique_sa_per_map_id,
            check_fecf: self.check_fecf,
            create_fecf: self.create_fecf,
            vcid_bitmask: self.vcid_bitmask,
            managed_parameters: self.managed_parameters,
        }
    }
}

impl CryptoConfig {
    /// Start building a configuration. Mirrors `Crypto_Config_CryptoLib`
    /// followed by one or more `Crypto_Config_Add_Gvcid_Managed_Parameter`
    /// calls, collapsed into a fluent builder.
    #[must_use]
    pub fn builder() -> CryptoConfigBuilder {
        CryptoConfigBuilder::default()
    }
}
