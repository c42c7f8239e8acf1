//! The Security Association: per-channel security state.

/// Lifecycle state of a Security Association.
///
/// Only [`SaState::Operational`] may serve `ApplySecurity`.
/// `ProcessSecurity` accepts a looked-up SPI regardless of state (it trusts
/// SPI selection) unless the gateway is configured with `ignore_sa_state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaState {
    /// No keying material, not yet configured for use.
    None,
    /// Keyed but not yet promoted to service.
    Keyed,
    /// Keying material withdrawn without destroying the association.
    Unkeyed,
    /// In service; the only state `ApplySecurity` will use.
    Operational,
}

/// Security service an SA provides, derived from `(est, ast)`.
///
/// This is a total function over `bool x bool`; there is no fifth case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceType {
    /// Neither encrypted nor authenticated.
    Plaintext,
    /// Authenticated only (MAC over AAD with zero-length plaintext).
    Authentication,
    /// Encrypted only, no authentication tag.
    Encryption,
    /// Encrypted and authenticated (AEAD, when the cipher suite is AEAD).
    AuthenticatedEncryption,
}

impl ServiceType {
    /// Derive the service type from the SA's encrypt/authenticate flags.
    #[must_use]
    pub fn from_flags(est: bool, ast: bool) -> Self {
        match (est, ast) {
            (false, false) => Self::Plaintext,
            (false, true) => Self::Authentication,
            (true, false) => Self::Encryption,
            (true, true) => Self::AuthenticatedEncryption,
        }
    }
}

/// Encryption cipher suite selector.
///
/// Only [`EncryptionCipherSuite::Aes256Gcm`] is backed by a working engine in
/// this crate (see `sdls-crypto`); [`EncryptionCipherSuite::Aes256Cbc`] exists
/// so the AEAD/non-AEAD branch in the pipelines is a real decision over a
/// closed enumeration rather than a constant, matching how the SDLS wire
/// encoding reserves algorithm codes for ciphers this deployment does not
/// enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncryptionCipherSuite {
    /// AES-256 in Galois/Counter Mode. AEAD.
    Aes256Gcm,
    /// AES-256 in CBC mode. Not AEAD, and not implemented by the
    /// cryptographic engine in this crate; selecting it surfaces a
    /// `CryptoEngineError` rather than silently falling back to GCM.
    Aes256Cbc,
}

impl EncryptionCipherSuite {
    /// Whether this cipher suite provides authenticated encryption with
    /// associated data on its own.
    #[must_use]
    pub fn is_aead(self) -> bool {
        matches!(self, Self::Aes256Gcm)
    }
}

/// Authentication cipher suite selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthCipherSuite {
    /// AES-256-GCM run with zero-length plaintext, producing a detached tag.
    Aes256Gcm,
}

/// A Security Association: the per-channel cryptographic and sequencing
/// state that `ApplySecurity`/`ProcessSecurity` operate against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityAssociation {
    /// Security Parameter Index identifying this SA on the wire.
    pub spi: u16,
    /// Transfer Frame Version Number this SA is bound to.
    pub tfvn: u8,
    /// Spacecraft Identifier this SA is bound to.
    pub scid: u16,
    /// Virtual Channel Identifier this SA is bound to.
    pub vcid: u8,
    /// MAP-ID this SA is bound to. Only meaningful when the gateway is
    /// configured with `unique_sa_per_map_id`; otherwise an SA bound with
    /// `map_id = 0` matches any MAP-ID within its GVCID.
    pub map_id: u8,
    /// Current lifecycle state.
    pub sa_state: SaState,
    /// Encryption service toggle.
    pub est: bool,
    /// Authentication service toggle.
    pub ast: bool,
    /// Encryption cipher suite, meaningful when `est` is set.
    pub ecs: EncryptionCipherSuite,
    /// Authentication cipher suite, meaningful when `ast` is set.
    pub acs: AuthCipherSuite,
    /// Length of the IV field in the security header, in octets.
    pub shivf_len: usize,
    /// Length of the ARC/sequence-number field, in octets.
    pub shsnf_len: usize,
    /// Length of the pad-length field, in octets.
    pub shplf_len: usize,
    /// Length of the MAC field in the security trailer, in octets.
    pub stmacf_len: usize,
    /// Current IV, `shivf_len` octets, big-endian.
    pub iv: Vec<u8>,
    /// Current anti-replay counter (or sequence number), `shsnf_len` octets,
    /// big-endian.
    pub arc: Vec<u8>,
    /// Anti-replay window width.
    pub arcw: u32,
    /// Authentication bit mask, `abm_len` octets. AAD is the bytewise AND of
    /// the first `abm.len()` octets of the frame with this mask.
    pub abm: Vec<u8>,
    /// Key-ring reference for the encryption key.
    pub ekid: u16,
    /// Key-ring reference for the authentication key.
    pub akid: u16,
}

impl SecurityAssociation {
    /// Derive this SA's service type from its `est`/`ast` flags.
    #[must_use]
    pub fn service_type(&self) -> ServiceType {
        ServiceType::from_flags(self.est, self.ast)
    }

    /// GVCID quintuple this SA is bound to, including MAP-ID.
    #[must_use]
    pub fn gvcid(&self) -> (u8, u16, u8, u8) {
        (self.tfvn, self.scid, self.vcid, self.map_id)
    }
}
