//! Two-phase init: a [`CryptoConfig`] is built once, then handed to a
//! [`Context`] along with an SA repository and a key ring. The `Context` is
//! the one object embedders call `apply_security`/`process_security` on —
//! mirrors the source's "configure, then `Crypto_Init`" sequence without a
//! process-global `crypto_config`.

use sdls_core::{InMemorySaRepository, KeyRing, SaRepository};

use crate::{
    apply::apply_security,
    config::CryptoConfig,
    dispatcher::SdlsDispatcher,
    error::SdlsError,
    process::{ProcessedFrame, process_security},
};

/// Owns everything the TC security pipelines need: behavior flags, managed
/// parameters, the SA store, the key ring, and (optionally) an
/// Extended-Procedure dispatcher.
///
/// Generic over the SA repository so embedders can plug in a persistent
/// backend; `sdls-core` ships [`sdls_core::InMemorySaRepository`] as a
/// concrete implementation for tests and single-process use.
pub struct Context<R: SaRepository> {
    config: CryptoConfig,
    sa_repository: R,
    key_ring: KeyRing,
    dispatcher: Option<Box<dyn SdlsDispatcher>>,
}

impl<R: SaRepository> Context<R> {
    /// Build a context from a configuration, an SA repository, and a key
    /// ring. No Extended-Procedure dispatcher is attached; use
    /// [`Self::with_dispatcher`] to add one.
    #[must_use]
    pub fn new(config: CryptoConfig, sa_repository: R, key_ring: KeyRing) -> Self {
        Self { config, sa_repository, key_ring, dispatcher: None }
    }

    /// Attach an Extended-Procedure dispatcher, consumed by
    /// [`Self::process_security`] when `config.process_sdls_pdus` is set.
    #[must_use]
    pub fn with_dispatcher(mut self, dispatcher: Box<dyn SdlsDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// The key ring this context was built with.
    #[must_use]
    pub fn key_ring(&self) -> &KeyRing {
        &self.key_ring
    }

    /// The configuration this context was built with.
    #[must_use]
    pub fn config(&self) -> &CryptoConfig {
        &self.config
    }

    /// The SA repository this context was built with.
    #[must_use]
    pub fn sa_repository(&self) -> &R {
        &self.sa_repository
    }

    /// Apply security to a plaintext TC frame.
    ///
    /// See [`apply_security`] for the algorithm and error conditions.
    ///
    /// # Errors
    ///
    /// See [`apply_security`].
    pub fn apply_security(&self, frame: &[u8]) -> Result<Vec<u8>, SdlsError> {
        apply_security(frame, &self.config, &self.sa_repository, &self.key_ring)
    }

    /// Strip and validate security processing from a received TC frame.
    ///
    /// # Errors
    ///
    /// See [`process_security`].
    pub fn process_security(&self, frame: &[u8]) -> Result<ProcessedFrame, SdlsError> {
        let dispatcher = self.dispatcher.as_deref();
        process_security(frame, &self.config, &self.sa_repository, &self.key_ring, dispatcher)
    }
}

impl Context<InMemorySaRepository> {
    /// A context backed by an empty [`InMemorySaRepository`] and an empty
    /// [`KeyRing`], with a default (permissive-defaults) [`CryptoConfig`]
    /// carrying no managed parameters.
    ///
    /// Mirrors `Crypto_Init_Unit_Test`: callers populate the repository and
    /// key ring (and typically rebuild the config with their own managed
    /// parameters) before exercising the pipelines against it.
    #[must_use]
    pub fn for_tests() -> Self {
        Self::new(CryptoConfig::builder().build(), InMemorySaRepository::new(), KeyRing::new())
    }
}

#[cfg(test)]
mod tests {
    use sdls_core::{
        AuthCipherSuite, EncryptionCipherSuite, InMemorySaRepository, KeyState, ManagedParameters,
        SaState, SecurityAssociation,
    };

    use super::*;

    fn build_context() -> Context<InMemorySaRepository> {
        let config = CryptoConfig::builder()
            .add_gvcid(
                (0, 3, 0),
                ManagedParameters { has_fecf: true, has_segment_hdr: false, max_frame_length: 1024 },
            )
            .build();

        let repo = InMemorySaRepository::new();
        repo.insert(SecurityAssociation {
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
        });

        let mut key_ring = KeyRing::new();
        key_ring.load(1, vec![0x11u8; 32], KeyState::Active);

        Context::new(config, repo, key_ring)
    }

    #[test]
    fn apply_then_process_round_trips() {
        let ctx = build_context();

        let payload = b"hello!!!";
        let frame_len = sdls_proto::PrimaryHeader::SIZE + payload.len() + 2;
        let header = sdls_proto::PrimaryHeader::new(0, false, false, 0, 3, 0, frame_len, 7)
            .expect("valid header");
        let mut frame = header.to_bytes().to_vec();
        frame.extend_from_slice(payload);
        frame.extend_from_slice(&[0u8, 0u8]);

        let protected = ctx.apply_security(&frame).expect("apply should succeed");
        let result = ctx.process_security(&protected).expect("process should succeed");

        assert_eq!(result.payload, payload);
    }
}
