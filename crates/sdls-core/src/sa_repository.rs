//! Security Association Repository: the interface the core consumes to look
//! up and persist SAs, plus a reference in-memory implementation.
//!
//! Source uses a struct of function pointers to choose between in-memory and
//! relational (MariaDB) backends. This is a trait instead; `InMemorySaRepository`
//! is the one concrete implementation this crate ships, for tests, simulation,
//! and single-process embedders. Real deployments are expected to supply a
//! persistent backend externally (the relational variant is out of scope —
//! see crate-level docs).

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::{error::SaRepositoryError, sa::SecurityAssociation};

/// Operations the TC security pipelines need from an SA store.
///
/// Implementations must present a stable view of an SA for the duration of a
/// single `apply_security`/`process_security` call — the core holds the
/// looked-up SA for the entire call rather than re-reading it mid-pipeline.
/// The trait does not require `Sync`-safe concurrent mutation of the *same*
/// SA: callers that parallelize across distinct SPIs may do so freely;
/// callers sharing one SPI across concurrent calls must serialize
/// externally (see crate-level concurrency notes).
pub trait SaRepository: Send {
    /// Look up an SA by its Security Parameter Index, regardless of state.
    ///
    /// `ProcessSecurity` uses this: it trusts SPI selection and accepts
    /// whatever state the SA is in unless the gateway is configured with
    /// `ignore_sa_state` turned off and the caller additionally checks state.
    ///
    /// # Errors
    ///
    /// Returns [`SaRepositoryError::SpiNotFound`] if no SA is bound to `spi`.
    fn get_sa_by_spi(&self, spi: u16) -> Result<SecurityAssociation, SaRepositoryError>;

    /// Look up the OPERATIONAL SA bound to a GVCID/MAP-ID quintuple.
    ///
    /// `ApplySecurity` uses this exclusively: only an OPERATIONAL SA may
    /// serve it.
    ///
    /// # Errors
    ///
    /// Returns [`SaRepositoryError::OperationalNotFound`] if no OPERATIONAL
    /// SA matches.
    fn get_operational_sa(
        &self,
        tfvn: u8,
        scid: u16,
        vcid: u8,
        map_id: u8,
    ) -> Result<SecurityAssociation, SaRepositoryError>;

    /// Persist a mutated SA (IV and/or ARC) back to the store.
    ///
    /// Called once per successful `ApplySecurity`, and once per successful
    /// `ProcessSecurity` when this crate's receive-counter persistence is
    /// enabled (see DESIGN.md).
    ///
    /// # Errors
    ///
    /// Returns [`SaRepositoryError::SpiNotFound`] if `sa.spi` is not a known
    /// entry — an embedder's repository should treat `save_sa` as an update,
    /// not an upsert.
    fn save_sa(&self, sa: &SecurityAssociation) -> Result<(), SaRepositoryError>;
}

/// In-memory `SaRepository`, keyed by SPI with a secondary GVCID/MAP-ID
/// index for the `ApplySecurity` lookup path.
///
/// Wraps its state in `Arc<Mutex<_>>` so it is `Clone` and shareable across
/// callers the way the source's global SA table was, without this crate
/// depending on a particular concurrency primitive beyond a plain mutex.
#[derive(Clone)]
pub struct InMemorySaRepository {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    by_spi: HashMap<u16, SecurityAssociation>,
}

impl InMemorySaRepository {
    /// An empty repository. Use [`Self::insert`] to load SAs before use.
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Arc::new(Mutex::new(Inner { by_spi: HashMap::new() })) }
    }

    /// Load (or replace) one SA, indexed by its `spi`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned (a thread panicked while
    /// holding the lock). Acceptable for the test/simulation role this
    /// implementation fills.
    #[allow(clippy::expect_used)]
    pub fn insert(&self, sa: SecurityAssociation) {
        let mut inner = self.inner.lock().expect("InMemorySaRepository mutex poisoned");
        inner.by_spi.insert(sa.spi, sa);
    }
}

impl Default for InMemorySaRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl SaRepository for InMemorySaRepository {
    #[allow(clippy::expect_used)]
    fn get_sa_by_spi(&self, spi: u16) -> Result<SecurityAssociation, SaRepositoryError> {
        let inner = self.inner.lock().expect("InMemorySaRepository mutex poisoned");
        inner.by_spi.get(&spi).cloned().ok_or_else(|| {
            tracing::debug!(spi, "no SA bound to SPI");
            SaRepositoryError::SpiNotFound { spi }
        })
    }

    #[allow(clippy::expect_used)]
    fn get_operational_sa(
        &self,
        tfvn: u8,
        scid: u16,
        vcid: u8,
        map_id: u8,
    ) -> Result<SecurityAssociation, SaRepositoryError> {
        let inner = self.inner.lock().expect("InMemorySaRepository mutex poisoned");
        inner
            .by_spi
            .values()
            .find(|sa| {
                sa.sa_state == crate::sa::SaState::Operational
                    && sa.tfvn == tfvn
                    && sa.scid == scid
                    && sa.vcid == vcid
                    && sa.map_id == map_id
            })
            .cloned()
            .ok_or(SaRepositoryError::OperationalNotFound { tfvn, scid, vcid, map_id })
    }

    #[allow(clippy::expect_used)]
    fn save_sa(&self, sa: &SecurityAssociation) -> Result<(), SaRepositoryError> {
        let mut inner = self.inner.lock().expect("InMemorySaRepository mutex poisoned");
        let entry =
            inner.by_spi.get_mut(&sa.spi).ok_or(SaRepositoryError::SpiNotFound { spi: sa.spi })?;
        *entry = sa.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sa::{AuthCipherSuite, EncryptionCipherSuite, SaState};

    fn sample_sa(spi: u16, state: SaState) -> SecurityAssociation {
        SecurityAssociation {
            spi,
            tfvn: 0,
            scid: 3,
            vcid: 0,
            map_id: 0,
            sa_state: state,
            est: true,
            ast: true,
            ecs: EncryptionCipherSuite::Aes256Gcm,
            acs: AuthCipherSuite::Aes256Gcm,
            shivf_len: 12,
            shsnf_len: 0,
            shplf_len: 0,
            stmacf_len: 16,
            iv: vec![0u8; 12],
            arc: vec![],
            arcw: 5,
            abm: vec![0xFFu8; 32],
            ekid: 1,
            akid: 1,
        }
    }

    #[test]
    fn insert_then_get_by_spi() {
        let repo = InMemorySaRepository::new();
        repo.insert(sample_sa(1, SaState::Operational));
        assert_eq!(repo.get_sa_by_spi(1).expect("should find").spi, 1);
        assert_eq!(repo.get_sa_by_spi(2), Err(SaRepositoryError::SpiNotFound { spi: 2 }));
    }

    #[test]
    fn operational_lookup_ignores_non_operational_sas() {
        let repo = InMemorySaRepository::new();
        repo.insert(sample_sa(1, SaState::Keyed));
        assert_eq!(
            repo.get_operational_sa(0, 3, 0, 0),
            Err(SaRepositoryError::OperationalNotFound { tfvn: 0, scid: 3, vcid: 0, map_id: 0 })
        );

        repo.insert(sample_sa(1, SaState::Operational));
        assert_eq!(repo.get_operational_sa(0, 3, 0, 0).expect("should find").spi, 1);
    }

    #[test]
    fn save_sa_persists_mutation() {
        let repo = InMemorySaRepository::new();
        repo.insert(sample_sa(1, SaState::Operational));

        let mut sa = repo.get_sa_by_spi(1).expect("should find");
        sa.iv = vec![0xAAu8; 12];
        repo.save_sa(&sa).expect("spi is known");

        assert_eq!(repo.get_sa_by_spi(1).expect("should find").iv, vec![0xAAu8; 12]);
    }

    #[test]
    fn save_sa_on_unknown_spi_fails() {
        let repo = InMemorySaRepository::new();
        let sa = sample_sa(9, SaState::Operational);
        assert_eq!(repo.save_sa(&sa), Err(SaRepositoryError::SpiNotFound { spi: 9 }));
    }
}
