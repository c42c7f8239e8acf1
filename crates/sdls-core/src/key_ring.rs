//! Key Ring: raw key-material storage with a lifecycle state per entry.
//!
//! Mirrors `ek_ring`/`crypto_key_t` in the source. The ring never changes a
//! key's state itself — that is management-plane activity (key OTAR, key
//! inventory) the Extended-Procedure Bridge forwards out of this crate
//! entirely; the ring only stores bytes and answers "is this key usable".

use zeroize::Zeroizing;

use crate::error::KeyRingError;

/// Lifecycle state of a key-ring entry.
///
/// Only [`KeyState::Active`] keys may be handed to the cryptographic engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyState {
    /// Key material loaded but not yet activated.
    Preactive,
    /// In service; the only state the crypto engine will accept.
    Active,
    /// Withdrawn from service but not yet destroyed.
    Deactivated,
    /// Key material zeroized; the entry is a tombstone.
    Destroyed,
}

struct KeyEntry {
    bytes: Zeroizing<Vec<u8>>,
    state: KeyState,
}

/// A table of key entries indexed by `key_id` (the `ekid`/`akid` an owning
/// SA references).
///
/// Key material is wrapped in [`Zeroizing`] so it is scrubbed from memory
/// when an entry is replaced or the ring is dropped.
#[derive(Default)]
pub struct KeyRing {
    entries: std::collections::HashMap<u16, KeyEntry>,
}

impl KeyRing {
    /// An empty key ring.
    #[must_use]
    pub fn new() -> Self {
        Self { entries: std::collections::HashMap::new() }
    }

    /// Load (or replace) the key material and state for `key_id`.
    ///
    /// Key management (OTAR, rekey) is external to the core; this is the
    /// seam an embedder's key-management code calls through.
    pub fn load(&mut self, key_id: u16, bytes: Vec<u8>, state: KeyState) {
        self.entries.insert(key_id, KeyEntry { bytes: Zeroizing::new(bytes), state });
    }

    /// Transition an existing entry's lifecycle state without touching its
    /// key material.
    ///
    /// # Errors
    ///
    /// Returns [`KeyRingError::NotFound`] if `key_id` has no entry.
    pub fn set_state(&mut self, key_id: u16, state: KeyState) -> Result<(), KeyRingError> {
        self.entries
            .get_mut(&key_id)
            .map(|entry| entry.state = state)
            .ok_or(KeyRingError::NotFound { key_id })
    }

    /// Fetch the raw key bytes for `key_id`, provided the entry is
    /// [`KeyState::Active`].
    ///
    /// # Errors
    ///
    /// Returns [`KeyRingError::NotFound`] if `key_id` has no entry, or
    /// [`KeyRingError::NotActive`] if the entry exists but is not active.
    pub fn active_key(&self, key_id: u16) -> Result<&[u8], KeyRingError> {
        let entry = self.entries.get(&key_id).ok_or(KeyRingError::NotFound { key_id })?;
        if entry.state != KeyState::Active {
            return Err(KeyRingError::NotActive { key_id, state: entry.state });
        }
        Ok(&entry.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_key_is_returned() {
        let mut ring = KeyRing::new();
        ring.load(1, vec![0xAB; 32], KeyState::Active);
        assert_eq!(ring.active_key(1), Ok([0xAB; 32].as_slice()));
    }

    #[test]
    fn inactive_key_is_rejected() {
        let mut ring = KeyRing::new();
        ring.load(1, vec![0xAB; 32], KeyState::Preactive);
        assert_eq!(
            ring.active_key(1),
            Err(KeyRingError::NotActive { key_id: 1, state: KeyState::Preactive })
        );
    }

    #[test]
    fn unknown_key_id_is_rejected() {
        let ring = KeyRing::new();
        assert_eq!(ring.active_key(7), Err(KeyRingError::NotFound { key_id: 7 }));
    }

    #[test]
    fn set_state_transitions_existing_entry() {
        let mut ring = KeyRing::new();
        ring.load(1, vec![0x00; 32], KeyState::Preactive);
        ring.set_state(1, KeyState::Active).expect("entry exists");
        assert!(ring.active_key(1).is_ok());

        ring.set_state(1, KeyState::Deactivated).expect("entry exists");
        assert_eq!(
            ring.active_key(1),
            Err(KeyRingError::NotActive { key_id: 1, state: KeyState::Deactivated })
        );
    }

    #[test]
    fn set_state_on_unknown_id_fails() {
        let mut ring = KeyRing::new();
        assert_eq!(ring.set_state(3, KeyState::Active), Err(KeyRingError::NotFound { key_id: 3 }));
    }
}
