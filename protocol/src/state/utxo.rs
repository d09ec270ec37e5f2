//! Unspent-output store.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;
use tracing::trace;

use super::StateError;
use crate::components::Utxo;
use crate::ids::Id;

/// Read access to unspent outputs, keyed by [`Utxo::input_id`].
pub trait UtxoState: Send + Sync {
    fn utxo(&self, input_id: &Id) -> Option<Utxo>;
}

/// A thread-safe in-memory UTXO set.
///
/// All mutation goes through one write lock, so
/// [`spend_and_produce`](Self::spend_and_produce) is atomic with respect to
/// every other reader and writer: two transactions spending the same output
/// can never both succeed.
#[derive(Debug, Default)]
pub struct MemoryUtxoState {
    utxos: RwLock<HashMap<Id, Utxo>>,
}

impl MemoryUtxoState {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or overwrite) an output. Used for genesis and tests.
    pub fn put(&self, utxo: Utxo) {
        self.utxos.write().insert(utxo.input_id(), utxo);
    }

    /// Remove one output by store key.
    pub fn remove(&self, input_id: &Id) -> Option<Utxo> {
        self.utxos.write().remove(input_id)
    }

    /// Whether the output keyed `input_id` is unspent.
    pub fn contains(&self, input_id: &Id) -> bool {
        self.utxos.read().contains_key(input_id)
    }

    /// Remove every `consumed` output and insert every `produced` one, or
    /// change nothing.
    ///
    /// Fails with [`StateError::MissingUtxo`] if any consumed id is absent
    /// or listed twice.
    pub fn spend_and_produce(&self, consumed: &[Id], produced: Vec<Utxo>) -> Result<(), StateError> {
        let mut utxos = self.utxos.write();

        let mut seen = HashSet::with_capacity(consumed.len());
        for id in consumed {
            if !seen.insert(*id) || !utxos.contains_key(id) {
                return Err(StateError::MissingUtxo(*id));
            }
        }

        for id in consumed {
            utxos.remove(id);
        }
        for utxo in produced {
            utxos.insert(utxo.input_id(), utxo);
        }
        trace!(consumed = consumed.len(), total = utxos.len(), "utxo set updated");
        Ok(())
    }

    /// Number of unspent outputs.
    pub fn len(&self) -> usize {
        self.utxos.read().len()
    }

    /// `true` when the set holds nothing.
    pub fn is_empty(&self) -> bool {
        self.utxos.read().is_empty()
    }
}

impl UtxoState for MemoryUtxoState {
    fn utxo(&self, input_id: &Id) -> Option<Utxo> {
        self.utxos.read().get(input_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::components::{Payload, UtxoId};

    fn utxo(tx: u8, index: u32) -> Utxo {
        Utxo {
            utxo_id: UtxoId::new(Id::new([tx; 32]), index),
            asset_id: Id::new([1; 32]),
            amount: 10,
            out: Payload::new(1, Vec::new()),
        }
    }

    #[test]
    fn put_and_get() {
        let state = MemoryUtxoState::new();
        assert!(state.is_empty());
        let u = utxo(1, 0);
        state.put(u.clone());
        assert_eq!(state.utxo(&u.input_id()), Some(u.clone()));
        assert!(state.contains(&u.input_id()));
        assert_eq!(state.remove(&u.input_id()), Some(u));
        assert!(state.is_empty());
    }

    #[test]
    fn spend_and_produce_applies_everything() {
        let state = MemoryUtxoState::new();
        let a = utxo(1, 0);
        let b = utxo(1, 1);
        state.put(a.clone());
        state.put(b.clone());

        let c = utxo(2, 0);
        state
            .spend_and_produce(&[a.input_id(), b.input_id()], vec![c.clone()])
            .unwrap();

        assert_eq!(state.len(), 1);
        assert!(state.utxo(&a.input_id()).is_none());
        assert_eq!(state.utxo(&c.input_id()), Some(c));
    }

    #[test]
    fn spend_and_produce_is_all_or_nothing() {
        let state = MemoryUtxoState::new();
        let a = utxo(1, 0);
        state.put(a.clone());
        let missing = utxo(9, 0).input_id();

        let err = state
            .spend_and_produce(&[a.input_id(), missing], vec![utxo(2, 0)])
            .unwrap_err();
        assert_eq!(err, StateError::MissingUtxo(missing));
        assert_eq!(state.len(), 1);
        assert!(state.contains(&a.input_id()));
    }

    #[test]
    fn duplicate_consumed_id_is_rejected() {
        let state = MemoryUtxoState::new();
        let a = utxo(1, 0);
        state.put(a.clone());
        assert_eq!(
            state.spend_and_produce(&[a.input_id(), a.input_id()], Vec::new()),
            Err(StateError::MissingUtxo(a.input_id()))
        );
        assert!(state.contains(&a.input_id()));
    }

    #[test]
    fn concurrent_spends_of_one_output_have_one_winner() {
        let state = Arc::new(MemoryUtxoState::new());
        let a = utxo(1, 0);
        state.put(a.clone());

        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let state = Arc::clone(&state);
                let id = a.input_id();
                thread::spawn(move || state.spend_and_produce(&[id], vec![utxo(100 + i, 0)]).is_ok())
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(winners, 1);
        assert_eq!(state.len(), 1);
    }
}
