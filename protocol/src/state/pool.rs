//! Pending transactions and their statuses.

use std::sync::Arc;

use dashmap::DashMap;

use super::Status;
use crate::ids::Id;
use crate::transaction::Tx;

/// A transaction known to the resolver, with its current status.
#[derive(Debug, Clone)]
pub struct Ancestor {
    pub tx: Arc<Tx>,
    pub status: Status,
}

/// Resolves transaction ids to transactions that are known but whose
/// outputs may not be in the UTXO store yet.
pub trait AncestorSource: Send + Sync {
    fn ancestor(&self, tx_id: &Id) -> Option<Ancestor>;
}

/// A thread-safe pool of issued transactions keyed by id.
#[derive(Debug, Default)]
pub struct TxPool {
    txs: DashMap<Id, Ancestor>,
}

impl TxPool {
    /// Empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `tx` with `status`. Returns `false` and changes nothing if a
    /// transaction with the same id is already present.
    pub fn insert(&self, tx: Arc<Tx>, status: Status) -> bool {
        match self.txs.entry(tx.id()) {
            dashmap::mapref::entry::Entry::Occupied(_) => false,
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(Ancestor { tx, status });
                true
            }
        }
    }

    /// Status of `tx_id`; [`Status::Unknown`] if never inserted.
    pub fn status(&self, tx_id: &Id) -> Status {
        self.txs
            .get(tx_id)
            .map(|entry| entry.status)
            .unwrap_or_default()
    }

    /// Update the status of a pooled transaction. Returns `false` if absent.
    pub fn set_status(&self, tx_id: &Id, status: Status) -> bool {
        match self.txs.get_mut(tx_id) {
            Some(mut entry) => {
                entry.status = status;
                true
            }
            None => false,
        }
    }

    /// The pooled transaction, whatever its status.
    pub fn get(&self, tx_id: &Id) -> Option<Arc<Tx>> {
        self.txs.get(tx_id).map(|entry| Arc::clone(&entry.tx))
    }

    /// Drop `tx_id` from the pool, returning its entry.
    pub fn remove(&self, tx_id: &Id) -> Option<Ancestor> {
        self.txs.remove(tx_id).map(|(_, entry)| entry)
    }

    /// Number of pooled transactions.
    pub fn len(&self) -> usize {
        self.txs.len()
    }

    /// `true` when nothing is pooled.
    pub fn is_empty(&self) -> bool {
        self.txs.is_empty()
    }
}

impl AncestorSource for TxPool {
    fn ancestor(&self, tx_id: &Id) -> Option<Ancestor> {
        self.txs.get(tx_id).map(|entry| entry.clone())
    }
}
