//! # Ledger State
//!
//! The verification pipeline reads two external collaborators:
//!
//! ```text
//! utxo.rs — UtxoState: the set of unspent outputs of decided transactions
//! pool.rs — AncestorSource: transactions issued but not yet decided
//! ```
//!
//! Both are traits so a node can back them with durable storage and its
//! consensus engine. [`MemoryUtxoState`] and [`TxPool`] are the in-memory
//! implementations the [`Ledger`](crate::ledger::Ledger) uses.

pub mod pool;
pub mod utxo;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::Id;

pub use pool::{Ancestor, AncestorSource, TxPool};
pub use utxo::{MemoryUtxoState, UtxoState};

/// Consensus status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    /// Never seen.
    #[default]
    Unknown,
    /// Issued and awaiting a decision.
    Processing,
    Rejected,
    Accepted,
}

impl Status {
    /// `true` once consensus has ruled either way.
    pub fn decided(&self) -> bool {
        matches!(self, Status::Rejected | Status::Accepted)
    }

    /// `true` for statuses that have been observed at all.
    pub fn fetched(&self) -> bool {
        !matches!(self, Status::Unknown)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Status::Unknown => "unknown",
            Status::Processing => "processing",
            Status::Rejected => "rejected",
            Status::Accepted => "accepted",
        };
        f.write_str(s)
    }
}

/// Errors raised by state mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// A consumed output is not (or no longer) in the store.
    #[error("utxo {0} not found")]
    MissingUtxo(Id),
}
