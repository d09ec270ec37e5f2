//! # Feature Extensions
//!
//! The ledger core decides *which* extension judges a spend; the extension
//! decides *whether* the spend is authorized. Dispatch is explicit: each
//! extension claims a set of payload type ids at registration, and each asset
//! lists the extensions allowed to move it.
//!
//! ```text
//! payload.type_id ──► FxRegistry::fx_index ──► verify_fx_usage(idx, asset)
//!                                                 │
//!                                                 ▼
//!                                Fx::verify_transfer / verify_operation
//! ```
//!
//! A type id belongs to at most one extension, so dispatch can never match
//! two candidates.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::components::{Credential, Operation, Payload, TransferableInput, Utxo};
use crate::ids::Id;
use crate::transaction::Tx;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised by extensions and by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FxError {
    /// The extension refused the spend. The message is extension-defined.
    #[error("{0}")]
    Rejected(String),

    #[error("extension {0} is already registered")]
    DuplicateFx(Id),

    #[error("type id {type_id} is already claimed by extension {fx_index}")]
    TypeIdClaimed { type_id: u32, fx_index: usize },

    #[error("no extension at index {0}")]
    UnknownIndex(usize),
}

impl FxError {
    /// Shorthand for an extension refusing a spend.
    pub fn rejected(msg: impl Into<String>) -> Self {
        FxError::Rejected(msg.into())
    }
}

// ---------------------------------------------------------------------------
// Fx
// ---------------------------------------------------------------------------

/// A pluggable verifier for one family of payloads.
pub trait Fx: Send + Sync {
    /// Check that `cred` authorizes `input` to spend `utxo` within `tx`.
    fn verify_transfer(
        &self,
        tx: &Tx,
        input: &TransferableInput,
        cred: &Credential,
        utxo: &Utxo,
    ) -> Result<(), FxError>;

    /// Check an operation. `utxos[i]` and `creds[i]` belong to `op.ins[i]`.
    fn verify_operation(
        &self,
        tx: &Tx,
        op: &Operation,
        utxos: &[Utxo],
        creds: &[&Credential],
    ) -> Result<(), FxError>;
}

// ---------------------------------------------------------------------------
// FxRegistry
// ---------------------------------------------------------------------------

struct RegisteredFx {
    id: Id,
    fx: Arc<dyn Fx>,
}

/// Registered extensions, the payload type ids each one owns, and the
/// (extension, asset) pairs that may be used together.
#[derive(Default)]
pub struct FxRegistry {
    fxs: Vec<RegisteredFx>,
    type_ids: HashMap<u32, usize>,
    allowed: HashSet<(usize, Id)>,
}

impl FxRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `fx` under `fx_id`, claiming `type_ids`. Returns the index
    /// assigned to the extension.
    ///
    /// Nothing is registered if any type id is already claimed.
    pub fn register(
        &mut self,
        fx_id: Id,
        fx: Arc<dyn Fx>,
        type_ids: &[u32],
    ) -> Result<usize, FxError> {
        if self.fxs.iter().any(|r| r.id == fx_id) {
            return Err(FxError::DuplicateFx(fx_id));
        }
        let index = self.fxs.len();
        let mut claimed = HashSet::new();
        for &type_id in type_ids {
            if let Some(&owner) = self.type_ids.get(&type_id) {
                return Err(FxError::TypeIdClaimed {
                    type_id,
                    fx_index: owner,
                });
            }
            if !claimed.insert(type_id) {
                return Err(FxError::TypeIdClaimed {
                    type_id,
                    fx_index: index,
                });
            }
        }
        for type_id in claimed {
            self.type_ids.insert(type_id, index);
        }
        self.fxs.push(RegisteredFx { id: fx_id, fx });
        debug!(fx_id = %fx_id, fx_index = index, type_ids = type_ids.len(), "extension registered");
        Ok(index)
    }

    /// Index of the extension owning `payload`'s type id.
    pub fn fx_index(&self, payload: &Payload) -> Option<usize> {
        self.type_ids.get(&payload.type_id).copied()
    }

    /// Permit extension `fx_index` to move `asset_id`.
    pub fn allow_asset(&mut self, asset_id: Id, fx_index: usize) -> Result<(), FxError> {
        if fx_index >= self.fxs.len() {
            return Err(FxError::UnknownIndex(fx_index));
        }
        self.allowed.insert((fx_index, asset_id));
        Ok(())
    }

    /// Whether extension `fx_index` may be used with `asset_id`.
    pub fn verify_fx_usage(&self, fx_index: usize, asset_id: &Id) -> bool {
        self.allowed.contains(&(fx_index, *asset_id))
    }

    /// Extension at `fx_index`, if registered.
    pub fn get(&self, fx_index: usize) -> Option<&Arc<dyn Fx>> {
        self.fxs.get(fx_index).map(|r| &r.fx)
    }

    /// Id the extension at `fx_index` was registered under.
    pub fn fx_id(&self, fx_index: usize) -> Option<Id> {
        self.fxs.get(fx_index).map(|r| r.id)
    }

    /// Number of registered extensions.
    pub fn len(&self) -> usize {
        self.fxs.len()
    }

    /// `true` before the first registration.
    pub fn is_empty(&self) -> bool {
        self.fxs.is_empty()
    }
}

impl fmt::Debug for FxRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FxRegistry")
            .field("fxs", &self.fxs.iter().map(|r| r.id).collect::<Vec<_>>())
            .field("type_ids", &self.type_ids.len())
            .field("allowed", &self.allowed.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    impl Fx for Noop {
        fn verify_transfer(
            &self,
            _: &Tx,
            _: &TransferableInput,
            _: &Credential,
            _: &Utxo,
        ) -> Result<(), FxError> {
            Ok(())
        }

        fn verify_operation(
            &self,
            _: &Tx,
            _: &Operation,
            _: &[Utxo],
            _: &[&Credential],
        ) -> Result<(), FxError> {
            Ok(())
        }
    }

    fn fx_id(b: u8) -> Id {
        Id::new([b; 32])
    }

    #[test]
    fn register_assigns_sequential_indices() {
        let mut reg = FxRegistry::new();
        assert!(reg.is_empty());
        assert_eq!(reg.register(fx_id(1), Arc::new(Noop), &[1, 2]), Ok(0));
        assert_eq!(reg.register(fx_id(2), Arc::new(Noop), &[3]), Ok(1));
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.fx_id(1), Some(fx_id(2)));
        assert!(reg.get(1).is_some());
        assert!(reg.get(2).is_none());
    }

    #[test]
    fn dispatch_by_type_id() {
        let mut reg = FxRegistry::new();
        reg.register(fx_id(1), Arc::new(Noop), &[1, 2]).unwrap();
        reg.register(fx_id(2), Arc::new(Noop), &[7]).unwrap();

        assert_eq!(reg.fx_index(&Payload::new(2, Vec::new())), Some(0));
        assert_eq!(reg.fx_index(&Payload::new(7, Vec::new())), Some(1));
        assert_eq!(reg.fx_index(&Payload::new(99, Vec::new())), None);
    }

    #[test]
    fn claimed_type_id_is_rejected() {
        let mut reg = FxRegistry::new();
        reg.register(fx_id(1), Arc::new(Noop), &[1]).unwrap();
        assert_eq!(
            reg.register(fx_id(2), Arc::new(Noop), &[4, 1]),
            Err(FxError::TypeIdClaimed {
                type_id: 1,
                fx_index: 0
            })
        );
        // Nothing from the failed registration leaked in.
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.fx_index(&Payload::new(4, Vec::new())), None);
    }

    #[test]
    fn duplicate_fx_id_is_rejected() {
        let mut reg = FxRegistry::new();
        reg.register(fx_id(1), Arc::new(Noop), &[1]).unwrap();
        assert_eq!(
            reg.register(fx_id(1), Arc::new(Noop), &[2]),
            Err(FxError::DuplicateFx(fx_id(1)))
        );
    }

    #[test]
    fn asset_compatibility() {
        let mut reg = FxRegistry::new();
        let idx = reg.register(fx_id(1), Arc::new(Noop), &[1]).unwrap();
        let asset = Id::new([9; 32]);

        assert!(!reg.verify_fx_usage(idx, &asset));
        reg.allow_asset(asset, idx).unwrap();
        assert!(reg.verify_fx_usage(idx, &asset));
        assert!(!reg.verify_fx_usage(idx, &Id::new([8; 32])));
        assert_eq!(reg.allow_asset(asset, 5), Err(FxError::UnknownIndex(5)));
    }
}
