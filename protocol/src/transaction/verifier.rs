//! Two-phase transaction verification.
//!
//! Syntactic verification is pure and cheap: it looks only at the
//! transaction. Semantic verification resolves every spent output, either
//! from the UTXO store or from a pending ancestor, and hands each spend to
//! the feature extension that owns its payload type.
//!
//! ```text
//! verify(tx)
//!   ├─ syntactic_verify(tx)
//!   ├─ base inputs:  resolve utxo → asset/amount match → fx.verify_transfer
//!   └─ operations:   resolve utxos → asset match → fx.verify_operation
//!                       │
//!                       └─ resolve via ancestor ─► verify(ancestor), depth + 1
//! ```
//!
//! Ancestor recursion is bounded by `max_ancestor_depth` and refuses to
//! revisit a transaction already on the current chain, whatever id it was
//! requested under. A resolver answer whose id differs from the requested
//! one counts as a missing output. Ancestors that pass are remembered for
//! the rest of the top-level call.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::error::TxError;
use super::tx::Tx;
use crate::components::{Credential, Utxo, UtxoId};
use crate::config::DEFAULT_MAX_ANCESTOR_DEPTH;
use crate::fx::{Fx, FxRegistry};
use crate::ids::Id;
use crate::state::{AncestorSource, UtxoState};

/// What a transaction must agree with to be structurally valid here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxContext {
    pub network_id: u32,
    pub blockchain_id: Id,
}

/// Per-call bookkeeping for ancestor recursion.
#[derive(Default)]
struct Walk {
    /// Transactions on the current chain of ancestors.
    path: HashSet<Id>,
    /// Ancestors that passed verification during this call.
    verified: HashSet<Id>,
    /// Ancestors that failed verification during this call.
    failed: HashSet<Id>,
}

/// Runs the full pipeline against borrowed collaborators. Holds nothing
/// between calls.
pub struct Verifier<'a> {
    utxos: &'a dyn UtxoState,
    ancestors: &'a dyn AncestorSource,
    fxs: &'a FxRegistry,
    ctx: SyntaxContext,
    max_ancestor_depth: usize,
}

impl<'a> Verifier<'a> {
    /// Verifier over `utxos` and `ancestors`, dispatching to `fxs` and
    /// checking structure against `ctx`. Ancestor depth defaults to
    /// [`DEFAULT_MAX_ANCESTOR_DEPTH`].
    pub fn new(
        utxos: &'a dyn UtxoState,
        ancestors: &'a dyn AncestorSource,
        fxs: &'a FxRegistry,
        ctx: SyntaxContext,
    ) -> Self {
        Self {
            utxos,
            ancestors,
            fxs,
            ctx,
            max_ancestor_depth: DEFAULT_MAX_ANCESTOR_DEPTH,
        }
    }

    /// Cap how many pending ancestors deep a single call may recurse.
    pub fn with_max_ancestor_depth(mut self, depth: usize) -> Self {
        self.max_ancestor_depth = depth;
        self
    }

    /// Verify `tx` syntactically and semantically. On success returns the
    /// outputs it would produce.
    pub fn verify(&self, tx: &Tx) -> Result<Vec<Utxo>, TxError> {
        let mut walk = Walk::default();
        self.verify_at(tx, 0, &mut walk)
    }

    fn verify_at(&self, tx: &Tx, depth: usize, walk: &mut Walk) -> Result<Vec<Utxo>, TxError> {
        if depth > self.max_ancestor_depth {
            return Err(TxError::AncestorDepthExceeded(self.max_ancestor_depth));
        }
        let tx_id = tx.id();

        tx.syntactic_verify(&self.ctx)?;
        debug!(tx_id = %tx_id, depth, "syntactic verification passed");

        walk.path.insert(tx_id);
        let result = self
            .verify_base(tx, depth, walk)
            .and_then(|()| self.verify_operations(tx, depth, walk));
        walk.path.remove(&tx_id);
        result?;

        debug!(tx_id = %tx_id, depth, "semantic verification passed");
        Ok(tx.utxos())
    }

    fn verify_base(&self, tx: &Tx, depth: usize, walk: &mut Walk) -> Result<(), TxError> {
        for (i, input) in tx.unsigned().base().ins.iter().enumerate() {
            let utxo = self.resolve(&input.utxo_id, depth, walk)?;
            if utxo.asset_id != input.asset_id {
                return Err(TxError::AssetIdMismatch {
                    expected: utxo.asset_id,
                    got: input.asset_id,
                });
            }
            if utxo.amount != input.amount {
                return Err(TxError::AmountMismatch {
                    claimed: input.amount,
                    actual: utxo.amount,
                });
            }

            let fx_index = self.fxs.fx_index(&input.input).ok_or(TxError::UnknownFx)?;
            let fx = self.usable_fx(fx_index, &utxo.asset_id)?;
            let cred = credential(tx, i)?;
            fx.verify_transfer(tx, input, cred, &utxo)?;
        }
        Ok(())
    }

    fn verify_operations(&self, tx: &Tx, depth: usize, walk: &mut Walk) -> Result<(), TxError> {
        let mut offset = tx.unsigned().base().ins.len();

        for op in tx.unsigned().ops() {
            let mut utxos = Vec::with_capacity(op.ins.len());
            let mut creds = Vec::with_capacity(op.ins.len());
            for input in &op.ins {
                let utxo = self.resolve(&input.utxo_id, depth, walk)?;
                if utxo.asset_id != op.asset_id {
                    return Err(TxError::AssetIdMismatch {
                        expected: op.asset_id,
                        got: utxo.asset_id,
                    });
                }
                utxos.push(utxo);
                creds.push(credential(tx, offset)?);
                offset += 1;
            }

            let fx_index = op
                .dispatch_payload()
                .and_then(|payload| self.fxs.fx_index(payload))
                .ok_or(TxError::UnknownFx)?;
            let fx = self.usable_fx(fx_index, &op.asset_id)?;
            fx.verify_operation(tx, op, &utxos, &creds)?;
        }
        Ok(())
    }

    fn usable_fx(&self, fx_index: usize, asset_id: &Id) -> Result<&Arc<dyn Fx>, TxError> {
        if !self.fxs.verify_fx_usage(fx_index, asset_id) {
            return Err(TxError::IncompatibleFx {
                fx_index,
                asset_id: *asset_id,
            });
        }
        self.fxs.get(fx_index).ok_or(TxError::UnknownFx)
    }

    /// Find the output `utxo_id` refers to: the store first, then an
    /// undecided ancestor that itself verifies.
    fn resolve(&self, utxo_id: &UtxoId, depth: usize, walk: &mut Walk) -> Result<Utxo, TxError> {
        if let Some(utxo) = self.utxos.utxo(&utxo_id.input_id()) {
            return Ok(utxo);
        }

        let (tx_id, output_index) = utxo_id.input_source();
        let missing = TxError::MissingUtxo {
            tx_id,
            output_index,
        };
        if walk.path.contains(&tx_id) {
            return Err(TxError::AncestorCycle(tx_id));
        }

        let Some(ancestor) = self.ancestors.ancestor(&tx_id) else {
            trace!(tx_id = %tx_id, output_index, "ancestor not found");
            return Err(missing);
        };
        let found_id = ancestor.tx.id();
        if walk.path.contains(&found_id) {
            return Err(TxError::AncestorCycle(found_id));
        }
        if found_id != tx_id {
            trace!(tx_id = %tx_id, found = %found_id, "resolver returned a different transaction");
            return Err(missing);
        }
        if ancestor.status.decided() {
            trace!(tx_id = %tx_id, status = %ancestor.status, "ancestor already decided");
            return Err(missing);
        }

        if walk.failed.contains(&tx_id) {
            return Err(missing);
        }
        if !walk.verified.contains(&tx_id) {
            trace!(tx_id = %tx_id, depth = depth + 1, "verifying ancestor");
            match self.verify_at(&ancestor.tx, depth + 1, walk) {
                Ok(_) => {
                    walk.verified.insert(tx_id);
                }
                Err(err @ (TxError::AncestorDepthExceeded(_) | TxError::AncestorCycle(_))) => {
                    return Err(err);
                }
                Err(err) => {
                    trace!(tx_id = %tx_id, error = %err, "ancestor failed verification");
                    walk.failed.insert(tx_id);
                    return Err(missing);
                }
            }
        }

        ancestor
            .tx
            .utxos()
            .into_iter()
            .nth(output_index as usize)
            .ok_or(TxError::InvalidUtxo {
                tx_id,
                output_index,
            })
    }
}

/// Credential at input position `index`. Syntactic verification guarantees
/// it exists.
fn credential(tx: &Tx, index: usize) -> Result<&Credential, TxError> {
    tx.creds().get(index).ok_or_else(|| {
        debug_assert!(false, "credential {index} missing after syntactic verification");
        TxError::CredentialCount {
            expected: index + 1,
            got: tx.creds().len(),
        }
    })
}
