//! # Ledger
//!
//! Ties the pieces together for a single chain: parse bytes into a [`Tx`],
//! verify it against the UTXO set and pending pool, hold it while consensus
//! decides, then apply or discard it.
//!
//! ```text
//! bytes ─► parse_tx ─► issue ─► (Processing) ─► accept ─► UTXO set updated
//!                                     └───────► reject
//! ```

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::codec::PackerError;
use crate::components::{Utxo, UtxoId};
use crate::config::{network_name, LedgerConfig};
use crate::fx::FxRegistry;
use crate::ids::Id;
use crate::state::{MemoryUtxoState, StateError, Status, TxPool, UtxoState};
use crate::transaction::{SyntaxContext, Tx, TxError, Verifier};

/// Everything the ledger facade can refuse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("transaction rejected: {0}")]
    Tx(#[from] TxError),

    #[error("state update failed: {0}")]
    State(#[from] StateError),

    #[error("transaction {0} was already issued")]
    AlreadyIssued(Id),

    #[error("transaction {0} is unknown")]
    UnknownTx(Id),

    /// Only processing transactions can be accepted or rejected.
    #[error("transaction {tx_id} is {status}, not processing")]
    NotProcessing { tx_id: Id, status: Status },
}

/// A single chain's transaction state, held in memory.
pub struct Ledger {
    config: LedgerConfig,
    fxs: FxRegistry,
    state: MemoryUtxoState,
    pool: TxPool,
}

impl Ledger {
    /// Empty ledger for the chain in `config`, dispatching to `fxs`.
    pub fn new(config: LedgerConfig, fxs: FxRegistry) -> Self {
        info!(
            network = %network_name(config.network_id),
            blockchain_id = %config.blockchain_id,
            fxs = fxs.len(),
            "ledger created"
        );
        Self {
            config,
            fxs,
            state: MemoryUtxoState::new(),
            pool: TxPool::new(),
        }
    }

    /// Configuration this ledger was built with.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Network and chain every transaction must name.
    pub fn syntax_context(&self) -> SyntaxContext {
        SyntaxContext {
            network_id: self.config.network_id,
            blockchain_id: self.config.blockchain_id,
        }
    }

    fn verifier(&self) -> Verifier<'_> {
        Verifier::new(&self.state, &self.pool, &self.fxs, self.syntax_context())
            .with_max_ancestor_depth(self.config.max_ancestor_depth)
    }

    /// Decode a transaction, bounded by the configured maximum size.
    pub fn parse_tx(&self, bytes: &[u8]) -> Result<Tx, LedgerError> {
        Tx::parse(bytes, self.config.max_tx_size).map_err(|err| {
            warn!(size = bytes.len(), error = %err, "unparseable transaction");
            LedgerError::from(err)
        })
    }

    /// Run the full verification pipeline. Returns the outputs `tx` would
    /// produce. A transaction larger than the configured maximum size is
    /// refused however it was built.
    pub fn verify(&self, tx: &Tx) -> Result<Vec<Utxo>, LedgerError> {
        let size = tx.bytes().len();
        if size > self.config.max_tx_size {
            let err = TxError::Codec(PackerError::Overflow {
                needed: size,
                max_size: self.config.max_tx_size,
            });
            warn!(tx_id = %tx.id(), size, error = %err, "transaction too large");
            return Err(err.into());
        }
        self.verifier().verify(tx).map_err(|err| {
            warn!(tx_id = %tx.id(), error = %err, "transaction failed verification");
            LedgerError::from(err)
        })
    }

    /// Verify `tx` and hold it as processing. Returns its id.
    ///
    /// Applies the same size bound as [`Ledger::parse_tx`].
    pub fn issue(&self, tx: Tx) -> Result<Id, LedgerError> {
        let tx_id = tx.id();
        if self.pool.status(&tx_id).fetched() {
            return Err(LedgerError::AlreadyIssued(tx_id));
        }
        self.verify(&tx)?;
        let assets = tx.asset_ids().len();
        if !self.pool.insert(Arc::new(tx), Status::Processing) {
            return Err(LedgerError::AlreadyIssued(tx_id));
        }
        debug!(tx_id = %tx_id, assets, pending = self.pool.len(), "transaction issued");
        Ok(tx_id)
    }

    /// Apply a processing transaction: spend its inputs and add its outputs
    /// in one atomic step, then mark it accepted.
    pub fn accept(&self, tx_id: &Id) -> Result<(), LedgerError> {
        let tx = self.processing(tx_id)?;
        self.state
            .spend_and_produce(&tx.input_ids(), tx.utxos())
            .map_err(|err| {
                warn!(tx_id = %tx_id, error = %err, "accept failed");
                LedgerError::from(err)
            })?;
        self.pool.set_status(tx_id, Status::Accepted);
        info!(tx_id = %tx_id, utxos = self.state.len(), "transaction accepted");
        Ok(())
    }

    /// Discard a processing transaction. The UTXO set is untouched.
    pub fn reject(&self, tx_id: &Id) -> Result<(), LedgerError> {
        self.processing(tx_id)?;
        self.pool.set_status(tx_id, Status::Rejected);
        info!(tx_id = %tx_id, "transaction rejected");
        Ok(())
    }

    fn processing(&self, tx_id: &Id) -> Result<Arc<Tx>, LedgerError> {
        let tx = self.pool.get(tx_id).ok_or(LedgerError::UnknownTx(*tx_id))?;
        match self.pool.status(tx_id) {
            Status::Processing => Ok(tx),
            status => Err(LedgerError::NotProcessing {
                tx_id: *tx_id,
                status,
            }),
        }
    }

    /// Consensus status of `tx_id`; [`Status::Unknown`] if never issued.
    pub fn status(&self, tx_id: &Id) -> Status {
        self.pool.status(tx_id)
    }

    /// Unspent output `utxo_id`, if it is in the set.
    pub fn utxo(&self, utxo_id: &UtxoId) -> Option<Utxo> {
        self.state.utxo(&utxo_id.input_id())
    }

    /// The UTXO set. Exposed for genesis funding and inspection.
    pub fn state(&self) -> &MemoryUtxoState {
        &self.state
    }

    /// Issued transactions and their statuses.
    pub fn pool(&self) -> &TxPool {
        &self.pool
    }

    /// Registered extensions.
    pub fn fxs(&self) -> &FxRegistry {
        &self.fxs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Credential, Operation, Payload, TransferableInput, TransferableOutput};
    use crate::fx::{Fx, FxError};
    use crate::transaction::{BaseTx, UnsignedTx};

    const CHAIN: Id = Id::new([7; 32]);
    const ASSET: Id = Id::new([1; 32]);

    struct AllowAll;

    impl Fx for AllowAll {
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

    fn ledger() -> Ledger {
        let mut fxs = FxRegistry::new();
        let idx = fxs.register(Id::new([0xf0; 32]), Arc::new(AllowAll), &[1]).unwrap();
        fxs.allow_asset(ASSET, idx).unwrap();
        let ledger = Ledger::new(LedgerConfig::new(1, CHAIN), fxs);
        ledger.state().put(Utxo {
            utxo_id: UtxoId::new(Id::new([3; 32]), 0),
            asset_id: ASSET,
            amount: 100,
            out: Payload::new(1, Vec::new()),
        });
        ledger
    }

    fn transfer(from: UtxoId, amount: u64) -> Tx {
        let base = BaseTx {
            network_id: 1,
            blockchain_id: CHAIN,
            outs: vec![TransferableOutput {
                asset_id: ASSET,
                amount,
                output: Payload::new(1, Vec::new()),
            }],
            ins: vec![TransferableInput {
                utxo_id: from,
                asset_id: ASSET,
                amount,
                input: Payload::new(1, Vec::new()),
            }],
        };
        Tx::new(UnsignedTx::Base(base), vec![Credential::new(1, Vec::new())]).unwrap()
    }

    #[test]
    fn issue_accept_moves_utxos() {
        let ledger = ledger();
        let genesis = UtxoId::new(Id::new([3; 32]), 0);
        let tx = transfer(genesis, 100);
        let tx_id = ledger.issue(tx).unwrap();

        assert_eq!(ledger.status(&tx_id), Status::Processing);
        ledger.accept(&tx_id).unwrap();
        assert_eq!(ledger.status(&tx_id), Status::Accepted);
        assert!(ledger.utxo(&genesis).is_none());
        assert!(!ledger.state().contains(&genesis.input_id()));
        assert_eq!(ledger.utxo(&UtxoId::new(tx_id, 0)).map(|u| u.amount), Some(100));
    }

    #[test]
    fn reissue_is_rejected() {
        let ledger = ledger();
        let tx = transfer(UtxoId::new(Id::new([3; 32]), 0), 100);
        let again = tx.clone();
        let tx_id = ledger.issue(tx).unwrap();
        assert_eq!(ledger.issue(again), Err(LedgerError::AlreadyIssued(tx_id)));
    }

    #[test]
    fn reject_leaves_state_alone() {
        let ledger = ledger();
        let tx_id = ledger
            .issue(transfer(UtxoId::new(Id::new([3; 32]), 0), 100))
            .unwrap();
        ledger.reject(&tx_id).unwrap();
        assert_eq!(ledger.status(&tx_id), Status::Rejected);
        assert_eq!(ledger.state().len(), 1);
        assert_eq!(
            ledger.accept(&tx_id),
            Err(LedgerError::NotProcessing {
                tx_id,
                status: Status::Rejected
            })
        );
    }

    #[test]
    fn unknown_tx_cannot_be_decided() {
        let ledger = ledger();
        let id = Id::new([42; 32]);
        assert_eq!(ledger.accept(&id), Err(LedgerError::UnknownTx(id)));
        assert_eq!(ledger.reject(&id), Err(LedgerError::UnknownTx(id)));
    }

    #[test]
    fn parse_respects_configured_size() {
        let mut config = LedgerConfig::new(1, CHAIN);
        config.max_tx_size = 8;
        let ledger = Ledger::new(config, FxRegistry::new());
        let tx = transfer(UtxoId::new(Id::new([3; 32]), 0), 1);
        assert!(matches!(
            ledger.parse_tx(tx.bytes()),
            Err(LedgerError::Tx(TxError::Codec(_)))
        ));
    }

    #[test]
    fn issue_respects_configured_size() {
        let mut fxs = FxRegistry::new();
        let idx = fxs.register(Id::new([0xf0; 32]), Arc::new(AllowAll), &[1]).unwrap();
        fxs.allow_asset(ASSET, idx).unwrap();
        let mut config = LedgerConfig::new(1, CHAIN);
        config.max_tx_size = 8;
        let ledger = Ledger::new(config, fxs);
        let genesis = UtxoId::new(Id::new([3; 32]), 0);
        ledger.state().put(Utxo {
            utxo_id: genesis,
            asset_id: ASSET,
            amount: 1,
            out: Payload::new(1, Vec::new()),
        });

        let tx = transfer(genesis, 1);
        let tx_id = tx.id();
        let size = tx.bytes().len();
        assert_eq!(
            ledger.issue(tx),
            Err(LedgerError::Tx(TxError::Codec(PackerError::Overflow {
                needed: size,
                max_size: 8
            })))
        );
        assert_eq!(ledger.status(&tx_id), Status::Unknown);
    }
}
