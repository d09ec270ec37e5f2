//! Signed transactions and their canonical bytes.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::base_tx::BaseTx;
use super::error::TxError;
use super::operation_tx::OperationTx;
use super::verifier::SyntaxContext;
use crate::codec::{Packable, Packer, PackerError};
use crate::components::{Credential, Operation, Utxo, UtxoId};
use crate::config::{BASE_TX_TYPE_ID, MAX_TX_SIZE, OPERATION_TX_TYPE_ID};
use crate::crypto::hash::sha256_array;
use crate::ids::{Id, IdSet};

// ---------------------------------------------------------------------------
// UnsignedTx
// ---------------------------------------------------------------------------

/// The signed-over body of a transaction, tagged on the wire by a `u32`
/// type id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnsignedTx {
    Base(BaseTx),
    Operation(OperationTx),
}

impl UnsignedTx {
    /// Wire tag for this body.
    pub fn type_id(&self) -> u32 {
        match self {
            UnsignedTx::Base(_) => BASE_TX_TYPE_ID,
            UnsignedTx::Operation(_) => OPERATION_TX_TYPE_ID,
        }
    }

    /// The transfer part, present in every body.
    pub fn base(&self) -> &BaseTx {
        match self {
            UnsignedTx::Base(base) => base,
            UnsignedTx::Operation(tx) => &tx.base,
        }
    }

    /// Operations, empty for a plain transfer.
    pub fn ops(&self) -> &[Operation] {
        match self {
            UnsignedTx::Base(_) => &[],
            UnsignedTx::Operation(tx) => &tx.ops,
        }
    }

    /// Base inputs plus every operation input; one credential is needed per
    /// input.
    pub fn num_inputs(&self) -> usize {
        self.base().ins.len() + self.ops().iter().map(|op| op.ins.len()).sum::<usize>()
    }

    /// Every asset touched by the base transfer or by an operation.
    pub fn asset_ids(&self) -> IdSet {
        let mut assets = self.base().asset_ids();
        assets.extend(self.ops().iter().map(|op| op.asset_id));
        assets
    }

    /// Body checks only; credentials are checked by [`Tx::syntactic_verify`].
    pub fn syntactic_verify(&self, ctx: &SyntaxContext) -> Result<(), TxError> {
        match self {
            UnsignedTx::Base(base) => base.syntactic_verify(ctx),
            UnsignedTx::Operation(tx) => tx.syntactic_verify(ctx),
        }
    }
}

impl Packable for UnsignedTx {
    fn pack(&self, p: &mut Packer) {
        p.pack_int(self.type_id());
        match self {
            UnsignedTx::Base(base) => base.pack(p),
            UnsignedTx::Operation(tx) => tx.pack(p),
        }
    }

    fn unpack(p: &mut Packer) -> Self {
        match p.unpack_int() {
            OPERATION_TX_TYPE_ID => UnsignedTx::Operation(OperationTx::unpack(p)),
            BASE_TX_TYPE_ID => UnsignedTx::Base(BaseTx::unpack(p)),
            other => {
                p.fail(PackerError::UnknownTypeId(other));
                UnsignedTx::Base(BaseTx::unpack(p))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tx
// ---------------------------------------------------------------------------

/// An unsigned body plus one credential per input.
///
/// The canonical bytes and the id (`sha256(bytes)`) are fixed when the value
/// is built, so they are never recomputed and can't drift from the fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tx {
    unsigned: UnsignedTx,
    creds: Vec<Credential>,
    bytes: Vec<u8>,
    id: Id,
}

impl Tx {
    /// Encode `unsigned` and `creds` and derive the id.
    pub fn new(unsigned: UnsignedTx, creds: Vec<Credential>) -> Result<Self, TxError> {
        let mut p = Packer::new(MAX_TX_SIZE);
        unsigned.pack(&mut p);
        creds.pack(&mut p);
        let bytes = p.into_bytes()?;
        Ok(Self::with_bytes(unsigned, creds, bytes))
    }

    /// Decode a transaction of at most `max_size` bytes. The bytes become
    /// the canonical encoding.
    pub fn parse(bytes: &[u8], max_size: usize) -> Result<Self, TxError> {
        if bytes.len() > max_size {
            return Err(PackerError::Overflow {
                needed: bytes.len(),
                max_size,
            }
            .into());
        }
        let mut p = Packer::from_bytes(bytes);
        let unsigned = UnsignedTx::unpack(&mut p);
        let creds = Vec::<Credential>::unpack(&mut p);
        p.finish()?;

        let tx = Self::with_bytes(unsigned, creds, bytes.to_vec());
        debug!(tx_id = %tx.id, size = bytes.len(), "transaction parsed");
        Ok(tx)
    }

    fn with_bytes(unsigned: UnsignedTx, creds: Vec<Credential>, bytes: Vec<u8>) -> Self {
        let id = Id::new(sha256_array(&bytes));
        Self {
            unsigned,
            creds,
            bytes,
            id,
        }
    }

    /// `sha256` of [`Tx::bytes`].
    pub fn id(&self) -> Id {
        self.id
    }

    /// Canonical encoding, credentials included.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The signed-over body.
    pub fn unsigned(&self) -> &UnsignedTx {
        &self.unsigned
    }

    /// One credential per input, base inputs first.
    pub fn creds(&self) -> &[Credential] {
        &self.creds
    }

    /// See [`UnsignedTx::asset_ids`].
    pub fn asset_ids(&self) -> IdSet {
        self.unsigned.asset_ids()
    }

    /// Outputs this transaction creates: base outputs at indices `0..n`,
    /// then each operation's outputs, tagged with the operation's asset and
    /// a zero amount.
    pub fn utxos(&self) -> Vec<Utxo> {
        let base = self.unsigned.base();
        let mut utxos = Vec::with_capacity(base.outs.len());
        let mut index = 0u32;

        for out in &base.outs {
            utxos.push(Utxo {
                utxo_id: UtxoId::new(self.id, index),
                asset_id: out.asset_id,
                amount: out.amount,
                out: out.output.clone(),
            });
            index += 1;
        }
        for op in self.unsigned.ops() {
            for out in &op.outs {
                utxos.push(Utxo {
                    utxo_id: UtxoId::new(self.id, index),
                    asset_id: op.asset_id,
                    amount: 0,
                    out: out.clone(),
                });
                index += 1;
            }
        }
        utxos
    }

    /// Store keys of every output this transaction consumes.
    pub fn input_ids(&self) -> Vec<Id> {
        let mut ids: Vec<Id> = self.unsigned.base().input_ids().collect();
        for op in self.unsigned.ops() {
            ids.extend(op.ins.iter().map(|i| i.input_id()));
        }
        ids
    }

    /// Structural verification, see [`syntactic_verify`].
    pub fn syntactic_verify(&self, ctx: &SyntaxContext) -> Result<(), TxError> {
        syntactic_verify(Some(self), ctx)
    }
}

/// Checks that need no state: a transaction is present, it carries one
/// credential per input, and its body is well formed.
pub fn syntactic_verify(tx: Option<&Tx>, ctx: &SyntaxContext) -> Result<(), TxError> {
    let tx = tx.ok_or(TxError::NilTx)?;

    let expected = tx.unsigned.num_inputs();
    if tx.creds.len() != expected {
        return Err(TxError::CredentialCount {
            expected,
            got: tx.creds.len(),
        });
    }

    tx.unsigned.syntactic_verify(ctx)
}
