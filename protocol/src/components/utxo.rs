//! Unspent outputs and the ids that reference them.

use serde::{Deserialize, Serialize};

use super::payload::Payload;
use crate::codec::{Packable, Packer};
use crate::ids::Id;

// ---------------------------------------------------------------------------
// UtxoId
// ---------------------------------------------------------------------------

/// Reference to output `output_index` of transaction `tx_id`.
///
/// Ordered by `(tx_id, output_index)`, the canonical input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UtxoId {
    /// Transaction that produced the output.
    pub tx_id: Id,
    /// Position of the output within that transaction's produced outputs.
    pub output_index: u32,
}

impl UtxoId {
    /// Create a reference.
    pub fn new(tx_id: Id, output_index: u32) -> Self {
        Self {
            tx_id,
            output_index,
        }
    }

    /// Key of the referenced output in the UTXO store:
    /// `tx_id.prefix(output_index)`.
    pub fn input_id(&self) -> Id {
        self.tx_id.prefix(u64::from(self.output_index))
    }

    /// The `(transaction, index)` pair used to resolve the output against a
    /// pending ancestor when the store doesn't have it.
    pub fn input_source(&self) -> (Id, u32) {
        (self.tx_id, self.output_index)
    }
}

impl Packable for UtxoId {
    fn pack(&self, p: &mut Packer) {
        p.pack_id(&self.tx_id);
        p.pack_int(self.output_index);
    }

    fn unpack(p: &mut Packer) -> Self {
        Self {
            tx_id: p.unpack_id(),
            output_index: p.unpack_int(),
        }
    }
}

// ---------------------------------------------------------------------------
// Utxo
// ---------------------------------------------------------------------------

/// An unspent output.
///
/// Created when its transaction is accepted, removed when a later accepted
/// transaction spends it, never modified in between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    /// Where the output came from.
    pub utxo_id: UtxoId,
    /// Asset the output holds.
    pub asset_id: Id,
    /// Fungible quantity. Outputs produced by operations hold zero.
    pub amount: u64,
    /// Extension-defined output (owners, thresholds, NFT payload, ...).
    pub out: Payload,
}

impl Utxo {
    /// Store key, see [`UtxoId::input_id`].
    pub fn input_id(&self) -> Id {
        self.utxo_id.input_id()
    }
}

impl Packable for Utxo {
    fn pack(&self, p: &mut Packer) {
        self.utxo_id.pack(p);
        p.pack_id(&self.asset_id);
        p.pack_long(self.amount);
        self.out.pack(p);
    }

    fn unpack(p: &mut Packer) -> Self {
        Self {
            utxo_id: UtxoId::unpack(p),
            asset_id: p.unpack_id(),
            amount: p.unpack_long(),
            out: Payload::unpack(p),
        }
    }
}
