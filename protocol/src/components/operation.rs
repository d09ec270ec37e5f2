//! Extension-defined operations: consume UTXOs of one asset and produce new
//! outputs of that asset under rules only the extension understands (minting,
//! NFT transfer, ...).

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::payload::Payload;
use super::utxo::UtxoId;
use crate::codec::{compare_packed, is_sorted_and_unique, is_sorted_packed, Packable, Packer};
use crate::ids::Id;
use crate::transaction::TxError;

/// One UTXO consumed by an operation, with its extension-owned proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperableInput {
    pub utxo_id: UtxoId,
    pub input: Payload,
}

impl OperableInput {
    /// Store key of the output this input spends.
    pub fn input_id(&self) -> Id {
        self.utxo_id.input_id()
    }
}

impl Packable for OperableInput {
    fn pack(&self, p: &mut Packer) {
        self.utxo_id.pack(p);
        self.input.pack(p);
    }

    fn unpack(p: &mut Packer) -> Self {
        Self {
            utxo_id: UtxoId::unpack(p),
            input: Payload::unpack(p),
        }
    }
}

/// A bundle of inputs and outputs of a single asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub asset_id: Id,
    pub ins: Vec<OperableInput>,
    pub outs: Vec<Payload>,
}

impl Operation {
    /// Structural checks: a named asset, inputs strictly ordered by UTXO id,
    /// outputs ordered by encoding.
    pub fn verify(&self) -> Result<(), TxError> {
        if self.asset_id.is_empty() {
            return Err(TxError::EmptyAssetId);
        }
        let utxo_ids: Vec<UtxoId> = self.ins.iter().map(|i| i.utxo_id).collect();
        if !is_sorted_and_unique(&utxo_ids) {
            return Err(TxError::InputsNotSortedUnique);
        }
        if !is_sorted_packed(&self.outs) {
            return Err(TxError::OutputsNotSorted);
        }
        Ok(())
    }

    /// Payload whose type id picks the extension: the first input, else the
    /// first output. An empty operation has none.
    pub fn dispatch_payload(&self) -> Option<&Payload> {
        self.ins
            .first()
            .map(|i| &i.input)
            .or_else(|| self.outs.first())
    }

    /// Canonical order: asset id bytes, then the full encoding.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.asset_id
            .cmp(&other.asset_id)
            .then_with(|| compare_packed(self, other))
    }
}

impl Packable for Operation {
    fn pack(&self, p: &mut Packer) {
        p.pack_id(&self.asset_id);
        self.ins.pack(p);
        self.outs.pack(p);
    }

    fn unpack(p: &mut Packer) -> Self {
        Self {
            asset_id: p.unpack_id(),
            ins: Vec::unpack(p),
            outs: Vec::unpack(p),
        }
    }
}

/// Strictly increasing under [`Operation::canonical_cmp`].
pub fn is_sorted_and_unique_operations(ops: &[Operation]) -> bool {
    ops.windows(2)
        .all(|w| w[0].canonical_cmp(&w[1]) == Ordering::Less)
}

/// Put operations into canonical order.
pub fn sort_operations(ops: &mut [Operation]) {
    ops.sort_by(Operation::canonical_cmp);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(asset: u8, inputs: &[(u8, u32)], outs: &[u8]) -> Operation {
        Operation {
            asset_id: Id::new([asset; 32]),
            ins: inputs
                .iter()
                .map(|&(tx, idx)| OperableInput {
                    utxo_id: UtxoId::new(Id::new([tx; 32]), idx),
                    input: Payload::new(10, vec![tx]),
                })
                .collect(),
            outs: outs.iter().map(|&b| Payload::new(11, vec![b])).collect(),
        }
    }

    #[test]
    fn verify_accepts_canonical_operation() {
        assert!(op(1, &[(1, 0), (1, 1), (2, 0)], &[1, 2, 2]).verify().is_ok());
    }

    #[test]
    fn verify_rejects_empty_asset() {
        let mut o = op(1, &[(1, 0)], &[]);
        o.asset_id = Id::EMPTY;
        assert_eq!(o.verify(), Err(TxError::EmptyAssetId));
    }

    #[test]
    fn verify_rejects_unsorted_or_duplicate_inputs() {
        assert_eq!(
            op(1, &[(2, 0), (1, 0)], &[]).verify(),
            Err(TxError::InputsNotSortedUnique)
        );
        assert_eq!(
            op(1, &[(1, 0), (1, 0)], &[]).verify(),
            Err(TxError::InputsNotSortedUnique)
        );
    }

    #[test]
    fn verify_rejects_unsorted_outputs() {
        assert_eq!(
            op(1, &[], &[3, 1]).verify(),
            Err(TxError::OutputsNotSorted)
        );
    }

    #[test]
    fn dispatch_prefers_first_input() {
        let o = op(1, &[(1, 0)], &[5]);
        assert_eq!(o.dispatch_payload().map(|p| p.type_id), Some(10));

        let outs_only = op(1, &[], &[5]);
        assert_eq!(outs_only.dispatch_payload().map(|p| p.type_id), Some(11));

        assert!(op(1, &[], &[]).dispatch_payload().is_none());
    }

    #[test]
    fn canonical_order_is_asset_then_encoding() {
        let a = op(1, &[(9, 0)], &[]);
        let b = op(2, &[(1, 0)], &[]);
        assert_eq!(a.canonical_cmp(&b), Ordering::Less);

        let same_asset_low = op(1, &[(1, 0)], &[]);
        let same_asset_high = op(1, &[(2, 0)], &[]);
        assert_eq!(same_asset_low.canonical_cmp(&same_asset_high), Ordering::Less);

        assert!(is_sorted_and_unique_operations(&[a.clone(), b.clone()]));
        assert!(!is_sorted_and_unique_operations(&[b.clone(), a.clone()]));
        assert!(!is_sorted_and_unique_operations(&[a.clone(), a.clone()]));

        let mut ops = vec![b.clone(), same_asset_high.clone(), a.clone()];
        sort_operations(&mut ops);
        assert!(is_sorted_and_unique_operations(&ops));
    }
}
