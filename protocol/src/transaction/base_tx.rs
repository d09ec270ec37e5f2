//! Plain value-transfer transactions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::TxError;
use super::verifier::SyntaxContext;
use crate::codec::{is_sorted_and_unique, is_sorted_packed, Packable, Packer};
use crate::components::{TransferableInput, TransferableOutput, UtxoId};
use crate::ids::{Id, IdSet};

/// Moves fungible amounts from consumed UTXOs to new outputs.
///
/// Outputs must be sorted by encoding and inputs strictly sorted by UTXO id,
/// so a given set of moves has exactly one encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseTx {
    pub network_id: u32,
    pub blockchain_id: Id,
    pub outs: Vec<TransferableOutput>,
    pub ins: Vec<TransferableInput>,
}

impl BaseTx {
    /// Store keys of the outputs this transaction spends.
    pub fn input_ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.ins.iter().map(TransferableInput::input_id)
    }

    /// Every asset this transaction consumes or produces.
    pub fn asset_ids(&self) -> IdSet {
        self.ins
            .iter()
            .map(|input| input.asset_id)
            .chain(self.outs.iter().map(|out| out.asset_id))
            .collect()
    }

    /// Structural checks:
    ///
    /// 1. network and chain match `ctx`
    /// 2. every output and input is well formed
    /// 3. outputs sorted, inputs sorted and unique
    /// 4. per asset, consumed >= produced, without overflow
    pub fn syntactic_verify(&self, ctx: &SyntaxContext) -> Result<(), TxError> {
        if self.network_id != ctx.network_id {
            return Err(TxError::WrongNetworkId {
                expected: ctx.network_id,
                got: self.network_id,
            });
        }
        if self.blockchain_id != ctx.blockchain_id {
            return Err(TxError::WrongChainId {
                expected: ctx.blockchain_id,
                got: self.blockchain_id,
            });
        }

        for out in &self.outs {
            out.verify()?;
        }
        if !is_sorted_packed(&self.outs) {
            return Err(TxError::OutputsNotSorted);
        }

        for input in &self.ins {
            input.verify()?;
        }
        let utxo_ids: Vec<UtxoId> = self.ins.iter().map(|i| i.utxo_id).collect();
        if !is_sorted_and_unique(&utxo_ids) {
            return Err(TxError::InputsNotSortedUnique);
        }

        self.verify_flow()
    }

    fn verify_flow(&self) -> Result<(), TxError> {
        let mut consumed: BTreeMap<Id, u64> = BTreeMap::new();
        for input in &self.ins {
            add_amount(&mut consumed, input.asset_id, input.amount)?;
        }
        let mut produced: BTreeMap<Id, u64> = BTreeMap::new();
        for out in &self.outs {
            add_amount(&mut produced, out.asset_id, out.amount)?;
        }

        for (asset_id, &produced) in &produced {
            let consumed = consumed.get(asset_id).copied().unwrap_or(0);
            if consumed < produced {
                return Err(TxError::InsufficientFunds {
                    asset_id: *asset_id,
                    consumed,
                    produced,
                });
            }
        }
        Ok(())
    }
}

fn add_amount(totals: &mut BTreeMap<Id, u64>, asset_id: Id, amount: u64) -> Result<(), TxError> {
    let total = totals.entry(asset_id).or_insert(0);
    *total = total
        .checked_add(amount)
        .ok_or(TxError::AmountOverflow(asset_id))?;
    Ok(())
}

impl Packable for BaseTx {
    fn pack(&self, p: &mut Packer) {
        p.pack_int(self.network_id);
        p.pack_id(&self.blockchain_id);
        self.outs.pack(p);
        self.ins.pack(p);
    }

    fn unpack(p: &mut Packer) -> Self {
        Self {
            network_id: p.unpack_int(),
            blockchain_id: p.unpack_id(),
            outs: Vec::unpack(p),
            ins: Vec::unpack(p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Payload;

    const CHAIN: Id = Id::new([7; 32]);

    fn ctx() -> SyntaxContext {
        SyntaxContext {
            network_id: 1,
            blockchain_id: CHAIN,
        }
    }

    fn asset(b: u8) -> Id {
        Id::new([b; 32])
    }

    fn out(asset_id: Id, amount: u64) -> TransferableOutput {
        TransferableOutput {
            asset_id,
            amount,
            output: Payload::new(1, Vec::new()),
        }
    }

    fn input(tx: u8, index: u32, asset_id: Id, amount: u64) -> TransferableInput {
        TransferableInput {
            utxo_id: UtxoId::new(Id::new([tx; 32]), index),
            asset_id,
            amount,
            input: Payload::new(2, Vec::new()),
        }
    }

    fn base(outs: Vec<TransferableOutput>, ins: Vec<TransferableInput>) -> BaseTx {
        BaseTx {
            network_id: 1,
            blockchain_id: CHAIN,
            outs,
            ins,
        }
    }

    #[test]
    fn asset_ids_include_inputs_and_outputs() {
        let tx = base(
            vec![out(asset(1), 5), out(asset(3), 1)],
            vec![input(1, 0, asset(1), 5), input(1, 1, asset(2), 4)],
        );
        let expected: IdSet = [asset(1), asset(2), asset(3)].into_iter().collect();
        assert_eq!(tx.asset_ids(), expected);
    }

    #[test]
    fn valid_transfer_passes() {
        let tx = base(
            vec![out(asset(1), 4), out(asset(1), 5)],
            vec![input(1, 0, asset(1), 10)],
        );
        assert!(tx.syntactic_verify(&ctx()).is_ok());
    }

    #[test]
    fn wrong_network_or_chain() {
        let mut tx = base(Vec::new(), Vec::new());
        tx.network_id = 2;
        assert_eq!(
            tx.syntactic_verify(&ctx()),
            Err(TxError::WrongNetworkId {
                expected: 1,
                got: 2
            })
        );

        let mut tx = base(Vec::new(), Vec::new());
        tx.blockchain_id = Id::EMPTY;
        assert!(matches!(
            tx.syntactic_verify(&ctx()),
            Err(TxError::WrongChainId { .. })
        ));
    }

    #[test]
    fn unsorted_outputs_rejected() {
        let tx = base(
            vec![out(asset(1), 5), out(asset(1), 4)],
            vec![input(1, 0, asset(1), 10)],
        );
        assert_eq!(tx.syntactic_verify(&ctx()), Err(TxError::OutputsNotSorted));
    }

    #[test]
    fn duplicate_inputs_rejected() {
        let tx = base(
            Vec::new(),
            vec![input(1, 0, asset(1), 10), input(1, 0, asset(1), 10)],
        );
        assert_eq!(
            tx.syntactic_verify(&ctx()),
            Err(TxError::InputsNotSortedUnique)
        );
    }

    #[test]
    fn producing_more_than_consumed_rejected() {
        let tx = base(vec![out(asset(1), 11)], vec![input(1, 0, asset(1), 10)]);
        assert_eq!(
            tx.syntactic_verify(&ctx()),
            Err(TxError::InsufficientFunds {
                asset_id: asset(1),
                consumed: 10,
                produced: 11
            })
        );

        // Funds of one asset can't pay for another.
        let tx = base(vec![out(asset(2), 1)], vec![input(1, 0, asset(1), 10)]);
        assert!(matches!(
            tx.syntactic_verify(&ctx()),
            Err(TxError::InsufficientFunds { consumed: 0, .. })
        ));
    }

    #[test]
    fn amount_overflow_rejected() {
        let tx = base(
            Vec::new(),
            vec![
                input(1, 0, asset(1), u64::MAX),
                input(1, 1, asset(1), 1),
            ],
        );
        assert_eq!(
            tx.syntactic_verify(&ctx()),
            Err(TxError::AmountOverflow(asset(1)))
        );
    }

    #[test]
    fn zero_amount_output_rejected() {
        let tx = base(vec![out(asset(1), 0)], Vec::new());
        assert_eq!(tx.syntactic_verify(&ctx()), Err(TxError::ZeroAmount));
    }
}
