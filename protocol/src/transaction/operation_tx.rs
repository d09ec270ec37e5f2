//! Transactions that carry extension-defined operations on top of a base
//! transfer.

use serde::{Deserialize, Serialize};

use super::base_tx::BaseTx;
use super::error::TxError;
use super::verifier::SyntaxContext;
use crate::codec::{Packable, Packer};
use crate::components::{is_sorted_and_unique_operations, Operation};
use crate::ids::IdSet;

/// A base transfer plus operations, in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationTx {
    pub base: BaseTx,
    pub ops: Vec<Operation>,
}

impl OperationTx {
    /// Base checks, then per-operation structure, then no output spent
    /// twice across the base inputs and every operation, then canonical
    /// operation order.
    pub fn syntactic_verify(&self, ctx: &SyntaxContext) -> Result<(), TxError> {
        self.base.syntactic_verify(ctx)?;

        let mut consumed: IdSet = self.base.input_ids().collect();
        for op in &self.ops {
            op.verify()?;
            for input in &op.ins {
                let input_id = input.input_id();
                if !consumed.insert(input_id) {
                    return Err(TxError::DoubleSpend(input_id));
                }
            }
        }

        if !is_sorted_and_unique_operations(&self.ops) {
            return Err(TxError::OperationsNotSortedUnique);
        }
        Ok(())
    }
}

impl Packable for OperationTx {
    fn pack(&self, p: &mut Packer) {
        self.base.pack(p);
        self.ops.pack(p);
    }

    fn unpack(p: &mut Packer) -> Self {
        Self {
            base: BaseTx::unpack(p),
            ops: Vec::unpack(p),
        }
    }
}
