//! Fungible value movement: the inputs a base transaction consumes and the
//! outputs it produces.

use serde::{Deserialize, Serialize};

use super::payload::Payload;
use super::utxo::UtxoId;
use crate::codec::{Packable, Packer};
use crate::ids::Id;
use crate::transaction::TxError;

// ---------------------------------------------------------------------------
// TransferableInput
// ---------------------------------------------------------------------------

/// Spends `amount` of `asset_id` held by the output `utxo_id`.
///
/// `input` is the extension-owned spending proof (signature indices and the
/// like); its `type_id` selects the extension that checks it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferableInput {
    pub utxo_id: UtxoId,
    pub asset_id: Id,
    pub amount: u64,
    pub input: Payload,
}

impl TransferableInput {
    /// Store key of the spent output.
    pub fn input_id(&self) -> Id {
        self.utxo_id.input_id()
    }

    /// Structural checks that need no state.
    pub fn verify(&self) -> Result<(), TxError> {
        if self.asset_id.is_empty() {
            return Err(TxError::EmptyAssetId);
        }
        if self.amount == 0 {
            return Err(TxError::ZeroAmount);
        }
        Ok(())
    }
}

impl Packable for TransferableInput {
    fn pack(&self, p: &mut Packer) {
        self.utxo_id.pack(p);
        p.pack_id(&self.asset_id);
        p.pack_long(self.amount);
        self.input.pack(p);
    }

    fn unpack(p: &mut Packer) -> Self {
        Self {
            utxo_id: UtxoId::unpack(p),
            asset_id: p.unpack_id(),
            amount: p.unpack_long(),
            input: Payload::unpack(p),
        }
    }
}

// ---------------------------------------------------------------------------
// TransferableOutput
// ---------------------------------------------------------------------------

/// Produces `amount` of `asset_id`, locked by the extension-owned `output`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferableOutput {
    pub asset_id: Id,
    pub amount: u64,
    pub output: Payload,
}

impl TransferableOutput {
    /// Structural checks that need no state.
    pub fn verify(&self) -> Result<(), TxError> {
        if self.asset_id.is_empty() {
            return Err(TxError::EmptyAssetId);
        }
        if self.amount == 0 {
            return Err(TxError::ZeroAmount);
        }
        Ok(())
    }
}

impl Packable for TransferableOutput {
    fn pack(&self, p: &mut Packer) {
        p.pack_id(&self.asset_id);
        p.pack_long(self.amount);
        self.output.pack(p);
    }

    fn unpack(p: &mut Packer) -> Self {
        Self {
            asset_id: p.unpack_id(),
            amount: p.unpack_long(),
            output: Payload::unpack(p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode, encode};

    fn input(amount: u64) -> TransferableInput {
        TransferableInput {
            utxo_id: UtxoId::new(Id::new([1u8; 32]), 0),
            asset_id: Id::new([2u8; 32]),
            amount,
            input: Payload::new(5, vec![0]),
        }
    }

    #[test]
    fn input_checks() {
        assert!(input(10).verify().is_ok());
        assert_eq!(input(0).verify(), Err(TxError::ZeroAmount));

        let mut no_asset = input(10);
        no_asset.asset_id = Id::EMPTY;
        assert_eq!(no_asset.verify(), Err(TxError::EmptyAssetId));
    }

    #[test]
    fn output_checks() {
        let out = TransferableOutput {
            asset_id: Id::new([2u8; 32]),
            amount: 1,
            output: Payload::new(6, Vec::new()),
        };
        assert!(out.verify().is_ok());
        assert_eq!(
            TransferableOutput { amount: 0, ..out.clone() }.verify(),
            Err(TxError::ZeroAmount)
        );
        assert_eq!(
            TransferableOutput { asset_id: Id::EMPTY, ..out }.verify(),
            Err(TxError::EmptyAssetId)
        );
    }

    #[test]
    fn input_id_follows_utxo_id() {
        let i = input(3);
        assert_eq!(i.input_id(), Id::new([1u8; 32]).prefix(0));
    }

    #[test]
    fn wire_roundtrip() {
        let i = input(42);
        let bytes = encode(&i, 1024).unwrap();
        assert_eq!(bytes.len(), 36 + 32 + 8 + 8 + 1);
        assert_eq!(decode::<TransferableInput>(&bytes).unwrap(), i);
    }
}
