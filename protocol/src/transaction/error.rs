use thiserror::Error;

use crate::codec::PackerError;
use crate::fx::FxError;
use crate::ids::Id;

/// Errors that can occur while parsing or verifying a transaction.
///
/// The first group is raised by syntactic verification (no state needed),
/// the second by semantic verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxError {
    /// The transaction bytes don't decode (or don't encode within bounds).
    #[error("codec error: {0}")]
    Codec(#[from] PackerError),

    /// No transaction was supplied.
    #[error("nil transaction")]
    NilTx,

    /// Credential count differs from the number of inputs.
    #[error("expected {expected} credentials, got {got}")]
    CredentialCount { expected: usize, got: usize },

    #[error("wrong network id: expected {expected}, got {got}")]
    WrongNetworkId { expected: u32, got: u32 },

    #[error("wrong blockchain id: expected {expected}, got {got}")]
    WrongChainId { expected: Id, got: Id },

    #[error("asset id is empty")]
    EmptyAssetId,

    #[error("amount must be > 0")]
    ZeroAmount,

    #[error("outputs are not sorted")]
    OutputsNotSorted,

    #[error("inputs are not sorted and unique")]
    InputsNotSortedUnique,

    /// An asset is produced in excess of what is consumed.
    #[error("insufficient funds for asset {asset_id}: consumed {consumed}, produced {produced}")]
    InsufficientFunds {
        asset_id: Id,
        consumed: u64,
        produced: u64,
    },

    /// Summing the amounts of one asset overflowed `u64`.
    #[error("amount overflow for asset {0}")]
    AmountOverflow(Id),

    /// An output is consumed twice within the transaction.
    #[error("double spend of {0}")]
    DoubleSpend(Id),

    #[error("operations are not sorted and unique")]
    OperationsNotSortedUnique,

    #[error("asset id mismatch: expected {expected}, got {got}")]
    AssetIdMismatch { expected: Id, got: Id },

    #[error("amount mismatch: input claims {claimed}, utxo holds {actual}")]
    AmountMismatch { claimed: u64, actual: u64 },

    /// The referenced output can't be resolved from the store or a pending
    /// ancestor in good standing.
    #[error("missing utxo {tx_id}:{output_index}")]
    MissingUtxo { tx_id: Id, output_index: u32 },

    /// The ancestor exists but has no output at that index.
    #[error("invalid utxo {tx_id}:{output_index}")]
    InvalidUtxo { tx_id: Id, output_index: u32 },

    /// No registered extension claims the payload, or there is no payload.
    #[error("no extension handles this payload")]
    UnknownFx,

    #[error("extension {fx_index} may not be used with asset {asset_id}")]
    IncompatibleFx { fx_index: usize, asset_id: Id },

    #[error(transparent)]
    Fx(#[from] FxError),

    #[error("ancestor chain deeper than {0}")]
    AncestorDepthExceeded(usize),

    #[error("ancestor cycle through {0}")]
    AncestorCycle(Id),
}
