//! # Ledger Entities
//!
//! ```text
//! payload.rs      — Payload: type-tagged blob owned by a feature extension
//! utxo.rs         — UtxoId, Utxo
//! transferable.rs — TransferableInput / TransferableOutput (fungible moves)
//! operation.rs    — OperableInput, Operation (extension-defined moves)
//! credential.rs   — Credential: one per input position
//! ```
//!
//! Every entity implements [`Packable`](crate::codec::Packable); its fields
//! are encoded in declaration order.

pub mod credential;
pub mod operation;
pub mod payload;
pub mod transferable;
pub mod utxo;

pub use credential::Credential;
pub use operation::{is_sorted_and_unique_operations, sort_operations, OperableInput, Operation};
pub use payload::Payload;
pub use transferable::{TransferableInput, TransferableOutput};
pub use utxo::{Utxo, UtxoId};
