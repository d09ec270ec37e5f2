//! # Transaction Module
//!
//! Transaction bodies, their canonical encoding, and the verification
//! pipeline that decides whether one may be issued.
//!
//! ## Architecture
//!
//! ```text
//! base_tx.rs      — BaseTx: fungible transfers and their structural rules
//! operation_tx.rs — OperationTx: BaseTx plus extension-defined operations
//! tx.rs           — UnsignedTx, Tx (cached bytes and id), syntactic entry point
//! verifier.rs     — SyntaxContext, Verifier: semantic checks and ancestors
//! error.rs        — TxError
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Parse**: [`Tx::parse`] decodes the canonical bytes and fixes the id.
//! 2. **Syntactic**: [`syntactic_verify`] checks structure with no state.
//! 3. **Semantic**: [`Verifier::verify`] resolves every spent output and
//!    asks the owning extension to authorize it.
//! 4. **Accept**: the produced outputs ([`Tx::utxos`]) replace the consumed
//!    ones in the UTXO set.
//!
//! ## Design Decisions
//!
//! - The transaction id is `sha256` of the full encoding, credentials
//!   included, computed once when the [`Tx`] is built.
//! - All amounts are `u64`. Per-asset sums use checked arithmetic.
//! - Operation outputs carry no fungible amount; they are recorded with
//!   `amount = 0` and can only be consumed by further operations.

pub mod base_tx;
pub mod error;
pub mod operation_tx;
pub mod tx;
pub mod verifier;

pub use base_tx::BaseTx;
pub use error::TxError;
pub use operation_tx::OperationTx;
pub use tx::{syntactic_verify, Tx, UnsignedTx};
pub use verifier::{SyntaxContext, Verifier};
