//! # Identifiers
//!
//! The ledger's keying primitive. Assets, transactions, chains and UTXO
//! store keys are all [`Id`]s; sets of them (consumed inputs, referenced
//! assets) are plain [`IdSet`]s.

pub mod id;

use std::collections::HashSet;

pub use id::{Id, IdError};

/// A set of identifiers.
pub type IdSet = HashSet<Id>;
