//! # Protocol Configuration & Constants
//!
//! Every magic number the ledger core depends on lives here: identifier
//! widths, codec limits, wire type ids, and the recursion bound for
//! ancestor resolution. Several of these are consensus-visible (they change
//! which byte strings decode and which transactions verify), so treat edits
//! here as protocol changes, not refactors.
//!
//! [`LedgerConfig`] carries the handful of values a deployment chooses for
//! itself. Reading it from disk is the embedding node's job; this crate only
//! defines the shape and sane defaults.

use serde::{Deserialize, Serialize};

use crate::ids::Id;

// ---------------------------------------------------------------------------
// Network Identifiers
// ---------------------------------------------------------------------------

/// Production network.
pub const NETWORK_ID_MAINNET: u32 = 1;

/// Public test network.
pub const NETWORK_ID_TESTNET: u32 = 5;

/// Single-machine network used by tests and local clusters.
pub const NETWORK_ID_LOCAL: u32 = 12345;

// ---------------------------------------------------------------------------
// Identifier Parameters
// ---------------------------------------------------------------------------

/// Width of every identifier in bytes (asset ids, tx ids, chain ids).
pub const ID_LEN: usize = 32;

/// Number of trailing SHA-256 bytes appended to an id before base58
/// encoding. Four bytes catches any single-character typo.
pub const CHECKSUM_LEN: usize = 4;

/// Number of addressable bits in an identifier.
pub const ID_BITS: usize = ID_LEN * 8;

// ---------------------------------------------------------------------------
// Codec Limits
// ---------------------------------------------------------------------------

/// Encoded width of a `u8`.
pub const BYTE_LEN: usize = 1;
/// Encoded width of a `u16`.
pub const SHORT_LEN: usize = 2;
/// Encoded width of a `u32`.
pub const INT_LEN: usize = 4;
/// Encoded width of a `u64`.
pub const LONG_LEN: usize = 8;
/// Encoded width of a `bool`.
pub const BOOL_LEN: usize = 1;

/// Maximum encoded transaction size. 256 KiB comfortably fits a few hundred
/// inputs with their credentials and nothing pathological.
pub const MAX_TX_SIZE: usize = 256 * 1024;

// ---------------------------------------------------------------------------
// Wire Type Ids
// ---------------------------------------------------------------------------

/// Type id written before a plain value-transfer transaction.
pub const BASE_TX_TYPE_ID: u32 = 0;

/// Type id written before a transaction that also carries operations.
pub const OPERATION_TX_TYPE_ID: u32 = 1;

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// How many not-yet-decided ancestors deep a verification may recurse before
/// giving up. Legitimate chains of pending spends are short; anything deeper
/// than this is either an attack or a very unlucky client.
pub const DEFAULT_MAX_ANCESTOR_DEPTH: usize = 32;

// ---------------------------------------------------------------------------
// LedgerConfig
// ---------------------------------------------------------------------------

/// Deployment-specific parameters for a [`Ledger`](crate::ledger::Ledger).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Network every accepted transaction must name.
    pub network_id: u32,

    /// Blockchain every accepted transaction must name.
    pub blockchain_id: Id,

    /// Upper bound on the encoded size of a single transaction.
    pub max_tx_size: usize,

    /// Recursion bound for resolving inputs against pending ancestors.
    pub max_ancestor_depth: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            network_id: NETWORK_ID_LOCAL,
            blockchain_id: Id::EMPTY,
            max_tx_size: MAX_TX_SIZE,
            max_ancestor_depth: DEFAULT_MAX_ANCESTOR_DEPTH,
        }
    }
}

impl LedgerConfig {
    /// Config for the given network and chain, defaults elsewhere.
    pub fn new(network_id: u32, blockchain_id: Id) -> Self {
        Self {
            network_id,
            blockchain_id,
            ..Default::default()
        }
    }
}

/// Returns a friendly name for a network ID, mainly for logging.
pub fn network_name(network_id: u32) -> String {
    match network_id {
        NETWORK_ID_MAINNET => "mainnet".to_string(),
        NETWORK_ID_TESTNET => "testnet".to_string(),
        NETWORK_ID_LOCAL => "local".to_string(),
        other => format!("unknown({})", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_ids_are_distinct() {
        assert_ne!(NETWORK_ID_MAINNET, NETWORK_ID_TESTNET);
        assert_ne!(NETWORK_ID_MAINNET, NETWORK_ID_LOCAL);
        assert_ne!(NETWORK_ID_TESTNET, NETWORK_ID_LOCAL);
    }

    #[test]
    fn test_network_name_formatting() {
        assert_eq!(network_name(NETWORK_ID_MAINNET), "mainnet");
        assert_eq!(network_name(NETWORK_ID_LOCAL), "local");
        assert_eq!(network_name(7), "unknown(7)");
    }

    #[test]
    fn test_codec_widths() {
        assert_eq!(ID_BITS, 256);
        assert_eq!(SHORT_LEN, 2 * BYTE_LEN);
        assert_eq!(LONG_LEN, 2 * INT_LEN);
    }

    #[test]
    fn test_tx_type_ids_are_distinct() {
        assert_ne!(BASE_TX_TYPE_ID, OPERATION_TX_TYPE_ID);
    }

    #[test]
    fn test_default_config() {
        let config = LedgerConfig::default();
        assert_eq!(config.network_id, NETWORK_ID_LOCAL);
        assert_eq!(config.max_tx_size, MAX_TX_SIZE);
        assert_eq!(config.max_ancestor_depth, DEFAULT_MAX_ANCESTOR_DEPTH);
        assert!(config.blockchain_id.is_empty());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = LedgerConfig::new(NETWORK_ID_TESTNET, Id::new([9u8; 32]));
        let json = serde_json::to_string(&config).unwrap();
        let recovered: LedgerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, recovered);
    }

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let recovered: LedgerConfig = serde_json::from_str(r#"{"network_id": 1}"#).unwrap();
        assert_eq!(recovered.network_id, NETWORK_ID_MAINNET);
        assert_eq!(recovered.max_ancestor_depth, DEFAULT_MAX_ANCESTOR_DEPTH);
    }
}
