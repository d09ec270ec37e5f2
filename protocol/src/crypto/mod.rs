//! # Cryptographic Primitives
//!
//! Hashing and checksummed text encoding. The ledger core never signs or
//! verifies signatures itself; that belongs to the feature extensions
//! plugged into [`FxRegistry`](crate::fx::FxRegistry).
//!
//! - **SHA-256** for transaction ids, prefixed identifiers and checksums.
//! - **cb58** (base58 + 4-byte SHA-256 checksum) for printable identifiers.

pub mod cb58;
pub mod hash;

pub use cb58::Cb58Error;
pub use hash::{checksum, sha256, sha256_array, sha256_multi};
