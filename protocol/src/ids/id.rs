//! # Id: 32-byte content-addressing key
//!
//! Every asset, transaction and chain in the ledger is named by an [`Id`].
//! The bytes are usually a SHA-256 digest computed upstream (a transaction
//! id is the hash of its canonical encoding), but `Id` itself never hashes
//! on construction: [`Id::new`] wraps the bytes verbatim.
//!
//! The printable form is cb58:
//!
//! ```text
//! bytes (32) -> bytes || SHA-256(bytes)[28..32] -> base58
//! ```
//!
//! [`Id::prefix`] derives a fresh id from `(id, n)`:
//!
//! ```text
//! prefix(n) = SHA-256(be_u64(n) || bytes)
//! ```
//!
//! which is how a UTXO's store key is derived from its transaction id and
//! output index.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ID_BITS, ID_LEN};
use crate::crypto::cb58::{self, Cb58Error};
use crate::crypto::hash::sha256_multi;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while parsing an identifier string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// The string is not valid cb58 (bad alphabet, truncated, bad checksum).
    #[error("invalid id encoding: {0}")]
    Encoding(#[from] Cb58Error),

    /// The checksum verified but the payload is not 32 bytes.
    #[error("invalid id length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes.
        got: usize,
    },
}

// ---------------------------------------------------------------------------
// Id
// ---------------------------------------------------------------------------

/// An immutable 32-byte identifier.
///
/// Equality, hashing and ordering are all bytewise, so ids behave as plain
/// keys in `HashMap`, `HashSet` and `BTreeMap`.
///
/// # Examples
///
/// ```
/// use ledger_protocol::ids::Id;
///
/// let id = Id::new([24u8; 32]);
/// let text = id.to_string();
/// let parsed: Id = text.parse().unwrap();
/// assert_eq!(id, parsed);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Id([u8; ID_LEN]);

impl Id {
    /// The all-zero identifier.
    pub const EMPTY: Id = Id([0u8; ID_LEN]);

    /// Wrap 32 bytes verbatim.
    pub const fn new(bytes: [u8; ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Build an id from a slice, returning `None` unless it is exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let key: [u8; ID_LEN] = bytes.try_into().ok()?;
        Some(Self(key))
    }

    /// Borrowed view of the bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    /// Owned copy of the bytes. Mutating the copy never touches `self`.
    pub fn key(&self) -> [u8; ID_LEN] {
        self.0
    }

    /// Returns `true` for the all-zero id.
    pub fn is_empty(&self) -> bool {
        self.0 == [0u8; ID_LEN]
    }

    /// Value (0 or 1) of bit `i`: bit `i % 8` of byte `i / 8`, least
    /// significant bit first. Bits past the end read as 0.
    pub fn bit(&self, i: usize) -> u8 {
        if i >= ID_BITS {
            return 0;
        }
        (self.0[i / 8] >> (i % 8)) & 1
    }

    /// Derive a new id from this one and `n`.
    ///
    /// Pure: the same `(self, n)` always yields the same id and `self` is
    /// left untouched.
    pub fn prefix(&self, n: u64) -> Id {
        Id(sha256_multi(&[n.to_be_bytes().as_slice(), self.0.as_slice()]))
    }

    /// Canonical cb58 string form.
    pub fn to_cb58(&self) -> String {
        cb58::encode(&self.0)
    }

    /// Parse the cb58 form produced by [`Id::to_cb58`] / `Display`.
    pub fn from_cb58(s: &str) -> Result<Self, IdError> {
        let bytes = cb58::decode(s)?;
        Self::from_slice(&bytes).ok_or(IdError::InvalidLength {
            expected: ID_LEN,
            got: bytes.len(),
        })
    }
}

impl From<[u8; ID_LEN]> for Id {
    fn from(bytes: [u8; ID_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Id {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Id {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_cb58(s)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cb58())
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.to_cb58())
    }
}

impl Serialize for Id {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_cb58())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Id::from_cb58(&s).map_err(serde::de::Error::custom)
        } else {
            let bytes = <Vec<u8>>::deserialize(deserializer)?;
            Id::from_slice(&bytes).ok_or_else(|| {
                serde::de::Error::custom(format!(
                    "expected {}-byte id, got {}",
                    ID_LEN,
                    bytes.len()
                ))
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
