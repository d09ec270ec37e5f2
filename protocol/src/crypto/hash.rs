//! # Hashing Utilities
//!
//! SHA-256 is the only hash function in the ledger core. It derives
//! transaction ids from canonical bytes, derives prefixed identifiers, and
//! supplies the checksum appended to textual identifiers. One hash function
//! means one thing to audit and one thing other implementations have to
//! match bit for bit.

use sha2::{Digest, Sha256};

use crate::config::ID_LEN;

/// Compute the SHA-256 hash of the input data.
///
/// Returns a 32-byte digest as a `Vec<u8>`. Prefer [`sha256_array`] when the
/// result becomes an [`Id`](crate::ids::Id).
///
/// # Example
///
/// ```
/// use ledger_protocol::crypto::sha256;
///
/// let hash = sha256(b"ledger");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Compute the SHA-256 hash and return a fixed-size array.
pub fn sha256_array(data: &[u8]) -> [u8; ID_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; ID_LEN];
    output.copy_from_slice(&result);
    output
}

/// Hash multiple byte slices together without concatenation overhead.
pub fn sha256_multi(parts: &[&[u8]]) -> [u8; ID_LEN] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut output = [0u8; ID_LEN];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// The last `len` bytes of `SHA-256(data)`.
///
/// # Panics
///
/// Panics if `len` exceeds the digest width. Callers pass a constant.
pub fn checksum(data: &[u8], len: usize) -> Vec<u8> {
    let hash = sha256_array(data);
    hash[ID_LEN - len..].to_vec()
}
