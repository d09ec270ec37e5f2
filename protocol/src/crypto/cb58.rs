//! Checksummed base58 ("cb58").
//!
//! ```text
//! payload (n bytes)
//!     -> payload || SHA-256(payload)[28..32]
//!     -> base58 (Bitcoin alphabet)
//! ```
//!
//! Unlike `bs58`'s built-in `check` mode (double SHA-256, leading bytes),
//! the checksum here is the *tail* of a single SHA-256. Identifiers printed
//! by other ledger implementations use this exact construction, so it must
//! not drift.

use thiserror::Error;

use super::hash::checksum;
use crate::config::CHECKSUM_LEN;

/// Errors produced while decoding a cb58 string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Cb58Error {
    /// The string contains characters outside the base58 alphabet.
    #[error("base58 decode error: {0}")]
    Base58(String),

    /// The decoded bytes are too short to even hold a checksum.
    #[error("decoded {0} bytes, shorter than the {CHECKSUM_LEN}-byte checksum")]
    MissingChecksum(usize),

    /// The trailing checksum does not match the payload.
    #[error("checksum mismatch")]
    BadChecksum,
}

/// Encode `payload` with an appended checksum.
pub fn encode(payload: &[u8]) -> String {
    let mut checked = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    checked.extend_from_slice(payload);
    checked.extend_from_slice(&checksum(payload, CHECKSUM_LEN));
    bs58::encode(checked).into_string()
}

/// Decode a cb58 string back into its payload, verifying the checksum.
pub fn decode(s: &str) -> Result<Vec<u8>, Cb58Error> {
    let mut decoded = bs58::decode(s)
        .into_vec()
        .map_err(|e| Cb58Error::Base58(e.to_string()))?;

    if decoded.len() < CHECKSUM_LEN {
        return Err(Cb58Error::MissingChecksum(decoded.len()));
    }

    let claimed = decoded.split_off(decoded.len() - CHECKSUM_LEN);
    if claimed != checksum(&decoded, CHECKSUM_LEN) {
        return Err(Cb58Error::BadChecksum);
    }
    Ok(decoded)
}
