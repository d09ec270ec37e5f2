//! The [`Packer`]: a bounded, sticky-error byte cursor.
//!
//! A packer runs in one of two modes:
//!
//! - **encode**: [`Packer::new`] starts from an empty buffer that may grow up
//!   to `max_size` bytes. Every `pack_*` call appends.
//! - **decode**: [`Packer::from_bytes`] wraps an existing buffer with the
//!   read cursor at offset 0. Every `unpack_*` call consumes from the cursor.
//!
//! Errors are sticky. The first failure is recorded and every later call
//! becomes a no-op (unpacks return zero values), so an encoder can issue
//! dozens of writes and check [`Packer::errored`] once at the end.
//!
//! A write that does not fit leaves the buffer exactly as it was before
//! that call; nothing is partially written.

use thiserror::Error;

use crate::config::{BOOL_LEN, BYTE_LEN, ID_LEN, INT_LEN, LONG_LEN, SHORT_LEN};
use crate::ids::Id;

/// Canonical encoding of `false`.
const FALSE_BYTE: u8 = 0x00;

/// Canonical encoding of `true`.
const TRUE_BYTE: u8 = 0x01;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure modes of a packing session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackerError {
    /// A write would grow the buffer past its declared maximum.
    #[error("packer overflow: need {needed} bytes but max size is {max_size}")]
    Overflow {
        /// Total buffer size the write would have required.
        needed: usize,
        /// Declared capacity.
        max_size: usize,
    },

    /// A read wanted more bytes than remain.
    #[error("packer underflow: need {needed} bytes but only {remaining} remain")]
    Underflow {
        /// Bytes the read required.
        needed: usize,
        /// Bytes left after the cursor.
        remaining: usize,
    },

    /// A boolean byte was neither `0x00` nor `0x01`.
    #[error("invalid boolean encoding: {0:#04x}")]
    BadBool(u8),

    /// A string's bytes are not valid UTF-8.
    #[error("string is not valid utf-8")]
    InvalidUtf8,

    /// A type id did not name any known variant.
    #[error("unknown type id {0}")]
    UnknownTypeId(u32),

    /// Decoding finished with unread bytes left over.
    #[error("{0} trailing bytes after decoding")]
    TrailingBytes(usize),
}

// ---------------------------------------------------------------------------
// Packer
// ---------------------------------------------------------------------------

/// Bounded big-endian byte cursor with sticky error accumulation.
///
/// # Examples
///
/// ```
/// use ledger_protocol::codec::Packer;
///
/// let mut p = Packer::new(5);
/// p.pack_str("Ava");
/// assert!(!p.errored());
/// assert_eq!(p.bytes(), &[0x00, 0x03, 0x41, 0x76, 0x61]);
/// ```
#[derive(Debug, Clone)]
pub struct Packer {
    max_size: usize,
    bytes: Vec<u8>,
    offset: usize,
    err: Option<PackerError>,
}

impl Packer {
    /// Start an encoding session that may write at most `max_size` bytes.
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            bytes: Vec::new(),
            offset: 0,
            err: None,
        }
    }

    /// Start a decoding session over `bytes`, cursor at 0.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        Self {
            max_size: bytes.len(),
            bytes,
            offset: 0,
            err: None,
        }
    }

    /// `true` once any call has failed.
    pub fn errored(&self) -> bool {
        self.err.is_some()
    }

    /// The first error recorded, if any.
    pub fn err(&self) -> Option<&PackerError> {
        self.err.as_ref()
    }

    /// Record a failure. Only the first one sticks.
    pub fn fail(&mut self, err: PackerError) {
        if self.err.is_none() {
            self.err = Some(err);
        }
    }

    /// Everything written (encode) or the whole input (decode).
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Declared capacity.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Position of the read cursor.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Unread bytes after the cursor.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    /// Finish an encoding session.
    pub fn into_bytes(self) -> Result<Vec<u8>, PackerError> {
        match self.err {
            Some(err) => Err(err),
            None => Ok(self.bytes),
        }
    }

    /// Finish a decoding session, rejecting unread input.
    pub fn finish(&self) -> Result<(), PackerError> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }
        match self.remaining() {
            0 => Ok(()),
            n => Err(PackerError::TrailingBytes(n)),
        }
    }

    /// Reserve room for `n` more bytes, recording an overflow if they don't fit.
    fn expand(&mut self, n: usize) -> bool {
        if self.errored() {
            return false;
        }
        match self.bytes.len().checked_add(n) {
            Some(needed) if needed <= self.max_size => true,
            needed => {
                self.fail(PackerError::Overflow {
                    needed: needed.unwrap_or(usize::MAX),
                    max_size: self.max_size,
                });
                false
            }
        }
    }

    /// Check that `n` bytes can be read, recording an underflow if not.
    fn check_space(&mut self, n: usize) -> bool {
        if self.errored() {
            return false;
        }
        if n > self.remaining() {
            self.fail(PackerError::Underflow {
                needed: n,
                remaining: self.remaining(),
            });
            return false;
        }
        true
    }

    fn take(&mut self, n: usize) -> Option<&[u8]> {
        if !self.check_space(n) {
            return None;
        }
        let start = self.offset;
        self.offset += n;
        Some(&self.bytes[start..self.offset])
    }

    fn take_array<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        if let Some(slice) = self.take(N) {
            out.copy_from_slice(slice);
        }
        out
    }

    // -- encode -------------------------------------------------------------

    /// Append one byte.
    pub fn pack_byte(&mut self, v: u8) {
        if self.expand(BYTE_LEN) {
            self.bytes.push(v);
        }
    }

    /// Append a big-endian `u16`.
    pub fn pack_short(&mut self, v: u16) {
        if self.expand(SHORT_LEN) {
            self.bytes.extend_from_slice(&v.to_be_bytes());
        }
    }

    /// Append a big-endian `u32`.
    pub fn pack_int(&mut self, v: u32) {
        if self.expand(INT_LEN) {
            self.bytes.extend_from_slice(&v.to_be_bytes());
        }
    }

    /// Append a big-endian `u64`.
    pub fn pack_long(&mut self, v: u64) {
        if self.expand(LONG_LEN) {
            self.bytes.extend_from_slice(&v.to_be_bytes());
        }
    }

    /// Append `0x00` or `0x01`.
    pub fn pack_bool(&mut self, v: bool) {
        if self.expand(BOOL_LEN) {
            self.bytes.push(if v { TRUE_BYTE } else { FALSE_BYTE });
        }
    }

    /// Append raw bytes with no length prefix.
    pub fn pack_fixed_bytes(&mut self, v: &[u8]) {
        if self.expand(v.len()) {
            self.bytes.extend_from_slice(v);
        }
    }

    /// Append a `u32` length followed by the bytes.
    pub fn pack_bytes(&mut self, v: &[u8]) {
        let Ok(len) = u32::try_from(v.len()) else {
            self.fail(PackerError::Overflow {
                needed: v.len(),
                max_size: u32::MAX as usize,
            });
            return;
        };
        if self.expand(INT_LEN + v.len()) {
            self.bytes.extend_from_slice(&len.to_be_bytes());
            self.bytes.extend_from_slice(v);
        }
    }

    /// Append a `u16` length followed by the string's bytes.
    pub fn pack_str(&mut self, s: &str) {
        let Ok(len) = u16::try_from(s.len()) else {
            self.fail(PackerError::Overflow {
                needed: s.len(),
                max_size: u16::MAX as usize,
            });
            return;
        };
        if self.expand(SHORT_LEN + s.len()) {
            self.bytes.extend_from_slice(&len.to_be_bytes());
            self.bytes.extend_from_slice(s.as_bytes());
        }
    }

    /// Append an identifier's 32 bytes.
    pub fn pack_id(&mut self, id: &Id) {
        self.pack_fixed_bytes(id.bytes());
    }

    // -- decode -------------------------------------------------------------

    /// Read one byte.
    pub fn unpack_byte(&mut self) -> u8 {
        u8::from_be_bytes(self.take_array())
    }

    /// Read a big-endian `u16`.
    pub fn unpack_short(&mut self) -> u16 {
        u16::from_be_bytes(self.take_array())
    }

    /// Read a big-endian `u32`.
    pub fn unpack_int(&mut self) -> u32 {
        u32::from_be_bytes(self.take_array())
    }

    /// Read a big-endian `u64`.
    pub fn unpack_long(&mut self) -> u64 {
        u64::from_be_bytes(self.take_array())
    }

    /// Read a canonical boolean byte.
    pub fn unpack_bool(&mut self) -> bool {
        if !self.check_space(BOOL_LEN) {
            return false;
        }
        match self.unpack_byte() {
            FALSE_BYTE => false,
            TRUE_BYTE => true,
            other => {
                self.fail(PackerError::BadBool(other));
                false
            }
        }
    }

    /// Read exactly `n` bytes.
    pub fn unpack_fixed_bytes(&mut self, n: usize) -> Vec<u8> {
        self.take(n).map(<[u8]>::to_vec).unwrap_or_default()
    }

    /// Read a `u32`-length-prefixed byte string.
    pub fn unpack_bytes(&mut self) -> Vec<u8> {
        let len = self.unpack_int() as usize;
        self.unpack_fixed_bytes(len)
    }

    /// Read a `u16`-length-prefixed UTF-8 string.
    pub fn unpack_str(&mut self) -> String {
        let len = self.unpack_short() as usize;
        let raw = self.unpack_fixed_bytes(len);
        if self.errored() {
            return String::new();
        }
        String::from_utf8(raw).unwrap_or_else(|_| {
            self.fail(PackerError::InvalidUtf8);
            String::new()
        })
    }

    /// Read a 32-byte identifier.
    pub fn unpack_id(&mut self) -> Id {
        Id::new(self.take_array::<ID_LEN>())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
