//! The [`Packable`] trait and its implementations for primitive types.
//!
//! Composite entities implement `Packable` by packing their fields in
//! declaration order. Slices are a `u32` element count followed by the
//! elements.

use super::packer::{Packer, PackerError};
use crate::ids::Id;

/// A value with a canonical byte encoding.
///
/// `unpack` never fails outright: on error it records the failure in the
/// packer and returns whatever it has (usually zero values). Callers check
/// [`Packer::errored`] or use [`decode`].
pub trait Packable: Sized {
    /// Append the canonical encoding of `self`.
    fn pack(&self, p: &mut Packer);

    /// Read a value from the cursor.
    fn unpack(p: &mut Packer) -> Self;
}

/// Encode `value` into a fresh buffer of at most `max_size` bytes.
pub fn encode<T: Packable>(value: &T, max_size: usize) -> Result<Vec<u8>, PackerError> {
    let mut p = Packer::new(max_size);
    value.pack(&mut p);
    p.into_bytes()
}

/// Decode a `T` that must span all of `bytes`.
pub fn decode<T: Packable>(bytes: &[u8]) -> Result<T, PackerError> {
    let mut p = Packer::from_bytes(bytes);
    let value = T::unpack(&mut p);
    p.finish()?;
    Ok(value)
}

/// Encoding used for canonical ordering comparisons.
///
/// Entities without strings have no failing encodings once the size bound is
/// lifted, so whatever was written is the full encoding.
pub fn packed_bytes<T: Packable>(value: &T) -> Vec<u8> {
    let mut p = Packer::new(usize::MAX);
    value.pack(&mut p);
    p.bytes().to_vec()
}

impl Packable for u8 {
    fn pack(&self, p: &mut Packer) {
        p.pack_byte(*self);
    }

    fn unpack(p: &mut Packer) -> Self {
        p.unpack_byte()
    }
}

impl Packable for u16 {
    fn pack(&self, p: &mut Packer) {
        p.pack_short(*self);
    }

    fn unpack(p: &mut Packer) -> Self {
        p.unpack_short()
    }
}

impl Packable for u32 {
    fn pack(&self, p: &mut Packer) {
        p.pack_int(*self);
    }

    fn unpack(p: &mut Packer) -> Self {
        p.unpack_int()
    }
}

impl Packable for u64 {
    fn pack(&self, p: &mut Packer) {
        p.pack_long(*self);
    }

    fn unpack(p: &mut Packer) -> Self {
        p.unpack_long()
    }
}

impl Packable for bool {
    fn pack(&self, p: &mut Packer) {
        p.pack_bool(*self);
    }

    fn unpack(p: &mut Packer) -> Self {
        p.unpack_bool()
    }
}

impl Packable for String {
    fn pack(&self, p: &mut Packer) {
        p.pack_str(self);
    }

    fn unpack(p: &mut Packer) -> Self {
        p.unpack_str()
    }
}

impl Packable for Id {
    fn pack(&self, p: &mut Packer) {
        p.pack_id(self);
    }

    fn unpack(p: &mut Packer) -> Self {
        p.unpack_id()
    }
}

impl<T: Packable> Packable for Vec<T> {
    fn pack(&self, p: &mut Packer) {
        let Ok(count) = u32::try_from(self.len()) else {
            p.fail(PackerError::Overflow {
                needed: self.len(),
                max_size: u32::MAX as usize,
            });
            return;
        };
        p.pack_int(count);
        for item in self {
            item.pack(p);
        }
    }

    fn unpack(p: &mut Packer) -> Self {
        let count = p.unpack_int() as usize;
        if p.errored() {
            return Vec::new();
        }
        // Every element occupies at least one byte, so a count larger than
        // the unread input is malformed. Reject it before allocating.
        if count > p.remaining() {
            p.fail(PackerError::Underflow {
                needed: count,
                remaining: p.remaining(),
            });
            return Vec::new();
        }
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            let item = T::unpack(p);
            if p.errored() {
                return Vec::new();
            }
            items.push(item);
        }
        items
    }
}
