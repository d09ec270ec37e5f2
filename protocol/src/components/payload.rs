//! Extension-owned payloads.
//!
//! The core never looks inside a spending proof, an NFT output or a
//! signature. It carries them as [`Payload`]s: a `type_id` naming the shape
//! (which the [`FxRegistry`](crate::fx::FxRegistry) maps to exactly one
//! extension) plus an opaque body.
//!
//! ```text
//! type_id: u32 | body_len: u32 | body: [u8; body_len]
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codec::{Packable, Packer};

/// A tagged, opaque blob handed to a feature extension.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Payload {
    /// Shape tag used for extension dispatch.
    pub type_id: u32,
    /// Extension-defined contents.
    pub body: Vec<u8>,
}

impl Payload {
    /// Create a payload.
    pub fn new(type_id: u32, body: impl Into<Vec<u8>>) -> Self {
        Self {
            type_id,
            body: body.into(),
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Payload(type={}, {} bytes)", self.type_id, self.body.len())
    }
}

impl Packable for Payload {
    fn pack(&self, p: &mut Packer) {
        p.pack_int(self.type_id);
        p.pack_bytes(&self.body);
    }

    fn unpack(p: &mut Packer) -> Self {
        Self {
            type_id: p.unpack_int(),
            body: p.unpack_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode, encode};

    #[test]
    fn wire_layout() {
        let payload = Payload::new(7, vec![0xAA, 0xBB]);
        let bytes = encode(&payload, 64).unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 7, 0, 0, 0, 2, 0xAA, 0xBB]);
        assert_eq!(decode::<Payload>(&bytes).unwrap(), payload);
    }

    #[test]
    fn debug_hides_body() {
        let payload = Payload::new(3, vec![1, 2, 3, 4]);
        assert_eq!(format!("{:?}", payload), "Payload(type=3, 4 bytes)");
    }
}
