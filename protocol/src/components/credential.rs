use serde::{Deserialize, Serialize};

use super::payload::Payload;
use crate::codec::{Packable, Packer};

/// Authorization material for one input position: base inputs first, then
/// each operation's inputs in declared order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential(pub Payload);

impl Credential {
    /// Credential carrying `body` for the extension that owns `type_id`.
    pub fn new(type_id: u32, body: impl Into<Vec<u8>>) -> Self {
        Self(Payload::new(type_id, body))
    }

    /// The type-tagged proof, opaque to the core.
    pub fn payload(&self) -> &Payload {
        &self.0
    }
}

impl From<Payload> for Credential {
    fn from(payload: Payload) -> Self {
        Self(payload)
    }
}

impl Packable for Credential {
    fn pack(&self, p: &mut Packer) {
        self.0.pack(p);
    }

    fn unpack(p: &mut Packer) -> Self {
        Self(Payload::unpack(p))
    }
}
