//! # Binary Codec
//!
//! Canonical transaction bytes are produced and consumed here.
//!
//! ```text
//! packer.rs   — Packer: bounded big-endian cursor with sticky errors
//! packable.rs — Packable trait, encode/decode helpers, primitive impls
//! sort.rs     — canonical ordering checks over packed encodings
//! ```
//!
//! ## Wire rules
//!
//! - Integers are big-endian (`u8`, `u16`, `u32`, `u64`).
//! - Booleans are one byte: `0x00` or `0x01`, nothing else.
//! - Strings are a `u16` length followed by the UTF-8 bytes.
//! - Identifiers are 32 raw bytes.
//! - Slices are a `u32` element count followed by the elements.
//! - Structs are their fields, in declaration order.

pub mod packable;
pub mod packer;
pub mod sort;

pub use packable::{decode, encode, packed_bytes, Packable};
pub use packer::{Packer, PackerError};
pub use sort::{
    compare_packed, is_sorted_and_unique, is_sorted_and_unique_packed, is_sorted_packed,
    sort_packed,
};
