// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Ledger Protocol: Transaction Integrity Core
//!
//! The part of a UTXO asset ledger that decides whether a transaction is
//! well formed and allowed to spend what it spends. Consensus, networking
//! and durable storage live elsewhere; this crate gives them a parsed,
//! verified transaction and the outputs it produces.
//!
//! ## Architecture
//!
//! - **codec** — Canonical big-endian encoding with bounded, sticky-error
//!   packing.
//! - **crypto** — SHA-256 and the cb58 checksummed text form.
//! - **ids** — 32-byte identifiers and their derivations.
//! - **components** — UTXOs, inputs, outputs, operations, credentials.
//! - **fx** — Feature-extension trait and the registry that dispatches to it.
//! - **state** — UTXO set and pending-transaction pool.
//! - **transaction** — Transaction bodies and the verification pipeline.
//! - **ledger** — Parse, verify, issue, accept, reject.
//! - **config** / **logging** — Protocol constants and tracing setup.
//!
//! ## Design Philosophy
//!
//! 1. One logical transaction, one encoding, one id.
//! 2. Structure is checked before any state is read.
//! 3. The core never interprets signatures; extensions do.

pub mod codec;
pub mod components;
pub mod config;
pub mod crypto;
pub mod fx;
pub mod ids;
pub mod ledger;
pub mod logging;
pub mod state;
pub mod transaction;

pub use ids::Id;
pub use ledger::{Ledger, LedgerError};
