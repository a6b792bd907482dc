//! # FT42 Contracts
//!
//! Core ledger and governance logic for the FortyTwo token. Two primitives
//! make up the system:
//!
//! - **Token Ledger** — a capped, pausable fungible token with owner-gated
//!   minting, holder-initiated burning, and a rescue path for foreign value
//!   stranded at the ledger's address.
//! - **Multisig Vault** — an N-of-M approval gate that holds and forwards
//!   opaque action payloads. Hand it the ledger's ownership and every
//!   administrative operation needs a quorum of signers.
//!
//! The execution model is strictly serialized: each instance is a
//! single-owner aggregate mutated through `&mut self` methods that either
//! complete atomically or fail with a typed error and zero state change.
//! A host embedding these contracts in a concurrent service puts each
//! instance behind a single writer; the types themselves never share state.
//!
//! ## Design Principles
//!
//! 1. All monetary operations check for overflow — we use `checked_add` and
//!    `checked_sub` everywhere, because wrapping arithmetic and money do not
//!    mix.
//! 2. Every guard runs before the first write. A failed operation is
//!    indistinguishable from one that never happened, events included.
//! 3. The caller's principal is an explicit argument, never ambient state —
//!    access control is testable with plain values.
//! 4. Every public type is serializable (serde) for wire transport and
//!    persistent storage.

pub mod address;
pub mod multisig;
pub mod token;
