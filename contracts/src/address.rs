//! # Addresses
//!
//! The principal type used throughout the FT42 contracts. An [`Address`] is
//! a fixed 20-byte account identifier — it names a token holder, a contract
//! owner, a multisig signer, or a deployed contract instance. Two addresses
//! are the same principal exactly when they are bit-identical.
//!
//! The all-zero address is reserved as the null principal. It never holds a
//! balance, never owns a contract, and is rejected wherever a real
//! counterparty is required. In [`Transfer`](crate::token::Event::Transfer)
//! events the null side is modeled as `None` instead, so the zero address
//! never appears in the event stream either.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 20-byte account or contract identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address([u8; 20]);

impl Address {
    /// The null principal. Rejected as an owner, recipient, or signer.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Creates an `Address` from raw bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Returns the raw 20-byte identifier.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns the hex-encoded address without a `0x` prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses a hex-encoded address. A leading `0x` is accepted.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        if bytes.len() != 20 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Generates a fresh random address.
    ///
    /// Used to assign each deployed contract instance its own identity, the
    /// way the host platform would assign a deployment address.
    pub fn random() -> Self {
        let mut bytes = [0u8; 20];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Returns `true` if this is the null principal.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(0x{})", self.to_hex())
    }
}
