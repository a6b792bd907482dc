//! # FT42 Token Ledger
//!
//! A capped, pausable fungible token with owner-gated minting. One
//! [`Ft42Token`] instance is one deployed ledger: it owns its balance map,
//! its supply counters, and its event log, and exposes every state change
//! through an explicit mutation method that takes the calling principal as
//! its first argument.
//!
//! ## Security Model
//!
//! - **Hard cap**: `total_supply` can never exceed the cap fixed at
//!   construction. The check is strict — a mint either fits entirely under
//!   the cap or fails with [`TokenError::CapExceeded`].
//! - **Owner gating**: `mint`, `pause`, `unpause`, `transfer_ownership`, and
//!   `rescue_foreign_value` require the current owner. Ownership is a single
//!   principal; handing it to a [`MultiSigVault`](crate::multisig::MultiSigVault)
//!   address routes all administration through its quorum protocol.
//! - **Pause gate**: while paused, every value-moving operation (`transfer`,
//!   `mint`, `burn`) fails with [`TokenError::TransfersPaused`]. Governance
//!   operations stay live — pause freezes value movement, not control.
//! - **Rescue guard**: the owner can sweep foreign tokens accidentally sent
//!   to the ledger's address, but never the ledger's own token — that would
//!   be a cap-free backdoor into the supply accounting.
//!
//! Every failure aborts the whole operation with zero state mutation. All
//! guard checks run before the first write.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::Address;
use crate::multisig::ProposalTarget;

/// Human-readable token name.
pub const TOKEN_NAME: &str = "FortyTwo Token";

/// Ticker symbol.
pub const TOKEN_SYMBOL: &str = "FT42";

/// Decimal places. One whole FT42 is `10^18` base units.
pub const TOKEN_DECIMALS: u8 = 18;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The caller is not the current owner.
    #[error("unauthorized: {caller} is not the ledger owner")]
    Unauthorized {
        /// The principal that attempted the operation.
        caller: Address,
    },

    /// The recipient is the null principal.
    #[error("invalid recipient: the zero address cannot receive value")]
    InvalidRecipient,

    /// The proposed owner is the null principal.
    #[error("invalid owner: the zero address cannot own the ledger")]
    InvalidOwner,

    /// The supply cap must be positive.
    #[error("invalid cap: the cap must be greater than zero")]
    ZeroCap,

    /// A debit exceeds the account's holdings.
    #[error("insufficient balance: account holds {balance}, tried to debit {amount}")]
    InsufficientBalance {
        /// Current balance of the debited account.
        balance: u128,
        /// Amount the caller tried to debit.
        amount: u128,
    },

    /// A mint would push `total_supply` past the cap.
    #[error("cap exceeded: requested {requested} but only {headroom} remains under the cap")]
    CapExceeded {
        /// Amount the caller tried to mint.
        requested: u128,
        /// Remaining room under the cap.
        headroom: u128,
    },

    /// A value-moving operation was attempted while the ledger is paused.
    #[error("transfers are paused")]
    TransfersPaused,

    /// `pause()` was called on an already-paused ledger.
    #[error("already paused")]
    AlreadyPaused,

    /// `unpause()` was called on a ledger that is not paused.
    #[error("not paused")]
    NotPaused,

    /// A rescue targeted the ledger's own token.
    #[error("self rescue forbidden: the ledger cannot rescue its own token")]
    SelfRescueForbidden,

    /// The foreign asset's transfer failed downstream.
    #[error("external transfer failed: {reason}")]
    ExternalTransferFailed {
        /// The downstream failure, rendered as text.
        reason: String,
    },

    /// Arithmetic overflow during a supply or balance update.
    #[error("amount overflow: operation would exceed u128::MAX")]
    AmountOverflow,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Observable events emitted by the ledger, in emission order.
///
/// This is the ledger's whole observability surface — there is no logging
/// in the core. External tooling reads the event stream; tests assert on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Value moved. `from: None` signals a mint, `to: None` a burn.
    Transfer {
        /// Debited account, or `None` for a mint.
        from: Option<Address>,
        /// Credited account, or `None` for a burn.
        to: Option<Address>,
        /// Amount moved, in base units.
        amount: u128,
    },
    /// Ownership changed hands.
    OwnershipTransferred {
        /// The owner before the change.
        previous: Address,
        /// The owner after the change.
        next: Address,
    },
    /// Value movement was frozen.
    Paused,
    /// Value movement was unfrozen.
    Unpaused,
}

// ---------------------------------------------------------------------------
// Governance actions
// ---------------------------------------------------------------------------

/// An administrative action the ledger accepts from a governance proposal.
///
/// This is the typed half of the vault/ledger boundary: the vault carries
/// opaque bytes, the ledger decodes them into a `LedgerAction` and applies
/// it with the vault's address as the caller. JSON keeps the payloads
/// inspectable by off-chain tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LedgerAction {
    /// Mint `amount` base units to `to`.
    Mint {
        /// Recipient of the minted value.
        to: Address,
        /// Amount in base units.
        amount: u128,
    },
    /// Freeze value movement.
    Pause,
    /// Unfreeze value movement.
    Unpause,
    /// Hand ownership to a new principal.
    TransferOwnership {
        /// The principal receiving ownership.
        new_owner: Address,
    },
}

impl LedgerAction {
    /// Encodes the action as a vault proposal payload.
    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Decodes a vault proposal payload.
    pub fn decode(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

// ---------------------------------------------------------------------------
// Foreign assets
// ---------------------------------------------------------------------------

/// A third-party asset ledger that value can be rescued out of.
///
/// Implemented by [`Ft42Token`] itself, so tokens mistakenly sent from one
/// FT42 deployment to another can be swept back out. The error type is
/// opaque (`anyhow`) because the rescuing ledger neither knows nor cares
/// what the foreign asset's failure modes are — any failure surfaces as
/// [`TokenError::ExternalTransferFailed`].
pub trait ForeignAsset {
    /// The foreign ledger's own address.
    fn asset_id(&self) -> Address;

    /// Moves `amount` of the foreign asset from `holder` to `to`.
    ///
    /// `holder` is the rescuing contract's address — the foreign ledger
    /// applies its ordinary transfer rules with `holder` as the caller.
    fn transfer_out(&mut self, holder: Address, to: Address, amount: u128) -> anyhow::Result<()>;
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// A deployed FT42 ledger instance.
///
/// Holds the balance map, supply counters, pause switch, owner, and event
/// log for one token deployment. The instance is assigned a fresh address
/// at construction, standing in for the platform's deployment address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ft42Token {
    /// This deployment's own address.
    address: Address,
    /// The principal allowed to mint, pause, and rescue.
    owner: Address,
    /// Immutable upper bound on `total_supply`.
    cap: u128,
    /// Sum of all balances. Never exceeds `cap`.
    total_supply: u128,
    /// When `true`, value-moving operations are rejected.
    paused: bool,
    /// Per-account balances. Zero balances are pruned, not stored.
    balances: HashMap<Address, u128>,
    /// Emitted events, oldest first.
    events: Vec<Event>,
    /// Timestamp when the ledger was constructed.
    created_at: DateTime<Utc>,
    /// Timestamp of the most recent state change.
    updated_at: DateTime<Utc>,
}

impl Ft42Token {
    /// Constructs a ledger with `initial_supply` minted to `initial_owner`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidOwner`] if `initial_owner` is the zero
    /// address, [`TokenError::ZeroCap`] if `cap` is zero, and
    /// [`TokenError::CapExceeded`] if `initial_supply > cap`.
    pub fn new(
        initial_owner: Address,
        initial_supply: u128,
        cap: u128,
    ) -> Result<Self, TokenError> {
        if initial_owner.is_zero() {
            return Err(TokenError::InvalidOwner);
        }
        if cap == 0 {
            return Err(TokenError::ZeroCap);
        }
        if initial_supply > cap {
            return Err(TokenError::CapExceeded {
                requested: initial_supply,
                headroom: cap,
            });
        }

        let now = Utc::now();
        let mut balances = HashMap::new();
        if initial_supply > 0 {
            balances.insert(initial_owner, initial_supply);
        }

        Ok(Self {
            address: Address::random(),
            owner: initial_owner,
            cap,
            total_supply: initial_supply,
            paused: false,
            balances,
            events: vec![Event::Transfer {
                from: None,
                to: Some(initial_owner),
                amount: initial_supply,
            }],
            created_at: now,
            updated_at: now,
        })
    }

    // -- metadata ----------------------------------------------------------

    /// Human-readable token name.
    pub fn name(&self) -> &'static str {
        TOKEN_NAME
    }

    /// Ticker symbol.
    pub fn symbol(&self) -> &'static str {
        TOKEN_SYMBOL
    }

    /// Decimal places.
    pub fn decimals(&self) -> u8 {
        TOKEN_DECIMALS
    }

    // -- queries -----------------------------------------------------------

    /// This deployment's own address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The current owner.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// The immutable supply cap.
    pub fn cap(&self) -> u128 {
        self.cap
    }

    /// The current total supply.
    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Whether value movement is currently frozen.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Returns the balance of `account`, or 0 for unknown accounts.
    pub fn balance_of(&self, account: Address) -> u128 {
        self.balances.get(&account).copied().unwrap_or(0)
    }

    /// All events emitted so far, oldest first.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Drains and returns the event log, oldest first.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // -- value movement ----------------------------------------------------

    /// Moves `amount` base units from `caller` to `to`.
    ///
    /// Self-transfers and zero amounts are permitted; both still emit a
    /// [`Event::Transfer`].
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::TransfersPaused`] while paused,
    /// [`TokenError::InvalidRecipient`] if `to` is the zero address, and
    /// [`TokenError::InsufficientBalance`] if `caller` holds less than
    /// `amount`.
    pub fn transfer(&mut self, caller: Address, to: Address, amount: u128) -> Result<(), TokenError> {
        self.ensure_not_paused()?;
        if to.is_zero() {
            return Err(TokenError::InvalidRecipient);
        }

        self.debit(caller, amount)?;
        self.credit(to, amount)?;

        self.record(Event::Transfer {
            from: Some(caller),
            to: Some(to),
            amount,
        });
        Ok(())
    }

    /// Mints `amount` base units to `to`. Owner only.
    ///
    /// Minting honors the pause gate: a paused ledger mints nothing. The cap
    /// check is strict — there is no partial mint.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Unauthorized`] for non-owners,
    /// [`TokenError::TransfersPaused`] while paused,
    /// [`TokenError::InvalidRecipient`] if `to` is the zero address, and
    /// [`TokenError::CapExceeded`] if the mint does not fit under the cap.
    pub fn mint(&mut self, caller: Address, to: Address, amount: u128) -> Result<(), TokenError> {
        self.ensure_owner(caller)?;
        self.ensure_not_paused()?;
        if to.is_zero() {
            return Err(TokenError::InvalidRecipient);
        }

        let headroom = self
            .cap
            .checked_sub(self.total_supply)
            .ok_or(TokenError::AmountOverflow)?;
        if amount > headroom {
            return Err(TokenError::CapExceeded {
                requested: amount,
                headroom,
            });
        }

        self.total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::AmountOverflow)?;
        self.credit(to, amount)?;

        self.record(Event::Transfer {
            from: None,
            to: Some(to),
            amount,
        });
        Ok(())
    }

    /// Burns `amount` base units from the caller's own balance.
    ///
    /// Any holder can burn their own tokens — burning is not owner-gated.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::TransfersPaused`] while paused and
    /// [`TokenError::InsufficientBalance`] if `caller` holds less than
    /// `amount`.
    pub fn burn(&mut self, caller: Address, amount: u128) -> Result<(), TokenError> {
        self.ensure_not_paused()?;

        self.debit(caller, amount)?;
        self.total_supply = self
            .total_supply
            .checked_sub(amount)
            .ok_or(TokenError::AmountOverflow)?;

        self.record(Event::Transfer {
            from: Some(caller),
            to: None,
            amount,
        });
        Ok(())
    }

    // -- governance --------------------------------------------------------

    /// Freezes value movement. Owner only; never itself pause-gated.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Unauthorized`] for non-owners and
    /// [`TokenError::AlreadyPaused`] if the ledger is already paused.
    pub fn pause(&mut self, caller: Address) -> Result<(), TokenError> {
        self.ensure_owner(caller)?;
        if self.paused {
            return Err(TokenError::AlreadyPaused);
        }
        self.paused = true;
        self.record(Event::Paused);
        Ok(())
    }

    /// Unfreezes value movement. Owner only.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Unauthorized`] for non-owners and
    /// [`TokenError::NotPaused`] if the ledger is not paused.
    pub fn unpause(&mut self, caller: Address) -> Result<(), TokenError> {
        self.ensure_owner(caller)?;
        if !self.paused {
            return Err(TokenError::NotPaused);
        }
        self.paused = false;
        self.record(Event::Unpaused);
        Ok(())
    }

    /// Hands ownership to `new_owner`. Owner only; works while paused.
    ///
    /// Transferring ownership to a [`MultiSigVault`] address is how the
    /// ledger is placed under quorum governance.
    ///
    /// [`MultiSigVault`]: crate::multisig::MultiSigVault
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Unauthorized`] for non-owners and
    /// [`TokenError::InvalidOwner`] if `new_owner` is the zero address.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), TokenError> {
        self.ensure_owner(caller)?;
        if new_owner.is_zero() {
            return Err(TokenError::InvalidOwner);
        }
        let previous = self.owner;
        self.owner = new_owner;
        self.record(Event::OwnershipTransferred {
            previous,
            next: new_owner,
        });
        Ok(())
    }

    /// Sweeps `amount` of a foreign asset held at this ledger's address out
    /// to `to`. Owner only; works while paused.
    ///
    /// The one asset that can never be rescued is this ledger's own token:
    /// that path would sidestep the cap and balance accounting entirely.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Unauthorized`] for non-owners,
    /// [`TokenError::InvalidRecipient`] if `to` is the zero address,
    /// [`TokenError::SelfRescueForbidden`] if `foreign` is this ledger's own
    /// token, and [`TokenError::ExternalTransferFailed`] if the foreign
    /// ledger rejects the transfer.
    pub fn rescue_foreign_value(
        &mut self,
        caller: Address,
        foreign: &mut dyn ForeignAsset,
        to: Address,
        amount: u128,
    ) -> Result<(), TokenError> {
        self.ensure_owner(caller)?;
        if to.is_zero() {
            return Err(TokenError::InvalidRecipient);
        }
        if foreign.asset_id() == self.address {
            return Err(TokenError::SelfRescueForbidden);
        }

        foreign
            .transfer_out(self.address, to, amount)
            .map_err(|err| TokenError::ExternalTransferFailed {
                reason: err.to_string(),
            })
    }

    /// Applies a decoded governance action on behalf of `caller`.
    ///
    /// The caller goes through the same owner checks as a direct invocation
    /// — a vault can only administer a ledger it actually owns.
    pub fn apply(&mut self, caller: Address, action: &LedgerAction) -> Result<(), TokenError> {
        match action {
            LedgerAction::Mint { to, amount } => self.mint(caller, *to, *amount),
            LedgerAction::Pause => self.pause(caller),
            LedgerAction::Unpause => self.unpause(caller),
            LedgerAction::TransferOwnership { new_owner } => {
                self.transfer_ownership(caller, *new_owner)
            }
        }
    }

    // -- internals ---------------------------------------------------------

    fn ensure_owner(&self, caller: Address) -> Result<(), TokenError> {
        if caller != self.owner {
            return Err(TokenError::Unauthorized { caller });
        }
        Ok(())
    }

    fn ensure_not_paused(&self) -> Result<(), TokenError> {
        if self.paused {
            return Err(TokenError::TransfersPaused);
        }
        Ok(())
    }

    /// Removes `amount` from `from`. Zero balances are pruned so that an
    /// absent entry and a zero entry stay indistinguishable.
    fn debit(&mut self, from: Address, amount: u128) -> Result<(), TokenError> {
        if amount == 0 {
            return Ok(());
        }
        let balance = self.balance_of(from);
        if balance < amount {
            return Err(TokenError::InsufficientBalance { balance, amount });
        }
        let remaining = balance - amount;
        if remaining == 0 {
            self.balances.remove(&from);
        } else {
            self.balances.insert(from, remaining);
        }
        Ok(())
    }

    fn credit(&mut self, to: Address, amount: u128) -> Result<(), TokenError> {
        if amount == 0 {
            return Ok(());
        }
        let balance = self.balances.entry(to).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(TokenError::AmountOverflow)?;
        Ok(())
    }

    fn record(&mut self, event: Event) {
        self.events.push(event);
        self.updated_at = Utc::now();
    }
}

impl ForeignAsset for Ft42Token {
    fn asset_id(&self) -> Address {
        self.address
    }

    fn transfer_out(&mut self, holder: Address, to: Address, amount: u128) -> anyhow::Result<()> {
        self.transfer(holder, to, amount)?;
        Ok(())
    }
}

impl ProposalTarget for Ft42Token {
    fn target_address(&self) -> Address {
        self.address
    }

    fn dispatch(&mut self, caller: Address, payload: &[u8]) -> anyhow::Result<()> {
        let action = LedgerAction::decode(payload)?;
        self.apply(caller, &action)?;
        Ok(())
    }
}
