//! # Multisig Vault
//!
//! An N-of-M approval gate for administrative actions. The vault holds a
//! fixed set of signers and a quorum threshold, both immutable after
//! construction — rotating signers means deploying a new vault and moving
//! ownership of the governed contract over to it.
//!
//! The vault knows nothing about what it governs. Proposals carry an opaque
//! byte payload addressed to a target contract; at execution time the
//! payload is handed to the target through the [`ProposalTarget`] trait and
//! the target does its own decoding. This keeps the vault reusable as a
//! governance primitive for any contract that accepts encoded actions.
//!
//! ## Execution Protocol
//!
//! A proposal is `Pending` until executed, and executed exactly once:
//!
//! 1. Any signer proposes `(target, payload)`. Proposing counts as the
//!    proposer's approval.
//! 2. Other signers approve. Duplicate approvals are rejected loudly so a
//!    double-submission is observable, never silently absorbed.
//! 3. Once approvals reach the threshold, any signer executes. The proposal
//!    is marked executed *before* the payload is dispatched, and the mark is
//!    rolled back if the dispatch fails — all-or-nothing, so a failed
//!    proposal keeps its approvals and stays retryable.
//!
//! Proposals are never deleted; executed ones remain as an audit trail.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::address::Address;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The caller is not one of the vault's signers.
    #[error("unauthorized: {caller} is not a vault signer")]
    Unauthorized {
        /// The principal that attempted the operation.
        caller: Address,
    },

    /// The vault was constructed with no signers.
    #[error("a vault needs at least one signer")]
    NoSigners,

    /// A signer appears twice in the construction list.
    #[error("duplicate signer: {signer}")]
    DuplicateSigner {
        /// The repeated signer.
        signer: Address,
    },

    /// The zero address was listed as a signer.
    #[error("the zero address cannot be a signer")]
    ZeroSigner,

    /// The threshold is zero or larger than the signer set.
    #[error("invalid threshold: {threshold} of {signers} signers")]
    InvalidThreshold {
        /// The requested quorum threshold.
        threshold: usize,
        /// The number of signers.
        signers: usize,
    },

    /// No proposal exists under the given id.
    #[error("unknown proposal: {id}")]
    UnknownProposal {
        /// The id that was looked up.
        id: String,
    },

    /// The proposal has already been executed.
    #[error("proposal {id} has already been executed")]
    AlreadyExecuted {
        /// The proposal's id.
        id: String,
    },

    /// The caller has already approved this proposal.
    #[error("duplicate approval: {signer} has already approved this proposal")]
    DuplicateApproval {
        /// The signer that double-submitted.
        signer: Address,
    },

    /// Execution was attempted below the quorum threshold.
    #[error("quorum not met: {approvals} of {threshold} required approvals")]
    QuorumNotMet {
        /// Approvals collected so far.
        approvals: usize,
        /// The quorum threshold.
        threshold: usize,
    },

    /// The supplied target is not the contract the proposal was addressed to.
    #[error("target mismatch: proposal is addressed to {expected}, got {actual}")]
    TargetMismatch {
        /// The address recorded on the proposal.
        expected: Address,
        /// The address of the supplied target.
        actual: Address,
    },

    /// The target rejected the dispatched payload.
    #[error("execution failed: {reason}")]
    ExecutionFailed {
        /// The downstream failure, rendered as text.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Unique identifier for a proposal, assigned by the vault at creation time.
pub type ProposalId = String;

/// A contract that can receive dispatched proposal payloads.
///
/// The vault addresses proposals by [`Address`]; at execution time the
/// caller supplies the matching contract object and the vault verifies the
/// address before dispatching. The error type is opaque (`anyhow`) — the
/// vault reports any downstream failure as [`VaultError::ExecutionFailed`]
/// without interpreting it.
pub trait ProposalTarget {
    /// The target contract's address.
    fn target_address(&self) -> Address;

    /// Decodes and applies `payload` on behalf of `caller`.
    ///
    /// `caller` is the vault's own address, so the target's access checks
    /// pass exactly when the vault holds the required capability.
    fn dispatch(&mut self, caller: Address, payload: &[u8]) -> anyhow::Result<()>;
}

/// A governance action awaiting approvals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    /// Unique identifier for this proposal.
    pub id: ProposalId,
    /// Address of the contract the payload is addressed to.
    pub target: Address,
    /// The encoded action. Opaque to the vault.
    pub payload: Vec<u8>,
    /// Signers that have approved, in approval order.
    pub approvals: Vec<Address>,
    /// Whether the proposal has been executed. Transitions false→true once.
    pub executed: bool,
    /// Timestamp when the proposal was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the proposal was executed (if it has been).
    pub executed_at: Option<DateTime<Utc>>,
}

impl Proposal {
    /// Number of distinct approvals collected so far.
    pub fn approval_count(&self) -> usize {
        self.approvals.len()
    }

    /// Whether `signer` has already approved this proposal.
    pub fn is_approved_by(&self, signer: Address) -> bool {
        self.approvals.contains(&signer)
    }
}

/// An N-of-M multisig vault.
///
/// Signers and threshold are fixed at construction. The vault has its own
/// address, which becomes the governed contract's owner when ownership is
/// handed over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiSigVault {
    /// This vault's own address.
    address: Address,
    /// The fixed signer set, in construction order.
    signers: Vec<Address>,
    /// Approvals required before a proposal may execute.
    threshold: usize,
    /// All proposals ever created, keyed by id. Never pruned.
    proposals: HashMap<ProposalId, Proposal>,
    /// Timestamp when the vault was constructed.
    created_at: DateTime<Utc>,
}

impl MultiSigVault {
    /// Constructs a vault with the given signer set and quorum threshold.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::NoSigners`] for an empty signer list,
    /// [`VaultError::ZeroSigner`] / [`VaultError::DuplicateSigner`] for
    /// invalid entries, and [`VaultError::InvalidThreshold`] unless
    /// `1 <= threshold <= signers.len()`.
    pub fn new(signers: Vec<Address>, threshold: usize) -> Result<Self, VaultError> {
        if signers.is_empty() {
            return Err(VaultError::NoSigners);
        }
        for (i, signer) in signers.iter().enumerate() {
            if signer.is_zero() {
                return Err(VaultError::ZeroSigner);
            }
            if signers[..i].contains(signer) {
                return Err(VaultError::DuplicateSigner { signer: *signer });
            }
        }
        if threshold == 0 || threshold > signers.len() {
            return Err(VaultError::InvalidThreshold {
                threshold,
                signers: signers.len(),
            });
        }

        Ok(Self {
            address: Address::random(),
            signers,
            threshold,
            proposals: HashMap::new(),
            created_at: Utc::now(),
        })
    }

    // -- queries -----------------------------------------------------------

    /// This vault's own address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The fixed signer set, in construction order.
    pub fn signers(&self) -> &[Address] {
        &self.signers
    }

    /// The quorum threshold.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Whether `principal` is one of the vault's signers.
    pub fn is_signer(&self, principal: Address) -> bool {
        self.signers.contains(&principal)
    }

    /// Looks up a proposal by id.
    pub fn proposal(&self, id: &str) -> Option<&Proposal> {
        self.proposals.get(id)
    }

    /// Number of proposals ever created.
    pub fn proposal_count(&self) -> usize {
        self.proposals.len()
    }

    // -- protocol ----------------------------------------------------------

    /// Creates a proposal addressed to `target` carrying `payload`.
    ///
    /// Proposing counts as the proposer's own approval, so a 1-of-M vault
    /// can execute immediately after proposing.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Unauthorized`] if `caller` is not a signer.
    pub fn propose(
        &mut self,
        caller: Address,
        target: Address,
        payload: Vec<u8>,
    ) -> Result<ProposalId, VaultError> {
        self.ensure_signer(caller)?;

        let id = Uuid::new_v4().to_string();
        let proposal = Proposal {
            id: id.clone(),
            target,
            payload,
            approvals: vec![caller],
            executed: false,
            created_at: Utc::now(),
            executed_at: None,
        };
        self.proposals.insert(id.clone(), proposal);
        Ok(id)
    }

    /// Records `caller`'s approval of a pending proposal.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Unauthorized`] if `caller` is not a signer,
    /// [`VaultError::UnknownProposal`] for an unknown id,
    /// [`VaultError::AlreadyExecuted`] for a terminal proposal, and
    /// [`VaultError::DuplicateApproval`] if `caller` already approved.
    pub fn approve(&mut self, caller: Address, id: &str) -> Result<(), VaultError> {
        self.ensure_signer(caller)?;

        let proposal = self
            .proposals
            .get_mut(id)
            .ok_or_else(|| VaultError::UnknownProposal { id: id.to_string() })?;

        if proposal.executed {
            return Err(VaultError::AlreadyExecuted {
                id: id.to_string(),
            });
        }
        if proposal.approvals.contains(&caller) {
            return Err(VaultError::DuplicateApproval { signer: caller });
        }

        proposal.approvals.push(caller);
        Ok(())
    }

    /// Executes a proposal that has reached quorum.
    ///
    /// Execution is an explicit signer call — reaching quorum inside
    /// [`approve`](Self::approve) never fires it automatically. The proposal
    /// is marked executed before the payload is dispatched; if the target
    /// rejects the payload the mark is rolled back and the approvals are
    /// kept, so the same proposal can be retried.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Unauthorized`] if `caller` is not a signer,
    /// [`VaultError::UnknownProposal`] for an unknown id,
    /// [`VaultError::AlreadyExecuted`] for a terminal proposal,
    /// [`VaultError::QuorumNotMet`] below threshold,
    /// [`VaultError::TargetMismatch`] if `target` is not the contract the
    /// proposal is addressed to, and [`VaultError::ExecutionFailed`] if the
    /// dispatch fails.
    pub fn execute(
        &mut self,
        caller: Address,
        id: &str,
        target: &mut dyn ProposalTarget,
    ) -> Result<(), VaultError> {
        self.ensure_signer(caller)?;

        let vault_address = self.address;
        let threshold = self.threshold;
        let proposal = self
            .proposals
            .get_mut(id)
            .ok_or_else(|| VaultError::UnknownProposal { id: id.to_string() })?;

        if proposal.executed {
            return Err(VaultError::AlreadyExecuted {
                id: id.to_string(),
            });
        }
        if proposal.approvals.len() < threshold {
            return Err(VaultError::QuorumNotMet {
                approvals: proposal.approvals.len(),
                threshold,
            });
        }
        if target.target_address() != proposal.target {
            return Err(VaultError::TargetMismatch {
                expected: proposal.target,
                actual: target.target_address(),
            });
        }

        // Terminal state is set before the dispatch and rolled back if the
        // dispatch fails, so the whole execution is all-or-nothing.
        proposal.executed = true;
        proposal.executed_at = Some(Utc::now());

        if let Err(err) = target.dispatch(vault_address, &proposal.payload) {
            proposal.executed = false;
            proposal.executed_at = None;
            return Err(VaultError::ExecutionFailed {
                reason: err.to_string(),
            });
        }
        Ok(())
    }

    // -- internals ---------------------------------------------------------

    fn ensure_signer(&self, caller: Address) -> Result<(), VaultError> {
        if !self.is_signer(caller) {
            return Err(VaultError::Unauthorized { caller });
        }
        Ok(())
    }
}
