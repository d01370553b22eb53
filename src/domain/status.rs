//! Canonical deal statuses and their classification.
//!
//! The raw-status mapping is protocol data, not logic: Lotus reports a deal's
//! `State` as a numeric code, and its tooling names the same state with a
//! `StorageDeal*` label. Both forms translate through one versioned constant
//! table. Codes the table does not know translate to [`DealStatus::Unknown`]
//! rather than failing, so a node running a newer protocol version can never
//! crash the tracker.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical deal status, closed and versioned with the remote protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DealStatus {
    Unknown,
    ProposalNotFound,
    ProposalRejected,
    ProposalAccepted,
    Staged,
    Sealing,
    Finalizing,
    Active,
    Expired,
    Slashed,
    Rejecting,
    Failing,
    FundsEnsured,
    WaitingForDataRequest,
    Validating,
    AcceptWait,
    StartDataTransfer,
    Transferring,
    WaitingForLastDealStateTransfer,
    Completing,
    CheckForAcceptance,
    Error,
}

/// Result of classifying a [`DealStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealProgress {
    /// The deal is still moving through the provider pipeline.
    InProgress,
    /// The deal sealed and is being honored.
    Success,
    /// The deal reached a permanently failed state.
    Failure,
}

/// One row of the raw-status translation table: numeric wire code, wire
/// label, canonical status.
type StatusRow = (u64, &'static str, DealStatus);

/// Versioned translation table for the Lotus storage deal protocol.
///
/// Order matches the remote enumeration; the numeric code is the index the
/// node reports in `ClientListDeals`.
const STATUS_TABLE: &[StatusRow] = &[
    (0, "StorageDealUnknown", DealStatus::Unknown),
    (1, "StorageDealProposalNotFound", DealStatus::ProposalNotFound),
    (2, "StorageDealProposalRejected", DealStatus::ProposalRejected),
    (3, "StorageDealProposalAccepted", DealStatus::ProposalAccepted),
    (4, "StorageDealStaged", DealStatus::Staged),
    (5, "StorageDealSealing", DealStatus::Sealing),
    (6, "StorageDealFinalizing", DealStatus::Finalizing),
    (7, "StorageDealActive", DealStatus::Active),
    (8, "StorageDealExpired", DealStatus::Expired),
    (9, "StorageDealSlashed", DealStatus::Slashed),
    (10, "StorageDealRejecting", DealStatus::Rejecting),
    (11, "StorageDealFailing", DealStatus::Failing),
    (12, "StorageDealFundsEnsured", DealStatus::FundsEnsured),
    (
        13,
        "StorageDealWaitingForDataRequest",
        DealStatus::WaitingForDataRequest,
    ),
    (14, "StorageDealValidating", DealStatus::Validating),
    (15, "StorageDealAcceptWait", DealStatus::AcceptWait),
    (16, "StorageDealStartDataTransfer", DealStatus::StartDataTransfer),
    (17, "StorageDealTransferring", DealStatus::Transferring),
    (
        18,
        "StorageDealWaitingForLastDealStateTransfer",
        DealStatus::WaitingForLastDealStateTransfer,
    ),
    (19, "StorageDealCompleting", DealStatus::Completing),
    (20, "StorageDealCheckForAcceptance", DealStatus::CheckForAcceptance),
    (21, "StorageDealError", DealStatus::Error),
];

/// Statuses after which no further progress is expected and the deal has
/// failed. Membership is configuration, not computation.
const TERMINAL_FAILURES: &[DealStatus] = &[
    DealStatus::Error,
    DealStatus::ProposalRejected,
    DealStatus::ProposalNotFound,
    DealStatus::Failing,
    DealStatus::Rejecting,
    DealStatus::Expired,
    DealStatus::Slashed,
];

impl DealStatus {
    /// Every canonical status, for exhaustiveness checks.
    pub const ALL: &'static [DealStatus] = &[
        DealStatus::Unknown,
        DealStatus::ProposalNotFound,
        DealStatus::ProposalRejected,
        DealStatus::ProposalAccepted,
        DealStatus::Staged,
        DealStatus::Sealing,
        DealStatus::Finalizing,
        DealStatus::Active,
        DealStatus::Expired,
        DealStatus::Slashed,
        DealStatus::Rejecting,
        DealStatus::Failing,
        DealStatus::FundsEnsured,
        DealStatus::WaitingForDataRequest,
        DealStatus::Validating,
        DealStatus::AcceptWait,
        DealStatus::StartDataTransfer,
        DealStatus::Transferring,
        DealStatus::WaitingForLastDealStateTransfer,
        DealStatus::Completing,
        DealStatus::CheckForAcceptance,
        DealStatus::Error,
    ];

    /// Translate a numeric wire code. Unmapped codes become `Unknown`.
    pub fn from_code(code: u64) -> Self {
        STATUS_TABLE
            .iter()
            .find(|(c, _, _)| *c == code)
            .map(|(_, _, status)| *status)
            .unwrap_or(DealStatus::Unknown)
    }

    /// Translate a wire label such as `"StorageDealActive"`. Unmapped labels
    /// become `Unknown`.
    pub fn from_label(label: &str) -> Self {
        STATUS_TABLE
            .iter()
            .find(|(_, l, _)| *l == label)
            .map(|(_, _, status)| *status)
            .unwrap_or(DealStatus::Unknown)
    }

    /// The `StorageDeal*` label the protocol uses for this status.
    pub fn wire_label(&self) -> &'static str {
        STATUS_TABLE
            .iter()
            .find(|(_, _, s)| s == self)
            .map(|(_, label, _)| *label)
            .unwrap_or("StorageDealUnknown")
    }

    /// Short name without the wire prefix, used in errors and logs.
    pub fn as_str(&self) -> &'static str {
        self.wire_label()
            .strip_prefix("StorageDeal")
            .unwrap_or("Unknown")
    }

    /// Classify this status as in-progress, terminal success, or terminal
    /// failure.
    ///
    /// Total over [`DealStatus`]: `Active` is the sole success, members of
    /// the terminal failure set fail, and everything else (including
    /// `Unknown`, which may be a status from a newer protocol version) is
    /// still in progress.
    pub fn classify(&self) -> DealProgress {
        if *self == DealStatus::Active {
            DealProgress::Success
        } else if TERMINAL_FAILURES.contains(self) {
            DealProgress::Failure
        } else {
            DealProgress::InProgress
        }
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A deal state exactly as the remote node reported it, before translation.
///
/// Lotus itself sends the numeric code; scripted fixtures and logs may use
/// the label form. Both deserialize transparently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDealState {
    Code(u64),
    Label(String),
}

impl RawDealState {
    /// Translate into the canonical status via the versioned table.
    pub fn translate(&self) -> DealStatus {
        match self {
            RawDealState::Code(code) => DealStatus::from_code(*code),
            RawDealState::Label(label) => DealStatus::from_label(label),
        }
    }
}

impl From<u64> for RawDealState {
    fn from(code: u64) -> Self {
        RawDealState::Code(code)
    }
}

impl From<&str> for RawDealState {
    fn from(label: &str) -> Self {
        RawDealState::Label(label.to_string())
    }
}
