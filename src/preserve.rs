//! End-to-end preserve workflow: from a published content root to a tracked
//! storage deal.
//!
//! The workflow is strictly sequential; each step suspends until its RPC
//! call returns, and the first failure aborts the remainder. There is no
//! rollback: once submitted, a failed deal is reported, not withdrawn.

use std::collections::HashMap;

use cid::Cid;
use tracing::{debug, info};

use crate::config::Config;
use crate::domain::{DealHandle, DealProposal, MinerAddress};
use crate::error::{InputError, Result};
use crate::node::StorageNode;
use crate::progress::ProgressSink;
use crate::tracker::{CancelSignal, DealTracker, TrackerOptions};

/// Label under which the upstream pipeline stage publishes the content root.
pub const IPFS_STAGE: &str = "preserve-to-ipfs";

/// What kind of source a preservation target wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A single content blob.
    Content,
    /// A directory tree.
    Directory,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Content => "content",
            SourceKind::Directory => "directory",
        }
    }
}

/// The thing being preserved. Only directory-class sources are supported;
/// the check is made before any network activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub kind: SourceKind,
}

impl Target {
    pub fn directory() -> Self {
        Self {
            kind: SourceKind::Directory,
        }
    }

    pub fn content() -> Self {
        Self {
            kind: SourceKind::Content,
        }
    }
}

/// Content roots published by earlier pipeline stages, keyed by stage name.
#[derive(Debug, Default, Clone)]
pub struct StageLabels(HashMap<String, Cid>);

impl StageLabels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, stage: impl Into<String>, root: Cid) {
        self.0.insert(stage.into(), root);
    }

    pub fn root_for(&self, stage: &str) -> Option<&Cid> {
        self.0.get(stage)
    }
}

/// Inputs to one preserve invocation.
#[derive(Debug, Clone)]
pub struct PreserveRequest {
    pub target: Target,
    pub labels: StageLabels,
}

/// Negotiate and track a single storage deal for the request's content root.
///
/// Sequences the whole workflow: validates the target, resolves the root CID
/// from the upstream stage's label, selects a miner (naively, the first one
/// listed), fetches the default wallet, submits the proposal, and tracks the
/// resulting deal until it is active. Each major step is narrated to `sink`
/// as a declare/resolve pair.
///
/// On success returns the deal handle (the proposal CID). On failure the
/// first error surfaces as-is: an [`InputError`] before any RPC is made, a
/// transport error from the failing call, or a tracking error carrying the
/// terminal status.
pub async fn preserve(
    request: &PreserveRequest,
    node: &dyn StorageNode,
    sink: &dyn ProgressSink,
    config: &Config,
    cancel: CancelSignal,
) -> Result<DealHandle> {
    if request.target.kind != SourceKind::Directory {
        return Err(InputError::UnsupportedSource {
            kind: request.target.kind.as_str(),
        }
        .into());
    }

    sink.log("Preserving to Filecoin...");

    let root = request
        .labels
        .root_for(IPFS_STAGE)
        .ok_or_else(|| InputError::MissingLabel {
            stage: IPFS_STAGE.to_string(),
        })?;

    let miners_step = sink.declare("Retrieving miners...");
    let miners = node.state_list_miners().await?;
    miners_step.resolve(&format!("{} miners", miners.len()));

    // Naive selection policy: first listed miner.
    let miner: MinerAddress = miners.into_iter().next().ok_or(InputError::NoMiners)?;
    debug!(miner = %miner, "Selected miner");

    let wallet = node.wallet_default_address().await?;
    debug!(wallet = %wallet, "Using default wallet");

    let proposal = DealProposal::new(
        root,
        wallet,
        miner,
        config.deal.epoch_price.clone(),
        config.deal.min_blocks_duration,
    );

    let deal_step = sink.declare("Proposing storage deal...");
    let handle = node.client_start_deal(&proposal).await?;
    deal_step.resolve(handle.as_str());
    info!(handle = %handle, node = node.node_name(), "Deal proposed");

    let wait_step = sink.declare("Waiting for deal to finish...");
    let tracker = DealTracker::new(TrackerOptions {
        cadence: config.tracker.cadence(),
        deadline: config.tracker.deadline(),
    });
    let status = tracker.track(&handle, node, cancel).await?;
    wait_step.resolve(status.as_str());

    Ok(handle)
}
