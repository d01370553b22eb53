//! Storage node trait definitions.
//!
//! These traits define the remote-node surface the deal workflow consumes.
//! Every method is a fallible remote call; no retry or backoff is built in
//! at this boundary.

use async_trait::async_trait;

use crate::domain::{DealHandle, DealProposal, DealRecord, MinerAddress, WalletAddress};
use crate::error::Result;

/// The subset of a Lotus-style node API needed to negotiate and track one
/// storage deal.
#[async_trait]
pub trait StorageNode: Send + Sync {
    /// List the miner addresses known to the network head.
    async fn state_list_miners(&self) -> Result<Vec<MinerAddress>>;

    /// The node's default wallet address.
    async fn wallet_default_address(&self) -> Result<WalletAddress>;

    /// Submit a deal proposal and return the proposal CID as the handle for
    /// later status queries.
    async fn client_start_deal(&self, proposal: &DealProposal) -> Result<DealHandle>;

    /// List this client's deals with their raw, untranslated states.
    ///
    /// Queries are idempotent and side-effect free; a just-submitted deal
    /// may not be visible yet.
    async fn client_list_deals(&self) -> Result<Vec<DealRecord>>;

    /// Node implementation name for logging/debugging.
    fn node_name(&self) -> &'static str;
}
