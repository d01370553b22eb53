//! Mock [`StorageNode`] implementation for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{DealHandle, DealProposal, DealRecord, MinerAddress, WalletAddress};
use crate::error::{Error, Result};
use crate::node::StorageNode;

/// A mock node with scripted `client_list_deals` responses and counters.
///
/// Each call to `client_list_deals` pops the next scripted result; when the
/// script is exhausted it returns the fallback deal list (empty by default,
/// i.e. the deal is not visible). Miner list, wallet, and the handle
/// returned by `client_start_deal` are fixed per instance.
///
/// The in-flight gauge records how many list queries overlap, so tests can
/// assert the tracker's single-outstanding-query invariant.
pub struct ScriptedNode {
    miners: Vec<MinerAddress>,
    wallet: WalletAddress,
    start_deal_handle: DealHandle,
    deal_responses: Mutex<VecDeque<Result<Vec<DealRecord>>>>,
    fallback_deals: Vec<DealRecord>,
    /// Artificial latency for each `client_list_deals` call.
    list_deals_latency: Option<Duration>,
    list_miners_count: Arc<AtomicU32>,
    wallet_count: Arc<AtomicU32>,
    start_deal_count: Arc<AtomicU32>,
    list_deals_count: Arc<AtomicU32>,
    in_flight: Arc<AtomicU32>,
    max_in_flight: Arc<AtomicU32>,
    proposals: Mutex<Vec<DealProposal>>,
}

impl ScriptedNode {
    pub fn new() -> Self {
        Self {
            miners: vec![MinerAddress::from("t01000")],
            wallet: WalletAddress::from("t3defaultwallet"),
            start_deal_handle: DealHandle::from("bafyreidealhandle"),
            deal_responses: Mutex::new(VecDeque::new()),
            fallback_deals: Vec::new(),
            list_deals_latency: None,
            list_miners_count: Arc::new(AtomicU32::new(0)),
            wallet_count: Arc::new(AtomicU32::new(0)),
            start_deal_count: Arc::new(AtomicU32::new(0)),
            list_deals_count: Arc::new(AtomicU32::new(0)),
            in_flight: Arc::new(AtomicU32::new(0)),
            max_in_flight: Arc::new(AtomicU32::new(0)),
            proposals: Mutex::new(Vec::new()),
        }
    }

    pub fn with_miners(mut self, miners: Vec<MinerAddress>) -> Self {
        self.miners = miners;
        self
    }

    pub fn with_wallet(mut self, wallet: WalletAddress) -> Self {
        self.wallet = wallet;
        self
    }

    pub fn with_start_deal_handle(mut self, handle: DealHandle) -> Self {
        self.start_deal_handle = handle;
        self
    }

    /// Script the successive `client_list_deals` results.
    pub fn with_deal_responses(mut self, responses: Vec<Result<Vec<DealRecord>>>) -> Self {
        self.deal_responses = Mutex::new(responses.into());
        self
    }

    /// Deal list returned once the script is exhausted.
    pub fn with_fallback_deals(mut self, deals: Vec<DealRecord>) -> Self {
        self.fallback_deals = deals;
        self
    }

    /// Make each `client_list_deals` call take this long.
    pub fn with_list_deals_latency(mut self, latency: Duration) -> Self {
        self.list_deals_latency = Some(latency);
        self
    }

    pub fn list_miners_count(&self) -> u32 {
        self.list_miners_count.load(Ordering::SeqCst)
    }

    pub fn wallet_count(&self) -> u32 {
        self.wallet_count.load(Ordering::SeqCst)
    }

    pub fn start_deal_count(&self) -> u32 {
        self.start_deal_count.load(Ordering::SeqCst)
    }

    pub fn list_deals_count(&self) -> u32 {
        self.list_deals_count.load(Ordering::SeqCst)
    }

    /// Total RPC calls across every method.
    pub fn total_calls(&self) -> u32 {
        self.list_miners_count()
            + self.wallet_count()
            + self.start_deal_count()
            + self.list_deals_count()
    }

    /// Highest number of concurrently outstanding `client_list_deals` calls
    /// observed.
    pub fn max_in_flight(&self) -> u32 {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Proposals submitted via `client_start_deal`.
    pub fn submitted_proposals(&self) -> Vec<DealProposal> {
        self.proposals.lock().unwrap().clone()
    }
}

impl Default for ScriptedNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageNode for ScriptedNode {
    async fn state_list_miners(&self) -> Result<Vec<MinerAddress>> {
        self.list_miners_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.miners.clone())
    }

    async fn wallet_default_address(&self) -> Result<WalletAddress> {
        self.wallet_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.wallet.clone())
    }

    async fn client_start_deal(&self, proposal: &DealProposal) -> Result<DealHandle> {
        self.start_deal_count.fetch_add(1, Ordering::SeqCst);
        self.proposals.lock().unwrap().push(proposal.clone());
        Ok(self.start_deal_handle.clone())
    }

    async fn client_list_deals(&self) -> Result<Vec<DealRecord>> {
        self.list_deals_count.fetch_add(1, Ordering::SeqCst);
        let concurrent = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(concurrent, Ordering::SeqCst);

        if let Some(latency) = self.list_deals_latency {
            tokio::time::sleep(latency).await;
        }

        let result = self
            .deal_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback_deals.clone()));

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn node_name(&self) -> &'static str {
        "scripted"
    }
}

/// A node whose every method fails, for transport-error paths.
pub struct FailingNode;

#[async_trait]
impl StorageNode for FailingNode {
    async fn state_list_miners(&self) -> Result<Vec<MinerAddress>> {
        Err(Error::Connection("scripted failure".into()))
    }

    async fn wallet_default_address(&self) -> Result<WalletAddress> {
        Err(Error::Connection("scripted failure".into()))
    }

    async fn client_start_deal(&self, _proposal: &DealProposal) -> Result<DealHandle> {
        Err(Error::Connection("scripted failure".into()))
    }

    async fn client_list_deals(&self) -> Result<Vec<DealRecord>> {
        Err(Error::Connection("scripted failure".into()))
    }

    fn node_name(&self) -> &'static str {
        "failing"
    }
}
