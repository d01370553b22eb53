//! Wire DTOs for the Lotus JSON-RPC surface.
//!
//! Lotus wraps CIDs as `{"/": "bafy..."}` objects and names deal proposal
//! fields in PascalCase; these types own that translation so the domain
//! stays wire-agnostic.

use serde::{Deserialize, Serialize};

use crate::domain::{DealProposal, DealRecord, RawDealState};

/// JSON-RPC 2.0 request envelope.
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a, P> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: P,
}

impl<'a, P> RpcRequest<'a, P> {
    pub fn new(id: u64, method: &'a str, params: P) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }
}

/// JSON-RPC 2.0 response envelope.
///
/// `id` is optional so server-initiated notifications deserialize too; the
/// client skips frames whose id does not match the outstanding request.
#[derive(Debug, Deserialize)]
pub struct RpcResponse<R> {
    pub id: Option<u64>,
    pub result: Option<R>,
    pub error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct RpcErrorBody {
    pub code: i64,
    pub message: String,
}

/// Lotus's JSON form of a CID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CidRef {
    #[serde(rename = "/")]
    pub cid: String,
}

impl CidRef {
    pub fn new(cid: impl Into<String>) -> Self {
        Self { cid: cid.into() }
    }
}

/// `Filecoin.ClientStartDeal` parameter object.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StartDealParams {
    pub data: DataRef,
    pub wallet: String,
    pub miner: String,
    pub epoch_price: String,
    pub min_blocks_duration: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataRef {
    pub transfer_type: String,
    pub root: CidRef,
    pub piece_cid: Option<CidRef>,
    pub piece_size: u64,
}

impl From<&DealProposal> for StartDealParams {
    fn from(proposal: &DealProposal) -> Self {
        Self {
            data: DataRef {
                transfer_type: proposal.transfer_type.clone(),
                root: CidRef::new(proposal.root.to_string()),
                piece_cid: proposal
                    .piece_cid
                    .as_ref()
                    .map(|c| CidRef::new(c.to_string())),
                piece_size: proposal.piece_size,
            },
            wallet: proposal.wallet.to_string(),
            miner: proposal.miner.to_string(),
            epoch_price: proposal.epoch_price.clone(),
            min_blocks_duration: proposal.min_blocks_duration,
        }
    }
}

/// One entry of the `Filecoin.ClientListDeals` result. Fields beyond the
/// proposal CID and state are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DealInfo {
    pub proposal_cid: CidRef,
    pub state: RawDealState,
}

impl From<DealInfo> for DealRecord {
    fn from(info: DealInfo) -> Self {
        DealRecord::new(info.proposal_cid.cid, info.state)
    }
}
