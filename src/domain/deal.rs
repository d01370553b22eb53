//! Deal domain types: addresses, proposals, handles, tracked records.

use std::fmt;

use cid::Cid;
use serde::{Deserialize, Serialize};

use crate::domain::status::RawDealState;

/// Storage provider address - newtype for type safety.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MinerAddress(String);

impl MinerAddress {
    /// Create a new MinerAddress from a string.
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    /// Get the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MinerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for MinerAddress {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for MinerAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Wallet address funding a deal - newtype for type safety.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Create a new WalletAddress from a string.
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    /// Get the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WalletAddress {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for WalletAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// The proposal CID issued by the node when a deal is started.
///
/// Immutable once issued; the sole key for all subsequent status queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DealHandle(String);

impl DealHandle {
    pub fn new(cid: impl Into<String>) -> Self {
        Self(cid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DealHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DealHandle {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for DealHandle {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A storage deal proposal, constructed once per deal attempt and never
/// mutated.
///
/// Piece fields are unknown at proposal time: the node derives them during
/// data transfer, so `piece_cid` is `None` and `piece_size` zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealProposal {
    /// Root of the content to store, normalized to CIDv1.
    pub root: Cid,
    /// Data transfer protocol, `"graphsync"` for Lotus deals.
    pub transfer_type: String,
    pub piece_cid: Option<Cid>,
    pub piece_size: u64,
    pub wallet: WalletAddress,
    pub miner: MinerAddress,
    /// Price per epoch in attoFIL, string-typed on the wire.
    pub epoch_price: String,
    pub min_blocks_duration: u64,
}

impl DealProposal {
    /// Build a proposal for `root` between `wallet` and `miner` at the given
    /// price and duration. The root is normalized to CIDv1 so its string
    /// form matches what the node indexes.
    pub fn new(
        root: &Cid,
        wallet: WalletAddress,
        miner: MinerAddress,
        epoch_price: impl Into<String>,
        min_blocks_duration: u64,
    ) -> Self {
        let root_v1 = Cid::new_v1(root.codec(), root.hash().to_owned());
        Self {
            root: root_v1,
            transfer_type: "graphsync".to_string(),
            piece_cid: None,
            piece_size: 0,
            wallet,
            miner,
            epoch_price: epoch_price.into(),
            min_blocks_duration,
        }
    }
}

/// One entry of the node's deal list: the proposal it refers to and the
/// state exactly as reported, before translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealRecord {
    pub handle: DealHandle,
    pub state: RawDealState,
}

impl DealRecord {
    pub fn new(handle: impl Into<DealHandle>, state: impl Into<RawDealState>) -> Self {
        Self {
            handle: handle.into(),
            state: state.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    // CIDv0, dag-pb, base58btc.
    const CID_V0: &str = "QmdfTbBqBPQ7VNxZEYEj14VmRuZBkqFbiwReogJgS1zR1n";

    #[test]
    fn proposal_normalizes_root_to_v1() {
        let root = Cid::from_str(CID_V0).unwrap();
        let proposal = DealProposal::new(
            &root,
            WalletAddress::from("t3wallet"),
            MinerAddress::from("t01000"),
            "2500",
            300,
        );
        assert_eq!(proposal.root.version(), cid::Version::V1);
        assert_eq!(proposal.root.codec(), root.codec());
        assert_eq!(proposal.root.hash(), root.hash());
        // CIDv1 displays as base32 lower, the form the node indexes.
        assert!(proposal.root.to_string().starts_with('b'));
        assert_eq!(proposal.transfer_type, "graphsync");
        assert_eq!(proposal.piece_cid, None);
        assert_eq!(proposal.piece_size, 0);
    }

    #[test]
    fn v1_root_passes_through_unchanged() {
        let root = Cid::from_str(CID_V0).unwrap();
        let v1 = Cid::new_v1(root.codec(), root.hash().to_owned());
        let proposal = DealProposal::new(
            &v1,
            WalletAddress::from("t3wallet"),
            MinerAddress::from("t01000"),
            "2500",
            300,
        );
        assert_eq!(proposal.root, v1);
    }

    #[test]
    fn handle_round_trips_as_string() {
        let handle = DealHandle::from("bafyreihandle");
        assert_eq!(handle.as_str(), "bafyreihandle");
        assert_eq!(handle.to_string(), "bafyreihandle");
    }
}
