//! Exchange-agnostic deal domain: canonical statuses, proposals, handles.

pub mod deal;
pub mod status;

pub use deal::{DealHandle, DealProposal, DealRecord, MinerAddress, WalletAddress};
pub use status::{DealProgress, DealStatus, RawDealState};
