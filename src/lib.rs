//! Fildeal - Filecoin storage deal negotiation and tracking.
//!
//! This crate negotiates a single storage deal against a Lotus node and
//! tracks it until it reaches a terminal state. It is invoked as a library
//! call with a content root already published to IPFS, selects a miner,
//! submits a deal proposal, and polls the deal to completion.
//!
//! # Architecture
//!
//! - [`domain`] - Node-agnostic types: canonical deal statuses and their
//!   classification, proposals, handles
//! - [`node`] - Trait definitions for the remote node surface
//! - [`adapter`] - Lotus implementation: JSON-RPC 2.0 over WebSocket
//! - [`tracker`] - The deal lifecycle state machine: cadenced polling with
//!   cancellation and an optional deadline
//! - [`preserve`] - End-to-end workflow orchestration
//! - [`progress`] - Step narration sink consumed by the workflow
//! - [`config`] - Configuration loading from TOML files
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use fildeal::adapter::LotusClient;
//! use fildeal::config::Config;
//! use fildeal::preserve::{preserve, PreserveRequest, StageLabels, Target, IPFS_STAGE};
//! use fildeal::progress::TracingSink;
//! use fildeal::tracker::cancel_signal;
//!
//! # async fn run(root: cid::Cid) -> fildeal::error::Result<()> {
//! let config = Config::default();
//! let node = LotusClient::connect(&config.node.ws_url).await?;
//!
//! let mut labels = StageLabels::new();
//! labels.publish(IPFS_STAGE, root);
//! let request = PreserveRequest {
//!     target: Target::directory(),
//!     labels,
//! };
//!
//! let (_cancel_tx, cancel_rx) = cancel_signal();
//! let handle = preserve(&request, &node, &TracingSink::new(), &config, cancel_rx).await?;
//! println!("deal active: {handle}");
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod config;
pub mod domain;
pub mod error;
pub mod node;
pub mod preserve;
pub mod progress;
pub mod tracker;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
