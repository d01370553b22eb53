//! Lotus node adapter: JSON-RPC 2.0 over WebSocket.

mod client;
mod messages;

pub use client::LotusClient;
