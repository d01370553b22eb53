//! WebSocket JSON-RPC client for a Lotus node.
//!
//! # Connection lifecycle
//!
//! 1. **Connection**: [`LotusClient::connect`] establishes the WebSocket
//!    connection (TLS when the scheme is `wss://`).
//! 2. **Calls**: each [`StorageNode`] method issues one JSON-RPC request and
//!    reads frames until the matching response arrives.
//! 3. **Termination**: dropping the client closes the connection.
//!
//! The connection is guarded by an async mutex, so the client issues at most
//! one request at a time; deal tracking relies on exactly that.

use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use async_trait::async_trait;
use url::Url;

use super::messages::{CidRef, DealInfo, RpcRequest, RpcResponse, StartDealParams};
use crate::domain::{DealHandle, DealProposal, DealRecord, MinerAddress, WalletAddress};
use crate::error::{Error, Result};
use crate::node::StorageNode;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// JSON-RPC client over a single WebSocket connection to a Lotus node.
pub struct LotusClient {
    ws: Mutex<WsStream>,
    next_id: AtomicU64,
}

impl LotusClient {
    /// Connect to the node's JSON-RPC websocket endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the connection fails
    /// (network issues, TLS handshake failure, etc.).
    pub async fn connect(ws_url: &str) -> Result<Self> {
        let url = Url::parse(ws_url)?;
        info!(url = %url, "Connecting to Lotus node");

        let (ws_stream, response) = connect_async(url.as_str()).await?;

        info!(status = %response.status(), "WebSocket connected");

        Ok(Self {
            ws: Mutex::new(ws_stream),
            next_id: AtomicU64::new(1),
        })
    }

    /// Issue one JSON-RPC call and await its response.
    ///
    /// Frames that are not the matching response (server notifications,
    /// stale replies) are skipped; pings are answered inline.
    async fn call<P, R>(&self, method: &str, params: P) -> Result<R>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let request = RpcRequest::new(id, method, params);
        let json = serde_json::to_string(&request)?;

        let mut ws = self.ws.lock().await;
        debug!(method, id, "Sending RPC request");
        ws.send(Message::Text(json)).await?;

        while let Some(frame) = ws.next().await {
            match frame? {
                Message::Text(text) => {
                    let response: RpcResponse<R> = serde_json::from_str(&text)?;
                    if response.id != Some(id) {
                        warn!(method, id, got = ?response.id, "Skipping unmatched RPC frame");
                        continue;
                    }
                    if let Some(err) = response.error {
                        return Err(Error::Rpc {
                            code: err.code,
                            message: err.message,
                        });
                    }
                    return response
                        .result
                        .ok_or_else(|| Error::Connection("RPC response missing result".into()));
                }
                Message::Ping(payload) => {
                    ws.send(Message::Pong(payload)).await?;
                }
                Message::Close(_) => {
                    return Err(Error::Connection("connection closed by node".into()));
                }
                _ => {}
            }
        }

        Err(Error::Connection(
            "connection closed before RPC response".into(),
        ))
    }
}

#[async_trait]
impl StorageNode for LotusClient {
    async fn state_list_miners(&self) -> Result<Vec<MinerAddress>> {
        // Empty tipset key queries the current head.
        let miners: Vec<String> = self
            .call("Filecoin.StateListMiners", serde_json::json!([[]]))
            .await?;
        Ok(miners.into_iter().map(MinerAddress::from).collect())
    }

    async fn wallet_default_address(&self) -> Result<WalletAddress> {
        let address: String = self
            .call("Filecoin.WalletDefaultAddress", serde_json::json!([]))
            .await?;
        Ok(WalletAddress::from(address))
    }

    async fn client_start_deal(&self, proposal: &DealProposal) -> Result<DealHandle> {
        let params = StartDealParams::from(proposal);
        let result: CidRef = self
            .call("Filecoin.ClientStartDeal", serde_json::json!([params]))
            .await?;
        Ok(DealHandle::from(result.cid))
    }

    async fn client_list_deals(&self) -> Result<Vec<DealRecord>> {
        let deals: Vec<DealInfo> = self
            .call("Filecoin.ClientListDeals", serde_json::json!([]))
            .await?;
        Ok(deals.into_iter().map(DealRecord::from).collect())
    }

    fn node_name(&self) -> &'static str {
        "lotus"
    }
}
