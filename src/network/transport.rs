use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::blockchain::Block;
use crate::error::{Error, Result};

/// Wire form of a node's full chain, as served by the chain endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub length: usize,
    pub chain: Vec<Block>,
}

/// Capability to fetch a peer's chain. Consensus resolution depends on
/// this trait rather than on a concrete HTTP client, so the rule can be
/// exercised against fake peers in tests.
#[async_trait]
pub trait ChainFetcher: Send + Sync {
    async fn fetch_chain(&self, address: &str) -> Result<ChainSnapshot>;
}

/// `ChainFetcher` over plain HTTP, with a fixed per-request timeout.
pub struct HttpChainFetcher {
    client: reqwest::Client,
}

impl HttpChainFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| Error::Transport(format!("failed to build HTTP client: {err}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ChainFetcher for HttpChainFetcher {
    async fn fetch_chain(&self, address: &str) -> Result<ChainSnapshot> {
        let url = format!("http://{address}/api/v1/chain/");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| Error::Transport(format!("GET {url} failed: {err}")))?;

        if !response.status().is_success() {
            return Err(Error::Transport(format!(
                "peer {address} answered {}",
                response.status()
            )));
        }

        response
            .json::<ChainSnapshot>()
            .await
            .map_err(|err| Error::Transport(format!("peer {address} sent a malformed chain: {err}")))
    }
}
