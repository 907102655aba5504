//! Token market HTTP adapter.

use async_trait::async_trait;
use serde_json::json;

use super::{take_field, TokenMarket, UpstreamClient, UpstreamResult};

// == Http Token Market ==
pub struct HttpTokenMarket {
    client: UpstreamClient,
}

impl HttpTokenMarket {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TokenMarket for HttpTokenMarket {
    async fn balances(&self, wallet_address: &str, page: u32) -> UpstreamResult {
        let path = format!("/v1/wallets/{}/balances", urlencoding::encode(wallet_address));
        let body = self
            .client
            .get_json(&path, &[("page", page.to_string())])
            .await?;
        Ok(json!({
            "walletAddress": wallet_address,
            "page": page,
            "balances": take_field(body, "data")?,
        }))
    }

    async fn token(&self, address: &str) -> UpstreamResult {
        let path = format!("/v1/tokens/{}", urlencoding::encode(address));
        let body = self.client.get_json(&path, &[]).await?;
        take_field(body, "data")
    }
}
