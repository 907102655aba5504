//! ENS resolver HTTP adapter.

use async_trait::async_trait;
use serde_json::json;

use super::{NameResolver, UpstreamClient, UpstreamResult};
use crate::error::UpstreamError;

// == Http Name Resolver ==
pub struct HttpNameResolver {
    client: UpstreamClient,
}

impl HttpNameResolver {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NameResolver for HttpNameResolver {
    async fn resolve(&self, ens_name: &str) -> UpstreamResult {
        let path = format!("/{}", urlencoding::encode(ens_name));
        let body = self.client.get_json(&path, &[]).await?;

        if !body.is_object() {
            return Err(UpstreamError::Payload("resolver returned a non-object".into()));
        }

        Ok(json!({
            "ensName": ens_name,
            "address": body.get("address").cloned().unwrap_or_default(),
            "avatar": body.get("avatar").cloned().unwrap_or_default(),
            "records": body.get("records").cloned().unwrap_or_default(),
        }))
    }
}
