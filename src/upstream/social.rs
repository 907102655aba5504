//! Social graph HTTP adapter.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{take_field, SearchKind, SocialGraph, UpstreamClient, UpstreamResult};

// == Http Social Graph ==
pub struct HttpSocialGraph {
    client: UpstreamClient,
}

impl HttpSocialGraph {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SocialGraph for HttpSocialGraph {
    async fn user_by_address(&self, address: &str) -> UpstreamResult {
        let body = self
            .client
            .get_json("/v2/user/by-address", &[("address", address.to_string())])
            .await?;
        Ok(json!({ "users": take_field(body, "users")? }))
    }

    async fn users_by_fids(&self, fids: &[u64]) -> UpstreamResult {
        let joined = fids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let body = self
            .client
            .get_json("/v2/user/bulk", &[("fids", joined)])
            .await?;
        Ok(json!({ "users": take_field(body, "users")? }))
    }

    async fn search(&self, kind: SearchKind, query: &str, page: u32) -> UpstreamResult {
        let path = format!("/v2/search/{}", kind.as_str());
        let body = self
            .client
            .get_json(
                &path,
                &[("q", query.to_string()), ("page", page.to_string())],
            )
            .await?;
        Ok(json!({
            "type": kind.as_str(),
            "page": page,
            "results": take_field(body, "results")?,
        }))
    }

    async fn trending(&self, cursor: Option<&str>, limit: u32) -> UpstreamResult {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }
        let body = self.client.get_json("/v2/feed/trending", &query).await?;
        let next = body
            .pointer("/next/cursor")
            .cloned()
            .unwrap_or(Value::Null);
        Ok(json!({ "casts": take_field(body, "casts")?, "next": next }))
    }

    async fn cast(&self, hash: &str) -> UpstreamResult {
        let body = self
            .client
            .get_json(
                "/v2/cast",
                &[("identifier", hash.to_string()), ("type", "hash".to_string())],
            )
            .await?;
        take_field(body, "cast")
    }

    async fn app(&self, identifier: &str) -> UpstreamResult {
        let path = format!("/v2/apps/{}", urlencoding::encode(identifier));
        let body = self.client.get_json(&path, &[]).await?;
        take_field(body, "app")
    }
}
