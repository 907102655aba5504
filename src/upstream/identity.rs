//! Identity and credential HTTP adapter.

use async_trait::async_trait;
use serde_json::json;

use super::{
    take_field, IdentityDirectory, ProfileLookup, UpstreamClient, UpstreamResult,
};

// == Http Identity Directory ==
pub struct HttpIdentityDirectory {
    client: UpstreamClient,
}

impl HttpIdentityDirectory {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityDirectory for HttpIdentityDirectory {
    async fn profile(&self, lookup: &ProfileLookup) -> UpstreamResult {
        let path = format!("/v1/{}/{}", lookup.kind(), urlencoding::encode(&lookup.value()));
        let body = self.client.get_json(&path, &[]).await?;
        Ok(json!({ "profiles": take_field(body, "profiles")? }))
    }

    async fn credential_holders(
        &self,
        credential_name: &str,
        limit: u32,
        offset: u32,
    ) -> UpstreamResult {
        let body = self
            .client
            .get_json(
                "/v1/credentials",
                &[
                    ("credentialName", credential_name.to_string()),
                    ("limit", limit.to_string()),
                    ("offset", offset.to_string()),
                ],
            )
            .await?;
        Ok(json!({
            "credentialName": credential_name,
            "limit": limit,
            "offset": offset,
            "profiles": take_field(body, "profiles")?,
        }))
    }
}
