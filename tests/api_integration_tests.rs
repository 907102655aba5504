//! Integration tests for the proxy routes.
//!
//! Every test drives the full router with a fake store and a recording
//! upstream, so no network or Redis is needed.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};

use common::{body_json, header, Harness, TOKEN};

// == Helper Functions ==

fn purge_request(body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/admin/purge")
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn cast(hash: &str, likes: u64, recasts: u64, replies: u64) -> Value {
    json!({
        "hash": hash,
        "reactions": {"likes_count": likes, "recasts_count": recasts},
        "replies": {"count": replies}
    })
}

// == Health & Stats Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let harness = Harness::new();

    let response = harness.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_stats_counts_hits_misses_and_writes() {
    let harness = Harness::new();
    harness.get("/tokens/0xabc").await;
    harness.get("/tokens/0xabc").await;
    harness.get("/tokens/0xdef").await;

    let response = harness.get("/stats").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 2);
    assert_eq!(json["writes"], 2);
    assert_eq!(json["store_errors"], 0);
}

// == Social Route Tests ==

#[tokio::test]
async fn test_user_by_address_keys_on_address() {
    let harness = Harness::new();

    let response = harness.get("/social/users/by-address/0xAbC").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header(&response, "cache-tag"),
        Some("social-user-address:0xAbC")
    );
    assert_eq!(
        header(&response, "cache-control"),
        Some("public, s-maxage=3600, stale-while-revalidate=3600")
    );
    assert_eq!(harness.upstream.calls(), vec!["user_by_address:0xAbC"]);
}

#[tokio::test]
async fn test_users_by_fids_keeps_request_order() {
    let harness = Harness::new();

    let response = harness.get("/social/users?fids=3,1,2").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "cache-tag"), Some("social-users:3,1,2"));
    let json = body_json(response).await;
    assert_eq!(json["users"][0]["fid"], 3);
    assert_eq!(harness.upstream.calls(), vec!["users_by_fids:[3, 1, 2]"]);
}

#[tokio::test]
async fn test_users_rejects_bad_fid() {
    let harness = Harness::new();

    let response = harness.get("/social/users?fids=1,abc").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(harness.store.get_calls(), 0);
    assert_eq!(harness.upstream.call_count(), 0);
}

#[tokio::test]
async fn test_search_defaults_type_and_page() {
    let harness = Harness::new();

    let response = harness.get("/social/search?q=vitalik").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header(&response, "cache-tag"),
        Some("social-search:users:vitalik:1")
    );
    assert_eq!(
        header(&response, "cache-control"),
        Some("public, s-maxage=1800, stale-while-revalidate=1800")
    );
    assert_eq!(harness.upstream.calls(), vec!["search:users:vitalik:1"]);
}

#[tokio::test]
async fn test_search_with_control_character_keeps_tag() {
    let harness = Harness::new();

    let response = harness.get("/social/search?q=gm%0Afren").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header(&response, "cache-tag"),
        Some("social-search:users:gm%0Afren:1")
    );
    assert_eq!(harness.upstream.calls(), vec!["search:users:gm\nfren:1"]);
    assert!(harness.store.contains("social-search:users:gm%0Afren:1"));
}

#[tokio::test]
async fn test_unicode_name_keeps_tag() {
    let harness = Harness::new();

    let response = harness.get("/ens/%F0%9F%A6%8A.eth").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("cache-tag").map(|v| v.as_bytes()),
        Some("ens:\u{1F98A}.eth".as_bytes())
    );
}

#[tokio::test]
async fn test_search_rejects_unknown_type() {
    let harness = Harness::new();

    let response = harness.get("/social/search?q=x&type=frames").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("frames"));
    assert_eq!(harness.upstream.call_count(), 0);
}

#[tokio::test]
async fn test_trending_serves_and_caches_ranked_feed() {
    let harness = Harness::new();
    harness.upstream.set_trending(json!({
        "casts": [cast("quiet", 1, 0, 0), cast("loud", 0, 10, 0), cast("chatty", 0, 0, 5)],
        "next": "c2"
    }));

    let response = harness.get("/social/trending?limit=3").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "cache-tag"), Some("social-trending::3"));
    let json = body_json(response).await;
    let order: Vec<_> = json["casts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["hash"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(order, vec!["loud", "chatty", "quiet"]);

    let writes = harness.store.writes();
    assert_eq!(writes.len(), 1);
    let stored: Value = serde_json::from_slice(&writes[0].1).unwrap();
    assert_eq!(stored, json);
}

#[tokio::test]
async fn test_trending_cursor_is_part_of_key() {
    let harness = Harness::new();

    harness.get("/social/trending?cursor=abc&limit=10").await;
    harness.get("/social/trending?limit=10").await;

    assert_eq!(harness.upstream.call_count(), 2);
    assert!(harness.store.contains("social-trending:abc:10"));
    assert!(harness.store.contains("social-trending::10"));
}

#[tokio::test]
async fn test_trending_rejects_limit_out_of_range() {
    let harness = Harness::new();

    let response = harness.get("/social/trending?limit=101").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(harness.upstream.call_count(), 0);
}

#[tokio::test]
async fn test_cast_and_app_routes() {
    let harness = Harness::new();

    let cast = harness.get("/social/casts/0xfeed").await;
    let app = harness.get("/apps/warpcast").await;

    assert_eq!(header(&cast, "cache-tag"), Some("social-cast:0xfeed"));
    assert_eq!(
        header(&cast, "cache-control"),
        Some("public, s-maxage=86400, stale-while-revalidate=86400")
    );
    assert_eq!(header(&app, "cache-tag"), Some("app:warpcast"));
    assert_eq!(
        header(&app, "cache-control"),
        Some("public, s-maxage=604800, stale-while-revalidate=604800")
    );
}

// == Market Route Tests ==

#[tokio::test]
async fn test_balances_requires_wallet_address() {
    let harness = Harness::new();

    let response = harness.get("/tokens/balances?page=2").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("walletAddress"));
    assert_eq!(harness.store.get_calls(), 0);
    assert_eq!(harness.store.set_calls(), 0);
    assert_eq!(harness.upstream.call_count(), 0);
}

#[tokio::test]
async fn test_balances_route_is_not_shadowed_by_token_route() {
    let harness = Harness::new();

    let response = harness
        .get("/tokens/balances?walletAddress=0xabc&page=2")
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header(&response, "cache-tag"),
        Some("token-balances:0xabc:2")
    );
    assert_eq!(harness.upstream.calls(), vec!["balances:0xabc:2"]);
}

#[tokio::test]
async fn test_ens_route() {
    let harness = Harness::new();

    let response = harness.get("/ens/vitalik.eth").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "cache-tag"), Some("ens:vitalik.eth"));
    let json = body_json(response).await;
    assert_eq!(json["ensName"], "vitalik.eth");
}

// == Identity Route Tests ==

#[tokio::test]
async fn test_profile_keys_on_identifier_kind() {
    let harness = Harness::new();

    let by_fid = harness.get("/identity/profile?fid=3").await;
    let by_fname = harness.get("/identity/profile?fname=3").await;

    assert_eq!(header(&by_fid, "cache-tag"), Some("identity-profile:fid:3"));
    assert_eq!(
        header(&by_fname, "cache-tag"),
        Some("identity-profile:fname:3")
    );
    assert_eq!(harness.upstream.call_count(), 2);
}

#[tokio::test]
async fn test_profile_rejects_two_identifiers() {
    let harness = Harness::new();

    let response = harness.get("/identity/profile?fid=3&fname=dwr").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(harness.upstream.call_count(), 0);
}

#[tokio::test]
async fn test_credentials_rejection_is_passed_through() {
    let harness = Harness::new();

    let response = harness
        .get("/identity/credentials?credentialName=Early%20Adopter")
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(header(&response, "www-authenticate"), Some("Bearer"));
    assert!(header(&response, "cache-control").is_none());
    let json = body_json(response).await;
    assert_eq!(json["error"], "unauthorized");
    assert_eq!(harness.store.get_calls(), 0);
    assert_eq!(harness.store.set_calls(), 0);
    assert_eq!(harness.upstream.call_count(), 0);
}

#[tokio::test]
async fn test_credentials_with_token() {
    let harness = Harness::new();

    let response = harness
        .get_authed("/identity/credentials?credentialName=Early%20Adopter&limit=10")
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header(&response, "cache-tag"),
        Some("identity-credentials:Early Adopter:10:0")
    );
    assert_eq!(
        harness.upstream.calls(),
        vec!["credentials:Early Adopter:10:0"]
    );
}

#[tokio::test]
async fn test_credentials_validates_before_auth() {
    let harness = Harness::new();

    let response = harness.get("/identity/credentials").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// == Purge Tests ==

#[tokio::test]
async fn test_purge_by_resource_tag() {
    let harness = Harness::new();
    harness.get("/tokens/0xabc").await;
    harness.get("/tokens/0xdef").await;
    harness.get("/ens/vitalik.eth").await;

    let response = harness
        .send(purge_request(json!({"tags": ["token"]}), Some(TOKEN)))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["purged"], 2);
    assert!(!harness.store.contains("token:0xabc"));
    assert!(harness.store.contains("ens:vitalik.eth"));

    harness.get("/tokens/0xabc").await;
    assert_eq!(harness.upstream.call_count(), 4);
}

#[tokio::test]
async fn test_purge_by_key_tag() {
    let harness = Harness::new();
    harness.get("/tokens/0xabc").await;
    harness.get("/tokens/0xdef").await;

    let response = harness
        .send(purge_request(json!({"tags": ["token:0xabc"]}), Some(TOKEN)))
        .await;

    let json = body_json(response).await;
    assert_eq!(json["purged"], 1);
    assert!(harness.store.contains("token:0xdef"));
}

#[tokio::test]
async fn test_purge_requires_token() {
    let harness = Harness::new();
    harness.get("/tokens/0xabc").await;

    let response = harness
        .send(purge_request(json!({"tags": ["token"]}), Some("wrong")))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(harness.store.contains("token:0xabc"));
}

#[tokio::test]
async fn test_purge_rejects_empty_tags() {
    let harness = Harness::new();

    let response = harness
        .send(purge_request(json!({"tags": []}), Some(TOKEN)))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_purge_rejects_malformed_body() {
    let harness = Harness::new();
    let request = Request::builder()
        .method("POST")
        .uri("/admin/purge")
        .header("authorization", format!("Bearer {}", TOKEN))
        .body(Body::from("not json"))
        .unwrap();

    let response = harness.send(request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// == Routing Tests ==

#[tokio::test]
async fn test_unknown_route_is_404() {
    let harness = Harness::new();

    let response = harness.get("/social/unknown").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
