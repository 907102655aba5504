//! Redis Store Module
//!
//! Remote key-value backend shared by every proxy instance.
//!
//! Each tag is a sorted set of full keys scored by their expiry in Unix
//! milliseconds. Writes prune members whose score has passed, so a tag set
//! only ever holds keys that may still be live.

use async_trait::async_trait;
use bytes::Bytes;
use redis::{aio::ConnectionManager, Client};
use tracing::{debug, info};

use super::entry::current_timestamp_ms;
use crate::cache::{CacheTtl, KvStore};
use crate::error::StoreError;

// == Redis Store ==
/// Redis-backed store. Entries use `SET .. EX`, tags are sorted sets.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
    keyspace: Keyspace,
}

impl RedisStore {
    // == Constructor ==
    /// Connects to `url`. Every key written is namespaced with `key_prefix`.
    pub async fn connect(url: &str, key_prefix: impl Into<String>) -> Result<Self, StoreError> {
        let client = Client::open(url)?;
        let connection = ConnectionManager::new(client).await?;

        info!("Redis store connected");

        Ok(Self {
            connection,
            keyspace: Keyspace::new(key_prefix),
        })
    }
}

// == Keyspace ==
/// Key naming and command construction under one namespace prefix.
#[derive(Debug, Clone)]
struct Keyspace {
    prefix: String,
}

impl Keyspace {
    fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    fn tag_key(&self, tag: &str) -> String {
        format!("{}tag:{}", self.prefix, tag)
    }

    // == Write Pipeline ==
    /// Builds the atomic write for one entry and its tag bookkeeping.
    ///
    /// # Arguments
    /// * `key` - Unprefixed cache key
    /// * `value` - Payload bytes
    /// * `ttl` - Entry lifetime; also bounds the lifetime of each tag set
    /// * `tags` - Tags the entry can be purged by
    /// * `now_ms` - Current Unix time in milliseconds
    ///
    /// # Returns
    /// `SET key value EX ttl`, then per tag `ZADD` scored by expiry,
    /// `ZREMRANGEBYSCORE` dropping members already expired, and `EXPIRE`.
    fn write_pipeline(
        &self,
        key: &str,
        value: &[u8],
        ttl: CacheTtl,
        tags: &[String],
        now_ms: u64,
    ) -> redis::Pipeline {
        let full_key = self.full_key(key);
        let ttl_secs = ttl.as_secs();
        let expires_at = now_ms.saturating_add(ttl_secs.saturating_mul(1000));

        let mut pipe = redis::pipe();
        pipe.atomic()
            .cmd("SET")
            .arg(&full_key)
            .arg(value)
            .arg("EX")
            .arg(ttl_secs)
            .ignore();

        for tag in tags {
            let tag_key = self.tag_key(tag);
            pipe.cmd("ZADD")
                .arg(&tag_key)
                .arg(expires_at)
                .arg(&full_key)
                .ignore();
            pipe.cmd("ZREMRANGEBYSCORE")
                .arg(&tag_key)
                .arg("-inf")
                .arg(now_ms)
                .ignore();
            pipe.cmd("EXPIRE").arg(&tag_key).arg(ttl_secs).ignore();
        }

        pipe
    }

    /// Members of `tag` whose expiry is still ahead of `now_ms`.
    fn live_members_cmd(&self, tag: &str, now_ms: u64) -> redis::Cmd {
        let mut cmd = redis::cmd("ZRANGEBYSCORE");
        cmd.arg(self.tag_key(tag))
            .arg(format!("({}", now_ms))
            .arg("+inf");
        cmd
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        let mut conn = self.connection.clone();
        let value: Option<Vec<u8>> = redis::cmd("GET")
            .arg(self.keyspace.full_key(key))
            .query_async(&mut conn)
            .await?;

        Ok(value.map(Bytes::from))
    }

    async fn set(
        &self,
        key: &str,
        value: Bytes,
        ttl: CacheTtl,
        tags: &[String],
    ) -> Result<(), StoreError> {
        let pipe = self
            .keyspace
            .write_pipeline(key, value.as_ref(), ttl, tags, current_timestamp_ms());

        let mut conn = self.connection.clone();
        pipe.query_async::<_, ()>(&mut conn).await?;

        debug!(key = %key, ttl = ttl.as_secs(), "redis set");
        Ok(())
    }

    async fn invalidate_tags(&self, tags: &[String]) -> Result<usize, StoreError> {
        let mut conn = self.connection.clone();
        let now_ms = current_timestamp_ms();
        let mut removed = 0usize;

        for tag in tags {
            let members: Vec<String> = self
                .keyspace
                .live_members_cmd(tag, now_ms)
                .query_async(&mut conn)
                .await?;

            if !members.is_empty() {
                let deleted: usize = redis::cmd("DEL")
                    .arg(&members)
                    .query_async(&mut conn)
                    .await?;
                removed += deleted;
            }

            redis::cmd("DEL")
                .arg(self.keyspace.tag_key(tag))
                .query_async::<_, ()>(&mut conn)
                .await?;
        }

        info!(tags = ?tags, removed, "redis tag invalidation");
        Ok(removed)
    }
}
