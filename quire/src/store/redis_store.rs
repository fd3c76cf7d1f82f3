use std::borrow::Cow;

use log::debug;
use redis::{aio::ConnectionManager, cmd};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::{
    errors::BlogError,
    id::generate_entity_id,
    keys::KeyContext,
    runtime::{MutationExecutor, MutationPlan, RedisExecutor, scripts::FOLLOWED_POSTS_SCRIPT},
    store::{FollowCounts, PostScope, PostStore},
    types::{Comment, Group, Post, User},
};

pub async fn connection_manager(url: &str) -> Result<ConnectionManager, BlogError> {
    let client = redis::Client::open(url)?;
    Ok(client.get_connection_manager().await?)
}

/// Redis-backed store. Records are JSON strings; listings are sorted-set indexes.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisStore {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        Self {
            conn,
            prefix: prefix.into(),
        }
    }

    pub async fn connect(url: &str, prefix: impl Into<String>) -> Result<Self, BlogError> {
        Ok(Self::new(connection_manager(url).await?, prefix))
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn keys(&self) -> KeyContext<'_> {
        KeyContext::new(&self.prefix)
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, BlogError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = cmd("GET").arg(key).query_async(&mut conn).await?;
        raw.map(|json| decode_record(&json)).transpose()
    }

    /// Loads records in key order, skipping keys deleted since the index was read.
    async fn get_many<T: DeserializeOwned>(&self, keys: &[String]) -> Result<Vec<T>, BlogError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.conn.clone();
        let raw: Vec<Option<String>> = cmd("MGET").arg(keys).query_async(&mut conn).await?;
        raw.into_iter().flatten().map(|json| decode_record(&json)).collect()
    }

    async fn zcard(&self, key: &str) -> Result<u64, BlogError> {
        let mut conn = self.conn.clone();
        Ok(cmd("ZCARD").arg(key).query_async(&mut conn).await?)
    }

    async fn followed_window(&self, username: &str, offset: u64, limit: u64) -> Result<(u64, Vec<String>), BlogError> {
        let keys = self.keys();
        let payload = json!({
            "following_key": keys.following(username),
            "author_index_prefix": keys.author_posts_prefix(),
            "scratch_key": keys.scratch(&generate_entity_id()),
            "offset": offset,
            "limit": limit,
        });

        let mut conn = self.conn.clone();
        let mut invocation = FOLLOWED_POSTS_SCRIPT.prepare_invoke();
        invocation.arg(payload.to_string());
        let raw: String = invocation.invoke_async(&mut conn).await?;
        let value: Value = serde_json::from_str(&raw).map_err(|err| BlogError::Other {
            message: Cow::Owned(format!("failed to parse lua response: {err}")),
        })?;

        let total = value.get("total").and_then(Value::as_u64).unwrap_or_default();
        // cjson encodes an empty table as an object, so anything but an array means no ids
        let ids = value
            .get("ids")
            .and_then(Value::as_array)
            .map(|ids| ids.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default();
        Ok((total, ids))
    }

    fn index_key(&self, scope: &PostScope) -> Option<String> {
        let keys = self.keys();
        match scope {
            PostScope::All => Some(keys.post_index()),
            PostScope::Group(slug) => Some(keys.group_posts(slug)),
            PostScope::Author(username) => Some(keys.author_posts(username)),
            PostScope::FollowedBy(_) => None,
        }
    }

    /// Deletes every key under this store's prefix, returning how many were removed.
    pub async fn purge(&self) -> Result<u64, BlogError> {
        const SCAN_COUNT: usize = 1000;
        let pattern = self.keys().pattern();
        let mut conn = self.conn.clone();
        let mut cursor: u64 = 0;
        let mut total_deleted: u64 = 0;

        loop {
            let (next_cursor, keys): (u64, Vec<String>) = cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_COUNT)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                let deleted: u64 = cmd("DEL").arg(&keys).query_async(&mut conn).await?;
                total_deleted += deleted;
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        debug!("purged {total_deleted} keys matching {pattern}");
        Ok(total_deleted)
    }
}

fn decode_record<T: DeserializeOwned>(json: &str) -> Result<T, BlogError> {
    serde_json::from_str(json).map_err(|err| BlogError::Other {
        message: Cow::Owned(format!("failed to deserialize record: {err}")),
    })
}

impl MutationExecutor for RedisStore {
    async fn execute(&self, plan: MutationPlan) -> Result<Vec<Value>, BlogError> {
        let mut conn = self.conn.clone();
        let mut executor = RedisExecutor::new(&mut conn, &self.prefix);
        executor.run(&plan).await
    }
}

impl PostStore for RedisStore {
    async fn find_user(&self, username: &str) -> Result<Option<User>, BlogError> {
        self.get_json(&self.keys().user(username)).await
    }

    async fn find_group(&self, slug: &str) -> Result<Option<Group>, BlogError> {
        self.get_json(&self.keys().group(slug)).await
    }

    async fn list_groups(&self) -> Result<Vec<Group>, BlogError> {
        let keys = self.keys();
        let mut conn = self.conn.clone();
        let mut slugs: Vec<String> = cmd("SMEMBERS").arg(keys.group_index()).query_async(&mut conn).await?;
        slugs.sort();
        let group_keys: Vec<String> = slugs.iter().map(|slug| keys.group(slug)).collect();
        self.get_many(&group_keys).await
    }

    async fn find_post(&self, post_id: &str) -> Result<Option<Post>, BlogError> {
        self.get_json(&self.keys().post(post_id)).await
    }

    async fn count_posts(&self, scope: &PostScope) -> Result<u64, BlogError> {
        match (self.index_key(scope), scope) {
            (Some(index), _) => self.zcard(&index).await,
            (None, PostScope::FollowedBy(username)) => Ok(self.followed_window(username, 0, 0).await?.0),
            (None, _) => Err(BlogError::other("listing scope has no index")),
        }
    }

    async fn list_posts(&self, scope: &PostScope, offset: u64, limit: u64) -> Result<Vec<Post>, BlogError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = match (self.index_key(scope), scope) {
            (Some(index), _) => {
                let mut conn = self.conn.clone();
                cmd("ZREVRANGE")
                    .arg(index)
                    .arg(offset)
                    .arg(offset + limit - 1)
                    .query_async(&mut conn)
                    .await?
            }
            (None, PostScope::FollowedBy(username)) => self.followed_window(username, offset, limit).await?.1,
            (None, _) => return Err(BlogError::other("listing scope has no index")),
        };
        let keys = self.keys();
        let post_keys: Vec<String> = ids.iter().map(|id| keys.post(id)).collect();
        self.get_many(&post_keys).await
    }

    async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>, BlogError> {
        let keys = self.keys();
        let mut conn = self.conn.clone();
        let ids: Vec<String> = cmd("ZRANGE")
            .arg(keys.post_comments(post_id))
            .arg(0)
            .arg(-1)
            .query_async(&mut conn)
            .await?;
        let comment_keys: Vec<String> = ids.iter().map(|id| keys.comment(id)).collect();
        self.get_many(&comment_keys).await
    }

    async fn is_following(&self, user: &str, author: &str) -> Result<bool, BlogError> {
        let mut conn = self.conn.clone();
        let score: Option<f64> = cmd("ZSCORE")
            .arg(self.keys().following(user))
            .arg(author)
            .query_async(&mut conn)
            .await?;
        Ok(score.is_some())
    }

    async fn follow_counts(&self, username: &str) -> Result<FollowCounts, BlogError> {
        let keys = self.keys();
        Ok(FollowCounts {
            followers: self.zcard(&keys.followers(username)).await?,
            following: self.zcard(&keys.following(username)).await?,
        })
    }
}
