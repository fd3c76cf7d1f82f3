//! Storage seam.
//!
//! Writes go through [`MutationExecutor`] as mutation plans; reads go through
//! [`PostStore`]. Both backends order listings the same way: newest `pub_date` first,
//! ties broken by descending post id.

mod memory;
mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::{RedisStore, connection_manager};

use serde::Serialize;

use crate::{
    errors::BlogError,
    runtime::MutationExecutor,
    types::{Comment, Group, Post, User},
};

/// Which posts a listing covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PostScope {
    All,
    Group(String),
    Author(String),
    /// Posts by every author the named user follows.
    FollowedBy(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FollowCounts {
    pub followers: u64,
    pub following: u64,
}

#[allow(async_fn_in_trait)]
pub trait PostStore: MutationExecutor {
    async fn find_user(&self, username: &str) -> Result<Option<User>, BlogError>;

    async fn find_group(&self, slug: &str) -> Result<Option<Group>, BlogError>;

    /// Every group, ordered by slug.
    async fn list_groups(&self) -> Result<Vec<Group>, BlogError>;

    async fn find_post(&self, post_id: &str) -> Result<Option<Post>, BlogError>;

    async fn count_posts(&self, scope: &PostScope) -> Result<u64, BlogError>;

    /// Ordered slice `[offset, offset + limit)` of the posts in `scope`.
    async fn list_posts(&self, scope: &PostScope, offset: u64, limit: u64) -> Result<Vec<Post>, BlogError>;

    /// Comments on a post, oldest first.
    async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>, BlogError>;

    async fn is_following(&self, user: &str, author: &str) -> Result<bool, BlogError>;

    async fn follow_counts(&self, username: &str) -> Result<FollowCounts, BlogError>;
}
