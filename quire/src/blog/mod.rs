//! Blog operations: listings, post/comment mutations and the follow graph.
//!
//! Every operation takes the [`Viewer`] the routing layer vouches for. Mutations run as a
//! single-command [`MutationPlan`](crate::runtime::MutationPlan), which every store applies
//! atomically.

mod accounts;
mod comments;
mod follows;
mod listing;
mod posts;

pub use comments::CommentOutcome;
pub use follows::{FollowOutcome, UnfollowOutcome};
pub use listing::{FollowPage, GroupPage, IndexPage, PostDetail, ProfilePage};
pub use posts::{DeleteOutcome, EditOutcome, PostCreated};

use std::sync::Arc;

use chrono::Duration;
use log::warn;

use crate::{
    cache::{DEFAULT_CACHE_TTL_SECS, ListingCache},
    clock::{Clock, SystemClock},
    config::QuireConfig,
    errors::{BlogError, EntityKind},
    id::is_entity_id,
    pagination::{Page, Paginator},
    store::PostStore,
    types::{Post, Viewer},
};

pub struct Blog<S> {
    store: S,
    clock: Arc<dyn Clock>,
    paginator: Paginator,
    cache_ttl: Option<Duration>,
    index_cache: Option<ListingCache<Page<Post>>>,
}

impl<S: PostStore> Blog<S> {
    /// Blog on the system clock with the all-posts cache enabled at its default TTL.
    pub fn new(store: S) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let cache_ttl = Some(Duration::seconds(DEFAULT_CACHE_TTL_SECS as i64));
        Self {
            store,
            index_cache: cache_ttl.map(|ttl| ListingCache::new(ttl, clock.clone())),
            clock,
            paginator: Paginator::default(),
            cache_ttl,
        }
    }

    pub fn from_config(store: S, config: &QuireConfig) -> Self {
        Self::new(store).with_cache_ttl(config.cache_ttl())
    }

    /// Replaces the clock used for timestamps and cache expiry. Drops cached pages.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self.rebuild_cache();
        self
    }

    /// `None` disables the all-posts cache.
    pub fn with_cache_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.cache_ttl = ttl;
        self.rebuild_cache();
        self
    }

    fn rebuild_cache(&mut self) {
        self.index_cache = self.cache_ttl.map(|ttl| ListingCache::new(ttl, self.clock.clone()));
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn paginator(&self) -> Paginator {
        self.paginator
    }

    pub fn cache_enabled(&self) -> bool {
        self.index_cache.is_some()
    }

    /// Number of all-posts pages currently held in the cache.
    pub fn cached_pages(&self) -> usize {
        self.index_cache.as_ref().map_or(0, |cache| cache.len())
    }

    /// Makes fresh all-posts results visible immediately.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.index_cache {
            cache.clear();
        }
    }

    /// Username of an authenticated viewer the store knows about.
    async fn require_user(&self, viewer: &Viewer) -> Result<String, BlogError> {
        let username = viewer.require()?;
        if self.store.find_user(username).await?.is_none() {
            warn!("rejecting unknown identity '{username}'");
            return Err(BlogError::Unauthorized);
        }
        Ok(username.to_string())
    }

    /// Loads a post, answering ids this crate could never have issued without a store round trip.
    async fn require_post(&self, post_id: &str) -> Result<Post, BlogError> {
        if !is_entity_id(post_id) {
            return Err(BlogError::not_found(EntityKind::Post, post_id));
        }
        self.store
            .find_post(post_id)
            .await?
            .ok_or_else(|| BlogError::not_found(EntityKind::Post, post_id))
    }
}
