//! Quire blog core.
//!
//! Posts, groups, comments and the follow graph over a pluggable store, with paginated
//! listings, a short-lived cache in front of the all-posts listing, and author-only
//! editing. Authentication happens outside: callers pass a [`Viewer`].

pub mod blog;
pub mod cache;
pub mod clock;
pub mod config;
pub mod errors;
pub mod id;
pub mod keys;
pub mod pagination;
pub mod runtime;
pub mod store;
pub mod types;
pub mod validators;

pub use blog::{
    Blog, CommentOutcome, DeleteOutcome, EditOutcome, FollowOutcome, FollowPage, GroupPage, IndexPage, PostCreated,
    PostDetail, ProfilePage, UnfollowOutcome,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{QuireConfig, StoreBackend};
pub use errors::*;
pub use pagination::{POSTS_SHOWN, Page, PageRequest, Paginator};
pub use store::{FollowCounts, MemoryStore, PostScope, PostStore, RedisStore};
pub use types::{Comment, Follow, Group, ImageRef, Post, PostDraft, User, Viewer};

pub use redis;
pub use redis::aio::ConnectionManager;
