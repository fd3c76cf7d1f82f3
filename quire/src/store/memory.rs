use std::{
    cmp::Reverse,
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex, MutexGuard},
};

use serde_json::{Value, json};

use crate::{
    errors::{BlogError, EntityKind},
    runtime::{
        MutationExecutor, MutationPlan, decode_response,
        commands::MutationCommand,
        executor::{forbidden, invalid, not_found, unique_violation},
    },
    store::{FollowCounts, PostScope, PostStore},
    types::{Comment, Follow, Group, Post, User},
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    users: BTreeMap<String, User>,
    groups: BTreeMap<String, Group>,
    posts: HashMap<String, Post>,
    comments: HashMap<String, Comment>,
    /// Keyed by `(user, author)`, which makes the pair unique.
    follows: BTreeMap<(String, String), Follow>,
}

impl MemoryState {
    fn apply(&mut self, command: &MutationCommand) -> Value {
        match command {
            MutationCommand::CreateUser(cmd) => {
                let username = &cmd.user.username;
                if self.users.contains_key(username) {
                    return unique_violation("username", username);
                }
                self.users.insert(username.clone(), cmd.user.clone());
                json!({ "ok": true })
            }
            MutationCommand::CreateGroup(cmd) => {
                let slug = &cmd.group.slug;
                if self.groups.contains_key(slug) {
                    return unique_violation("slug", slug);
                }
                self.groups.insert(slug.clone(), cmd.group.clone());
                json!({ "ok": true })
            }
            MutationCommand::CreatePost(cmd) => {
                let post = &cmd.post;
                if !self.users.contains_key(&post.author) {
                    return not_found(EntityKind::User, &post.author);
                }
                if let Some(rejection) = self.check_group(post.group.as_deref()) {
                    return rejection;
                }
                if self.posts.contains_key(&post.id) {
                    return unique_violation("id", &post.id);
                }
                self.posts.insert(post.id.clone(), post.clone());
                json!({ "ok": true })
            }
            MutationCommand::UpdatePost(cmd) => {
                let Some(stored) = self.posts.get(&cmd.post.id) else {
                    return not_found(EntityKind::Post, &cmd.post.id);
                };
                if stored.author != cmd.requester {
                    return forbidden(&cmd.post.id);
                }
                if let Some(rejection) = self.check_group(cmd.post.group.as_deref()) {
                    return rejection;
                }
                let post = Post {
                    author: stored.author.clone(),
                    pub_date: stored.pub_date,
                    ..cmd.post.clone()
                };
                self.posts.insert(post.id.clone(), post);
                json!({ "ok": true })
            }
            MutationCommand::DeletePost(cmd) => {
                let Some(stored) = self.posts.get(&cmd.post_id) else {
                    return not_found(EntityKind::Post, &cmd.post_id);
                };
                if stored.author != cmd.requester {
                    return forbidden(&cmd.post_id);
                }
                self.posts.remove(&cmd.post_id);
                let before = self.comments.len();
                self.comments.retain(|_, comment| comment.post != cmd.post_id);
                json!({ "ok": true, "comments_removed": before - self.comments.len() })
            }
            MutationCommand::AddComment(cmd) => {
                let comment = &cmd.comment;
                if !self.posts.contains_key(&comment.post) {
                    return not_found(EntityKind::Post, &comment.post);
                }
                if !self.users.contains_key(&comment.author) {
                    return not_found(EntityKind::User, &comment.author);
                }
                self.comments.insert(comment.id.clone(), comment.clone());
                json!({ "ok": true })
            }
            MutationCommand::Follow(cmd) => {
                let follow = &cmd.follow;
                if follow.user == follow.author {
                    return invalid("author", "self_follow", "users cannot follow themselves");
                }
                for username in [&follow.user, &follow.author] {
                    if !self.users.contains_key(username) {
                        return not_found(EntityKind::User, username);
                    }
                }
                let key = (follow.user.clone(), follow.author.clone());
                if self.follows.contains_key(&key) {
                    return unique_violation("follow", &format!("{}->{}", follow.user, follow.author));
                }
                self.follows.insert(key, follow.clone());
                json!({ "ok": true })
            }
            MutationCommand::Unfollow(cmd) => {
                let removed = self.follows.remove(&(cmd.user.clone(), cmd.author.clone())).is_some();
                json!({ "ok": true, "removed": removed })
            }
        }
    }

    fn check_group(&self, slug: Option<&str>) -> Option<Value> {
        match slug {
            Some(slug) if !self.groups.contains_key(slug) => Some(invalid(
                "group",
                "invalid_choice",
                &format!("group {slug} does not exist"),
            )),
            _ => None,
        }
    }

    fn scoped_posts(&self, scope: &PostScope) -> Vec<&Post> {
        let mut posts: Vec<&Post> = match scope {
            PostScope::All => self.posts.values().collect(),
            PostScope::Group(slug) => self
                .posts
                .values()
                .filter(|post| post.group.as_deref() == Some(slug.as_str()))
                .collect(),
            PostScope::Author(username) => self.posts.values().filter(|post| &post.author == username).collect(),
            PostScope::FollowedBy(username) => self
                .posts
                .values()
                .filter(|post| self.follows.contains_key(&(username.clone(), post.author.clone())))
                .collect(),
        };
        posts.sort_by_key(|post| Reverse((post.score(), post.id.clone())));
        posts
    }
}

/// In-process store with the same semantics as [`RedisStore`](crate::store::RedisStore).
///
/// Clones share state. A plan runs against a copy of the state that replaces the
/// shared state only when every command succeeded.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>, BlogError> {
        self.state
            .lock()
            .map_err(|_| BlogError::other("memory store lock poisoned"))
    }

    /// Number of comments stored for a post.
    pub fn comment_count(&self, post_id: &str) -> Result<usize, BlogError> {
        Ok(self
            .state()?
            .comments
            .values()
            .filter(|comment| comment.post == post_id)
            .count())
    }

    pub fn follow_edge_count(&self) -> Result<usize, BlogError> {
        Ok(self.state()?.follows.len())
    }
}

impl MutationExecutor for MemoryStore {
    async fn execute(&self, plan: MutationPlan) -> Result<Vec<Value>, BlogError> {
        let mut state = self.state()?;
        let mut working = state.clone();
        let mut responses = Vec::with_capacity(plan.commands.len());
        for command in &plan.commands {
            responses.push(decode_response(working.apply(command))?);
        }
        *state = working;
        Ok(responses)
    }
}

impl PostStore for MemoryStore {
    async fn find_user(&self, username: &str) -> Result<Option<User>, BlogError> {
        Ok(self.state()?.users.get(username).cloned())
    }

    async fn find_group(&self, slug: &str) -> Result<Option<Group>, BlogError> {
        Ok(self.state()?.groups.get(slug).cloned())
    }

    async fn list_groups(&self) -> Result<Vec<Group>, BlogError> {
        Ok(self.state()?.groups.values().cloned().collect())
    }

    async fn find_post(&self, post_id: &str) -> Result<Option<Post>, BlogError> {
        Ok(self.state()?.posts.get(post_id).cloned())
    }

    async fn count_posts(&self, scope: &PostScope) -> Result<u64, BlogError> {
        Ok(self.state()?.scoped_posts(scope).len() as u64)
    }

    async fn list_posts(&self, scope: &PostScope, offset: u64, limit: u64) -> Result<Vec<Post>, BlogError> {
        let state = self.state()?;
        Ok(state
            .scoped_posts(scope)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>, BlogError> {
        let state = self.state()?;
        let mut comments: Vec<Comment> = state
            .comments
            .values()
            .filter(|comment| comment.post == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| (a.score(), &a.id).cmp(&(b.score(), &b.id)));
        Ok(comments)
    }

    async fn is_following(&self, user: &str, author: &str) -> Result<bool, BlogError> {
        Ok(self
            .state()?
            .follows
            .contains_key(&(user.to_string(), author.to_string())))
    }

    async fn follow_counts(&self, username: &str) -> Result<FollowCounts, BlogError> {
        let state = self.state()?;
        let following = state.follows.keys().filter(|(user, _)| user == username).count() as u64;
        let followers = state.follows.keys().filter(|(_, author)| author == username).count() as u64;
        Ok(FollowCounts { followers, following })
    }
}
