use serde::Serialize;

use crate::types::{Comment, Follow, Group, Post, User};

/// A single store mutation. Every command validates all of its preconditions before it
/// writes, so one command is one atomic unit on every backend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationCommand {
    CreateUser(CreateUser),
    CreateGroup(CreateGroup),
    CreatePost(CreatePost),
    UpdatePost(UpdatePost),
    DeletePost(DeletePost),
    AddComment(AddComment),
    Follow(FollowEdge),
    Unfollow(UnfollowEdge),
}

impl MutationCommand {
    pub fn name(&self) -> &'static str {
        match self {
            MutationCommand::CreateUser(_) => "create_user",
            MutationCommand::CreateGroup(_) => "create_group",
            MutationCommand::CreatePost(_) => "create_post",
            MutationCommand::UpdatePost(_) => "update_post",
            MutationCommand::DeletePost(_) => "delete_post",
            MutationCommand::AddComment(_) => "add_comment",
            MutationCommand::Follow(_) => "follow",
            MutationCommand::Unfollow(_) => "unfollow",
        }
    }
}

/// Inserts a user; the username is unique.
#[derive(Debug, Clone, Serialize)]
pub struct CreateUser {
    pub user: User,
}

/// Inserts a group; the slug is unique.
#[derive(Debug, Clone, Serialize)]
pub struct CreateGroup {
    pub group: Group,
}

/// Inserts a post after checking the author and the optional group exist.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePost {
    pub post: Post,
}

/// Replaces a post's text, group and image. Fails with `forbidden` unless the stored
/// author is `requester`. Backends ignore `post.author` and `post.pub_date` and keep the
/// stored values, so the author and time indexes never move.
#[derive(Debug, Clone, Serialize)]
pub struct UpdatePost {
    pub requester: String,
    pub post: Post,
}

/// Removes a post and every comment attached to it.
#[derive(Debug, Clone, Serialize)]
pub struct DeletePost {
    pub requester: String,
    pub post_id: String,
}

/// Inserts a comment after checking the post still exists.
#[derive(Debug, Clone, Serialize)]
pub struct AddComment {
    pub comment: Comment,
}

/// Conditional insert of a follow edge. An existing edge is reported as a
/// `unique_constraint_violation`.
#[derive(Debug, Clone, Serialize)]
pub struct FollowEdge {
    pub follow: Follow,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnfollowEdge {
    pub user: String,
    pub author: String,
}

#[derive(Debug, Default, Serialize)]
pub struct MutationPlan {
    pub commands: Vec<MutationCommand>,
}

impl MutationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(command: MutationCommand) -> Self {
        Self {
            commands: vec![command],
        }
    }

    pub fn push(&mut self, command: MutationCommand) {
        self.commands.push(command);
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}
