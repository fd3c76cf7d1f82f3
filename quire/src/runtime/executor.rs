use std::borrow::Cow;

use log::debug;
use redis::aio::ConnectionLike;
use serde::Serialize;
use serde_json::{Value, json};

use crate::{
    errors::{BlogError, EntityKind, ValidationError},
    keys::KeyContext,
    runtime::{
        commands::{MutationCommand, MutationPlan},
        scripts::{
            ADD_COMMENT_SCRIPT, CREATE_GROUP_SCRIPT, CREATE_POST_SCRIPT, CREATE_USER_SCRIPT, DELETE_POST_SCRIPT,
            FOLLOW_SCRIPT, UNFOLLOW_SCRIPT, UPDATE_POST_SCRIPT,
        },
    },
};

/// Applies mutation plans. Each command in a plan is atomic on its own.
#[allow(async_fn_in_trait)]
pub trait MutationExecutor {
    async fn execute(&self, plan: MutationPlan) -> Result<Vec<Value>, BlogError>;
}

/// Turns a raw command response into either its payload or the matching [`BlogError`].
///
/// Both backends report failures the same way: an object with an `error` code plus
/// code-specific fields.
pub fn decode_response(value: Value) -> Result<Value, BlogError> {
    let Some(error) = value.get("error") else {
        return Ok(value);
    };
    let Some(code) = error.as_str() else {
        return Err(BlogError::other("malformed store error"));
    };
    let field = |name: &str| value.get(name).and_then(Value::as_str).unwrap_or_default().to_string();

    match code {
        "not_found" => {
            let entity = value
                .get("entity")
                .and_then(Value::as_str)
                .and_then(EntityKind::from_code)
                .ok_or_else(|| BlogError::other("not_found response without a known entity"))?;
            Err(BlogError::NotFound {
                entity,
                key: field("key"),
            })
        }
        "forbidden" => Err(BlogError::Forbidden {
            post_id: field("post_id"),
        }),
        "unique_constraint_violation" => Err(BlogError::UniqueConstraintViolation {
            field: field("field"),
            value: field("value"),
        }),
        "validation" => Err(BlogError::Validation(ValidationError::single(
            field("field"),
            field("code"),
            field("message"),
        ))),
        other => Err(BlogError::Other {
            message: Cow::Owned(other.to_string()),
        }),
    }
}

pub(crate) fn not_found(entity: EntityKind, key: &str) -> Value {
    json!({ "error": "not_found", "entity": entity.as_str(), "key": key })
}

pub(crate) fn unique_violation(field: &str, value: &str) -> Value {
    json!({ "error": "unique_constraint_violation", "field": field, "value": value })
}

pub(crate) fn invalid(field: &str, code: &str, message: &str) -> Value {
    json!({ "error": "validation", "field": field, "code": code, "message": message })
}

pub(crate) fn forbidden(post_id: &str) -> Value {
    json!({ "error": "forbidden", "post_id": post_id })
}

fn record_json<T: Serialize>(record: &T) -> Result<String, BlogError> {
    serde_json::to_string(record).map_err(|err| BlogError::Other {
        message: Cow::Owned(format!("failed to serialize record: {err}")),
    })
}

/// Builds the JSON argument a command's Lua script expects.
fn script_payload(command: &MutationCommand, keys: &KeyContext<'_>) -> Result<Value, BlogError> {
    let payload = match command {
        MutationCommand::CreateUser(cmd) => json!({
            "user_key": keys.user(&cmd.user.username),
            "username": cmd.user.username,
            "record": record_json(&cmd.user)?,
        }),
        MutationCommand::CreateGroup(cmd) => json!({
            "group_key": keys.group(&cmd.group.slug),
            "slug": cmd.group.slug,
            "groups_index": keys.group_index(),
            "record": record_json(&cmd.group)?,
        }),
        MutationCommand::CreatePost(cmd) => {
            let post = &cmd.post;
            json!({
                "post_id": post.id,
                "post_key": keys.post(&post.id),
                "author": post.author,
                "author_key": keys.user(&post.author),
                "group": post.group,
                "group_key": post.group.as_deref().map(|slug| keys.group(slug)),
                "group_index": post.group.as_deref().map(|slug| keys.group_posts(slug)),
                "posts_index": keys.post_index(),
                "author_index": keys.author_posts(&post.author),
                "score": post.score().to_string(),
                "record": record_json(post)?,
            })
        }
        MutationCommand::UpdatePost(cmd) => {
            let post = &cmd.post;
            json!({
                "post_id": post.id,
                "post_key": keys.post(&post.id),
                "requester": cmd.requester,
                "group": post.group,
                "group_key": post.group.as_deref().map(|slug| keys.group(slug)),
                "group_index": post.group.as_deref().map(|slug| keys.group_posts(slug)),
                "group_index_prefix": keys.group_posts(""),
                "posts_index": keys.post_index(),
                "record": record_json(post)?,
            })
        }
        MutationCommand::DeletePost(cmd) => json!({
            "post_id": cmd.post_id,
            "post_key": keys.post(&cmd.post_id),
            "requester": cmd.requester,
            "posts_index": keys.post_index(),
            "author_index_prefix": keys.author_posts_prefix(),
            "group_index_prefix": keys.group_posts(""),
            "comments_index": keys.post_comments(&cmd.post_id),
            "comment_prefix": keys.comment(""),
        }),
        MutationCommand::AddComment(cmd) => {
            let comment = &cmd.comment;
            json!({
                "comment_key": keys.comment(&comment.id),
                "comment_id": comment.id,
                "post_id": comment.post,
                "post_key": keys.post(&comment.post),
                "author": comment.author,
                "author_key": keys.user(&comment.author),
                "comments_index": keys.post_comments(&comment.post),
                "score": comment.score().to_string(),
                "record": record_json(comment)?,
            })
        }
        MutationCommand::Follow(cmd) => {
            let follow = &cmd.follow;
            json!({
                "user": follow.user,
                "author": follow.author,
                "user_key": keys.user(&follow.user),
                "author_key": keys.user(&follow.author),
                "following_key": keys.following(&follow.user),
                "followers_key": keys.followers(&follow.author),
                "score": follow.created.timestamp_millis().to_string(),
            })
        }
        MutationCommand::Unfollow(cmd) => json!({
            "following_key": keys.following(&cmd.user),
            "followers_key": keys.followers(&cmd.author),
            "user": cmd.user,
            "author": cmd.author,
        }),
    };
    Ok(payload)
}

pub async fn execute_plan<C>(conn: &mut C, keys: &KeyContext<'_>, plan: &MutationPlan) -> Result<Vec<Value>, BlogError>
where
    C: ConnectionLike + Send,
{
    let mut responses = Vec::with_capacity(plan.commands.len());

    for command in &plan.commands {
        let script = match command {
            MutationCommand::CreateUser(_) => &*CREATE_USER_SCRIPT,
            MutationCommand::CreateGroup(_) => &*CREATE_GROUP_SCRIPT,
            MutationCommand::CreatePost(_) => &*CREATE_POST_SCRIPT,
            MutationCommand::UpdatePost(_) => &*UPDATE_POST_SCRIPT,
            MutationCommand::DeletePost(_) => &*DELETE_POST_SCRIPT,
            MutationCommand::AddComment(_) => &*ADD_COMMENT_SCRIPT,
            MutationCommand::Follow(_) => &*FOLLOW_SCRIPT,
            MutationCommand::Unfollow(_) => &*UNFOLLOW_SCRIPT,
        };

        let payload = script_payload(command, keys)?.to_string();
        debug!("running {} script", command.name());

        let mut invocation = script.prepare_invoke();
        invocation.arg(payload);
        let raw: String = invocation.invoke_async(conn).await.map_err(BlogError::from)?;

        let value: Value = serde_json::from_str(&raw).map_err(|err| BlogError::Other {
            message: Cow::Owned(format!("failed to parse lua response: {err}")),
        })?;

        responses.push(decode_response(value)?);
    }

    Ok(responses)
}

/// Runs plans against a borrowed Redis connection.
pub struct RedisExecutor<'a, C>
where
    C: ConnectionLike + Send,
{
    connection: &'a mut C,
    keys: KeyContext<'a>,
}

impl<'a, C> RedisExecutor<'a, C>
where
    C: ConnectionLike + Send,
{
    pub fn new(connection: &'a mut C, prefix: &'a str) -> Self {
        Self {
            connection,
            keys: KeyContext::new(prefix),
        }
    }

    pub async fn run(&mut self, plan: &MutationPlan) -> Result<Vec<Value>, BlogError> {
        execute_plan(self.connection, &self.keys, plan).await
    }
}
