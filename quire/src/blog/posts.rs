use log::{info, warn};
use serde::Serialize;

use crate::{
    blog::Blog,
    errors::{BlogError, EntityKind, ValidationError, ValidationIssue},
    id::{generate_entity_id, is_entity_id},
    runtime::{
        MutationPlan,
        commands::{CreatePost, DeletePost, MutationCommand, UpdatePost},
    },
    store::PostStore,
    types::{ImageRef, Post, PostDraft, Viewer},
    validators::required_text,
};

#[derive(Debug, Clone, Serialize)]
pub struct PostCreated {
    pub post: Post,
}

impl PostCreated {
    /// Username whose profile the author is sent to after publishing.
    pub fn redirect_to_profile(&self) -> &str {
        &self.post.author
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EditOutcome {
    Updated { post: Post },
    /// The viewer is not the author; the post is untouched and the caller should show
    /// the post detail instead.
    NotPermitted { post_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted { post_id: String, comments_removed: u64 },
    NotPermitted { post_id: String },
}

/// Draft fields after validation.
struct CheckedDraft {
    text: String,
    group: Option<String>,
    image: Option<ImageRef>,
}

impl<S: PostStore> Blog<S> {
    /// Validates a draft. `current_image` is the image already on the post being edited.
    async fn check_draft(
        &self,
        draft: &PostDraft,
        current_image: Option<&ImageRef>,
    ) -> Result<CheckedDraft, BlogError> {
        let mut issues = Vec::new();
        let text = required_text("text", &draft.text, &mut issues);

        let group = match draft.group.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(slug) => {
                if self.store.find_group(slug).await?.is_none() {
                    issues.push(ValidationIssue::new(
                        "group",
                        "invalid_choice",
                        format!("group {slug} does not exist"),
                    ));
                }
                Some(slug.to_string())
            }
        };

        let image = match draft.image.as_deref() {
            Some(file_name) => match ImageRef::from_upload(file_name) {
                Ok(image) => Some(image),
                Err(err) => {
                    issues.extend(err.issues);
                    None
                }
            },
            None if draft.clear_image => None,
            None => current_image.cloned(),
        };

        let checked = ValidationError::new(issues).into_result(CheckedDraft { text, group, image })?;
        Ok(checked)
    }

    pub async fn create_post(&self, viewer: &Viewer, draft: PostDraft) -> Result<PostCreated, BlogError> {
        let author = self.require_user(viewer).await?;
        let checked = match self.check_draft(&draft, None).await {
            Ok(checked) => checked,
            Err(err) => {
                warn!("rejected post draft from '{author}': {err}");
                return Err(err);
            }
        };

        let post = Post {
            id: generate_entity_id(),
            text: checked.text,
            pub_date: self.clock.now(),
            author,
            group: checked.group,
            image: checked.image,
        };
        self.store
            .execute(MutationPlan::single(MutationCommand::CreatePost(CreatePost { post: post.clone() })))
            .await?;
        self.clear_cache();
        info!("created post {} by '{}'", post.id, post.author);
        Ok(PostCreated { post })
    }

    pub async fn edit_post(&self, viewer: &Viewer, post_id: &str, draft: PostDraft) -> Result<EditOutcome, BlogError> {
        let requester = self.require_user(viewer).await?;
        let stored = self.require_post(post_id).await?;
        if stored.author != requester {
            warn!("'{requester}' may not edit post {post_id}");
            return Ok(EditOutcome::NotPermitted {
                post_id: stored.id,
            });
        }

        let checked = self.check_draft(&draft, stored.image.as_ref()).await?;
        let post = Post {
            text: checked.text,
            group: checked.group,
            image: checked.image,
            ..stored
        };
        let plan = MutationPlan::single(MutationCommand::UpdatePost(UpdatePost {
            requester,
            post: post.clone(),
        }));
        match self.store.execute(plan).await {
            Ok(_) => {}
            Err(BlogError::Forbidden { post_id }) => return Ok(EditOutcome::NotPermitted { post_id }),
            Err(err) => return Err(err),
        }
        self.clear_cache();
        info!("updated post {}", post.id);
        Ok(EditOutcome::Updated { post })
    }

    /// Removes a post and its comments. Only the author may delete.
    pub async fn delete_post(&self, viewer: &Viewer, post_id: &str) -> Result<DeleteOutcome, BlogError> {
        let requester = self.require_user(viewer).await?;
        if !is_entity_id(post_id) {
            return Err(BlogError::not_found(EntityKind::Post, post_id));
        }
        let plan = MutationPlan::single(MutationCommand::DeletePost(DeletePost {
            requester: requester.clone(),
            post_id: post_id.to_string(),
        }));
        let responses = match self.store.execute(plan).await {
            Ok(responses) => responses,
            Err(BlogError::Forbidden { post_id }) => {
                warn!("'{requester}' may not delete post {post_id}");
                return Ok(DeleteOutcome::NotPermitted { post_id });
            }
            Err(err) => return Err(err),
        };
        let comments_removed = responses
            .first()
            .and_then(|response| response.get("comments_removed"))
            .and_then(|value| value.as_u64())
            .unwrap_or(0);
        self.clear_cache();
        info!("deleted post {post_id} and {comments_removed} comments");
        Ok(DeleteOutcome::Deleted {
            post_id: post_id.to_string(),
            comments_removed,
        })
    }
}
