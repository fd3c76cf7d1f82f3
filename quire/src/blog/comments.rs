use log::{info, warn};
use serde::Serialize;

use crate::{
    blog::Blog,
    errors::{BlogError, ValidationError},
    id::generate_entity_id,
    runtime::{
        MutationPlan,
        commands::{AddComment, MutationCommand},
    },
    store::PostStore,
    types::{Comment, Viewer},
    validators::required_text,
};

/// Result of submitting a comment. A rejected comment leaves the store untouched; the
/// caller shows the post detail either way.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommentOutcome {
    Added { comment: Comment },
    Rejected { post_id: String, error: ValidationError },
}

impl CommentOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added { .. })
    }
}

impl<S: PostStore> Blog<S> {
    pub async fn add_comment(&self, viewer: &Viewer, post_id: &str, text: &str) -> Result<CommentOutcome, BlogError> {
        let author = self.require_user(viewer).await?;
        let post = self.require_post(post_id).await?;

        let mut issues = Vec::new();
        let text = required_text("text", text, &mut issues);
        if let Err(error) = ValidationError::new(issues).into_result(()) {
            warn!("rejected empty comment on post {} from '{author}'", post.id);
            return Ok(CommentOutcome::Rejected { post_id: post.id, error });
        }

        let comment = Comment {
            id: generate_entity_id(),
            post: post.id,
            author,
            text,
            created: self.clock.now(),
        };
        self.store
            .execute(MutationPlan::single(MutationCommand::AddComment(AddComment {
                comment: comment.clone(),
            })))
            .await?;
        info!("'{}' commented on post {}", comment.author, comment.post);
        Ok(CommentOutcome::Added { comment })
    }
}
