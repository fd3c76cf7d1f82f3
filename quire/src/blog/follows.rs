use log::{debug, info};
use serde::Serialize;

use crate::{
    blog::Blog,
    errors::{BlogError, EntityKind},
    runtime::{
        MutationPlan,
        commands::{FollowEdge, MutationCommand, UnfollowEdge},
    },
    store::PostStore,
    types::{Follow, Viewer},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowOutcome {
    Created,
    AlreadyFollowing,
    /// Following yourself is a silent no-op.
    SelfFollowIgnored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnfollowOutcome {
    Removed,
    NotFollowing,
}

impl<S: PostStore> Blog<S> {
    pub async fn follow(&self, viewer: &Viewer, author: &str) -> Result<FollowOutcome, BlogError> {
        let user = self.require_user(viewer).await?;
        let author = self
            .store
            .find_user(author)
            .await?
            .ok_or_else(|| BlogError::not_found(EntityKind::User, author))?;
        if author.username == user {
            debug!("ignoring self-follow by '{user}'");
            return Ok(FollowOutcome::SelfFollowIgnored);
        }

        let follow = Follow {
            user,
            author: author.username,
            created: self.clock.now(),
        };
        let plan = MutationPlan::single(MutationCommand::Follow(FollowEdge { follow: follow.clone() }));
        match self.store.execute(plan).await {
            Ok(_) => {
                info!("'{}' now follows '{}'", follow.user, follow.author);
                Ok(FollowOutcome::Created)
            }
            Err(BlogError::UniqueConstraintViolation { .. }) => Ok(FollowOutcome::AlreadyFollowing),
            Err(err) => Err(err),
        }
    }

    pub async fn unfollow(&self, viewer: &Viewer, author: &str) -> Result<UnfollowOutcome, BlogError> {
        let user = self.require_user(viewer).await?;
        let author = self
            .store
            .find_user(author)
            .await?
            .ok_or_else(|| BlogError::not_found(EntityKind::User, author))?;

        let plan = MutationPlan::single(MutationCommand::Unfollow(UnfollowEdge {
            user: user.clone(),
            author: author.username.clone(),
        }));
        let responses = self.store.execute(plan).await?;
        let removed = responses
            .first()
            .and_then(|response| response.get("removed"))
            .and_then(|value| value.as_bool())
            .unwrap_or(false);
        if removed {
            info!("'{user}' unfollowed '{}'", author.username);
            Ok(UnfollowOutcome::Removed)
        } else {
            Ok(UnfollowOutcome::NotFollowing)
        }
    }
}
