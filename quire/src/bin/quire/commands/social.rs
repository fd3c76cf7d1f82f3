use anyhow::Result;
use clap::Args;

use quire::{Blog, FollowOutcome, PostStore, UnfollowOutcome};

use crate::context::AppContext;
use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const FOLLOW_EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Follow Authors",
    commands: &[
        "quire --as anna follow leo          # anna subscribes to leo",
        "quire --as anna post list --feed    # Posts by everyone anna follows",
    ],
}];

pub const UNFOLLOW_EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Unfollow Authors",
    commands: &["quire --as anna unfollow leo        # Stop following leo"],
}];

#[derive(Args)]
pub struct FollowArgs {
    /// Username of the author
    pub author: String,
}

pub async fn handle_follow<S: PostStore>(
    args: FollowArgs,
    blog: &Blog<S>,
    ctx: &AppContext,
    output: &OutputManager,
) -> Result<()> {
    match blog.follow(&ctx.viewer, &args.author).await? {
        FollowOutcome::Created => output.success(&format!("Now following '{}'", args.author)),
        FollowOutcome::AlreadyFollowing => output.info(&format!("Already following '{}'", args.author)),
        FollowOutcome::SelfFollowIgnored => output.warning("You cannot follow yourself"),
    }
    Ok(())
}

pub async fn handle_unfollow<S: PostStore>(
    args: FollowArgs,
    blog: &Blog<S>,
    ctx: &AppContext,
    output: &OutputManager,
) -> Result<()> {
    match blog.unfollow(&ctx.viewer, &args.author).await? {
        UnfollowOutcome::Removed => output.success(&format!("Unfollowed '{}'", args.author)),
        UnfollowOutcome::NotFollowing => output.info(&format!("You were not following '{}'", args.author)),
    }
    Ok(())
}
