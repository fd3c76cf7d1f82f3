use anyhow::Result;
use clap::Subcommand;

use quire::{Blog, CommentOutcome, DeleteOutcome, EditOutcome, PageRequest, PostDraft, PostStore};

use crate::commands::report_validation;
use crate::context::AppContext;
use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Read",
        commands: &[
            "quire post list                              # Newest posts across the blog",
            "quire post list --page 3                     # Third page",
            "quire --as anna post list --feed             # Posts by authors anna follows",
            "quire post show Xk3fP9bQ2mTz7RwA             # One post with its comments",
        ],
    },
    ExampleGroup {
        title: "Write",
        commands: &[
            "quire --as leo post create --text \"Hello\" --group cats --image cat.png",
            "quire --as leo post edit Xk3fP9bQ2mTz7RwA --text \"Hello again\" --clear-image",
            "quire --as leo post delete Xk3fP9bQ2mTz7RwA",
            "quire --as anna post comment Xk3fP9bQ2mTz7RwA \"Nice cat\"",
        ],
    },
];

#[derive(Subcommand)]
pub enum PostCommands {
    /// List posts, newest first
    #[command(name = "list")]
    List {
        /// Page number; invalid values select the first page
        #[arg(long)]
        page: Option<String>,

        /// Only posts by authors the acting user follows
        #[arg(long)]
        feed: bool,
    },

    /// Show a post with its comments
    #[command(name = "show")]
    Show { post_id: String },

    /// Publish a new post
    #[command(name = "create")]
    Create {
        #[arg(long)]
        text: String,

        /// Group slug
        #[arg(long)]
        group: Option<String>,

        /// Uploaded image file name
        #[arg(long)]
        image: Option<String>,
    },

    /// Replace a post's text, group and image
    #[command(name = "edit")]
    Edit {
        post_id: String,

        #[arg(long)]
        text: String,

        #[arg(long)]
        group: Option<String>,

        #[arg(long, conflicts_with = "clear_image")]
        image: Option<String>,

        /// Remove the current image
        #[arg(long)]
        clear_image: bool,
    },

    /// Delete a post and its comments
    #[command(name = "delete")]
    Delete { post_id: String },

    /// Comment on a post
    #[command(name = "comment")]
    Comment { post_id: String, text: String },
}

fn draft(text: String, group: Option<String>, image: Option<String>) -> PostDraft {
    PostDraft {
        text,
        group,
        image,
        clear_image: false,
    }
}

pub async fn handle_post_commands<S: PostStore>(
    command: PostCommands,
    blog: &Blog<S>,
    ctx: &AppContext,
    output: &OutputManager,
) -> Result<()> {
    match command {
        PostCommands::List { page, feed } => {
            let request = PageRequest::parse(page.as_deref());
            if feed {
                let listing = blog.list_followed_posts(&ctx.viewer, request).await?;
                output.display(&listing)?;
            } else {
                let listing = blog.list_all_posts(request).await?;
                output.display(&listing)?;
                if listing.page.has_next() {
                    output.hint(&format!("quire post list --page {}", listing.page.number + 1));
                }
            }
        }
        PostCommands::Show { post_id } => {
            let detail = blog.post_detail(&post_id).await?;
            output.display(&detail)?;
        }
        PostCommands::Create { text, group, image } => {
            let created = blog.create_post(&ctx.viewer, draft(text, group, image)).await?;
            output.success(&format!("Published post {}", created.post.id));
            output.hint(&format!("quire user show {}", created.redirect_to_profile()));
        }
        PostCommands::Edit {
            post_id,
            text,
            group,
            image,
            clear_image,
        } => {
            let mut draft = draft(text, group, image);
            draft.clear_image = clear_image;
            match blog.edit_post(&ctx.viewer, &post_id, draft).await? {
                EditOutcome::Updated { post } => output.success(&format!("Updated post {}", post.id)),
                EditOutcome::NotPermitted { post_id } => {
                    output.warning("Only the author can edit this post");
                    output.hint(&format!("quire post show {post_id}"));
                }
            }
        }
        PostCommands::Delete { post_id } => match blog.delete_post(&ctx.viewer, &post_id).await? {
            DeleteOutcome::Deleted {
                post_id,
                comments_removed,
            } => output.success(&format!("Deleted post {post_id} and {comments_removed} comments")),
            DeleteOutcome::NotPermitted { post_id } => {
                output.warning(&format!("Only the author can delete post {post_id}"));
            }
        },
        PostCommands::Comment { post_id, text } => match blog.add_comment(&ctx.viewer, &post_id, &text).await? {
            CommentOutcome::Added { comment } => {
                output.success(&format!("Comment added to post {}", comment.post));
            }
            CommentOutcome::Rejected { post_id, error } => {
                output.warning(&format!("Comment on post {post_id} was not saved"));
                report_validation(output, &error);
            }
        },
    }
    Ok(())
}
