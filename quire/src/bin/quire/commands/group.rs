use anyhow::Result;
use clap::Subcommand;

use quire::{Blog, PageRequest, PostStore};

use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Manage Groups",
        commands: &[
            "quire group create cats --title \"Cats\"              # Create a group",
            "quire group create cats --title Cats --description \"All about cats\"",
            "quire group list                                    # List every group",
        ],
    },
    ExampleGroup {
        title: "Group Listings",
        commands: &["quire group show cats --page 2                      # Second page of the cats group"],
    },
];

#[derive(Subcommand)]
pub enum GroupCommands {
    /// Create a group posts can be filed under
    #[command(name = "create")]
    Create {
        /// URL-safe identifier
        slug: String,

        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// List every group
    #[command(name = "list")]
    List,

    /// Show a group's posts
    #[command(name = "show")]
    Show {
        slug: String,

        /// Page number; invalid values select the first page
        #[arg(long)]
        page: Option<String>,
    },
}

pub async fn handle_group_commands<S: PostStore>(
    command: GroupCommands,
    blog: &Blog<S>,
    output: &OutputManager,
) -> Result<()> {
    match command {
        GroupCommands::Create {
            slug,
            title,
            description,
        } => {
            let group = blog.create_group(&title, &slug, &description).await?;
            output.success(&format!("Created group '{}'", group.slug));
        }
        GroupCommands::List => {
            let groups = blog.list_groups().await?;
            output.display(&groups)?;
        }
        GroupCommands::Show { slug, page } => {
            let listing = blog.list_posts_by_group(&slug, PageRequest::parse(page.as_deref())).await?;
            output.display(&listing)?;
            if listing.page.has_next() {
                output.hint(&format!("quire group show {slug} --page {}", listing.page.number + 1));
            }
        }
    }
    Ok(())
}
