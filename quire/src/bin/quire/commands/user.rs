use anyhow::Result;
use clap::Subcommand;

use quire::{Blog, PageRequest, PostStore};

use crate::context::AppContext;
use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Register",
        commands: &[
            "quire user register leo                      # Make 'leo' known to the blog",
            "quire user register leo --name \"Leo T.\"      # With a display name",
        ],
    },
    ExampleGroup {
        title: "Profiles",
        commands: &[
            "quire user show leo                          # First page of leo's posts",
            "quire --as anna user show leo --page 2       # Second page, with anna's follow status",
        ],
    },
];

#[derive(Subcommand)]
pub enum UserCommands {
    /// Register an externally authenticated identity
    #[command(name = "register")]
    Register {
        username: String,

        /// Display name shown next to the username
        #[arg(long)]
        name: Option<String>,
    },

    /// Show an author's profile and posts
    #[command(name = "show")]
    Show {
        username: String,

        /// Page number; invalid values select the first page
        #[arg(long)]
        page: Option<String>,
    },
}

pub async fn handle_user_commands<S: PostStore>(
    command: UserCommands,
    blog: &Blog<S>,
    ctx: &AppContext,
    output: &OutputManager,
) -> Result<()> {
    match command {
        UserCommands::Register { username, name } => {
            let user = blog.register_user(&username, name.as_deref()).await?;
            output.success(&format!("Registered '{}'", user.username));
            output.display(&user)?;
        }
        UserCommands::Show { username, page } => {
            let profile = blog
                .list_posts_by_author(&ctx.viewer, &username, PageRequest::parse(page.as_deref()))
                .await?;
            output.display(&profile)?;
            if profile.page.has_next() {
                output.hint(&format!("quire user show {username} --page {}", profile.page.number + 1));
            }
        }
    }
    Ok(())
}
