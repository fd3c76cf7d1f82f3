mod commands;
mod context;
mod examples;
mod help;
mod output;
mod theme;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

use quire::{Blog, BlogError, PostStore, StoreBackend};

use commands::{
    group::{GroupCommands, handle_group_commands},
    post::{PostCommands, handle_post_commands},
    report_validation,
    social::{FollowArgs, handle_follow, handle_unfollow},
    user::{UserCommands, handle_user_commands},
};
use context::AppContext;
use help::blank_line;
use output::{GlobalOptions, OutputFormat, OutputManager};

#[derive(Parser)]
#[command(name = "quire")]
#[command(version)]
#[command(
    about = "Blog publishing from the command line",
    long_about = r#"Command-line front end for the quire blog core:

• Paginated listings of every post, a group, an author or your feed
• Author-only editing and deletion of posts
• Comments and author subscriptions

Commands:
  user      Register identities and view profiles
  group     Create and browse groups
  post      List, read, write and comment on posts
  follow    Subscribe to an author
  unfollow  Drop a subscription
"#
)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Config file (overrides QUIRE_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Act as this user; omit to act anonymously
    #[arg(long = "as", global = true, env = "QUIRE_USER")]
    acting_as: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    output: OutputFormat,

    /// Suppress output (only errors will be shown)
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Enable verbose output
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register identities and view author profiles
    #[command(subcommand)]
    User(UserCommands),

    /// Create and browse groups
    #[command(subcommand)]
    Group(GroupCommands),

    /// List, read, write and comment on posts
    #[command(subcommand)]
    Post(PostCommands),

    /// Subscribe to an author
    Follow(FollowArgs),

    /// Drop a subscription to an author
    Unfollow(FollowArgs),
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli: Cli = help::parse(Cli::command());

    blank_line(true);

    let output = OutputManager::new(GlobalOptions {
        output_format: cli.output.clone(),
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_color: cli.no_color,
    });
    if cli.no_color {
        colored::control::set_override(false);
    }

    match execute(cli, &output).await {
        Ok(()) => blank_line(true),
        Err(err) => {
            output.error(&format!("{err}"));
            if let Some(BlogError::Validation(validation)) = err.downcast_ref::<BlogError>() {
                report_validation(&output, validation);
            }
            blank_line(true);
            std::process::exit(1);
        }
    }
}

async fn execute(cli: Cli, output: &OutputManager) -> Result<()> {
    let ctx = AppContext::load(cli.config.as_deref(), cli.acting_as)?;
    output.verbose(&format!(
        "Using {} ({})",
        ctx.config_path.display(),
        ctx.describe_viewer()
    ));

    match ctx.backend() {
        StoreBackend::Redis => {
            let blog = ctx.redis_blog().await?;
            dispatch(cli.command, &blog, &ctx, output).await
        }
        StoreBackend::Memory => {
            output.warning("Memory backend: nothing is kept after this command exits");
            let blog = ctx.memory_blog();
            dispatch(cli.command, &blog, &ctx, output).await
        }
    }
}

async fn dispatch<S: PostStore>(
    command: Commands,
    blog: &Blog<S>,
    ctx: &AppContext,
    output: &OutputManager,
) -> Result<()> {
    match command {
        Commands::User(user_cmd) => handle_user_commands(user_cmd, blog, ctx, output).await,
        Commands::Group(group_cmd) => handle_group_commands(group_cmd, blog, output).await,
        Commands::Post(post_cmd) => handle_post_commands(post_cmd, blog, ctx, output).await,
        Commands::Follow(args) => handle_follow(args, blog, ctx, output).await,
        Commands::Unfollow(args) => handle_unfollow(args, blog, ctx, output).await,
    }
}
