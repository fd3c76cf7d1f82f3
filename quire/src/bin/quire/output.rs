use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{Attribute, Cell, Color as TableColor, Table};
use serde::Serialize;

use quire::{FollowPage, Group, GroupPage, IndexPage, Page, Post, PostDetail, ProfilePage, User};

use crate::theme::{ICONS, THEME};
use crate::utils::{format_datetime, page_summary, truncate};

/// Width of the text column in post tables.
const TEXT_COLUMN_WIDTH: usize = 60;

/// Output format options for CLI commands
#[derive(Clone, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    /// Formatted table output (default)
    #[default]
    Table,
    /// JSON output for scripting
    Json,
    /// Compact single-line output
    Compact,
}

/// Global CLI options that affect output and behavior
#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub no_color: bool,
}

/// Data that can be displayed as a table
pub trait TableDisplay {
    fn to_table(&self, options: &GlobalOptions) -> Table;
    fn to_compact(&self) -> String;
}

pub struct OutputManager {
    pub options: GlobalOptions,
}

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    /// Display data according to the configured output format
    pub fn display<T>(&self, data: &T) -> Result<()>
    where
        T: Serialize + TableDisplay,
    {
        if self.options.quiet {
            return Ok(());
        }

        match self.options.output_format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(data)?;
                println!("{json}");
            }
            OutputFormat::Table => {
                let table = data.to_table(&self.options);
                println!("{table}");
            }
            OutputFormat::Compact => {
                println!("{}", data.to_compact());
            }
        }
        Ok(())
    }

    fn emit(&self, icon: &str, color: colored::Color, message: &str) -> String {
        if self.options.no_color {
            format!("{icon} {message}")
        } else {
            format!("{} {}", icon.color(color), message.color(color))
        }
    }

    pub fn success(&self, message: &str) {
        if !self.options.quiet {
            println!("{}", self.emit(ICONS.success, THEME.success, message));
        }
    }

    /// Errors are printed even in quiet mode.
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.emit(ICONS.error, THEME.error, message));
    }

    pub fn warning(&self, message: &str) {
        if !self.options.quiet {
            println!("{}", self.emit(ICONS.warning, THEME.warning, message));
        }
    }

    pub fn info(&self, message: &str) {
        if !self.options.quiet {
            println!("{}", self.emit(ICONS.info, THEME.info, message));
        }
    }

    /// Display verbose information (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.options.verbose && !self.options.quiet {
            eprintln!("{}", self.emit(ICONS.arrow, THEME.muted, message));
        }
    }

    pub fn bullet(&self, text: &str) {
        if !self.options.quiet {
            let output = if self.options.no_color {
                format!("  {} {text}", ICONS.bullet)
            } else {
                format!("  {} {text}", ICONS.bullet.color(THEME.muted))
            };
            println!("{output}");
        }
    }

    /// Prints the next command to run when the table output is active.
    pub fn hint(&self, command: &str) {
        if self.options.quiet || self.options.output_format != OutputFormat::Table {
            return;
        }
        let output = if self.options.no_color {
            format!("{} {command}", ICONS.arrow)
        } else {
            format!("{} {}", ICONS.arrow.color(THEME.command), command.color(THEME.command))
        };
        println!("{output}");
    }
}

fn themed_table(options: &GlobalOptions, headers: &[&str]) -> Table {
    let mut table = Table::new();
    if options.no_color {
        table.load_preset(comfy_table::presets::ASCII_FULL);
    } else {
        table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
    }
    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|header| {
            let cell = Cell::new(header).add_attribute(Attribute::Bold);
            if options.no_color { cell } else { cell.fg(THEME.table_header) }
        })
        .collect();
    table.set_header(header_cells);
    table
}

fn tinted(text: &str, color: TableColor, options: &GlobalOptions) -> Cell {
    let cell = Cell::new(text);
    if options.no_color { cell } else { cell.fg(color) }
}

fn post_row(post: &Post, options: &GlobalOptions) -> Vec<Cell> {
    let mut text = truncate(&post.text, TEXT_COLUMN_WIDTH);
    if post.image.is_some() {
        text = format!("{} {text}", ICONS.image);
    }
    vec![
        Cell::new(&post.id),
        tinted(&post.author, THEME.author, options),
        tinted(post.group.as_deref().unwrap_or("-"), THEME.group, options),
        Cell::new(format_datetime(post.pub_date)),
        Cell::new(text),
    ]
}

fn posts_table(page: &Page<Post>, options: &GlobalOptions) -> Table {
    let mut table = themed_table(options, &["Id", "Author", "Group", "Published", "Text"]);
    if page.is_empty() {
        table.add_row(vec![Cell::new("No posts yet")]);
    }
    for post in page {
        table.add_row(post_row(post, options));
    }
    table.add_row(vec![Cell::new(page_summary(page)).add_attribute(Attribute::Italic)]);
    table
}

fn compact_posts(page: &Page<Post>) -> String {
    let ids: Vec<&str> = page.iter().map(|post| post.id.as_str()).collect();
    format!("{} [{}]", page_summary(page), ids.join(","))
}

impl TableDisplay for IndexPage {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        posts_table(&self.page, options)
    }

    fn to_compact(&self) -> String {
        compact_posts(&self.page)
    }
}

impl TableDisplay for FollowPage {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        posts_table(&self.page, options)
    }

    fn to_compact(&self) -> String {
        compact_posts(&self.page)
    }
}

impl TableDisplay for GroupPage {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = posts_table(&self.page, options);
        table.add_row(vec![Cell::new(format!("{} ({})", self.group.title, self.group.slug))]);
        if !self.group.description.is_empty() {
            table.add_row(vec![Cell::new(&self.group.description)]);
        }
        table
    }

    fn to_compact(&self) -> String {
        format!("{}: {}", self.group.slug, compact_posts(&self.page))
    }
}

impl TableDisplay for ProfilePage {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = posts_table(&self.page, options);
        let following = if self.is_following { "yes" } else { "no" };
        table.add_row(vec![Cell::new(format!(
            "{}: {} posts, {} followers, following {}, you follow: {following}",
            self.author.username,
            self.post_count(),
            self.follow_counts.followers,
            self.follow_counts.following
        ))]);
        table
    }

    fn to_compact(&self) -> String {
        format!(
            "{} posts={} following={} {}",
            self.author.username,
            self.post_count(),
            self.is_following,
            compact_posts(&self.page)
        )
    }
}

impl TableDisplay for PostDetail {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options, &["Field", "Value"]);
        table.add_row(vec![Cell::new("Id"), Cell::new(&self.post.id)]);
        table.add_row(vec![Cell::new("Title"), Cell::new(self.title())]);
        table.add_row(vec![
            Cell::new("Author"),
            Cell::new(format!("{} ({} posts)", self.post.author, self.author_post_count)),
        ]);
        table.add_row(vec![Cell::new("Group"), Cell::new(self.post.group.as_deref().unwrap_or("-"))]);
        table.add_row(vec![Cell::new("Published"), Cell::new(format_datetime(self.post.pub_date))]);
        if let Some(image) = &self.post.image {
            table.add_row(vec![Cell::new("Image"), Cell::new(image.path())]);
        }
        table.add_row(vec![Cell::new("Text"), Cell::new(&self.post.text)]);
        for comment in &self.comments {
            table.add_row(vec![
                tinted(&format!("{} {}", ICONS.comment, comment.author), THEME.author, options),
                Cell::new(format!("{} ({})", comment.text, format_datetime(comment.created))),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        format!("{} {} comments={}", self.post.id, self.post.label(), self.comments.len())
    }
}

impl TableDisplay for User {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options, &["Username", "Name", "Joined"]);
        table.add_row(vec![
            Cell::new(&self.username),
            Cell::new(self.display_name.as_deref().unwrap_or("-")),
            Cell::new(format_datetime(self.date_joined)),
        ]);
        table
    }

    fn to_compact(&self) -> String {
        self.username.clone()
    }
}

impl TableDisplay for Vec<Group> {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options, &["Slug", "Title", "Description"]);
        if self.is_empty() {
            table.add_row(vec![Cell::new("No groups found")]);
        }
        for group in self {
            table.add_row(vec![
                Cell::new(&group.slug),
                Cell::new(&group.title),
                Cell::new(truncate(&group.description, TEXT_COLUMN_WIDTH)),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        let slugs: Vec<&str> = self.iter().map(|group| group.slug.as_str()).collect();
        format!("Count: {} [{}]", self.len(), slugs.join(","))
    }
}
