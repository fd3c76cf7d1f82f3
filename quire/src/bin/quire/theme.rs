//! Colors and glyphs shared by help text, status lines and post tables.

use colored::Color;
use comfy_table::Color as TableColor;

/// Terminal roles the CLI paints. Status colors first, then help text, then tables.
pub struct Theme {
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub info: Color,
    pub muted: Color,
    /// Section headings such as `Examples:`.
    pub heading: Color,
    pub example_title: Color,
    /// Runnable command lines and next-step hints.
    pub command: Color,
    pub env_name: Color,
    pub env_text: Color,
    pub table_header: TableColor,
    pub author: TableColor,
    pub group: TableColor,
}

pub const THEME: Theme = Theme {
    success: Color::Green,
    error: Color::Red,
    warning: Color::Yellow,
    info: Color::Blue,
    muted: Color::BrightBlack,
    heading: Color::Cyan,
    example_title: Color::BrightBlue,
    command: Color::Magenta,
    env_name: Color::BrightCyan,
    env_text: Color::White,
    table_header: TableColor::Cyan,
    author: TableColor::Green,
    group: TableColor::Magenta,
};

pub struct Icons {
    pub success: &'static str,
    pub error: &'static str,
    pub warning: &'static str,
    pub info: &'static str,
    pub arrow: &'static str,
    pub bullet: &'static str,
    pub comment: &'static str,
    pub image: &'static str,
}

pub const ICONS: Icons = Icons {
    success: "✓",
    error: "✗",
    warning: "⚠",
    info: "ℹ",
    arrow: "→",
    bullet: "•",
    comment: "💬",
    image: "🖼",
};
