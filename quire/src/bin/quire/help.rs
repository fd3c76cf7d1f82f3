//! Themed `--help` output: clap styles, per-command examples and the top-level appendix.

use std::fmt::Write;
use std::io::{self, Write as IoWrite};

use clap::{
    ColorChoice, Command, FromArgMatches,
    builder::{
        Styles,
        styling::{AnsiColor, Style},
    },
    error::ErrorKind,
};
use colored::{Color as ThemeColor, Colorize, control::ShouldColorize};

use crate::examples::{ExampleGroup, command_examples};
use crate::theme::{ICONS, THEME};

const ENVIRONMENT_VARIABLES: &[(&str, &str)] = &[
    ("REDIS_URL", "Redis connection URL used when the config does not name one"),
    ("QUIRE_CONFIG", "Path to the config file (default ./quire.toml)"),
    ("QUIRE_USER", "Username to act as, same as --as"),
    ("RUST_LOG", "Log filter, e.g. quire=debug"),
];

/// Applies theme colors to help text when the terminal supports them.
#[derive(Clone, Copy)]
struct Painter {
    enabled: bool,
}

impl Painter {
    fn detect() -> Self {
        Self {
            enabled: ShouldColorize::from_env().should_colorize(),
        }
    }

    fn paint(&self, text: &str, color: ThemeColor) -> String {
        if self.enabled { text.color(color).to_string() } else { text.to_string() }
    }

    fn heading(&self, text: &str) -> String {
        if self.enabled {
            text.color(THEME.heading).bold().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Parses the process arguments against `command` after theming it. Help, version and
/// usage errors print surrounded by blank lines and exit.
pub fn parse<T: FromArgMatches>(command: Command) -> T {
    let painter = Painter::detect();
    let mut command = decorate(command, painter);

    let matches = match command.clone().try_get_matches() {
        Ok(matches) => matches,
        Err(err) if err.kind() == ErrorKind::MissingSubcommand => {
            eprintln!();
            eprintln!("error: '{}' requires a subcommand", command.get_name());
            eprintln!();
            let _ = command.write_long_help(&mut io::stderr());
            eprintln!();
            std::process::exit(err.exit_code());
        }
        Err(err) => {
            let to_stdout = matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion);
            blank_line(to_stdout);
            if let Err(print_err) = err.print()
                && print_err.kind() != io::ErrorKind::BrokenPipe
            {
                eprintln!("Failed to display help: {print_err}");
            }
            blank_line(to_stdout);
            std::process::exit(err.exit_code());
        }
    };

    match T::from_arg_matches(&matches) {
        Ok(parsed) => parsed,
        Err(err) => err.exit(),
    }
}

fn decorate(command: Command, painter: Painter) -> Command {
    let mut command = command
        .styles(styles())
        .color(if painter.enabled { ColorChoice::Auto } else { ColorChoice::Never })
        .after_long_help(appendix(painter));
    for example in command_examples() {
        let text = render_examples(example.groups, painter);
        command = command.mut_subcommand(example.name, |sub| sub.after_long_help(text));
    }
    command
}

fn render_examples(groups: &[ExampleGroup], painter: Painter) -> String {
    let mut buffer = String::new();
    let _ = writeln!(buffer, "{}", painter.heading("Examples:"));
    for (index, group) in groups.iter().enumerate() {
        if index > 0 {
            buffer.push('\n');
        }
        let _ = writeln!(buffer, "  {}", painter.paint(group.title, THEME.example_title));
        for line in group.commands {
            let _ = writeln!(
                buffer,
                "    {} {}",
                painter.paint(ICONS.arrow, THEME.command),
                painter.paint(line, THEME.command)
            );
        }
    }
    buffer
}

fn appendix(painter: Painter) -> String {
    let mut buffer = String::new();
    let _ = writeln!(buffer, "{}", painter.heading("Environment Variables:"));
    for (name, description) in ENVIRONMENT_VARIABLES {
        let _ = writeln!(
            buffer,
            "  {}  {}",
            painter.paint(name, THEME.env_name),
            painter.paint(description, THEME.env_text)
        );
    }
    let _ = writeln!(
        buffer,
        "\n{} {}",
        painter.heading("Tip:"),
        painter.paint("Use 'quire <command> --help' to view examples for each command.", THEME.command)
    );
    buffer
}

pub fn blank_line(to_stdout: bool) {
    if to_stdout {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(b"\n").and_then(|_| stdout.flush());
    } else {
        let mut stderr = io::stderr();
        let _ = stderr.write_all(b"\n").and_then(|_| stderr.flush());
    }
}

fn styles() -> Styles {
    let fg = |color: ThemeColor| Style::new().fg_color(Some(ansi(color).into()));
    Styles::styled()
        .usage(fg(THEME.example_title).bold())
        .header(fg(THEME.heading).bold())
        .literal(fg(THEME.command))
        .placeholder(fg(THEME.muted))
        .valid(fg(THEME.success))
        .invalid(fg(THEME.warning))
        .error(fg(THEME.error).bold())
}

/// Maps the theme's palette onto clap's ANSI colors.
fn ansi(color: ThemeColor) -> AnsiColor {
    match color {
        ThemeColor::Red => AnsiColor::Red,
        ThemeColor::Green => AnsiColor::Green,
        ThemeColor::Yellow => AnsiColor::Yellow,
        ThemeColor::Blue => AnsiColor::Blue,
        ThemeColor::Magenta => AnsiColor::Magenta,
        ThemeColor::Cyan => AnsiColor::Cyan,
        ThemeColor::BrightBlack => AnsiColor::BrightBlack,
        ThemeColor::BrightBlue => AnsiColor::BrightBlue,
        ThemeColor::BrightCyan => AnsiColor::BrightCyan,
        _ => AnsiColor::White,
    }
}
