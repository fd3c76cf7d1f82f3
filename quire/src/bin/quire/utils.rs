use chrono::{DateTime, Utc};

use quire::Page;

pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Shortens `text` to `max` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() { format!("{head}…") } else { head }
}

/// "page 2 of 3 (25 posts)"
pub fn page_summary<T>(page: &Page<T>) -> String {
    let noun = if page.count == 1 { "post" } else { "posts" };
    format!("page {} of {} ({} {noun})", page.number, page.num_pages, page.count)
}
