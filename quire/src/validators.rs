use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ValidationIssue;

pub const USERNAME_MAX_LENGTH: usize = 150;
pub const SLUG_MAX_LENGTH: usize = 50;
pub const GROUP_TITLE_MAX_LENGTH: usize = 200;

/// Media prefix every post image lives under.
pub const IMAGE_UPLOAD_PREFIX: &str = "posts/";
const IMAGE_EXTENSIONS: &[&str] = &["gif", "png", "jpg", "jpeg", "webp"];

static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid username regex"));
static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug regex"));

/// Returns `true` if the provided string is an acceptable username.
pub fn is_valid_username(value: &str) -> bool {
    !value.is_empty() && value.chars().count() <= USERNAME_MAX_LENGTH && USERNAME_RE.is_match(value)
}

/// Returns `true` if the provided string is a URL-safe group slug.
pub fn is_valid_slug(value: &str) -> bool {
    !value.is_empty() && value.len() <= SLUG_MAX_LENGTH && SLUG_RE.is_match(value)
}

/// Returns `true` if `file_name` is a bare file name with a supported image extension.
pub fn is_valid_image_name(file_name: &str) -> bool {
    if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name.starts_with('.') {
        return false;
    }
    match file_name.rsplit_once('.') {
        Some((stem, ext)) => !stem.is_empty() && IMAGE_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

/// Trims `value` and reports a `required` issue for `field` when nothing is left.
pub fn required_text(field: &str, value: &str, issues: &mut Vec<ValidationIssue>) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        issues.push(ValidationIssue::new(field, "required", format!("{field} must not be empty")));
    }
    trimmed.to_string()
}
