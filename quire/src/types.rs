use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{BlogError, ValidationError, ValidationResult},
    validators::{IMAGE_UPLOAD_PREFIX, is_valid_image_name},
};

/// Number of characters shown when a post is rendered as a short label.
pub const POST_LABEL_LENGTH: usize = 15;

/// Identity known to the store. Authentication lives outside the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub date_joined: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Path of an uploaded post image, always under the `posts/` media prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Builds the stored reference for an uploaded file name.
    pub fn from_upload(file_name: &str) -> ValidationResult<Self> {
        let file_name = file_name.trim();
        if !is_valid_image_name(file_name) {
            return Err(ValidationError::single(
                "image",
                "invalid_image",
                format!("'{file_name}' is not a supported image file"),
            ));
        }
        Ok(Self(format!("{IMAGE_UPLOAD_PREFIX}{file_name}")))
    }

    pub fn path(&self) -> &str {
        &self.0
    }

    pub fn file_name(&self) -> &str {
        self.0.strip_prefix(IMAGE_UPLOAD_PREFIX).unwrap_or(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

impl Post {
    /// First characters of the text, used wherever a post needs a one-line name.
    pub fn label(&self) -> String {
        self.text.chars().take(POST_LABEL_LENGTH).collect()
    }

    /// Sort score shared by every backend: publication time in epoch milliseconds.
    pub fn score(&self) -> i64 {
        self.pub_date.timestamp_millis()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub post: String,
    pub author: String,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl Comment {
    pub fn score(&self) -> i64 {
        self.created.timestamp_millis()
    }
}

/// Directed subscription from `user` to `author`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    pub user: String,
    pub author: String,
    pub created: DateTime<Utc>,
}

/// Who is asking. Supplied by the routing layer with every operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Viewer {
    #[default]
    Anonymous,
    Authenticated(String),
}

impl Viewer {
    pub fn user(username: impl Into<String>) -> Self {
        Self::Authenticated(username.into())
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Viewer::Anonymous => None,
            Viewer::Authenticated(username) => Some(username),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Viewer::Authenticated(_))
    }

    /// Username of an authenticated viewer, or `Unauthorized`.
    pub fn require(&self) -> Result<&str, BlogError> {
        self.username().ok_or(BlogError::Unauthorized)
    }
}

/// Submitted post fields for create and edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub text: String,
    /// Group slug; `None` leaves the post ungrouped.
    pub group: Option<String>,
    /// Newly uploaded image file name.
    pub image: Option<String>,
    /// On edit, drop the current image when no new one is uploaded.
    pub clear_image: bool,
}

impl PostDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_group(mut self, slug: impl Into<String>) -> Self {
        self.group = Some(slug.into());
        self
    }

    pub fn with_image(mut self, file_name: impl Into<String>) -> Self {
        self.image = Some(file_name.into());
        self
    }

    pub fn clearing_image(mut self) -> Self {
        self.clear_image = true;
        self
    }
}
