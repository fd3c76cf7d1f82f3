use std::{borrow::Cow, fmt};

use serde::Serialize;
use thiserror::Error;

/// Kinds of records the store can fail to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Group,
    Post,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Group => "group",
            EntityKind::Post => "post",
        }
    }

    pub(crate) fn from_code(code: &str) -> Option<Self> {
        match code {
            "user" => Some(EntityKind::User),
            "group" => Some(EntityKind::Group),
            "post" => Some(EntityKind::Post),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level error type returned by blog operations and stores.
#[derive(Debug, Error)]
pub enum BlogError {
    /// A referenced group, user or post does not exist.
    #[error("{entity} '{key}' not found")]
    NotFound { entity: EntityKind, key: String },

    /// Validation failed for one or more fields.
    #[error("validation failed")]
    Validation(#[from] ValidationError),

    /// Mutation attempted without an authenticated viewer.
    #[error("authentication required")]
    Unauthorized,

    /// Mutation attempted by an authenticated viewer who does not own the post.
    #[error("post '{post_id}' belongs to another author")]
    Forbidden { post_id: String },

    /// The value already exists on another record.
    #[error("unique constraint violation: {field} '{value}' already exists")]
    UniqueConstraintViolation { field: String, value: String },

    /// Underlying Redis command failed.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("{message}")]
    Other { message: Cow<'static, str> },
}

impl BlogError {
    pub fn not_found(entity: EntityKind, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub(crate) fn other(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Collection of validation issues encountered while preparing a mutation.
#[derive(Debug, Clone, Error, Serialize)]
#[error("validation errors: {issues:?}")]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new<I>(issues: I) -> Self
    where
        I: IntoIterator<Item = ValidationIssue>,
    {
        Self {
            issues: issues.into_iter().collect(),
        }
    }

    /// Convenience helper for constructing a single-field validation error.
    pub fn single(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new([ValidationIssue::new(field, code, message)])
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }

    /// Turns a collected list of issues into `Ok(value)` when empty.
    pub fn into_result<T>(self, value: T) -> ValidationResult<T> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Detailed validation failure for a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;
