use log::info;

use crate::{
    blog::Blog,
    errors::{BlogError, ValidationError, ValidationIssue},
    runtime::{
        MutationPlan,
        commands::{CreateGroup, CreateUser, MutationCommand},
    },
    store::PostStore,
    types::{Group, User},
    validators::{
        GROUP_TITLE_MAX_LENGTH, SLUG_MAX_LENGTH, USERNAME_MAX_LENGTH, is_valid_slug, is_valid_username, required_text,
    },
};

fn check_length(field: &str, value: &str, max: usize, issues: &mut Vec<ValidationIssue>) {
    if value.chars().count() > max {
        issues.push(ValidationIssue::new(
            field,
            "max_length",
            format!("{field} must be at most {max} characters"),
        ));
    }
}

impl<S: PostStore> Blog<S> {
    /// Makes an externally authenticated identity known to the store.
    pub async fn register_user(&self, username: &str, display_name: Option<&str>) -> Result<User, BlogError> {
        let mut issues = Vec::new();
        let username = required_text("username", username, &mut issues);
        if !username.is_empty() {
            check_length("username", &username, USERNAME_MAX_LENGTH, &mut issues);
            if !is_valid_username(&username) {
                issues.push(ValidationIssue::new(
                    "username",
                    "invalid",
                    "username may contain only letters, digits and @/./+/-/_",
                ));
            }
        }
        let display_name = display_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        let user = ValidationError::new(issues).into_result(User {
            username,
            display_name,
            date_joined: self.clock.now(),
        })?;
        self.store
            .execute(MutationPlan::single(MutationCommand::CreateUser(CreateUser { user: user.clone() })))
            .await?;
        info!("registered user '{}'", user.username);
        Ok(user)
    }

    pub async fn create_group(&self, title: &str, slug: &str, description: &str) -> Result<Group, BlogError> {
        let mut issues = Vec::new();
        let title = required_text("title", title, &mut issues);
        check_length("title", &title, GROUP_TITLE_MAX_LENGTH, &mut issues);
        let slug = required_text("slug", slug, &mut issues);
        if !slug.is_empty() {
            check_length("slug", &slug, SLUG_MAX_LENGTH, &mut issues);
            if !is_valid_slug(&slug) {
                issues.push(ValidationIssue::new(
                    "slug",
                    "invalid",
                    "slug may contain only latin letters, digits, hyphens and underscores",
                ));
            }
        }

        let group = ValidationError::new(issues).into_result(Group {
            title,
            slug,
            description: description.trim().to_string(),
        })?;
        self.store
            .execute(MutationPlan::single(MutationCommand::CreateGroup(CreateGroup {
                group: group.clone(),
            })))
            .await?;
        info!("created group '{}'", group.slug);
        Ok(group)
    }

    pub async fn find_group(&self, slug: &str) -> Result<Option<Group>, BlogError> {
        self.store.find_group(slug).await
    }

    pub async fn find_user(&self, username: &str) -> Result<Option<User>, BlogError> {
        self.store.find_user(username).await
    }

    pub async fn list_groups(&self) -> Result<Vec<Group>, BlogError> {
        self.store.list_groups().await
    }
}
