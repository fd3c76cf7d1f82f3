use quire::{BlogError, PostStore};

use crate::support::{AUTHOR, GROUP, OTHER_GROUP, start_time, test_blog};

#[tokio::test]
async fn register_user_records_join_time() {
    let t = test_blog().await;
    let user = t.blog.register_user("new.user+tag@x", Some(" Новый ")).await.unwrap();
    assert_eq!(user.display_name.as_deref(), Some("Новый"));
    assert_eq!(user.date_joined, start_time());
    assert_eq!(t.blog.find_user("new.user+tag@x").await.unwrap(), Some(user));
}

#[tokio::test]
async fn duplicate_username_is_a_unique_violation() {
    let t = test_blog().await;
    let err = t.blog.register_user(AUTHOR, None).await.unwrap_err();
    assert!(matches!(err, BlogError::UniqueConstraintViolation { ref field, .. } if field == "username"));
}

#[tokio::test]
async fn invalid_usernames_are_rejected() {
    let t = test_blog().await;
    for username in ["", "has space", "semi;colon"] {
        let err = t.blog.register_user(username, None).await.unwrap_err();
        let BlogError::Validation(validation) = err else {
            panic!("expected validation error for {username:?}");
        };
        assert!(validation.has_field("username"));
    }
}

#[tokio::test]
async fn groups_list_by_slug() {
    let t = test_blog().await;
    let groups = t.blog.list_groups().await.unwrap();
    let slugs: Vec<&str> = groups.iter().map(|group| group.slug.as_str()).collect();
    assert_eq!(slugs, vec![OTHER_GROUP, GROUP]);

    let group = t.blog.find_group(GROUP).await.unwrap().unwrap();
    assert_eq!(group.description, "Тестовое описание");
    assert!(t.blog.find_group("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_slug_is_a_unique_violation() {
    let t = test_blog().await;
    let err = t.blog.create_group("Снова", GROUP, "").await.unwrap_err();
    assert!(matches!(err, BlogError::UniqueConstraintViolation { ref field, .. } if field == "slug"));
}

#[tokio::test]
async fn invalid_group_fields_are_rejected() {
    let t = test_blog().await;
    let err = t.blog.create_group("", "кириллица", "").await.unwrap_err();
    let BlogError::Validation(validation) = err else {
        panic!("expected validation error");
    };
    assert!(validation.has_field("title"));
    assert!(validation.has_field("slug"));
    assert!(t.blog.store().find_group("кириллица").await.unwrap().is_none());
}
