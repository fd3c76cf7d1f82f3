use quire::{BlogError, DeleteOutcome, EditOutcome, PageRequest, PostDraft, PostStore, Viewer};

use crate::support::{AUTHOR, GROUP, OTHER_GROUP, READER, start_time, test_blog, viewer};

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn create_post_stamps_author_and_time() {
    let t = test_blog().await;
    let created = t
        .blog
        .create_post(&viewer(AUTHOR), PostDraft::new("  Новый пост  ").with_group(GROUP))
        .await
        .unwrap();

    assert_eq!(created.post.text, "Новый пост");
    assert_eq!(created.post.author, AUTHOR);
    assert_eq!(created.post.group.as_deref(), Some(GROUP));
    assert_eq!(created.post.pub_date, start_time());
    assert_eq!(created.redirect_to_profile(), AUTHOR);

    let stored = t.blog.store().find_post(&created.post.id).await.unwrap();
    assert_eq!(stored, Some(created.post));
}

#[tokio::test]
async fn create_post_with_image_stores_it_under_posts() {
    let t = test_blog().await;
    let created = t
        .blog
        .create_post(&viewer(AUTHOR), PostDraft::new("С картинкой").with_image("small.gif"))
        .await
        .unwrap();
    let image = created.post.image.expect("image kept");
    assert_eq!(image.path(), "posts/small.gif");
}

#[tokio::test]
async fn anonymous_cannot_create_posts() {
    let t = test_blog().await;
    let err = t
        .blog
        .create_post(&Viewer::Anonymous, PostDraft::new("text"))
        .await
        .unwrap_err();
    assert!(matches!(err, BlogError::Unauthorized));

    let index = t.blog.list_all_posts(PageRequest::first()).await.unwrap();
    assert!(index.page.is_empty());
}

#[tokio::test]
async fn unknown_identity_cannot_create_posts() {
    let t = test_blog().await;
    let err = t
        .blog
        .create_post(&viewer("ghost"), PostDraft::new("text"))
        .await
        .unwrap_err();
    assert!(matches!(err, BlogError::Unauthorized));
}

#[tokio::test]
async fn invalid_drafts_report_every_field() {
    let t = test_blog().await;
    let draft = PostDraft::new("   ").with_group("missing").with_image("notes.txt");
    let err = t.blog.create_post(&viewer(AUTHOR), draft).await.unwrap_err();

    let BlogError::Validation(validation) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert!(validation.has_field("text"));
    assert!(validation.has_field("group"));
    assert!(validation.has_field("image"));

    let index = t.blog.list_all_posts(PageRequest::first()).await.unwrap();
    assert!(index.page.is_empty());
}

// ============================================================================
// Edit
// ============================================================================

#[tokio::test]
async fn author_edits_text_and_group_in_place() {
    let t = test_blog().await;
    let post = t.publish(AUTHOR, "Старый текст", Some(GROUP)).await;
    t.clock.advance(chrono::Duration::hours(1));

    let outcome = t
        .blog
        .edit_post(&viewer(AUTHOR), &post.id, PostDraft::new("Новый текст").with_group(OTHER_GROUP))
        .await
        .unwrap();
    let EditOutcome::Updated { post: updated } = outcome else {
        panic!("expected update, got {outcome:?}");
    };
    assert_eq!(updated.id, post.id);
    assert_eq!(updated.text, "Новый текст");
    assert_eq!(updated.pub_date, post.pub_date);

    let old_group = t.blog.list_posts_by_group(GROUP, PageRequest::first()).await.unwrap();
    assert!(old_group.page.is_empty());
    let new_group = t.blog.list_posts_by_group(OTHER_GROUP, PageRequest::first()).await.unwrap();
    assert_eq!(new_group.page.items, vec![updated]);
}

#[tokio::test]
async fn non_author_edit_is_not_permitted() {
    let t = test_blog().await;
    let post = t.publish(AUTHOR, "Текст автора", Some(GROUP)).await;

    let outcome = t
        .blog
        .edit_post(&viewer(READER), &post.id, PostDraft::new("Чужой текст"))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        EditOutcome::NotPermitted {
            post_id: post.id.clone()
        }
    );

    let stored = t.blog.store().find_post(&post.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "Текст автора");
    assert_eq!(stored.group.as_deref(), Some(GROUP));
}

#[tokio::test]
async fn edit_keeps_image_unless_replaced_or_cleared() {
    let t = test_blog().await;
    let post = t
        .blog
        .create_post(&viewer(AUTHOR), PostDraft::new("С картинкой").with_image("small.gif"))
        .await
        .unwrap()
        .post;

    let kept = t
        .blog
        .edit_post(&viewer(AUTHOR), &post.id, PostDraft::new("Другой текст"))
        .await
        .unwrap();
    let EditOutcome::Updated { post: kept } = kept else {
        panic!("expected update");
    };
    assert_eq!(kept.image, post.image);

    let replaced = t
        .blog
        .edit_post(&viewer(AUTHOR), &post.id, PostDraft::new("Ещё").with_image("big.png"))
        .await
        .unwrap();
    let EditOutcome::Updated { post: replaced } = replaced else {
        panic!("expected update");
    };
    assert_eq!(replaced.image.unwrap().path(), "posts/big.png");

    let cleared = t
        .blog
        .edit_post(&viewer(AUTHOR), &post.id, PostDraft::new("Без картинки").clearing_image())
        .await
        .unwrap();
    let EditOutcome::Updated { post: cleared } = cleared else {
        panic!("expected update");
    };
    assert_eq!(cleared.image, None);
}

#[tokio::test]
async fn edit_requires_existing_post_and_viewer() {
    let t = test_blog().await;
    let post = t.publish(AUTHOR, "Текст", None).await;

    let missing = t
        .blog
        .edit_post(&viewer(AUTHOR), "missing", PostDraft::new("x"))
        .await
        .unwrap_err();
    assert!(missing.is_not_found());

    let anonymous = t
        .blog
        .edit_post(&Viewer::Anonymous, &post.id, PostDraft::new("x"))
        .await
        .unwrap_err();
    assert!(matches!(anonymous, BlogError::Unauthorized));
}

#[tokio::test]
async fn invalid_edit_leaves_post_untouched() {
    let t = test_blog().await;
    let post = t.publish(AUTHOR, "Текст", Some(GROUP)).await;

    let err = t
        .blog
        .edit_post(&viewer(AUTHOR), &post.id, PostDraft::new(""))
        .await
        .unwrap_err();
    assert!(matches!(err, BlogError::Validation(_)));

    let stored = t.blog.store().find_post(&post.id).await.unwrap().unwrap();
    assert_eq!(stored, post);
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn delete_removes_post_and_comments() {
    let t = test_blog().await;
    let post = t.publish(AUTHOR, "Удаляемый пост", Some(GROUP)).await;
    t.blog.add_comment(&viewer(READER), &post.id, "Первый").await.unwrap();
    t.blog.add_comment(&viewer(AUTHOR), &post.id, "Второй").await.unwrap();

    let outcome = t.blog.delete_post(&viewer(AUTHOR), &post.id).await.unwrap();
    assert_eq!(
        outcome,
        DeleteOutcome::Deleted {
            post_id: post.id.clone(),
            comments_removed: 2
        }
    );

    assert!(t.blog.post_detail(&post.id).await.unwrap_err().is_not_found());
    assert_eq!(t.blog.store().comment_count(&post.id).unwrap(), 0);
    let group = t.blog.list_posts_by_group(GROUP, PageRequest::first()).await.unwrap();
    assert!(group.page.is_empty());
}

#[tokio::test]
async fn non_author_delete_is_not_permitted() {
    let t = test_blog().await;
    let post = t.publish(AUTHOR, "Мой пост", None).await;

    let outcome = t.blog.delete_post(&viewer(READER), &post.id).await.unwrap();
    assert_eq!(
        outcome,
        DeleteOutcome::NotPermitted {
            post_id: post.id.clone()
        }
    );
    assert!(t.blog.store().find_post(&post.id).await.unwrap().is_some());
}

#[tokio::test]
async fn malformed_post_ids_are_not_found() {
    let t = test_blog().await;
    let post = t.publish(AUTHOR, "Настоящий пост", None).await;

    for bad in ["42", "", "0000000000000000", "post:1*"] {
        let deleted = t.blog.delete_post(&viewer(AUTHOR), bad).await.unwrap_err();
        assert!(deleted.is_not_found(), "{bad:?}: {deleted:?}");
        let detail = t.blog.post_detail(bad).await.unwrap_err();
        assert!(detail.is_not_found(), "{bad:?}: {detail:?}");
    }

    let anonymous = t.blog.delete_post(&Viewer::Anonymous, "42").await.unwrap_err();
    assert!(matches!(anonymous, BlogError::Unauthorized));
    assert!(t.blog.store().find_post(&post.id).await.unwrap().is_some());
}
