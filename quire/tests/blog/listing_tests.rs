use quire::{BlogError, EntityKind, PageRequest, PostDraft, Viewer};

use crate::support::{AUTHOR, GROUP, OTHER_GROUP, READER, ids, test_blog, viewer};

// ============================================================================
// Index listing
// ============================================================================

#[tokio::test]
async fn index_first_page_holds_ten_newest_posts() {
    let t = test_blog().await;
    let posts = t.publish_many(AUTHOR, 13, None).await;

    let index = t.blog.list_all_posts(PageRequest::first()).await.unwrap();
    assert_eq!(index.page.len(), 10);
    assert_eq!(index.page.count, 13);
    assert_eq!(index.page.num_pages, 2);
    assert!(index.page.has_next());
    assert!(!index.page.has_previous());
    assert_eq!(ids(&index.page.items), ids(&posts[..10]));
}

#[tokio::test]
async fn index_second_page_holds_the_remainder() {
    let t = test_blog().await;
    let posts = t.publish_many(AUTHOR, 13, None).await;

    let index = t.blog.list_all_posts(PageRequest::number(2)).await.unwrap();
    assert_eq!(index.page.number, 2);
    assert_eq!(ids(&index.page.items), ids(&posts[10..]));
    assert!(!index.page.has_next());
    assert!(index.page.has_previous());
}

#[tokio::test]
async fn out_of_range_pages_clamp() {
    let t = test_blog().await;
    t.publish_many(AUTHOR, 13, None).await;

    let last = t.blog.list_all_posts(PageRequest::number(99)).await.unwrap();
    assert_eq!(last.page.number, 2);
    assert_eq!(last.page.len(), 3);

    let zero = t.blog.list_all_posts(PageRequest::number(0)).await.unwrap();
    assert_eq!(zero.page.number, 1);
    assert_eq!(zero.page.len(), 10);

    let garbage = t.blog.list_all_posts(PageRequest::parse(Some("abc"))).await.unwrap();
    assert_eq!(garbage.page.number, 1);
}

#[tokio::test]
async fn fewer_than_a_page_of_posts() {
    let t = test_blog().await;
    let posts = t.publish_many(AUTHOR, 3, None).await;

    let index = t.blog.list_all_posts(PageRequest::first()).await.unwrap();
    assert_eq!(ids(&index.page.items), ids(&posts));
    assert_eq!(index.page.num_pages, 1);
}

#[tokio::test]
async fn empty_blog_has_one_blank_page() {
    let t = test_blog().await;
    let index = t.blog.list_all_posts(PageRequest::number(5)).await.unwrap();
    assert!(index.page.is_empty());
    assert_eq!(index.page.number, 1);
    assert_eq!(index.page.num_pages, 1);
}

#[tokio::test]
async fn posts_published_at_the_same_instant_order_by_id() {
    let t = test_blog().await;
    let mut created = Vec::new();
    for text in ["first", "second", "third"] {
        created.push(
            t.blog
                .create_post(&viewer(AUTHOR), PostDraft::new(text))
                .await
                .unwrap()
                .post,
        );
    }
    created.sort_by(|a, b| b.id.cmp(&a.id));

    let index = t.blog.list_all_posts(PageRequest::first()).await.unwrap();
    assert_eq!(ids(&index.page.items), ids(&created));
}

// ============================================================================
// Group listing
// ============================================================================

#[tokio::test]
async fn group_listing_paginates() {
    let t = test_blog().await;
    let posts = t.publish_many(AUTHOR, 13, Some(GROUP)).await;

    let first = t.blog.list_posts_by_group(GROUP, PageRequest::first()).await.unwrap();
    assert_eq!(first.group.slug, GROUP);
    assert_eq!(first.group.title, "Тестовая группа");
    assert_eq!(ids(&first.page.items), ids(&posts[..10]));

    let second = t.blog.list_posts_by_group(GROUP, PageRequest::number(2)).await.unwrap();
    assert_eq!(second.page.len(), 3);
}

#[tokio::test]
async fn post_appears_only_in_its_group() {
    let t = test_blog().await;
    let post = t.publish(AUTHOR, "Пост в группе", Some(GROUP)).await;
    t.publish(AUTHOR, "Без группы", None).await;

    let in_group = t.blog.list_posts_by_group(GROUP, PageRequest::first()).await.unwrap();
    assert_eq!(ids(&in_group.page.items), vec![post.id.as_str()]);

    let other = t.blog.list_posts_by_group(OTHER_GROUP, PageRequest::first()).await.unwrap();
    assert!(other.page.is_empty());

    let index = t.blog.list_all_posts(PageRequest::first()).await.unwrap();
    assert_eq!(index.page.count, 2);
}

#[tokio::test]
async fn unknown_group_is_not_found() {
    let t = test_blog().await;
    let err = t
        .blog
        .list_posts_by_group("missing", PageRequest::first())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BlogError::NotFound {
            entity: EntityKind::Group,
            ..
        }
    ));
}

// ============================================================================
// Profile listing
// ============================================================================

#[tokio::test]
async fn profile_lists_only_the_authors_posts() {
    let t = test_blog().await;
    let mine = t.publish_many(AUTHOR, 13, None).await;
    t.publish_many(READER, 2, None).await;

    let profile = t
        .blog
        .list_posts_by_author(&Viewer::Anonymous, AUTHOR, PageRequest::first())
        .await
        .unwrap();
    assert_eq!(profile.author.username, AUTHOR);
    assert_eq!(profile.post_count(), 13);
    assert_eq!(ids(&profile.page.items), ids(&mine[..10]));
    assert!(!profile.is_following);

    let second = t
        .blog
        .list_posts_by_author(&Viewer::Anonymous, AUTHOR, PageRequest::number(2))
        .await
        .unwrap();
    assert_eq!(ids(&second.page.items), ids(&mine[10..]));
}

#[tokio::test]
async fn profile_reports_follow_state_for_the_viewer() {
    let t = test_blog().await;
    t.blog.follow(&viewer(READER), AUTHOR).await.unwrap();

    let as_reader = t
        .blog
        .list_posts_by_author(&viewer(READER), AUTHOR, PageRequest::first())
        .await
        .unwrap();
    assert!(as_reader.is_following);
    assert_eq!(as_reader.follow_counts.followers, 1);
    assert_eq!(as_reader.follow_counts.following, 0);

    let as_self = t
        .blog
        .list_posts_by_author(&viewer(AUTHOR), AUTHOR, PageRequest::first())
        .await
        .unwrap();
    assert!(!as_self.is_following);
}

#[tokio::test]
async fn unknown_author_is_not_found() {
    let t = test_blog().await;
    let err = t
        .blog
        .list_posts_by_author(&Viewer::Anonymous, "ghost", PageRequest::first())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

// ============================================================================
// Post detail
// ============================================================================

#[tokio::test]
async fn post_detail_counts_author_posts() {
    let t = test_blog().await;
    let posts = t.publish_many(AUTHOR, 3, Some(GROUP)).await;

    let detail = t.blog.post_detail(&posts[0].id).await.unwrap();
    assert_eq!(detail.post, posts[0]);
    assert_eq!(detail.author_post_count, 3);
    assert!(detail.comments.is_empty());
    assert_eq!(detail.title(), format!("Post {}", posts[0].label()));
}

#[tokio::test]
async fn missing_post_detail_is_not_found() {
    let t = test_blog().await;
    let err = t.blog.post_detail("nope").await.unwrap_err();
    assert!(matches!(
        err,
        BlogError::NotFound {
            entity: EntityKind::Post,
            ..
        }
    ));
}
