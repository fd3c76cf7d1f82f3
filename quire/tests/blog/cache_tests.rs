use std::sync::Arc;

use chrono::Duration;
use quire::{
    Blog, ManualClock, MemoryStore, PageRequest, Post, PostStore,
    runtime::{
        MutationExecutor, MutationPlan,
        commands::{CreatePost, MutationCommand},
    },
};

use crate::support::{AUTHOR, start_time, test_blog};

fn backdoor_post(id: &str, at_secs: i64) -> Post {
    Post {
        id: id.to_string(),
        text: "Записано мимо кэша".to_string(),
        pub_date: start_time() + Duration::seconds(at_secs),
        author: AUTHOR.to_string(),
        group: None,
        image: None,
    }
}

/// Writes straight to the store so the blog never clears its cache.
async fn write_behind_cache(store: &MemoryStore, post: Post) {
    store
        .execute(MutationPlan::single(MutationCommand::CreatePost(CreatePost { post })))
        .await
        .unwrap();
}

#[tokio::test]
async fn new_post_is_visible_immediately() {
    let t = test_blog().await;
    t.publish(AUTHOR, "Первый", None).await;
    let cached = t.blog.list_all_posts(PageRequest::first()).await.unwrap();
    assert_eq!(cached.page.count, 1);

    let post = t.publish(AUTHOR, "Второй", None).await;
    let fresh = t.blog.list_all_posts(PageRequest::first()).await.unwrap();
    assert_eq!(fresh.page.count, 2);
    assert_eq!(fresh.page.items[0], post);
}

#[tokio::test]
async fn cache_hit_skips_the_store_until_ttl() {
    let t = test_blog().await;
    t.publish(AUTHOR, "Первый", None).await;
    let cached = t.blog.list_all_posts(PageRequest::first()).await.unwrap();

    write_behind_cache(t.blog.store(), backdoor_post("zzzzzzzzzzzzzzzz", 3600)).await;
    assert_eq!(t.blog.store().count_posts(&quire::PostScope::All).await.unwrap(), 2);

    t.clock.advance(Duration::seconds(19));
    let hit = t.blog.list_all_posts(PageRequest::first()).await.unwrap();
    assert_eq!(hit.page, cached.page);

    t.clock.advance(Duration::seconds(1));
    let expired = t.blog.list_all_posts(PageRequest::first()).await.unwrap();
    assert_eq!(expired.page.count, 2);
    assert_eq!(expired.page.items[0].id, "zzzzzzzzzzzzzzzz");
}

#[tokio::test]
async fn pages_are_cached_separately() {
    let t = test_blog().await;
    t.publish_many(AUTHOR, 13, None).await;

    let first = t.blog.list_all_posts(PageRequest::first()).await.unwrap();
    let second = t.blog.list_all_posts(PageRequest::number(2)).await.unwrap();
    assert_eq!(first.page.len(), 10);
    assert_eq!(second.page.len(), 3);

    let first_again = t.blog.list_all_posts(PageRequest::first()).await.unwrap();
    assert_eq!(first_again.page, first.page);
}

#[tokio::test]
async fn out_of_range_pages_share_the_clamped_entry() {
    let t = test_blog().await;
    t.publish_many(AUTHOR, 13, None).await;

    for number in 2..=500 {
        let listing = t.blog.list_all_posts(PageRequest::number(number)).await.unwrap();
        assert_eq!(listing.page.number, 2);
    }
    assert_eq!(t.blog.cached_pages(), 1);

    t.clock.advance(Duration::hours(1));
    t.blog.list_all_posts(PageRequest::first()).await.unwrap();
    assert_eq!(t.blog.cached_pages(), 1);
}

#[tokio::test]
async fn empty_blog_keeps_one_cached_page() {
    let t = test_blog().await;
    for number in 1..=5000 {
        t.blog.list_all_posts(PageRequest::number(number)).await.unwrap();
    }
    assert_eq!(t.blog.cached_pages(), 1);
}

#[tokio::test]
async fn group_listings_are_never_cached() {
    let t = test_blog().await;
    t.publish(AUTHOR, "В группе", Some(crate::support::GROUP)).await;
    t.blog
        .list_posts_by_group(crate::support::GROUP, PageRequest::first())
        .await
        .unwrap();

    let mut post = backdoor_post("zzzzzzzzzzzzzzzz", 3600);
    post.group = Some(crate::support::GROUP.to_string());
    write_behind_cache(t.blog.store(), post).await;

    let listing = t
        .blog
        .list_posts_by_group(crate::support::GROUP, PageRequest::first())
        .await
        .unwrap();
    assert_eq!(listing.page.count, 2);
}

#[tokio::test]
async fn disabled_cache_always_reads_the_store() {
    let clock = Arc::new(ManualClock::new(start_time()));
    let blog = Blog::new(MemoryStore::new())
        .with_clock(clock.clone())
        .with_cache_ttl(None);
    assert!(!blog.cache_enabled());
    blog.register_user(AUTHOR, None).await.unwrap();

    assert!(blog.list_all_posts(PageRequest::first()).await.unwrap().page.is_empty());
    write_behind_cache(blog.store(), backdoor_post("abc", 1)).await;
    assert_eq!(blog.list_all_posts(PageRequest::first()).await.unwrap().page.count, 1);
}
