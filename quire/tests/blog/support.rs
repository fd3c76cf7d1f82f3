//! Shared fixtures: an in-memory blog on a manual clock with three users and two groups.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use quire::{Blog, ManualClock, MemoryStore, Post, PostDraft, Viewer};

pub const AUTHOR: &str = "auth";
pub const READER: &str = "reader";
pub const STRANGER: &str = "stranger";
pub const GROUP: &str = "test-slug";
pub const OTHER_GROUP: &str = "other-slug";

pub struct TestBlog {
    pub blog: Blog<MemoryStore>,
    pub clock: Arc<ManualClock>,
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

pub fn viewer(username: &str) -> Viewer {
    Viewer::user(username)
}

pub async fn test_blog() -> TestBlog {
    let clock = Arc::new(ManualClock::new(start_time()));
    let blog = Blog::new(MemoryStore::new()).with_clock(clock.clone());

    for username in [AUTHOR, READER, STRANGER] {
        blog.register_user(username, None).await.expect("register user");
    }
    blog.create_group("Тестовая группа", GROUP, "Тестовое описание")
        .await
        .expect("create group");
    blog.create_group("Другая группа", OTHER_GROUP, "")
        .await
        .expect("create group");

    TestBlog { blog, clock }
}

impl TestBlog {
    /// Publishes one post a second after the previous one.
    pub async fn publish(&self, author: &str, text: &str, group: Option<&str>) -> Post {
        self.clock.advance(Duration::seconds(1));
        let mut draft = PostDraft::new(text);
        if let Some(slug) = group {
            draft = draft.with_group(slug);
        }
        self.blog
            .create_post(&viewer(author), draft)
            .await
            .expect("create post")
            .post
    }

    /// Publishes `count` posts, returned newest first.
    pub async fn publish_many(&self, author: &str, count: usize, group: Option<&str>) -> Vec<Post> {
        let mut posts = Vec::with_capacity(count);
        for index in 0..count {
            posts.push(self.publish(author, &format!("Тестовый пост {index}"), group).await);
        }
        posts.reverse();
        posts
    }
}

pub fn ids(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|post| post.id.as_str()).collect()
}
