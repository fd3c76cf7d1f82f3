use log::debug;
use serde::Serialize;

use crate::{
    blog::Blog,
    cache::ListingCache,
    errors::{BlogError, EntityKind},
    pagination::{Page, PageRequest},
    store::{FollowCounts, PostScope, PostStore},
    types::{Comment, Group, Post, User, Viewer},
};

/// Newest posts across the whole blog.
#[derive(Debug, Clone, Serialize)]
pub struct IndexPage {
    pub page: Page<Post>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupPage {
    pub group: Group,
    pub page: Page<Post>,
}

/// An author's posts as seen by a particular viewer.
#[derive(Debug, Clone, Serialize)]
pub struct ProfilePage {
    pub author: User,
    pub page: Page<Post>,
    pub is_following: bool,
    pub follow_counts: FollowCounts,
}

impl ProfilePage {
    pub fn post_count(&self) -> u64 {
        self.page.count
    }
}

/// Posts by the authors a viewer follows.
#[derive(Debug, Clone, Serialize)]
pub struct FollowPage {
    pub page: Page<Post>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub post: Post,
    pub comments: Vec<Comment>,
    pub author_post_count: u64,
}

impl PostDetail {
    /// Heading shown above the post.
    pub fn title(&self) -> String {
        format!("Post {}", self.post.label())
    }
}

impl<S: PostStore> Blog<S> {
    async fn paginate(&self, scope: &PostScope, request: PageRequest) -> Result<Page<Post>, BlogError> {
        let count = self.store.count_posts(scope).await?;
        let window = self.paginator.resolve(count, request);
        let items = self.store.list_posts(scope, window.offset, window.limit).await?;
        debug!(
            "listed {} of {count} posts for {scope:?} (page {}/{})",
            items.len(),
            window.number,
            window.num_pages
        );
        Ok(Page::new(items, window, count, self.paginator.per_page()))
    }

    pub async fn list_all_posts(&self, request: PageRequest) -> Result<IndexPage, BlogError> {
        let key = ListingCache::<Page<Post>>::index_key(request.get());
        if let Some(page) = self.index_cache.as_ref().and_then(|cache| cache.get(&key)) {
            return Ok(IndexPage { page });
        }

        let page = self.paginate(&PostScope::All, request).await?;
        if let Some(cache) = &self.index_cache {
            // out-of-range requests clamp, so file the page under the number actually served
            cache.insert(ListingCache::<Page<Post>>::index_key(page.number), page.clone());
        }
        Ok(IndexPage { page })
    }

    pub async fn list_posts_by_group(&self, slug: &str, request: PageRequest) -> Result<GroupPage, BlogError> {
        let group = self
            .store
            .find_group(slug)
            .await?
            .ok_or_else(|| BlogError::not_found(EntityKind::Group, slug))?;
        let page = self.paginate(&PostScope::Group(group.slug.clone()), request).await?;
        Ok(GroupPage { group, page })
    }

    pub async fn list_posts_by_author(
        &self,
        viewer: &Viewer,
        username: &str,
        request: PageRequest,
    ) -> Result<ProfilePage, BlogError> {
        let author = self
            .store
            .find_user(username)
            .await?
            .ok_or_else(|| BlogError::not_found(EntityKind::User, username))?;
        let page = self.paginate(&PostScope::Author(author.username.clone()), request).await?;

        let is_following = match viewer.username() {
            Some(viewer) if viewer != author.username => self.store.is_following(viewer, &author.username).await?,
            _ => false,
        };
        let follow_counts = self.store.follow_counts(&author.username).await?;

        Ok(ProfilePage {
            author,
            page,
            is_following,
            follow_counts,
        })
    }

    pub async fn list_followed_posts(&self, viewer: &Viewer, request: PageRequest) -> Result<FollowPage, BlogError> {
        let username = viewer.require()?;
        let page = self.paginate(&PostScope::FollowedBy(username.to_string()), request).await?;
        Ok(FollowPage { page })
    }

    pub async fn post_detail(&self, post_id: &str) -> Result<PostDetail, BlogError> {
        let post = self.require_post(post_id).await?;
        let comments = self.store.list_comments(&post.id).await?;
        let author_post_count = self.store.count_posts(&PostScope::Author(post.author.clone())).await?;
        Ok(PostDetail {
            post,
            comments,
            author_post_count,
        })
    }
}
