/// Redis key construction for every record and index the blog stores.
#[derive(Debug, Clone)]
pub struct KeyContext<'a> {
    pub prefix: &'a str,
}

impl<'a> KeyContext<'a> {
    pub fn new(prefix: &'a str) -> Self {
        Self { prefix }
    }

    pub fn user(&self, username: &str) -> String {
        format!("{}:users:{}", self.prefix, username)
    }

    pub fn group(&self, slug: &str) -> String {
        format!("{}:groups:{}", self.prefix, slug)
    }

    pub fn post(&self, post_id: &str) -> String {
        format!("{}:posts:{}", self.prefix, post_id)
    }

    pub fn comment(&self, comment_id: &str) -> String {
        format!("{}:comments:{}", self.prefix, comment_id)
    }

    /// Set of every group slug.
    pub fn group_index(&self) -> String {
        format!("{}:idx:groups", self.prefix)
    }

    /// Every post, scored by publication time in epoch milliseconds.
    pub fn post_index(&self) -> String {
        format!("{}:idx:posts", self.prefix)
    }

    pub fn group_posts(&self, slug: &str) -> String {
        format!("{}:idx:group_posts:{}", self.prefix, slug)
    }

    pub fn author_posts(&self, username: &str) -> String {
        format!("{}:idx:author_posts:{}", self.prefix, username)
    }

    /// Prefix used by scripts that build author index keys themselves.
    pub fn author_posts_prefix(&self) -> String {
        format!("{}:idx:author_posts:", self.prefix)
    }

    pub fn post_comments(&self, post_id: &str) -> String {
        format!("{}:idx:post_comments:{}", self.prefix, post_id)
    }

    /// Authors followed by `username`, scored by follow time.
    pub fn following(&self, username: &str) -> String {
        format!("{}:rel:following:{}", self.prefix, username)
    }

    /// Users following `username`, scored by follow time.
    pub fn followers(&self, username: &str) -> String {
        format!("{}:rel:followers:{}", self.prefix, username)
    }

    /// Scratch key a script may write and delete within one invocation.
    pub fn scratch(&self, tag: &str) -> String {
        format!("{}:tmp:{}", self.prefix, tag)
    }

    /// Match pattern covering every key under this prefix.
    pub fn pattern(&self) -> String {
        format!("{}:*", self.prefix)
    }
}
