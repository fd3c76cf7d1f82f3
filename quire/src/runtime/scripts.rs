use redis::Script;
use std::sync::LazyLock;

pub const CREATE_USER_SCRIPT_BODY: &str = include_str!("../../lua/create_user.lua");
pub const CREATE_GROUP_SCRIPT_BODY: &str = include_str!("../../lua/create_group.lua");
pub const CREATE_POST_SCRIPT_BODY: &str = include_str!("../../lua/create_post.lua");
pub const UPDATE_POST_SCRIPT_BODY: &str = include_str!("../../lua/update_post.lua");
pub const DELETE_POST_SCRIPT_BODY: &str = include_str!("../../lua/delete_post.lua");
pub const ADD_COMMENT_SCRIPT_BODY: &str = include_str!("../../lua/add_comment.lua");
pub const FOLLOW_SCRIPT_BODY: &str = include_str!("../../lua/follow.lua");
pub const UNFOLLOW_SCRIPT_BODY: &str = include_str!("../../lua/unfollow.lua");
pub const FOLLOWED_POSTS_SCRIPT_BODY: &str = include_str!("../../lua/followed_posts.lua");

pub static CREATE_USER_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(CREATE_USER_SCRIPT_BODY));
pub static CREATE_GROUP_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(CREATE_GROUP_SCRIPT_BODY));
pub static CREATE_POST_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(CREATE_POST_SCRIPT_BODY));
pub static UPDATE_POST_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(UPDATE_POST_SCRIPT_BODY));
pub static DELETE_POST_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(DELETE_POST_SCRIPT_BODY));
pub static ADD_COMMENT_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(ADD_COMMENT_SCRIPT_BODY));
pub static FOLLOW_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(FOLLOW_SCRIPT_BODY));
pub static UNFOLLOW_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(UNFOLLOW_SCRIPT_BODY));
pub static FOLLOWED_POSTS_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(FOLLOWED_POSTS_SCRIPT_BODY));
