use chrono::Duration;
use quire::{BlogError, CommentOutcome, Viewer};

use crate::support::{AUTHOR, READER, STRANGER, test_blog, viewer};

#[tokio::test]
async fn comments_list_oldest_first() {
    let t = test_blog().await;
    let post = t.publish(AUTHOR, "Пост", None).await;

    for (who, text) in [(READER, "Первый"), (STRANGER, "Второй"), (AUTHOR, "Третий")] {
        t.clock.advance(Duration::minutes(1));
        let outcome = t.blog.add_comment(&viewer(who), &post.id, text).await.unwrap();
        assert!(outcome.is_added());
    }

    let detail = t.blog.post_detail(&post.id).await.unwrap();
    let texts: Vec<&str> = detail.comments.iter().map(|comment| comment.text.as_str()).collect();
    assert_eq!(texts, vec!["Первый", "Второй", "Третий"]);
    assert_eq!(detail.comments[0].author, READER);
    assert_eq!(detail.comments[0].post, post.id);
}

#[tokio::test]
async fn empty_comment_is_rejected_without_error() {
    let t = test_blog().await;
    let post = t.publish(AUTHOR, "Пост", None).await;

    let outcome = t.blog.add_comment(&viewer(READER), &post.id, "   ").await.unwrap();
    let CommentOutcome::Rejected { post_id, error } = outcome else {
        panic!("expected rejection, got {outcome:?}");
    };
    assert_eq!(post_id, post.id);
    assert!(error.has_field("text"));
    assert_eq!(t.blog.store().comment_count(&post.id).unwrap(), 0);
}

#[tokio::test]
async fn anonymous_cannot_comment() {
    let t = test_blog().await;
    let post = t.publish(AUTHOR, "Пост", None).await;

    let err = t
        .blog
        .add_comment(&Viewer::Anonymous, &post.id, "Привет")
        .await
        .unwrap_err();
    assert!(matches!(err, BlogError::Unauthorized));
    assert_eq!(t.blog.store().comment_count(&post.id).unwrap(), 0);
}

#[tokio::test]
async fn comment_on_missing_post_is_not_found() {
    let t = test_blog().await;
    let err = t
        .blog
        .add_comment(&viewer(READER), "missing", "Привет")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}
