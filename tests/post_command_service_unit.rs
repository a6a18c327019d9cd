mod support;

use std::sync::Arc;

use tanzaku_core::application::commands::posts::{
    CreatePostCommand, DeletePostCommand, PostCommandService, UpdatePostCommand,
};
use tanzaku_core::application::error::ApplicationError;
use tanzaku_core::domain::reaction::ReactionKind;
use tanzaku_core::domain::slugs::SlugService;
use tanzaku_core::domain::user::Role;
use tanzaku_core::infrastructure::util::DefaultSlugGenerator;

use support::{FixedClock, InMemoryStore, authed};

fn service(store: &InMemoryStore) -> PostCommandService {
    let slugs = Arc::new(SlugService::new(
        Arc::new(store.post_repo()),
        Arc::new(DefaultSlugGenerator::default()),
    ));
    PostCommandService::new(
        Arc::new(store.post_repo()),
        Arc::new(store.post_repo()),
        Arc::new(store.category_repo()),
        slugs,
        Arc::new(FixedClock::default()),
    )
}

#[tokio::test]
async fn create_post_generates_slug_and_sets_author() {
    let store = InMemoryStore::new();
    let author = store.seed_user("alice", Role::Author);
    let category = store.seed_category("General", "general");
    let svc = service(&store);

    let post = svc
        .create_post(
            &authed(&author),
            CreatePostCommand {
                title: "My First Post".into(),
                text: "hello there".into(),
                category_id: category.id.into(),
            },
        )
        .await
        .expect("create failed");

    assert_eq!(post.slug, "my-first-post");
    assert_eq!(post.author_id, Some(author.id.into()));
    assert_eq!(post.category.id, i64::from(category.id));
    assert_eq!(post.likes, 0);
    assert_eq!(post.dislikes, 0);
}

#[tokio::test]
async fn create_post_with_unknown_category_is_a_validation_error() {
    let store = InMemoryStore::new();
    let author = store.seed_user("alice", Role::Author);
    let svc = service(&store);

    let err = svc
        .create_post(
            &authed(&author),
            CreatePostCommand {
                title: "My First Post".into(),
                text: "hello there".into(),
                category_id: 999,
            },
        )
        .await
        .expect_err("expected validation error");
    assert!(matches!(err, ApplicationError::Validation(_)));
}

#[tokio::test]
async fn update_changes_content_but_never_the_slug() {
    let store = InMemoryStore::new();
    let author = store.seed_user("alice", Role::Author);
    let category = store.seed_category("General", "general");
    let svc = service(&store);
    let actor = authed(&author);

    let created = svc
        .create_post(
            &actor,
            CreatePostCommand {
                title: "My First Post".into(),
                text: "hello there".into(),
                category_id: category.id.into(),
            },
        )
        .await
        .expect("create failed");

    let updated = svc
        .update_post(
            &actor,
            UpdatePostCommand {
                slug: created.slug.clone(),
                title: "A Completely Different Title".into(),
                text: "rewritten".into(),
                category_id: category.id.into(),
            },
        )
        .await
        .expect("update failed");

    assert_eq!(updated.slug, created.slug);
    assert_eq!(updated.title, "A Completely Different Title");
    assert_eq!(updated.text, "rewritten");
}

#[tokio::test]
async fn non_owner_cannot_update_but_admin_can() {
    let store = InMemoryStore::new();
    let owner = store.seed_user("alice", Role::Author);
    let other = store.seed_user("mallory", Role::Author);
    let admin = store.seed_user("admin", Role::Admin);
    let category = store.seed_category("General", "general");
    store.seed_post("First", "first", &category, Some(owner.id));
    let svc = service(&store);

    let command = |title: &str| UpdatePostCommand {
        slug: "first".into(),
        title: title.into(),
        text: "edited".into(),
        category_id: category.id.into(),
    };

    let err = svc
        .update_post(&authed(&other), command("Hijacked"))
        .await
        .expect_err("expected forbidden");
    assert!(matches!(err, ApplicationError::Forbidden(_)));

    svc.update_post(&authed(&admin), command("Moderated"))
        .await
        .expect("admin update failed");
}

#[tokio::test]
async fn deleting_post_cascades_to_comments_and_reactions() {
    let store = InMemoryStore::new();
    let owner = store.seed_user("alice", Role::Author);
    let reader = store.seed_user("bobby", Role::Author);
    let category = store.seed_category("General", "general");
    let post = store.seed_post("First", "first", &category, Some(owner.id));
    store.seed_comment(&post, Some(reader.id), None, "nice");
    store.seed_reaction(&post, reader.id, ReactionKind::Like);
    let svc = service(&store);

    svc.delete_post(
        &authed(&owner),
        DeletePostCommand {
            slug: "first".into(),
        },
    )
    .await
    .expect("delete failed");

    assert_eq!(store.post_rows(), 0);
    assert_eq!(store.comment_rows(), 0);
    assert_eq!(store.reaction_rows(), 0);
}

#[tokio::test]
async fn non_owner_cannot_delete() {
    let store = InMemoryStore::new();
    let owner = store.seed_user("alice", Role::Author);
    let other = store.seed_user("mallory", Role::Author);
    let category = store.seed_category("General", "general");
    store.seed_post("First", "first", &category, Some(owner.id));
    let svc = service(&store);

    let err = svc
        .delete_post(
            &authed(&other),
            DeletePostCommand {
                slug: "first".into(),
            },
        )
        .await
        .expect_err("expected forbidden");
    assert!(matches!(err, ApplicationError::Forbidden(_)));
    assert_eq!(store.post_rows(), 1);
}

#[tokio::test]
async fn user_deletion_nulls_authorship_and_drops_their_reactions() {
    let store = InMemoryStore::new();
    let author = store.seed_user("alice", Role::Author);
    let category = store.seed_category("General", "general");
    let post = store.seed_post("First", "first", &category, Some(author.id));
    store.seed_comment(&post, Some(author.id), None, "self comment");
    store.seed_reaction(&post, author.id, ReactionKind::Like);

    store.delete_user(author.id);

    let post = store.find_post(post.id).unwrap();
    assert_eq!(post.author_id, None);
    assert_eq!(store.comment_rows(), 1);
    assert_eq!(store.reaction_rows(), 0);
}
