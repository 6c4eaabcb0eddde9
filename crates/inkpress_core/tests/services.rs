mod common;

use inkpress_core::db::open_db_in_memory;
use inkpress_core::query::CreateUserParams;
use inkpress_core::{
    Conflict, ErrorKind, MediaService, NewPost, OpContext, PostPatch, PostService, Queries,
    SqliteStore, StoreError, TaxonomyService, UserPatch, UserService,
};

#[test]
fn post_service_creates_reads_updates_and_deletes() {
    let conn = open_db_in_memory().unwrap();
    let q = Queries::standalone(&conn);
    let alice = common::user(&q, "alice");
    let bob = common::user(&q, "bob");
    let tech = common::taxonomy(&q, "Tech");
    let rust = common::taxonomy(&q, "Rust");
    let cover = common::media(&q, &alice, "cover.png");
    let service = PostService::new(SqliteStore::new(&conn));
    let ctx = OpContext::new();

    let created = service
        .create_post(
            &ctx,
            NewPost {
                title: "Hello".to_string(),
                content: "World".to_string(),
                url: "/hello".to_string(),
                author_ids: vec![bob.id, alice.id],
                taxonomy_ids: vec![tech.id],
                media_ids: vec![cover.id],
                ..NewPost::default()
            },
        )
        .unwrap();
    assert_eq!(created.post.user_id, bob.id);
    assert_eq!(created.post.username, "bob");

    let updated = service
        .update_post(
            &ctx,
            created.post.id,
            PostPatch {
                title: Some("Hello again".to_string()),
                taxonomy_ids: Some(vec![rust.id]),
                media_ids: Some(Vec::new()),
                ..PostPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.title, "Hello again");
    assert_eq!(updated.content, "World");

    let detail = service.get_post(&ctx, created.post.id).unwrap();
    assert_eq!(detail.authors.len(), 2);
    assert_eq!(detail.taxonomies, vec![rust]);
    assert!(detail.media.is_empty());

    service.delete_post(&ctx, created.post.id).unwrap();
    assert!(service
        .get_post(&ctx, created.post.id)
        .unwrap_err()
        .is_not_found());
    assert!(service
        .delete_post(&ctx, created.post.id)
        .unwrap_err()
        .is_not_found());
}

#[test]
fn post_update_with_bad_link_changes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let q = Queries::standalone(&conn);
    let alice = common::user(&q, "alice");
    let tech = common::taxonomy(&q, "Tech");
    let service = PostService::new(SqliteStore::new(&conn));
    let ctx = OpContext::new();
    let created = service
        .create_post(
            &ctx,
            NewPost {
                url: "/old".to_string(),
                author_ids: vec![alice.id],
                taxonomy_ids: vec![tech.id],
                ..NewPost::default()
            },
        )
        .unwrap();

    let err = service
        .update_post(
            &ctx,
            created.post.id,
            PostPatch {
                url: Some("/new".to_string()),
                taxonomy_ids: Some(vec![999]),
                ..PostPatch::default()
            },
        )
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(q.get_post(created.post.id).unwrap(), created.post);
    assert_eq!(q.list_taxonomies_for_post(created.post.id).unwrap(), vec![tech]);
}

#[test]
fn post_service_requires_an_existing_author() {
    let conn = open_db_in_memory().unwrap();
    let service = PostService::new(SqliteStore::new(&conn));
    let ctx = OpContext::new();

    let err = service.create_post(&ctx, NewPost::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = service
        .create_post(
            &ctx,
            NewPost {
                url: "/x".to_string(),
                author_ids: vec![12],
                ..NewPost::default()
            },
        )
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn user_service_rejects_taken_identity_and_propagates_rename() {
    let conn = open_db_in_memory().unwrap();
    let q = Queries::standalone(&conn);
    let store = SqliteStore::new(&conn);
    let users = UserService::new(store);
    let posts = PostService::new(store);
    let ctx = OpContext::new();

    let alice = users
        .create_user(
            &ctx,
            &CreateUserParams {
                username: "alice".to_string(),
                full_name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                hashed_password: "h".to_string(),
                role: "user".to_string(),
            },
        )
        .unwrap();
    let dup = users
        .create_user(
            &ctx,
            &CreateUserParams {
                username: "alice".to_string(),
                full_name: "Other".to_string(),
                email: "other@example.com".to_string(),
                hashed_password: "h".to_string(),
                role: "user".to_string(),
            },
        )
        .unwrap_err();
    assert!(matches!(dup, StoreError::Conflict(Conflict::Username(_))));

    let bob = common::user(&q, "bob");
    let err = users
        .update_user(
            &ctx,
            alice.id,
            UserPatch {
                email: Some(bob.email.clone()),
                ..UserPatch::default()
            },
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let post = posts
        .create_post(
            &ctx,
            NewPost {
                url: "/a".to_string(),
                author_ids: vec![alice.id],
                ..NewPost::default()
            },
        )
        .unwrap()
        .post;
    users
        .update_user(
            &ctx,
            alice.id,
            UserPatch {
                username: Some("alicia".to_string()),
                ..UserPatch::default()
            },
        )
        .unwrap();
    assert_eq!(q.get_post(post.id).unwrap().username, "alicia");
}

#[test]
fn user_service_delete_checks_existence_and_transfers() {
    let conn = open_db_in_memory().unwrap();
    let q = Queries::standalone(&conn);
    let alice = common::user(&q, "alice");
    let bob = common::user(&q, "bob");
    let store = SqliteStore::new(&conn);
    let posts = PostService::new(store);
    let users = UserService::new(store);
    let ctx = OpContext::new();
    let post = posts
        .create_post(
            &ctx,
            NewPost {
                url: "/a".to_string(),
                author_ids: vec![alice.id],
                ..NewPost::default()
            },
        )
        .unwrap()
        .post;

    assert!(users.delete_user(&ctx, 999, None).unwrap_err().is_not_found());

    let moved = users.delete_user(&ctx, alice.id, Some(bob.id)).unwrap();
    assert_eq!(moved.map(|transfer| transfer.posts), Some(1));
    let post = q.get_post(post.id).unwrap();
    assert_eq!((post.user_id, post.username.as_str()), (bob.id, "bob"));

    assert_eq!(users.delete_user(&ctx, bob.id, None).unwrap(), None);
    assert_eq!(common::count(&conn, "posts"), 0);
}

#[test]
fn media_service_distinguishes_missing_from_forbidden() {
    let conn = open_db_in_memory().unwrap();
    let q = Queries::standalone(&conn);
    let alice = common::user(&q, "alice");
    let bob = common::user(&q, "bob");
    let cover = common::media(&q, &alice, "cover.png");
    let service = MediaService::new(SqliteStore::new(&conn));
    let ctx = OpContext::new();

    assert_eq!(
        service.delete_media(&ctx, 404, alice.id).unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        service.delete_media(&ctx, cover.id, bob.id).unwrap_err().kind(),
        ErrorKind::Forbidden
    );
    service.delete_media(&ctx, cover.id, alice.id).unwrap();
}

#[test]
fn taxonomy_service_checks_names() {
    let conn = open_db_in_memory().unwrap();
    let q = Queries::standalone(&conn);
    let alice = common::user(&q, "alice");
    let post = q.create_post(&common::post_params(&alice, "/p")).unwrap();
    let service = TaxonomyService::new(SqliteStore::new(&conn));
    let ctx = OpContext::new();

    let tech = service.create_taxonomy(&ctx, "  Tech ", "").unwrap();
    assert_eq!(tech.name, "Tech");
    assert!(matches!(
        service.create_taxonomy(&ctx, "Tech", "again").unwrap_err(),
        StoreError::Conflict(Conflict::TaxonomyName(_))
    ));
    assert_eq!(
        service.create_taxonomy(&ctx, "   ", "").unwrap_err().kind(),
        ErrorKind::InvalidInput
    );

    let linked = service.link_to_post(&ctx, post.id, "Tech", "").unwrap();
    assert_eq!(linked.taxonomy.id, tech.id);

    service.delete_taxonomy(&ctx, tech.id).unwrap();
    assert!(service
        .delete_taxonomy(&ctx, tech.id)
        .unwrap_err()
        .is_not_found());
}
