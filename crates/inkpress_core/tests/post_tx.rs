mod common;

use common::count;
use inkpress_core::db::open_db_in_memory;
use inkpress_core::query::UpdateUserParams;
use inkpress_core::store::{CreatePostTxParams, UpdateUserTxParams};
use inkpress_core::{ErrorKind, OpContext, Queries, RowRef, SqliteStore, Store, StoreError};
use std::collections::HashSet;

#[test]
fn owner_is_primary_author_and_co_authors_follow_list_position() {
    let conn = open_db_in_memory().unwrap();
    let q = Queries::standalone(&conn);
    let alice = common::user(&q, "alice");
    let bob = common::user(&q, "bob");
    let carol = common::user(&q, "carol");
    let store = SqliteStore::new(&conn);

    let created = store
        .create_post_tx(
            &OpContext::new(),
            &common::post_params(&alice, "/p/1"),
            &[bob.id, alice.id, carol.id, bob.id],
        )
        .unwrap();

    let orders: Vec<_> = created
        .user_posts
        .iter()
        .map(|link| (link.user_id, link.sort_order))
        .collect();
    assert_eq!(orders, vec![(alice.id, 0), (bob.id, 1), (carol.id, 3)]);

    let stored = q.list_user_posts_by_post(created.post.id).unwrap();
    let primaries: Vec<_> = stored.iter().filter(|link| link.is_primary()).collect();
    assert_eq!(primaries.len(), 1);
    assert_eq!(primaries[0].user_id, alice.id);
    let authors: HashSet<_> = stored.iter().map(|link| link.user_id).collect();
    assert_eq!(authors, HashSet::from([alice.id, bob.id, carol.id]));
}

#[test]
fn empty_author_list_is_rejected_before_any_write() {
    let conn = open_db_in_memory().unwrap();
    let q = Queries::standalone(&conn);
    let alice = common::user(&q, "alice");
    let store = SqliteStore::new(&conn);

    let err = store
        .create_post_tx(&OpContext::new(), &common::post_params(&alice, "/p"), &[])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(count(&conn, "posts"), 0);
}

#[test]
fn all_links_are_created_in_one_operation() {
    let conn = open_db_in_memory().unwrap();
    let q = Queries::standalone(&conn);
    let alice = common::user(&q, "alice");
    let tech = common::taxonomy(&q, "Tech");
    let cover = common::media(&q, &alice, "cover.png");
    let inline = common::media(&q, &alice, "inline.png");
    let legacy = common::image(&q, &alice, "old.jpg");
    let store = SqliteStore::new(&conn);

    let arg = CreatePostTxParams::new(common::post_params(&alice, "/p"), vec![alice.id])
        .with_taxonomies(vec![tech.id])
        .with_media(vec![cover.id, inline.id])
        .with_images(vec![legacy.id]);
    let created = store
        .create_post_with_links_tx(&OpContext::new(), &arg)
        .unwrap();

    assert_eq!(created.post_taxonomies.len(), 1);
    let media_orders: Vec<_> = created
        .post_media
        .iter()
        .map(|link| (link.media_id, link.sort_order))
        .collect();
    assert_eq!(media_orders, vec![(cover.id, 0), (inline.id, 1)]);
    assert_eq!(created.post_images[0].image_id, legacy.id);
    assert_eq!(
        q.list_taxonomies_for_post(created.post.id).unwrap()[0].name,
        "Tech"
    );
}

#[test]
fn missing_taxonomy_rolls_back_post_and_authorship() {
    let conn = open_db_in_memory().unwrap();
    let q = Queries::standalone(&conn);
    let alice = common::user(&q, "alice");
    let bob = common::user(&q, "bob");
    let tech = common::taxonomy(&q, "Tech");
    let store = SqliteStore::new(&conn);

    let err = store
        .create_post_with_taxonomies_tx(
            &OpContext::new(),
            &common::post_params(&alice, "/p"),
            &[alice.id, bob.id],
            &[tech.id, 404],
        )
        .unwrap_err();

    assert!(matches!(err, StoreError::NotFound(RowRef::Taxonomy(404))));
    assert_eq!(err.to_string(), "taxonomy not found: 404");
    assert_eq!(count(&conn, "posts"), 0);
    assert_eq!(count(&conn, "user_posts"), 0);
    assert_eq!(count(&conn, "posts_taxonomies"), 0);
}

#[test]
fn missing_media_names_the_id_and_leaves_no_trace() {
    let conn = open_db_in_memory().unwrap();
    let q = Queries::standalone(&conn);
    let alice = common::user(&q, "alice");
    let cover = common::media(&q, &alice, "cover.png");
    let store = SqliteStore::new(&conn);

    let err = store
        .create_post_with_media_tx(
            &OpContext::new(),
            &common::post_params(&alice, "/p"),
            &[alice.id],
            &[cover.id, 42],
        )
        .unwrap_err();

    assert_eq!(err.to_string(), "media not found: 42");
    assert_eq!(count(&conn, "posts"), 0);
    assert_eq!(count(&conn, "post_media"), 0);
}

#[test]
fn unknown_co_author_fails_the_whole_creation() {
    let conn = open_db_in_memory().unwrap();
    let q = Queries::standalone(&conn);
    let alice = common::user(&q, "alice");
    let store = SqliteStore::new(&conn);

    let err = store
        .create_post_tx(
            &OpContext::new(),
            &common::post_params(&alice, "/p"),
            &[alice.id, 999],
        )
        .unwrap_err();

    assert!(matches!(err, StoreError::ForeignKey { table: "user_posts" }));
    assert_eq!(count(&conn, "posts"), 0);
}

#[test]
fn delete_post_removes_every_link_first() {
    let conn = open_db_in_memory().unwrap();
    let q = Queries::standalone(&conn);
    let alice = common::user(&q, "alice");
    let bob = common::user(&q, "bob");
    let tech = common::taxonomy(&q, "Tech");
    let cover = common::media(&q, &alice, "cover.png");
    let legacy = common::image(&q, &alice, "old.jpg");
    let store = SqliteStore::new(&conn);
    let ctx = OpContext::new();

    let arg = CreatePostTxParams::new(common::post_params(&alice, "/p"), vec![alice.id, bob.id])
        .with_taxonomies(vec![tech.id])
        .with_media(vec![cover.id])
        .with_images(vec![legacy.id]);
    let created = store.create_post_with_links_tx(&ctx, &arg).unwrap();

    store.delete_post_tx(&ctx, created.post.id).unwrap();

    assert!(q.get_post(created.post.id).unwrap_err().is_not_found());
    for table in ["user_posts", "post_media", "post_images", "posts_taxonomies"] {
        assert_eq!(count(&conn, table), 0, "{table} still has rows");
    }
    assert!(q.get_media(cover.id).is_ok());
    assert!(q.get_taxonomy(tech.id).is_ok());
}

#[test]
fn deleting_post_row_before_its_links_violates_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    let q = Queries::standalone(&conn);
    let alice = common::user(&q, "alice");
    let store = SqliteStore::new(&conn);
    let created = store
        .create_post_tx(
            &OpContext::new(),
            &common::post_params(&alice, "/p"),
            &[alice.id],
        )
        .unwrap();

    let err = q.delete_post(created.post.id).unwrap_err();
    assert!(matches!(err, StoreError::ForeignKey { table: "posts" }));
    assert!(q.get_post(created.post.id).is_ok());
}

#[test]
fn replacing_media_links_is_a_full_replace() {
    let conn = open_db_in_memory().unwrap();
    let q = Queries::standalone(&conn);
    let alice = common::user(&q, "alice");
    let a = common::media(&q, &alice, "a.png");
    let b = common::media(&q, &alice, "b.png");
    let c = common::media(&q, &alice, "c.png");
    let store = SqliteStore::new(&conn);
    let ctx = OpContext::new();
    let post = store
        .create_post_with_media_tx(
            &ctx,
            &common::post_params(&alice, "/p"),
            &[alice.id],
            &[a.id, b.id],
        )
        .unwrap()
        .post;

    let links = store.update_post_media_tx(&ctx, post.id, &[c.id, a.id]).unwrap();

    let stored: Vec<_> = q
        .list_post_media_by_post(post.id)
        .unwrap()
        .into_iter()
        .map(|link| (link.media_id, link.sort_order))
        .collect();
    assert_eq!(stored, vec![(c.id, 0), (a.id, 1)]);
    assert_eq!(links.len(), 2);
}

#[test]
fn failed_link_replacement_keeps_previous_links() {
    let conn = open_db_in_memory().unwrap();
    let q = Queries::standalone(&conn);
    let alice = common::user(&q, "alice");
    let tech = common::taxonomy(&q, "Tech");
    let store = SqliteStore::new(&conn);
    let ctx = OpContext::new();
    let post = store
        .create_post_with_taxonomies_tx(
            &ctx,
            &common::post_params(&alice, "/p"),
            &[alice.id],
            &[tech.id],
        )
        .unwrap()
        .post;

    let err = store
        .update_post_taxonomies_tx(&ctx, post.id, &[77])
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(q.list_taxonomies_for_post(post.id).unwrap(), vec![tech]);
}

#[test]
fn link_replacement_on_missing_post_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::new(&conn);

    let err = store
        .update_post_images_tx(&OpContext::new(), 5, &[])
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(RowRef::Post(5))));
}

#[test]
fn new_post_takes_owner_username_current_at_commit() {
    let conn = open_db_in_memory().unwrap();
    let q = Queries::standalone(&conn);
    let alice = common::user(&q, "alice");
    let store = SqliteStore::new(&conn);
    let ctx = OpContext::new();
    let stale = common::post_params(&alice, "/p");

    let mut renamed = UpdateUserParams::from(&alice);
    renamed.username = "ally".to_string();
    store
        .update_user_tx(
            &ctx,
            &UpdateUserTxParams {
                user: renamed,
                check_uniqueness: true,
            },
        )
        .unwrap();

    let post = store.create_post_tx(&ctx, &stale, &[alice.id]).unwrap().post;
    assert_eq!(post.username, "ally");
    assert_eq!(q.get_post(post.id).unwrap().username, "ally");
}

#[test]
fn missing_owner_is_not_found_and_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let q = Queries::standalone(&conn);
    let alice = common::user(&q, "alice");
    let store = SqliteStore::new(&conn);
    let mut params = common::post_params(&alice, "/p");
    params.user_id = 404;

    let err = store
        .create_post_tx(&OpContext::new(), &params, &[404])
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(RowRef::User(404))));
    assert_eq!(count(&conn, "posts"), 0);
}

#[test]
fn repeated_link_ids_are_linked_once() {
    let conn = open_db_in_memory().unwrap();
    let q = Queries::standalone(&conn);
    let alice = common::user(&q, "alice");
    let tech = common::taxonomy(&q, "Tech");
    let a = common::media(&q, &alice, "a.png");
    let b = common::media(&q, &alice, "b.png");
    let store = SqliteStore::new(&conn);
    let ctx = OpContext::new();
    let post = store
        .create_post_with_media_tx(
            &ctx,
            &common::post_params(&alice, "/p"),
            &[alice.id],
            &[a.id, a.id, b.id],
        )
        .unwrap();
    let orders: Vec<_> = post
        .post_media
        .iter()
        .map(|link| (link.media_id, link.sort_order))
        .collect();
    assert_eq!(orders, vec![(a.id, 0), (b.id, 1)]);

    let links = store
        .update_post_taxonomies_tx(&ctx, post.post.id, &[tech.id, tech.id])
        .unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(count(&conn, "posts_taxonomies"), 1);
}
