mod common;

use inkpress_core::db::{open_db, open_db_with_config};
use inkpress_core::query::UpdateUserParams;
use inkpress_core::store::UpdateUserTxParams;
use inkpress_core::{OpContext, Page, Queries, SqliteStore, Store, StoreConfig};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

fn seeded_db(dir: &Path) -> (PathBuf, i64, i64) {
    let path = dir.join("inkpress.sqlite3");
    let conn = open_db(&path).unwrap();
    let q = Queries::standalone(&conn);
    let alice = common::user(&q, "alice");
    let bob = common::user(&q, "bob");
    (path, alice.id, bob.id)
}

#[test]
fn parallel_post_creation_on_separate_connections_all_commit() {
    let dir = tempfile::tempdir().unwrap();
    let (path, alice_id, bob_id) = seeded_db(dir.path());

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let path = path.clone();
            thread::spawn(move || {
                let conn = open_db(&path).unwrap();
                let store = SqliteStore::new(&conn);
                let ctx = OpContext::new();
                let owner = store.queries(&ctx).get_user(alice_id).unwrap();
                for n in 0..10 {
                    store
                        .create_post_tx(
                            &ctx,
                            &common::post_params(&owner, &format!("/w{worker}/{n}")),
                            &[alice_id, bob_id],
                        )
                        .unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(common::count(&conn, "posts"), 40);
    assert_eq!(common::count(&conn, "user_posts"), 80);
}

#[test]
fn opposite_row_order_updates_do_not_deadlock() {
    let dir = tempfile::tempdir().unwrap();
    let (path, alice_id, bob_id) = seeded_db(dir.path());

    let spawn = |first: i64, second: i64, tag: &'static str| {
        let path = path.clone();
        thread::spawn(move || {
            let conn = open_db(&path).unwrap();
            let store = SqliteStore::new(&conn);
            let ctx = OpContext::new();
            for round in 0..20 {
                store
                    .exec_tx(&ctx, "touch_users", |q| {
                        for id in [first, second] {
                            let mut next = UpdateUserParams::from(&q.get_user(id)?);
                            next.full_name = format!("{tag} {round}");
                            q.update_user(&next)?;
                        }
                        Ok(())
                    })
                    .unwrap();
            }
        })
    };

    let forward = spawn(alice_id, bob_id, "forward");
    let backward = spawn(bob_id, alice_id, "backward");
    forward.join().unwrap();
    backward.join().unwrap();

    let conn = open_db(&path).unwrap();
    let q = Queries::standalone(&conn);
    let alice = q.get_user(alice_id).unwrap();
    let bob = q.get_user(bob_id).unwrap();
    // Each transaction wrote both rows, so both carry the last writer's tag.
    assert_eq!(alice.full_name, bob.full_name);
}

#[test]
fn lock_conflict_without_busy_wait_is_transient() {
    let dir = tempfile::tempdir().unwrap();
    let (path, _, _) = seeded_db(dir.path());

    let holder = open_db(&path).unwrap();
    holder.execute_batch("BEGIN IMMEDIATE;").unwrap();

    let config = StoreConfig {
        db_source: path.to_string_lossy().into_owned(),
        busy_timeout: Duration::ZERO,
        ..StoreConfig::default()
    };
    let conn = open_db_with_config(&config).unwrap();
    let store = SqliteStore::new(&conn);

    let err = store.delete_post_tx(&OpContext::new(), 1).unwrap_err();
    assert!(err.is_transient(), "unexpected error: {err}");

    holder.execute_batch("COMMIT;").unwrap();
    store.delete_post_tx(&OpContext::new(), 1).unwrap();
}

#[test]
fn concurrent_renames_leave_posts_matching_final_username() {
    let dir = tempfile::tempdir().unwrap();
    let (path, alice_id, _) = seeded_db(dir.path());
    {
        let conn = open_db(&path).unwrap();
        let store = SqliteStore::new(&conn);
        let ctx = OpContext::new();
        let alice = store.queries(&ctx).get_user(alice_id).unwrap();
        for n in 0..5 {
            store
                .create_post_tx(&ctx, &common::post_params(&alice, &format!("/a/{n}")), &[alice_id])
                .unwrap();
        }
    }

    let renamers: Vec<_> = ["ally", "alison"]
        .into_iter()
        .map(|prefix| {
            let path = path.clone();
            thread::spawn(move || {
                let conn = open_db(&path).unwrap();
                let store = SqliteStore::new(&conn);
                let ctx = OpContext::new();
                for n in 0..10 {
                    let current = store.queries(&ctx).get_user(alice_id).unwrap();
                    let mut next = UpdateUserParams::from(&current);
                    next.username = format!("{prefix}{n}");
                    store
                        .update_user_tx(
                            &ctx,
                            &UpdateUserTxParams {
                                user: next,
                                check_uniqueness: true,
                            },
                        )
                        .unwrap();
                }
            })
        })
        .collect();
    for renamer in renamers {
        renamer.join().unwrap();
    }

    let conn = open_db(&path).unwrap();
    let q = Queries::standalone(&conn);
    let alice = q.get_user(alice_id).unwrap();
    let posts = q.list_posts_by_user(alice_id, Page::default()).unwrap();
    assert_eq!(posts.len(), 5);
    assert!(posts.iter().all(|post| post.username == alice.username));
}
