//! Integration tests for [`PostgresMessageRepository`] using embedded `PostgreSQL`.
//!
//! Every test connects through [`PostgresMessageRepository::connect`], so the
//! keyspace customiser and schema provisioning run against a real server. Each
//! test works in its own keyspace, dropped when the test finishes.
//!
//! Uses `pg-embed-setup-unpriv` for embedded `PostgreSQL` lifecycle management.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]
#![expect(
    clippy::print_stderr,
    reason = "Test cleanup warnings are informational"
)]

use std::collections::HashSet;
use std::sync::Arc;

use diesel::connection::SimpleConnection;
use message_service::message::{
    adapters::postgres::PostgresMessageRepository,
    domain::{MessageBody, MessageId, NewMessage, ServerId, UserId},
    error::RepositoryError,
    ports::repository::MessageRepository,
};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;
use tokio::runtime::Runtime;
use uuid::Uuid;

/// Database hosting every test keyspace.
const DATABASE: &str = "postgres";

/// Body text rejected by the trigger installed in [`refuse_deleting_poison`].
const POISON: &str = "poison";

/// Creates a tokio runtime for async operations in tests.
fn test_runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create test runtime")
}

/// A repository bound to a throwaway keyspace, dropped with the guard.
struct TestKeyspace {
    url: String,
    keyspace: String,
    repo: PostgresMessageRepository,
}

impl TestKeyspace {
    fn execute(&self, sql: &str) {
        let mut conn = self.repo.pool().get().expect("pooled connection");
        conn.batch_execute(sql).expect("test SQL succeeds");
    }
}

impl Drop for TestKeyspace {
    fn drop(&mut self) {
        let Ok(mut conn) = self.repo.pool().get() else {
            eprintln!("Warning: no connection to drop keyspace {}", self.keyspace);
            return;
        };
        if let Err(e) =
            conn.batch_execute(&format!("DROP SCHEMA IF EXISTS {} CASCADE", self.keyspace))
        {
            eprintln!("Warning: failed to drop keyspace {}: {e}", self.keyspace);
        }
    }
}

fn test_keyspace(cluster: &TestCluster, rt: &Runtime) -> TestKeyspace {
    let url = cluster.connection().database_url(DATABASE);
    let keyspace = format!("test_{}", Uuid::new_v4().simple());
    let repo = rt
        .block_on(PostgresMessageRepository::connect(&url, &keyspace))
        .expect("connect to embedded cluster");
    TestKeyspace {
        url,
        keyspace,
        repo,
    }
}

/// Makes deleting any row whose body is [`POISON`] fail.
fn refuse_deleting_poison(space: &TestKeyspace) {
    let ks = &space.keyspace;
    space.execute(&format!(
        "CREATE FUNCTION {ks}.refuse_poison() RETURNS trigger LANGUAGE plpgsql AS $$
         BEGIN
             IF OLD.message = '{POISON}' THEN
                 RAISE EXCEPTION 'refusing to delete poison row';
             END IF;
             RETURN OLD;
         END
         $$;
         CREATE TRIGGER refuse_poison BEFORE DELETE ON {ks}.messages
             FOR EACH ROW EXECUTE FUNCTION {ks}.refuse_poison();"
    ));
}

fn draft(user_id: UserId, text: &str) -> NewMessage {
    NewMessage::new(
        user_id,
        ServerId::new("general").expect("valid server id"),
        MessageBody::new(text).expect("valid body"),
    )
}

fn new_user() -> UserId {
    UserId::from_uuid(Uuid::new_v4())
}

// ============================================================================
// Basic operations
// ============================================================================

#[rstest]
fn save_then_find_returns_equal_message(shared_test_cluster: &'static TestCluster) {
    let rt = test_runtime();
    let space = test_keyspace(shared_test_cluster, &rt);
    let message = draft(new_user(), "Hello!");

    let stored = rt.block_on(space.repo.save(&message)).expect("save");
    let found = rt
        .block_on(space.repo.find_by_id(stored.id()))
        .expect("find");

    assert!(stored.matches(&message));
    assert_eq!(found, stored);
}

#[rstest]
fn find_by_unknown_id_is_not_found(shared_test_cluster: &'static TestCluster) {
    let rt = test_runtime();
    let space = test_keyspace(shared_test_cluster, &rt);
    let missing = MessageId::generate(&DefaultClock);

    let result = rt.block_on(space.repo.find_by_id(missing));

    assert!(matches!(result, Err(RepositoryError::NotFound(id)) if id == missing));
}

#[rstest]
fn keyspaces_isolate_their_messages(shared_test_cluster: &'static TestCluster) {
    let rt = test_runtime();
    let first = test_keyspace(shared_test_cluster, &rt);
    let second = test_keyspace(shared_test_cluster, &rt);
    let user = new_user();

    let stored = rt
        .block_on(first.repo.save(&draft(user, "only here")))
        .expect("save");

    assert!(
        rt.block_on(second.repo.find_all_by_user_id(user))
            .expect("list second")
            .is_empty()
    );
    assert!(matches!(
        rt.block_on(second.repo.find_by_id(stored.id())),
        Err(RepositoryError::NotFound(_))
    ));
    assert_eq!(
        rt.block_on(first.repo.find_all_by_user_id(user))
            .expect("list first"),
        vec![stored]
    );
}

#[rstest]
fn connect_is_idempotent_for_existing_keyspace(shared_test_cluster: &'static TestCluster) {
    let rt = test_runtime();
    let space = test_keyspace(shared_test_cluster, &rt);
    let stored = rt
        .block_on(space.repo.save(&draft(new_user(), "persisted")))
        .expect("save");

    let reopened = rt
        .block_on(PostgresMessageRepository::connect(
            &space.url,
            &space.keyspace,
        ))
        .expect("reconnect");

    assert_eq!(
        rt.block_on(reopened.find_by_id(stored.id())).expect("find"),
        stored
    );
}

#[rstest]
fn concurrent_saves_receive_distinct_ids(shared_test_cluster: &'static TestCluster) {
    let rt = test_runtime();
    let space = test_keyspace(shared_test_cluster, &rt);
    let repo = Arc::new(space.repo.clone());
    let user = new_user();

    let ids = rt.block_on(async {
        let handles: Vec<_> = (0..20)
            .map(|n| {
                let shared = Arc::clone(&repo);
                tokio::spawn(async move {
                    shared
                        .save(&draft(user, &format!("message {n}")))
                        .await
                        .expect("concurrent save")
                        .id()
                })
            })
            .collect();
        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.expect("task completes"));
        }
        ids
    });

    assert_eq!(ids.len(), 20);
    assert_eq!(
        rt.block_on(repo.find_all_by_user_id(user))
            .expect("listing")
            .len(),
        20
    );
}

// ============================================================================
// Bulk deletion
// ============================================================================

#[rstest]
fn delete_all_by_user_id_purges_only_that_user(shared_test_cluster: &'static TestCluster) {
    let rt = test_runtime();
    let space = test_keyspace(shared_test_cluster, &rt);
    let alice = new_user();
    let bob = new_user();
    for n in 0..3 {
        rt.block_on(space.repo.save(&draft(alice, &format!("alice {n}"))))
            .expect("save alice");
    }
    let kept = rt
        .block_on(space.repo.save(&draft(bob, "bob")))
        .expect("save bob");

    let deleted = rt
        .block_on(space.repo.delete_all_by_user_id(alice))
        .expect("purge");
    let again = rt
        .block_on(space.repo.delete_all_by_user_id(alice))
        .expect("purge again");

    assert_eq!((deleted, again), (3, 0));
    assert!(
        rt.block_on(space.repo.find_all_by_user_id(alice))
            .expect("list alice")
            .is_empty()
    );
    assert_eq!(
        rt.block_on(space.repo.find_all_by_user_id(bob))
            .expect("list bob"),
        vec![kept]
    );
}

#[rstest]
fn interrupted_purge_reports_progress_and_retry_completes(
    shared_test_cluster: &'static TestCluster,
) {
    let rt = test_runtime();
    let space = test_keyspace(shared_test_cluster, &rt);
    let user = new_user();
    for text in ["first", POISON, "last"] {
        rt.block_on(space.repo.save(&draft(user, text)))
            .expect("save");
    }
    refuse_deleting_poison(&space);

    let result = rt.block_on(space.repo.delete_all_by_user_id(user));

    let Err(RepositoryError::PartialDelete {
        user_id,
        deleted,
        total,
        ..
    }) = &result
    else {
        panic!("expected a partial delete, got {result:?}");
    };
    let (deleted, total) = (*deleted, *total);
    assert_eq!(*user_id, user);
    assert_eq!(total, 3);
    assert!(deleted < total);
    let remaining = rt
        .block_on(space.repo.find_all_by_user_id(user))
        .expect("list after failure");
    assert_eq!(remaining.len(), total - deleted);
    assert!(remaining.iter().any(|m| m.body().as_str() == POISON));

    space.execute(&format!(
        "DROP TRIGGER refuse_poison ON {}.messages",
        space.keyspace
    ));
    let retried = rt
        .block_on(space.repo.delete_all_by_user_id(user))
        .expect("retry completes");

    assert_eq!(retried, remaining.len());
    assert!(
        rt.block_on(space.repo.find_all_by_user_id(user))
            .expect("list after retry")
            .is_empty()
    );
}
