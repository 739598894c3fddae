//! Behavioural integration tests for [`InMemoryMessageRepository`].
//!
//! These tests exercise the in-memory repository through the public
//! `MessageRepository` contract, including concurrent use from many tasks.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

use std::collections::HashSet;
use std::sync::Arc;

use message_service::message::{
    adapters::memory::InMemoryMessageRepository,
    domain::{MessageBody, NewMessage, ServerId, UserId},
    error::RepositoryError,
    ports::repository::MessageRepository,
};
use rstest::{fixture, rstest};
use uuid::Uuid;

#[fixture]
fn repo() -> Arc<InMemoryMessageRepository> {
    Arc::new(InMemoryMessageRepository::new())
}

fn draft(user_id: UserId, server: &str, text: &str) -> NewMessage {
    NewMessage::new(
        user_id,
        ServerId::new(server).expect("valid server id"),
        MessageBody::new(text).expect("valid body"),
    )
}

/// Saves, reads back, lists and purges one user's messages while another
/// user's messages stay untouched.
#[rstest]
#[tokio::test]
async fn message_lifecycle_through_repository(repo: Arc<InMemoryMessageRepository>) {
    let alice = UserId::from_uuid(Uuid::new_v4());
    let bob = UserId::from_uuid(Uuid::new_v4());

    let greeting = repo
        .save(&draft(alice, "general", "Hello!"))
        .await
        .expect("save greeting");
    let reply = repo
        .save(&draft(bob, "general", "Hi Alice"))
        .await
        .expect("save reply");
    let follow_up = repo
        .save(&draft(alice, "random", "Anyone here?"))
        .await
        .expect("save follow-up");

    let fetched = repo.find_by_id(greeting.id()).await.expect("fetch greeting");
    assert_eq!(fetched, greeting);

    let alice_messages = repo.find_all_by_user_id(alice).await.expect("list alice");
    assert_eq!(alice_messages, vec![greeting.clone(), follow_up.clone()]);

    let deleted = repo.delete_all_by_user_id(alice).await.expect("purge alice");
    assert_eq!(deleted, 2);
    assert!(
        repo.find_all_by_user_id(alice)
            .await
            .expect("list alice after purge")
            .is_empty()
    );
    assert!(matches!(
        repo.find_by_id(follow_up.id()).await,
        Err(RepositoryError::NotFound(_))
    ));
    assert_eq!(
        repo.find_all_by_user_id(bob).await.expect("list bob"),
        vec![reply]
    );
}

/// Concurrent saves from many tasks each receive a distinct identifier and
/// none are lost.
#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_saves_keep_every_message(repo: Arc<InMemoryMessageRepository>) {
    const WRITERS: usize = 16;
    const PER_WRITER: usize = 25;
    let user = UserId::from_uuid(Uuid::new_v4());

    let handles: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let shared = Arc::clone(&repo);
            tokio::spawn(async move {
                let mut ids = Vec::with_capacity(PER_WRITER);
                for n in 0..PER_WRITER {
                    let stored = shared
                        .save(&draft(user, "general", &format!("writer {writer} message {n}")))
                        .await
                        .expect("concurrent save");
                    ids.push(stored.id());
                }
                ids
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        ids.extend(handle.await.expect("writer task completes"));
    }

    assert_eq!(ids.len(), WRITERS * PER_WRITER);
    assert_eq!(repo.len(), WRITERS * PER_WRITER);
    assert_eq!(
        repo.find_all_by_user_id(user).await.expect("listing").len(),
        WRITERS * PER_WRITER
    );
}

/// Purges running alongside saves for other users never remove the other
/// users' messages.
#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_purge_spares_other_users(repo: Arc<InMemoryMessageRepository>) {
    let doomed = UserId::from_uuid(Uuid::new_v4());
    let survivor = UserId::from_uuid(Uuid::new_v4());
    for n in 0..50 {
        repo.save(&draft(doomed, "general", &format!("old {n}")))
            .await
            .expect("seed doomed user");
    }

    let writer = {
        let shared = Arc::clone(&repo);
        tokio::spawn(async move {
            for n in 0..50 {
                shared
                    .save(&draft(survivor, "general", &format!("new {n}")))
                    .await
                    .expect("save survivor message");
            }
        })
    };
    let purge = {
        let shared = Arc::clone(&repo);
        tokio::spawn(async move { shared.delete_all_by_user_id(doomed).await })
    };

    writer.await.expect("writer completes");
    let deleted = purge
        .await
        .expect("purge completes")
        .expect("purge succeeds");

    assert_eq!(deleted, 50);
    assert_eq!(
        repo.find_all_by_user_id(survivor)
            .await
            .expect("list survivor")
            .len(),
        50
    );
    assert!(
        repo.find_all_by_user_id(doomed)
            .await
            .expect("list doomed")
            .is_empty()
    );
}
