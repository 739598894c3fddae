//! Then steps for user-deletion BDD scenarios.

use super::world::{UserDeletionWorld, run_async};
use message_service::message::ports::repository::MessageRepository;
use rstest_bdd_macros::then;

#[then(r#"user "{name}" has {count:usize} stored messages"#)]
fn user_message_count(
    world: &mut UserDeletionWorld,
    name: String,
    count: usize,
) -> Result<(), eyre::Report> {
    let user_id = world.user(&name);
    let stored = run_async(world.repository.find_all_by_user_id(user_id))
        .map_err(|err| eyre::eyre!("listing failed: {err}"))?;
    if stored.len() != count {
        return Err(eyre::eyre!(
            "expected {count} messages for {name}, found {}",
            stored.len()
        ));
    }
    Ok(())
}

#[then("the consumer counted {purged:usize} purged and {rejected:usize} rejected events")]
fn consumer_counts(
    world: &UserDeletionWorld,
    purged: usize,
    rejected: usize,
) -> Result<(), eyre::Report> {
    let summary = world
        .summary
        .ok_or_else(|| eyre::eyre!("the queue has not been drained"))?;
    if (summary.purged, summary.rejected) != (purged, rejected) {
        return Err(eyre::eyre!(
            "expected {purged} purged and {rejected} rejected, got {summary:?}"
        ));
    }
    Ok(())
}
