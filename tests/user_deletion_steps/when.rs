//! When steps for user-deletion BDD scenarios.

use super::world::{UserDeletionWorld, run_async};
use rstest_bdd_macros::when;

#[when("the deletion consumer drains the queue")]
fn drain_queue(world: &mut UserDeletionWorld) {
    let summary = run_async(world.consumer.run(&mut world.queue));
    world.summary = Some(summary);
}
