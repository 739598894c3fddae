//! Given steps for user-deletion BDD scenarios.

use super::world::{UserDeletionWorld, run_async};
use eyre::WrapErr;
use message_service::message::{
    domain::{MessageBody, NewMessage, ServerId},
    ports::repository::MessageRepository,
};
use rstest_bdd_macros::given;

#[given(r#"user "{name}" has {count:usize} stored messages"#)]
fn user_has_messages(
    world: &mut UserDeletionWorld,
    name: String,
    count: usize,
) -> Result<(), eyre::Report> {
    let user_id = world.user(&name);
    for n in 0..count {
        let draft = NewMessage::new(
            user_id,
            ServerId::new("general").wrap_err("server id")?,
            MessageBody::new(format!("{name} says {n}")).wrap_err("message body")?,
        );
        run_async(world.repository.save(&draft)).wrap_err("seed message")?;
    }
    Ok(())
}

#[given(r#"a deletion event for user "{name}" in {form} form"#)]
fn deletion_event_for_user(
    world: &mut UserDeletionWorld,
    name: String,
    form: String,
) -> Result<(), eyre::Report> {
    let user_id = world.user(&name);
    let body = match form.as_str() {
        "json" => format!(r#"{{"id": "{user_id}"}}"#),
        "plain-text" => format!("Deletion request for user: {user_id}"),
        "bare" => user_id.to_string(),
        other => return Err(eyre::eyre!("unknown event form '{other}'")),
    };
    world.queue.push(body.into_bytes());
    Ok(())
}

#[given("an undecodable deletion event")]
fn undecodable_event(world: &mut UserDeletionWorld) {
    world.queue.push(b"user deleted, id unknown".to_vec());
}
