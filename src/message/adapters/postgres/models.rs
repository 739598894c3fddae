//! Diesel row models for message persistence.

use super::schema::messages;
use diesel::prelude::*;
use uuid::Uuid;

/// Query result row for message records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageRow {
    /// Message identifier.
    pub id: Uuid,
    /// Owning user identifier.
    pub user_id: Uuid,
    /// Server identifier.
    pub server_id: String,
    /// Message body.
    pub message: String,
}

/// Insert model for message records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messages)]
pub struct NewMessageRow<'a> {
    /// Message identifier.
    pub id: Uuid,
    /// Owning user identifier.
    pub user_id: Uuid,
    /// Server identifier.
    pub server_id: &'a str,
    /// Message body.
    pub message: &'a str,
}
