//! Diesel schema for message persistence.

diesel::table! {
    /// Message rows keyed by identifier. `user_id` is a plain, unindexed
    /// column, so lookups by user are filtering scans.
    messages (id) {
        /// Repository-assigned message identifier.
        id -> Uuid,
        /// Owning user identifier.
        user_id -> Uuid,
        /// Server (channel) the message was posted to.
        server_id -> Text,
        /// Message body.
        message -> Text,
    }
}
