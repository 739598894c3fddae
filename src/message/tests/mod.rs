//! Unit tests for the message module.
//!
//! Tests are organised by concern, covering happy paths, error cases,
//! and edge cases for all public APIs.


use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

/// Clock frozen at a single instant.
pub(super) struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub(super) fn at_unix(seconds: i64) -> Self {
        Self(
            Utc.timestamp_opt(seconds, 0)
                .single()
                .expect("valid timestamp"),
        )
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}
