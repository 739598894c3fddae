//! Application services for the message subsystem.
//!
//! Services orchestrate domain operations and coordinate between ports.

mod deletion;

pub use deletion::{
    ConsumerSummary, DeletionConsumer, DeletionEvent, DeletionEventError, DeletionOutcome,
};
