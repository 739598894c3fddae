//! Step definitions for user-deletion behaviour scenarios.

pub mod world;

mod given;
mod then;
mod when;
