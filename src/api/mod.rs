//! HTTP surface forwarding requests to the message repository.
//!
//! Routes live under `/api/v1/message`:
//!
//! | Method | Path | Operation |
//! |---|---|---|
//! | GET | `/ping` | liveness |
//! | POST | `/` | save a message |
//! | GET | `/{id}` | fetch a message |
//! | GET | `/user/{id}` | list a user's messages |
//! | DELETE | `/user/{id}` | purge a user's messages |

pub mod envelope;
pub mod handlers;
pub mod routes;

pub use envelope::{ApiResponse, Reply};
pub use handlers::SaveMessageRequest;
pub use routes::{API_PREFIX, PING_PATH, router};
