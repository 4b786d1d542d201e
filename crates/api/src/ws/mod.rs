//! Realtime connections.
//!
//! Authenticated clients connect to `GET /api/v1/ws?token=<jwt>` and are
//! registered in the [`ConnectionDirectory`] under their user id. The
//! directory is the only way the server pushes messages to clients.

pub mod directory;
mod handler;
mod heartbeat;

pub use directory::ConnectionDirectory;
pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
