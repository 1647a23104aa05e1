//! TCP chat server and status API.

mod handler;
mod server;
mod signal;
pub mod state;

pub use handler::connection::{ChatConnection, ConnectionState, LineOutcome};
pub use server::{Server, status_router};
pub use signal::shutdown_signal;
