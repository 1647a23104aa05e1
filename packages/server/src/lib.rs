//! Line-based TCP chat server.
//!
//! Clients log in with `login:<name>`, then every line they send is broadcast to all
//! connected clients. Newly logged-in clients receive a short replay of recent messages.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
