//! Utilities shared by the Besedka binaries.

pub mod logger;
pub mod time;
