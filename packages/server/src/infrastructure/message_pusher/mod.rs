//! MessagePusher implementations.
//!
//! - `channel`: one unbounded mpsc channel per client, drained by that client's writer task

pub mod channel;

pub use channel::ChannelMessagePusher;
