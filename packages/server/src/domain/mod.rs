//! Domain layer: value objects, entities, the lobby aggregate and the interfaces
//! the outer layers implement.

mod entity;
mod error;
pub mod history;
mod lobby;
mod message_pusher;
pub mod notice;
mod repository;
mod value_object;

pub use entity::{Connection, LogEntry};
pub use error::{LobbyError, RepositoryError, ValueObjectError};
pub use history::{HistoryEntry, HistoryFormatter, HistoryWindow, LastEntryRule};
pub use lobby::{ChatLog, Lobby};
pub use message_pusher::{MessagePushError, MessagePusher, PusherChannel};
pub use repository::LobbyRepository;
pub use value_object::{ConnectionId, LOGIN_PREFIX, Login, MessageText, Timestamp};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
