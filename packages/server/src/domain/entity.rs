//! Entities.

use super::{ConnectionId, Login, MessageText, Timestamp};

/// One connected client as the lobby sees it.
///
/// `login` stays `None` until a login is claimed and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub remote_addr: String,
    pub login: Option<Login>,
    pub connected_at: Timestamp,
}

impl Connection {
    pub fn new(id: ConnectionId, remote_addr: impl Into<String>, connected_at: Timestamp) -> Self {
        Self {
            id,
            remote_addr: remote_addr.into(),
            login: None,
            connected_at,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.login.is_some()
    }
}

/// A chat message in the session log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub login: Login,
    pub text: MessageText,
    pub sent_at: Timestamp,
}

impl LogEntry {
    pub fn new(login: Login, text: MessageText, sent_at: Timestamp) -> Self {
        Self {
            login,
            text,
            sent_at,
        }
    }
}
