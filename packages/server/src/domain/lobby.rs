//! The lobby aggregate: who is connected and what has been said.

use super::{Connection, ConnectionId, HistoryWindow, LobbyError, LogEntry, Login};

/// Append-only log of every chat message sent since the process started.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatLog {
    entries: Vec<LogEntry>,
}

impl ChatLog {
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// The last `min(limit, len)` entries, oldest first.
    pub fn recent(&self, limit: usize) -> HistoryWindow {
        let start = self.entries.len().saturating_sub(limit);
        HistoryWindow::new(self.entries[start..].to_vec(), self.entries.len())
    }
}

/// Active connections plus the session log.
///
/// Invariant: the logins of active connections are pairwise distinct.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lobby {
    /// Active connections in the order they connected
    pub connections: Vec<Connection>,
    pub log: ChatLog,
}

impl Lobby {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_connection(&mut self, connection: Connection) -> Result<(), LobbyError> {
        if self.find(&connection.id).is_some() {
            return Err(LobbyError::DuplicateConnection(connection.id));
        }
        self.connections.push(connection);
        Ok(())
    }

    /// Remove a connection. Removing an unknown id is a no-op.
    pub fn remove_connection(&mut self, id: &ConnectionId) -> Option<Connection> {
        let index = self.connections.iter().position(|c| &c.id == id)?;
        Some(self.connections.remove(index))
    }

    pub fn is_login_taken(&self, login: &Login) -> bool {
        self.connections
            .iter()
            .any(|c| c.login.as_ref() == Some(login))
    }

    /// Assign `login` to the connection if no active connection holds it yet.
    pub fn claim_login(&mut self, id: &ConnectionId, login: Login) -> Result<(), LobbyError> {
        if self.is_login_taken(&login) {
            return Err(LobbyError::LoginTaken(login));
        }
        let connection = self
            .connections
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or(LobbyError::ConnectionNotFound(*id))?;
        if connection.is_authenticated() {
            return Err(LobbyError::AlreadyAuthenticated(*id));
        }
        connection.login = Some(login);
        Ok(())
    }

    pub fn find(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| &c.id == id)
    }

    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.connections.iter().map(|c| c.id).collect()
    }

    pub fn authenticated(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter().filter(|c| c.is_authenticated())
    }

    pub fn pending_count(&self) -> usize {
        self.connections
            .iter()
            .filter(|c| !c.is_authenticated())
            .count()
    }

    pub fn append_message(&mut self, entry: LogEntry) {
        self.log.push(entry);
    }
}
