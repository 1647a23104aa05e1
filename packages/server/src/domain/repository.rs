//! LobbyRepository trait
//!
//! Data access interface the use cases depend on. Implementations must apply each
//! method atomically: `claim_login` in particular checks and assigns under one lock.

use async_trait::async_trait;

use super::{Connection, ConnectionId, HistoryWindow, LogEntry, Lobby, Login, RepositoryError};

#[async_trait]
pub trait LobbyRepository: Send + Sync {
    /// Snapshot of the whole lobby
    async fn get_lobby(&self) -> Lobby;

    async fn add_connection(&self, connection: Connection) -> Result<(), RepositoryError>;

    /// Idempotent; returns the removed connection if it was still registered.
    async fn remove_connection(&self, connection_id: &ConnectionId) -> Option<Connection>;

    async fn claim_login(
        &self,
        connection_id: &ConnectionId,
        login: Login,
    ) -> Result<(), RepositoryError>;

    /// Whether an active connection already holds `login`
    async fn is_login_taken(&self, login: &Login) -> bool;

    /// Ids of every active connection, in connection order
    async fn active_connection_ids(&self) -> Vec<ConnectionId>;

    async fn append_message(&self, entry: LogEntry);

    async fn recent_history(&self, limit: usize) -> HistoryWindow;

    /// Number of messages in the whole session log
    async fn log_len(&self) -> usize;
}
