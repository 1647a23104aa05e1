//! InMemory Lobby Repository 実装
//!
//! プロセス内の `Lobby` を Mutex で保護して保持します。
//! セッションログはプロセスの終了とともに失われます。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Connection, ConnectionId, HistoryWindow, Lobby, LobbyRepository, LogEntry, Login,
    RepositoryError,
};

/// インメモリ Lobby Repository 実装
pub struct InMemoryLobbyRepository {
    lobby: Arc<Mutex<Lobby>>,
}

impl InMemoryLobbyRepository {
    pub fn new(lobby: Arc<Mutex<Lobby>>) -> Self {
        Self { lobby }
    }
}

impl Default for InMemoryLobbyRepository {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(Lobby::new())))
    }
}

#[async_trait]
impl LobbyRepository for InMemoryLobbyRepository {
    async fn get_lobby(&self) -> Lobby {
        self.lobby.lock().await.clone()
    }

    async fn add_connection(&self, connection: Connection) -> Result<(), RepositoryError> {
        let mut lobby = self.lobby.lock().await;
        lobby.add_connection(connection)?;
        Ok(())
    }

    async fn remove_connection(&self, connection_id: &ConnectionId) -> Option<Connection> {
        let mut lobby = self.lobby.lock().await;
        lobby.remove_connection(connection_id)
    }

    async fn claim_login(
        &self,
        connection_id: &ConnectionId,
        login: Login,
    ) -> Result<(), RepositoryError> {
        let mut lobby = self.lobby.lock().await;
        lobby.claim_login(connection_id, login)?;
        Ok(())
    }

    async fn is_login_taken(&self, login: &Login) -> bool {
        let lobby = self.lobby.lock().await;
        lobby.is_login_taken(login)
    }

    async fn active_connection_ids(&self) -> Vec<ConnectionId> {
        let lobby = self.lobby.lock().await;
        lobby.connection_ids()
    }

    async fn append_message(&self, entry: LogEntry) {
        let mut lobby = self.lobby.lock().await;
        lobby.append_message(entry);
    }

    async fn recent_history(&self, limit: usize) -> HistoryWindow {
        let lobby = self.lobby.lock().await;
        lobby.log.recent(limit)
    }

    async fn log_len(&self) -> usize {
        let lobby = self.lobby.lock().await;
        lobby.log.len()
    }
}
