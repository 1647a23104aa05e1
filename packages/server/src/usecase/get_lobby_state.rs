//! UseCase: ロビー状態の取得（ステータス API 用）

use std::sync::Arc;

use crate::domain::{Lobby, LobbyRepository};

pub struct GetLobbyStateUseCase {
    repository: Arc<dyn LobbyRepository>,
}

impl GetLobbyStateUseCase {
    pub fn new(repository: Arc<dyn LobbyRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> Lobby {
        self.repository.get_lobby().await
    }
}
