//! UseCase: クライアント切断処理
//!
//! ログイン前後どちらの状態からでも呼ばれます。二度呼んでも問題ありません。

use std::sync::Arc;

use crate::domain::{Connection, ConnectionId, LobbyRepository, MessagePusher};

pub struct DisconnectClientUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectClientUseCase {
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// 削除された接続。既に削除済みなら `None`
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<Connection> {
        let removed = self.repository.remove_connection(connection_id).await;
        // 送信チャンネルを破棄すると writer タスクは残りを書き切って終了する
        self.message_pusher.unregister_client(connection_id).await;
        removed
    }
}
