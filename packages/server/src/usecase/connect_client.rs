//! UseCase: クライアント接続処理
//!
//! 接続をロビーに登録し、送信チャンネルを MessagePusher に登録してから
//! ウェルカムメッセージを送ります。この時点ではまだログインしていません。

use std::sync::Arc;

use besedka_shared::time::get_jst_timestamp;

use crate::domain::{
    Connection, ConnectionId, LobbyRepository, MessagePusher, PusherChannel, Timestamp, notice,
};

use super::error::ConnectError;

pub struct ConnectClientUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectClientUseCase {
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 接続を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Timestamp)` - 接続時刻
    /// * `Err(ConnectError)` - 同じ ConnectionId が既に登録されている
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        remote_addr: String,
        sender: PusherChannel,
    ) -> Result<Timestamp, ConnectError> {
        let connected_at = Timestamp::new(get_jst_timestamp());

        // 1. ロビーに登録（ブロードキャスト対象になる）
        self.repository
            .add_connection(Connection::new(connection_id, remote_addr, connected_at))
            .await?;

        // 2. 送信チャンネルを登録
        self.message_pusher
            .register_client(connection_id, sender)
            .await;

        // 3. ウェルカムメッセージ
        if let Err(e) = self
            .message_pusher
            .push_to(&connection_id, notice::WELCOME)
            .await
        {
            tracing::warn!("Failed to send welcome to '{}': {}", connection_id, e);
        }

        Ok(connected_at)
    }
}
