//! UseCase: メッセージ送信処理
//!
//! ログイン済みの接続から届いた行をセッションログに追加し、
//! `{login}: {text}` として送信者を含む全員にブロードキャストします。

use std::sync::Arc;

use besedka_shared::time::get_jst_timestamp;

use crate::domain::{
    LobbyRepository, LogEntry, Login, MessagePusher, MessageText, Timestamp, notice,
};

use super::error::SendMessageError;

pub struct SendMessageUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl SendMessageUseCase {
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - ブロードキャストした行
    /// * `Err(SendMessageError)` - ブロードキャスト失敗（ログへの追加は済んでいる）
    pub async fn execute(
        &self,
        login: &Login,
        text: MessageText,
    ) -> Result<String, SendMessageError> {
        let line = notice::chat_line(login, &text);

        // 1. セッションログに追加
        self.repository
            .append_message(LogEntry::new(
                login.clone(),
                text,
                Timestamp::new(get_jst_timestamp()),
            ))
            .await;

        // 2. 送信者を含む全員にブロードキャスト
        let targets = self.repository.active_connection_ids().await;
        self.message_pusher
            .broadcast(targets, &line)
            .await
            .map_err(|e| SendMessageError::BroadcastFailed(e.to_string()))?;

        Ok(line)
    }
}
