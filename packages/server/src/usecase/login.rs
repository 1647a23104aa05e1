//! UseCase: ログイン処理
//!
//! ## 流れ
//!
//! 1. `login:` で始まらない行には `Invalid login` を返す（接続は維持）
//! 2. 使用中の名前なら拒否メッセージを返す（呼び出し側が接続を閉じる）
//! 3. 成功したら履歴ブロックを本人にだけ送り、`New user: {login}` を全員に送る
//!
//! 一意性の確認と名前の割り当ては Repository の `claim_login` で一度に行うので、
//! 同じ名前での同時ログインでも成功するのは一つだけです。

use std::sync::{Arc, Mutex, PoisonError};

use rand::{SeedableRng, rngs::StdRng};

use crate::domain::{
    ConnectionId, HistoryFormatter, LobbyError, LobbyRepository, Login, MessagePusher,
    RepositoryError, notice,
};

use super::error::LoginError;

pub struct LoginUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    formatter: HistoryFormatter,
    /// 履歴テンプレートの選択に使う乱数源
    rng: Mutex<StdRng>,
}

impl LoginUseCase {
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        formatter: HistoryFormatter,
    ) -> Self {
        Self::with_rng(repository, message_pusher, formatter, StdRng::from_entropy())
    }

    /// 乱数源を指定して作成（テストでシードを固定する場合）
    pub fn with_rng(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        formatter: HistoryFormatter,
        rng: StdRng,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            formatter,
            rng: Mutex::new(rng),
        }
    }

    /// ログインを実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - まだログインしていない接続
    /// * `line` - クライアントから受信した行
    ///
    /// # Returns
    ///
    /// * `Ok(Login)` - ログイン成功
    /// * `Err(LoginError::InvalidFormat)` - 再試行可能
    /// * `Err(LoginError::LoginTaken)` - 接続を閉じるべき
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        line: &str,
    ) -> Result<Login, LoginError> {
        let Ok(login) = Login::parse_command(line) else {
            self.reply(connection_id, notice::INVALID_LOGIN).await;
            return Err(LoginError::InvalidFormat);
        };

        match self
            .repository
            .claim_login(connection_id, login.clone())
            .await
        {
            Ok(()) => {}
            Err(RepositoryError::Lobby(LobbyError::LoginTaken(_))) => {
                self.reply(connection_id, &notice::login_taken(&login)).await;
                return Err(LoginError::LoginTaken(login));
            }
            Err(e) => return Err(LoginError::Repository(e)),
        }

        let history = self.render_history().await;
        self.reply(connection_id, &history).await;

        let targets = self.repository.active_connection_ids().await;
        // 名前は既に確定しているので、通知の失敗はログに残すだけにする
        if let Err(e) = self
            .message_pusher
            .broadcast(targets, &notice::new_user(&login))
            .await
        {
            tracing::warn!("Failed to announce new user '{}': {}", login, e);
        }

        Ok(login)
    }

    async fn render_history(&self) -> String {
        let window = self
            .repository
            .recent_history(self.formatter.window_size())
            .await;
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let history = self.formatter.render(&window, &mut *rng);
        drop(rng);
        history
    }

    async fn reply(&self, connection_id: &ConnectionId, content: &str) {
        if let Err(e) = self.message_pusher.push_to(connection_id, content).await {
            tracing::warn!("Failed to reply to '{}': {}", connection_id, e);
        }
    }
}
