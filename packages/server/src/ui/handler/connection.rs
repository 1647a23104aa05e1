//! Per-connection protocol handling.
//!
//! [`ChatConnection`] is the protocol state machine. A connection starts
//! `Unauthenticated`, becomes `Authenticated` once a login is claimed, and stays there
//! until it disconnects. [`handle_socket`] drives one machine from a TCP stream.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::{
    net::{TcpStream, tcp::OwnedWriteHalf},
    sync::mpsc,
};
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec, LinesCodecError};

use besedka_shared::time::{elapsed_secs, get_jst_timestamp};

use crate::{
    domain::{ConnectionId, Login, MessageText, PusherChannel},
    ui::state::AppState,
    usecase::{ConnectError, LoginError},
};

/// How long a closing connection may keep writing queued lines
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Unauthenticated,
    Authenticated(Login),
}

/// What the transport should do after a line was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Continue,
    /// Close the connection once queued lines are written
    Close,
}

pub struct ChatConnection {
    id: ConnectionId,
    remote_addr: String,
    state: ConnectionState,
    app_state: Arc<AppState>,
}

impl ChatConnection {
    /// Register a new connection and greet it.
    ///
    /// `sender` feeds the connection's writer; every line addressed to this
    /// connection goes through it.
    pub async fn on_connect(
        app_state: Arc<AppState>,
        remote_addr: String,
        sender: PusherChannel,
    ) -> Result<Self, ConnectError> {
        let id = ConnectionId::generate();
        app_state
            .connect_client_usecase
            .execute(id, remote_addr.clone(), sender)
            .await?;
        tracing::info!("Client {} connected", remote_addr);

        Ok(Self {
            id,
            remote_addr,
            state: ConnectionState::Unauthenticated,
            app_state,
        })
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub async fn on_line(&mut self, line: String) -> LineOutcome {
        if let ConnectionState::Authenticated(login) = &self.state {
            self.send_message(login, line).await
        } else {
            self.login(&line).await
        }
    }

    async fn login(&mut self, line: &str) -> LineOutcome {
        match self.app_state.login_usecase.execute(&self.id, line).await {
            Ok(login) => {
                tracing::info!("Client {} logged in as '{}'", self.remote_addr, login);
                self.state = ConnectionState::Authenticated(login);
                LineOutcome::Continue
            }
            Err(LoginError::InvalidFormat) => {
                tracing::debug!("Client {} sent an invalid login line", self.remote_addr);
                LineOutcome::Continue
            }
            Err(LoginError::LoginTaken(login)) => {
                tracing::info!(
                    "Client {} asked for taken login '{}', closing",
                    self.remote_addr,
                    login
                );
                LineOutcome::Close
            }
            Err(e @ LoginError::Repository(_)) => {
                tracing::warn!("Login failed for client {}: {}", self.remote_addr, e);
                LineOutcome::Close
            }
        }
    }

    async fn send_message(&self, login: &Login, line: String) -> LineOutcome {
        match self
            .app_state
            .send_message_usecase
            .execute(login, MessageText::new(line))
            .await
        {
            Ok(broadcasted) => tracing::info!("{}", broadcasted),
            Err(e) => tracing::warn!("Failed to deliver message from '{}': {}", login, e),
        }
        LineOutcome::Continue
    }

    /// Deregister the connection. Safe to reach from any state.
    pub async fn on_disconnect(self) {
        let removed = self
            .app_state
            .disconnect_client_usecase
            .execute(&self.id)
            .await;
        match removed {
            Some(connection) => tracing::info!(
                "Client {} disconnected after {:.1}s",
                self.remote_addr,
                elapsed_secs(connection.connected_at.value(), get_jst_timestamp())
            ),
            None => tracing::info!("Client {} disconnected", self.remote_addr),
        }
    }
}

/// Forward queued lines to the socket until the channel closes or a write fails.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sink: FramedWrite<OwnedWriteHalf, LinesCodec>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if let Err(e) = sink.send(line).await {
                tracing::debug!("Write failed, stopping writer: {}", e);
                return;
            }
        }
        if let Err(e) = SinkExt::<String>::close(&mut sink).await {
            tracing::debug!("Failed to shut down write half: {}", e);
        }
    })
}

/// Serve one TCP connection until either side closes it.
pub async fn handle_socket(
    stream: TcpStream,
    peer: SocketAddr,
    app_state: Arc<AppState>,
    max_line_length: usize,
) {
    let (read_half, write_half) = stream.into_split();
    let mut reader = FramedRead::new(read_half, LinesCodec::new_with_max_length(max_line_length));
    let writer = FramedWrite::new(write_half, LinesCodec::new());

    let (tx, rx) = mpsc::unbounded_channel();
    let mut send_task = pusher_loop(rx, writer);

    let host = peer.ip().to_string();
    let mut connection = match ChatConnection::on_connect(app_state, host.clone(), tx).await {
        Ok(connection) => connection,
        Err(e) => {
            tracing::error!("Failed to register client {}: {}", host, e);
            send_task.abort();
            return;
        }
    };

    let mut writer_finished = false;
    loop {
        tokio::select! {
            frame = reader.next() => match frame {
                Some(Ok(line)) => {
                    if connection.on_line(line).await == LineOutcome::Close {
                        break;
                    }
                }
                Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
                    tracing::warn!("Client {} sent a line over {} bytes", host, max_line_length);
                    break;
                }
                Some(Err(LinesCodecError::Io(e))) => {
                    tracing::warn!("Read error from client {}: {}", host, e);
                    break;
                }
                None => break,
            },
            _ = &mut send_task => {
                writer_finished = true;
                break;
            }
        }
    }

    connection.on_disconnect().await;

    // The pusher dropped its sender, so the writer ends after flushing what is queued.
    if !writer_finished
        && tokio::time::timeout(WRITER_DRAIN_TIMEOUT, &mut send_task)
            .await
            .is_err()
    {
        tracing::debug!("Writer for {} did not drain in time", host);
        send_task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{HistoryFormatter, LobbyRepository},
        infrastructure::{
            message_pusher::ChannelMessagePusher, repository::InMemoryLobbyRepository,
        },
        usecase::LoginUseCase,
    };
    use rand::{SeedableRng, rngs::StdRng};

    // ========================================
    // 【何をテストするか】
    // - 状態遷移: Unauthenticated → Authenticated
    // - 不正なログイン行では状態が変わらず、接続も閉じない
    // - 使用中の名前では Close が返る
    // - 切断はどの状態からでも行える
    // ========================================

    fn create_app_state() -> (Arc<AppState>, Arc<InMemoryLobbyRepository>) {
        let repository = Arc::new(InMemoryLobbyRepository::default());
        let pusher = Arc::new(ChannelMessagePusher::default());
        let login = LoginUseCase::with_rng(
            repository.clone(),
            pusher.clone(),
            HistoryFormatter::default(),
            StdRng::seed_from_u64(0),
        );
        let state = Arc::new(AppState::with_login_usecase(
            repository.clone(),
            pusher,
            login,
        ));
        (state, repository)
    }

    async fn open(
        state: &Arc<AppState>,
        addr: &str,
    ) -> (ChatConnection, mpsc::UnboundedReceiver<String>) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let connection = ChatConnection::on_connect(state.clone(), addr.to_string(), tx)
            .await
            .unwrap();
        assert_eq!(rx.recv().await, Some("Welcome to the chat!".to_string()));
        (connection, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
        let mut lines = Vec::new();
        while let Ok(line) = rx.try_recv() {
            lines.push(line);
        }
        lines
    }

    #[tokio::test]
    async fn test_invalid_login_keeps_connection_unauthenticated() {
        // テスト項目: 不正なログイン行を何度送っても状態は変わらず、接続は継続する
        // given (前提条件):
        let (state, _repository) = create_app_state();
        let (mut conn, mut rx) = open(&state, "10.0.0.1:5000").await;

        // when (操作):
        let first = conn.on_line("hello".to_string()).await;
        let second = conn.on_line("alice".to_string()).await;

        // then (期待する結果):
        assert_eq!(first, LineOutcome::Continue);
        assert_eq!(second, LineOutcome::Continue);
        assert_eq!(conn.state(), &ConnectionState::Unauthenticated);
        assert_eq!(drain(&mut rx), vec!["Invalid login", "Invalid login"]);
    }

    #[tokio::test]
    async fn test_login_then_chat() {
        // テスト項目: ログイン後の行はチャットメッセージとして全員に届く
        // given (前提条件):
        let (state, repository) = create_app_state();
        let (mut alice, mut alice_rx) = open(&state, "10.0.0.1:5000").await;
        let (mut bob, mut bob_rx) = open(&state, "10.0.0.2:5000").await;

        // when (操作):
        alice.on_line("login:alice".to_string()).await;
        bob.on_line("login:bob".to_string()).await;
        drain(&mut alice_rx);
        drain(&mut bob_rx);
        let outcome = bob.on_line("hello".to_string()).await;

        // then (期待する結果):
        assert_eq!(outcome, LineOutcome::Continue);
        assert_eq!(bob.state(), &ConnectionState::Authenticated(Login::new("bob")));
        assert_eq!(drain(&mut alice_rx), vec!["bob: hello"]);
        assert_eq!(drain(&mut bob_rx), vec!["bob: hello"]);
        assert_eq!(repository.get_lobby().await.log.len(), 1);
    }

    #[tokio::test]
    async fn test_authenticated_login_line_is_a_message() {
        // テスト項目: ログイン後に送られた login: 行は通常のメッセージとして扱われる
        let (state, _repository) = create_app_state();
        let (mut alice, mut rx) = open(&state, "10.0.0.1:5000").await;
        alice.on_line("login:alice".to_string()).await;
        drain(&mut rx);

        alice.on_line("login:bob".to_string()).await;

        assert_eq!(alice.state(), &ConnectionState::Authenticated(Login::new("alice")));
        assert_eq!(drain(&mut rx), vec!["alice: login:bob"]);
    }

    #[tokio::test]
    async fn test_taken_login_closes_connection() {
        // テスト項目: 使用中の名前でログインすると拒否メッセージの後に Close が返る
        // given (前提条件):
        let (state, _repository) = create_app_state();
        let (mut alice, _alice_rx) = open(&state, "10.0.0.1:5000").await;
        let (mut intruder, mut intruder_rx) = open(&state, "10.0.0.2:5000").await;
        alice.on_line("login:alice".to_string()).await;
        drain(&mut intruder_rx);

        // when (操作):
        let outcome = intruder.on_line("login:alice".to_string()).await;

        // then (期待する結果):
        assert_eq!(outcome, LineOutcome::Close);
        assert_eq!(
            drain(&mut intruder_rx),
            vec!["Логин alice занят, попробуйте другой"]
        );
    }

    #[tokio::test]
    async fn test_disconnect_from_any_state() {
        // テスト項目: ログイン前でも後でも切断するとロビーから削除される
        // given (前提条件):
        let (state, repository) = create_app_state();
        let (pending, _pending_rx) = open(&state, "10.0.0.1:5000").await;
        let (mut alice, _alice_rx) = open(&state, "10.0.0.2:5000").await;
        alice.on_line("login:alice".to_string()).await;

        // when (操作):
        pending.on_disconnect().await;
        alice.on_disconnect().await;

        // then (期待する結果):
        assert!(repository.get_lobby().await.connections.is_empty());
    }

    #[tokio::test]
    async fn test_history_block_for_late_joiner() {
        // テスト項目: 後から参加したユーザーには履歴ブロックが届く
        // given (前提条件):
        let (state, _repository) = create_app_state();
        let (mut alice, _alice_rx) = open(&state, "10.0.0.1:5000").await;
        alice.on_line("login:alice".to_string()).await;
        alice.on_line("first".to_string()).await;
        alice.on_line("second".to_string()).await;
        let (mut carol, mut carol_rx) = open(&state, "10.0.0.3:5000").await;

        // when (操作):
        carol.on_line("login:carol".to_string()).await;

        // then (期待する結果):
        let lines = drain(&mut carol_rx);
        assert_eq!(
            lines,
            vec![
                "Ранее в чате:\n\
                 Началось все с alice, который написал: first\n\
                 И последнее от alice: second\n\
                 -- Вы находитесь здесь --"
                    .to_string(),
                "New user: carol".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_writer_flushes_queue_then_closes_socket() {
        // テスト項目: 送信チャンネルが閉じると writer は残りの行を書き切ってから書き込み側を閉じる
        // given (前提条件):
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let client = TcpStream::connect(addr).await.unwrap();
        let (server_side, _) = listener.accept().await.unwrap();
        let (_read_half, write_half) = server_side.into_split();
        let (tx, rx) = mpsc::unbounded_channel();
        let writer = pusher_loop(rx, FramedWrite::new(write_half, LinesCodec::new()));

        // when (操作):
        tx.send("Логин alice занят, попробуйте другой".to_string()).unwrap();
        tx.send("bye".to_string()).unwrap();
        drop(tx);
        writer.await.unwrap();

        // then (期待する結果):
        let mut reader = FramedRead::new(client, LinesCodec::new());
        assert_eq!(
            reader.next().await.unwrap().unwrap(),
            "Логин alice занят, попробуйте другой"
        );
        assert_eq!(reader.next().await.unwrap().unwrap(), "bye");
        assert!(reader.next().await.is_none());
    }
}
