//! Shared application state.

use std::sync::Arc;

use crate::{
    domain::{HistoryFormatter, LobbyRepository, MessagePusher},
    usecase::{
        ConnectClientUseCase, DisconnectClientUseCase, GetLobbyStateUseCase, LoginUseCase,
        SendMessageUseCase,
    },
};

/// Use cases shared by every connection task and the status API
pub struct AppState {
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    pub login_usecase: Arc<LoginUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    pub get_lobby_state_usecase: Arc<GetLobbyStateUseCase>,
}

impl AppState {
    /// Wire every use case to the same repository and pusher.
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        formatter: HistoryFormatter,
    ) -> Self {
        Self::with_login_usecase(
            repository.clone(),
            message_pusher.clone(),
            LoginUseCase::new(repository, message_pusher, formatter),
        )
    }

    /// Like [`AppState::new`], with a prepared login use case (e.g. a seeded one).
    pub fn with_login_usecase(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        login_usecase: LoginUseCase,
    ) -> Self {
        Self {
            connect_client_usecase: Arc::new(ConnectClientUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            login_usecase: Arc::new(login_usecase),
            send_message_usecase: Arc::new(SendMessageUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            disconnect_client_usecase: Arc::new(DisconnectClientUseCase::new(
                repository.clone(),
                message_pusher,
            )),
            get_lobby_state_usecase: Arc::new(GetLobbyStateUseCase::new(repository)),
        }
    }
}
