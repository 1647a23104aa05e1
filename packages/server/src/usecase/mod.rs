//! UseCase layer: one struct per protocol operation.

mod connect_client;
mod disconnect_client;
mod error;
mod get_lobby_state;
mod login;
mod send_message;

pub use connect_client::ConnectClientUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::{ConnectError, LoginError, SendMessageError};
pub use get_lobby_state::GetLobbyStateUseCase;
pub use login::LoginUseCase;
pub use send_message::SendMessageUseCase;
