//! UseCase error types.

use thiserror::Error;

use crate::domain::{Login, RepositoryError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConnectError {
    #[error("failed to register connection: {0}")]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoginError {
    #[error("login line must start with 'login:'")]
    InvalidFormat,

    #[error("login '{0}' is already in use")]
    LoginTaken(Login),

    #[error("failed to claim login: {0}")]
    Repository(RepositoryError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendMessageError {
    #[error("failed to broadcast message: {0}")]
    BroadcastFailed(String),
}
