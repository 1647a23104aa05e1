//! Domain error types.

use thiserror::Error;

use super::{ConnectionId, Login};

/// Value object construction errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueObjectError {
    #[error("line does not start with the login prefix")]
    MissingLoginPrefix,
}

/// Lobby invariant violations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LobbyError {
    #[error("connection '{0}' is already registered")]
    DuplicateConnection(ConnectionId),

    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(ConnectionId),

    #[error("connection '{0}' is already logged in")]
    AlreadyAuthenticated(ConnectionId),

    #[error("login '{0}' is taken")]
    LoginTaken(Login),
}

/// Repository errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error(transparent)]
    Lobby(#[from] LobbyError),
}
