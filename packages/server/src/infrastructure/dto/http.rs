//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use besedka_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::Lobby;

/// Logged-in participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantDto {
    pub login: String,
    pub remote_addr: String,
    /// RFC 3339, JST
    pub connected_at: String,
}

/// Lobby summary for `GET /api/lobby`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyDto {
    pub participants: Vec<ParticipantDto>,
    /// Connections that have not logged in yet
    pub pending_connections: usize,
    pub message_count: usize,
}

impl From<&Lobby> for LobbyDto {
    fn from(lobby: &Lobby) -> Self {
        let participants = lobby
            .authenticated()
            .filter_map(|c| {
                c.login.as_ref().map(|login| ParticipantDto {
                    login: login.as_str().to_string(),
                    remote_addr: c.remote_addr.clone(),
                    connected_at: timestamp_to_jst_rfc3339(c.connected_at.value()),
                })
            })
            .collect();

        Self {
            participants,
            pending_connections: lobby.pending_count(),
            message_count: lobby.log.len(),
        }
    }
}
