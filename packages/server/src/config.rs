//! Server configuration.

use crate::domain::{LastEntryRule, history::DEFAULT_HISTORY_WINDOW};

pub const DEFAULT_PORT: u16 = 7410;
pub const DEFAULT_MAX_LINE_LENGTH: usize = 16384;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the chat listener binds to
    pub host: String,
    pub port: u16,
    /// Port for the read-only status API; disabled when `None`
    pub http_port: Option<u16>,
    /// Number of recent messages replayed after login
    pub history_window: usize,
    /// Longest accepted line in bytes, delimiter excluded
    pub max_line_length: usize,
    pub last_entry_rule: LastEntryRule,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            http_port: None,
            history_window: DEFAULT_HISTORY_WINDOW,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            last_entry_rule: LastEntryRule::LogLength,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn http_bind_addr(&self) -> Option<String> {
        self.http_port.map(|port| format!("{}:{}", self.host, port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:7410");
        assert_eq!(config.http_bind_addr(), None);
        assert_eq!(config.history_window, 10);
        assert_eq!(config.max_line_length, 16384);
    }

    #[test]
    fn test_http_bind_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            http_port: Some(7411),
            ..Default::default()
        };
        assert_eq!(config.http_bind_addr(), Some("127.0.0.1:7411".to_string()));
    }
}
