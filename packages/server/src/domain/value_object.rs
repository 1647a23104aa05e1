//! Value objects.

use std::fmt;

use uuid::Uuid;

use super::ValueObjectError;

/// Prefix every login command has to start with.
pub const LOGIN_PREFIX: &str = "login:";

/// Server-side identity of one TCP connection.
///
/// Connections exist before they have a login, so they are tracked by this id instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name claimed by a connection.
///
/// Any string is accepted, the empty one included. The only rule is liveness
/// uniqueness, which is enforced by [`Lobby`](super::Lobby).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Login(String);

impl Login {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Parse a `login:<name>` command line.
    ///
    /// Every occurrence of `login:` is removed from the line, not only the leading one,
    /// so `login:login:bob` yields `bob`.
    pub fn parse_command(line: &str) -> Result<Self, ValueObjectError> {
        if !line.starts_with(LOGIN_PREFIX) {
            return Err(ValueObjectError::MissingLoginPrefix);
        }
        Ok(Self(line.replace(LOGIN_PREFIX, "")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-text chat message as received from the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
