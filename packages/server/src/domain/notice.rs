//! Lines the server writes to clients.

use super::{Login, MessageText};

pub const WELCOME: &str = "Welcome to the chat!";
pub const INVALID_LOGIN: &str = "Invalid login";

pub fn login_taken(login: &Login) -> String {
    format!("Логин {login} занят, попробуйте другой")
}

pub fn new_user(login: &Login) -> String {
    format!("New user: {login}")
}

pub fn chat_line(login: &Login, text: &MessageText) -> String {
    format!("{login}: {text}")
}
