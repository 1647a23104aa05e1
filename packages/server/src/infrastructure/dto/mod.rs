//! Data Transfer Objects for the status HTTP API.

pub mod http;
