//! Error types for talking to a game server

use std::net::AddrParseError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The name is taken, possibly by this very player
    #[error("{0}")]
    AlreadyRegistered(String),

    #[error("{0}")]
    NotRegistered(String),

    #[error("no response from server within {0:?}")]
    Timeout(Duration),

    #[error("server failed to handle request: {0}")]
    Rejected(String),

    #[error("unexpected reply from server: {0}")]
    UnexpectedReply(String),

    #[error("connection to server closed")]
    Disconnected,

    #[error("invalid server address: {0}")]
    InvalidAddress(#[from] AddrParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Codec(#[from] bincode::Error),

    #[error("could not join the game: {0}")]
    JoinFailed(#[source] Box<ClientError>),

    #[error("could not leave the game: {0}")]
    LeaveFailed(#[source] Box<ClientError>),
}
