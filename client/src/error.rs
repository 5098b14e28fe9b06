use crate::game::DraftError;
use shared::ErrorDetail;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server refused ({status}): {}", .detail.message)]
    Api { status: u16, detail: ErrorDetail },

    #[error("network error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed packet: {0}")]
    Codec(#[from] bincode::Error),

    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    #[error("subscription rejected: {0}")]
    Rejected(String),

    #[error("no answer from the notification server")]
    NoAnswer,

    #[error("could not parse '{input}': {reason}")]
    Parse { input: String, reason: String },

    #[error(transparent)]
    Draft(#[from] DraftError),
}

impl ClientError {
    pub fn parse(input: &str, reason: impl Into<String>) -> Self {
        ClientError::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// Machine-readable code of a server-side refusal
    pub fn api_code(&self) -> Option<&str> {
        match self {
            ClientError::Api { detail, .. } => Some(&detail.code),
            _ => None,
        }
    }
}
