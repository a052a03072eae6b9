//! Error types for the game client and the playback controller

use thiserror::Error;

/// Errors returned by a game client
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClientError {
    /// Request failed or the response could not be decoded
    #[error("Network error: {message}")]
    Network { message: String },

    /// Backend rejected the new-game parameters
    #[error("Invalid game parameters: {message}")]
    Validation { message: String },

    /// Backend refused to advance (e.g. no game in progress)
    #[error("Backend error: {message}")]
    Application { message: String },
}

impl ClientError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn application(message: impl Into<String>) -> Self {
        Self::Application {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        Self::network(error.to_string())
    }
}

/// Errors surfaced by the playback controller
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlaybackError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("No game in progress")]
    NoGame,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_messages() {
        assert_eq!(
            ClientError::validation("n_wolves must be less than n_players").to_string(),
            "Invalid game parameters: n_wolves must be less than n_players"
        );
        assert_eq!(
            PlaybackError::from(ClientError::application("No game in progress")).to_string(),
            "Backend error: No game in progress"
        );
    }
}
