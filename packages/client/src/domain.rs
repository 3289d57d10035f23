//! Domain logic for client-side operations.
//!
//! This module contains pure functions and state that implement client behaviour
//! without side effects, making them easy to test.

use sente_server::{domain::Role, infrastructure::dto::websocket::ServerMessage};

use crate::error::ClientError;

/// Check if the client should exit immediately based on the error type.
///
/// Rejected identities never succeed on retry, so they end the client.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(
        error,
        ClientError::DuplicateClientId(_) | ClientError::InvalidClientId(_)
    )
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    // Don't reconnect if the error requires immediate exit
    if should_exit_immediately(error) {
        return false;
    }

    // Don't reconnect if we've exhausted all attempts
    current_attempt < max_attempts
}

/// What the client knows about itself and its current game.
///
/// Survives reconnects so the same identity re-attaches to its session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameTracker {
    /// Identity confirmed by the server
    pub client_id: Option<String>,
    /// Session the commands refer to
    pub session_id: Option<String>,
    /// Our side in that session
    pub role: Option<Role>,
    /// Last position received
    pub fen: Option<String>,
    /// A rematch offer is waiting for our answer
    pub pending_rematch: bool,
}

impl GameTracker {
    pub fn new(client_id: Option<String>) -> Self {
        Self {
            client_id,
            ..Self::default()
        }
    }

    /// Update the tracked state from a server frame.
    pub fn apply(&mut self, message: &ServerMessage) {
        match message {
            ServerMessage::Connected { client_id } => {
                self.client_id = Some(client_id.clone());
            }
            ServerMessage::SessionCreated { session_id, role }
            | ServerMessage::SessionJoined { session_id, role }
            | ServerMessage::NewSessionStarted { session_id, role } => {
                self.session_id = Some(session_id.clone());
                self.role = Some(*role);
                self.fen = None;
                self.pending_rematch = false;
            }
            ServerMessage::GameState { fen, .. } | ServerMessage::InvalidMove { fen } => {
                self.fen = Some(fen.clone());
            }
            ServerMessage::RematchOffered { session_id } => {
                if self.session_id.as_deref() == Some(session_id.as_str()) {
                    self.pending_rematch = true;
                }
            }
            ServerMessage::SessionStarted { .. }
            | ServerMessage::GameEnded { .. }
            | ServerMessage::JoinError { .. } => {}
        }
    }

    /// Side whose perspective the board is drawn from
    pub fn perspective(&self) -> Role {
        self.role.unwrap_or(Role::White)
    }
}
