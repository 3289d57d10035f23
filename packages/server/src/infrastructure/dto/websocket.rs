//! WebSocket message DTOs.
//!
//! Every frame is a JSON object tagged by its `type` field, e.g.
//! `{"type":"join-session","session_id":"..."}`.

use serde::{Deserialize, Serialize};

use crate::domain::Role;

/// Messages sent from a client to the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    CreateSession,
    JoinSession {
        session_id: String,
    },
    SubmitMove {
        session_id: String,
        #[serde(rename = "move")]
        mv: MoveDto,
    },
    RequestRematch {
        session_id: String,
    },
    AcceptRematch {
        session_id: String,
    },
}

/// A move as sent by a client.
///
/// Either a `{from, to, promotion}` object or a UCI/SAN string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MoveDto {
    Coordinates {
        from: String,
        to: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        promotion: Option<String>,
    },
    Notation(String),
}

/// Remaining time per side, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClocksDto {
    pub white: f64,
    pub black: f64,
}

/// Messages sent from the server to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    Connected { client_id: String },
    SessionCreated { session_id: String, role: Role },
    SessionJoined { session_id: String, role: Role },
    SessionStarted { session_id: String },
    GameState { fen: String, clocks: ClocksDto },
    InvalidMove { fen: String },
    GameEnded { result: String },
    RematchOffered { session_id: String },
    NewSessionStarted { session_id: String, role: Role },
    JoinError { reason: String },
}
