//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::ClocksDto;

/// Session summary returned by `GET /api/sessions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummaryDto {
    pub id: String,
    pub status: String,
    pub white: Option<String>,
    pub black: Option<String>,
    pub created_at: String,
}

/// Session detail returned by `GET /api/sessions/{session_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDetailDto {
    pub id: String,
    pub status: String,
    /// Result description once the game has ended
    pub result: Option<String>,
    pub white: Option<String>,
    pub black: Option<String>,
    pub fen: String,
    pub clocks: ClocksDto,
    pub rematch_offer: Option<String>,
    pub created_at: String,
}
