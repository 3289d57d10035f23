//! Conversion logic between DTOs and domain models.

use sente_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::{
    Clocks, MoveDescriptor, Notification, Promotion, Role, Session, SessionStatus, Square,
    ValueObjectError,
};
use crate::infrastructure::dto::{
    http::{SessionDetailDto, SessionSummaryDto},
    websocket::{ClocksDto, MoveDto, ServerMessage},
};

// ========================================
// DTO → Domain Model
// ========================================

/// 座標として読めない指し手は `Unreadable` になり、ルールエンジンで非合法手として扱われる
impl From<MoveDto> for MoveDescriptor {
    fn from(dto: MoveDto) -> Self {
        match dto {
            MoveDto::Coordinates {
                from,
                to,
                promotion,
            } => parse_coordinates(&from, &to, promotion.as_deref()).unwrap_or_else(|e| {
                tracing::debug!("Unreadable move coordinates: {}", e);
                MoveDescriptor::Unreadable(format!(
                    "{}{}{}",
                    from,
                    to,
                    promotion.as_deref().unwrap_or_default()
                ))
            }),
            MoveDto::Notation(text) => MoveDescriptor::Notation(text.trim().to_string()),
        }
    }
}

fn parse_coordinates(
    from: &str,
    to: &str,
    promotion: Option<&str>,
) -> Result<MoveDescriptor, ValueObjectError> {
    Ok(MoveDescriptor::Coordinates {
        from: Square::parse(from)?,
        to: Square::parse(to)?,
        promotion: promotion
            .filter(|p| !p.is_empty())
            .map(Promotion::parse)
            .transpose()?,
    })
}

// ========================================
// Domain Model → DTO
// ========================================

impl From<&Clocks> for ClocksDto {
    fn from(clocks: &Clocks) -> Self {
        Self {
            white: clocks.remaining_seconds(Role::White),
            black: clocks.remaining_seconds(Role::Black),
        }
    }
}

impl From<Notification> for ServerMessage {
    fn from(notification: Notification) -> Self {
        match notification {
            Notification::Connected { client_id } => ServerMessage::Connected {
                client_id: client_id.into_string(),
            },
            Notification::SessionCreated { session_id, role } => ServerMessage::SessionCreated {
                session_id: session_id.into_string(),
                role,
            },
            Notification::SessionJoined { session_id, role } => ServerMessage::SessionJoined {
                session_id: session_id.into_string(),
                role,
            },
            Notification::SessionStarted { session_id } => ServerMessage::SessionStarted {
                session_id: session_id.into_string(),
            },
            Notification::GameState { fen, clocks } => ServerMessage::GameState {
                fen,
                clocks: ClocksDto::from(&clocks),
            },
            Notification::InvalidMove { fen } => ServerMessage::InvalidMove { fen },
            Notification::GameEnded { result } => ServerMessage::GameEnded { result },
            Notification::RematchOffered { session_id } => ServerMessage::RematchOffered {
                session_id: session_id.into_string(),
            },
            Notification::NewSessionStarted { session_id, role } => {
                ServerMessage::NewSessionStarted {
                    session_id: session_id.into_string(),
                    role,
                }
            }
            Notification::JoinError { reason } => ServerMessage::JoinError { reason },
        }
    }
}

impl From<&Session> for SessionSummaryDto {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.as_str().to_string(),
            status: session.status.label().to_string(),
            white: session.participants.white.as_ref().map(|c| c.to_string()),
            black: session.participants.black.as_ref().map(|c| c.to_string()),
            created_at: timestamp_to_jst_rfc3339(session.created_at.value()),
        }
    }
}

impl From<&Session> for SessionDetailDto {
    fn from(session: &Session) -> Self {
        let result = match session.status {
            SessionStatus::Ended(reason) => Some(reason.describe()),
            _ => None,
        };
        Self {
            id: session.id.as_str().to_string(),
            status: session.status.label().to_string(),
            result,
            white: session.participants.white.as_ref().map(|c| c.to_string()),
            black: session.participants.black.as_ref().map(|c| c.to_string()),
            fen: session.position.fen().to_string(),
            clocks: ClocksDto::from(&session.clocks),
            rematch_offer: session.rematch_offer.as_ref().map(|c| c.to_string()),
            created_at: timestamp_to_jst_rfc3339(session.created_at.value()),
        }
    }
}
