//! UseCase 層
//!
//! クライアントからのイベント 1 つにつき 1 つのユースケースを用意し、
//! Repository・RulesOracle・MessagePusher を組み合わせてセッションを進めます。

pub mod accept_rematch;
pub mod connect_participant;
pub mod create_session;
pub mod disconnect_participant;
pub mod error;
pub mod get_session_detail;
pub mod get_sessions;
pub mod join_session;
pub mod request_rematch;
pub mod submit_move;

#[cfg(test)]
pub(crate) mod test_support;

pub use accept_rematch::AcceptRematchUseCase;
pub use connect_participant::ConnectParticipantUseCase;
pub use create_session::CreateSessionUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{
    ConnectError, GetSessionDetailError, JoinSessionError, RematchError, SubmitMoveError,
};
pub use get_session_detail::GetSessionDetailUseCase;
pub use get_sessions::GetSessionsUseCase;
pub use join_session::JoinSessionUseCase;
pub use request_rematch::RequestRematchUseCase;
pub use submit_move::SubmitMoveUseCase;
