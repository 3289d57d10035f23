//! Shared application state.

use std::sync::Arc;

use sente_shared::time::Clock;

use crate::{
    domain::{MessagePusher, RulesOracle, SessionRepository},
    usecase::{
        AcceptRematchUseCase, ConnectParticipantUseCase, CreateSessionUseCase,
        DisconnectParticipantUseCase, GetSessionDetailUseCase, GetSessionsUseCase,
        JoinSessionUseCase, RequestRematchUseCase, SubmitMoveUseCase,
    },
};

/// Use cases shared by every handler
pub struct AppState {
    /// ConnectParticipantUseCase（参加者接続のユースケース）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    pub create_session_usecase: Arc<CreateSessionUseCase>,
    pub join_session_usecase: Arc<JoinSessionUseCase>,
    pub submit_move_usecase: Arc<SubmitMoveUseCase>,
    pub request_rematch_usecase: Arc<RequestRematchUseCase>,
    pub accept_rematch_usecase: Arc<AcceptRematchUseCase>,
    /// GetSessionsUseCase（セッション一覧取得のユースケース）
    pub get_sessions_usecase: Arc<GetSessionsUseCase>,
    /// GetSessionDetailUseCase（セッション詳細取得のユースケース）
    pub get_session_detail_usecase: Arc<GetSessionDetailUseCase>,
}

impl AppState {
    /// Wire every use case against the given adapters.
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        rules: Arc<dyn RulesOracle>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(
                message_pusher.clone(),
            )),
            disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            create_session_usecase: Arc::new(CreateSessionUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                rules.clone(),
                clock.clone(),
            )),
            join_session_usecase: Arc::new(JoinSessionUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            submit_move_usecase: Arc::new(SubmitMoveUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                rules.clone(),
                clock.clone(),
            )),
            request_rematch_usecase: Arc::new(RequestRematchUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            accept_rematch_usecase: Arc::new(AcceptRematchUseCase::new(
                repository.clone(),
                message_pusher,
                rules,
                clock,
            )),
            get_sessions_usecase: Arc::new(GetSessionsUseCase::new(repository.clone())),
            get_session_detail_usecase: Arc::new(GetSessionDetailUseCase::new(repository)),
        }
    }
}
