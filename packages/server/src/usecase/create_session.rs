//! UseCase: セッション作成処理
//!
//! 作成者を White として後手待ちのセッションを作り、作成者にだけ通知します。

use std::sync::Arc;

use sente_shared::time::Clock;

use crate::domain::{
    ClientId, MessagePusher, Notification, Role, RulesOracle, SessionId, SessionRepository,
    Timestamp,
};

/// セッション作成のユースケース
pub struct CreateSessionUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    rules: Arc<dyn RulesOracle>,
    clock: Arc<dyn Clock>,
}

impl CreateSessionUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        rules: Arc<dyn RulesOracle>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            rules,
            clock,
        }
    }

    /// セッション作成を実行し、新しいセッションの ID を返す
    pub async fn execute(&self, requester: &ClientId) -> SessionId {
        let created_at = Timestamp::new(self.clock.now_jst_millis());
        let session_id = self
            .repository
            .create(self.rules.initial_position(), requester.clone(), created_at)
            .await;
        tracing::info!("Session '{}' created by '{}'", session_id, requester);

        let notification = Notification::SessionCreated {
            session_id: session_id.clone(),
            role: Role::White,
        };
        if let Err(e) = self.message_pusher.push_to(requester, &notification).await {
            tracing::warn!("Failed to send session-created to '{}': {}", requester, e);
        }

        session_id
    }
}
