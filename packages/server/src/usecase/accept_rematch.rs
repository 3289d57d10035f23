//! UseCase: 再戦の承諾
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - AcceptRematchUseCase::execute() メソッド
//! - 手番を入れ替えた新しいセッションへの置き換え
//!
//! ### なぜこのテストが必要か
//! - 新しいセッションの手番が入れ替わり、持ち時間と局面が初期化されることを保証
//! - 古いセッションが取得できなくなることを確認
//! - 申し込みがない・申し込み者本人による承諾が何もしないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：相手の申し込みを承諾
//! - 異常系：申し込みなし、自分の申し込みの承諾、参加していない接続、承諾済みのセッション

use std::sync::Arc;

use sente_shared::time::Clock;

use crate::domain::{
    ClientId, MessagePusher, Notification, Role, RulesOracle, SessionId, SessionRepository,
    Timestamp,
};

use super::error::RematchError;

/// 再戦承諾のユースケース
pub struct AcceptRematchUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    rules: Arc<dyn RulesOracle>,
    clock: Arc<dyn Clock>,
}

impl AcceptRematchUseCase {
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

    /// 再戦の承諾を実行し、新しいセッションの ID を返す
    ///
    /// 古いセッションは排他スコープを保持したまま削除するため、
    /// 承諾と競合した指し手・申し込みは古いセッションを見つけられずに無視されます。
    pub async fn execute(
        &self,
        requester: &ClientId,
        session_id: &str,
    ) -> Result<SessionId, RematchError> {
        let not_found = || RematchError::SessionNotFound(session_id.to_string());
        let id = SessionId::new(session_id.to_string()).map_err(|_| not_found())?;
        let mut session = self
            .repository
            .acquire(&id)
            .await
            .map_err(|_| not_found())?;

        // 1. 承諾できるのは、申し込みを受けた側の参加者だけ
        if session.role_of(requester).is_none() {
            return Err(RematchError::NotAParticipant(requester.to_string()));
        }
        let offerer = session.opponent_of(requester).cloned();
        if offerer.is_none() || session.rematch_offer != offerer {
            return Err(RematchError::NoOffer);
        }
        let (Some(old_white), Some(old_black)) = (
            session.participants.white.clone(),
            session.participants.black.clone(),
        ) else {
            return Err(RematchError::NoOpponent);
        };

        // 2. 手番を入れ替えた新しいセッションを作成
        let created_at = Timestamp::new(self.clock.now_jst_millis());
        let new_id = self
            .repository
            .create_paired(
                self.rules.initial_position(),
                old_black.clone(),
                old_white.clone(),
                created_at,
            )
            .await;

        // 3. 古いセッションを置き換え
        session.rematch_offer = None;
        self.repository.delete(&id).await;
        tracing::info!("Session '{}' replaced by rematch '{}'", id, new_id);

        // 4. 両者に新しい手番を通知
        for (client_id, role) in [(&old_black, Role::White), (&old_white, Role::Black)] {
            let notification = Notification::NewSessionStarted {
                session_id: new_id.clone(),
                role,
            };
            if let Err(e) = self.message_pusher.push_to(client_id, &notification).await {
                tracing::warn!("Failed to send new-session-started to '{}': {}", client_id, e);
            }
        }

        Ok(new_id)
    }
}
