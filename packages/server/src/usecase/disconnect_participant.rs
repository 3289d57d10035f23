//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 接続の登録解除と、参加中セッションの扱い
//!
//! ### なぜこのテストが必要か
//! - 切断後に古い接続へ通知が送られないことを保証
//! - 切断してもセッションが残り、同じ client_id で再接続すれば対局を続けられることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：対局中の参加者の切断
//! - エッジケース：セッションに参加していない接続の切断
//! - エッジケース：終局済みのセッションだけに参加している接続の切断

use std::sync::Arc;

use crate::domain::{ClientId, MessagePusher, SessionId, SessionRepository, SessionStatus};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 参加者切断を実行
    ///
    /// セッションは削除せず、そのまま残します。
    ///
    /// # Returns
    ///
    /// 切断した接続が参加していた、終局していないセッションの ID
    pub async fn execute(&self, client_id: &ClientId) -> Vec<SessionId> {
        // 1. MessagePusher からクライアントを登録解除
        self.message_pusher.unregister_client(client_id).await;

        // 2. 残されたセッションを集める
        let mut open_sessions = Vec::new();
        for session_id in self.repository.find_by_participant(client_id).await {
            match self.repository.get(&session_id).await {
                Ok(session) if !matches!(session.status, SessionStatus::Ended(_)) => {
                    open_sessions.push(session_id);
                }
                _ => {}
            }
        }

        if !open_sessions.is_empty() {
            tracing::info!(
                "Client '{}' left {} open session(s): {:?}",
                client_id,
                open_sessions.len(),
                open_sessions
                    .iter()
                    .map(|id| id.as_str())
                    .collect::<Vec<_>>()
            );
        }

        open_sessions
    }
}
