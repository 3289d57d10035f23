//! UseCase: セッション参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinSessionUseCase::execute() メソッド
//! - 後手としての参加と、参加失敗時の通知
//!
//! ### なぜこのテストが必要か
//! - 満席・自分のセッション・存在しないセッションへの参加でセッションが変化しないことを保証
//! - 失敗の理由が参加しようとしたクライアントにだけ届くことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：後手として参加し、両者に対局開始が届く
//! - 異常系：存在しない / 形式が不正な ID、満席、自分のセッション

use std::sync::Arc;

use crate::domain::{
    ClientId, MessagePusher, Notification, Role, Session, SessionId, SessionRepository,
};

use super::error::JoinSessionError;

/// セッション参加のユースケース
pub struct JoinSessionUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl JoinSessionUseCase {
    /// 新しい JoinSessionUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// セッション参加を実行
    ///
    /// # Arguments
    ///
    /// * `requester` - 参加するクライアントの ID
    /// * `session_id` - クライアントから送られたセッション ID（未検証の文字列）
    ///
    /// # Returns
    ///
    /// * `Ok(Session)` - 参加後のセッション
    /// * `Err(JoinSessionError)` - 参加失敗（`join-error` は送信済み）
    pub async fn execute(
        &self,
        requester: &ClientId,
        session_id: &str,
    ) -> Result<Session, JoinSessionError> {
        let result = match SessionId::new(session_id.to_string()) {
            Ok(id) => self
                .repository
                .bind_second_participant(&id, requester.clone())
                .await
                .map_err(JoinSessionError::from),
            Err(_) => Err(JoinSessionError::SessionNotFound),
        };

        let session = match result {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("'{}' failed to join '{}': {}", requester, session_id, e);
                let notification = Notification::JoinError {
                    reason: e.to_string(),
                };
                if let Err(push_error) = self.message_pusher.push_to(requester, &notification).await
                {
                    tracing::warn!("Failed to send join-error to '{}': {}", requester, push_error);
                }
                return Err(e);
            }
        };
        tracing::info!("'{}' joined session '{}' as Black", requester, session.id);

        // 1. 参加者に手番を通知
        let joined = Notification::SessionJoined {
            session_id: session.id.clone(),
            role: Role::Black,
        };
        if let Err(e) = self.message_pusher.push_to(requester, &joined).await {
            tracing::warn!("Failed to send session-joined to '{}': {}", requester, e);
        }

        // 2. 両者に対局開始を通知
        let started = Notification::SessionStarted {
            session_id: session.id.clone(),
        };
        if let Err(e) = self
            .message_pusher
            .broadcast(session.broadcast_targets(), &started)
            .await
        {
            tracing::warn!("Failed to broadcast session-started: {}", e);
        }

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{RulesOracle, SessionStatus, Timestamp},
        usecase::test_support::{Fixture, client},
    };

    async fn create_session(fixture: &Fixture, creator: &str) -> SessionId {
        fixture
            .repository
            .create(
                fixture.rules.initial_position(),
                client(creator),
                Timestamp::new(0),
            )
            .await
    }

    fn create_usecase(fixture: &Fixture) -> JoinSessionUseCase {
        JoinSessionUseCase::new(fixture.repository.clone(), fixture.pusher.clone())
    }

    #[tokio::test]
    async fn test_join_session_success() {
        // テスト項目: 後手として参加でき、参加者に session-joined、両者に session-started が届く
        // given (前提条件):
        let fixture = Fixture::new();
        let session_id = create_session(&fixture, "alice").await;
        let usecase = create_usecase(&fixture);

        // when (操作):
        let session = usecase
            .execute(&client("bob"), session_id.as_str())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(session.status, SessionStatus::InProgress);
        assert_eq!(session.participants.black, Some(client("bob")));
        let started = Notification::SessionStarted {
            session_id: session_id.clone(),
        };
        assert_eq!(
            fixture.pusher.sent_to(&client("bob")),
            vec![
                Notification::SessionJoined {
                    session_id: session_id.clone(),
                    role: Role::Black,
                },
                started.clone(),
            ]
        );
        assert_eq!(fixture.pusher.sent_to(&client("alice")), vec![started]);
    }

    #[tokio::test]
    async fn test_join_full_session_does_not_mutate() {
        // テスト項目: 満席のセッションへの参加は拒否され、参加者は変わらない
        // given (前提条件):
        let fixture = Fixture::new();
        let session_id = create_session(&fixture, "alice").await;
        let usecase = create_usecase(&fixture);
        usecase
            .execute(&client("bob"), session_id.as_str())
            .await
            .unwrap();
        fixture.pusher.clear();
        let before = fixture.repository.get(&session_id).await.unwrap();

        // when (操作):
        let result = usecase.execute(&client("carol"), session_id.as_str()).await;

        // then (期待する結果):
        assert_eq!(result, Err(JoinSessionError::SessionFull));
        assert_eq!(fixture.repository.get(&session_id).await.unwrap(), before);
        assert_eq!(
            fixture.pusher.sent_to(&client("carol")),
            vec![Notification::JoinError {
                reason: "Game already full".to_string()
            }]
        );
        assert!(fixture.pusher.sent_to(&client("alice")).is_empty());
        assert!(fixture.pusher.sent_to(&client("bob")).is_empty());
    }

    #[tokio::test]
    async fn test_join_own_session_rejected() {
        // テスト項目: 自分が作成したセッションには参加できない
        // given (前提条件):
        let fixture = Fixture::new();
        let session_id = create_session(&fixture, "alice").await;
        let usecase = create_usecase(&fixture);

        // when (操作):
        let result = usecase.execute(&client("alice"), session_id.as_str()).await;

        // then (期待する結果):
        assert_eq!(result, Err(JoinSessionError::OwnSession));
        let session = fixture.repository.get(&session_id).await.unwrap();
        assert_eq!(session.status, SessionStatus::AwaitingSecondParticipant);
        assert_eq!(session.participants.black, None);
    }

    #[tokio::test]
    async fn test_join_unknown_or_malformed_session() {
        // テスト項目: 存在しない ID・形式が不正な ID への参加は Game not found になる
        // given (前提条件):
        let fixture = Fixture::new();
        let usecase = create_usecase(&fixture);
        let unknown = crate::domain::SessionIdFactory::generate();

        // when (操作):
        let unknown_result = usecase.execute(&client("bob"), unknown.as_str()).await;
        let malformed_result = usecase.execute(&client("bob"), "not-a-session").await;

        // then (期待する結果):
        assert_eq!(unknown_result, Err(JoinSessionError::SessionNotFound));
        assert_eq!(malformed_result, Err(JoinSessionError::SessionNotFound));
        let reason = Notification::JoinError {
            reason: "Game not found".to_string(),
        };
        assert_eq!(
            fixture.pusher.sent_to(&client("bob")),
            vec![reason.clone(), reason]
        );
    }
}
