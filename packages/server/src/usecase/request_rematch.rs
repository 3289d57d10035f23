//! UseCase: 再戦の申し込み

use std::sync::Arc;

use crate::domain::{ClientId, MessagePusher, Notification, SessionId, SessionRepository};

use super::error::RematchError;

/// 再戦申し込みのユースケース
pub struct RequestRematchUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RequestRematchUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 再戦の申し込みを記録し、対戦相手に通知する
    ///
    /// 申し込みはセッションごとに 1 つで、後からの申し込みで上書きされます。
    pub async fn execute(&self, requester: &ClientId, session_id: &str) -> Result<(), RematchError> {
        let not_found = || RematchError::SessionNotFound(session_id.to_string());
        let id = SessionId::new(session_id.to_string()).map_err(|_| not_found())?;
        let mut session = self
            .repository
            .acquire(&id)
            .await
            .map_err(|_| not_found())?;

        if session.role_of(requester).is_none() {
            return Err(RematchError::NotAParticipant(requester.to_string()));
        }
        let opponent = session
            .opponent_of(requester)
            .cloned()
            .ok_or(RematchError::NoOpponent)?;

        session.rematch_offer = Some(requester.clone());
        tracing::info!("'{}' offered a rematch in session '{}'", requester, id);

        let notification = Notification::RematchOffered { session_id: id };
        if let Err(e) = self.message_pusher.push_to(&opponent, &notification).await {
            tracing::warn!("Failed to send rematch-offered to '{}': {}", opponent, e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{RulesOracle, Timestamp},
        usecase::test_support::{Fixture, client},
    };

    async fn paired_session(fixture: &Fixture) -> SessionId {
        fixture
            .repository
            .create_paired(
                fixture.rules.initial_position(),
                client("alice"),
                client("bob"),
                Timestamp::new(0),
            )
            .await
    }

    #[tokio::test]
    async fn test_request_rematch_notifies_opponent() {
        // テスト項目: 申し込みが記録され、相手にだけ rematch-offered が届く
        // given (前提条件):
        let fixture = Fixture::new();
        let id = paired_session(&fixture).await;
        let usecase = RequestRematchUseCase::new(fixture.repository.clone(), fixture.pusher.clone());

        // when (操作):
        let result = usecase.execute(&client("alice"), id.as_str()).await;

        // then (期待する結果):
        assert!(result.is_ok());
        let session = fixture.repository.get(&id).await.unwrap();
        assert_eq!(session.rematch_offer, Some(client("alice")));
        assert_eq!(
            fixture.pusher.sent_to(&client("bob")),
            vec![Notification::RematchOffered {
                session_id: id.clone()
            }]
        );
        assert!(fixture.pusher.sent_to(&client("alice")).is_empty());
    }

    #[tokio::test]
    async fn test_repeated_requests_leave_single_offer() {
        // テスト項目: 同じ参加者が 2 回申し込んでも申し込みは 1 つだけ
        // given (前提条件):
        let fixture = Fixture::new();
        let id = paired_session(&fixture).await;
        let usecase = RequestRematchUseCase::new(fixture.repository.clone(), fixture.pusher.clone());

        // when (操作):
        usecase.execute(&client("alice"), id.as_str()).await.unwrap();
        usecase.execute(&client("alice"), id.as_str()).await.unwrap();

        // then (期待する結果):
        let session = fixture.repository.get(&id).await.unwrap();
        assert_eq!(session.rematch_offer, Some(client("alice")));
    }

    #[tokio::test]
    async fn test_later_request_overwrites_offer() {
        // テスト項目: 相手からの申し込みで申し込み者が上書きされる
        // given (前提条件):
        let fixture = Fixture::new();
        let id = paired_session(&fixture).await;
        let usecase = RequestRematchUseCase::new(fixture.repository.clone(), fixture.pusher.clone());
        usecase.execute(&client("alice"), id.as_str()).await.unwrap();

        // when (操作):
        usecase.execute(&client("bob"), id.as_str()).await.unwrap();

        // then (期待する結果):
        let session = fixture.repository.get(&id).await.unwrap();
        assert_eq!(session.rematch_offer, Some(client("bob")));
    }

    #[tokio::test]
    async fn test_request_rematch_rejected_without_opponent_or_membership() {
        // テスト項目: 相手のいないセッション・参加していないセッションでは申し込めない
        // given (前提条件):
        let fixture = Fixture::new();
        let lonely = fixture
            .repository
            .create(
                fixture.rules.initial_position(),
                client("alice"),
                Timestamp::new(0),
            )
            .await;
        let paired = paired_session(&fixture).await;
        let usecase = RequestRematchUseCase::new(fixture.repository.clone(), fixture.pusher.clone());

        // when (操作):
        let no_opponent = usecase.execute(&client("alice"), lonely.as_str()).await;
        let stranger = usecase.execute(&client("mallory"), paired.as_str()).await;

        // then (期待する結果):
        assert_eq!(no_opponent, Err(RematchError::NoOpponent));
        assert_eq!(
            stranger,
            Err(RematchError::NotAParticipant("mallory".to_string()))
        );
        assert_eq!(fixture.repository.get(&lonely).await.unwrap().rematch_offer, None);
        assert_eq!(fixture.pusher.total_sent(), 0);
    }
}
