//! UseCase: 指し手提出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SubmitMoveUseCase::execute() メソッド
//! - 手番・参加者・状態の検証、局面と持ち時間の更新、終局判定と通知の順序
//!
//! ### なぜこのテストが必要か
//! - 無効な提出（手番外、非参加者、終局後、非合法手）で状態が変わらないことを保証
//! - 持ち時間が指した側からだけ、直前の指し手からの経過時間分引かれることを確認
//! - 終局時に game-ended が 1 回だけ、game-state より先に届くことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：初手、2 手目以降、チェックメイト
//! - 異常系：手番外、非参加者、存在しないセッション、非合法手、壊れた局面
//! - エッジケース：持ち時間切れ、同時に届いた指し手

use std::sync::Arc;

use sente_shared::time::Clock;

use crate::domain::{
    ClientId, EndReason, MessagePusher, MoveDescriptor, Notification, RulesError, RulesOracle,
    Session, SessionId, SessionRepository, SessionStatus, Terminal, Timestamp, clock_accountant,
};

use super::error::SubmitMoveError;

/// 指し手提出のユースケース
pub struct SubmitMoveUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    rules: Arc<dyn RulesOracle>,
    clock: Arc<dyn Clock>,
}

impl SubmitMoveUseCase {
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

    /// 指し手提出を実行
    ///
    /// セッションの排他スコープの中で検証・更新・通知までを行うため、
    /// 同じセッションへの指し手は受理された順に通知されます。
    ///
    /// # Returns
    ///
    /// * `Ok(Session)` - 指し手を受理した後のセッション
    /// * `Err(SubmitMoveError)` - 指し手を受理しなかった（状態は変化しない）
    pub async fn execute(
        &self,
        requester: &ClientId,
        session_id: &str,
        mv: &MoveDescriptor,
    ) -> Result<Session, SubmitMoveError> {
        let not_found = || SubmitMoveError::SessionNotFound(session_id.to_string());
        let id = SessionId::new(session_id.to_string()).map_err(|_| not_found())?;
        let mut session = self
            .repository
            .acquire(&id)
            .await
            .map_err(|_| not_found())?;

        // 1. 提出者・状態・手番の検証
        let role = session
            .role_of(requester)
            .ok_or_else(|| SubmitMoveError::NotAParticipant(requester.to_string()))?;
        if !session.is_in_progress() {
            return Err(SubmitMoveError::GameNotInProgress);
        }
        let side_to_move = self
            .rules
            .side_to_move(&session.position)
            .map_err(|e| SubmitMoveError::CorruptPosition(e.to_string()))?;
        if side_to_move != role {
            return Err(SubmitMoveError::NotYourTurn(role.to_string()));
        }

        // 2. ルールエンジンで指し手を適用
        let applied = match self.rules.apply_move(&session.position, mv) {
            Ok(applied) => applied,
            Err(RulesError::IllegalMove(detail)) => {
                let notification = Notification::InvalidMove {
                    fen: session.position.fen().to_string(),
                };
                if let Err(e) = self.message_pusher.push_to(requester, &notification).await {
                    tracing::warn!("Failed to send invalid-move to '{}': {}", requester, e);
                }
                return Err(SubmitMoveError::IllegalMove(detail));
            }
            Err(RulesError::InvalidPosition(detail)) => {
                return Err(SubmitMoveError::CorruptPosition(detail));
            }
        };

        // 3. 局面と持ち時間を更新
        session.position = applied.position;
        let now = Timestamp::new(self.clock.now_jst_millis());
        let clocks = clock_accountant::record_move(&mut session, role, now);

        // 4. 終局判定（持ち時間切れを優先）
        let end = match clock_accountant::is_expired(&clocks) {
            Some(loser) => Some(EndReason::Timeout { loser }),
            None => applied.terminal.map(|terminal| match terminal {
                Terminal::Checkmate => EndReason::Checkmate { winner: role },
                Terminal::Draw(reason) => EndReason::Draw(reason),
            }),
        };

        let targets = session.broadcast_targets();
        if let Some(end) = end {
            session.status = SessionStatus::Ended(end);
            tracing::info!("Session '{}' ended: {}", session.id, end.describe());
            let notification = Notification::GameEnded {
                result: end.describe(),
            };
            if let Err(e) = self
                .message_pusher
                .broadcast(targets.clone(), &notification)
                .await
            {
                tracing::warn!("Failed to broadcast game-ended: {}", e);
            }
        }

        // 5. 両者に局面を通知
        let notification = Notification::GameState {
            fen: session.position.fen().to_string(),
            clocks,
        };
        if let Err(e) = self.message_pusher.broadcast(targets, &notification).await {
            tracing::warn!("Failed to broadcast game-state: {}", e);
        }

        Ok((*session).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{AppliedMove, DrawReason, MockRulesOracle, Position, Role, Square},
        usecase::test_support::{Fixture, client},
    };

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 指し手の受理 / 不受理と、そのときのセッション状態
    // - 通知の宛先と順序
    //
    // 【どのようなシナリオをテストするか】
    // 1. 作成 → 参加 → White の初手で両者に game-state（持ち時間は減らない）
    // 2. 2 手目以降で指した側の持ち時間だけが減る
    // 3. フールズメイトで game-ended が 1 回、以降の指し手は無視される
    // 4. 手番外・非参加者・非合法手で状態が変わらない
    // 5. 持ち時間切れの判定
    // ========================================

    fn mv(from: &str, to: &str) -> MoveDescriptor {
        MoveDescriptor::Coordinates {
            from: Square::parse(from).unwrap(),
            to: Square::parse(to).unwrap(),
            promotion: None,
        }
    }

    fn create_usecase(fixture: &Fixture) -> SubmitMoveUseCase {
        SubmitMoveUseCase::new(
            fixture.repository.clone(),
            fixture.pusher.clone(),
            fixture.rules.clone(),
            fixture.clock.clone(),
        )
    }

    async fn start_game(fixture: &Fixture) -> SessionId {
        let id = fixture
            .repository
            .create_paired(
                fixture.rules.initial_position(),
                client("alice"),
                client("bob"),
                Timestamp::new(0),
            )
            .await;
        fixture.pusher.clear();
        id
    }

    #[tokio::test]
    async fn test_first_move_broadcasts_state_without_charging() {
        // テスト項目: 初手で両者に game-state が届き、持ち時間は減らない
        // given (前提条件):
        let fixture = Fixture::new();
        let id = start_game(&fixture).await;
        let usecase = create_usecase(&fixture);

        // when (操作):
        let session = usecase
            .execute(&client("alice"), id.as_str(), &mv("e2", "e4"))
            .await
            .unwrap();

        // then (期待する結果):
        let expected = fixture
            .rules
            .apply_move(&fixture.rules.initial_position(), &mv("e2", "e4"))
            .unwrap()
            .position;
        assert_eq!(session.position, expected);
        assert_eq!(session.clocks.remaining_millis(Role::White), 180_000);
        assert_eq!(session.clocks.remaining_millis(Role::Black), 180_000);
        assert_eq!(session.last_move_at, Some(Timestamp::new(1_000_000)));

        let state = Notification::GameState {
            fen: expected.fen().to_string(),
            clocks: session.clocks,
        };
        assert_eq!(fixture.pusher.sent_to(&client("alice")), vec![state.clone()]);
        assert_eq!(fixture.pusher.sent_to(&client("bob")), vec![state]);
    }

    #[tokio::test]
    async fn test_subsequent_move_charges_mover_only() {
        // テスト項目: 2 手目は直前の指し手からの経過時間が指した側からだけ引かれる
        // given (前提条件):
        let fixture = Fixture::new();
        let id = start_game(&fixture).await;
        let usecase = create_usecase(&fixture);
        usecase
            .execute(&client("alice"), id.as_str(), &mv("e2", "e4"))
            .await
            .unwrap();

        // when (操作): 3.5 秒後に Black が指す
        fixture.clock.advance(3_500);
        let session = usecase
            .execute(&client("bob"), id.as_str(), &mv("e7", "e5"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(session.clocks.remaining_millis(Role::White), 180_000);
        assert_eq!(session.clocks.remaining_millis(Role::Black), 176_500);
    }

    #[tokio::test]
    async fn test_checkmate_ends_game_once() {
        // テスト項目: チェックメイトで game-ended が game-state より先に 1 回だけ届き、以降の指し手は無視される
        // given (前提条件):
        let fixture = Fixture::new();
        let id = start_game(&fixture).await;
        let usecase = create_usecase(&fixture);
        let moves = [
            ("alice", mv("f2", "f3")),
            ("bob", mv("e7", "e5")),
            ("alice", mv("g2", "g4")),
        ];
        for (who, m) in &moves {
            usecase.execute(&client(who), id.as_str(), m).await.unwrap();
        }
        fixture.pusher.clear();

        // when (操作): Qh4#
        let session = usecase
            .execute(&client("bob"), id.as_str(), &mv("d8", "h4"))
            .await
            .unwrap();
        let after = usecase
            .execute(&client("alice"), id.as_str(), &mv("e2", "e3"))
            .await;

        // then (期待する結果):
        assert_eq!(
            session.status,
            SessionStatus::Ended(EndReason::Checkmate {
                winner: Role::Black
            })
        );
        assert_eq!(after.unwrap_err(), SubmitMoveError::GameNotInProgress);
        let received = fixture.pusher.sent_to(&client("alice"));
        assert_eq!(received.len(), 2);
        assert_eq!(
            received[0],
            Notification::GameEnded {
                result: "Black wins by checkmate".to_string()
            }
        );
        assert!(matches!(received[1], Notification::GameState { .. }));
        assert_eq!(fixture.pusher.sent_to(&client("bob")), received);
    }

    #[tokio::test]
    async fn test_out_of_turn_move_is_ignored() {
        // テスト項目: 手番でない側の指し手は無視され、局面・持ち時間・状態は変わらない
        // given (前提条件):
        let fixture = Fixture::new();
        let id = start_game(&fixture).await;
        let usecase = create_usecase(&fixture);
        let before = fixture.repository.get(&id).await.unwrap();

        // when (操作):
        let result = usecase
            .execute(&client("bob"), id.as_str(), &mv("e7", "e5"))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(SubmitMoveError::NotYourTurn("Black".to_string()))
        );
        assert_eq!(fixture.repository.get(&id).await.unwrap(), before);
        assert_eq!(fixture.pusher.total_sent(), 0);
    }

    #[tokio::test]
    async fn test_non_participant_and_unknown_session_are_ignored() {
        // テスト項目: 参加していない接続や存在しないセッションへの提出は無視される
        // given (前提条件):
        let fixture = Fixture::new();
        let id = start_game(&fixture).await;
        let usecase = create_usecase(&fixture);

        // when (操作):
        let stranger = usecase
            .execute(&client("mallory"), id.as_str(), &mv("e2", "e4"))
            .await;
        let unknown = usecase
            .execute(&client("alice"), "no-such-session", &mv("e2", "e4"))
            .await;

        // then (期待する結果):
        assert_eq!(
            stranger,
            Err(SubmitMoveError::NotAParticipant("mallory".to_string()))
        );
        assert_eq!(
            unknown,
            Err(SubmitMoveError::SessionNotFound("no-such-session".to_string()))
        );
        assert_eq!(fixture.pusher.total_sent(), 0);
    }

    #[tokio::test]
    async fn test_move_before_second_participant_is_ignored() {
        // テスト項目: 後手待ちのセッションでは指せない
        // given (前提条件):
        let fixture = Fixture::new();
        let id = fixture
            .repository
            .create(
                fixture.rules.initial_position(),
                client("alice"),
                Timestamp::new(0),
            )
            .await;
        let usecase = create_usecase(&fixture);

        // when (操作):
        let result = usecase
            .execute(&client("alice"), id.as_str(), &mv("e2", "e4"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(SubmitMoveError::GameNotInProgress));
    }

    #[tokio::test]
    async fn test_illegal_move_returns_prior_position_to_submitter() {
        // テスト項目: 非合法手は局面を変えず、提出者にだけ元の局面付きの invalid-move が届く
        // given (前提条件):
        let fixture = Fixture::new();
        let id = start_game(&fixture).await;
        let usecase = create_usecase(&fixture);
        let before = fixture.repository.get(&id).await.unwrap();

        // when (操作):
        let result = usecase
            .execute(&client("alice"), id.as_str(), &mv("e2", "e5"))
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(SubmitMoveError::IllegalMove(_))));
        assert_eq!(fixture.repository.get(&id).await.unwrap(), before);
        assert_eq!(
            fixture.pusher.sent_to(&client("alice")),
            vec![Notification::InvalidMove {
                fen: before.position.fen().to_string()
            }]
        );
        assert!(fixture.pusher.sent_to(&client("bob")).is_empty());
    }

    #[tokio::test]
    async fn test_clock_expiry_ends_game_on_time() {
        // テスト項目: 持ち時間を使い切った指し手で時間切れ負けになる
        // given (前提条件):
        let fixture = Fixture::with_clock_millis(5_000);
        let id = start_game(&fixture).await;
        let usecase = create_usecase(&fixture);
        usecase
            .execute(&client("alice"), id.as_str(), &mv("e2", "e4"))
            .await
            .unwrap();

        // when (操作): Black が 6 秒かけて指す
        fixture.clock.advance(6_000);
        let session = usecase
            .execute(&client("bob"), id.as_str(), &mv("e7", "e5"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(
            session.status,
            SessionStatus::Ended(EndReason::Timeout { loser: Role::Black })
        );
        assert_eq!(
            fixture.pusher.sent_to(&client("alice"))[1],
            Notification::GameEnded {
                result: "White wins on time".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_draw_reported_by_oracle() {
        // テスト項目: ルールエンジンが引き分けを返すと Draw で終局する
        // given (前提条件):
        let fixture = Fixture::new();
        let id = start_game(&fixture).await;
        let mut rules = MockRulesOracle::new();
        rules.expect_side_to_move().returning(|_| Ok(Role::White));
        rules.expect_apply_move().times(1).returning(|_, _| {
            Ok(AppliedMove {
                position: Position::new("drawn".to_string(), vec![]),
                terminal: Some(Terminal::Draw(DrawReason::Stalemate)),
            })
        });
        let usecase = SubmitMoveUseCase::new(
            fixture.repository.clone(),
            fixture.pusher.clone(),
            Arc::new(rules),
            fixture.clock.clone(),
        );

        // when (操作):
        let session = usecase
            .execute(&client("alice"), id.as_str(), &mv("e2", "e4"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(
            session.status,
            SessionStatus::Ended(EndReason::Draw(DrawReason::Stalemate))
        );
        assert_eq!(
            fixture.pusher.sent_to(&client("bob"))[0],
            Notification::GameEnded {
                result: "Draw".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_corrupt_position_is_not_applied() {
        // テスト項目: ルールエンジンが局面を解釈できない場合、何も通知せず状態も変えない
        // given (前提条件):
        let fixture = Fixture::new();
        let id = start_game(&fixture).await;
        let mut rules = MockRulesOracle::new();
        rules
            .expect_side_to_move()
            .returning(|_| Err(RulesError::InvalidPosition("broken".to_string())));
        rules.expect_apply_move().times(0);
        let usecase = SubmitMoveUseCase::new(
            fixture.repository.clone(),
            fixture.pusher.clone(),
            Arc::new(rules),
            fixture.clock.clone(),
        );

        // when (操作):
        let result = usecase
            .execute(&client("alice"), id.as_str(), &mv("e2", "e4"))
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(SubmitMoveError::CorruptPosition(_))));
        assert_eq!(fixture.pusher.total_sent(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_moves_accept_exactly_one() {
        // テスト項目: White の指し手が同時に 2 つ届いても受理されるのは 1 つだけ
        // given (前提条件):
        let fixture = Fixture::new();
        let id = start_game(&fixture).await;
        let usecase = Arc::new(create_usecase(&fixture));

        // when (操作):
        let first = {
            let usecase = usecase.clone();
            let id = id.clone();
            tokio::spawn(async move {
                usecase
                    .execute(&client("alice"), id.as_str(), &mv("e2", "e4"))
                    .await
            })
        };
        let second = {
            let usecase = usecase.clone();
            let id = id.clone();
            tokio::spawn(async move {
                usecase
                    .execute(&client("alice"), id.as_str(), &mv("d2", "d4"))
                    .await
            })
        };
        let results = [first.await.unwrap(), second.await.unwrap()];

        // then (期待する結果):
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results.iter().any(|r| matches!(
            r,
            Err(SubmitMoveError::NotYourTurn(_))
        )));
        assert_eq!(fixture.pusher.sent_to(&client("bob")).len(), 1);
    }
}
