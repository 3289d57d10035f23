//! エンティティ
//!
//! ゲームセッションと、それを構成する参加者・持ち時間・状態を定義します。

use super::{
    error::RepositoryError,
    rules::Position,
    value_object::{ClientId, Role, SessionId, Timestamp},
};

/// 持ち時間のデフォルト値（秒）
pub const DEFAULT_CLOCK_SECONDS: u64 = 180;

/// 持ち時間のデフォルト値（ミリ秒）
pub const DEFAULT_CLOCK_MILLIS: i64 = DEFAULT_CLOCK_SECONDS as i64 * 1000;

/// 各手番に束縛された接続
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Participants {
    pub white: Option<ClientId>,
    pub black: Option<ClientId>,
}

impl Participants {
    pub fn get(&self, role: Role) -> Option<&ClientId> {
        match role {
            Role::White => self.white.as_ref(),
            Role::Black => self.black.as_ref(),
        }
    }

    /// 接続が束縛されている手番
    pub fn role_of(&self, client_id: &ClientId) -> Option<Role> {
        Role::ALL
            .into_iter()
            .find(|role| self.get(*role) == Some(client_id))
    }

    pub fn is_full(&self) -> bool {
        self.white.is_some() && self.black.is_some()
    }

    /// 束縛済みの全接続（White, Black の順）
    pub fn client_ids(&self) -> Vec<ClientId> {
        Role::ALL
            .into_iter()
            .filter_map(|role| self.get(role).cloned())
            .collect()
    }
}

/// 各手番の残り時間（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clocks {
    white_millis: i64,
    black_millis: i64,
}

impl Clocks {
    pub fn new(initial_millis: i64) -> Self {
        Self {
            white_millis: initial_millis,
            black_millis: initial_millis,
        }
    }

    pub fn remaining_millis(&self, role: Role) -> i64 {
        match role {
            Role::White => self.white_millis,
            Role::Black => self.black_millis,
        }
    }

    /// 残り時間（秒、小数）
    pub fn remaining_seconds(&self, role: Role) -> f64 {
        self.remaining_millis(role) as f64 / 1000.0
    }

    pub fn debit(&mut self, role: Role, millis: i64) {
        match role {
            Role::White => self.white_millis -= millis,
            Role::Black => self.black_millis -= millis,
        }
    }
}

impl Default for Clocks {
    fn default() -> Self {
        Self::new(DEFAULT_CLOCK_MILLIS)
    }
}

/// 引き分けの理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    Stalemate,
    Repetition,
    InsufficientMaterial,
    FiftyMoveRule,
}

/// 終局の理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Checkmate { winner: Role },
    Draw(DrawReason),
    Timeout { loser: Role },
}

impl EndReason {
    /// 両対局者に送る結果の文言
    pub fn describe(&self) -> String {
        match self {
            EndReason::Checkmate { winner } => format!("{} wins by checkmate", winner),
            EndReason::Draw(_) => "Draw".to_string(),
            EndReason::Timeout { loser } => format!("{} wins on time", loser.opponent()),
        }
    }
}

/// セッションの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    AwaitingSecondParticipant,
    InProgress,
    Ended(EndReason),
}

impl SessionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::AwaitingSecondParticipant => "awaiting-second-participant",
            SessionStatus::InProgress => "in-progress",
            SessionStatus::Ended(_) => "ended",
        }
    }
}

/// 1 局分のゲームセッション
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub position: Position,
    pub participants: Participants,
    pub clocks: Clocks,
    /// 直前に受理した指し手の時刻。最初の指し手までは `None`
    pub last_move_at: Option<Timestamp>,
    pub status: SessionStatus,
    /// 再戦を申し込んだ接続
    pub rematch_offer: Option<ClientId>,
    pub created_at: Timestamp,
}

impl Session {
    /// 作成者を White として、後手待ちのセッションを作る
    pub fn new(
        id: SessionId,
        position: Position,
        first: ClientId,
        initial_clock_millis: i64,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            position,
            participants: Participants {
                white: Some(first),
                black: None,
            },
            clocks: Clocks::new(initial_clock_millis),
            last_move_at: None,
            status: SessionStatus::AwaitingSecondParticipant,
            rematch_offer: None,
            created_at,
        }
    }

    /// 両手番が埋まった状態で開始するセッションを作る（再戦用）
    pub fn paired(
        id: SessionId,
        position: Position,
        white: ClientId,
        black: ClientId,
        initial_clock_millis: i64,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            position,
            participants: Participants {
                white: Some(white),
                black: Some(black),
            },
            clocks: Clocks::new(initial_clock_millis),
            last_move_at: None,
            status: SessionStatus::InProgress,
            rematch_offer: None,
            created_at,
        }
    }

    /// 後手として参加させる
    ///
    /// 席が埋まっている場合と、White の接続自身が参加しようとした場合は失敗し、
    /// セッションは変更されません。
    pub fn bind_second_participant(&mut self, client_id: ClientId) -> Result<(), RepositoryError> {
        if self.participants.black.is_some() {
            return Err(RepositoryError::SessionFull(self.id.as_str().to_string()));
        }
        if self.participants.white.as_ref() == Some(&client_id) {
            return Err(RepositoryError::OwnSession {
                session_id: self.id.as_str().to_string(),
                client_id: client_id.into_string(),
            });
        }
        self.participants.black = Some(client_id);
        self.status = SessionStatus::InProgress;
        Ok(())
    }

    pub fn role_of(&self, client_id: &ClientId) -> Option<Role> {
        self.participants.role_of(client_id)
    }

    /// 指定した接続の対戦相手
    pub fn opponent_of(&self, client_id: &ClientId) -> Option<&ClientId> {
        self.role_of(client_id)
            .and_then(|role| self.participants.get(role.opponent()))
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == SessionStatus::InProgress
    }

    /// 通知対象（束縛済みの全接続）
    pub fn broadcast_targets(&self) -> Vec<ClientId> {
        self.participants.client_ids()
    }
}
