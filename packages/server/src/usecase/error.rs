//! UseCase 層のエラー定義
//!
//! ユースケースごとにエラー型を分け、UI 層で HTTP ステータスやログに変換します。

use thiserror::Error;

use crate::domain::RepositoryError;

/// 接続処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// 同じ client_id の接続が既に存在する
    #[error("client_id '{0}' is already connected")]
    DuplicateClientId(String),

    #[error("failed to register connection: {0}")]
    RegistrationFailed(String),
}

/// セッション参加のエラー
///
/// `Display` の文言はそのまま `join-error` の理由としてクライアントへ送られます。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinSessionError {
    #[error("Game not found")]
    SessionNotFound,

    #[error("Game already full")]
    SessionFull,

    #[error("Cannot join your own game")]
    OwnSession,
}

impl From<RepositoryError> for JoinSessionError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::SessionNotFound(_) => JoinSessionError::SessionNotFound,
            RepositoryError::SessionFull(_) => JoinSessionError::SessionFull,
            RepositoryError::OwnSession { .. } => JoinSessionError::OwnSession,
        }
    }
}

/// 指し手提出のエラー
///
/// いずれも提出者以外には通知されず、セッションの状態は変わりません。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitMoveError {
    #[error("session '{0}' not found")]
    SessionNotFound(String),

    #[error("client '{0}' is not a participant of the session")]
    NotAParticipant(String),

    #[error("session is not in progress")]
    GameNotInProgress,

    #[error("not {0}'s turn")]
    NotYourTurn(String),

    /// 非合法手（提出者には `invalid-move` が送られる）
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// 保持している局面をルールエンジンが解釈できない
    #[error("corrupt position: {0}")]
    CorruptPosition(String),
}

/// 再戦の申し込み・承諾のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RematchError {
    #[error("session '{0}' not found")]
    SessionNotFound(String),

    #[error("client '{0}' is not a participant of the session")]
    NotAParticipant(String),

    #[error("session has no opponent yet")]
    NoOpponent,

    #[error("no rematch offer from the opponent")]
    NoOffer,
}

/// セッション詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetSessionDetailError {
    #[error("invalid session id: {0}")]
    InvalidSessionId(String),

    #[error("session '{0}' not found")]
    SessionNotFound(String),
}
