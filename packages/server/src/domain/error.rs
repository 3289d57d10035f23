//! ドメイン層のエラー定義

use thiserror::Error;

/// 値オブジェクトの生成に失敗した場合のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// ClientId が空
    #[error("client id must not be empty")]
    ClientIdEmpty,

    /// ClientId が長すぎる
    #[error("client id must be at most {max} characters (got {actual})")]
    ClientIdTooLong { max: usize, actual: usize },

    /// ClientId に空白文字が含まれる
    #[error("client id must not contain whitespace")]
    ClientIdContainsWhitespace,

    /// SessionId が UUID 形式ではない
    #[error("invalid session id: '{0}'")]
    InvalidSessionId(String),

    /// マス目の表記が不正
    #[error("invalid square: '{0}'")]
    InvalidSquare(String),

    /// 昇格駒の表記が不正
    #[error("invalid promotion piece: '{0}'")]
    InvalidPromotion(String),
}

/// Repository 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// 指定されたセッションが存在しない
    #[error("session '{0}' not found")]
    SessionNotFound(String),

    /// 後手の席が既に埋まっている
    #[error("session '{0}' is already full")]
    SessionFull(String),

    /// 先手と同じクライアントが後手として参加しようとした
    #[error("client '{client_id}' already plays white in session '{session_id}'")]
    OwnSession {
        session_id: String,
        client_id: String,
    },
}

/// MessagePusher 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// 送信先のクライアントが登録されていない
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    /// 同じ client_id のクライアントが既に登録されている
    #[error("client '{0}' is already registered")]
    AlreadyRegistered(String),

    /// 送信に失敗した（チャンネルが閉じているなど）
    #[error("failed to push message: {0}")]
    PushFailed(String),

    /// 通知のシリアライズに失敗した
    #[error("failed to encode notification: {0}")]
    EncodeFailed(String),
}
