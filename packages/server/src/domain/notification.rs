//! クライアントへ送る通知
//!
//! ユースケース層はこの列挙型で「何を伝えるか」だけを決め、
//! ワイヤ形式への変換は Infrastructure 層が担当します。

use super::{
    entity::Clocks,
    value_object::{ClientId, Role, SessionId},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// 接続が受け付けられた（接続したクライアントのみ）
    Connected { client_id: ClientId },
    /// セッションを作成した（作成者のみ）
    SessionCreated { session_id: SessionId, role: Role },
    /// セッションに参加した（参加者のみ）
    SessionJoined { session_id: SessionId, role: Role },
    /// 対局開始（両者）
    SessionStarted { session_id: SessionId },
    /// 指し手受理後の局面と持ち時間（両者）
    GameState { fen: String, clocks: Clocks },
    /// 非合法手（指した本人のみ、変更前の局面を添えて）
    InvalidMove { fen: String },
    /// 終局（両者）
    GameEnded { result: String },
    /// 再戦の申し込み（申し込まれた側のみ）
    RematchOffered { session_id: SessionId },
    /// 再戦開始（両者、それぞれの新しい手番を添えて）
    NewSessionStarted { session_id: SessionId, role: Role },
    /// 参加失敗（参加しようとしたクライアントのみ）
    JoinError { reason: String },
}
