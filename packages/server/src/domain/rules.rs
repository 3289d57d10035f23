//! ルールオラクルのインターフェース
//!
//! 合法手の判定・局面の更新・終局判定はドメイン層の外側にある
//! ルールエンジンに委譲します。ドメイン層は局面の中身を解釈しません。

use thiserror::Error;

use super::{entity::DrawReason, value_object::MoveDescriptor, value_object::Role};

/// ルールエンジンが所有する局面
///
/// `fen` はクライアントへそのまま送信される盤面表現、`history` は
/// 千日手（同一局面の繰り返し）判定のためにルールエンジンが管理する局面キーの列です。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    fen: String,
    history: Vec<String>,
}

impl Position {
    pub fn new(fen: String, history: Vec<String>) -> Self {
        Self { fen, history }
    }

    pub fn fen(&self) -> &str {
        &self.fen
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }
}

/// 終局の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    /// 手番側がチェックメイトされている
    Checkmate,
    /// 引き分け
    Draw(DrawReason),
}

/// 合法手を適用した結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    pub position: Position,
    pub terminal: Option<Terminal>,
}

/// ルールオラクルのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    /// 指し手が非合法、または解釈できない
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// 保持している局面が壊れている
    #[error("invalid position: {0}")]
    InvalidPosition(String),
}

/// ルールオラクル
///
/// 純粋関数の集合として扱い、副作用を持たない実装を前提とします。
#[cfg_attr(test, mockall::automock)]
pub trait RulesOracle: Send + Sync {
    /// 対局開始局面
    fn initial_position(&self) -> Position;

    /// 局面の手番
    fn side_to_move(&self, position: &Position) -> Result<Role, RulesError>;

    /// 指し手を適用した局面と終局フラグを返す
    fn apply_move(
        &self,
        position: &Position,
        mv: &MoveDescriptor,
    ) -> Result<AppliedMove, RulesError>;
}
