//! Repository trait 定義
//!
//! ドメイン層が必要とするセッションストアのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use super::{ClientId, Position, RepositoryError, Session, SessionId, Timestamp};

/// 1 セッションに対する排他的な変更スコープ
///
/// ガードを保持している間、同じセッションへの他の変更は待たされます。
/// 別セッションへの操作は並行に進みます。
pub type SessionGuard = OwnedMutexGuard<Session>;

/// Session Repository trait
///
/// セッション ID からセッション状態への対応を一元管理します。
/// ポリシー（誰が指せるか、いつ終局するか）は持たず、状態の保持と原子的な入れ替えだけを行います。
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// White を束縛した後手待ちのセッションを作成し、ID を返す
    async fn create(
        &self,
        position: Position,
        first: ClientId,
        created_at: Timestamp,
    ) -> SessionId;

    /// 両手番を束縛した対局中のセッションを作成し、ID を返す
    async fn create_paired(
        &self,
        position: Position,
        white: ClientId,
        black: ClientId,
        created_at: Timestamp,
    ) -> SessionId;

    /// セッションのスナップショットを取得
    async fn get(&self, session_id: &SessionId) -> Result<Session, RepositoryError>;

    /// セッションの排他的な変更スコープを取得
    ///
    /// 待機中にセッションが削除された場合は `SessionNotFound` を返します。
    async fn acquire(&self, session_id: &SessionId) -> Result<SessionGuard, RepositoryError>;

    /// 後手を束縛し、更新後のスナップショットを返す
    async fn bind_second_participant(
        &self,
        session_id: &SessionId,
        client_id: ClientId,
    ) -> Result<Session, RepositoryError>;

    /// セッションを削除（存在しなくてもエラーにしない）
    async fn delete(&self, session_id: &SessionId);

    /// 全セッションのスナップショット（作成日時順）
    async fn list(&self) -> Vec<Session>;

    /// 接続が参加しているセッションの ID
    async fn find_by_participant(&self, client_id: &ClientId) -> Vec<SessionId>;
}
