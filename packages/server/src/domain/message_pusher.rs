//! MessagePusher trait 定義
//!
//! ドメイン層が必要とする「クライアントへの通知」のインターフェース。
//! 具体的な送信手段（WebSocket など）は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ClientId, MessagePushError, Notification};

/// 接続ごとの送信チャンネル（シリアライズ済みのフレームを流す）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// クライアントへメッセージを送信するための trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を登録する。同じ client_id が登録済みの場合は `AlreadyRegistered`
    async fn register_client(
        &self,
        client_id: ClientId,
        sender: PusherChannel,
    ) -> Result<(), MessagePushError>;

    /// 接続の登録を解除する（未登録でもエラーにしない）
    async fn unregister_client(&self, client_id: &ClientId);

    /// 特定のクライアントに送信する
    async fn push_to(
        &self,
        client_id: &ClientId,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;

    /// 複数のクライアントに送信する（一部の送信失敗は許容）
    async fn broadcast(
        &self,
        targets: Vec<ClientId>,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;
}
