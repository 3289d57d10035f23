//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - 接続の登録と `connected` 通知
//!
//! ### なぜこのテストが必要か
//! - 同じ client_id の接続が 2 つ同時に存在しないことを保証
//! - 接続直後にクライアントが自分の ID を知れることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続
//! - 異常系：接続中の client_id での再接続

use std::sync::Arc;

use crate::domain::{ClientId, MessagePushError, MessagePusher, Notification, PusherChannel};

use super::error::ConnectError;

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 参加者接続を実行
    ///
    /// # Arguments
    ///
    /// * `client_id` - 接続するクライアントの ID（Domain Model）
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 接続成功（`connected` 通知は送信キューに積まれている）
    /// * `Err(ConnectError)` - 接続失敗
    pub async fn execute(
        &self,
        client_id: ClientId,
        sender: PusherChannel,
    ) -> Result<(), ConnectError> {
        // 1. MessagePusher にクライアントを登録（重複は拒否される）
        self.message_pusher
            .register_client(client_id.clone(), sender)
            .await
            .map_err(|e| match e {
                MessagePushError::AlreadyRegistered(id) => ConnectError::DuplicateClientId(id),
                other => ConnectError::RegistrationFailed(other.to_string()),
            })?;

        // 2. 割り当てられた ID を本人に通知
        let notification = Notification::Connected {
            client_id: client_id.clone(),
        };
        if let Err(e) = self.message_pusher.push_to(&client_id, &notification).await {
            tracing::warn!("Failed to send connected to '{}': {}", client_id, e);
        }

        Ok(())
    }
}
