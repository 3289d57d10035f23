//! UseCase: セッション一覧の取得

use std::sync::Arc;

use crate::domain::{Session, SessionRepository};

/// セッション一覧取得のユースケース
pub struct GetSessionsUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl GetSessionsUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// 全セッションのスナップショット（作成日時順）
    pub async fn execute(&self) -> Vec<Session> {
        self.repository.list().await
    }
}
