//! UseCase: セッション詳細の取得

use std::sync::Arc;

use crate::domain::{Session, SessionId, SessionRepository};

use super::error::GetSessionDetailError;

/// セッション詳細取得のユースケース
pub struct GetSessionDetailUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl GetSessionDetailUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// セッション詳細を取得
    ///
    /// # Returns
    ///
    /// * `Ok(Session)` - セッションのスナップショット
    /// * `Err(GetSessionDetailError::InvalidSessionId)` - ID の形式が不正
    /// * `Err(GetSessionDetailError::SessionNotFound)` - セッションが存在しない
    pub async fn execute(&self, session_id: String) -> Result<Session, GetSessionDetailError> {
        let id = SessionId::new(session_id.clone())
            .map_err(|_| GetSessionDetailError::InvalidSessionId(session_id.clone()))?;
        self.repository
            .get(&id)
            .await
            .map_err(|_| GetSessionDetailError::SessionNotFound(session_id))
    }
}
