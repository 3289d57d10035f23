//! InMemory Session Repository 実装
//!
//! ドメイン層が定義する SessionRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## ロックの構成
//!
//! ```text
//! sessions: Mutex<HashMap<SessionId, Arc<Mutex<Session>>>>
//!           ^^^^^ マップ全体（作成・削除・検索）   ^^^^^ セッション単位（指し手・参加・再戦）
//! ```
//!
//! マップのロックはセッションのロックを待つ間は保持しません。
//! そのため、あるセッションへの変更が他のセッションの処理を止めることはありません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ClientId, DEFAULT_CLOCK_MILLIS, Position, RepositoryError, Session, SessionGuard, SessionId,
    SessionIdFactory, SessionRepository, Timestamp,
};

type SessionSlot = Arc<Mutex<Session>>;

/// インメモリ Session Repository 実装
pub struct InMemorySessionRepository {
    /// セッション ID → セッション
    sessions: Mutex<HashMap<SessionId, SessionSlot>>,
    /// 新規セッションの持ち時間（ミリ秒）
    initial_clock_millis: i64,
}

impl InMemorySessionRepository {
    /// 新しい InMemorySessionRepository を作成
    pub fn new(initial_clock_millis: i64) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            initial_clock_millis,
        }
    }

    /// 未使用の ID でセッションを登録する
    async fn insert_with_fresh_id(&self, build: impl FnOnce(SessionId) -> Session) -> SessionId {
        let mut sessions = self.sessions.lock().await;
        let mut session_id = SessionIdFactory::generate();
        while sessions.contains_key(&session_id) {
            session_id = SessionIdFactory::generate();
        }
        let session = build(session_id.clone());
        sessions.insert(session_id.clone(), Arc::new(Mutex::new(session)));
        session_id
    }

    async fn slot(&self, session_id: &SessionId) -> Result<SessionSlot, RepositoryError> {
        let sessions = self.sessions.lock().await;
        sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| RepositoryError::SessionNotFound(session_id.as_str().to_string()))
    }

    /// `slot` が現在もマップに登録されているか
    async fn is_live(&self, session_id: &SessionId, slot: &SessionSlot) -> bool {
        let sessions = self.sessions.lock().await;
        sessions
            .get(session_id)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new(DEFAULT_CLOCK_MILLIS)
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(
        &self,
        position: Position,
        first: ClientId,
        created_at: Timestamp,
    ) -> SessionId {
        let initial_clock_millis = self.initial_clock_millis;
        self.insert_with_fresh_id(|id| {
            Session::new(id, position, first, initial_clock_millis, created_at)
        })
        .await
    }

    async fn create_paired(
        &self,
        position: Position,
        white: ClientId,
        black: ClientId,
        created_at: Timestamp,
    ) -> SessionId {
        let initial_clock_millis = self.initial_clock_millis;
        self.insert_with_fresh_id(|id| {
            Session::paired(id, position, white, black, initial_clock_millis, created_at)
        })
        .await
    }

    async fn get(&self, session_id: &SessionId) -> Result<Session, RepositoryError> {
        let slot = self.slot(session_id).await?;
        let session = slot.lock().await;
        Ok(session.clone())
    }

    async fn acquire(&self, session_id: &SessionId) -> Result<SessionGuard, RepositoryError> {
        let slot = self.slot(session_id).await?;
        let guard = slot.clone().lock_owned().await;

        // 待機中に削除（再戦による置き換え）されたセッションは扱わない
        if !self.is_live(session_id, &slot).await {
            return Err(RepositoryError::SessionNotFound(
                session_id.as_str().to_string(),
            ));
        }
        Ok(guard)
    }

    async fn bind_second_participant(
        &self,
        session_id: &SessionId,
        client_id: ClientId,
    ) -> Result<Session, RepositoryError> {
        let mut session = self.acquire(session_id).await?;
        session.bind_second_participant(client_id)?;
        Ok(session.clone())
    }

    async fn delete(&self, session_id: &SessionId) {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(session_id);
    }

    async fn list(&self) -> Vec<Session> {
        let slots: Vec<SessionSlot> = {
            let sessions = self.sessions.lock().await;
            sessions.values().cloned().collect()
        };

        let mut snapshots = Vec::with_capacity(slots.len());
        for slot in slots {
            snapshots.push(slot.lock().await.clone());
        }
        snapshots.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        snapshots
    }

    async fn find_by_participant(&self, client_id: &ClientId) -> Vec<SessionId> {
        self.list()
            .await
            .into_iter()
            .filter(|session| session.role_of(client_id).is_some())
            .map(|session| session.id)
            .collect()
    }
}
