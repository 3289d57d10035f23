//! ユースケースのテスト用ヘルパー

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use sente_shared::time::ManualClock;

use crate::{
    domain::{ClientId, MessagePushError, MessagePusher, Notification, PusherChannel},
    infrastructure::{repository::InMemorySessionRepository, rules::ChessRulesOracle},
};

/// 送信された通知を宛先ごとに記録する MessagePusher
#[derive(Default)]
pub struct RecordingPusher {
    registered: Mutex<HashSet<ClientId>>,
    sent: Mutex<Vec<(ClientId, Notification)>>,
}

impl RecordingPusher {
    /// 指定したクライアントに届いた通知（送信順）
    pub fn sent_to(&self, client_id: &ClientId) -> Vec<Notification> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(target, _)| target == client_id)
            .map(|(_, notification)| notification.clone())
            .collect()
    }

    pub fn total_sent(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }

    pub fn is_registered(&self, client_id: &ClientId) -> bool {
        self.registered.lock().unwrap().contains(client_id)
    }
}

#[async_trait]
impl MessagePusher for RecordingPusher {
    async fn register_client(
        &self,
        client_id: ClientId,
        _sender: PusherChannel,
    ) -> Result<(), MessagePushError> {
        let mut registered = self.registered.lock().unwrap();
        if !registered.insert(client_id.clone()) {
            return Err(MessagePushError::AlreadyRegistered(client_id.into_string()));
        }
        Ok(())
    }

    async fn unregister_client(&self, client_id: &ClientId) {
        self.registered.lock().unwrap().remove(client_id);
    }

    async fn push_to(
        &self,
        client_id: &ClientId,
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        self.sent
            .lock()
            .unwrap()
            .push((client_id.clone(), notification.clone()));
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ClientId>,
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        let mut sent = self.sent.lock().unwrap();
        for target in targets {
            sent.push((target, notification.clone()));
        }
        Ok(())
    }
}

pub fn client(id: &str) -> ClientId {
    ClientId::new(id.to_string()).unwrap()
}

/// ユースケースが共有する依存一式
pub struct Fixture {
    pub repository: Arc<InMemorySessionRepository>,
    pub pusher: Arc<RecordingPusher>,
    pub rules: Arc<ChessRulesOracle>,
    pub clock: Arc<ManualClock>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_clock_millis(180_000)
    }

    pub fn with_clock_millis(initial_clock_millis: i64) -> Self {
        Self {
            repository: Arc::new(InMemorySessionRepository::new(initial_clock_millis)),
            pusher: Arc::new(RecordingPusher::default()),
            rules: Arc::new(ChessRulesOracle::new()),
            clock: Arc::new(ManualClock::new(1_000_000)),
        }
    }
}
