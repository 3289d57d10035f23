//! ドメイン層
//!
//! ゲームセッションのモデルと、外側の層に実装を委ねるインターフェース
//! （SessionRepository, MessagePusher, RulesOracle）を定義します。

pub mod clock_accountant;
pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod notification;
pub mod repository;
pub mod rules;
pub mod value_object;

pub use entity::{
    Clocks, DEFAULT_CLOCK_MILLIS, DEFAULT_CLOCK_SECONDS, DrawReason, EndReason, Participants,
    Session, SessionStatus,
};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use notification::Notification;
pub use repository::{SessionGuard, SessionRepository};
pub use rules::{AppliedMove, Position, RulesError, RulesOracle, Terminal};
pub use value_object::{
    ClientId, MoveDescriptor, Promotion, Role, SessionId, SessionIdFactory, Square, Timestamp,
};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
#[cfg(test)]
pub use rules::MockRulesOracle;
