//! 持ち時間の計算
//!
//! 受理した指し手の間隔を、その指し手を指した側の持ち時間から差し引きます。
//! セッション最初の指し手は基準時刻を記録するだけで、どちらの持ち時間も減りません。

use super::{
    entity::{Clocks, Session},
    value_object::{Role, Timestamp},
};

/// 指し手を受理した時刻を記録し、更新後の持ち時間を返す
pub fn record_move(session: &mut Session, mover: Role, now: Timestamp) -> Clocks {
    if let Some(last_move_at) = session.last_move_at {
        session.clocks.debit(mover, now.millis_since(last_move_at));
    }
    session.last_move_at = Some(now);
    session.clocks
}

/// 持ち時間が尽きた手番（White を先に判定）
pub fn is_expired(clocks: &Clocks) -> Option<Role> {
    Role::ALL
        .into_iter()
        .find(|role| clocks.remaining_millis(*role) <= 0)
}
