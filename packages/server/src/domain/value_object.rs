//! 値オブジェクト
//!
//! 生成時にバリデーションを行い、不正な値がドメイン層に入り込まないようにします。

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// ClientId の最大文字数
pub const CLIENT_ID_MAX_LENGTH: usize = 64;

/// 接続を識別する ID
///
/// WebSocket 接続時にクライアントが指定するか、省略時はサーバーが UUID を割り当てます。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientId(String);

impl ClientId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::ClientIdEmpty);
        }
        let length = value.chars().count();
        if length > CLIENT_ID_MAX_LENGTH {
            return Err(ValueObjectError::ClientIdTooLong {
                max: CLIENT_ID_MAX_LENGTH,
                actual: length,
            });
        }
        if value.chars().any(char::is_whitespace) {
            return Err(ValueObjectError::ClientIdContainsWhitespace);
        }
        Ok(Self(value))
    }

    /// サーバー側で一意な ClientId を割り当てる
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ClientId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClientId> for String {
    fn from(value: ClientId) -> Self {
        value.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ゲームセッションの ID（UUID v4 の文字列表現）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        match Uuid::parse_str(value.trim()) {
            Ok(uuid) => Ok(Self(uuid.hyphenated().to_string())),
            Err(_) => Err(ValueObjectError::InvalidSessionId(value)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for SessionId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SessionId> for String {
    fn from(value: SessionId) -> Self {
        value.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// SessionId の生成
pub struct SessionIdFactory;

impl SessionIdFactory {
    pub fn generate() -> SessionId {
        SessionId(Uuid::new_v4().hyphenated().to_string())
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// `earlier` からの経過ミリ秒。時計が巻き戻った場合は 0
    pub fn millis_since(&self, earlier: Timestamp) -> i64 {
        (self.0 - earlier.0).max(0)
    }
}

/// 対局者の手番（先手 = White, 後手 = Black）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    White,
    Black,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::White, Role::Black];

    pub fn opponent(self) -> Self {
        match self {
            Role::White => Role::Black,
            Role::Black => Role::White,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::White => "white",
            Role::Black => "black",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::White => f.write_str("White"),
            Role::Black => f.write_str("Black"),
        }
    }
}

/// 昇格先の駒
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl Promotion {
    pub fn parse(value: &str) -> Result<Self, ValueObjectError> {
        match value.to_ascii_lowercase().as_str() {
            "q" | "queen" => Ok(Promotion::Queen),
            "r" | "rook" => Ok(Promotion::Rook),
            "b" | "bishop" => Ok(Promotion::Bishop),
            "n" | "knight" => Ok(Promotion::Knight),
            _ => Err(ValueObjectError::InvalidPromotion(value.to_string())),
        }
    }
}

/// 盤上のマス目（file: a-h → 0-7, rank: 1-8 → 0-7）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    pub fn parse(value: &str) -> Result<Self, ValueObjectError> {
        let bytes = value.trim().as_bytes();
        match bytes {
            [file @ b'a'..=b'h', rank @ b'1'..=b'8'] => Ok(Self {
                file: file - b'a',
                rank: rank - b'1',
            }),
            _ => Err(ValueObjectError::InvalidSquare(value.to_string())),
        }
    }

    pub fn file(&self) -> u8 {
        self.file
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, self.rank + 1)
    }
}

/// クライアントから送られた指し手
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveDescriptor {
    /// 移動元・移動先のマス目による指定（`e2` → `e4`）
    Coordinates {
        from: Square,
        to: Square,
        promotion: Option<Promotion>,
    },
    /// 文字列による指定（UCI `e2e4` または SAN `Nf3`）
    Notation(String),
    /// マス目や昇格駒が読めなかった座標指定（常に非合法手）
    Unreadable(String),
}

impl fmt::Display for MoveDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveDescriptor::Coordinates { from, to, .. } => write!(f, "{}{}", from, to),
            MoveDescriptor::Notation(text) | MoveDescriptor::Unreadable(text) => {
                f.write_str(text)
            }
        }
    }
}
