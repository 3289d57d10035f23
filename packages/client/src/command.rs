//! Parsing of user input lines into client commands.

use sente_server::infrastructure::dto::websocket::{ClientMessage, MoveDto};
use thiserror::Error;

/// A command typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a session and play White
    New,
    /// Join a session by id and play Black
    Join(String),
    /// Submit a move (`e2e4`, `e7e8q`, `Nf3`, or `e2 e4`)
    Move(String),
    /// Offer a rematch in the current session
    Rematch,
    /// Accept the opponent's rematch offer
    Accept,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("no current session; use 'new' or 'join <id>' first")]
    NoSession,
}

pub const HELP: &str = "\
Commands:
  new                 create a session and play White
  join <session-id>   join a session and play Black
  move <move>         play a move: e2e4, e7e8q, Nf3 or 'e2 e4'
  <move>              same as 'move <move>'
  rematch             offer a rematch in the current session
  accept              accept the opponent's rematch offer
  help                show this help
  quit                exit";

impl Command {
    /// Parse one input line.
    ///
    /// A line that is not a known command word is treated as a move.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandError::Unknown(String::new()));
        };
        let rest: Vec<&str> = words.collect();

        match (head.to_ascii_lowercase().as_str(), rest.as_slice()) {
            ("new", []) => Ok(Command::New),
            ("new", _) => Err(CommandError::Usage("new")),
            ("join", [session_id]) => Ok(Command::Join(session_id.to_string())),
            ("join", _) => Err(CommandError::Usage("join <session-id>")),
            ("move" | "m", []) => Err(CommandError::Usage("move <move>")),
            ("move" | "m", words) => Ok(Command::Move(words.concat())),
            ("rematch", []) => Ok(Command::Rematch),
            ("accept", []) => Ok(Command::Accept),
            ("help" | "?", _) => Ok(Command::Help),
            ("quit" | "exit", _) => Ok(Command::Quit),
            (_, []) if looks_like_move(head) => Ok(Command::Move(head.to_string())),
            _ => Err(CommandError::Unknown(line.trim().to_string())),
        }
    }

    /// Frame to send for this command, if any.
    pub fn to_client_message(
        &self,
        current_session: Option<&str>,
    ) -> Result<Option<ClientMessage>, CommandError> {
        let session_id = || {
            current_session
                .map(str::to_string)
                .ok_or(CommandError::NoSession)
        };
        let message = match self {
            Command::New => ClientMessage::CreateSession,
            Command::Join(session_id) => ClientMessage::JoinSession {
                session_id: session_id.clone(),
            },
            Command::Move(text) => ClientMessage::SubmitMove {
                session_id: session_id()?,
                mv: MoveDto::Notation(text.clone()),
            },
            Command::Rematch => ClientMessage::RequestRematch {
                session_id: session_id()?,
            },
            Command::Accept => ClientMessage::AcceptRematch {
                session_id: session_id()?,
            },
            Command::Help | Command::Quit => return Ok(None),
        };
        Ok(Some(message))
    }
}

/// Bare words like `e4`, `Nf3`, `O-O` or `e2e4`
fn looks_like_move(word: &str) -> bool {
    let first = word.chars().next();
    (2..=7).contains(&word.len())
        && matches!(first, Some('a'..='h' | 'K' | 'Q' | 'R' | 'B' | 'N' | 'O'))
        && word.chars().any(|c| c.is_ascii_digit() || c == 'O')
}
