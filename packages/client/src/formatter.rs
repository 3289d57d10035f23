//! Message formatting utilities for client display.

use sente_server::{
    domain::Role,
    infrastructure::dto::websocket::{ClocksDto, ServerMessage},
};

use crate::domain::GameTracker;

const RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a board from the placement field of a FEN string
    ///
    /// # Arguments
    ///
    /// * `fen` - Position in Forsyth-Edwards Notation
    /// * `perspective` - Side drawn at the bottom
    ///
    /// # Returns
    ///
    /// Eight ranks with file and rank labels. Uppercase pieces are White.
    pub fn format_board(fen: &str, perspective: Role) -> String {
        let placement = fen.split_whitespace().next().unwrap_or_default();
        let mut rows: Vec<(usize, Vec<char>)> = placement
            .split('/')
            .take(8)
            .enumerate()
            .map(|(index, rank)| {
                let mut squares = Vec::with_capacity(8);
                for c in rank.chars() {
                    match c.to_digit(10) {
                        Some(empty) => squares.extend(std::iter::repeat_n('.', empty as usize)),
                        None => squares.push(c),
                    }
                }
                squares.resize(8, '.');
                (8 - index, squares)
            })
            .collect();
        let mut files: Vec<char> = ('a'..='h').collect();
        if perspective == Role::Black {
            rows.reverse();
            files.reverse();
            for (_, squares) in &mut rows {
                squares.reverse();
            }
        }

        let mut output = String::new();
        for (label, squares) in &rows {
            let squares: Vec<String> = squares.iter().map(char::to_string).collect();
            output.push_str(&format!("{} {}\n", label, squares.join(" ")));
        }
        let footer: Vec<String> = files.iter().map(char::to_string).collect();
        output.push_str(&format!("  {}\n", footer.join(" ")));
        output
    }

    /// Format remaining time as `m:ss.s` per side
    pub fn format_clocks(clocks: &ClocksDto) -> String {
        format!(
            "White {} | Black {}",
            format_seconds(clocks.white),
            format_seconds(clocks.black)
        )
    }

    /// Side to move from the active-color field of a FEN string
    pub fn side_to_move(fen: &str) -> Option<Role> {
        match fen.split_whitespace().nth(1) {
            Some("w") => Some(Role::White),
            Some("b") => Some(Role::Black),
            _ => None,
        }
    }

    /// Format a server frame for display, given the already-updated tracker
    pub fn format_server_message(message: &ServerMessage, tracker: &GameTracker) -> String {
        match message {
            ServerMessage::Connected { client_id } => {
                format!("\nConnected as '{}'. Type 'help' for commands.\n", client_id)
            }
            ServerMessage::SessionCreated { session_id, role } => format!(
                "\nSession created: {}\nYou play {}. Share the id and wait for an opponent.\n",
                session_id, role
            ),
            ServerMessage::SessionJoined { session_id, role } => {
                format!("\nJoined session {} as {}.\n", session_id, role)
            }
            ServerMessage::SessionStarted { .. } => "\nGame started. White to move.\n".to_string(),
            ServerMessage::GameState { fen, clocks } => {
                let mut output = String::from("\n");
                output.push_str(&Self::format_board(fen, tracker.perspective()));
                output.push_str(&Self::format_clocks(clocks));
                output.push('\n');
                if let Some(side) = Self::side_to_move(fen) {
                    let yours = if tracker.role == Some(side) { " (you)" } else { "" };
                    output.push_str(&format!("{} to move{}\n", side, yours));
                }
                output
            }
            ServerMessage::InvalidMove { .. } => {
                "\nIllegal move. The position is unchanged.\n".to_string()
            }
            ServerMessage::GameEnded { result } => format!(
                "\n{RULE}\nGame over: {}\nType 'rematch' to play again.\n{RULE}\n",
                result
            ),
            ServerMessage::RematchOffered { .. } => {
                "\nYour opponent offers a rematch. Type 'accept' to play.\n".to_string()
            }
            ServerMessage::NewSessionStarted { session_id, role } => format!(
                "\nRematch started: {}\nYou play {}.\n",
                session_id, role
            ),
            ServerMessage::JoinError { reason } => format!("\nCould not join: {}\n", reason),
        }
    }

    /// Format a raw text frame (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}

fn format_seconds(seconds: f64) -> String {
    let tenths = (seconds.max(0.0) * 10.0).round() as u64;
    format!("{}:{:02}.{}", tenths / 600, tenths / 10 % 60, tenths % 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn test_format_board_from_white() {
        // テスト項目: 白視点では 8 段目が上、a 筋が左に表示される
        // given (前提条件):
        let fen = START;

        // when (操作):
        let result = MessageFormatter::format_board(fen, Role::White);

        // then (期待する結果):
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines[0], "8 r n b q k b n r");
        assert_eq!(lines[3], "5 . . . . . . . .");
        assert_eq!(lines[7], "1 R N B Q K B N R");
        assert_eq!(lines[8], "  a b c d e f g h");
    }

    #[test]
    fn test_format_board_from_black() {
        // テスト項目: 黒視点では 1 段目が上、h 筋が左に表示される
        // given (前提条件):
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";

        // when (操作):
        let result = MessageFormatter::format_board(fen, Role::Black);

        // then (期待する結果):
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines[0], "1 R N B K Q B N R");
        assert_eq!(lines[1], "2 P P P . P P P P");
        assert_eq!(lines[3], "4 . . . P . . . .");
        assert_eq!(lines[7], "8 r n b k q b n r");
        assert_eq!(lines[8], "  h g f e d c b a");
    }

    #[test]
    fn test_format_clocks() {
        // テスト項目: 残り時間が m:ss.s 形式で表示される
        // given (前提条件):
        let clocks = ClocksDto {
            white: 180.0,
            black: 61.46,
        };

        // when (操作):
        let result = MessageFormatter::format_clocks(&clocks);

        // then (期待する結果):
        assert_eq!(result, "White 3:00.0 | Black 1:01.5");
    }

    #[test]
    fn test_format_clocks_never_negative() {
        // テスト項目: 負の残り時間は 0 として表示される
        // given (前提条件):
        let clocks = ClocksDto {
            white: -0.4,
            black: 0.04,
        };

        // when (操作):
        let result = MessageFormatter::format_clocks(&clocks);

        // then (期待する結果):
        assert_eq!(result, "White 0:00.0 | Black 0:00.0");
    }

    #[test]
    fn test_format_game_state_marks_own_turn() {
        // テスト項目: 自分の手番のときに (you) が付く
        // given (前提条件):
        let mut tracker = GameTracker::new(Some("bob".to_string()));
        tracker.role = Some(Role::Black);
        let message = ServerMessage::GameState {
            fen: "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1".to_string(),
            clocks: ClocksDto {
                white: 180.0,
                black: 180.0,
            },
        };

        // when (操作):
        let result = MessageFormatter::format_server_message(&message, &tracker);

        // then (期待する結果):
        assert!(result.contains("Black to move (you)"));
        assert!(result.contains("  h g f e d c b a"));
    }

    #[test]
    fn test_format_game_ended() {
        // テスト項目: 対局結果と再戦の案内が表示される
        // given (前提条件):
        let message = ServerMessage::GameEnded {
            result: "Black wins by checkmate".to_string(),
        };

        // when (操作):
        let result = MessageFormatter::format_server_message(&message, &GameTracker::default());

        // then (期待する結果):
        assert!(result.contains("Game over: Black wins by checkmate"));
        assert!(result.contains("rematch"));
    }

    #[test]
    fn test_format_join_error() {
        // テスト項目: 参加失敗の理由がそのまま表示される
        // given (前提条件):
        let message = ServerMessage::JoinError {
            reason: "Game already full".to_string(),
        };

        // when (操作):
        let result = MessageFormatter::format_server_message(&message, &GameTracker::default());

        // then (期待する結果):
        assert!(result.contains("Could not join: Game already full"));
    }

    #[test]
    fn test_format_raw_message() {
        // テスト項目: パースできないメッセージはそのまま表示される
        // given (前提条件):
        let text = "unknown message format";

        // when (操作):
        let result = MessageFormatter::format_raw_message(text);

        // then (期待する結果):
        assert!(result.contains("unknown message format"));
        assert!(result.contains("Received:"));
    }
}
