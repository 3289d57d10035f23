//! `chess` クレートを使った RulesOracle 実装
//!
//! 局面は FEN 文字列として保持し、指し手のたびに `chess::Board` へ復元して検証します。
//! `chess::Board` は 50 手ルールのカウンタと同一局面の履歴を持たないため、
//! それぞれ FEN の halfmove フィールドと `Position::history` で補います。

use std::str::FromStr;

use ::chess::{Board, BoardStatus, ChessMove, Color, File, Piece, Rank};

use crate::domain::{
    AppliedMove, DrawReason, MoveDescriptor, Position, Promotion, Role, RulesError, RulesOracle,
    Square, Terminal,
};

/// 千日手と判定する同一局面の出現回数
const REPETITION_LIMIT: usize = 3;

/// 50 手ルール（100 半手）
const FIFTY_MOVE_HALFMOVES: u32 = 100;

/// 標準チェスのルールオラクル
#[derive(Debug, Clone, Copy, Default)]
pub struct ChessRulesOracle;

impl ChessRulesOracle {
    pub fn new() -> Self {
        Self
    }
}

/// FEN の各フィールドを分解したもの
struct ParsedPosition {
    board: Board,
    halfmove_clock: u32,
    fullmove_number: u32,
}

fn parse_position(position: &Position) -> Result<ParsedPosition, RulesError> {
    let fen = position.fen();
    let board = Board::from_str(&to_board_notation(fen))
        .map_err(|_| RulesError::InvalidPosition(format!("unparsable FEN '{}'", fen)))?;
    let mut counters = fen.split_whitespace().skip(4);
    let halfmove_clock = counters
        .next()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let fullmove_number = counters
        .next()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);
    Ok(ParsedPosition {
        board,
        halfmove_clock,
        fullmove_number,
    })
}

/// 同一局面判定に使うキー（駒配置・手番・キャスリング権・アンパッサン）
///
/// `chess::Board` はアンパッサン欄に 2 マス進んだポーン自身のマスを書くため、
/// 標準 FEN の通過マス（White の手番なら 6 段目、Black の手番なら 3 段目）に書き換えます。
fn repetition_key(board: &Board) -> String {
    let text = board.to_string();
    let mut fields: Vec<String> = text
        .split_whitespace()
        .take(4)
        .map(str::to_string)
        .collect();
    if let Some(en_passant) = fields.get_mut(3)
        && en_passant.as_str() != "-"
        && let Some(file) = en_passant.chars().next()
    {
        let rank = match board.side_to_move() {
            Color::White => '6',
            Color::Black => '3',
        };
        *en_passant = format!("{}{}", file, rank);
    }
    fields.join(" ")
}

/// 標準 FEN のアンパッサン欄を `chess::Board` の表記（ポーンのマス）に戻す
fn to_board_notation(fen: &str) -> String {
    let mut fields: Vec<String> = fen.split_whitespace().map(str::to_string).collect();
    if let [_, side, _, en_passant, ..] = fields.as_mut_slice() {
        let mut chars = en_passant.chars();
        let pawn_rank = match (side.as_str(), chars.next(), chars.next(), chars.next()) {
            ("w", Some(file), Some('6'), None) => Some((file, '5')),
            ("b", Some(file), Some('3'), None) => Some((file, '4')),
            _ => None,
        };
        if let Some((file, rank)) = pawn_rank {
            *en_passant = format!("{}{}", file, rank);
        }
    }
    fields.join(" ")
}

fn to_fen(board: &Board, halfmove_clock: u32, fullmove_number: u32) -> String {
    format!(
        "{} {} {}",
        repetition_key(board),
        halfmove_clock,
        fullmove_number
    )
}

fn to_role(color: Color) -> Role {
    match color {
        Color::White => Role::White,
        Color::Black => Role::Black,
    }
}

fn to_square(square: Square) -> ::chess::Square {
    ::chess::Square::make_square(
        Rank::from_index(square.rank() as usize),
        File::from_index(square.file() as usize),
    )
}

fn to_piece(promotion: Promotion) -> Piece {
    match promotion {
        Promotion::Queen => Piece::Queen,
        Promotion::Rook => Piece::Rook,
        Promotion::Bishop => Piece::Bishop,
        Promotion::Knight => Piece::Knight,
    }
}

/// 座標指定の指し手を組み立てる
///
/// 昇格指定は、ポーンが最終段に到達する指し手にだけ適用します。
/// それ以外の指し手に付いた昇格指定は無視されます。
fn coordinates_to_move(
    board: &Board,
    from: Square,
    to: Square,
    promotion: Option<Promotion>,
) -> ChessMove {
    let last_rank = match board.side_to_move() {
        Color::White => 7,
        Color::Black => 0,
    };
    let promotes = board.piece_on(to_square(from)) == Some(Piece::Pawn) && to.rank() == last_rank;
    let promotion = if promotes {
        promotion.map(to_piece)
    } else {
        None
    };
    ChessMove::new(to_square(from), to_square(to), promotion)
}

/// UCI 形式（`e2e4`, `e7e8q`）なら座標指定として解釈する
fn parse_uci(text: &str) -> Option<(Square, Square, Option<Promotion>)> {
    if !text.is_ascii() || !(text.len() == 4 || text.len() == 5) {
        return None;
    }
    let from = Square::parse(&text[0..2]).ok()?;
    let to = Square::parse(&text[2..4]).ok()?;
    let promotion = match text.get(4..) {
        Some("") | None => None,
        Some(piece) => Some(Promotion::parse(piece).ok()?),
    };
    Some((from, to, promotion))
}

fn resolve_move(board: &Board, mv: &MoveDescriptor) -> Result<ChessMove, RulesError> {
    match mv {
        MoveDescriptor::Coordinates {
            from,
            to,
            promotion,
        } => Ok(coordinates_to_move(board, *from, *to, *promotion)),
        MoveDescriptor::Notation(text) => match parse_uci(text) {
            Some((from, to, promotion)) => Ok(coordinates_to_move(board, from, to, promotion)),
            None => ChessMove::from_san(board, text)
                .map_err(|_| RulesError::IllegalMove(text.clone())),
        },
        MoveDescriptor::Unreadable(text) => Err(RulesError::IllegalMove(text.clone())),
    }
}

fn square_color(square: ::chess::Square) -> usize {
    (square.get_rank().to_index() + square.get_file().to_index()) % 2
}

/// 駒不足（どちらもチェックメイトできない）の判定
///
/// キング同士、キングと小駒 1 つ、または全ビショップが同じ色のマスにある場合。
fn is_insufficient_material(board: &Board) -> bool {
    let heavy = *board.pieces(Piece::Pawn) | *board.pieces(Piece::Rook) | *board.pieces(Piece::Queen);
    if heavy.popcnt() > 0 {
        return false;
    }

    let knights = *board.pieces(Piece::Knight);
    let bishops = *board.pieces(Piece::Bishop);
    if (knights | bishops).popcnt() <= 1 {
        return true;
    }
    if knights.popcnt() > 0 {
        return false;
    }

    let mut colors = bishops.map(square_color);
    match colors.next() {
        Some(first) => colors.all(|color| color == first),
        None => true,
    }
}

fn terminal_state(board: &Board, halfmove_clock: u32, history: &[String]) -> Option<Terminal> {
    match board.status() {
        BoardStatus::Checkmate => return Some(Terminal::Checkmate),
        BoardStatus::Stalemate => return Some(Terminal::Draw(DrawReason::Stalemate)),
        BoardStatus::Ongoing => {}
    }
    if is_insufficient_material(board) {
        return Some(Terminal::Draw(DrawReason::InsufficientMaterial));
    }
    if let Some(current) = history.last()
        && history.iter().filter(|key| *key == current).count() >= REPETITION_LIMIT
    {
        return Some(Terminal::Draw(DrawReason::Repetition));
    }
    if halfmove_clock >= FIFTY_MOVE_HALFMOVES {
        return Some(Terminal::Draw(DrawReason::FiftyMoveRule));
    }
    None
}

impl RulesOracle for ChessRulesOracle {
    fn initial_position(&self) -> Position {
        let board = Board::default();
        Position::new(to_fen(&board, 0, 1), vec![repetition_key(&board)])
    }

    fn side_to_move(&self, position: &Position) -> Result<Role, RulesError> {
        let parsed = parse_position(position)?;
        Ok(to_role(parsed.board.side_to_move()))
    }

    fn apply_move(
        &self,
        position: &Position,
        mv: &MoveDescriptor,
    ) -> Result<AppliedMove, RulesError> {
        let parsed = parse_position(position)?;
        let board = parsed.board;
        let chess_move = resolve_move(&board, mv)?;
        if !board.legal(chess_move) {
            return Err(RulesError::IllegalMove(mv.to_string()));
        }

        let irreversible = board.piece_on(chess_move.get_source()) == Some(Piece::Pawn)
            || board.piece_on(chess_move.get_dest()).is_some();
        let next = board.make_move_new(chess_move);

        let halfmove_clock = if irreversible {
            0
        } else {
            parsed.halfmove_clock + 1
        };
        let fullmove_number = match board.side_to_move() {
            Color::Black => parsed.fullmove_number + 1,
            Color::White => parsed.fullmove_number,
        };

        let key = repetition_key(&next);
        let history = if irreversible {
            vec![key]
        } else {
            let mut history = position.history().to_vec();
            history.push(key);
            history
        };

        let terminal = terminal_state(&next, halfmove_clock, &history);
        Ok(AppliedMove {
            position: Position::new(to_fen(&next, halfmove_clock, fullmove_number), history),
            terminal,
        })
    }
}
