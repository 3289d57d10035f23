pub mod chess_rules;

pub use chess_rules::ChessRulesOracle;
