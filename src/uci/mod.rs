/* =======================================================================
Rustic is a chess playing engine.
Copyright (C) 2019-2024, Marcel Vanthoor
https://rustic-chess.org/

Rustic is written in the Rust programming language. It is an original
work, not derived from any engine that came before it. However, it does
use a lot of concepts which are well-known and are in use by most if not
all classical alpha/beta-based chess engines.

Rustic is free software: you can redistribute it and/or modify it under
the terms of the GNU General Public License version 3 as published by
the Free Software Foundation.

Rustic is distributed in the hope that it will be useful, but WITHOUT
ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General Public License
for more details.

You should have received a copy of the GNU General Public License along
with this program.  If not, see <http://www.gnu.org/licenses/>.
======================================================================= */

//! UCI notation and line formatting: turning engine-internal `Move`/
//! `SearchSummary` values into the strings GUIs expect, and turning GUI
//! strings back into moves and search parameters. No protocol dispatch
//! lives here; see [`crate::engine`] for that.

use crate::board::Board;
use crate::defs::{file_rank_to_square, square_file, square_rank, Piece, Pieces, Side, Square, FEN_START_POSITION};
use crate::movegen::defs::{from_square, promoted_piece, to_square, Move, Ordering, NO_MOVE};
use crate::movegen::generate_all;
use crate::search::defs::{SearchSummary, MATE, MAX_DEPTH_I32};

/// Parses a 4- or 5-character UCI move (`"e2e4"`, `"a7a8q"`) and matches it
/// against the moves pseudo-legal in `board`. Returns `NO_MOVE` if the
/// string is malformed or does not name a move the generator produced —
/// castling notation needs no special case, since a legal castle already
/// shows up in the generated list with matching from/to squares.
pub fn parse_uci_move(board: &Board, ordering: &Ordering, input: &str) -> Move {
    let bytes = input.as_bytes();
    if !(4..=5).contains(&bytes.len()) {
        return NO_MOVE;
    }

    let from = match square_from_algebraic(&input[0..2]) {
        Some(sq) => sq,
        None => return NO_MOVE,
    };
    let to = match square_from_algebraic(&input[2..4]) {
        Some(sq) => sq,
        None => return NO_MOVE,
    };

    let promoted = if bytes.len() == 5 {
        match promotion_piece(bytes[4], board.side) {
            Some(p) => p,
            None => return NO_MOVE,
        }
    } else {
        Pieces::EMPTY
    };

    let list = generate_all(board, ordering, board.ply);
    for i in 0..list.len() {
        let mv = list.get(i).mv;
        if from_square(mv) == from && to_square(mv) == to && promoted_piece(mv) == promoted {
            return mv;
        }
    }

    NO_MOVE
}

fn square_from_algebraic(s: &str) -> Option<Square> {
    let b = s.as_bytes();
    if b.len() != 2 {
        return None;
    }
    let file = b[0];
    let rank = b[1];
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return None;
    }
    Some(file_rank_to_square((file - b'a') as usize, (rank - b'1') as usize))
}

fn promotion_piece(c: u8, side: Side) -> Option<Piece> {
    let piece = match (c, side) {
        (b'q', Side::White) => Pieces::WQ,
        (b'q', Side::Black) => Pieces::BQ,
        (b'r', Side::White) => Pieces::WR,
        (b'r', Side::Black) => Pieces::BR,
        (b'b', Side::White) => Pieces::WB,
        (b'b', Side::Black) => Pieces::BB,
        (b'n', Side::White) => Pieces::WN,
        (b'n', Side::Black) => Pieces::BN,
        _ => return None,
    };
    Some(piece)
}

fn algebraic(sq: Square) -> String {
    let file = (b'a' + square_file(sq) as u8) as char;
    let rank = (b'1' + square_rank(sq) as u8) as char;
    format!("{file}{rank}")
}

fn promotion_char(p: Piece) -> char {
    match p {
        Pieces::WQ | Pieces::BQ => 'q',
        Pieces::WR | Pieces::BR => 'r',
        Pieces::WB | Pieces::BB => 'b',
        Pieces::WN | Pieces::BN => 'n',
        _ => unreachable!("promotion_char called with a non-promotion piece"),
    }
}

/// `NO_MOVE` prints as `"0000"`, the UCI convention for "no move" (used
/// when the engine is asked to move from a position with none available).
pub fn move_to_uci_string(mv: Move) -> String {
    if mv == NO_MOVE {
        return "0000".to_string();
    }

    let mut s = format!("{}{}", algebraic(from_square(mv)), algebraic(to_square(mv)));
    let promoted = promoted_piece(mv);
    if promoted != Pieces::EMPTY {
        s.push(promotion_char(promoted));
    }
    s
}

/// Splits the text following `position` into a FEN and an optional
/// trailing move list, handling both `startpos` and `fen ...` forms.
pub fn split_position_args(after_position: &str) -> (String, Option<String>) {
    let after_position = after_position.trim_start();

    if let Some(rest) = after_position.strip_prefix("startpos") {
        let moves = rest.trim_start().strip_prefix("moves").map(|m| m.trim_start().to_string());
        return (FEN_START_POSITION.to_string(), moves);
    }

    if let Some(rest) = after_position.strip_prefix("fen") {
        let rest = rest.trim_start();
        if let Some(idx) = rest.find(" moves ") {
            let fen = rest[..idx].trim_end().to_string();
            let moves = rest[idx + " moves ".len()..].trim_start().to_string();
            return (fen, Some(moves));
        }
        return (rest.trim_end().to_string(), None);
    }

    (FEN_START_POSITION.to_string(), None)
}

/// Parsed `go` parameters. `nodes` is accepted and logged but never
/// enforced — the source this engine's search loop was modeled on parses
/// the same token into a local variable it never checks either.
pub struct GoOptions {
    pub depth: Option<i32>,
    pub movetime: Option<u64>,
}

pub fn parse_go(args: &str) -> GoOptions {
    let mut depth = None;
    let mut movetime = None;
    let mut nodes: Option<u64> = None;

    let mut tokens = args.split_whitespace();
    while let Some(tok) = tokens.next() {
        match tok {
            "depth" => depth = tokens.next().and_then(|v| v.parse().ok()),
            "movetime" => movetime = tokens.next().and_then(|v| v.parse().ok()),
            "nodes" => nodes = tokens.next().and_then(|v| v.parse().ok()),
            _ => (),
        }
    }

    if let Some(n) = nodes {
        tracing::debug!(nodes = n, "go nodes received but search has no node budget to enforce it against");
    }

    GoOptions { depth, movetime }
}

pub fn format_info_line(summary: &SearchSummary) -> String {
    let score_str = if summary.score.abs() >= MATE - MAX_DEPTH_I32 {
        let mate_in = (MATE - summary.score.abs() + 1) / 2;
        let signed = if summary.score < 0 { -mate_in } else { mate_in };
        format!("mate {signed}")
    } else {
        format!("cp {}", summary.score)
    };

    let pv_str = summary
        .pv
        .iter()
        .map(|&m| move_to_uci_string(m))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "info depth {} score {} nodes {} nps {} time {} pv {}",
        summary.depth, score_str, summary.nodes, summary.nps, summary.time_ms, pv_str
    )
}

pub fn format_bestmove(mv: Move) -> String {
    format!("bestmove {}", move_to_uci_string(mv))
}
