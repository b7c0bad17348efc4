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

use super::Board;
use crate::defs::{Castling, PIECE_CHARS, Side, file_rank_to_square};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    UnknownPiece(char),
    RankDoesNotSumToEight(usize),
    WrongNumberOfRanks,
    MissingField(&'static str),
    BadSideToMove(String),
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::UnknownPiece(c) => write!(f, "unknown piece character '{c}'"),
            FenError::RankDoesNotSumToEight(r) => write!(f, "rank {r} does not sum to 8 files"),
            FenError::WrongNumberOfRanks => write!(f, "placement field does not have 8 ranks"),
            FenError::MissingField(name) => write!(f, "missing FEN field: {name}"),
            FenError::BadSideToMove(s) => write!(f, "bad side-to-move field: '{s}'"),
        }
    }
}

impl std::error::Error for FenError {}

/// Parses a FEN string into `board`, replacing its current content
/// entirely. On error the board is left reset-but-empty (see error
/// handling design): callers must not assume partial application.
pub fn read(board: &mut Board, fen: &str) -> Result<(), FenError> {
    board.reset();

    let mut fields = fen.split_whitespace();
    let placement = fields.next().ok_or(FenError::MissingField("placement"))?;

    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        board.reset();
        return Err(FenError::WrongNumberOfRanks);
    }

    // FEN ranks run 8 down to 1; our rank index is 0-based from rank 1.
    for (i, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - i;
        let mut file = 0usize;
        for c in rank_str.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip as usize;
                continue;
            }
            if file >= 8 {
                board.reset();
                return Err(FenError::RankDoesNotSumToEight(8 - rank));
            }
            let piece = match PIECE_CHARS.find(c) {
                Some(p) => p,
                None => {
                    board.reset();
                    return Err(FenError::UnknownPiece(c));
                }
            };
            if piece != 0 {
                let sq = file_rank_to_square(file, rank);
                board.add_piece(sq, piece as u8);
            }
            file += 1;
        }
        if file != 8 {
            board.reset();
            return Err(FenError::RankDoesNotSumToEight(8 - rank));
        }
    }

    let side_str = fields.next().ok_or(FenError::MissingField("side"))?;
    board.side = match side_str {
        "w" => Side::White,
        "b" => Side::Black,
        other => {
            board.reset();
            return Err(FenError::BadSideToMove(other.to_string()));
        }
    };

    let castling_str = fields.next().unwrap_or("-");
    let mut castle_perm = 0u8;
    for c in castling_str.chars() {
        castle_perm |= match c {
            'K' => Castling::WK,
            'Q' => Castling::WQ,
            'k' => Castling::BK,
            'q' => Castling::BQ,
            _ => 0,
        };
    }
    board.castle_perm = castle_perm;

    let ep_str = fields.next().unwrap_or("-");
    if ep_str != "-" && ep_str.len() == 2 {
        let bytes = ep_str.as_bytes();
        let file = (bytes[0] as char).to_ascii_lowercase() as usize - 'a' as usize;
        let rank = (bytes[1] as char) as usize - '1' as usize;
        if file < 8 && rank < 8 {
            board.en_passant = file_rank_to_square(file, rank);
        }
    }

    board.fifty_move = fields
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    board.full_move_count = fields
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(1);

    board.pos_key = board.generate_pos_key();
    Ok(())
}

/// Renders the current position back to a FEN string. Not used on the UCI
/// wire (the protocol never asks for it) but useful for diagnostics and
/// for round-trip tests.
pub fn write(board: &Board) -> String {
    let mut out = String::new();

    for rank in (0..8).rev() {
        let mut empty_run = 0;
        for file in 0..8 {
            let sq = file_rank_to_square(file, rank);
            let piece = board.squares[sq];
            if piece == crate::defs::Pieces::EMPTY {
                empty_run += 1;
                continue;
            }
            if empty_run > 0 {
                out.push_str(&empty_run.to_string());
                empty_run = 0;
            }
            out.push(PIECE_CHARS.chars().nth(piece as usize).unwrap());
        }
        if empty_run > 0 {
            out.push_str(&empty_run.to_string());
        }
        if rank > 0 {
            out.push('/');
        }
    }

    out.push(' ');
    out.push(if board.side == Side::White { 'w' } else { 'b' });

    out.push(' ');
    if board.castle_perm == 0 {
        out.push('-');
    } else {
        if board.castle_perm & Castling::WK != 0 {
            out.push('K');
        }
        if board.castle_perm & Castling::WQ != 0 {
            out.push('Q');
        }
        if board.castle_perm & Castling::BK != 0 {
            out.push('k');
        }
        if board.castle_perm & Castling::BQ != 0 {
            out.push('q');
        }
    }

    out.push(' ');
    if board.en_passant == crate::defs::NO_SQUARE {
        out.push('-');
    } else {
        let file = crate::defs::square_file(board.en_passant);
        let rank = crate::defs::square_rank(board.en_passant);
        out.push((b'a' + file as u8) as char);
        out.push((b'1' + rank as u8) as char);
    }

    out.push(' ');
    out.push_str(&board.fifty_move.to_string());
    out.push(' ');
    out.push_str(&board.full_move_count.to_string());

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::zobrist::ZobristRandoms;
    use std::sync::Arc;

    fn board() -> Board {
        Board::new(Arc::new(ZobristRandoms::new()))
    }

    #[test]
    fn reads_starting_position() {
        let mut b = board();
        read(&mut b, crate::defs::FEN_START_POSITION).unwrap();
        assert_eq!(b.side, Side::White);
        assert_eq!(b.castle_perm, 15);
        assert_eq!(b.piece_count[crate::defs::Pieces::WP as usize], 8);
    }

    #[test]
    fn round_trips_starting_position() {
        let mut b = board();
        read(&mut b, crate::defs::FEN_START_POSITION).unwrap();
        assert_eq!(write(&b), crate::defs::FEN_START_POSITION);
    }

    #[test]
    fn rejects_unknown_piece_letter() {
        let mut b = board();
        let err = read(&mut b, "8/8/8/8/8/8/8/Zzzzzzzz w - - 0 1").unwrap_err();
        assert!(matches!(err, FenError::UnknownPiece('Z')));
    }

    #[test]
    fn rejects_short_placement_field() {
        let mut b = board();
        let err = read(&mut b, "8/8/8 w - - 0 1").unwrap_err();
        assert_eq!(err, FenError::WrongNumberOfRanks);
    }

    #[test]
    fn defaults_halfmove_and_fullmove_when_absent() {
        let mut b = board();
        read(&mut b, "8/8/8/8/8/8/8/K6k w - -").unwrap();
        assert_eq!(b.fifty_move, 0);
        assert_eq!(b.full_move_count, 1);
    }
}
