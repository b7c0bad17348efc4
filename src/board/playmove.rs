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

use super::defs::CASTLE_PERM;
use super::history::Undo;
use super::Board;
use crate::defs::{Pieces, Side, Squares};
use crate::movegen::defs::{captured_piece, from_square, is_castle, is_en_passant, is_pawn_start, promoted_piece, to_square, Move};

/// Plays `mv` on `board`, rejecting it (and rolling back) if it leaves the
/// moving side's own king in check. Returns `false` in that case; the board
/// is left exactly as it was before the call either way.
pub fn make_move(board: &mut Board, mv: Move) -> bool {
    let from = from_square(mv);
    let to = to_square(mv);
    let side = board.side;

    let undo = Undo {
        mv,
        castle_perm: board.castle_perm,
        en_passant: board.en_passant,
        fifty_move: board.fifty_move,
        pos_key: board.pos_key,
        full_move_count: board.full_move_count,
    };

    if is_en_passant(mv) {
        let captured_sq = if side == Side::White { to - 10 } else { to + 10 };
        board.clear_piece(captured_sq);
    } else if is_castle(mv) {
        let (rook_from, rook_to) = match to {
            Squares::G1 => (Squares::H1, Squares::F1),
            Squares::C1 => (Squares::A1, Squares::D1),
            Squares::G8 => (Squares::H8, Squares::F8),
            Squares::C8 => (Squares::A8, Squares::D8),
            _ => unreachable!("castle move with an impossible destination square"),
        };
        board.move_piece(rook_from, rook_to);
    }

    board.clear_en_passant();

    board.hash_castling_out();
    board.castle_perm &= CASTLE_PERM[from] & CASTLE_PERM[to];
    board.hash_castling_in();

    let captured = captured_piece(mv);
    if captured != Pieces::EMPTY {
        board.clear_piece(to);
        board.fifty_move = 0;
    } else {
        board.fifty_move += 1;
    }

    board.history.push(undo);
    board.his_ply += 1;
    board.ply += 1;
    if side == Side::Black {
        board.full_move_count += 1;
    }

    let piece = board.squares[from];
    if crate::defs::PIECE_IS_PAWN[piece as usize] {
        board.fifty_move = 0;
        if is_pawn_start(mv) {
            let ep_sq = if side == Side::White { from + 10 } else { from - 10 };
            board.set_en_passant(ep_sq);
        }
    }

    board.move_piece(from, to);

    let promoted = promoted_piece(mv);
    if promoted != Pieces::EMPTY {
        board.clear_piece(to);
        board.add_piece(to, promoted);
    }

    board.swap_side();

    if board.in_check(side) {
        take_move(board);
        return false;
    }

    true
}

/// Reverses the most recent `make_move`, restoring the position exactly
/// (including Zobrist key) to what it was beforehand.
pub fn take_move(board: &mut Board) {
    board.his_ply -= 1;
    board.ply -= 1;

    let undo = board.history.pop();
    let mv = undo.mv;
    let from = from_square(mv);
    let to = to_square(mv);

    board.swap_side();
    let side = board.side;

    if is_en_passant(mv) {
        let captured_sq = if side == Side::White { to - 10 } else { to + 10 };
        board.add_piece(captured_sq, if side == Side::White { Pieces::BP } else { Pieces::WP });
    } else if is_castle(mv) {
        let (rook_from, rook_to) = match to {
            Squares::G1 => (Squares::H1, Squares::F1),
            Squares::C1 => (Squares::A1, Squares::D1),
            Squares::G8 => (Squares::H8, Squares::F8),
            Squares::C8 => (Squares::A8, Squares::D8),
            _ => unreachable!("castle move with an impossible destination square"),
        };
        board.move_piece(rook_to, rook_from);
    }

    let promoted = promoted_piece(mv);
    if promoted != Pieces::EMPTY {
        board.clear_piece(to);
        board.add_piece(from, if side == Side::White { Pieces::WP } else { Pieces::BP });
    } else {
        board.move_piece(to, from);
    }

    let captured = captured_piece(mv);
    if captured != Pieces::EMPTY {
        board.add_piece(to, captured);
    }

    board.castle_perm = undo.castle_perm;
    board.en_passant = undo.en_passant;
    board.fifty_move = undo.fifty_move;
    board.pos_key = undo.pos_key;
    board.full_move_count = undo.full_move_count;
}

/// Makes the "do nothing but pass the move" pseudo-move used by null-move
/// pruning. Not reachable from `make_move`/`take_move`: the search calls
/// this pair directly around its null-move probe.
pub fn make_null_move(board: &mut Board) -> Undo {
    let undo = Undo {
        mv: 0,
        castle_perm: board.castle_perm,
        en_passant: board.en_passant,
        fifty_move: board.fifty_move,
        pos_key: board.pos_key,
        full_move_count: board.full_move_count,
    };

    board.clear_en_passant();
    board.his_ply += 1;
    board.ply += 1;
    board.swap_side();

    undo
}

pub fn take_null_move(board: &mut Board, undo: Undo) {
    board.his_ply -= 1;
    board.ply -= 1;
    board.swap_side();

    board.castle_perm = undo.castle_perm;
    board.en_passant = undo.en_passant;
    board.fifty_move = undo.fifty_move;
    board.pos_key = undo.pos_key;
    board.full_move_count = undo.full_move_count;
}
