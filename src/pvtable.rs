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

//! A single direct-mapped, always-replace principal-variation table. This
//! is deliberately not a full transposition table: one slot per index,
//! no depth or bound kept, overwritten unconditionally on every store.
//! Good enough to remember the best move found for move ordering and to
//! recover the PV line for `info` output; nothing else leans on it.

use crate::board::Board;
use crate::board::playmove::{make_move, take_move};
use crate::board::zobrist::ZobristKey;
use crate::defs::MAX_DEPTH;
use crate::movegen::defs::{Move, NO_MOVE};

/// 2^16 entries, matching the source's fixed table size.
const SIZE: usize = 1 << 16;

#[derive(Copy, Clone)]
struct Entry {
    mv: Move,
    pos_key: ZobristKey,
}

pub struct PvTable {
    entries: Box<[Entry]>,
}

impl PvTable {
    pub fn new() -> Self {
        Self {
            entries: vec![Entry { mv: NO_MOVE, pos_key: 0 }; SIZE].into_boxed_slice(),
        }
    }

    pub fn clear(&mut self) {
        for e in self.entries.iter_mut() {
            e.mv = NO_MOVE;
            e.pos_key = 0;
        }
    }

    fn index(pos_key: ZobristKey) -> usize {
        (pos_key as usize) & (SIZE - 1)
    }

    pub fn store(&mut self, pos_key: ZobristKey, mv: Move) {
        let i = Self::index(pos_key);
        self.entries[i] = Entry { mv, pos_key };
    }

    pub fn probe(&self, pos_key: ZobristKey) -> Move {
        let entry = self.entries[Self::index(pos_key)];
        if entry.pos_key == pos_key {
            entry.mv
        } else {
            NO_MOVE
        }
    }

    /// Walks the table forward from the current position, playing each
    /// stored move to follow the chain (so later probes see the position
    /// they were actually stored for), then unwinds the board back to
    /// where it started. Stops early if a stored move is no longer legal
    /// in the position reached, or once `max_len` moves have been
    /// collected.
    pub fn collect_line(&self, board: &mut Board, max_len: usize) -> Vec<Move> {
        let mut line = Vec::with_capacity(max_len.min(MAX_DEPTH));
        let mut played = 0usize;

        while line.len() < max_len {
            let mv = self.probe(board.pos_key);
            if mv == NO_MOVE {
                break;
            }
            if !make_move(board, mv) {
                break;
            }
            played += 1;
            line.push(mv);
        }

        for _ in 0..played {
            take_move(board);
        }

        line
    }
}

impl Default for PvTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fen;
    use crate::board::zobrist::ZobristRandoms;
    use crate::movegen::defs::encode_move;
    use std::sync::Arc;

    fn from_fen(f: &str) -> Board {
        let mut b = Board::new(Arc::new(ZobristRandoms::new()));
        fen::read(&mut b, f).unwrap();
        b
    }

    #[test]
    fn store_then_probe_returns_the_move() {
        let mut t = PvTable::new();
        let mv = encode_move(21, 31, 0, 0, false, true, false);
        t.store(12345, mv);
        assert_eq!(t.probe(12345), mv);
    }

    #[test]
    fn probe_misses_on_key_collision_with_different_key() {
        let mut t = PvTable::new();
        let mv = encode_move(21, 31, 0, 0, false, true, false);
        t.store(1, mv);
        assert_eq!(t.probe(2), NO_MOVE);
    }

    #[test]
    fn clear_empties_every_slot() {
        let mut t = PvTable::new();
        t.store(7, 99);
        t.clear();
        assert_eq!(t.probe(7), NO_MOVE);
    }

    #[test]
    fn collect_line_follows_stored_moves_and_restores_the_board() {
        let mut b = from_fen(crate::defs::FEN_START_POSITION);
        let start_key = b.pos_key;
        let e2 = crate::defs::file_rank_to_square(4, 1);
        let e4 = crate::defs::file_rank_to_square(4, 3);
        let mv = encode_move(e2, e4, 0, 0, false, true, false);

        let mut t = PvTable::new();
        t.store(b.pos_key, mv);

        let line = t.collect_line(&mut b, 4);
        assert_eq!(line, vec![mv]);
        assert_eq!(b.pos_key, start_key);
    }
}
