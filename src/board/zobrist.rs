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

use crate::defs::{BOARD_SQUARES, Piece, Pieces};
use rand_chacha::ChaCha8Rng;
use rand_core::{RngCore, SeedableRng};

pub type ZobristKey = u64;

/// Fixed seed so `posKey` streams are reproducible between runs; this is
/// what makes perft output and the repetition tests deterministic.
const ZOBRIST_SEED: u64 = 0x5EED_C0DE_1234_5678;

/// Holds every random key the board's hash depends on. Drawn once at engine
/// construction and then only ever read.
pub struct ZobristRandoms {
    piece_square: [[ZobristKey; BOARD_SQUARES]; Pieces::COUNT],
    side: ZobristKey,
    castling: [ZobristKey; 16],
}

impl ZobristRandoms {
    pub fn new() -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(ZOBRIST_SEED);

        let mut piece_square = [[0u64; BOARD_SQUARES]; Pieces::COUNT];
        for piece in piece_square.iter_mut() {
            for key in piece.iter_mut() {
                *key = rng.next_u64();
            }
        }

        let side = rng.next_u64();

        let mut castling = [0u64; 16];
        for key in castling.iter_mut() {
            *key = rng.next_u64();
        }

        Self {
            piece_square,
            side,
            castling,
        }
    }

    /// `piece` must be a valid `Pieces` constant; `EMPTY`'s row is reused
    /// as the en-passant key (indexed by the en-passant target square).
    pub fn piece(&self, piece: Piece, square: usize) -> ZobristKey {
        self.piece_square[piece as usize][square]
    }

    pub fn en_passant(&self, square: usize) -> ZobristKey {
        self.piece_square[Pieces::EMPTY as usize][square]
    }

    pub fn side(&self) -> ZobristKey {
        self.side
    }

    pub fn castling(&self, rights: u8) -> ZobristKey {
        self.castling[rights as usize]
    }
}

impl Default for ZobristRandoms {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_deterministic_across_instances() {
        let a = ZobristRandoms::new();
        let b = ZobristRandoms::new();
        assert_eq!(a.side(), b.side());
        assert_eq!(a.piece(Pieces::WP, 21), b.piece(Pieces::WP, 21));
        assert_eq!(a.castling(9), b.castling(9));
    }

    #[test]
    fn piece_keys_are_pairwise_distinct() {
        let z = ZobristRandoms::new();
        assert_ne!(z.piece(Pieces::WP, 21), z.piece(Pieces::WP, 22));
        assert_ne!(z.piece(Pieces::WP, 21), z.piece(Pieces::BP, 21));
    }
}
