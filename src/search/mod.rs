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

pub mod defs;
pub mod time;

use crate::board::playmove::{make_move, make_null_move, take_move, take_null_move};
use crate::board::Board;
use crate::evaluation::evaluate_position;
use crate::movegen::defs::{is_capture, Move, Ordering, NO_MOVE};
use crate::movegen::{generate_all, generate_captures};
use crate::pvtable::PvTable;
use crossbeam_channel::Receiver;
use defs::{
    SearchSummary, CHECKUP_NODE_MASK, INFINITE, MATE, MAX_DEPTH_I32, NULL_MOVE_MATERIAL_THRESHOLD,
    NULL_MOVE_MIN_DEPTH, NULL_MOVE_REDUCTION,
};
use std::time::Instant;

/// Everything the search owns per invocation of `go`: node/fail-high
/// counters, the stop flag, and (if the engine is running under UCI) the
/// relay from the stdin-reader thread so `stop`/`quit` can interrupt an
/// in-flight search, not just be seen once it returns.
pub struct Search {
    pub nodes: u64,
    pub fh: u64,
    pub fhf: u64,
    pub stop: bool,
    pub quit: bool,
    start: Instant,
    deadline: time::Deadline,
    rx: Option<Receiver<String>>,
}

impl Search {
    pub fn new() -> Self {
        Self {
            nodes: 0,
            fh: 0,
            fhf: 0,
            stop: false,
            quit: false,
            start: Instant::now(),
            deadline: None,
            rx: None,
        }
    }

    pub fn with_receiver(rx: Receiver<String>) -> Self {
        Self {
            rx: Some(rx),
            ..Self::new()
        }
    }

    /// Stop the search immediately; used when the UCI front-end sees
    /// `stop` between searches rather than through the in-search relay.
    pub fn force_stop(&mut self) {
        self.stop = true;
    }

    fn checkup(&mut self) {
        if let Some(rx) = &self.rx {
            while let Ok(line) = rx.try_recv() {
                match line.trim() {
                    "stop" => self.stop = true,
                    "quit" => {
                        self.stop = true;
                        self.quit = true;
                    }
                    _ => (),
                }
            }
        }
        if time::expired(self.deadline, Instant::now()) {
            self.stop = true;
        }
    }

    fn quiescence(
        &mut self,
        board: &mut Board,
        ordering: &mut Ordering,
        pv: &mut PvTable,
        mut alpha: i32,
        beta: i32,
    ) -> i32 {
        if self.nodes & CHECKUP_NODE_MASK == 0 {
            self.checkup();
        }
        self.nodes += 1;

        if board.is_repetition() || board.fifty_move >= 100 {
            return 0;
        }
        if board.ply > (MAX_DEPTH_I32 - 1) as usize {
            return evaluate_position(board);
        }

        let stand_pat = evaluate_position(board);
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let ply = board.ply;
        let mut list = generate_captures(board, ordering, ply);

        let pv_move = pv.probe(board.pos_key);
        if pv_move != NO_MOVE {
            if let Some(i) = list.find(pv_move) {
                list.set_score(i, 2_000_000);
            }
        }

        let old_alpha = alpha;
        let mut best_move = NO_MOVE;
        let mut legal = 0u32;

        for i in 0..list.len() {
            list.pick_next(i);
            let mv = list.get(i).mv;
            if !make_move(board, mv) {
                continue;
            }
            legal += 1;
            let score = -self.quiescence(board, ordering, pv, -beta, -alpha);
            take_move(board);
            if self.stop {
                return 0;
            }

            if score > alpha {
                if score >= beta {
                    if legal == 1 {
                        self.fhf += 1;
                    }
                    self.fh += 1;
                    return beta;
                }
                alpha = score;
                best_move = mv;
            }
        }

        if alpha != old_alpha {
            pv.store(board.pos_key, best_move);
        }

        alpha
    }

    fn alpha_beta(
        &mut self,
        board: &mut Board,
        ordering: &mut Ordering,
        pv: &mut PvTable,
        mut alpha: i32,
        beta: i32,
        mut depth: i32,
        allow_null: bool,
    ) -> i32 {
        if depth <= 0 {
            return self.quiescence(board, ordering, pv, alpha, beta);
        }

        if self.nodes & CHECKUP_NODE_MASK == 0 {
            self.checkup();
        }
        self.nodes += 1;

        if board.ply != 0 && (board.is_repetition() || board.fifty_move >= 100) {
            return 0;
        }
        if board.ply > (MAX_DEPTH_I32 - 1) as usize {
            return evaluate_position(board);
        }

        let in_check = board.in_check(board.side);
        if in_check {
            depth += 1;
        }

        if allow_null
            && !in_check
            && board.ply != 0
            && board.material[board.side as usize] > NULL_MOVE_MATERIAL_THRESHOLD
            && depth >= NULL_MOVE_MIN_DEPTH
        {
            let undo = make_null_move(board);
            let score = -self.alpha_beta(
                board,
                ordering,
                pv,
                -beta,
                -beta + 1,
                depth - NULL_MOVE_REDUCTION,
                false,
            );
            take_null_move(board, undo);

            if self.stop {
                return 0;
            }
            if score >= beta {
                return beta;
            }
        }

        let ply = board.ply;
        let mut list = generate_all(board, ordering, ply);

        let pv_move = pv.probe(board.pos_key);
        if pv_move != NO_MOVE {
            if let Some(i) = list.find(pv_move) {
                list.set_score(i, 2_000_000);
            }
        }

        let old_alpha = alpha;
        let mut best_move = NO_MOVE;
        let mut legal = 0u32;

        for i in 0..list.len() {
            list.pick_next(i);
            let mv = list.get(i).mv;
            if !make_move(board, mv) {
                continue;
            }
            legal += 1;
            let score = -self.alpha_beta(board, ordering, pv, -beta, -alpha, depth - 1, true);
            take_move(board);
            if self.stop {
                return 0;
            }

            if score > alpha {
                if score >= beta {
                    if legal == 1 {
                        self.fhf += 1;
                    }
                    self.fh += 1;

                    if !is_capture(mv) {
                        ordering.killers[ply][1] = ordering.killers[ply][0];
                        ordering.killers[ply][0] = mv;
                    }
                    return beta;
                }
                alpha = score;
                best_move = mv;
                if !is_capture(mv) {
                    let from = crate::movegen::defs::from_square(mv);
                    let to = crate::movegen::defs::to_square(mv);
                    let piece = board.piece_at(from) as usize;
                    ordering.history[piece][to] += depth;
                }
            }
        }

        if legal == 0 {
            return if in_check { -MATE + ply as i32 } else { 0 };
        }

        if alpha != old_alpha {
            pv.store(board.pos_key, best_move);
        }

        alpha
    }

    /// Runs iterative deepening from depth 1 to `max_depth`, calling
    /// `on_summary` once per completed iteration. Returns `NO_MOVE` if no
    /// legal move exists at the root (mate or stalemate).
    pub fn iterative_deepening(
        &mut self,
        board: &mut Board,
        ordering: &mut Ordering,
        pv: &mut PvTable,
        max_depth: i32,
        movetime_ms: Option<u64>,
        mut on_summary: impl FnMut(&SearchSummary),
    ) -> Move {
        self.nodes = 0;
        self.fh = 0;
        self.fhf = 0;
        self.stop = false;
        self.start = Instant::now();
        self.deadline = movetime_ms.and_then(|ms| time::deadline_from_movetime(self.start, ms));
        board.ply = 0;

        let mut best_move = NO_MOVE;

        let mut depth = 1;
        while depth <= max_depth && !self.stop {
            let score = self.alpha_beta(board, ordering, pv, -INFINITE, INFINITE, depth, true);
            if self.stop {
                break;
            }

            let pv_line = pv.collect_line(board, depth as usize);
            if let Some(&mv) = pv_line.first() {
                best_move = mv;
            }

            let time_ms = self.start.elapsed().as_millis() as u64;
            let nps = if time_ms > 0 { self.nodes * 1000 / time_ms } else { 0 };

            on_summary(&SearchSummary {
                depth,
                score,
                nodes: self.nodes,
                nps,
                time_ms,
                pv: pv_line,
                fh: self.fh,
                fhf: self.fhf,
            });

            depth += 1;
        }

        best_move
    }
}

impl Default for Search {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fen;
    use crate::board::playmove::make_move as apply;
    use crate::board::zobrist::ZobristRandoms;
    use crate::movegen::defs::encode_move;
    use std::sync::Arc;

    fn from_fen(f: &str) -> Board {
        let mut b = Board::new(Arc::new(ZobristRandoms::new()));
        fen::read(&mut b, f).unwrap();
        b
    }

    #[test]
    fn finds_mate_in_one() {
        let mut b = from_fen("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1");
        let mut ordering = Ordering::new();
        let mut pv = PvTable::new();
        let mut search = Search::new();

        let best = search.iterative_deepening(&mut b, &mut ordering, &mut pv, 3, None, |_| {});
        assert_ne!(best, NO_MOVE);

        assert!(apply(&mut b, best));
        assert!(b.in_check(b.side));

        let after_ordering = Ordering::new();
        let replies = generate_all(&b, &after_ordering, b.ply);
        let mut any_legal = false;
        for i in 0..replies.len() {
            if make_move(&mut b, replies.get(i).mv) {
                any_legal = true;
                take_move(&mut b);
            }
        }
        assert!(!any_legal);
    }

    #[test]
    fn stalemate_returns_no_move() {
        let mut b = from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        let mut ordering = Ordering::new();
        let mut pv = PvTable::new();
        let mut search = Search::new();

        assert!(!b.in_check(b.side));
        let best = search.iterative_deepening(&mut b, &mut ordering, &mut pv, 1, None, |_| {});
        assert_eq!(best, NO_MOVE);
    }

    #[test]
    fn repeated_knight_shuffle_is_detected_as_a_draw_at_the_leaf() {
        let mut b = from_fen(crate::defs::FEN_START_POSITION);
        let ordering = Ordering::new();

        let shuffle = [
            ("b1", "c3"),
            ("b8", "c6"),
            ("c3", "b1"),
            ("c6", "b8"),
            ("b1", "c3"),
            ("b8", "c6"),
            ("c3", "b1"),
            ("c6", "b8"),
        ];

        fn sq(file_rank: &str) -> usize {
            let bytes = file_rank.as_bytes();
            let file = (bytes[0] - b'a') as usize;
            let rank = (bytes[1] - b'1') as usize;
            crate::defs::file_rank_to_square(file, rank)
        }

        for &(from, to) in shuffle.iter() {
            let from_sq = sq(from);
            let to_sq = sq(to);
            let list = generate_all(&b, &ordering, b.ply);
            let mut played = false;
            for i in 0..list.len() {
                let mv = list.get(i).mv;
                if crate::movegen::defs::from_square(mv) == from_sq
                    && crate::movegen::defs::to_square(mv) == to_sq
                {
                    assert!(make_move(&mut b, mv));
                    played = true;
                    break;
                }
            }
            assert!(played, "expected {from}-{to} to be playable");
        }

        assert!(b.is_repetition());

        let mut ordering = Ordering::new();
        let mut pv = PvTable::new();
        let mut search = Search::new();
        let score = search.alpha_beta(&mut b, &mut ordering, &mut pv, -INFINITE, INFINITE, 1, true);
        assert_eq!(score, 0);
    }

    #[test]
    fn go_resets_ply_to_zero_after_a_long_move_replay() {
        // `position ... moves` replays through make_move, which advances
        // `board.ply` right along with `his_ply`. A search launched from
        // a position reached via a move list longer than MAX_DEPTH must
        // still treat that position as the search root (ply 0), not
        // index killers/history off the inherited ply.
        let mut b = from_fen(crate::defs::FEN_START_POSITION);
        let ordering_probe = Ordering::new();

        let shuffle = [
            ("b1", "c3"),
            ("b8", "c6"),
            ("c3", "b1"),
            ("c6", "b8"),
        ];
        fn sq(file_rank: &str) -> usize {
            let bytes = file_rank.as_bytes();
            let file = (bytes[0] - b'a') as usize;
            let rank = (bytes[1] - b'1') as usize;
            crate::defs::file_rank_to_square(file, rank)
        }
        for _ in 0..((crate::defs::MAX_DEPTH / shuffle.len()) + 2) {
            for &(from, to) in shuffle.iter() {
                let from_sq = sq(from);
                let to_sq = sq(to);
                let list = generate_all(&b, &ordering_probe, b.ply);
                for i in 0..list.len() {
                    let mv = list.get(i).mv;
                    if crate::movegen::defs::from_square(mv) == from_sq
                        && crate::movegen::defs::to_square(mv) == to_sq
                    {
                        assert!(make_move(&mut b, mv));
                        break;
                    }
                }
            }
        }
        assert!(b.ply > crate::defs::MAX_DEPTH, "test setup should have driven ply past MAX_DEPTH");

        let mut ordering = Ordering::new();
        let mut pv = PvTable::new();
        let mut search = Search::new();
        let best = search.iterative_deepening(&mut b, &mut ordering, &mut pv, 2, None, |_| {});
        assert_ne!(best, NO_MOVE);
    }

    #[test]
    fn quiescence_sees_through_the_recapture() {
        let mut b = from_fen("rnbqkbnr/pppp1ppp/8/4p3/3P4/8/PPP1PPPP/RNBQKBNR w KQkq - 0 1");
        let mut ordering = Ordering::new();
        let mut pv = PvTable::new();
        let mut search = Search::new();

        let d4 = crate::defs::file_rank_to_square(3, 3);
        let e5 = crate::defs::file_rank_to_square(4, 4);
        let dxe5 = encode_move(d4, e5, crate::defs::Pieces::BP, crate::defs::Pieces::EMPTY, false, false, false);

        let best = search.iterative_deepening(&mut b, &mut ordering, &mut pv, 2, None, |_| {});
        assert_ne!(best, dxe5, "quiescence should see the queen recapture on e5 and avoid dxe5");
    }
}
