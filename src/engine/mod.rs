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

pub mod about;
pub mod defs;

use crate::board::fen;
use crate::board::playmove::make_move;
use crate::board::zobrist::ZobristRandoms;
use crate::board::Board;
use crate::defs::{About, FEN_START_POSITION};
use crate::movegen::defs::{Ordering, NO_MOVE};
use crate::pvtable::PvTable;
use crate::search::defs::MAX_DEPTH_I32;
use crate::search::Search;
use crate::uci;
use defs::Settings;
use std::io::BufRead;
use std::sync::Arc;
use std::thread;

/// Owns every piece of mutable engine state — board, move ordering
/// tables, PV table, and the search itself — constructed once by `main`
/// and driven by a single UCI command loop. The only concurrency is the
/// auxiliary stdin-reader thread spawned in [`Engine::run`]; the engine's
/// own state is never touched from more than one thread at a time.
pub struct Engine {
    settings: Settings,
    board: Board,
    ordering: Ordering,
    pv: PvTable,
    search: Search,
}

impl Engine {
    pub fn new(settings: Settings) -> Self {
        let zr = Arc::new(ZobristRandoms::new());
        let mut board = Board::new(zr);
        if let Err(e) = fen::read(&mut board, &settings.fen) {
            tracing::warn!(error = ?e, fen = settings.fen, "invalid --fen; falling back to the starting position");
            fen::read(&mut board, FEN_START_POSITION).expect("the starting FEN is always valid");
        }

        Self {
            settings,
            board,
            ordering: Ordering::new(),
            pv: PvTable::new(),
            search: Search::new(),
        }
    }

    /// Spawns the stdin-reader thread, then blocks the calling thread on
    /// the UCI command loop until `quit` (or a closed stdin) ends it.
    pub fn run(&mut self) {
        self.print_ascii_logo();
        self.print_about();

        let (tx, rx) = crossbeam_channel::unbounded::<String>();
        thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(l) => {
                        let is_quit = l.trim() == "quit";
                        if tx.send(l).is_err() || is_quit {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
        });

        self.search = Search::with_receiver(rx.clone());

        loop {
            let line = match rx.recv() {
                Ok(l) => l,
                Err(_) => break,
            };
            if self.handle_command(&line) {
                break;
            }
        }
    }

    /// Returns `true` once `quit` has been observed, whether that came in
    /// directly or was relayed to a running search.
    fn handle_command(&mut self, line: &str) -> bool {
        let line = line.trim();
        if line.is_empty() {
            return false;
        }

        let (cmd, rest) = match line.split_once(' ') {
            Some((c, r)) => (c, r),
            None => (line, ""),
        };

        match cmd {
            "uci" => self.handle_uci(),
            "isready" => println!("readyok"),
            "ucinewgame" => self.handle_ucinewgame(),
            "setoption" => {
                tracing::debug!(line, "setoption received; no UCI options are registered");
            }
            "position" => self.handle_position(rest),
            "go" => {
                self.handle_go(rest);
                if self.search.quit {
                    return true;
                }
            }
            "stop" => self.search.force_stop(),
            "quit" => return true,
            _ => tracing::warn!(command = cmd, "unrecognised UCI command"),
        }

        false
    }

    fn handle_uci(&self) {
        println!("id name {} {}", About::ENGINE, About::VERSION);
        println!("id author {}", About::AUTHOR);
        println!("uciok");
    }

    fn handle_ucinewgame(&mut self) {
        if let Err(e) = fen::read(&mut self.board, FEN_START_POSITION) {
            tracing::warn!(error = ?e, "ucinewgame: failed to reset to the starting position");
        }
        self.ordering.clear();
        self.pv.clear();
    }

    fn handle_position(&mut self, args: &str) {
        let (fen_str, moves) = uci::split_position_args(args);

        if let Err(e) = fen::read(&mut self.board, &fen_str) {
            tracing::warn!(error = ?e, fen = fen_str, "ignoring malformed position command");
            return;
        }

        let Some(moves) = moves else { return };
        for mv_str in moves.split_whitespace() {
            let mv = uci::parse_uci_move(&self.board, &self.ordering, mv_str);
            if mv == NO_MOVE || !make_move(&mut self.board, mv) {
                tracing::warn!(mv = mv_str, "ignoring illegal move in position command");
                break;
            }
        }
    }

    fn handle_go(&mut self, args: &str) {
        let opts = uci::parse_go(args);
        let max_depth = opts.depth.unwrap_or(MAX_DEPTH_I32).clamp(1, MAX_DEPTH_I32);
        let quiet = self.settings.quiet;

        let best = self.search.iterative_deepening(
            &mut self.board,
            &mut self.ordering,
            &mut self.pv,
            max_depth,
            opts.movetime,
            |summary| {
                if !quiet || summary.depth == max_depth {
                    println!("{}", uci::format_info_line(summary));
                }
            },
        );

        println!("{}", uci::format_bestmove(best));
    }
}
