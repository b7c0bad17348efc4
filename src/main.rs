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

use corvid::engine::defs::Settings;
use corvid::engine::Engine;
use corvid::misc::cmdline::CmdLine;
use tracing_subscriber::EnvFilter;

fn main() {
    // UCI reserves stdout for protocol traffic; all structured logging
    // goes to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Non-goal: no console/GameController mode. `--comm` is kept for
    // UCI-client compatibility; clap restricts it to "uci" already.
    let cmdline = CmdLine::new();

    let settings = Settings {
        fen: cmdline.fen(),
        quiet: cmdline.has_quiet(),
    };

    let mut engine = Engine::new(settings);
    engine.run();
}
