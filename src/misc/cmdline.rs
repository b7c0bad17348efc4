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

use crate::defs::{About, FEN_START_POSITION};
use clap::{value_parser, Arg, ArgAction, ArgMatches};

struct CmdLineArgs {}
impl CmdLineArgs {
    const FEN_LONG: &'static str = "fen";
    const FEN_SHORT: char = 'f';
    const FEN_HELP: &'static str = "Set up the given position";

    const COMM_LONG: &'static str = "comm";
    const COMM_SHORT: char = 'c';
    const COMM_HELP: &'static str = "Select communication protocol to use";
    const COMM_VALUES: [&'static str; 1] = ["uci"];
    const COMM_DEFAULT: &'static str = "uci";

    const QUIET_LONG: &'static str = "quiet";
    const QUIET_SHORT: char = 'q';
    const QUIET_HELP: &'static str = "No intermediate search stats updates";
}

pub struct CmdLine {
    arguments: ArgMatches,
}

impl CmdLine {
    pub fn new() -> Self {
        Self { arguments: Self::get() }
    }

    pub fn comm(&self) -> String {
        self.arguments
            .get_one::<String>(CmdLineArgs::COMM_LONG)
            .unwrap_or(&CmdLineArgs::COMM_DEFAULT.to_string())
            .clone()
    }

    pub fn fen(&self) -> String {
        self.arguments
            .get_one::<String>(CmdLineArgs::FEN_LONG)
            .unwrap_or(&FEN_START_POSITION.to_string())
            .clone()
    }

    pub fn has_quiet(&self) -> bool {
        self.arguments.get_flag(CmdLineArgs::QUIET_LONG)
    }

    fn get() -> ArgMatches {
        clap::Command::new(About::ENGINE)
            .version(About::VERSION)
            .author(About::AUTHOR)
            .about(About::WEBSITE)
            .disable_help_flag(true)
            .arg(
                Arg::new(CmdLineArgs::COMM_LONG)
                    .short(CmdLineArgs::COMM_SHORT)
                    .long(CmdLineArgs::COMM_LONG)
                    .help(CmdLineArgs::COMM_HELP)
                    .num_args(1)
                    .default_value(CmdLineArgs::COMM_DEFAULT)
                    .value_parser(CmdLineArgs::COMM_VALUES),
            )
            .arg(
                Arg::new(CmdLineArgs::FEN_LONG)
                    .short(CmdLineArgs::FEN_SHORT)
                    .long(CmdLineArgs::FEN_LONG)
                    .help(CmdLineArgs::FEN_HELP)
                    .num_args(1)
                    .default_value(FEN_START_POSITION)
                    .value_parser(value_parser!(String)),
            )
            .arg(
                Arg::new(CmdLineArgs::QUIET_LONG)
                    .long(CmdLineArgs::QUIET_LONG)
                    .short(CmdLineArgs::QUIET_SHORT)
                    .help(CmdLineArgs::QUIET_HELP)
                    .action(ArgAction::SetTrue),
            )
            .get_matches()
    }
}

impl Default for CmdLine {
    fn default() -> Self {
        Self::new()
    }
}
