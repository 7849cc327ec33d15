//! Self-play driver for profiling the search.
//!
//! Usage: `profile [depth] [games]`. Build with `--features hotpath` to get
//! per-function timings on exit.

use std::env;
use std::process::ExitCode;

use spooky_ataxx::game::Game;
use spooky_ataxx::search::{SearchConfig, Searcher};

const DEFAULT_DEPTH: u8 = 3;
const DEFAULT_GAMES: usize = 1;
// Jump shuffles can repeat forever.
const MAX_PLIES: usize = 400;

fn arg_or<T: std::str::FromStr>(index: usize, default: T) -> Result<T, String> {
    match env::args().nth(index) {
        Some(text) => text
            .parse()
            .map_err(|_| format!("could not parse argument {}: {:?}", index, text)),
        None => Ok(default),
    }
}

fn play_one(depth: u8) -> Result<(Game, u64), String> {
    let mut game = Game::standard();
    let mut searcher = Searcher::new(SearchConfig::default());
    let mut nodes = 0;

    while !game.is_over() && game.move_count() < MAX_PLIES {
        let best = searcher
            .search(&mut game, depth)
            .map_err(|e| e.to_string())?;
        nodes += searcher.stats().nodes;

        match best {
            Some(mv) => {
                let ply = game.move_count() + 1;
                println!("{:>3}. {} {} ({:?})", ply, mv.color(), mv, mv.score());
                game.apply_move(&mv).map_err(|e| e.to_string())?;
            }
            None => {
                println!("{:>3}. {} passes", game.move_count() + 1, game.side_to_move());
                game.pass_turn().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok((game, nodes))
}

#[cfg_attr(feature = "hotpath", hotpath::main)]
fn main() -> ExitCode {
    let (depth, games) = match (arg_or(1, DEFAULT_DEPTH), arg_or(2, DEFAULT_GAMES)) {
        (Ok(depth), Ok(games)) => (depth, games),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    for _ in 0..games {
        match play_one(depth) {
            Ok((game, nodes)) => {
                println!("{}", game);
                match game.outcome() {
                    Some(outcome) => {
                        println!("{} after {} plies, {} nodes", outcome, game.move_count(), nodes)
                    }
                    None => println!("unfinished after {} plies, {} nodes", game.move_count(), nodes),
                }
            }
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
