//! Iterative-deepening negamax with alpha-beta pruning and aspiration
//! windows, written against [`Rules`] so every rules engine in the crate
//! shares it.
//!
//! The search walks a single live position: each child is reached with
//! `apply_move` and left with `undo_last_move`, so the game is borrowed
//! mutably for the whole call and comes back in the state it went in.

use log::{debug, trace, warn};

use crate::error::GameError;
use crate::rules::{Rules, SearchMove};

/// Bound outside any reachable evaluation.
pub const INF: i32 = 1_000_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Half-width of the first window tried at each depth.
    pub aspiration_window: i32,
    /// Depth used by [`Searcher::search_default`].
    pub max_depth: u8,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            aspiration_window: 8,
            max_depth: 4,
        }
    }
}

/// Counters from the last search. Diagnostic only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Moves applied inside the tree (passes excluded).
    pub nodes: u64,
    /// Static evaluations at leaves and finished games.
    pub leaves: u64,
    /// Root searches repeated after failing high or low.
    pub re_searches: u64,
    /// Deepest iteration that completed.
    pub depth: u8,
}

#[derive(Clone, Debug, Default)]
pub struct Searcher {
    config: SearchConfig,
    stats: SearchStats,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Self {
        Searcher {
            config,
            stats: SearchStats::default(),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Best move for the side to move after iterating depths `1..=max_depth`,
    /// or `None` if that side cannot move. A depth of 0 searches depth 1. The move's `score()` holds its
    /// value from the mover's point of view.
    ///
    /// An [`GameError::InvariantViolation`] aborts the search and leaves the
    /// game wherever the failing line had reached.
    pub fn search<G: Rules>(
        &mut self,
        game: &mut G,
        max_depth: u8,
    ) -> Result<Option<G::Move>, GameError> {
        self.stats = SearchStats::default();

        let result = self.iterate(game, max_depth);
        if let Err(err) = &result {
            warn!("search aborted: {}", err);
        }
        result
    }

    /// [`Searcher::search`] to the configured `max_depth`.
    pub fn search_default<G: Rules>(
        &mut self,
        game: &mut G,
    ) -> Result<Option<G::Move>, GameError> {
        let depth = self.config.max_depth;
        self.search(game, depth)
    }

    /// Full-window negamax value of the current position for the side to
    /// move, without iterative deepening.
    pub fn value<G: Rules>(&mut self, game: &mut G, depth: u8) -> Result<i32, GameError> {
        self.stats = SearchStats::default();
        let color = game.side_to_move().sign();
        self.negamax(game, depth, -INF, INF, color)
    }

    fn iterate<G: Rules>(
        &mut self,
        game: &mut G,
        max_depth: u8,
    ) -> Result<Option<G::Move>, GameError> {
        // Scores written here by one iteration order the next one.
        let mut candidates = game.legal_moves();
        if candidates.is_empty() {
            debug!("no legal moves for {}", game.side_to_move());
            return Ok(None);
        }

        let window = self.config.aspiration_window.max(1);
        let mut best = None;
        let mut center = 0;

        for depth in 1..=max_depth.max(1) {
            let mut alpha = center - window;
            let mut beta = center + window;
            let mut lower_margin = window;
            let mut upper_margin = window;

            loop {
                let idx = self.root_search(game, &mut candidates, alpha, beta, depth)?;
                let chosen = &candidates[idx];
                let value = chosen.score().ok_or_else(|| {
                    GameError::InvariantViolation("root move left unscored".to_string())
                })?;
                let unbounded = alpha <= -INF && beta >= INF;

                if value >= beta && !unbounded {
                    trace!("depth {} failed high at {} (window {}..{})", depth, value, alpha, beta);
                    beta = beta.saturating_add(upper_margin).min(INF);
                    upper_margin = upper_margin.saturating_mul(2);
                    self.stats.re_searches += 1;
                } else if value <= alpha && !unbounded {
                    trace!("depth {} failed low at {} (window {}..{})", depth, value, alpha, beta);
                    alpha = alpha.saturating_sub(lower_margin).max(-INF);
                    lower_margin = lower_margin.saturating_mul(2);
                    self.stats.re_searches += 1;
                } else {
                    debug!(
                        "depth {}: {} scores {} ({} nodes, {} leaves)",
                        depth, chosen, value, self.stats.nodes, self.stats.leaves
                    );
                    center = value;
                    best = Some(chosen.clone());
                    self.stats.depth = depth;
                    break;
                }
            }
        }

        Ok(best)
    }

    /// Search every candidate (best-ordered first) and return the index of
    /// the best one. Each searched candidate gets its value stored as score.
    fn root_search<G: Rules>(
        &mut self,
        game: &mut G,
        moves: &mut [G::Move],
        mut alpha: i32,
        beta: i32,
        depth: u8,
    ) -> Result<usize, GameError> {
        moves.sort_by(|a, b| a.order_cmp(b));

        let color = game.side_to_move().sign();
        let mut best = 0;
        let mut best_value: Option<i32> = None;

        for (i, mv) in moves.iter_mut().enumerate() {
            self.make(game, mv)?;
            let value = -self.negamax(game, depth - 1, -beta, -alpha, -color)?;
            self.unmake(game)?;

            mv.set_score(Some(value));
            if best_value.is_none_or(|b| value > b) {
                best = i;
                best_value = Some(value);
            }

            alpha = alpha.max(value);
            if alpha >= beta {
                break;
            }
        }

        Ok(best)
    }

    fn negamax<G: Rules>(
        &mut self,
        game: &mut G,
        depth: u8,
        mut alpha: i32,
        beta: i32,
        color: i32,
    ) -> Result<i32, GameError> {
        debug_assert_eq!(color, game.side_to_move().sign());

        if depth == 0 || game.is_over() {
            self.stats.leaves += 1;
            return Ok(color * game.evaluate());
        }

        let mut moves = game.legal_moves();

        // Stuck but the opponent can still move: pass at the same depth.
        if moves.is_empty() {
            game.pass_turn().map_err(invariant("pass"))?;
            let value = -self.negamax(game, depth, -beta, -alpha, -color)?;
            game.undo_last_move().map_err(invariant("undo pass"))?;
            return Ok(value);
        }

        moves.sort_by(|a, b| a.order_cmp(b));

        let mut best_value = -INF;
        for mv in &moves {
            self.make(game, mv)?;
            let value = -self.negamax(game, depth - 1, -beta, -alpha, -color)?;
            self.unmake(game)?;

            best_value = best_value.max(value);
            alpha = alpha.max(value);
            if alpha >= beta {
                break;
            }
        }

        Ok(best_value)
    }

    fn make<G: Rules>(&mut self, game: &mut G, mv: &G::Move) -> Result<(), GameError> {
        game.apply_move(mv)
            .map_err(|e| GameError::InvariantViolation(format!("generated move {}: {}", mv, e)))?;
        self.stats.nodes += 1;
        Ok(())
    }

    fn unmake<G: Rules>(&mut self, game: &mut G) -> Result<(), GameError> {
        game.undo_last_move().map_err(invariant("undo"))
    }
}

fn invariant(step: &'static str) -> impl Fn(GameError) -> GameError {
    move |e| GameError::InvariantViolation(format!("{} failed: {}", step, e))
}
