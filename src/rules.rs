use std::cmp::Ordering;
use std::fmt;

use crate::color::Color;
use crate::error::GameError;

/// A move the searcher can rank and annotate with its value.
pub trait SearchMove: Clone + fmt::Display {
    fn score(&self) -> Option<i32>;

    fn set_score(&mut self, score: Option<i32>);

    /// Ordering used before each scan; `Ordering::Less` means "search first".
    fn order_cmp(&self, other: &Self) -> Ordering;
}

/// The make/undo interface a two-player rules engine exposes to the search.
///
/// Implementations mutate one position in place. Every successful
/// `apply_move` or `pass_turn` must be exactly reversed by the next
/// `undo_last_move`.
pub trait Rules {
    type Move: SearchMove;

    /// Legal moves for the side to move, freshly generated.
    fn legal_moves(&self) -> Vec<Self::Move>;

    fn apply_move(&mut self, mv: &Self::Move) -> Result<(), GameError>;

    /// Hand the turn to the opponent. Only allowed when the side to move has
    /// no legal move and the game is not over.
    fn pass_turn(&mut self) -> Result<(), GameError>;

    fn undo_last_move(&mut self) -> Result<(), GameError>;

    /// True once neither side can move.
    fn is_over(&self) -> bool;

    /// Static value from Black's point of view.
    fn evaluate(&self) -> i32;

    fn side_to_move(&self) -> Color;
}
