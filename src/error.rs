use thiserror::Error;

use crate::color::Color;
use crate::coord::Coord;
use crate::r#move::MoveKind;

/// Why a move was refused. Returned before the board is touched.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("{0} is off the board")]
    OffBoard(Coord),

    #[error("{0} is not empty")]
    Occupied(Coord),

    #[error("{0} holds no piece")]
    Empty(Coord),

    #[error("no {color} piece on {at}")]
    MissingPiece { at: Coord, color: Color },

    #[error("{kind} from {from} to {to} covers the wrong distance")]
    WrongDistance { kind: MoveKind, from: Coord, to: Coord },

    #[error("no own piece next to {0}")]
    NotAdjacent(Coord),

    #[error("placing on {0} captures nothing")]
    NoCapture(Coord),

    #[error("{from} to {to} is more than two squares")]
    TooFar { from: Coord, to: Coord },

    #[error("cannot read move {0:?}")]
    Malformed(String),

    #[error("{0} has a legal move and cannot pass")]
    MustMove(Color),

    #[error("the game is over")]
    GameOver,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("illegal move: {0}")]
    IllegalMove(#[from] IllegalMove),

    #[error("no moves to undo")]
    EmptyHistory,

    /// Raised by the search when a generated move fails to apply or undo.
    /// Indicates a bug, not a bad input.
    #[error("search invariant violated: {0}")]
    InvariantViolation(String),
}
