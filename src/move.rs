use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::color::Color;
use crate::coord::Coord;
use crate::error::IllegalMove;
use crate::rules::SearchMove;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MoveKind {
    /// Grow a new piece next to an existing one.
    Expand,
    /// Relocate an existing piece two squares away.
    Jump,
}

impl std::fmt::Display for MoveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveKind::Expand => write!(f, "Expand"),
            MoveKind::Jump => write!(f, "Jump"),
        }
    }
}

/// An Ataxx move. `score` is search bookkeeping used for move ordering and
/// takes no part in equality or hashing. Neither does the source of an
/// expand: `a1b2` and `b2` place the same piece.
#[derive(Clone, Copy, Debug)]
pub struct Move {
    color: Color,
    kind: MoveKind,
    from: Option<Coord>,
    to: Coord,
    score: Option<i32>,
}

impl Move {
    pub fn expand(color: Color, to: Coord) -> Self {
        Move {
            color,
            kind: MoveKind::Expand,
            from: None,
            to,
            score: None,
        }
    }

    /// An expand that names the piece it grows from.
    pub fn expand_from(color: Color, from: Coord, to: Coord) -> Self {
        Move {
            from: Some(from),
            ..Move::expand(color, to)
        }
    }

    pub fn jump(color: Color, from: Coord, to: Coord) -> Self {
        Move {
            color,
            kind: MoveKind::Jump,
            from: Some(from),
            to,
            score: None,
        }
    }

    /// Read `<file><rank><file><rank>` (or `<file><rank>` for a sourceless
    /// expand). The kind follows from the distance between the two squares:
    /// two is a jump, anything closer an expand, anything further is refused.
    pub fn parse(text: &str, color: Color) -> Result<Move, IllegalMove> {
        let text = text.trim();
        let malformed = || IllegalMove::Malformed(text.to_string());

        if !text.is_ascii() {
            return Err(malformed());
        }

        // The second coordinate starts at the second letter.
        let split = text
            .char_indices()
            .skip(1)
            .find(|(_, c)| c.is_ascii_alphabetic())
            .map(|(i, _)| i);

        let (from, to) = match split {
            None => (None, text.parse::<Coord>().map_err(|_| malformed())?),
            Some(i) => {
                let from = text[..i].parse::<Coord>().map_err(|_| malformed())?;
                let to = text[i..].parse::<Coord>().map_err(|_| malformed())?;
                (Some(from), to)
            }
        };

        match from {
            None => Ok(Move::expand(color, to)),
            Some(from) => match from.chebyshev(&to) {
                2 => Ok(Move::jump(color, from, to)),
                0 | 1 => Ok(Move::expand_from(color, from, to)),
                _ => Err(IllegalMove::TooFar { from, to }),
            },
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    pub fn from(&self) -> Option<Coord> {
        self.from
    }

    pub fn to(&self) -> Coord {
        self.to
    }

    pub fn is_jump(&self) -> bool {
        self.kind == MoveKind::Jump
    }

    /// Search value of this move for its mover, if it has been evaluated.
    pub fn score(&self) -> Option<i32> {
        self.score
    }

    pub fn set_score(&mut self, score: Option<i32>) {
        self.score = score;
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.color == other.color
            && self.kind == other.kind
            && self.to == other.to
            && (self.kind == MoveKind::Expand || self.from == other.from)
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.color.hash(state);
        self.kind.hash(state);
        if self.kind == MoveKind::Jump {
            self.from.hash(state);
        }
        self.to.hash(state);
    }
}

impl SearchMove for Move {
    fn score(&self) -> Option<i32> {
        self.score
    }

    fn set_score(&mut self, score: Option<i32>) {
        self.score = score;
    }

    /// Best first: higher scores, unevaluated last, expands ahead of jumps.
    fn order_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| self.kind.cmp(&other.kind))
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.from {
            Some(from) => write!(f, "{}{}", from, self.to),
            None => write!(f, "{}", self.to),
        }
    }
}
