use crate::color::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    BlackWin,
    WhiteWin,
    Draw,
}

impl GameOutcome {
    /// Decide a finished game by material: `diff` is Black's piece count
    /// minus White's.
    pub fn from_material(diff: i32) -> Self {
        match diff {
            d if d > 0 => GameOutcome::BlackWin,
            d if d < 0 => GameOutcome::WhiteWin,
            _ => GameOutcome::Draw,
        }
    }

    pub fn winner(&self) -> Option<Color> {
        match self {
            GameOutcome::BlackWin => Some(Color::Black),
            GameOutcome::WhiteWin => Some(Color::White),
            GameOutcome::Draw => None,
        }
    }

    pub fn is_draw(&self) -> bool {
        matches!(self, GameOutcome::Draw)
    }
}

impl std::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameOutcome::BlackWin => write!(f, "Black wins"),
            GameOutcome::WhiteWin => write!(f, "White wins"),
            GameOutcome::Draw => write!(f, "Draw"),
        }
    }
}
