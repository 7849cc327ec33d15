use crate::color::Color;

/// A piece on the board. Captures change its color in place rather than
/// replacing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    color: Color,
}

impl Piece {
    pub fn new(color: Color) -> Self {
        Piece { color }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn flip(&mut self) {
        self.color = self.color.opposite();
    }
}
