use crate::coord::Coord;
use crate::piece::Piece;

/// Offsets at Chebyshev distance 1, ascending file then ascending rank.
pub const ONE_AWAY: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Offsets at Chebyshev distance 2: the four orthogonal and four diagonal
/// two-steps plus the eight knight leaps, ascending file then ascending rank.
pub const TWO_AWAY: [(i8, i8); 16] = [
    (-2, -2),
    (-2, -1),
    (-2, 0),
    (-2, 1),
    (-2, 2),
    (-1, -2),
    (-1, 2),
    (0, -2),
    (0, 2),
    (1, -2),
    (1, 2),
    (2, -2),
    (2, -1),
    (2, 0),
    (2, 1),
    (2, 2),
];

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Square {
    coord: Coord,
    piece: Option<Piece>,
    open: bool,
    one_away: Vec<Coord>,
    two_away: Vec<Coord>,
}

impl Square {
    /// Neighbor lists start empty; the owning board fills them once every
    /// square's playability is known.
    pub(crate) fn new(coord: Coord, open: bool) -> Self {
        Square {
            coord,
            piece: None,
            open,
            one_away: Vec::new(),
            two_away: Vec::new(),
        }
    }

    pub(crate) fn set_neighbors(&mut self, one_away: Vec<Coord>, two_away: Vec<Coord>) {
        self.one_away = one_away;
        self.two_away = two_away;
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn piece(&self) -> Option<Piece> {
        self.piece
    }

    pub(crate) fn piece_mut(&mut self) -> Option<&mut Piece> {
        self.piece.as_mut()
    }

    pub(crate) fn set_piece(&mut self, piece: Option<Piece>) {
        self.piece = piece;
    }

    pub(crate) fn take_piece(&mut self) -> Option<Piece> {
        self.piece.take()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_empty(&self) -> bool {
        self.open && self.piece.is_none()
    }

    /// In-bounds open squares one king step away.
    pub fn one_away(&self) -> &[Coord] {
        &self.one_away
    }

    /// In-bounds open squares exactly two steps away (including knight leaps).
    pub fn two_away(&self) -> &[Coord] {
        &self.two_away
    }
}
