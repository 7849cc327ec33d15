use std::fmt;

use crate::color::Color;
use crate::coord::Coord;
use crate::error::{GameError, IllegalMove};
use crate::piece::Piece;
use crate::square::{Square, ONE_AWAY, TWO_AWAY};

pub const STANDARD_COLS: u8 = 7;
pub const STANDARD_ROWS: u8 = 7;

/// Files are lettered, so boards are at most 26 wide.
pub const MIN_SIZE: u8 = 1;
pub const MAX_SIZE: u8 = 26;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    squares: Vec<Square>,
    width: u8,
    height: u8,
}

impl Board {
    pub fn new(width: u8, height: u8) -> Self {
        Self::with_blocked(width, height, &[])
    }

    /// Build a board where the listed squares can never hold a piece.
    /// Blocked squares are left out of every neighbor list.
    pub fn with_blocked(width: u8, height: u8, blocked: &[Coord]) -> Self {
        debug_assert!((MIN_SIZE..=MAX_SIZE).contains(&width));
        debug_assert!((MIN_SIZE..=MAX_SIZE).contains(&height));

        let mut squares: Vec<Square> = (0..width as usize * height as usize)
            .map(|idx| {
                let coord = Coord::from_index(idx, width);
                Square::new(coord, !blocked.contains(&coord))
            })
            .collect();

        let reachable = |squares: &[Square], origin: Coord, offsets: &[(i8, i8)]| -> Vec<Coord> {
            offsets
                .iter()
                .map(|&(df, dr)| origin.offset(df, dr))
                .filter(|c| c.is_valid(width, height) && squares[c.to_index(width)].is_open())
                .collect()
        };

        for idx in 0..squares.len() {
            let origin = squares[idx].coord();
            let one_away = reachable(&squares, origin, &ONE_AWAY);
            let two_away = reachable(&squares, origin, &TWO_AWAY);
            squares[idx].set_neighbors(one_away, two_away);
        }

        Board {
            squares,
            width,
            height,
        }
    }

    pub fn standard() -> Self {
        Self::new(STANDARD_COLS, STANDARD_ROWS)
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    #[inline]
    fn index(&self, coord: &Coord) -> Option<usize> {
        if coord.is_valid(self.width, self.height) {
            Some(coord.to_index(self.width))
        } else {
            None
        }
    }

    #[inline]
    pub fn is_on_board(&self, coord: &Coord) -> bool {
        coord.is_valid(self.width, self.height)
    }

    pub fn square(&self, coord: &Coord) -> Option<&Square> {
        self.index(coord).map(|idx| &self.squares[idx])
    }

    /// Squares in row-major order (rank outer, file inner).
    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    /// True iff the square exists, is playable and holds nothing.
    #[inline]
    pub fn square_is_empty(&self, coord: &Coord) -> bool {
        self.square(coord).is_some_and(Square::is_empty)
    }

    pub fn piece_at(&self, coord: &Coord) -> Option<Piece> {
        self.square(coord).and_then(Square::piece)
    }

    pub fn color_at(&self, coord: &Coord) -> Option<Color> {
        self.piece_at(coord).map(|p| p.color())
    }

    pub fn place_piece(&mut self, piece: Piece, coord: &Coord) -> Result<(), GameError> {
        let idx = self.index(coord).ok_or(IllegalMove::OffBoard(*coord))?;
        let square = &mut self.squares[idx];
        if !square.is_empty() {
            return Err(IllegalMove::Occupied(*coord).into());
        }
        square.set_piece(Some(piece));
        Ok(())
    }

    pub fn remove_piece(&mut self, coord: &Coord) -> Result<Piece, GameError> {
        let idx = self.index(coord).ok_or(IllegalMove::OffBoard(*coord))?;
        self.squares[idx]
            .take_piece()
            .ok_or_else(|| IllegalMove::Empty(*coord).into())
    }

    /// Overwrite a square for position setup. Off-board and blocked squares
    /// are ignored.
    pub fn set_piece(&mut self, coord: &Coord, color: Option<Color>) {
        if let Some(idx) = self.index(coord) {
            let square = &mut self.squares[idx];
            if square.is_open() {
                square.set_piece(color.map(Piece::new));
            }
        }
    }

    pub fn clear(&mut self) {
        for square in &mut self.squares {
            square.set_piece(None);
        }
    }

    pub fn count(&self, color: Color) -> usize {
        self.squares
            .iter()
            .filter(|s| s.piece().is_some_and(|p| p.color() == color))
            .count()
    }

    /// Squares holding `color`, row-major.
    pub fn occupied_by(&self, color: Color) -> impl Iterator<Item = &Square> + '_ {
        self.squares
            .iter()
            .filter(move |s| s.piece().is_some_and(|p| p.color() == color))
    }

    /// Flip every enemy piece in the 3×3 block around `center`. The result
    /// lists flipped squares in ascending file, then ascending rank; undo
    /// replays exactly this list.
    pub fn flip_around_square(&mut self, center: &Coord, moving: Color) -> Vec<Coord> {
        let mut flipped = Vec::new();
        let Some(idx) = self.index(center) else {
            return flipped;
        };

        let target = moving.opposite();
        for i in 0..self.squares[idx].one_away().len() {
            let neighbor = self.squares[idx].one_away()[i];
            let n_idx = neighbor.to_index(self.width);
            if let Some(piece) = self.squares[n_idx].piece_mut() {
                if piece.color() == target {
                    piece.flip();
                    flipped.push(neighbor);
                }
            }
        }

        flipped
    }

    pub fn flip_at_coordinates(&mut self, coords: &[Coord]) {
        for coord in coords {
            if let Some(idx) = self.index(coord) {
                if let Some(piece) = self.squares[idx].piece_mut() {
                    piece.flip();
                }
            }
        }
    }

    /// Enemy pieces bracketed between `center` and another `moving` piece
    /// along any of the eight lines. Does not modify the board.
    pub fn line_captures(&self, center: &Coord, moving: Color) -> Vec<Coord> {
        let mut captured = Vec::new();
        let target = moving.opposite();

        for (df, dr) in ONE_AWAY {
            let mut run = Vec::new();
            let mut cursor = center.offset(df, dr);
            while self.color_at(&cursor) == Some(target) {
                run.push(cursor);
                cursor = cursor.offset(df, dr);
            }
            if !run.is_empty() && self.color_at(&cursor) == Some(moving) {
                captured.extend(run);
            }
        }

        captured
    }

    pub fn flip_lines(&mut self, center: &Coord, moving: Color) -> Vec<Coord> {
        let captured = self.line_captures(center, moving);
        self.flip_at_coordinates(&captured);
        captured
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..self.height as i8).rev() {
            write!(f, "{:>2} |", rank as i16 + 1)?;

            for file in 0..self.width as i8 {
                let square = &self.squares[Coord::new(file, rank).to_index(self.width)];
                let c = match square.piece() {
                    Some(piece) => piece.color().to_char(),
                    None if square.is_open() => '.',
                    None => '#',
                };

                write!(f, "{}|", c)?;
            }

            writeln!(f)?;
        }

        // File letters
        write!(f, "    ")?;
        for file in 0..self.width {
            write!(f, "{} ", (b'a' + file) as char)?;
        }
        writeln!(f)?;

        Ok(())
    }
}
