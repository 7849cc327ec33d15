use std::fmt;
use std::str::FromStr;

use crate::error::IllegalMove;

/// A (file, rank) pair. Carries no knowledge of any board's bounds, so it
/// may point off the board; the board decides validity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub file: i8,
    pub rank: i8,
}

impl Coord {
    pub const fn new(file: i8, rank: i8) -> Self {
        Coord { file, rank }
    }

    pub fn from_index(index: usize, width: u8) -> Self {
        let w = width as usize;
        Coord {
            file: (index % w) as i8,
            rank: (index / w) as i8,
        }
    }

    /// Row-major index. Only meaningful for coordinates already known to be
    /// on a board of the given width.
    pub fn to_index(&self, width: u8) -> usize {
        self.rank as usize * width as usize + self.file as usize
    }

    pub fn is_valid(&self, width: u8, height: u8) -> bool {
        self.file >= 0 && self.rank >= 0 && (self.file as u8) < width && (self.rank as u8) < height
    }

    #[inline]
    pub fn offset(&self, df: i8, dr: i8) -> Coord {
        Coord::new(self.file.wrapping_add(df), self.rank.wrapping_add(dr))
    }

    /// King-move distance: max of the per-axis distances.
    #[inline]
    pub fn chebyshev(&self, other: &Coord) -> u8 {
        let df = (self.file as i16 - other.file as i16).unsigned_abs();
        let dr = (self.rank as i16 - other.rank as i16).unsigned_abs();
        df.max(dr) as u8
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if (0..26).contains(&self.file) && self.rank >= 0 {
            write!(f, "{}{}", (b'a' + self.file as u8) as char, self.rank as i16 + 1)
        } else {
            write!(f, "({}, {})", self.file, self.rank)
        }
    }
}

/// Parses `<file letter><1-based rank>`, e.g. `a1` or `c12`.
impl FromStr for Coord {
    type Err = IllegalMove;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || IllegalMove::Malformed(s.to_string());

        let mut chars = s.chars();
        let letter = chars.next().ok_or_else(malformed)?.to_ascii_lowercase();
        if !letter.is_ascii_lowercase() {
            return Err(malformed());
        }

        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let rank: i8 = digits.parse().map_err(|_| malformed())?;
        if rank < 1 {
            return Err(malformed());
        }

        Ok(Coord::new((letter as u8 - b'a') as i8, rank - 1))
    }
}
