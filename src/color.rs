#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum Color {
    Black = 1,
    White = -1,
}

const OPPOSITE: [Color; 2] = [Color::White, Color::Black];
const GLYPH: [char; 2] = ['B', 'W'];

impl Color {
    pub const ALL: [Color; 2] = [Color::Black, Color::White];

    #[inline]
    fn index(self) -> usize {
        match self {
            Color::Black => 0,
            Color::White => 1,
        }
    }

    #[inline]
    pub fn opposite(self) -> Color {
        OPPOSITE[self.index()]
    }

    /// +1 for Black, -1 for White. Evaluations are always from Black's side.
    #[inline]
    pub fn sign(self) -> i32 {
        self as i8 as i32
    }

    pub fn to_char(self) -> char {
        GLYPH[self.index()]
    }

    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'B' | 'b' => Some(Color::Black),
            'W' | 'w' => Some(Color::White),
            _ => None,
        }
    }

    pub fn from_int(i: i8) -> Option<Color> {
        match i {
            1 => Some(Color::Black),
            -1 => Some(Color::White),
            _ => None,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let color_str = match self {
            Color::Black => "Black",
            Color::White => "White",
        };
        write!(f, "{}", color_str)
    }
}
