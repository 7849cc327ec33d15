//! Reversi: the line-capture game. A disc may only go where it brackets at
//! least one straight run of enemy discs, and every bracketed run flips.
//! Shares the board, undo records and search with the Ataxx engine.

use std::cmp::Ordering;
use std::fmt;

use crate::board::Board;
use crate::color::Color;
use crate::coord::Coord;
use crate::error::{GameError, IllegalMove};
use crate::game::UndoRecord;
use crate::piece::Piece;
use crate::rules::{Rules, SearchMove};

pub const STANDARD_SIZE: u8 = 8;

/// A disc placement. As with Ataxx moves, `score` is search bookkeeping and
/// is ignored by equality.
#[derive(Clone, Copy, Debug)]
pub struct Placement {
    color: Color,
    at: Coord,
    score: Option<i32>,
}

impl Placement {
    pub fn new(color: Color, at: Coord) -> Self {
        Placement {
            color,
            at,
            score: None,
        }
    }

    pub fn parse(text: &str, color: Color) -> Result<Self, IllegalMove> {
        let at = text
            .trim()
            .parse::<Coord>()
            .map_err(|_| IllegalMove::Malformed(text.to_string()))?;
        Ok(Placement::new(color, at))
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn at(&self) -> Coord {
        self.at
    }

    pub fn score(&self) -> Option<i32> {
        self.score
    }
}

impl PartialEq for Placement {
    fn eq(&self, other: &Self) -> bool {
        self.color == other.color && self.at == other.at
    }
}

impl Eq for Placement {}

impl SearchMove for Placement {
    fn score(&self) -> Option<i32> {
        self.score
    }

    fn set_score(&mut self, score: Option<i32>) {
        self.score = score;
    }

    fn order_cmp(&self, other: &Self) -> Ordering {
        other.score.cmp(&self.score)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.at)
    }
}

#[derive(Clone, Debug)]
pub struct ReversiGame {
    board: Board,
    side_to_move: Color,
    history: Vec<UndoRecord<Placement>>,
}

impl ReversiGame {
    /// Four discs in the centre, White on the d4/e5 diagonal, Black to move.
    /// Both dimensions should be even and at least 2.
    pub fn new(width: u8, height: u8) -> Self {
        let mut board = Board::new(width, height);
        let (f, r) = (width as i8 / 2 - 1, height as i8 / 2 - 1);

        board.set_piece(&Coord::new(f, r), Some(Color::White));
        board.set_piece(&Coord::new(f + 1, r + 1), Some(Color::White));
        board.set_piece(&Coord::new(f, r + 1), Some(Color::Black));
        board.set_piece(&Coord::new(f + 1, r), Some(Color::Black));

        Self::from_board(board, Color::Black)
    }

    pub fn standard() -> Self {
        Self::new(STANDARD_SIZE, STANDARD_SIZE)
    }

    pub fn from_board(board: Board, side_to_move: Color) -> Self {
        ReversiGame {
            board,
            side_to_move,
            history: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    pub fn legal_moves_for(&self, color: Color) -> Vec<Placement> {
        self.board
            .squares()
            .iter()
            .filter(|s| s.is_empty())
            .map(|s| s.coord())
            .filter(|at| !self.board.line_captures(at, color).is_empty())
            .map(|at| Placement::new(color, at))
            .collect()
    }

    fn has_legal_move(&self, color: Color) -> bool {
        self.board
            .squares()
            .iter()
            .filter(|s| s.is_empty())
            .any(|s| !self.board.line_captures(&s.coord(), color).is_empty())
    }

    pub fn apply_move(&mut self, mv: &Placement) -> Result<(), GameError> {
        let at = mv.at;
        if !self.board.is_on_board(&at) {
            return Err(IllegalMove::OffBoard(at).into());
        }
        if !self.board.square_is_empty(&at) {
            return Err(IllegalMove::Occupied(at).into());
        }
        if self.board.line_captures(&at, mv.color).is_empty() {
            return Err(IllegalMove::NoCapture(at).into());
        }

        self.board.place_piece(Piece::new(mv.color), &at)?;
        let flipped = self.board.flip_lines(&at, mv.color);

        self.history.push(UndoRecord {
            mv: Some(*mv),
            flipped,
        });
        self.side_to_move = self.side_to_move.opposite();

        Ok(())
    }

    pub fn pass_turn(&mut self) -> Result<(), GameError> {
        if self.has_legal_move(self.side_to_move) {
            return Err(IllegalMove::MustMove(self.side_to_move).into());
        }
        if !self.has_legal_move(self.side_to_move.opposite()) {
            return Err(IllegalMove::GameOver.into());
        }

        self.history.push(UndoRecord {
            mv: None,
            flipped: Vec::new(),
        });
        self.side_to_move = self.side_to_move.opposite();

        Ok(())
    }

    pub fn undo_last_move(&mut self) -> Result<(), GameError> {
        let record = self.history.pop().ok_or(GameError::EmptyHistory)?;

        if let Some(mv) = record.mv {
            self.board.remove_piece(&mv.at)?;
            self.board.flip_at_coordinates(&record.flipped);
        }
        self.side_to_move = self.side_to_move.opposite();

        Ok(())
    }

    pub fn is_over(&self) -> bool {
        !self.has_legal_move(Color::Black) && !self.has_legal_move(Color::White)
    }

    pub fn evaluate(&self) -> i32 {
        self.board.count(Color::Black) as i32 - self.board.count(Color::White) as i32
    }
}

impl Rules for ReversiGame {
    type Move = Placement;

    fn legal_moves(&self) -> Vec<Placement> {
        self.legal_moves_for(self.side_to_move)
    }

    fn apply_move(&mut self, mv: &Placement) -> Result<(), GameError> {
        ReversiGame::apply_move(self, mv)
    }

    fn pass_turn(&mut self) -> Result<(), GameError> {
        ReversiGame::pass_turn(self)
    }

    fn undo_last_move(&mut self) -> Result<(), GameError> {
        ReversiGame::undo_last_move(self)
    }

    fn is_over(&self) -> bool {
        ReversiGame::is_over(self)
    }

    fn evaluate(&self) -> i32 {
        ReversiGame::evaluate(self)
    }

    fn side_to_move(&self) -> Color {
        self.side_to_move
    }
}

impl Default for ReversiGame {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for ReversiGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Reversi(turn: {}, is_over: {})\n{}",
            self.side_to_move,
            self.is_over(),
            self.board
        )
    }
}
