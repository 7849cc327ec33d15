pub mod board;
pub mod color;
pub mod coord;
pub mod error;
pub mod game;
pub mod r#move;
pub mod outcome;
pub mod piece;
pub mod reversi;
pub mod rules;
pub mod search;
pub mod square;

#[cfg(feature = "serde")]
pub mod serde_support;

#[cfg(feature = "python")]
extern crate pyo3;

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule(gil_used = false)]
fn spooky_ataxx(m: &Bound<'_, PyModule>) -> PyResult<()> {
    use color::Color;
    use python_bindings::*;
    m.add_class::<PyGame>()?;
    m.add_class::<PyMove>()?;
    m.add("BLACK", Color::Black as i8)?;
    m.add("WHITE", Color::White as i8)?;
    Ok(())
}

#[cfg(feature = "python")]
mod python_bindings {
    use super::*;
    use crate::board::{MAX_SIZE, MIN_SIZE};
    use crate::color::Color;
    use crate::coord::Coord;
    use crate::error::GameError;
    use crate::game::Game;
    use crate::r#move::Move;

    fn check_size(width: usize, height: usize) -> PyResult<()> {
        let range = MIN_SIZE as usize..=MAX_SIZE as usize;
        if !range.contains(&width) || !range.contains(&height) {
            return Err(PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                "Board dimensions must be between {} and {}",
                MIN_SIZE, MAX_SIZE
            )));
        }
        Ok(())
    }

    fn to_py_err(err: GameError) -> PyErr {
        PyErr::new::<pyo3::exceptions::PyValueError, _>(err.to_string())
    }

    fn color_from_int(color: i8) -> PyResult<Color> {
        Color::from_int(color).ok_or_else(|| {
            PyErr::new::<pyo3::exceptions::PyValueError, _>("Color must be 1 or -1")
        })
    }

    #[pyclass(name = "Game")]
    pub struct PyGame {
        game: Game,
    }

    #[pymethods]
    impl PyGame {
        #[new]
        pub fn new(width: usize, height: usize) -> PyResult<Self> {
            check_size(width, height)?;
            Ok(PyGame {
                game: Game::new(width as u8, height as u8),
            })
        }

        #[staticmethod]
        pub fn empty(width: usize, height: usize) -> PyResult<Self> {
            check_size(width, height)?;
            Ok(PyGame {
                game: Game::empty(width as u8, height as u8),
            })
        }

        #[staticmethod]
        pub fn standard() -> Self {
            PyGame {
                game: Game::standard(),
            }
        }

        pub fn width(&self) -> usize {
            self.game.width() as usize
        }

        pub fn height(&self) -> usize {
            self.game.height() as usize
        }

        pub fn get_piece(&self, col: usize, row: usize) -> Option<i8> {
            let coord = Coord::new(col as i8, row as i8);
            self.game.get_piece(&coord).map(|c| c as i8)
        }

        pub fn set_piece(&mut self, col: usize, row: usize, piece: Option<i8>) -> PyResult<()> {
            let coord = Coord::new(col as i8, row as i8);
            let color = piece.map(color_from_int).transpose()?;
            self.game.set_piece(&coord, color);
            Ok(())
        }

        pub fn turn(&self) -> i8 {
            self.game.side_to_move() as i8
        }

        pub fn is_over(&self) -> bool {
            self.game.is_over()
        }

        pub fn evaluate(&self) -> i32 {
            self.game.evaluate()
        }

        pub fn move_count(&self) -> usize {
            self.game.move_count()
        }

        pub fn legal_moves(&self) -> Vec<PyMove> {
            self.game
                .legal_moves()
                .into_iter()
                .map(|m| PyMove { move_: m })
                .collect()
        }

        pub fn is_legal_move(&self, move_: &PyMove) -> bool {
            self.game.is_legal_move(&move_.move_)
        }

        pub fn make_move(&mut self, move_: &PyMove) -> PyResult<()> {
            self.game.apply_move(&move_.move_).map_err(to_py_err)
        }

        /// Parse a move for the side to move and play it.
        pub fn play(&mut self, text: &str) -> PyResult<()> {
            let mv = Move::parse(text, self.game.side_to_move())
                .map_err(|e| to_py_err(GameError::from(e)))?;
            self.game.apply_move(&mv).map_err(to_py_err)
        }

        pub fn pass_turn(&mut self) -> PyResult<()> {
            self.game.pass_turn().map_err(to_py_err)
        }

        pub fn unmake_move(&mut self) -> PyResult<()> {
            self.game.undo_last_move().map_err(to_py_err)
        }

        pub fn search(&mut self, depth: u8) -> PyResult<Option<PyMove>> {
            self.game
                .search(depth)
                .map(|best| best.map(|m| PyMove { move_: m }))
                .map_err(to_py_err)
        }

        pub fn winner(&self) -> Option<i8> {
            self.game
                .outcome()
                .and_then(|o| o.winner())
                .map(|c| c as i8)
        }

        pub fn clone(&self) -> PyGame {
            PyGame {
                game: self.game.clone(),
            }
        }

        pub fn __str__(&self) -> String {
            self.game.board_as_text()
        }

        pub fn __repr__(&self) -> String {
            format!(
                "Game(width={}, height={}, turn={:?}, over={})",
                self.game.width(),
                self.game.height(),
                self.game.side_to_move(),
                self.game.is_over()
            )
        }
    }

    #[pyclass(name = "Move")]
    #[derive(Clone, Debug)]
    pub struct PyMove {
        move_: Move,
    }

    #[pymethods]
    impl PyMove {
        #[staticmethod]
        pub fn parse(text: &str, color: i8) -> PyResult<Self> {
            let color = color_from_int(color)?;
            Move::parse(text, color)
                .map(|m| PyMove { move_: m })
                .map_err(|e| to_py_err(GameError::from(e)))
        }

        pub fn is_jump(&self) -> bool {
            self.move_.is_jump()
        }

        pub fn color(&self) -> i8 {
            self.move_.color() as i8
        }

        pub fn score(&self) -> Option<i32> {
            self.move_.score()
        }

        pub fn __str__(&self) -> String {
            self.move_.to_string()
        }

        pub fn __repr__(&self) -> String {
            format!("Move.parse({:?}, {})", self.move_.to_string(), self.move_.color() as i8)
        }

        pub fn __eq__(&self, other: &PyMove) -> bool {
            self.move_ == other.move_
        }

        pub fn __hash__(&self) -> u64 {
            use std::hash::{Hash, Hasher};
            let mut hasher = std::collections::hash_map::DefaultHasher::new();
            self.move_.hash(&mut hasher);
            hasher.finish()
        }
    }
}
