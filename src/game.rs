use crate::board::{Board, STANDARD_COLS, STANDARD_ROWS};
use crate::color::Color;
use crate::coord::Coord;
use crate::error::{GameError, IllegalMove};
use crate::outcome::GameOutcome;
use crate::piece::Piece;
use crate::r#move::{Move, MoveKind};
use crate::rules::Rules;
use crate::search::{SearchConfig, Searcher};

/// What undo needs to reverse one history step. `mv` is `None` for a pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct UndoRecord<M> {
    pub(crate) mv: Option<M>,
    pub(crate) flipped: Vec<Coord>,
}

/// An Ataxx game: one board, the side to move and the undo stack.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    side_to_move: Color,
    history: Vec<UndoRecord<Move>>,
}

impl Game {
    /// Start position: Black in the bottom-left and top-right corners, White
    /// in the other two, Black to move. On boards a single square wide the
    /// corners coincide and the later placement wins.
    pub fn new(width: u8, height: u8) -> Self {
        let mut game = Self::empty(width, height);
        let (right, top) = (width as i8 - 1, height as i8 - 1);

        game.board.set_piece(&Coord::new(0, 0), Some(Color::Black));
        game.board.set_piece(&Coord::new(right, top), Some(Color::Black));
        game.board.set_piece(&Coord::new(right, 0), Some(Color::White));
        game.board.set_piece(&Coord::new(0, top), Some(Color::White));

        game
    }

    pub fn empty(width: u8, height: u8) -> Self {
        Self::from_board(Board::new(width, height), Color::Black)
    }

    pub fn standard() -> Self {
        Self::new(STANDARD_COLS, STANDARD_ROWS)
    }

    pub fn from_board(board: Board, side_to_move: Color) -> Self {
        Game {
            board,
            side_to_move,
            history: Vec::new(),
        }
    }

    pub fn width(&self) -> u8 {
        self.board.width()
    }

    pub fn height(&self) -> u8 {
        self.board.height()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_as_text(&self) -> String {
        self.board.to_string()
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn get_piece(&self, coord: &Coord) -> Option<Color> {
        self.board.color_at(coord)
    }

    /// Position setup. Does not touch the history.
    pub fn set_piece(&mut self, coord: &Coord, color: Option<Color>) {
        self.board.set_piece(coord, color)
    }

    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    /// Applied moves, oldest first. Passes appear as `None`.
    pub fn move_history(&self) -> Vec<Option<Move>> {
        self.history.iter().map(|r| r.mv).collect()
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.legal_moves_for(self.side_to_move)
    }

    /// All moves for `color`. Occupied squares are visited row-major; each
    /// contributes its expands (skipping destinations an earlier square
    /// already offered) followed by its jumps.
    #[cfg_attr(feature = "hotpath", hotpath::measure)]
    pub fn legal_moves_for(&self, color: Color) -> Vec<Move> {
        let width = self.board.width();
        let mut moves = Vec::new();
        let mut seen = vec![false; width as usize * self.board.height() as usize];

        for square in self.board.occupied_by(color) {
            let from = square.coord();

            for to in square.one_away() {
                let idx = to.to_index(width);
                if !seen[idx] && self.board.square_is_empty(to) {
                    seen[idx] = true;
                    moves.push(Move::expand(color, *to));
                }
            }

            for to in square.two_away() {
                if self.board.square_is_empty(to) {
                    moves.push(Move::jump(color, from, *to));
                }
            }
        }

        moves
    }

    fn has_legal_move(&self, color: Color) -> bool {
        self.board.occupied_by(color).any(|square| {
            square
                .one_away()
                .iter()
                .chain(square.two_away())
                .any(|to| self.board.square_is_empty(to))
        })
    }

    fn validate(&self, mv: &Move) -> Result<(), IllegalMove> {
        let color = mv.color();
        let to = mv.to();

        if !self.board.is_on_board(&to) {
            return Err(IllegalMove::OffBoard(to));
        }
        if let Some(from) = mv.from() {
            if !self.board.is_on_board(&from) {
                return Err(IllegalMove::OffBoard(from));
            }
        }
        if !self.board.square_is_empty(&to) {
            return Err(IllegalMove::Occupied(to));
        }

        match (mv.kind(), mv.from()) {
            (kind, Some(from)) => {
                let expected = match kind {
                    MoveKind::Expand => 1,
                    MoveKind::Jump => 2,
                };
                if from.chebyshev(&to) != expected {
                    return Err(IllegalMove::WrongDistance { kind, from, to });
                }
                if self.board.color_at(&from) != Some(color) {
                    return Err(IllegalMove::MissingPiece { at: from, color });
                }
            }
            (MoveKind::Expand, None) => {
                let adjacent = self.board.square(&to).is_some_and(|square| {
                    square
                        .one_away()
                        .iter()
                        .any(|c| self.board.color_at(c) == Some(color))
                });
                if !adjacent {
                    return Err(IllegalMove::NotAdjacent(to));
                }
            }
            (MoveKind::Jump, None) => return Err(IllegalMove::Malformed(mv.to_string())),
        }

        Ok(())
    }

    pub fn is_legal_move(&self, mv: &Move) -> bool {
        self.validate(mv).is_ok()
    }

    /// Play `mv`, flipping every enemy piece around its destination. Nothing
    /// is modified when the move is refused.
    #[cfg_attr(feature = "hotpath", hotpath::measure)]
    pub fn apply_move(&mut self, mv: &Move) -> Result<(), GameError> {
        self.validate(mv)?;

        let piece = match (mv.kind(), mv.from()) {
            (MoveKind::Jump, Some(from)) => self.board.remove_piece(&from)?,
            _ => Piece::new(mv.color()),
        };
        self.board.place_piece(piece, &mv.to())?;

        let flipped = self.board.flip_around_square(&mv.to(), mv.color());

        self.history.push(UndoRecord {
            mv: Some(*mv),
            flipped,
        });

        self.side_to_move = self.side_to_move.opposite();

        Ok(())
    }

    /// Skip the turn of a side that cannot move.
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

    #[cfg_attr(feature = "hotpath", hotpath::measure)]
    pub fn undo_last_move(&mut self) -> Result<(), GameError> {
        let record = self.history.pop().ok_or(GameError::EmptyHistory)?;

        if let Some(mv) = record.mv {
            self.board.remove_piece(&mv.to())?;
            if let (MoveKind::Jump, Some(from)) = (mv.kind(), mv.from()) {
                self.board.place_piece(Piece::new(mv.color()), &from)?;
            }
            self.board.flip_at_coordinates(&record.flipped);
        }

        self.side_to_move = self.side_to_move.opposite();

        Ok(())
    }

    /// The game ends only when neither side has a move.
    pub fn is_over(&self) -> bool {
        !self.has_legal_move(Color::Black) && !self.has_legal_move(Color::White)
    }

    /// Black's piece count minus White's.
    pub fn evaluate(&self) -> i32 {
        self.board.count(Color::Black) as i32 - self.board.count(Color::White) as i32
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        if self.is_over() {
            Some(GameOutcome::from_material(self.evaluate()))
        } else {
            None
        }
    }

    /// Best move for the side to move with the default search settings, or
    /// `None` if it cannot move. Depth 0 is treated as depth 1.
    pub fn search(&mut self, depth: u8) -> Result<Option<Move>, GameError> {
        Searcher::new(SearchConfig::default()).search(self, depth)
    }
}

impl Rules for Game {
    type Move = Move;

    fn legal_moves(&self) -> Vec<Move> {
        Game::legal_moves(self)
    }

    fn apply_move(&mut self, mv: &Move) -> Result<(), GameError> {
        Game::apply_move(self, mv)
    }

    fn pass_turn(&mut self) -> Result<(), GameError> {
        Game::pass_turn(self)
    }

    fn undo_last_move(&mut self) -> Result<(), GameError> {
        Game::undo_last_move(self)
    }

    fn is_over(&self) -> bool {
        Game::is_over(self)
    }

    fn evaluate(&self) -> i32 {
        Game::evaluate(self)
    }

    fn side_to_move(&self) -> Color {
        self.side_to_move
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Game(turn: {}, is_over: {}, outcome: {:?})\n{}",
            self.side_to_move,
            self.is_over(),
            self.outcome(),
            self.board
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(file: i8, rank: i8) -> Coord {
        Coord::new(file, rank)
    }

    /// Apply and undo every legal move (and forced pass) down to `depth`,
    /// checking the position is restored exactly after each one.
    fn assert_round_trips(game: &mut Game, depth: usize) {
        if depth == 0 {
            return;
        }

        let board = game.board().clone();
        let text = game.board_as_text();
        let side = game.side_to_move();
        let count = game.move_count();

        let moves = game.legal_moves();
        if moves.is_empty() && !game.is_over() {
            game.pass_turn().unwrap();
            assert_round_trips(game, depth - 1);
            game.undo_last_move().unwrap();
        }

        for mv in &moves {
            game.apply_move(mv).unwrap();
            assert_round_trips(game, depth - 1);
            game.undo_last_move().unwrap();

            assert_eq!(game.board_as_text(), text, "after {}", mv);
            assert_eq!(game.board(), &board, "after {}", mv);
            assert_eq!(game.side_to_move(), side);
            assert_eq!(game.move_count(), count);
        }
    }

    macro_rules! round_trip_tests {
        ($($name:ident: ($w:expr, $h:expr, $depth:expr);)*) => {
            $(
                paste::paste! {
                    #[test]
                    fn [<test_apply_undo_round_trip_ $name>]() {
                        let mut game = Game::new($w, $h);
                        assert_round_trips(&mut game, $depth);
                        assert_eq!(game.move_count(), 0);
                    }
                }
            )*
        };
    }

    round_trip_tests! {
        board_3x3: (3, 3, 4);
        board_4x5: (4, 5, 3);
        board_7x7: (7, 7, 3);
    }

    #[test]
    fn test_new_game() {
        let game = Game::standard();
        assert_eq!(game.side_to_move(), Color::Black);
        assert!(!game.is_over());
        assert!(game.outcome().is_none());
        assert_eq!(game.evaluate(), 0);
        assert_eq!(game.get_piece(&c(0, 0)), Some(Color::Black));
        assert_eq!(game.get_piece(&c(6, 6)), Some(Color::Black));
        assert_eq!(game.get_piece(&c(6, 0)), Some(Color::White));
        assert_eq!(game.get_piece(&c(0, 6)), Some(Color::White));
    }

    #[test]
    fn test_legal_moves_initial() {
        let game = Game::standard();
        let moves = game.legal_moves();
        assert!(!moves.is_empty());
        // Two corner pieces, each with 3 expands and 5 jumps.
        assert_eq!(moves.len(), 16);
        assert!(moves.iter().all(|m| m.color() == Color::Black));
    }

    #[test]
    fn test_single_square_board() {
        let game = Game::empty(1, 1);
        assert!(game.legal_moves_for(Color::Black).is_empty());
        assert!(game.legal_moves_for(Color::White).is_empty());
        assert!(game.is_over());
        assert_eq!(game.outcome(), Some(GameOutcome::Draw));
    }

    #[test]
    fn test_lone_corner_piece_moves() {
        let mut game = Game::empty(4, 5);
        game.set_piece(&c(0, 0), Some(Color::White));

        let moves = game.legal_moves_for(Color::White);
        let expands: Vec<Coord> = moves
            .iter()
            .filter(|m| m.kind() == MoveKind::Expand)
            .map(|m| m.to())
            .collect();
        let jumps: Vec<Coord> = moves.iter().filter(|m| m.is_jump()).map(|m| m.to()).collect();

        assert_eq!(expands, vec![c(0, 1), c(1, 0), c(1, 1)]);
        assert_eq!(jumps, vec![c(0, 2), c(1, 2), c(2, 0), c(2, 1), c(2, 2)]);
        assert!(moves
            .iter()
            .filter(|m| m.is_jump())
            .all(|m| m.from() == Some(c(0, 0))));
        // Expands come before jumps for the same source.
        assert_eq!(moves[..3].iter().filter(|m| m.is_jump()).count(), 0);

        assert!(game.legal_moves_for(Color::Black).is_empty());
    }

    #[test]
    fn test_expands_are_deduplicated_but_jumps_are_not() {
        let mut game = Game::empty(5, 5);
        game.set_piece(&c(1, 2), Some(Color::Black));
        game.set_piece(&c(3, 2), Some(Color::Black));

        let moves = game.legal_moves();
        let shared_expands = moves
            .iter()
            .filter(|m| m.kind() == MoveKind::Expand && m.to() == c(2, 2))
            .count();
        let shared_jumps = moves
            .iter()
            .filter(|m| m.is_jump() && m.to() == c(2, 4))
            .count();

        assert_eq!(shared_expands, 1);
        assert_eq!(shared_jumps, 2);

        let mut unique = moves.clone();
        unique.sort_by_key(|m| (m.kind(), m.from(), m.to()));
        unique.dedup();
        assert_eq!(unique.len(), moves.len());
    }

    #[test]
    fn test_generation_does_not_mutate() {
        let game = Game::standard();
        let before = game.board().clone();
        let first = game.legal_moves();
        let second = game.legal_moves();
        assert_eq!(first, second);
        assert_eq!(game.board(), &before);
    }

    #[test]
    fn test_apply_expand() {
        let mut game = Game::standard();
        let mv = Move::expand(Color::Black, c(1, 1));
        game.apply_move(&mv).unwrap();

        assert_eq!(game.get_piece(&c(1, 1)), Some(Color::Black));
        assert_eq!(game.get_piece(&c(0, 0)), Some(Color::Black));
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(game.move_history(), vec![Some(mv)]);
        assert_eq!(game.evaluate(), 1);
    }

    #[test]
    fn test_apply_jump_and_undo() {
        let mut game = Game::standard();
        let mv = Move::jump(Color::Black, c(0, 0), c(2, 1));
        game.apply_move(&mv).unwrap();

        assert!(game.get_piece(&c(0, 0)).is_none());
        assert_eq!(game.get_piece(&c(2, 1)), Some(Color::Black));
        assert_eq!(game.evaluate(), 0);

        game.undo_last_move().unwrap();
        assert_eq!(game.get_piece(&c(0, 0)), Some(Color::Black));
        assert!(game.get_piece(&c(2, 1)).is_none());
        assert_eq!(game.side_to_move(), Color::Black);
    }

    #[test]
    fn test_capture_flips_single_neighbor() {
        let mut game = Game::empty(6, 6);
        game.set_piece(&c(1, 1), Some(Color::Black));
        game.set_piece(&c(3, 3), Some(Color::White));
        // Outside the 3x3 block around the destination.
        game.set_piece(&c(4, 4), Some(Color::White));
        game.set_piece(&c(5, 2), Some(Color::White));

        let before = game.board().clone();
        let dest = c(2, 2);
        game.apply_move(&Move::expand(Color::Black, dest)).unwrap();

        for square in game.board().squares() {
            let at = square.coord();
            let now = game.get_piece(&at);
            if at == dest {
                assert_eq!(now, Some(Color::Black));
            } else if at == c(3, 3) {
                assert_eq!(now, Some(Color::Black));
            } else {
                assert_eq!(now, before.color_at(&at), "{} changed", at);
            }
        }

        game.undo_last_move().unwrap();
        assert_eq!(game.board(), &before);
    }

    #[test]
    fn test_capture_flips_whole_neighborhood() {
        let mut game = Game::empty(3, 3);
        for square in Board::new(3, 3).squares() {
            game.set_piece(&square.coord(), Some(Color::White));
        }
        game.set_piece(&c(1, 1), None);
        game.set_piece(&c(0, 0), Some(Color::Black));

        game.apply_move(&Move::expand(Color::Black, c(1, 1))).unwrap();

        assert_eq!(game.board().count(Color::Black), 9);
        assert!(game.is_over());
        assert_eq!(game.outcome(), Some(GameOutcome::BlackWin));
    }

    #[test]
    fn test_expand_distance_boundaries() {
        let mut game = Game::empty(5, 5);
        game.set_piece(&c(1, 1), Some(Color::Black));
        let before = game.board().clone();

        let zero = Move::expand_from(Color::Black, c(2, 2), c(2, 2));
        assert_eq!(
            game.apply_move(&zero),
            Err(GameError::IllegalMove(IllegalMove::WrongDistance {
                kind: MoveKind::Expand,
                from: c(2, 2),
                to: c(2, 2),
            }))
        );

        let far = Move::expand_from(Color::Black, c(1, 1), c(3, 1));
        assert!(matches!(
            game.apply_move(&far),
            Err(GameError::IllegalMove(IllegalMove::WrongDistance { .. }))
        ));

        let lonely = Move::expand(Color::Black, c(4, 4));
        assert_eq!(
            game.apply_move(&lonely),
            Err(GameError::IllegalMove(IllegalMove::NotAdjacent(c(4, 4))))
        );

        let foreign = Move::expand_from(Color::White, c(1, 1), c(2, 1));
        assert!(matches!(
            game.apply_move(&foreign),
            Err(GameError::IllegalMove(IllegalMove::MissingPiece { .. }))
        ));

        assert_eq!(game.board(), &before);
        assert_eq!(game.move_count(), 0);
        assert!(game.apply_move(&Move::expand_from(Color::Black, c(1, 1), c(2, 2))).is_ok());
    }

    #[test]
    fn test_jump_offsets() {
        let centre = c(2, 2);
        for df in -3i8..=3 {
            for dr in -3i8..=3 {
                let mut game = Game::empty(7, 7);
                let from = c(3, 3);
                game.set_piece(&from, Some(Color::Black));
                let to = from.offset(df, dr);
                let result = game.apply_move(&Move::jump(Color::Black, from, to));

                let ring = df.abs().max(dr.abs()) == 2;
                assert_eq!(result.is_ok(), ring, "offset ({}, {})", df, dr);
                if !ring && (df, dr) != (0, 0) {
                    assert!(matches!(
                        result,
                        Err(GameError::IllegalMove(IllegalMove::WrongDistance { .. }))
                    ));
                }
            }
        }

        // Jumping from an empty square or an enemy piece.
        let mut game = Game::empty(5, 5);
        game.set_piece(&c(0, 0), Some(Color::White));
        for from in [c(0, 0), c(4, 4)] {
            assert!(matches!(
                game.apply_move(&Move::jump(Color::Black, from, centre)),
                Err(GameError::IllegalMove(IllegalMove::MissingPiece { .. }))
            ));
        }
    }

    #[test]
    fn test_occupied_destination_rejected() {
        let mut game = Game::standard();
        game.set_piece(&c(6, 4), Some(Color::White));
        let before = game.board().clone();

        for (mv, dest) in [
            (Move::expand(Color::Black, c(0, 0)), c(0, 0)),
            (Move::expand(Color::Black, c(6, 0)), c(6, 0)),
            (Move::expand_from(Color::Black, c(6, 6), c(6, 6)), c(6, 6)),
            (Move::jump(Color::Black, c(6, 6), c(6, 4)), c(6, 4)),
        ] {
            assert_eq!(
                game.apply_move(&mv),
                Err(GameError::IllegalMove(IllegalMove::Occupied(dest)))
            );
        }
        assert_eq!(game.board(), &before);
    }

    #[test]
    fn test_off_board_rejected() {
        let mut game = Game::standard();
        assert_eq!(
            game.apply_move(&Move::expand(Color::Black, c(7, 0))),
            Err(GameError::IllegalMove(IllegalMove::OffBoard(c(7, 0))))
        );
        assert_eq!(
            game.apply_move(&Move::jump(Color::Black, c(-2, 0), c(0, 1))),
            Err(GameError::IllegalMove(IllegalMove::OffBoard(c(-2, 0))))
        );
    }

    #[test]
    fn test_parsed_moves_apply() {
        let mut game = Game::standard();
        let jump = Move::parse("a1c2", Color::Black).unwrap();
        game.apply_move(&jump).unwrap();
        assert_eq!(game.get_piece(&c(2, 1)), Some(Color::Black));

        let expand = Move::parse("g1f2", Color::White).unwrap();
        game.apply_move(&expand).unwrap();
        assert_eq!(game.get_piece(&c(5, 1)), Some(Color::White));
        assert_eq!(game.get_piece(&c(6, 0)), Some(Color::White));
    }

    #[test]
    fn test_typed_expand_matches_generated_move() {
        let mut game = Game::standard();
        let typed = Move::parse("a1b2", Color::Black).unwrap();

        assert_eq!(typed.from(), Some(c(0, 0)));
        assert!(game.legal_moves().contains(&typed));
        game.apply_move(&typed).unwrap();
        assert_eq!(game.get_piece(&c(1, 1)), Some(Color::Black));
    }

    #[test]
    fn test_undo_when_empty() {
        let mut game = Game::standard();
        assert_eq!(game.undo_last_move(), Err(GameError::EmptyHistory));
    }

    #[test]
    fn test_pass_turn() {
        let mut game = Game::empty(5, 5);
        game.set_piece(&c(2, 2), Some(Color::White));

        assert!(game.legal_moves().is_empty());
        assert!(!game.is_over());

        game.pass_turn().unwrap();
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(game.move_history(), vec![None]);
        assert_eq!(
            game.pass_turn(),
            Err(GameError::IllegalMove(IllegalMove::MustMove(Color::White)))
        );

        game.undo_last_move().unwrap();
        assert_eq!(game.side_to_move(), Color::Black);
        assert_eq!(game.move_count(), 0);
    }

    #[test]
    fn test_pass_refused_when_over() {
        let mut game = Game::empty(1, 1);
        assert_eq!(
            game.pass_turn(),
            Err(GameError::IllegalMove(IllegalMove::GameOver))
        );
    }

    #[test]
    fn test_random_playout_unwinds() {
        use rand::prelude::IndexedRandom;
        use rand::SeedableRng;

        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let mut game = Game::standard();
        let mut snapshots = vec![game.board().clone()];

        while !game.is_over() && game.move_count() < 200 {
            let moves = game.legal_moves();
            match moves.choose(&mut rng) {
                Some(mv) => game.apply_move(mv).unwrap(),
                None => game.pass_turn().unwrap(),
            }
            snapshots.push(game.board().clone());
        }

        while game.move_count() > 0 {
            snapshots.pop();
            game.undo_last_move().unwrap();
            assert_eq!(game.board(), snapshots.last().unwrap());
        }
        assert_eq!(game.side_to_move(), Color::Black);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut game = Game::standard();
        game.apply_move(&Move::expand(Color::Black, c(1, 0))).unwrap();

        let cloned = game.clone();
        game.undo_last_move().unwrap();

        assert_eq!(cloned.move_count(), 1);
        assert_eq!(cloned.get_piece(&c(1, 0)), Some(Color::Black));
        assert!(game.get_piece(&c(1, 0)).is_none());
    }
}
