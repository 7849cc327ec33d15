use crate::color::Color;
use crate::game::Game;
use crate::r#move::Move;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Games serialize as `"WxH:move;move;..."`, replayed from `Game::new(W, H)`.
/// Passes are written as `pass`.
impl Serialize for Game {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let moves: Vec<String> = self
            .move_history()
            .iter()
            .map(|m| match m {
                Some(mv) => mv.to_string(),
                None => "pass".to_string(),
            })
            .collect();
        let moves_str = moves.join(";");

        let full = format!("{}x{}:{}", self.width(), self.height(), moves_str);
        serializer.serialize_str(&full)
    }
}

impl<'de> Deserialize<'de> for Game {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_game(&s).map_err(serde::de::Error::custom)
    }
}

fn parse_game(s: &str) -> Result<Game, String> {
    let (dims, moves_str) = s
        .split_once(':')
        .ok_or_else(|| "Missing dimensions".to_string())?;
    let (w, h) = dims
        .split_once('x')
        .ok_or_else(|| "Invalid dimensions format".to_string())?;
    let width: u8 = w.parse().map_err(|e| format!("Invalid width: {}", e))?;
    let height: u8 = h.parse().map_err(|e| format!("Invalid height: {}", e))?;

    let size_range = crate::board::MIN_SIZE..=crate::board::MAX_SIZE;
    if !size_range.contains(&width) || !size_range.contains(&height) {
        return Err(format!("Unsupported board size {}x{}", width, height));
    }

    let mut game = Game::new(width, height);

    if moves_str.is_empty() {
        return Ok(game);
    }

    for move_str in moves_str.split(';') {
        let move_str = move_str.trim();

        let played = if move_str == "pass" {
            game.pass_turn()
        } else {
            Move::parse(move_str, game.side_to_move())
                .map_err(Into::into)
                .and_then(|mv| game.apply_move(&mv))
        };
        played.map_err(|e| format!("Invalid move {}: {}", move_str, e))?;
    }

    Ok(game)
}

/// Moves serialize as `"<color glyph>:<move>"`, e.g. `"B:a1c3"`.
impl Serialize for Move {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{}:{}", self.color().to_char(), self))
    }
}

impl<'de> Deserialize<'de> for Move {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_move(&s).map_err(serde::de::Error::custom)
    }
}

fn parse_move(s: &str) -> Result<Move, String> {
    let (glyph, text) = s
        .split_once(':')
        .ok_or_else(|| format!("Invalid move format: {}", s))?;

    let mut chars = glyph.chars();
    let color = match (chars.next().and_then(Color::from_char), chars.next()) {
        (Some(color), None) => color,
        _ => return Err(format!("Invalid color: {}", glyph)),
    };

    Move::parse(text, color).map_err(|e| e.to_string())
}
