//! Outbound GTP commands

use crate::error::GtpError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stone color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// Short GTP token
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Black => "b",
            Color::White => "w",
        }
    }
}

impl FromStr for Color {
    type Err = GtpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "b" | "black" => Ok(Color::Black),
            "w" | "white" => Ok(Color::White),
            other => Err(GtpError::MalformedRequest(format!(
                "invalid color: {:?}",
                other
            ))),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = GtpError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.as_str().to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A move coordinate (`d4`, `Q16`, `pass`, ...)
///
/// Passed to the engine verbatim. It must be a single token, so a vertex can
/// never smuggle a second command onto the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Vertex(String);

impl Vertex {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Vertex {
    type Err = GtpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.is_empty() {
            return Err(GtpError::MalformedRequest("move must not be empty".into()));
        }
        if token.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(GtpError::MalformedRequest(format!(
                "move must be a single token: {:?}",
                s
            )));
        }
        Ok(Vertex(token.to_string()))
    }
}

impl TryFrom<String> for Vertex {
    type Error = GtpError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Vertex> for String {
    fn from(vertex: Vertex) -> Self {
        vertex.0
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Commands sent to the engine
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Set the board size
    BoardSize(u32),
    /// Set komi
    Komi(f64),
    /// Clear the board
    ClearBoard,
    /// Place a stone
    Play { color: Color, vertex: Vertex },
    /// Ask the engine to generate (and play) a move
    GenMove(Color),
    /// Ask the engine to exit
    Quit,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::BoardSize(size) => write!(f, "boardsize {}", size),
            // GTP komi always goes out with one decimal place
            Command::Komi(komi) => write!(f, "komi {:.1}", komi),
            Command::ClearBoard => f.write_str("clear_board"),
            Command::Play { color, vertex } => write!(f, "play {} {}", color, vertex),
            Command::GenMove(color) => write!(f, "genmove {}", color),
            Command::Quit => f.write_str("quit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_rendering() {
        assert_eq!(Command::BoardSize(19).to_string(), "boardsize 19");
        assert_eq!(Command::Komi(7.5).to_string(), "komi 7.5");
        assert_eq!(Command::Komi(6.0).to_string(), "komi 6.0");
        assert_eq!(Command::ClearBoard.to_string(), "clear_board");
        assert_eq!(Command::Quit.to_string(), "quit");

        let play = Command::Play {
            color: Color::Black,
            vertex: "d4".parse().unwrap(),
        };
        assert_eq!(play.to_string(), "play b d4");
        assert_eq!(Command::GenMove(Color::White).to_string(), "genmove w");
    }

    #[test]
    fn test_komi_rounds_to_one_decimal() {
        assert_eq!(Command::Komi(7.0 / 3.0).to_string(), "komi 2.3");
        assert_eq!(Command::Komi(-0.5).to_string(), "komi -0.5");
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!("b".parse::<Color>().unwrap(), Color::Black);
        assert_eq!("Black".parse::<Color>().unwrap(), Color::Black);
        assert_eq!("W".parse::<Color>().unwrap(), Color::White);
        assert_eq!("white".parse::<Color>().unwrap(), Color::White);
        assert!("red".parse::<Color>().is_err());
        assert!("".parse::<Color>().is_err());
    }

    #[test]
    fn test_color_from_json() {
        let color: Color = serde_json::from_str(r#""w""#).unwrap();
        assert_eq!(color, Color::White);
        assert!(serde_json::from_str::<Color>(r#""green""#).is_err());
    }

    #[test]
    fn test_vertex_rejects_injection() {
        assert_eq!("Q16".parse::<Vertex>().unwrap().as_str(), "Q16");
        assert_eq!(" pass ".parse::<Vertex>().unwrap().as_str(), "pass");
        assert!("".parse::<Vertex>().is_err());
        assert!("d4\nquit".parse::<Vertex>().is_err());
        assert!("d4 d5".parse::<Vertex>().is_err());
    }
}
