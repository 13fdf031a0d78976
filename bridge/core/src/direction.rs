//! Navigation Directions
//!
//! The four directions a navigation request can take. The wire name of each
//! direction is also the payload of a `navigate` frame, so the spelling here
//! is part of the protocol.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A direction relative to the focused window or pane
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards the window above
    Up,
    /// Towards the window below
    Down,
    /// Towards the window on the left
    Left,
    /// Towards the window on the right
    Right,
}

/// Returned when a string does not name a direction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown direction: {0:?} (expected one of: left, down, up, right)")]
pub struct ParseDirectionError(pub String);

impl Direction {
    /// All directions, in the conventional h/j/k/l order
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Down,
        Direction::Up,
        Direction::Right,
    ];

    /// Wire name used in `navigate` frames
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}
