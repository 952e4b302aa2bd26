use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Turn order around the table. A reversal flips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    pub const fn flip(self) -> Direction {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }

    pub const fn sign(self) -> isize {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }

    /// Seat reached by walking `steps` seats from `from` around a table of `players`.
    pub fn step(self, from: usize, steps: usize, players: usize) -> usize {
        let offset = self.sign() * steps as isize;
        (from as isize + offset).rem_euclid(players as isize) as usize
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Clockwise => "Clockwise",
            Direction::CounterClockwise => "CounterClockwise",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "clockwise" | "cw" => Ok(Direction::Clockwise),
            "counterclockwise" | "ccw" => Ok(Direction::CounterClockwise),
            _ => Err(()),
        }
    }
}
