//! Cardinal directions and the fixed directional step.
//!
//! The warehouse floor plane is x/z: north decreases z, south increases z,
//! east increases x, west decreases x. Height (y) never changes with a
//! directional move; each robot kind has its own height convention.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Distance covered by one directional move command, in warehouse units.
pub const STEP: f64 = 5.0;

/// Cardinal movement directions on the warehouse floor plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// `(dx, dz)` displacement of one [`STEP`] in this direction.
    pub fn offset(self) -> (f64, f64) {
        match self {
            Direction::North => (0.0, -STEP),
            Direction::South => (0.0, STEP),
            Direction::East => (STEP, 0.0),
            Direction::West => (-STEP, 0.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejection for anything outside the four cardinal directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDirection(pub String);

impl fmt::Display for InvalidDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "direction must be one of: north, south, east, west (got '{}')", self.0)
    }
}

impl std::error::Error for InvalidDirection {}

impl FromStr for Direction {
    type Err = InvalidDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "north" => Ok(Direction::North),
            "south" => Ok(Direction::South),
            "east" => Ok(Direction::East),
            "west" => Ok(Direction::West),
            other => Err(InvalidDirection(other.to_string())),
        }
    }
}
