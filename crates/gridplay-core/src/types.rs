//! Core type definitions shared by both grids.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 2D position or offset on a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: i32,
    pub y: i32,
}

impl Vector {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn plus(&self, other: Vector) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// One of the eight compass directions.
///
/// The declaration order is the clockwise order used for rotation and for
/// scanning a critter's surroundings: `n ne e se s sw w nw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl Direction {
    const ALL: [Direction; 8] = [
        Direction::N,
        Direction::Ne,
        Direction::E,
        Direction::Se,
        Direction::S,
        Direction::Sw,
        Direction::W,
        Direction::Nw,
    ];

    pub fn all() -> [Direction; 8] {
        Self::ALL
    }

    pub fn delta(&self) -> Vector {
        match self {
            Direction::N => Vector::new(0, -1),
            Direction::Ne => Vector::new(1, -1),
            Direction::E => Vector::new(1, 0),
            Direction::Se => Vector::new(1, 1),
            Direction::S => Vector::new(0, 1),
            Direction::Sw => Vector::new(-1, 1),
            Direction::W => Vector::new(-1, 0),
            Direction::Nw => Vector::new(-1, -1),
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Turn by `steps` eighths of a circle; positive is clockwise.
    pub fn rotate(&self, steps: i32) -> Direction {
        let index = (self.index() as i32 + steps).rem_euclid(8);
        Self::ALL[index as usize]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Direction::N => "n",
            Direction::Ne => "ne",
            Direction::E => "e",
            Direction::Se => "se",
            Direction::S => "s",
            Direction::Sw => "sw",
            Direction::W => "w",
            Direction::Nw => "nw",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|dir| dir.name() == s)
            .ok_or_else(|| Error::Validation(format!("unknown direction '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_plus() {
        let v = Vector::new(3, 4).plus(Direction::Nw.delta());
        assert_eq!(v, Vector::new(2, 3));
    }

    #[test]
    fn test_direction_delta() {
        assert_eq!(Direction::N.delta(), Vector::new(0, -1));
        assert_eq!(Direction::S.delta(), Vector::new(0, 1));
        assert_eq!(Direction::E.delta(), Vector::new(1, 0));
        assert_eq!(Direction::W.delta(), Vector::new(-1, 0));
        assert_eq!(Direction::Sw.delta(), Vector::new(-1, 1));
    }

    #[test]
    fn test_rotation_wraps() {
        assert_eq!(Direction::N.rotate(1), Direction::Ne);
        assert_eq!(Direction::N.rotate(-1), Direction::Nw);
        assert_eq!(Direction::S.rotate(-3), Direction::E);
        assert_eq!(Direction::S.rotate(-2), Direction::Se);
        assert_eq!(Direction::Nw.rotate(8), Direction::Nw);
    }

    #[test]
    fn test_direction_names_round_trip() {
        for dir in Direction::all() {
            assert_eq!(dir.name().parse::<Direction>().unwrap(), dir);
        }
        assert!("up".parse::<Direction>().is_err());
    }

    #[test]
    fn test_direction_serde_uses_short_names() {
        let json = serde_json::to_string(&Direction::Se).unwrap();
        assert_eq!(json, "\"se\"");
    }
}
