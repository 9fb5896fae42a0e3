//! Visual acuity test with a tumbling-E optotype.
//!
//! Each level shows the E on the next Snellen line; the user reports which
//! way its arms point.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use visiotest_core::model::TestType;

use crate::TestKind;

/// Snellen denominators (20/x) for levels 1 through 10.
pub const SNELLEN_LINES: [u32; 10] = [200, 100, 70, 50, 40, 30, 25, 20, 15, 10];

/// Snellen denominator shown at `level`. Levels beyond the chart stay on the last line.
pub fn snellen_for_level(level: u32) -> u32 {
    let index = (level.max(1) as usize - 1).min(SNELLEN_LINES.len() - 1);
    SNELLEN_LINES[index]
}

/// Direction the arms of the E open towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "cima"),
            Direction::Down => write!(f, "baixo"),
            Direction::Left => write!(f, "esquerda"),
            Direction::Right => write!(f, "direita"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "c" | "cima" | "u" | "up" => Ok(Direction::Up),
            "b" | "baixo" | "down" => Ok(Direction::Down),
            "e" | "esquerda" | "l" | "left" => Ok(Direction::Left),
            "d" | "direita" | "r" | "right" => Ok(Direction::Right),
            other => Err(format!("unknown direction: {other}")),
        }
    }
}

/// One acuity trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Optotype {
    pub facing: Direction,
    /// Snellen denominator of the line (20/x).
    pub snellen: u32,
    /// Decimal acuity, 20 / snellen.
    pub decimal: f64,
}

impl Optotype {
    pub fn snellen_label(&self) -> String {
        format!("20/{}", self.snellen)
    }
}

/// The acuity test kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcuityTest;

impl TestKind for AcuityTest {
    type Answer = Direction;
    type Stimulus = Optotype;

    fn test_type(&self) -> TestType {
        TestType::Acuity
    }

    fn answers(&self) -> &'static [Direction] {
        &Direction::ALL
    }

    fn stimulus<R: Rng + ?Sized>(&self, level: u32, target: Direction, _rng: &mut R) -> Optotype {
        let snellen = snellen_for_level(level);
        Optotype {
            facing: target,
            snellen,
            decimal: 20.0 / snellen as f64,
        }
    }

    fn details(&self, level: u32) -> serde_json::Map<String, serde_json::Value> {
        let mut extra = serde_json::Map::new();
        extra.insert(
            "snellen".into(),
            serde_json::json!(format!("20/{}", snellen_for_level(level))),
        );
        extra
    }
}
