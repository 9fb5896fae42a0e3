//! Contrast sensitivity test.
//!
//! Two panels, one striped. The user says which side holds the stripes; the
//! stripes fade as the level rises.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use visiotest_core::model::TestType;

use crate::TestKind;

/// Lowest contrast ever shown, so the stripes never vanish completely.
pub const MIN_CONTRAST: f64 = 0.1;
/// Contrast ceiling.
pub const MAX_CONTRAST: f64 = 0.9;
/// Contrast lost per level.
pub const CONTRAST_STEP: f64 = 0.08;

/// Stripe opacity for a level: `clamp(0.9 - 0.08 * level, 0.1, 0.9)`.
pub fn contrast_for_level(level: u32) -> f64 {
    (MAX_CONTRAST - level as f64 * CONTRAST_STEP).clamp(MIN_CONTRAST, MAX_CONTRAST)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "esquerda"),
            Side::Right => write!(f, "direita"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "e" | "esquerda" | "l" | "left" => Ok(Side::Left),
            "d" | "direita" | "r" | "right" => Ok(Side::Right),
            other => Err(format!("unknown side: {other}")),
        }
    }
}

/// One contrast trial: which panel is striped, and how faintly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastStimulus {
    pub striped: Side,
    /// Stripe opacity in `[0.1, 0.9]`.
    pub contrast: f64,
}

/// The contrast test kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContrastTest;

impl TestKind for ContrastTest {
    type Answer = Side;
    type Stimulus = ContrastStimulus;

    fn test_type(&self) -> TestType {
        TestType::Contrast
    }

    fn answers(&self) -> &'static [Side] {
        &Side::ALL
    }

    fn stimulus<R: Rng + ?Sized>(&self, level: u32, target: Side, _rng: &mut R) -> ContrastStimulus {
        ContrastStimulus {
            striped: target,
            contrast: contrast_for_level(level),
        }
    }

    fn details(&self, level: u32) -> serde_json::Map<String, serde_json::Value> {
        let mut extra = serde_json::Map::new();
        extra.insert(
            "finalContrast".into(),
            serde_json::json!(contrast_for_level(level)),
        );
        extra
    }
}
