//! Color perception test.
//!
//! Four swatches of the same hue, one slightly shifted. The shift shrinks as
//! the level rises and the user has to find the odd swatch.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use visiotest_core::model::TestType;

use crate::TestKind;

/// Smallest hue shift ever shown, in degrees.
pub const MIN_HUE_OFFSET: f64 = 4.0;
const SATURATION: f64 = 0.6;
const LIGHTNESS: f64 = 0.5;

/// Hue shift of the odd swatch at `level`: `max(60 - 6 * level, 4)` degrees.
pub fn hue_offset_for_level(level: u32) -> f64 {
    (60.0 - 6.0 * level as f64).max(MIN_HUE_OFFSET)
}

/// Position of a swatch in the 2x2 plate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    /// 1-based position, reading order.
    pub fn number(self) -> u8 {
        match self {
            Quadrant::TopLeft => 1,
            Quadrant::TopRight => 2,
            Quadrant::BottomLeft => 3,
            Quadrant::BottomRight => 4,
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl FromStr for Quadrant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Quadrant::TopLeft),
            "2" => Ok(Quadrant::TopRight),
            "3" => Ok(Quadrant::BottomLeft),
            "4" => Ok(Quadrant::BottomRight),
            other => Err(format!("unknown position: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Convert HSL (hue in degrees, saturation and lightness in `[0, 1]`).
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = lightness - c / 2.0;
        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self {
            r: channel(r),
            g: channel(g),
            b: channel(b),
        }
    }

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// One color trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorPlate {
    pub base: Rgb,
    pub odd: Rgb,
    pub odd_position: Quadrant,
    /// Hue shift of the odd swatch in degrees.
    pub hue_offset: f64,
}

impl ColorPlate {
    /// Swatch color at each position, reading order.
    pub fn swatches(&self) -> [Rgb; 4] {
        Quadrant::ALL.map(|q| if q == self.odd_position { self.odd } else { self.base })
    }
}

/// The color test kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorTest;

impl TestKind for ColorTest {
    type Answer = Quadrant;
    type Stimulus = ColorPlate;

    fn test_type(&self) -> TestType {
        TestType::Color
    }

    fn answers(&self) -> &'static [Quadrant] {
        &Quadrant::ALL
    }

    fn stimulus<R: Rng + ?Sized>(&self, level: u32, target: Quadrant, rng: &mut R) -> ColorPlate {
        let base_hue = rng.gen_range(0.0..360.0);
        let hue_offset = hue_offset_for_level(level);
        ColorPlate {
            base: Rgb::from_hsl(base_hue, SATURATION, LIGHTNESS),
            odd: Rgb::from_hsl(base_hue + hue_offset, SATURATION, LIGHTNESS),
            odd_position: target,
            hue_offset,
        }
    }

    fn details(&self, level: u32) -> serde_json::Map<String, serde_json::Value> {
        let mut extra = serde_json::Map::new();
        extra.insert(
            "hueOffset".into(),
            serde_json::json!(hue_offset_for_level(level)),
        );
        extra
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn hue_offset_shrinks_then_floors() {
        assert_eq!(hue_offset_for_level(1), 54.0);
        assert_eq!(hue_offset_for_level(9), 6.0);
        assert_eq!(hue_offset_for_level(10), MIN_HUE_OFFSET);
        assert_eq!(hue_offset_for_level(20), MIN_HUE_OFFSET);
    }

    #[test]
    fn hsl_primaries() {
        assert_eq!(Rgb::from_hsl(0.0, 1.0, 0.5), Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(Rgb::from_hsl(120.0, 1.0, 0.5), Rgb { r: 0, g: 255, b: 0 });
        assert_eq!(Rgb::from_hsl(240.0, 1.0, 0.5), Rgb { r: 0, g: 0, b: 255 });
        assert_eq!(Rgb::from_hsl(360.0, 1.0, 0.5), Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(Rgb::from_hsl(0.0, 0.0, 1.0).hex(), "#ffffff");
    }

    #[test]
    fn plate_has_exactly_one_odd_swatch_at_target() {
        let mut rng = StdRng::seed_from_u64(11);
        for level in 1..=10 {
            for &target in &Quadrant::ALL {
                let plate = ColorTest.stimulus(level, target, &mut rng);
                assert_ne!(plate.base, plate.odd, "level {level} swatches identical");
                let swatches = plate.swatches();
                let odd: Vec<usize> = (0..4).filter(|&i| swatches[i] == plate.odd).collect();
                assert_eq!(odd, vec![target.number() as usize - 1]);
            }
        }
    }

    #[test]
    fn quadrant_parses_numbers() {
        assert_eq!("3".parse::<Quadrant>().unwrap(), Quadrant::BottomLeft);
        assert!("5".parse::<Quadrant>().is_err());
        assert_eq!(Quadrant::BottomRight.to_string(), "4");
    }
}
