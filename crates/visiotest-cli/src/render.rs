//! Terminal rendering of test stimuli.

use visiotest_runner::acuity::{Direction, Optotype};
use visiotest_runner::color::{ColorPlate, Rgb};
use visiotest_runner::contrast::{ContrastStimulus, Side};
use visiotest_runner::{AcuityTest, ColorTest, ContrastTest, TestKind};

/// A test kind the console knows how to present.
pub trait ConsoleTest: TestKind {
    /// Shown once when the test starts.
    fn instructions(&self) -> &'static str;

    /// Question asked for every trial.
    fn question(&self) -> &'static str;

    fn render(&self, stimulus: &Self::Stimulus) -> String;
}

const PANEL_WIDTH: usize = 11;
const PANEL_ROWS: usize = 5;

impl ConsoleTest for ContrastTest {
    fn instructions(&self) -> &'static str {
        "Um dos painéis tem listras. Elas ficam mais fracas a cada nível."
    }

    fn question(&self) -> &'static str {
        "Qual lado tem listras? [e]squerda / [d]ireita"
    }

    fn render(&self, stimulus: &ContrastStimulus) -> String {
        let shade = shade_for_contrast(stimulus.contrast);
        let striped: String = (0..PANEL_WIDTH)
            .map(|i| if i % 2 == 0 { shade } else { ' ' })
            .collect();
        let plain = " ".repeat(PANEL_WIDTH);
        let (left, right) = match stimulus.striped {
            Side::Left => (&striped, &plain),
            Side::Right => (&plain, &striped),
        };

        let border = format!("+{}+", "-".repeat(PANEL_WIDTH));
        let mut out = format!("{border}   {border}\n");
        for _ in 0..PANEL_ROWS {
            out.push_str(&format!("|{left}|   |{right}|\n"));
        }
        out.push_str(&format!("{border}   {border}\n"));
        out.push_str(&format!(
            "Contraste: {:.0}%",
            stimulus.contrast * 100.0
        ));
        out
    }
}

fn shade_for_contrast(contrast: f64) -> char {
    match contrast {
        c if c >= 0.7 => '█',
        c if c >= 0.5 => '▓',
        c if c >= 0.3 => '▒',
        _ => '░',
    }
}

impl ConsoleTest for AcuityTest {
    fn instructions(&self) -> &'static str {
        "Cubra um dos olhos e diga para onde apontam as pernas do E."
    }

    fn question(&self) -> &'static str {
        "Para onde aponta? [c]ima / [b]aixo / [e]squerda / [d]ireita"
    }

    fn render(&self, optotype: &Optotype) -> String {
        let mut out = String::new();
        for row in e_glyph(optotype.facing) {
            out.push_str("    ");
            out.push_str(row.trim_end());
            out.push('\n');
        }
        out.push_str(&format!(
            "Linha {} (acuidade decimal {:.1})",
            optotype.snellen_label(),
            optotype.decimal
        ));
        out
    }
}

fn e_glyph(facing: Direction) -> [&'static str; 5] {
    match facing {
        Direction::Right => ["█████", "█    ", "█████", "█    ", "█████"],
        Direction::Left => ["█████", "    █", "█████", "    █", "█████"],
        Direction::Up => ["█ █ █", "█ █ █", "█ █ █", "█ █ █", "█████"],
        Direction::Down => ["█████", "█ █ █", "█ █ █", "█ █ █", "█ █ █"],
    }
}

impl ConsoleTest for ColorTest {
    fn instructions(&self) -> &'static str {
        "Três quadrados têm a mesma cor. Encontre o diferente."
    }

    fn question(&self) -> &'static str {
        "Qual quadrado é diferente? [1-4]"
    }

    fn render(&self, plate: &ColorPlate) -> String {
        let swatches = plate.swatches();
        let mut out = String::new();
        for row in swatches.chunks(2) {
            for _ in 0..2 {
                for rgb in row {
                    out.push_str(&swatch(*rgb));
                    out.push(' ');
                }
                out.push('\n');
            }
            out.push('\n');
        }
        out.push_str("  1        2\n  3        4");
        out
    }
}

fn swatch(rgb: Rgb) -> String {
    format!("\x1b[48;2;{};{};{}m        \x1b[0m", rgb.r, rgb.g, rgb.b)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use visiotest_runner::color::Quadrant;

    use super::*;

    #[test]
    fn contrast_panel_stripes_the_target_side() {
        let stimulus = ContrastStimulus {
            striped: Side::Right,
            contrast: 0.82,
        };
        let out = ContrastTest.render(&stimulus);
        let first_row = out.lines().nth(1).unwrap();
        let (left, right) = first_row.split_once("|   |").unwrap();
        assert!(!left.contains('█'));
        assert!(right.contains('█'));
        assert!(out.ends_with("Contraste: 82%"));
    }

    #[test]
    fn faint_contrast_uses_light_shade() {
        assert_eq!(shade_for_contrast(0.9), '█');
        assert_eq!(shade_for_contrast(0.5), '▓');
        assert_eq!(shade_for_contrast(0.1), '░');
    }

    #[test]
    fn acuity_shows_snellen_line() {
        let optotype = AcuityTest.stimulus(8, Direction::Up, &mut StdRng::seed_from_u64(1));
        let out = AcuityTest.render(&optotype);
        assert!(out.contains("Linha 20/20"));
        assert!(out.contains("acuidade decimal 1.0"));
    }

    #[test]
    fn color_plate_draws_four_swatches() {
        let plate = ColorTest.stimulus(3, Quadrant::TopRight, &mut StdRng::seed_from_u64(5));
        let out = ColorTest.render(&plate);
        assert_eq!(out.matches("\x1b[48;2;").count(), 8);
        assert!(out.contains(&format!("{};{};{}m", plate.odd.r, plate.odd.g, plate.odd.b)));
    }
}
