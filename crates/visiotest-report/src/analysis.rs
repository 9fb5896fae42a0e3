//! Score bands and personalized advisories.

use std::fmt;

use serde::Serialize;

use visiotest_core::model::{LensType, TestResult, TestType, UserProfile, COLOR_DIFFICULTY};

/// Scores are out of this many points.
pub const SCORE_SCALE: u32 = 10;

/// Age above which near-vision changes are expected.
pub const AGE_ADVISORY_THRESHOLD: u32 = 40;

/// Color scores below this confirm a self-reported color difficulty.
pub const COLOR_CONFIRMATION_THRESHOLD: u32 = 6;

/// Any score below this suggests an eye examination.
pub const EXAMINATION_THRESHOLD: u32 = 5;

/// Qualitative label for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    NeedsAttention,
    Fair,
    Good,
    Excellent,
}

impl ScoreBand {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 8 => ScoreBand::Excellent,
            s if s >= 6 => ScoreBand::Good,
            s if s >= 4 => ScoreBand::Fair,
            _ => ScoreBand::NeedsAttention,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excelente",
            ScoreBand::Good => "Bom",
            ScoreBand::Fair => "Regular",
            ScoreBand::NeedsAttention => "Atenção",
        }
    }

    /// Traffic-light class used by the HTML page: fair shares the red of
    /// needs-attention, as only scores of 6 and up count as reassuring.
    pub fn css_class(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "excellent",
            ScoreBand::Good => "good",
            ScoreBand::Fair | ScoreBand::NeedsAttention => "attention",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A rule-based note shown with the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// The user is older than [`AGE_ADVISORY_THRESHOLD`].
    AgeRelated { age: u32 },
    /// The user wears a correction.
    CorrectiveLenses { lens_type: Option<LensType> },
    /// A self-reported color difficulty matches a low color score.
    ColorDifficultyConfirmed,
    /// At least one score is below [`EXAMINATION_THRESHOLD`].
    ExaminationRecommended,
}

impl Advisory {
    pub fn message(&self) -> String {
        match self {
            Advisory::AgeRelated { age } => format!(
                "Considerando sua idade ({age} anos), é normal haver mudanças na visão de perto."
            ),
            Advisory::CorrectiveLenses { lens_type } => {
                let correction = lens_type
                    .map(|l| l.to_string())
                    .unwrap_or_else(|| "correção visual".to_string());
                format!("Como você usa {correction}, mantenha consultas regulares.")
            }
            Advisory::ColorDifficultyConfirmed => {
                "Seus resultados confirmam dificuldades com cores. Considere avaliação especializada."
                    .to_string()
            }
            Advisory::ExaminationRecommended => {
                "Alguns resultados indicam necessidade de avaliação oftalmológica mais detalhada."
                    .to_string()
            }
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Derive the advisory list for a profile and its results, in display order.
pub fn advisories(profile: &UserProfile, results: &[TestResult]) -> Vec<Advisory> {
    let mut notes = Vec::new();

    if profile.age > AGE_ADVISORY_THRESHOLD {
        notes.push(Advisory::AgeRelated { age: profile.age });
    }

    if profile.uses_glasses {
        notes.push(Advisory::CorrectiveLenses {
            lens_type: profile.lens_type,
        });
    }

    let low_color = results
        .iter()
        .any(|r| r.test_type == TestType::Color && r.score < COLOR_CONFIRMATION_THRESHOLD);
    if profile.has_difficulty(COLOR_DIFFICULTY) && low_color {
        notes.push(Advisory::ColorDifficultyConfirmed);
    }

    if results.iter().any(|r| r.score < EXAMINATION_THRESHOLD) {
        notes.push(Advisory::ExaminationRecommended);
    }

    notes
}

/// Medical disclaimer shown alongside every result view.
pub const DISCLAIMER: &str = "Este aplicativo é apenas para fins educacionais e de triagem básica. \
Os resultados NÃO substituem uma consulta oftalmológica profissional. \
Para diagnóstico preciso e tratamento, consulte sempre um oftalmologista qualificado.";

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use visiotest_core::model::{Gender, TestDetails};

    use super::*;

    fn result(test_type: TestType, score: u32) -> TestResult {
        TestResult {
            id: "r".into(),
            user_id: "u".into(),
            test_type,
            score,
            level: score.max(1),
            duration: 1000,
            date: Utc::now(),
            details: TestDetails {
                max_level: score.max(1),
                correct_answers: score,
                extra: Default::default(),
            },
        }
    }

    fn profile(age: u32) -> UserProfile {
        UserProfile {
            name: "Rui".into(),
            age,
            gender: Gender::Male,
            ..Default::default()
        }
    }

    #[test]
    fn band_thresholds() {
        assert_eq!(ScoreBand::from_score(10), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(8), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(7), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(6), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(5), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(4), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(3), ScoreBand::NeedsAttention);
        assert_eq!(ScoreBand::from_score(0).label(), "Atenção");
    }

    #[test]
    fn young_user_with_good_scores_gets_no_notes() {
        let notes = advisories(&profile(30), &[result(TestType::Acuity, 9)]);
        assert!(notes.is_empty());
    }

    #[test]
    fn age_threshold_is_exclusive() {
        assert!(advisories(&profile(40), &[]).is_empty());
        assert_eq!(
            advisories(&profile(41), &[]),
            vec![Advisory::AgeRelated { age: 41 }]
        );
    }

    #[test]
    fn lens_note_names_the_correction() {
        let mut p = profile(30);
        p.set_uses_glasses(true);
        let notes = advisories(&p, &[]);
        assert_eq!(
            notes[0].message(),
            "Como você usa correção visual, mantenha consultas regulares."
        );

        p.lens_type = Some(LensType::Myopia);
        let notes = advisories(&p, &[]);
        assert!(notes[0].message().contains("usa miopia"));
    }

    #[test]
    fn color_note_requires_self_report_and_low_score() {
        let mut p = profile(30);
        let low_color = [result(TestType::Color, 5)];
        assert!(!advisories(&p, &low_color).contains(&Advisory::ColorDifficultyConfirmed));

        p.toggle_difficulty(COLOR_DIFFICULTY);
        assert!(advisories(&p, &low_color).contains(&Advisory::ColorDifficultyConfirmed));

        let good_color = [result(TestType::Color, 6)];
        assert!(!advisories(&p, &good_color).contains(&Advisory::ColorDifficultyConfirmed));

        let low_contrast = [result(TestType::Contrast, 2)];
        assert!(!advisories(&p, &low_contrast).contains(&Advisory::ColorDifficultyConfirmed));
    }

    #[test]
    fn any_low_score_recommends_examination() {
        let results = [result(TestType::Acuity, 9), result(TestType::Contrast, 4)];
        assert_eq!(
            advisories(&profile(30), &results),
            vec![Advisory::ExaminationRecommended]
        );
    }
}
