//! Core data model types for visiotest.
//!
//! These are the records the whole system passes around: the user's profile
//! collected at registration, the outcome a test runner emits, and the
//! stamped result the session keeps.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed checklist of self-reported visual difficulties offered at registration.
pub const DIFFICULTY_CHECKLIST: [&str; 6] = [
    "Visão noturna",
    "Leitura de perto",
    "Leitura de longe",
    COLOR_DIFFICULTY,
    "Sensibilidade à luz",
    "Visão periférica",
];

/// Checklist entry cross-checked against the color test score.
pub const COLOR_DIFFICULTY: &str = "Distinção de cores";

/// User id bound to results when the profile was never assigned one.
pub const PLACEHOLDER_USER_ID: &str = "temp";

/// Upper bound accepted for a user's age.
pub const MAX_AGE: u32 = 120;

/// Identity and context for a testing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Opaque identifier assigned by the record store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    pub gender: Gender,
    /// Whether the user wears glasses or contact lenses.
    pub uses_glasses: bool,
    /// Kind of correction, only meaningful when `uses_glasses` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lens_type: Option<LensType>,
    /// Self-reported difficulties, drawn from [`DIFFICULTY_CHECKLIST`].
    #[serde(default)]
    pub visual_difficulties: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            age: 0,
            gender: Gender::Male,
            uses_glasses: false,
            lens_type: None,
            visual_difficulties: BTreeSet::new(),
            created_at: None,
        }
    }
}

impl UserProfile {
    /// Set whether the user wears a correction. Clearing it drops the lens type.
    pub fn set_uses_glasses(&mut self, uses_glasses: bool) {
        self.uses_glasses = uses_glasses;
        if !uses_glasses {
            self.lens_type = None;
        }
    }

    /// Add the difficulty if absent, remove it if present.
    ///
    /// Returns `true` when the tag is selected after the call.
    pub fn toggle_difficulty(&mut self, difficulty: &str) -> bool {
        if self.visual_difficulties.remove(difficulty) {
            false
        } else {
            self.visual_difficulties.insert(difficulty.to_string());
            true
        }
    }

    pub fn has_difficulty(&self, difficulty: &str) -> bool {
        self.visual_difficulties.contains(difficulty)
    }
}

/// Gender options offered by the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "masculino")]
    Male,
    #[serde(rename = "feminino")]
    Female,
    #[serde(rename = "outro")]
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "masculino"),
            Gender::Female => write!(f, "feminino"),
            Gender::Other => write!(f, "outro"),
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "masculino" | "male" | "m" => Ok(Gender::Male),
            "feminino" | "female" | "f" => Ok(Gender::Female),
            "outro" | "other" | "o" => Ok(Gender::Other),
            other => Err(format!("unknown gender: {other}")),
        }
    }
}

/// Kinds of vision correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LensType {
    #[serde(rename = "miopia")]
    Myopia,
    #[serde(rename = "hipermetropia")]
    Hyperopia,
    #[serde(rename = "astigmatismo")]
    Astigmatism,
    #[serde(rename = "presbiopia")]
    Presbyopia,
    #[serde(rename = "multifocal")]
    Multifocal,
}

impl LensType {
    pub const ALL: [LensType; 5] = [
        LensType::Myopia,
        LensType::Hyperopia,
        LensType::Astigmatism,
        LensType::Presbyopia,
        LensType::Multifocal,
    ];
}

impl fmt::Display for LensType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LensType::Myopia => write!(f, "miopia"),
            LensType::Hyperopia => write!(f, "hipermetropia"),
            LensType::Astigmatism => write!(f, "astigmatismo"),
            LensType::Presbyopia => write!(f, "presbiopia"),
            LensType::Multifocal => write!(f, "multifocal"),
        }
    }
}

impl FromStr for LensType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "miopia" | "myopia" => Ok(LensType::Myopia),
            "hipermetropia" | "hyperopia" => Ok(LensType::Hyperopia),
            "astigmatismo" | "astigmatism" => Ok(LensType::Astigmatism),
            "presbiopia" | "presbyopia" => Ok(LensType::Presbyopia),
            "multifocal" => Ok(LensType::Multifocal),
            other => Err(format!("unknown lens type: {other}")),
        }
    }
}

/// The three perceptual tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TestType {
    #[serde(rename = "acuidade")]
    Acuity,
    #[serde(rename = "contraste")]
    Contrast,
    #[serde(rename = "cores")]
    Color,
}

impl TestType {
    /// Menu order.
    pub const ALL: [TestType; 3] = [TestType::Acuity, TestType::Contrast, TestType::Color];

    /// Human-readable title shown on menus and result cards.
    pub fn title(self) -> &'static str {
        match self {
            TestType::Acuity => "Acuidade Visual",
            TestType::Contrast => "Sensibilidade ao Contraste",
            TestType::Color => "Percepção de Cores",
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestType::Acuity => write!(f, "acuidade"),
            TestType::Contrast => write!(f, "contraste"),
            TestType::Color => write!(f, "cores"),
        }
    }
}

impl FromStr for TestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "acuidade" | "acuity" => Ok(TestType::Acuity),
            "contraste" | "contrast" => Ok(TestType::Contrast),
            "cores" | "color" | "colors" => Ok(TestType::Color),
            other => Err(format!("unknown test type: {other}")),
        }
    }
}

/// Test-specific auxiliary data attached to an outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDetails {
    /// Highest level reached.
    pub max_level: u32,
    /// Number of correct responses.
    pub correct_answers: u32,
    /// Per-test extras (final contrast, Snellen line, hue offset ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// What a test runner hands back when a test finishes.
///
/// Carries no identity: the session stamps `id`, `userId` and `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialOutcome {
    pub test_type: TestType,
    /// Count of correct responses.
    pub score: u32,
    /// Highest difficulty level reached.
    pub level: u32,
    /// Elapsed wall-clock milliseconds from test start to finalization.
    pub duration: u64,
    pub details: TestDetails,
}

/// Outcome of one completed test run, as kept by the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub id: String,
    pub user_id: String,
    pub test_type: TestType,
    pub score: u32,
    pub level: u32,
    /// Milliseconds.
    pub duration: u64,
    pub date: DateTime<Utc>,
    pub details: TestDetails,
}

impl TestResult {
    /// Stamp an outcome with its identity.
    pub fn from_outcome(
        outcome: TrialOutcome,
        id: String,
        user_id: String,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            test_type: outcome.test_type,
            score: outcome.score,
            level: outcome.level,
            duration: outcome.duration,
            date,
            details: outcome.details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_display_and_parse() {
        assert_eq!(TestType::Contrast.to_string(), "contraste");
        assert_eq!(TestType::Acuity.to_string(), "acuidade");
        assert_eq!("cores".parse::<TestType>().unwrap(), TestType::Color);
        assert_eq!("Contrast".parse::<TestType>().unwrap(), TestType::Contrast);
        assert!("hearing".parse::<TestType>().is_err());
    }

    #[test]
    fn gender_and_lens_parse_wire_names() {
        assert_eq!("feminino".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("o".parse::<Gender>().unwrap(), Gender::Other);
        assert_eq!(
            "presbiopia".parse::<LensType>().unwrap(),
            LensType::Presbyopia
        );
        assert!("bifocal".parse::<LensType>().is_err());
    }

    #[test]
    fn toggle_difficulty_has_set_semantics() {
        let mut profile = UserProfile::default();
        assert!(profile.toggle_difficulty("Visão noturna"));
        assert!(profile.toggle_difficulty("Leitura de perto"));
        assert!(!profile.toggle_difficulty("Visão noturna"));
        assert!(profile.toggle_difficulty("Visão noturna"));
        assert_eq!(profile.visual_difficulties.len(), 2);
        assert!(profile.has_difficulty("Leitura de perto"));
    }

    #[test]
    fn dropping_glasses_clears_lens_type() {
        let mut profile = UserProfile::default();
        profile.set_uses_glasses(true);
        profile.lens_type = Some(LensType::Myopia);
        profile.set_uses_glasses(false);
        assert!(!profile.uses_glasses);
        assert_eq!(profile.lens_type, None);
    }

    #[test]
    fn profile_serializes_with_wire_vocabulary() {
        let mut profile = UserProfile {
            name: "Ana".into(),
            age: 45,
            gender: Gender::Female,
            ..Default::default()
        };
        profile.set_uses_glasses(true);
        profile.lens_type = Some(LensType::Presbyopia);
        profile.toggle_difficulty("Leitura de perto");

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["gender"], "feminino");
        assert_eq!(json["usesGlasses"], true);
        assert_eq!(json["lensType"], "presbiopia");
        assert_eq!(json["visualDifficulties"][0], "Leitura de perto");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn details_flatten_extra_keys() {
        let mut extra = serde_json::Map::new();
        extra.insert("finalContrast".into(), serde_json::json!(0.66));
        let details = TestDetails {
            max_level: 3,
            correct_answers: 2,
            extra,
        };
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["maxLevel"], 3);
        assert_eq!(json["correctAnswers"], 2);
        assert_eq!(json["finalContrast"], 0.66);
    }
}
