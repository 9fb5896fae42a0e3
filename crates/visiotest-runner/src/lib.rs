//! visiotest-runner — Adaptive trial loop and stimulus generation.
//!
//! Every test follows the same shape: a random target per level, a stimulus
//! that gets harder as the level rises, one miss ends the test. The
//! [`TestKind`] trait supplies what differs between the three tests.

pub mod acuity;
pub mod color;
pub mod contrast;
pub mod error;
pub mod trial;

use std::fmt;
use std::time::Duration;

use rand::Rng;

use visiotest_core::model::TestType;

pub use acuity::AcuityTest;
pub use color::ColorTest;
pub use contrast::ContrastTest;
pub use error::RunnerError;
pub use trial::{PendingCompletion, TestRunner, TrialVerdict};

/// Default highest level of every test.
pub const DEFAULT_MAX_LEVEL: u32 = 10;

/// Default pause between finalization and delivering the outcome.
pub const DEFAULT_COMPLETION_DELAY: Duration = Duration::from_secs(2);

/// Configuration shared by all test runners.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Highest level; reaching it with a correct answer ends the test.
    pub max_level: u32,
    /// How long the completion summary stays up before the outcome is released.
    pub completion_delay: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            completion_delay: DEFAULT_COMPLETION_DELAY,
        }
    }
}

/// What distinguishes one perceptual test from another.
pub trait TestKind {
    /// A response the user can give.
    type Answer: Copy + Eq + fmt::Debug + 'static;
    /// What is shown for one trial.
    type Stimulus: Clone + fmt::Debug;

    fn test_type(&self) -> TestType;

    /// Every possible answer. The target of each trial is drawn uniformly from these.
    fn answers(&self) -> &'static [Self::Answer];

    /// Build the stimulus for `level` whose correct answer is `target`.
    fn stimulus<R: Rng + ?Sized>(
        &self,
        level: u32,
        target: Self::Answer,
        rng: &mut R,
    ) -> Self::Stimulus;

    /// Extra keys recorded in the outcome details for the final level.
    fn details(&self, _level: u32) -> serde_json::Map<String, serde_json::Value> {
        serde_json::Map::new()
    }
}
