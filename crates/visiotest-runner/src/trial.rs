//! The adaptive trial loop shared by every test.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::Instant;

use visiotest_core::model::{TestDetails, TrialOutcome};

use crate::error::RunnerError;
use crate::{RunnerConfig, TestKind};

/// Result of answering one trial.
#[derive(Debug, Clone)]
pub enum TrialVerdict {
    /// Correct answer below the top level; a new trial is ready at `level`.
    Continue { level: u32 },
    /// The test is over. The outcome is released once the summary delay elapses.
    Finished(PendingCompletion),
}

/// A finalized test whose outcome is held back for the completion delay.
#[derive(Debug, Clone)]
pub struct PendingCompletion {
    outcome: TrialOutcome,
    ready_at: Instant,
}

impl PendingCompletion {
    /// The outcome, for showing the completion summary right away.
    pub fn outcome(&self) -> &TrialOutcome {
        &self.outcome
    }

    /// When the outcome is released.
    pub fn ready_at(&self) -> Instant {
        self.ready_at
    }

    /// Wait out the completion delay and return the outcome.
    pub async fn wait(self) -> TrialOutcome {
        tokio::time::sleep_until(self.ready_at).await;
        self.outcome
    }

    /// Wait out the completion delay, then hand the outcome to `on_complete`.
    pub async fn deliver<F, T>(self, on_complete: F) -> T
    where
        F: FnOnce(TrialOutcome) -> T,
    {
        on_complete(self.wait().await)
    }
}

/// Runs one test: owns the level, score, current target and start time.
pub struct TestRunner<K: TestKind, R = StdRng> {
    kind: K,
    rng: R,
    max_level: u32,
    completion_delay: Duration,
    level: u32,
    score: u32,
    target: K::Answer,
    stimulus: K::Stimulus,
    started_at: Instant,
    finished: bool,
}

impl<K: TestKind> TestRunner<K, StdRng> {
    /// Create a runner seeded from the operating system.
    pub fn from_entropy(kind: K, config: &RunnerConfig) -> Self {
        Self::new(kind, config, StdRng::from_entropy())
    }
}

impl<K: TestKind, R: Rng> TestRunner<K, R> {
    /// Create a runner at level 1. The clock starts now.
    pub fn new(kind: K, config: &RunnerConfig, mut rng: R) -> Self {
        let level = 1;
        let target = roll_target(&kind, &mut rng);
        let stimulus = kind.stimulus(level, target, &mut rng);
        Self {
            kind,
            rng,
            max_level: config.max_level.max(1),
            completion_delay: config.completion_delay,
            level,
            score: 0,
            target,
            stimulus,
            started_at: Instant::now(),
            finished: false,
        }
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Correct answer of the current trial.
    pub fn target(&self) -> K::Answer {
        self.target
    }

    /// Stimulus of the current trial.
    pub fn stimulus(&self) -> &K::Stimulus {
        &self.stimulus
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Fraction of the level range reached, for progress bars.
    pub fn progress(&self) -> f64 {
        self.level as f64 / self.max_level as f64
    }

    /// Answer the current trial.
    ///
    /// A correct answer scores and advances, or finalizes at the top level.
    /// A wrong answer finalizes immediately.
    pub fn answer(&mut self, answer: K::Answer) -> Result<TrialVerdict, RunnerError> {
        if self.finished {
            return Err(RunnerError::AlreadyFinished);
        }

        let correct = answer == self.target;
        tracing::debug!(
            test = %self.kind.test_type(),
            level = self.level,
            correct,
            "trial answered"
        );

        if correct {
            self.score += 1;
            if self.level < self.max_level {
                self.level += 1;
                self.next_trial();
                return Ok(TrialVerdict::Continue { level: self.level });
            }
        }

        Ok(TrialVerdict::Finished(self.finalize()))
    }

    fn next_trial(&mut self) {
        self.target = roll_target(&self.kind, &mut self.rng);
        self.stimulus = self.kind.stimulus(self.level, self.target, &mut self.rng);
    }

    fn finalize(&mut self) -> PendingCompletion {
        self.finished = true;
        let now = Instant::now();
        let duration = now.duration_since(self.started_at).as_millis() as u64;
        let outcome = TrialOutcome {
            test_type: self.kind.test_type(),
            score: self.score,
            level: self.level,
            duration,
            details: TestDetails {
                max_level: self.level,
                correct_answers: self.score,
                extra: self.kind.details(self.level),
            },
        };
        tracing::info!(
            test = %outcome.test_type,
            score = outcome.score,
            level = outcome.level,
            "test finalized"
        );
        PendingCompletion {
            outcome,
            ready_at: now + self.completion_delay,
        }
    }
}

fn roll_target<K: TestKind, R: Rng + ?Sized>(kind: &K, rng: &mut R) -> K::Answer {
    let answers = kind.answers();
    answers[rng.gen_range(0..answers.len())]
}
