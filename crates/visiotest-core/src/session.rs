//! Session controller.
//!
//! Sequences registration, test selection, test administration and results.
//! The step is a closed state: every step after registration owns the
//! profile, so a results view without a profile cannot be constructed.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::SessionError;
use crate::model::{TestResult, TestType, TrialOutcome, UserProfile, PLACEHOLDER_USER_ID};
use crate::snapshot::SessionReport;
use crate::traits::{Record, RecordStore};
use crate::validation::validate_profile;

/// The view a session is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Welcome,
    Register,
    Menu,
    Test(TestType),
    Results,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Welcome => write!(f, "welcome"),
            Step::Register => write!(f, "register"),
            Step::Menu => write!(f, "menu"),
            Step::Test(TestType::Acuity) => write!(f, "acuity"),
            Step::Test(TestType::Contrast) => write!(f, "contrast"),
            Step::Test(TestType::Color) => write!(f, "colors"),
            Step::Results => write!(f, "results"),
        }
    }
}

/// One entry of the test menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuOption {
    pub test_type: TestType,
    /// False once a result of this type exists.
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Menu,
    Test(TestType),
    Results,
}

#[derive(Debug)]
enum State {
    Welcome,
    Register,
    Registered { profile: UserProfile, view: View },
}

/// Owns the current step, the registered profile and the accumulated results.
pub struct Session {
    state: State,
    results: Vec<TestResult>,
    store: Arc<dyn RecordStore>,
}

impl Session {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            state: State::Welcome,
            results: Vec::new(),
            store,
        }
    }

    pub fn step(&self) -> Step {
        match &self.state {
            State::Welcome => Step::Welcome,
            State::Register => Step::Register,
            State::Registered { view, .. } => match view {
                View::Menu => Step::Menu,
                View::Test(t) => Step::Test(*t),
                View::Results => Step::Results,
            },
        }
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        match &self.state {
            State::Registered { profile, .. } => Some(profile),
            _ => None,
        }
    }

    /// Results in completion order.
    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn is_completed(&self, test_type: TestType) -> bool {
        self.results.iter().any(|r| r.test_type == test_type)
    }

    /// Menu entries in display order, each disabled once its test is done.
    pub fn menu_options(&self) -> Vec<MenuOption> {
        TestType::ALL
            .iter()
            .map(|&test_type| MenuOption {
                test_type,
                enabled: !self.is_completed(test_type),
            })
            .collect()
    }

    pub fn can_view_results(&self) -> bool {
        !self.results.is_empty()
    }

    /// Leave the welcome screen for registration.
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.state {
            State::Welcome | State::Register => {
                self.state = State::Register;
                tracing::info!(step = %self.step(), "session started");
                Ok(())
            }
            State::Registered { .. } => Err(self.invalid("start")),
        }
    }

    /// Validate and store the profile, then move to the test menu.
    ///
    /// On validation failure the session stays on `register`. A store failure
    /// is logged and the profile proceeds without an id.
    pub async fn complete_registration(
        &mut self,
        mut profile: UserProfile,
    ) -> Result<(), SessionError> {
        if !matches!(self.state, State::Register) {
            return Err(self.invalid("complete registration"));
        }
        validate_profile(&profile)?;

        profile.created_at = Some(Utc::now());
        match self.store.save(&Record::Profile(profile.clone())).await {
            Ok(id) => profile.id = Some(id),
            Err(e) => {
                tracing::warn!(store = self.store.name(), "failed to save profile: {e:#}");
            }
        }

        tracing::info!(name = %profile.name, id = ?profile.id, "profile registered");
        self.state = State::Registered {
            profile,
            view: View::Menu,
        };
        Ok(())
    }

    /// Open a test from the menu.
    pub fn select_test(&mut self, test_type: TestType) -> Result<(), SessionError> {
        let completed = self.is_completed(test_type);
        let from = self.step();
        match &mut self.state {
            State::Registered { view, .. } if *view == View::Menu => {
                if completed {
                    return Err(SessionError::TestAlreadyCompleted(test_type));
                }
                *view = View::Test(test_type);
                tracing::info!(test = %test_type, "test selected");
                Ok(())
            }
            _ => Err(SessionError::InvalidTransition {
                from,
                action: "select a test",
            }),
        }
    }

    /// Stamp a finished test's outcome, keep it, and return to the menu.
    pub async fn complete_test(
        &mut self,
        outcome: TrialOutcome,
    ) -> Result<&TestResult, SessionError> {
        let user_id = match &self.state {
            State::Registered {
                profile,
                view: View::Test(active),
            } => {
                if *active != outcome.test_type {
                    return Err(SessionError::OutcomeMismatch {
                        expected: *active,
                        got: outcome.test_type,
                    });
                }
                profile
                    .id
                    .clone()
                    .unwrap_or_else(|| PLACEHOLDER_USER_ID.to_string())
            }
            _ => return Err(self.invalid("complete a test")),
        };

        let result = TestResult::from_outcome(
            outcome,
            Uuid::new_v4().to_string(),
            user_id,
            Utc::now(),
        );
        if let Err(e) = self.store.save(&Record::TestResult(result.clone())).await {
            tracing::warn!(store = self.store.name(), "failed to save test result: {e:#}");
        }

        tracing::info!(
            test = %result.test_type,
            score = result.score,
            level = result.level,
            duration_ms = result.duration,
            "test completed"
        );
        self.results.push(result);
        if let State::Registered { view, .. } = &mut self.state {
            *view = View::Menu;
        }
        Ok(&self.results[self.results.len() - 1])
    }

    /// Show the results view. Requires at least one result.
    pub fn view_results(&mut self) -> Result<(), SessionError> {
        let has_results = self.can_view_results();
        let from = self.step();
        match &mut self.state {
            State::Registered { view, .. } if *view == View::Menu => {
                if !has_results {
                    return Err(SessionError::NoResults);
                }
                *view = View::Results;
                Ok(())
            }
            _ => Err(SessionError::InvalidTransition {
                from,
                action: "view results",
            }),
        }
    }

    /// Discard profile and results and go back to the welcome screen.
    pub fn reset(&mut self) {
        self.state = State::Welcome;
        self.results.clear();
        tracing::info!("session reset");
    }

    /// Snapshot of the registered profile and its results.
    pub fn report(&self) -> Option<SessionReport> {
        self.profile()
            .map(|profile| SessionReport::new(profile.clone(), self.results.clone()))
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            from: self.step(),
            action,
        }
    }
}
