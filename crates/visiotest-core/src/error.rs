//! Session and validation error types.
//!
//! Refused transitions are typed so a front end can explain why the step did
//! not advance.

use std::fmt;

use thiserror::Error;

use crate::model::TestType;
use crate::session::Step;

/// A single reason a profile cannot be registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("age must be greater than zero")]
    ZeroAge,

    #[error("age {0} is above the accepted maximum of {max}", max = crate::model::MAX_AGE)]
    AgeOutOfRange(u32),

    #[error("lens type is set but the user does not wear glasses")]
    LensWithoutGlasses,

    #[error("unknown visual difficulty: {0}")]
    UnknownDifficulty(String),
}

/// Every failure found while validating a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileErrors(pub Vec<ProfileError>);

impl ProfileErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ProfileError> {
        self.0.iter()
    }

    pub fn contains(&self, error: &ProfileError) -> bool {
        self.0.contains(error)
    }
}

impl fmt::Display for ProfileErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ProfileErrors {}

/// Errors returned by the session controller.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The requested operation is not available from the current step.
    #[error("cannot {action} from step '{from}'")]
    InvalidTransition { from: Step, action: &'static str },

    /// Registration data failed validation; the session stays on `register`.
    #[error("invalid profile: {0}")]
    InvalidProfile(#[from] ProfileErrors),

    /// A result of this type already exists in the session.
    #[error("test '{0}' has already been completed")]
    TestAlreadyCompleted(TestType),

    /// The runner reported an outcome for a different test than the active one.
    #[error("outcome for '{got}' does not match active test '{expected}'")]
    OutcomeMismatch { expected: TestType, got: TestType },

    /// Results were requested before any test finished.
    #[error("no test results to show yet")]
    NoResults,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_errors_join_messages() {
        let errors = ProfileErrors(vec![ProfileError::EmptyName, ProfileError::ZeroAge]);
        assert_eq!(
            errors.to_string(),
            "name must not be empty; age must be greater than zero"
        );
    }

    #[test]
    fn age_out_of_range_names_the_limit() {
        assert_eq!(
            ProfileError::AgeOutOfRange(130).to_string(),
            "age 130 is above the accepted maximum of 120"
        );
    }
}
