//! Registration checks for user profiles.

use crate::error::{ProfileError, ProfileErrors};
use crate::model::{UserProfile, DIFFICULTY_CHECKLIST, MAX_AGE};

/// Validate a profile before registration.
///
/// Collects every failure rather than stopping at the first one, so the
/// registration form can point at all offending fields at once.
pub fn validate_profile(profile: &UserProfile) -> Result<(), ProfileErrors> {
    let mut errors = Vec::new();

    if profile.name.trim().is_empty() {
        errors.push(ProfileError::EmptyName);
    }

    if profile.age == 0 {
        errors.push(ProfileError::ZeroAge);
    } else if profile.age > MAX_AGE {
        errors.push(ProfileError::AgeOutOfRange(profile.age));
    }

    if !profile.uses_glasses && profile.lens_type.is_some() {
        errors.push(ProfileError::LensWithoutGlasses);
    }

    for difficulty in &profile.visual_difficulties {
        if !DIFFICULTY_CHECKLIST.contains(&difficulty.as_str()) {
            errors.push(ProfileError::UnknownDifficulty(difficulty.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ProfileErrors(errors))
    }
}
