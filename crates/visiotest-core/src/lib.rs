//! visiotest-core — Data model, session controller and persistence traits.
//!
//! This crate defines the records, the registration checks and the session
//! state machine that the rest of visiotest builds on.

pub mod error;
pub mod model;
pub mod session;
pub mod snapshot;
pub mod traits;
pub mod validation;
