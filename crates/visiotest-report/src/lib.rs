//! visiotest-report — Results analysis, share text, export and HTML reports.
//!
//! Everything here reads a profile and its results; nothing mutates session
//! state.

pub mod analysis;
pub mod export;
pub mod html;
pub mod share;
