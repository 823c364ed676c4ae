//! Integration test modules for chordkey
//!
//! - engine: builder, configuration, backend fallback
//! - performance: end-to-end playing and editing sessions

pub mod engine;
pub mod performance;
